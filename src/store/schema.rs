//! Snapshot data types for light-rig persistence.
//!
//! These types describe the record written for every published version:
//! the captured lights, their attribute values, and publish metadata.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name to value mapping.
///
/// Keys are kept in lexicographic order so stored records diff cleanly,
/// independent of the order the scene lists attributes in.
pub type AttributeMap = BTreeMap<String, AttrValue>;

/// A single scalar attribute value.
///
/// Variant order matters for untagged decoding: `5` decodes as `Int`,
/// `5.0` as `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view of the scalar (booleans count as 0/1).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// Text view of the scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A captured attribute value: a scalar or a fixed-length numeric sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Scalar(Scalar),
    Vector(Vec<f64>),
}

impl AttrValue {
    /// Unwrap single-element sequences to their scalar.
    ///
    /// Longer (and empty) sequences and all scalars pass through unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Vector(v) if v.len() == 1 => Self::Scalar(Scalar::Float(v[0])),
            other => other,
        }
    }

    /// Positional components for an attribute setter.
    ///
    /// Vectors spread into one component per element; scalars yield one.
    #[must_use]
    pub fn components(&self) -> Vec<Scalar> {
        match self {
            Self::Scalar(s) => vec![s.clone()],
            Self::Vector(v) => v.iter().copied().map(Scalar::Float).collect(),
        }
    }

    /// Returns the text if this is a string scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => s.as_text(),
            Self::Vector(_) => None,
        }
    }

    /// Returns true if this is a string scalar.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.as_text().is_some()
    }

    /// False if any float in the value is NaN or infinite.
    ///
    /// JSON has no spelling for those, so such values cannot be stored.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(Scalar::Float(f)) => f.is_finite(),
            Self::Scalar(_) => true,
            Self::Vector(v) => v.iter().all(|f| f.is_finite()),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::Float(v))
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Scalar(Scalar::Int(v))
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Scalar(Scalar::Bool(v))
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Scalar(Scalar::Text(v.to_string()))
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Scalar(Scalar::Text(v))
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Vector(v)
    }
}

impl<const N: usize> From<[f64; N]> for AttrValue {
    fn from(v: [f64; N]) -> Self {
        Self::Vector(v.to_vec())
    }
}

/// One light captured from the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightEntry {
    /// Transform identifier at capture time.
    pub name: String,
    /// Scene-reported shape type (opaque tag).
    #[serde(rename = "type")]
    pub light_type: String,
    /// Shape attributes.
    #[serde(default)]
    pub attributes: AttributeMap,
    /// Translate/rotate/scale/shear attributes of the parent transform.
    #[serde(default)]
    pub transform: AttributeMap,
}

impl LightEntry {
    /// Create an entry with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, light_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            light_type: light_type.into(),
            attributes: AttributeMap::new(),
            transform: AttributeMap::new(),
        }
    }

    /// Add a shape attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add a transform attribute.
    pub fn with_transform(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.transform.insert(name.into(), value.into());
        self
    }
}

/// The document stored for one published version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Captured lights, in capture order.
    #[serde(default)]
    pub lights: Vec<LightEntry>,
    /// Free-text description entered at publish time.
    #[serde(default)]
    pub description: String,
    /// ISO-8601 publish timestamp, stamped by the codec.
    #[serde(rename = "_published", default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    /// Denormalized asset name, stamped by the codec.
    #[serde(rename = "_asset_name", default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    /// Top-level keys this version of the tool does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Stored entries and values dropped while decoding.
    #[serde(skip)]
    pub issues: Vec<DecodeIssue>,
}

/// A part of a stored record that could not be decoded and was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeIssue {
    /// Stored light name, or `#<index>` when the entry has no usable name.
    pub light: String,
    /// Attribute involved, if only one value was dropped.
    pub attribute: Option<String>,
    pub reason: String,
}

impl SnapshotRecord {
    /// Create a record from captured lights.
    #[must_use]
    pub fn new(lights: Vec<LightEntry>) -> Self {
        Self {
            lights,
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overwrite publish metadata.
    pub fn stamp(&mut self, asset: &str, published: DateTime<Local>) {
        self.published = Some(published.to_rfc3339());
        self.asset_name = Some(asset.to_string());
    }

    /// Parsed publish timestamp, if present and well-formed.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.published
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    /// Number of captured lights.
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// First `(light, attribute)` holding a NaN or infinite value.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<(&str, &str)> {
        self.lights.iter().find_map(|light| {
            light
                .transform
                .iter()
                .chain(&light.attributes)
                .find(|(_, value)| !value.is_finite())
                .map(|(attr, _)| (light.name.as_str(), attr.as_str()))
        })
    }
}

/// Details about one stored version (for `info`).
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub asset: String,
    pub version: u32,
    /// Path of the stored record file.
    pub path: PathBuf,
    /// File creation time (modification time where creation is unsupported).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    pub description: String,
    pub light_count: usize,
}

/// Summary information about an asset (for listing).
#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub name: String,
    pub version_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<u32>,
}
