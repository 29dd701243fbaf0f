//! Moving lights between a live scene and snapshot records.
//!
//! The [`collector`] reads selected lights into a [`SnapshotRecord`]; the
//! [`applier`] recreates a record's lights in a scene. Both work through
//! [`SceneApi`](crate::scene::SceneApi) and never abort a batch on a single
//! failure: problems are collected as [`Diagnostic`]s and logged.
//!
//! [`SnapshotRecord`]: crate::store::SnapshotRecord

pub mod applier;
pub mod collector;

pub use applier::{AppliedLight, ApplyReport, apply_record, unique_name};
pub use collector::{Collection, collect_lights, filter_lights, selected_lights};

use std::fmt;

use serde::Serialize;

use crate::store::DecodeIssue;

/// A non-fatal problem met while collecting or applying a light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Light the problem belongs to (its stored or scene name).
    pub light: String,
    /// Attribute involved, if the problem is attribute-level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// A light-level problem.
    pub fn light(light: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            light: light.into(),
            attribute: None,
            message: message.into(),
        }
    }

    /// An attribute-level problem.
    pub fn attribute(
        light: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            light: light.into(),
            attribute: Some(attribute.into()),
            message: message.into(),
        }
    }
}

impl From<&DecodeIssue> for Diagnostic {
    fn from(issue: &DecodeIssue) -> Self {
        Self {
            light: issue.light.clone(),
            attribute: issue.attribute.clone(),
            message: format!("not restored: {}", issue.reason),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "{}.{attr}: {}", self.light, self.message),
            None => write!(f, "{}: {}", self.light, self.message),
        }
    }
}
