//! Type-string rule tables.
//!
//! Scenes report node types as opaque strings. Both "is this a light?" and
//! "which kind of light should be created for this stored type?" are decided
//! by ordered substring rules kept here as data.

use serde::Serialize;

/// A substring test on a type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePattern {
    /// Case-sensitive substring.
    Contains(&'static str),
    /// Case-insensitive substring (`needle` must be lowercase).
    ContainsIgnoreCase(&'static str),
}

impl TypePattern {
    /// Test a type string against this pattern.
    #[must_use]
    pub fn matches(self, type_tag: &str) -> bool {
        match self {
            Self::Contains(needle) => type_tag.contains(needle),
            Self::ContainsIgnoreCase(needle) => type_tag.to_lowercase().contains(needle),
        }
    }
}

/// Kind of node created when restoring a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    AiAreaLight,
    Mesh,
    Directional,
    Point,
    Spot,
    Area,
}

impl LightKind {
    /// All kinds, in rule order.
    pub const ALL: [Self; 6] = [
        Self::AiAreaLight,
        Self::Mesh,
        Self::Directional,
        Self::Point,
        Self::Spot,
        Self::Area,
    ];

    /// Scene node type passed to `create_node`.
    #[must_use]
    pub const fn node_type(self) -> &'static str {
        match self {
            Self::AiAreaLight => "aiAreaLight",
            Self::Mesh => "mesh",
            Self::Directional => "directionalLight",
            Self::Point => "pointLight",
            Self::Spot => "spotLight",
            Self::Area => "areaLight",
        }
    }

    /// Reverse of [`LightKind::node_type`].
    #[must_use]
    pub fn from_node_type(node_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.node_type() == node_type)
    }
}

/// One entry of the creation rule table.
#[derive(Debug, Clone, Copy)]
pub struct CreationRule {
    pub pattern: TypePattern,
    pub kind: LightKind,
}

/// Ordered creation rules; the first match wins.
pub const CREATION_RULES: &[CreationRule] = &[
    CreationRule {
        pattern: TypePattern::Contains("aiAreaLight"),
        kind: LightKind::AiAreaLight,
    },
    CreationRule {
        pattern: TypePattern::Contains("aiMesh"),
        kind: LightKind::Mesh,
    },
    CreationRule {
        pattern: TypePattern::ContainsIgnoreCase("directional"),
        kind: LightKind::Directional,
    },
    CreationRule {
        pattern: TypePattern::ContainsIgnoreCase("point"),
        kind: LightKind::Point,
    },
    CreationRule {
        pattern: TypePattern::ContainsIgnoreCase("spot"),
        kind: LightKind::Spot,
    },
];

/// Kind used when no rule matches. Unknown renderer types degrade to a
/// plain area light instead of failing.
pub const FALLBACK_KIND: LightKind = LightKind::Area;

/// Shape types containing this (any case) are lights.
pub const LIGHT_SHAPE_PATTERN: TypePattern = TypePattern::ContainsIgnoreCase("light");

/// Pick the creation kind for a stored type string.
#[must_use]
pub fn classify_light_type(type_tag: &str) -> LightKind {
    classify_with(CREATION_RULES, type_tag)
}

/// Pick a kind from a custom rule table.
#[must_use]
pub fn classify_with(rules: &[CreationRule], type_tag: &str) -> LightKind {
    rules
        .iter()
        .find(|rule| rule.pattern.matches(type_tag))
        .map_or(FALLBACK_KIND, |rule| rule.kind)
}

/// Whether a shape type denotes a light.
#[must_use]
pub fn is_light_type(shape_type: &str) -> bool {
    LIGHT_SHAPE_PATTERN.matches(shape_type)
}
