//! In-memory scene implementation.
//!
//! `MemoryScene` models just enough of a host scene graph for the collector
//! and applier: transforms owning shapes, typed attributes with keyable
//! flags, and a selection. It records every mutation and supports failure
//! injection for tests, and it round-trips through JSON so the CLI can use a
//! scene file as its live scene.
//!
//! # Example
//!
//! ```rust,ignore
//! use lrig::scene::mock::{FailureConfig, MemoryScene, Operation};
//! use lrig::scene::SceneApi;
//!
//! let mut scene = MemoryScene::new().with_light("key1", "pointLight");
//! scene.set_selection(vec!["key1".to_string()]);
//!
//! let created = scene.create_node("spotLight", "rim")?;
//! assert_eq!(created, "rim");
//! ```
//!
//! # Host behaviours mirrored here
//!
//! - `create_node` returns the shape for node-style types (`aiAreaLight`,
//!   `mesh`, `areaLight`) and the transform for the other light types
//! - string attributes only accept a forced string-typed set
//! - component count must match the attribute's arity

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{LightKind, SceneApi, SetAs, classify_light_type};
use crate::error::{Result, RigError};
use crate::store::{AttrValue, Scalar};

/// Node type of transforms.
pub const TRANSFORM_TYPE: &str = "transform";

/// A node attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: AttrValue,
    #[serde(default)]
    pub keyable: bool,
}

impl Attribute {
    fn keyable(value: impl Into<AttrValue>) -> Self {
        Self {
            value: value.into(),
            keyable: true,
        }
    }

    fn hidden(value: impl Into<AttrValue>) -> Self {
        Self {
            value: value.into(),
            keyable: false,
        }
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl Node {
    fn new(node_type: &str, parent: Option<String>) -> Self {
        Self {
            node_type: node_type.to_string(),
            parent,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Recorded mutation for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateNode {
        node_type: String,
        name: String,
        returned: String,
    },
    SetAttribute {
        object: String,
        attr: String,
        components: Vec<Scalar>,
        set_as: SetAs,
    },
    Select {
        objects: Vec<String>,
    },
}

/// Failure injection for tests.
#[derive(Debug, Clone, Default)]
pub struct FailureConfig {
    /// Attribute names whose reads fail.
    pub failing_reads: BTreeSet<String>,
    /// Attribute names whose writes fail.
    pub failing_writes: BTreeSet<String>,
    /// Node types whose creation fails.
    pub failing_node_types: BTreeSet<String>,
    /// Make `select` fail.
    pub fail_select: bool,
}

impl FailureConfig {
    /// Fail reads of an attribute.
    #[must_use]
    pub fn read(mut self, attr: &str) -> Self {
        self.failing_reads.insert(attr.to_string());
        self
    }

    /// Fail writes of an attribute.
    #[must_use]
    pub fn write(mut self, attr: &str) -> Self {
        self.failing_writes.insert(attr.to_string());
        self
    }

    /// Fail creation of a node type.
    #[must_use]
    pub fn create(mut self, node_type: &str) -> Self {
        self.failing_node_types.insert(node_type.to_string());
        self
    }

    /// Fail selection.
    #[must_use]
    pub fn select(mut self) -> Self {
        self.fail_select = true;
        self
    }
}

/// In-memory scene for tests and scene files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    #[serde(default)]
    nodes: BTreeMap<String, Node>,
    #[serde(default)]
    selection: Vec<String>,
    #[serde(skip)]
    operations: Vec<Operation>,
    #[serde(skip)]
    failures: FailureConfig,
}

impl MemoryScene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A three-point rig (key, fill, rim), all selected.
    #[must_use]
    pub fn sample_rig() -> Self {
        let mut scene = Self::new()
            .with_light("key", "aiAreaLight")
            .with_light("fill", "pointLight")
            .with_light("rim", "spotLight");
        // Values differ from defaults so a restore is observable.
        let tweaks: [(&str, &str, AttrValue); 5] = [
            ("key", "translateX", 4.0.into()),
            ("key", "rotateY", 35.0.into()),
            ("keyShape", "intensity", 6.5.into()),
            ("fillShape", "color", [0.8, 0.9, 1.0].into()),
            ("rimShape", "aiAov", "rim".into()),
        ];
        for (object, attr, value) in tweaks {
            if let Some(attribute) = scene
                .nodes
                .get_mut(object)
                .and_then(|n| n.attributes.get_mut(attr))
            {
                attribute.value = value;
            }
        }
        scene.selection = vec!["key".into(), "fill".into(), "rim".into()];
        scene
    }

    /// Load a scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| RigError::SceneFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let scene: Self = serde_json::from_str(&contents).map_err(|e| RigError::SceneFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), nodes = scene.nodes.len(), "Scene loaded");
        Ok(scene)
    }

    /// Write the scene to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| RigError::SceneFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| RigError::storage(path, e))?;
        debug!(path = %path.display(), "Scene saved");
        Ok(())
    }

    // === Setup ===

    /// Builder form of [`MemoryScene::add_light`].
    #[must_use]
    pub fn with_light(mut self, name: &str, light_type: &str) -> Self {
        self.add_light(name, light_type);
        self
    }

    /// Configure failure injection.
    #[must_use]
    pub fn with_failures(mut self, failures: FailureConfig) -> Self {
        self.failures = failures;
        self
    }

    /// Add a transform `name` with a light shape `<name>Shape`; returns the
    /// shape name.
    pub fn add_light(&mut self, name: &str, light_type: &str) -> String {
        self.add_transform(name);
        let shape = format!("{name}Shape");
        self.add_shape(name, &shape, light_type);
        shape
    }

    /// Add a transform with default transform attributes.
    pub fn add_transform(&mut self, name: &str) {
        let mut node = Node::new(TRANSFORM_TYPE, None);
        node.attributes = transform_defaults();
        self.nodes.insert(name.to_string(), node);
    }

    /// Add a shape under `parent` with defaults for its type.
    pub fn add_shape(&mut self, parent: &str, name: &str, shape_type: &str) {
        let mut node = Node::new(shape_type, Some(parent.to_string()));
        node.attributes = shape_defaults(shape_type);
        self.nodes.insert(name.to_string(), node);
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(name.to_string());
        }
    }

    /// Set or create an attribute directly, bypassing type checks.
    pub fn set_value(
        &mut self,
        object: &str,
        attr: &str,
        value: impl Into<AttrValue>,
        keyable: bool,
    ) -> Result<()> {
        let node = self
            .nodes
            .get_mut(object)
            .ok_or_else(|| RigError::scene(object, "No such object"))?;
        node.attributes.insert(
            attr.to_string(),
            Attribute {
                value: value.into(),
                keyable,
            },
        );
        Ok(())
    }

    /// Replace the selection without validation.
    pub fn set_selection(&mut self, objects: Vec<String>) {
        self.selection = objects;
    }

    /// Mutable access to failure injection.
    pub fn failures_mut(&mut self) -> &mut FailureConfig {
        &mut self.failures
    }

    // === Inspection ===

    /// Current value of an attribute.
    #[must_use]
    pub fn value(&self, object: &str, attr: &str) -> Option<&AttrValue> {
        self.nodes
            .get(object)
            .and_then(|n| n.attributes.get(attr))
            .map(|a| &a.value)
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// All node names, sorted.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// All recorded operations.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Forget recorded operations.
    pub fn clear_operations(&mut self) {
        self.operations.clear();
    }

    /// Names returned by `create_node`, in creation order.
    #[must_use]
    pub fn created_nodes(&self) -> Vec<&str> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::CreateNode { returned, .. } => Some(returned.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Assert an operation was recorded.
    ///
    /// # Panics
    ///
    /// Panics if `expected` is not in the log.
    pub fn assert_contains(&self, expected: &Operation) {
        assert!(
            self.operations.contains(expected),
            "Operation {expected:?} not found in {:?}",
            self.operations
        );
    }

    // === Internal ===

    fn node_ref(&self, object: &str) -> Result<&Node> {
        self.nodes
            .get(object)
            .ok_or_else(|| RigError::scene(object, "No such object"))
    }

    /// `base`, or `base1`, `base2`, ... if taken.
    fn unique_node_name(&self, base: &str) -> String {
        if !self.nodes.contains_key(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}{i}"))
            .find(|candidate| !self.nodes.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

impl SceneApi for MemoryScene {
    fn list_selected(&self) -> Result<Vec<String>> {
        Ok(self.selection.clone())
    }

    fn list_shapes(&self, object: &str) -> Result<Vec<String>> {
        let node = self.node_ref(object)?;
        Ok(node
            .children
            .iter()
            .filter(|child| {
                self.nodes
                    .get(child.as_str())
                    .is_some_and(|c| c.node_type != TRANSFORM_TYPE)
            })
            .cloned()
            .collect())
    }

    fn parent(&self, object: &str) -> Result<Option<String>> {
        Ok(self.node_ref(object)?.parent.clone())
    }

    fn object_type(&self, object: &str) -> Result<String> {
        Ok(self.node_ref(object)?.node_type.clone())
    }

    fn object_exists(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    fn list_keyable_attributes(&self, object: &str) -> Result<Vec<String>> {
        Ok(self
            .node_ref(object)?
            .attributes
            .iter()
            .filter(|(_, a)| a.keyable)
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn list_attributes(&self, object: &str) -> Result<Vec<String>> {
        Ok(self.node_ref(object)?.attributes.keys().cloned().collect())
    }

    fn get_attribute(&self, object: &str, attr: &str) -> Result<AttrValue> {
        if self.failures.failing_reads.contains(attr) {
            return Err(RigError::scene(object, format!("Mock read of '{attr}' configured to fail")));
        }
        self.node_ref(object)?
            .attributes
            .get(attr)
            .map(|a| a.value.clone())
            .ok_or_else(|| RigError::scene(object, format!("No attribute '{attr}'")))
    }

    fn set_attribute(
        &mut self,
        object: &str,
        attr: &str,
        components: &[Scalar],
        set_as: SetAs,
    ) -> Result<()> {
        if self.failures.failing_writes.contains(attr) {
            return Err(RigError::scene(object, format!("Mock write of '{attr}' configured to fail")));
        }

        let attribute = self
            .nodes
            .get_mut(object)
            .ok_or_else(|| RigError::scene(object, "No such object"))?
            .attributes
            .get_mut(attr)
            .ok_or_else(|| RigError::scene(object, format!("No attribute '{attr}'")))?;

        let value = coerce(&attribute.value, components, set_as)
            .map_err(|reason| RigError::scene(object, format!("{attr}: {reason}")))?;
        trace!(object, attr, ?value, "Attribute set");
        attribute.value = value;

        self.operations.push(Operation::SetAttribute {
            object: object.to_string(),
            attr: attr.to_string(),
            components: components.to_vec(),
            set_as,
        });
        Ok(())
    }

    fn create_node(&mut self, node_type: &str, name: &str) -> Result<String> {
        if self.failures.failing_node_types.contains(node_type) {
            return Err(RigError::scene(
                name,
                format!("Mock creation of '{node_type}' configured to fail"),
            ));
        }
        let kind = LightKind::from_node_type(node_type)
            .ok_or_else(|| RigError::scene(name, format!("Unknown node type '{node_type}'")))?;

        let transform = self.unique_node_name(name);
        self.add_transform(&transform);
        let shape = self.unique_node_name(&format!("{transform}Shape"));
        self.add_shape(&transform, &shape, node_type);

        let returned = if returns_shape(kind) { shape } else { transform };
        debug!(node_type, name, %returned, "Node created");
        self.operations.push(Operation::CreateNode {
            node_type: node_type.to_string(),
            name: name.to_string(),
            returned: returned.clone(),
        });
        Ok(returned)
    }

    fn select(&mut self, objects: &[String]) -> Result<()> {
        if self.failures.fail_select {
            return Err(RigError::scene("selection", "Mock selection configured to fail"));
        }
        if let Some(missing) = objects.iter().find(|o| !self.nodes.contains_key(o.as_str())) {
            return Err(RigError::scene(missing.as_str(), "No such object"));
        }
        self.selection = objects.to_vec();
        self.operations.push(Operation::Select {
            objects: objects.to_vec(),
        });
        Ok(())
    }
}

/// Node-style creation hands back the shape; the light commands hand back
/// the transform.
const fn returns_shape(kind: LightKind) -> bool {
    matches!(kind, LightKind::AiAreaLight | LightKind::Mesh | LightKind::Area)
}

/// Fit components to an existing attribute's type.
fn coerce(
    existing: &AttrValue,
    components: &[Scalar],
    set_as: SetAs,
) -> std::result::Result<AttrValue, String> {
    match (existing, set_as) {
        (AttrValue::Scalar(Scalar::Text(_)), SetAs::String) => match components {
            [Scalar::Text(s)] => Ok(AttrValue::from(s.as_str())),
            _ => Err("string attribute expects a single text value".to_string()),
        },
        (AttrValue::Scalar(Scalar::Text(_)), SetAs::Inferred) => {
            Err("string attribute needs a string-typed set".to_string())
        }
        (_, SetAs::String) => Err("not a string attribute".to_string()),
        (AttrValue::Vector(current), SetAs::Inferred) => {
            if components.len() != current.len() {
                return Err(format!(
                    "expected {} components, got {}",
                    current.len(),
                    components.len()
                ));
            }
            components
                .iter()
                .map(Scalar::as_f64)
                .collect::<Option<Vec<_>>>()
                .map(AttrValue::Vector)
                .ok_or_else(|| "non-numeric component".to_string())
        }
        (AttrValue::Scalar(current), SetAs::Inferred) => {
            let [component] = components else {
                return Err(format!("expected 1 component, got {}", components.len()));
            };
            let number = component
                .as_f64()
                .ok_or_else(|| "expected a numeric value".to_string())?;
            #[allow(clippy::cast_possible_truncation)]
            let value = match current {
                Scalar::Bool(_) => Scalar::Bool(number.abs() > f64::EPSILON),
                Scalar::Int(_) => Scalar::Int(number.round() as i64),
                Scalar::Float(_) | Scalar::Text(_) => Scalar::Float(number),
            };
            Ok(AttrValue::Scalar(value))
        }
    }
}

fn transform_defaults() -> BTreeMap<String, Attribute> {
    let mut attrs = BTreeMap::new();
    for axis in ["X", "Y", "Z"] {
        attrs.insert(format!("translate{axis}"), Attribute::keyable(0.0));
        attrs.insert(format!("rotate{axis}"), Attribute::keyable(0.0));
        attrs.insert(format!("scale{axis}"), Attribute::keyable(1.0));
    }
    attrs.insert("visibility".into(), Attribute::keyable(true));
    attrs.insert("translate".into(), Attribute::hidden([0.0, 0.0, 0.0]));
    attrs.insert("rotate".into(), Attribute::hidden([0.0, 0.0, 0.0]));
    attrs.insert("scale".into(), Attribute::hidden([1.0, 1.0, 1.0]));
    attrs.insert("shear".into(), Attribute::hidden([0.0, 0.0, 0.0]));
    attrs.insert("rotateOrder".into(), Attribute::hidden(0_i64));
    attrs
}

fn shape_defaults(shape_type: &str) -> BTreeMap<String, Attribute> {
    let kind = LightKind::from_node_type(shape_type)
        .unwrap_or_else(|| classify_light_type(shape_type));
    let mut attrs = BTreeMap::new();

    if kind == LightKind::Mesh {
        attrs.insert("castsShadows".into(), Attribute::hidden(true));
        attrs.insert("aiOpaque".into(), Attribute::hidden(true));
        attrs.insert("aiSubdivType".into(), Attribute::hidden(0_i64));
        attrs.insert("aiTranslator".into(), Attribute::hidden("polymesh"));
        return attrs;
    }

    attrs.insert("color".into(), Attribute::keyable([1.0, 1.0, 1.0]));
    attrs.insert("intensity".into(), Attribute::keyable(1.0));
    attrs.insert("emitDiffuse".into(), Attribute::keyable(true));
    attrs.insert("emitSpecular".into(), Attribute::keyable(true));
    attrs.insert("aiExposure".into(), Attribute::hidden(0.0));
    attrs.insert("aiSamples".into(), Attribute::hidden(1_i64));
    attrs.insert("aiCastShadows".into(), Attribute::hidden(true));
    attrs.insert("aiAov".into(), Attribute::hidden("default"));
    attrs.insert("aiUseColorTemperature".into(), Attribute::hidden(false));
    attrs.insert("aiColorTemperature".into(), Attribute::hidden(6500.0));

    match kind {
        LightKind::Point | LightKind::Spot => {
            attrs.insert("decayRate".into(), Attribute::keyable(0_i64));
            if kind == LightKind::Spot {
                attrs.insert("coneAngle".into(), Attribute::keyable(40.0));
                attrs.insert("penumbraAngle".into(), Attribute::keyable(0.0));
                attrs.insert("dropoff".into(), Attribute::keyable(0.0));
            }
        }
        LightKind::Directional => {
            attrs.insert("aiAngle".into(), Attribute::hidden(0.0));
        }
        LightKind::Area | LightKind::AiAreaLight => {
            attrs.insert("aiSpread".into(), Attribute::hidden(1.0));
            attrs.insert("aiNormalize".into(), Attribute::hidden(true));
            attrs.insert("aiResolution".into(), Attribute::hidden(512_i64));
        }
        LightKind::Mesh => {}
    }
    attrs
}
