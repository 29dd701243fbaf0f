//! Capture light state from a scene.
//!
//! For each light the collector records:
//!
//! - `name`: the transform identifier
//! - `type`: the scene-reported type of its first shape
//! - `transform`: keyable translate/rotate/scale/shear attributes of the transform
//! - `attributes`: keyable shape attributes, plus every renderer (`ai`) attribute
//!
//! Lights without a resolvable shape are skipped. Unreadable attributes are
//! left out of the record and reported as diagnostics.

use tracing::{debug, info, instrument, warn};

use super::Diagnostic;
use crate::error::{Result, RigError};
use crate::scene::{SceneApi, is_light_type};
use crate::store::{AttributeMap, LightEntry, SnapshotRecord};

/// Transform attribute name fragments that are captured (lowercase).
pub const TRANSFORM_KEYWORDS: [&str; 4] = ["translate", "rotate", "scale", "shear"];

/// Shape attributes containing this marker are renderer settings and are
/// captured even when not keyable. Matched case-sensitively.
pub const RENDERER_ATTR_MARKER: &str = "ai";

/// Output of [`collect_lights`].
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Captured lights, in input order.
    pub record: SnapshotRecord,
    /// Lights left out because their shape could not be resolved.
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Collection {
    /// Number of captured lights.
    pub fn light_count(&self) -> usize {
        self.record.lights.len()
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.record.lights.is_empty()
    }
}

/// Whether a transform attribute belongs in the snapshot.
pub fn is_transform_attribute(attr: &str) -> bool {
    let lower = attr.to_lowercase();
    TRANSFORM_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Whether a shape attribute is a renderer setting.
pub fn is_renderer_attribute(attr: &str) -> bool {
    attr.contains(RENDERER_ATTR_MARKER)
}

/// Keep the objects with at least one light shape, preserving order.
pub fn filter_lights(scene: &dyn SceneApi, objects: &[String]) -> Vec<String> {
    objects
        .iter()
        .filter(|object| {
            let light = scene.list_shapes(object).is_ok_and(|shapes| {
                shapes.iter().any(|shape| {
                    scene
                        .object_type(shape)
                        .is_ok_and(|shape_type| is_light_type(&shape_type))
                })
            });
            if !light {
                debug!(object = %object, "Not a light, ignoring");
            }
            light
        })
        .cloned()
        .collect()
}

/// Lights in the current selection.
pub fn selected_lights(scene: &dyn SceneApi) -> Result<Vec<String>> {
    let selected = scene.list_selected()?;
    Ok(filter_lights(scene, &selected))
}

/// Capture `lights` into a record.
#[instrument(skip_all, fields(lights = lights.len()))]
pub fn collect_lights(scene: &dyn SceneApi, lights: &[String]) -> Collection {
    let mut collection = Collection::default();

    for light in lights {
        let shape = match first_shape(scene, light) {
            Ok(shape) => shape,
            Err(e) => {
                warn!(light = %light, error = %e, "Skipping light without a shape");
                collection.skipped.push(light.clone());
                collection
                    .diagnostics
                    .push(Diagnostic::light(light.as_str(), e.to_string()));
                continue;
            }
        };
        let light_type = match scene.object_type(&shape) {
            Ok(t) => t,
            Err(e) => {
                warn!(light = %light, error = %e, "Skipping light with unknown shape type");
                collection.skipped.push(light.clone());
                collection
                    .diagnostics
                    .push(Diagnostic::light(light.as_str(), e.to_string()));
                continue;
            }
        };

        let mut entry = LightEntry::new(light.as_str(), light_type);
        let diagnostics = &mut collection.diagnostics;

        match scene.list_keyable_attributes(light) {
            Ok(attrs) => {
                let wanted = attrs.iter().filter(|a| is_transform_attribute(a));
                read_into(scene, light, light, wanted, &mut entry.transform, diagnostics);
            }
            Err(e) => diagnostics.push(Diagnostic::light(light.as_str(), e.to_string())),
        }

        match scene.list_keyable_attributes(&shape) {
            Ok(attrs) => read_into(scene, light, &shape, attrs.iter(), &mut entry.attributes, diagnostics),
            Err(e) => diagnostics.push(Diagnostic::light(light.as_str(), e.to_string())),
        }

        // Renderer settings are rarely keyable; a repeated name simply
        // overwrites the keyable read.
        match scene.list_attributes(&shape) {
            Ok(attrs) => {
                let wanted = attrs.iter().filter(|a| is_renderer_attribute(a));
                read_into(scene, light, &shape, wanted, &mut entry.attributes, diagnostics);
            }
            Err(e) => diagnostics.push(Diagnostic::light(light.as_str(), e.to_string())),
        }

        debug!(
            light = %light,
            light_type = %entry.light_type,
            transform = entry.transform.len(),
            attributes = entry.attributes.len(),
            "Light captured"
        );
        collection.record.lights.push(entry);
    }

    info!(
        captured = collection.light_count(),
        skipped = collection.skipped.len(),
        diagnostics = collection.diagnostics.len(),
        "Collection finished"
    );
    collection
}

/// First shape child of an object.
fn first_shape(scene: &dyn SceneApi, object: &str) -> Result<String> {
    scene
        .list_shapes(object)?
        .into_iter()
        .next()
        .ok_or_else(|| RigError::scene(object, "Object has no shape"))
}

/// Read each attribute of `object` into `target`, normalizing values.
fn read_into<'a>(
    scene: &dyn SceneApi,
    light: &str,
    object: &str,
    attrs: impl Iterator<Item = &'a String>,
    target: &mut AttributeMap,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for attr in attrs {
        match scene.get_attribute(object, attr) {
            Ok(value) if !value.is_finite() => {
                debug!(light, object, attr = %attr, "Skipping non-finite value");
                diagnostics.push(Diagnostic::attribute(
                    light,
                    attr.as_str(),
                    "value is not a finite number",
                ));
            }
            Ok(value) => {
                target.insert(attr.clone(), value.normalized());
            }
            Err(e) => {
                debug!(light, object, attr = %attr, error = %e, "Attribute read failed");
                diagnostics.push(Diagnostic::attribute(light, attr.as_str(), e.to_string()));
            }
        }
    }
}
