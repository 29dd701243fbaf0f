//! Recreate stored lights in a scene.
//!
//! Every entry becomes a brand new node; existing objects are never
//! modified. Entries are independent: a light that cannot be created is
//! reported and the rest still go through.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::Diagnostic;
use crate::scene::{LightKind, SceneApi, SetAs, classify_light_type};
use crate::store::{AttributeMap, LightEntry, SnapshotRecord};

/// One light created by [`apply_record`].
#[derive(Debug, Clone, Serialize)]
pub struct AppliedLight {
    /// Name stored in the record.
    pub source: String,
    /// Stored type tag.
    pub light_type: String,
    pub kind: LightKind,
    /// Object returned by node creation.
    pub node: String,
    /// Shape the attributes were applied to.
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    pub transform_applied: usize,
    pub attributes_applied: usize,
}

/// Output of [`apply_record`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub created: Vec<AppliedLight>,
    /// Stored names whose node could not be created.
    pub failed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the created nodes ended up selected.
    pub selected: bool,
}

impl ApplyReport {
    /// At least one light was created.
    pub fn is_success(&self) -> bool {
        !self.created.is_empty()
    }

    /// Objects to select after a load, in creation order: each light's
    /// transform, or its shape when it has none.
    pub fn created_nodes(&self) -> Vec<String> {
        self.created
            .iter()
            .map(|c| c.transform.clone().unwrap_or_else(|| c.shape.clone()))
            .collect()
    }
}

/// First free name among `base`, `base_1`, `base_2`, ...
pub fn unique_name(scene: &dyn SceneApi, base: &str) -> String {
    if !scene.object_exists(base) {
        return base.to_string();
    }
    (1_u64..)
        .map(|i| format!("{base}_{i}"))
        .find(|candidate| !scene.object_exists(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Create every light of `record` in `scene` and select the results.
#[instrument(skip_all, fields(lights = record.lights.len()))]
pub fn apply_record(scene: &mut dyn SceneApi, record: &SnapshotRecord) -> ApplyReport {
    let mut report = ApplyReport::default();
    report
        .diagnostics
        .extend(record.issues.iter().map(Diagnostic::from));

    for entry in &record.lights {
        match apply_entry(scene, entry, &mut report.diagnostics) {
            Some(applied) => report.created.push(applied),
            None => report.failed.push(entry.name.clone()),
        }
    }

    if report.is_success() {
        let nodes = report.created_nodes();
        match scene.select(&nodes) {
            Ok(()) => report.selected = true,
            Err(e) => {
                warn!(error = %e, "Failed to select created lights");
                report
                    .diagnostics
                    .push(Diagnostic::light("selection", e.to_string()));
            }
        }
    }

    info!(
        created = report.created.len(),
        failed = report.failed.len(),
        diagnostics = report.diagnostics.len(),
        "Apply finished"
    );
    report
}

fn apply_entry(
    scene: &mut dyn SceneApi,
    entry: &LightEntry,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<AppliedLight> {
    let kind = classify_light_type(&entry.light_type);
    let name = unique_name(scene, &entry.name);

    let node = match scene.create_node(kind.node_type(), &name) {
        Ok(node) => node,
        Err(e) => {
            warn!(light = %entry.name, node_type = kind.node_type(), error = %e, "Light creation failed");
            diagnostics.push(Diagnostic::light(entry.name.as_str(), e.to_string()));
            return None;
        }
    };
    let (shape, transform) = resolve_targets(scene, &node);

    let transform_applied = match &transform {
        Some(transform) => {
            apply_attributes(scene, &entry.name, transform, &entry.transform, false, diagnostics)
        }
        None => {
            if !entry.transform.is_empty() {
                diagnostics.push(Diagnostic::light(
                    entry.name.as_str(),
                    format!("'{node}' has no transform; transform values skipped"),
                ));
            }
            0
        }
    };
    let attributes_applied =
        apply_attributes(scene, &entry.name, &shape, &entry.attributes, true, diagnostics);

    debug!(
        light = %entry.name,
        node = %node,
        transform_applied,
        attributes_applied,
        "Light restored"
    );
    Some(AppliedLight {
        source: entry.name.clone(),
        light_type: entry.light_type.clone(),
        kind,
        node,
        shape,
        transform,
        transform_applied,
        attributes_applied,
    })
}

/// Shape and transform for a freshly created node.
///
/// A node with shape children is the transform; otherwise it is the shape
/// itself and its parent, if any, is the transform.
fn resolve_targets(scene: &dyn SceneApi, node: &str) -> (String, Option<String>) {
    match scene.list_shapes(node) {
        Ok(shapes) if !shapes.is_empty() => (shapes[0].clone(), Some(node.to_string())),
        _ => (node.to_string(), scene.parent(node).ok().flatten()),
    }
}

/// Set each value on `object`; returns how many were applied.
///
/// With `retry_text`, a textual value that the generic set rejects is
/// retried as a forced string set.
fn apply_attributes(
    scene: &mut dyn SceneApi,
    light: &str,
    object: &str,
    values: &AttributeMap,
    retry_text: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let mut applied = 0;
    for (attr, value) in values {
        let components = value.components();
        let result = match scene.set_attribute(object, attr, &components, SetAs::Inferred) {
            Err(_) if retry_text && value.is_text() => {
                scene.set_attribute(object, attr, &components, SetAs::String)
            }
            other => other,
        };
        match result {
            Ok(()) => applied += 1,
            Err(e) => {
                debug!(light, object, attr = %attr, error = %e, "Attribute not applied");
                diagnostics.push(Diagnostic::attribute(light, attr.as_str(), e.to_string()));
            }
        }
    }
    applied
}
