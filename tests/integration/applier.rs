//! Integration tests for recreating lights from records.

use lrig::rig::apply_record;
use lrig::scene::mock::{FailureConfig, MemoryScene, Operation};
use lrig::scene::{LightKind, SceneApi};
use lrig::store::{AttrValue, LightEntry, SnapshotRecord};

use crate::common::fixtures::names;

fn single(name: &str, light_type: &str) -> SnapshotRecord {
    SnapshotRecord::new(vec![LightEntry::new(name, light_type)])
}

#[test]
fn test_repeated_loads_never_collide() {
    let mut scene = MemoryScene::new();
    let record = single("key1", "pointLight");

    let first = apply_record(&mut scene, &record);
    let second = apply_record(&mut scene, &record);

    assert_eq!(first.created_nodes(), names(&["key1"]));
    assert_eq!(second.created_nodes(), names(&["key1_1"]));
    assert!(scene.object_exists("key1"));
    assert!(scene.object_exists("key1_1"));
}

#[test]
fn test_existing_object_is_left_untouched() {
    let mut scene = MemoryScene::new().with_light("key1", "pointLight");
    scene.set_value("key1Shape", "intensity", 9.0, true).unwrap();
    let record = SnapshotRecord::new(vec![
        LightEntry::new("key1", "pointLight").with_attribute("intensity", 2.0),
    ]);

    let report = apply_record(&mut scene, &record);

    assert_eq!(report.created_nodes(), names(&["key1_1"]));
    assert_eq!(scene.value("key1Shape", "intensity"), Some(&AttrValue::from(9.0)));
    assert_eq!(scene.value("key1_1Shape", "intensity"), Some(&AttrValue::from(2.0)));
}

#[test]
fn test_creation_rules_follow_priority() {
    let cases = [
        ("aiAreaLight", LightKind::AiAreaLight),
        ("aiMeshLight", LightKind::Mesh),
        ("directionalLight", LightKind::Directional),
        ("PointLight", LightKind::Point),
        ("spotLight", LightKind::Spot),
        // "aiSkyDomeLight" matches none of the rules
        ("aiSkyDomeLight", LightKind::Area),
        ("areaLight", LightKind::Area),
    ];

    for (light_type, expected) in cases {
        let mut scene = MemoryScene::new();
        let report = apply_record(&mut scene, &single("l", light_type));
        assert_eq!(report.created[0].kind, expected, "type {light_type}");
        scene.assert_contains(&Operation::CreateNode {
            node_type: expected.node_type().to_string(),
            name: "l".to_string(),
            returned: report.created[0].node.clone(),
        });
    }
}

#[test]
fn test_shape_returning_creation_finds_transform() {
    let mut scene = MemoryScene::new();
    let record = SnapshotRecord::new(vec![
        LightEntry::new("key", "aiAreaLight")
            .with_transform("translateX", 3.0)
            .with_attribute("intensity", 4.0),
    ]);

    let report = apply_record(&mut scene, &record);
    let applied = &report.created[0];

    assert_eq!(applied.node, "keyShape");
    assert_eq!(applied.shape, "keyShape");
    assert_eq!(applied.transform.as_deref(), Some("key"));
    assert_eq!(scene.value("key", "translateX"), Some(&AttrValue::from(3.0)));
    assert_eq!(scene.value("keyShape", "intensity"), Some(&AttrValue::from(4.0)));
}

#[test]
fn test_text_values_are_retried_as_strings() {
    let mut scene = MemoryScene::new();
    let record = SnapshotRecord::new(vec![
        LightEntry::new("rim", "spotLight").with_attribute("aiAov", "rim_pass"),
    ]);

    let report = apply_record(&mut scene, &record);

    assert_eq!(report.created[0].attributes_applied, 1);
    assert!(report.diagnostics.is_empty());
    assert_eq!(scene.value("rimShape", "aiAov"), Some(&AttrValue::from("rim_pass")));
}

#[test]
fn test_failed_attribute_does_not_abort_light() {
    let mut scene =
        MemoryScene::new().with_failures(FailureConfig::default().write("intensity"));
    let record = SnapshotRecord::new(vec![
        LightEntry::new("key", "pointLight")
            .with_attribute("intensity", 3.0)
            .with_attribute("color", [0.5, 0.5, 0.5])
            .with_attribute("madeUpAttr", 1.0),
    ]);

    let report = apply_record(&mut scene, &record);

    assert!(report.is_success());
    assert_eq!(report.created[0].attributes_applied, 1);
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(
        scene.value("keyShape", "color"),
        Some(&AttrValue::Vector(vec![0.5, 0.5, 0.5]))
    );
}

#[test]
fn test_failed_creation_skips_only_that_light() {
    let mut scene =
        MemoryScene::new().with_failures(FailureConfig::default().create("spotLight"));
    let record = SnapshotRecord::new(vec![
        LightEntry::new("key", "pointLight"),
        LightEntry::new("rim", "spotLight"),
        LightEntry::new("fill", "pointLight"),
    ]);

    let report = apply_record(&mut scene, &record);

    assert_eq!(report.created_nodes(), names(&["key", "fill"]));
    assert_eq!(report.failed, names(&["rim"]));
    assert_eq!(scene.selection(), names(&["key", "fill"]).as_slice());
}

#[test]
fn test_nothing_created_selects_nothing() {
    let mut scene = MemoryScene::new()
        .with_failures(FailureConfig::default().create("pointLight"));
    scene.set_selection(Vec::new());

    let report = apply_record(&mut scene, &single("key", "pointLight"));

    assert!(!report.is_success());
    assert!(!report.selected);
    assert!(scene.selection().is_empty());
}

#[test]
fn test_selection_failure_is_a_diagnostic() {
    let mut scene = MemoryScene::new().with_failures(FailureConfig::default().select());

    let report = apply_record(&mut scene, &single("key", "pointLight"));

    assert!(report.is_success());
    assert!(!report.selected);
    assert_eq!(report.diagnostics.len(), 1);
}
