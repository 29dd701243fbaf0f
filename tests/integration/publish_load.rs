//! End-to-end publish/load workflows through `Session`.

use lrig::config::PUBLISHED_DIR;
use lrig::error::RigError;
use lrig::scene::SceneApi;
use lrig::scene::mock::MemoryScene;
use lrig::store::AttrValue;

use crate::common::fixtures::{TestHome, lit_scene, names};
use crate::common::init_test_logging;

#[test]
fn test_publish_twice_then_list() {
    init_test_logging();
    let home = TestHome::new();
    let session = home.session();

    let first = session
        .publish(&lit_scene(2), "rigA", "two lights", None)
        .unwrap();
    assert_eq!(first.version, 1);
    assert_eq!(first.light_count, 2);

    let second = session
        .publish(&lit_scene(3), "rigA", "three lights", None)
        .unwrap();
    assert_eq!(second.version, 2);

    assert_eq!(session.versions("rigA").unwrap(), vec![2, 1]);

    let v1 = session.store().read_snapshot("rigA", 1).unwrap();
    assert_eq!(v1.light_count(), 2);
    assert_eq!(v1.description, "two lights");
    assert_eq!(v1.asset_name.as_deref(), Some("rigA"));

    let info = session.info("rigA", None).unwrap();
    assert_eq!(info.version, 2);
    assert_eq!(info.light_count, 3);
}

#[test]
fn test_load_round_trip_into_fresh_scene() {
    let home = TestHome::new();
    let session = home.session();
    let source = MemoryScene::sample_rig();
    session.publish(&source, "shotRig", "", None).unwrap();

    let mut target = MemoryScene::new();
    let report = session.load(&mut target, "shotRig", None).unwrap();

    assert!(report.is_success());
    assert_eq!(report.version, 1);
    assert_eq!(report.apply.created.len(), 3);
    assert_eq!(target.value("key", "translateX"), Some(&AttrValue::from(4.0)));
    assert_eq!(target.value("key", "rotateY"), Some(&AttrValue::from(35.0)));
    assert_eq!(target.value("keyShape", "intensity"), Some(&AttrValue::from(6.5)));
    assert_eq!(
        target.value("fillShape", "color"),
        Some(&AttrValue::Vector(vec![0.8, 0.9, 1.0]))
    );
    assert_eq!(target.value("rimShape", "aiAov"), Some(&AttrValue::from("rim")));
    assert_eq!(target.list_selected().unwrap(), report.apply.created_nodes());
}

#[test]
fn test_non_finite_scene_value_does_not_block_publish() {
    let home = TestHome::new();
    let session = home.session();
    let mut scene = MemoryScene::sample_rig();
    scene
        .set_value("keyShape", "aiColorTemperature", f64::INFINITY, false)
        .unwrap();

    let report = session.publish(&scene, "rigA", "", None).unwrap();
    assert_eq!(report.version, 1);
    assert!(
        report
            .diagnostics
            .iter()
            .any(|d| d.attribute.as_deref() == Some("aiColorTemperature"))
    );

    let record = session.store().read_snapshot("rigA", 1).unwrap();
    assert_eq!(record.light_count(), 3);
    assert!(!record.lights[0].attributes.contains_key("aiColorTemperature"));
}

#[test]
fn test_load_restores_readable_lights_of_damaged_record() {
    let home = TestHome::new();
    let session = home.session();
    session.publish(&lit_scene(2), "rigA", "", None).unwrap();

    // Break one value of the second light by hand.
    let path = session.store().record_path("rigA", 1);
    let mut document: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    document["lights"][1]["attributes"]["intensity"] = serde_json::Value::Null;
    std::fs::write(&path, serde_json::to_vec_pretty(&document).unwrap()).unwrap();

    let mut target = MemoryScene::new();
    let report = session.load(&mut target, "rigA", None).unwrap();

    assert_eq!(report.apply.created_nodes(), names(&["light0", "light1"]));
    assert_eq!(target.value("light1", "translateX"), Some(&AttrValue::from(1.0)));
    assert!(
        report
            .apply
            .diagnostics
            .iter()
            .any(|d| d.light == "light1" && d.attribute.as_deref() == Some("intensity"))
    );
}

#[test]
fn test_load_specific_version() {
    let home = TestHome::new();
    let session = home.session();
    session.publish(&lit_scene(1), "rigA", "", None).unwrap();
    session.publish(&lit_scene(4), "rigA", "", None).unwrap();

    let mut scene = MemoryScene::new();
    let report = session.load(&mut scene, "rigA", Some(1)).unwrap();

    assert_eq!(report.version, 1);
    assert_eq!(report.apply.created_nodes(), names(&["light0"]));
}

#[test]
fn test_load_into_source_scene_renames() {
    let home = TestHome::new();
    let session = home.session();
    let mut scene = lit_scene(2);
    session.publish(&scene, "rigA", "", None).unwrap();

    let report = session.load(&mut scene, "rigA", None).unwrap();

    assert_eq!(report.apply.created_nodes(), names(&["light0_1", "light1_1"]));
    assert_eq!(scene.value("light1_1", "translateX"), Some(&AttrValue::from(1.0)));
}

#[test]
fn test_explicit_selection_overrides_scene_selection() {
    let home = TestHome::new();
    let session = home.session();
    let scene = lit_scene(3);

    let report = session
        .publish(&scene, "rigA", "", Some(&names(&["light2"])))
        .unwrap();

    assert_eq!(report.light_count, 1);
    let record = session.store().read_snapshot("rigA", 1).unwrap();
    assert_eq!(record.lights[0].name, "light2");
}

#[test]
fn test_publish_without_lights_writes_nothing() {
    let home = TestHome::new();
    let session = home.session();

    let err = session
        .publish(&MemoryScene::new(), "rigA", "", None)
        .unwrap_err();

    assert!(matches!(err, RigError::NothingSelected));
    assert!(session.store().list_versions("rigA").is_empty());
}

#[test]
fn test_missing_asset_and_version_errors() {
    let home = TestHome::new();
    let session = home.session();
    let mut scene = MemoryScene::new();

    assert!(matches!(
        session.load(&mut scene, "ghost", None),
        Err(RigError::AssetNotFound { .. })
    ));

    session.publish(&lit_scene(1), "rigA", "", None).unwrap();
    assert!(matches!(
        session.load(&mut scene, "rigA", Some(7)),
        Err(RigError::VersionNotFound { version: 7, .. })
    ));
    assert!(matches!(
        session.versions("ghost"),
        Err(RigError::AssetNotFound { .. })
    ));
}

#[test]
fn test_invalid_asset_name_is_rejected() {
    let home = TestHome::new();
    let session = home.session();

    let err = session
        .publish(&lit_scene(1), "../escape", "", None)
        .unwrap_err();
    assert!(matches!(err, RigError::InvalidAssetName { .. }));
}

#[test]
fn test_override_moves_later_sessions() {
    let home = TestHome::new();
    let shared = home.path().join("shared");
    home.session()
        .set_root_override(shared.to_str().unwrap())
        .unwrap();

    let session = home.session();
    session.publish(&lit_scene(1), "rigA", "", None).unwrap();
    assert!(session.store().root().starts_with(&shared));

    assert!(session.clear_root_override().unwrap());
    let reset = home.session();
    assert!(!reset.store().list_assets().contains(&"rigA".to_string()));
    assert_eq!(reset.store().root(), home.path());
}

#[test]
fn test_override_at_base_nests_published_dir() {
    let home = TestHome::new();
    home.session().set_root_override(home.path_str()).unwrap();

    let session = home.session();
    assert_eq!(session.store().root(), home.path().join(PUBLISHED_DIR));
}

#[test]
fn test_saved_scene_files_carry_a_rig_across_sessions() {
    let home = TestHome::new();
    let source = home.write_scene("source.json", &lit_scene(2));
    let scene = MemoryScene::load(&source).unwrap();
    home.session().publish(&scene, "rigA", "", None).unwrap();

    let mut target = MemoryScene::new();
    home.session().load(&mut target, "rigA", None).unwrap();
    let saved = home.write_scene("target.json", &target);

    let reopened = MemoryScene::load(&saved).unwrap();
    assert_eq!(reopened.selection(), names(&["light0", "light1"]).as_slice());
    assert_eq!(
        reopened.value("light1", "translateX"),
        Some(&AttrValue::from(1.0))
    );
}
