//! Integration tests for the filesystem asset store.

use std::fs;
use std::sync::Arc;
use std::thread;

use lrig::config::{PUBLISHED_DIR, write_path_override};
use lrig::error::RigError;
use lrig::store::{AssetStore, AttrValue, LightEntry, SnapshotRecord};
use tempfile::TempDir;

use crate::common::init_test_logging;

fn record(lights: usize) -> SnapshotRecord {
    SnapshotRecord::new(
        (0..lights)
            .map(|i| LightEntry::new(format!("light{i}"), "pointLight"))
            .collect(),
    )
}

/// N publishes to a new asset produce versions 1..=N.
#[test]
fn test_sequential_publishes_number_from_one() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();

    for expected in 1..=5 {
        let version = store.write_snapshot("rigA", &mut record(1)).unwrap();
        assert_eq!(version, expected);
    }

    assert_eq!(store.list_versions("rigA"), vec![5, 4, 3, 2, 1]);
    assert_eq!(store.latest_version("rigA"), Some(5));
}

/// Gaps left by deleted versions are never refilled.
#[test]
fn test_allocation_after_gaps() {
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();
    for v in [1, 3, 5] {
        fs::create_dir_all(store.version_path("rigA", v)).unwrap();
    }

    assert_eq!(store.allocate_version("rigA").unwrap(), 6);
    assert_eq!(store.list_versions("rigA"), vec![6, 5, 3, 1]);
}

/// Concurrent writers never share a version number.
#[test]
fn test_concurrent_publishes_get_distinct_versions() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(AssetStore::open(temp.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.write_snapshot("rigA", &mut record(1)).unwrap())
        })
        .collect();
    let mut versions: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    versions.sort_unstable();

    assert_eq!(versions, (1..=8).collect::<Vec<_>>());
    for v in versions {
        assert!(store.read_snapshot("rigA", v).is_some());
    }
}

/// A stored version is never touched by later publishes.
#[test]
fn test_existing_versions_are_immutable() {
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();

    store
        .write_snapshot("rigA", &mut record(2).with_description("v1"))
        .unwrap();
    let before = fs::read(store.record_path("rigA", 1)).unwrap();

    store
        .write_snapshot("rigA", &mut record(3).with_description("v2"))
        .unwrap();
    let after = fs::read(store.record_path("rigA", 1)).unwrap();

    assert_eq!(before, after);
    assert_eq!(store.read_snapshot("rigA", 1).unwrap().light_count(), 2);
}

/// Assets are independent of each other.
#[test]
fn test_assets_are_versioned_independently() {
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();

    store.write_snapshot("rigA", &mut record(1)).unwrap();
    store.write_snapshot("rigA", &mut record(1)).unwrap();
    let version = store.write_snapshot("rigB", &mut record(1)).unwrap();

    assert_eq!(version, 1);
    assert_eq!(store.list_assets(), vec!["rigA", "rigB"]);
}

/// Reads of anything that does not exist come back empty.
#[test]
fn test_reads_of_missing_data_are_absent() {
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();

    assert!(store.read_snapshot("ghost", 1).is_none());
    fs::create_dir_all(store.version_path("rigA", 1)).unwrap();
    // Version directory without its record file.
    assert!(store.read_snapshot("rigA", 1).is_none());
    assert!(store.version_info("rigA", 1).is_none());
}

/// The override record redirects new stores.
#[test]
fn test_override_redirects_store() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("base");
    let shared = temp.path().join("shared");
    write_path_override(&base, shared.to_str().unwrap()).unwrap();

    let store = AssetStore::open(&base).unwrap();
    assert_eq!(store.root(), shared.join(PUBLISHED_DIR));

    store.write_snapshot("rigA", &mut record(1)).unwrap();
    assert!(shared.join(PUBLISHED_DIR).join("rigA/1/rigA.json").is_file());
}

/// A malformed override falls back to the base directory.
#[test]
fn test_broken_override_falls_back() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("env.json"), b"not json").unwrap();

    let store = AssetStore::open(temp.path()).unwrap();
    assert_eq!(store.root(), temp.path());
}

/// An override with an empty path is ignored.
#[test]
fn test_empty_override_is_ignored() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("env.json"), br#"{"custom_path": ""}"#).unwrap();

    let store = AssetStore::open(temp.path()).unwrap();
    assert_eq!(store.root(), temp.path());
}

/// A value JSON cannot hold fails the write before a version is claimed.
#[test]
fn test_non_finite_value_fails_without_allocating() {
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();
    let mut broken = SnapshotRecord::new(vec![
        LightEntry::new("key", "aiAreaLight")
            .with_attribute("intensity", 2.0)
            .with_attribute("aiColorTemperature", f64::INFINITY),
    ]);

    let err = store.write_snapshot("rigA", &mut broken).unwrap_err();

    assert!(matches!(err, RigError::Encode(_)));
    assert!(store.list_versions("rigA").is_empty());
    assert_eq!(store.write_snapshot("rigA", &mut record(1)).unwrap(), 1);
}

/// One bad value or entry in a stored record does not hide the rest.
#[test]
fn test_partially_bad_record_still_reads() {
    let temp = TempDir::new().unwrap();
    let store = AssetStore::open(temp.path()).unwrap();
    fs::create_dir_all(store.version_path("rigA", 1)).unwrap();
    fs::write(
        store.record_path("rigA", 1),
        br#"{
  "lights": [
    {"name": "key", "type": "pointLight", "attributes": {"intensity": 3.0}},
    {"name": "rim", "type": "spotLight", "attributes": {"aiFilters": null, "coneAngle": 25.0}},
    {"name": "fill"}
  ],
  "description": "hand edited"
}"#,
    )
    .unwrap();

    let record = store.read_snapshot("rigA", 1).unwrap();

    assert_eq!(record.light_count(), 2);
    assert_eq!(record.description, "hand edited");
    assert_eq!(record.lights[1].attributes.get("coneAngle"), Some(&AttrValue::from(25.0)));
    assert_eq!(record.issues.len(), 2);
    assert_eq!(store.version_info("rigA", 1).unwrap().light_count, 2);
}
