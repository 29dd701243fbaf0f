//! Publish and load workflows.
//!
//! A [`Session`] owns the store for one base directory and ties the scene
//! side (collector, applier) to it. The CLI creates exactly one per run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::{clear_path_override, validate_asset_name, write_path_override};
use crate::error::{Result, RigError};
use crate::rig::{ApplyReport, Diagnostic, apply_record, collect_lights, filter_lights, selected_lights};
use crate::scene::SceneApi;
use crate::store::{AssetStore, VersionInfo};

/// Outcome of [`Session::publish`].
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub asset: String,
    pub version: u32,
    /// Path of the written record.
    pub path: PathBuf,
    pub light_count: usize,
    /// Lights left out because their shape could not be resolved.
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of [`Session::load`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub asset: String,
    pub version: u32,
    #[serde(flatten)]
    pub apply: ApplyReport,
}

impl LoadReport {
    /// At least one light was created.
    pub fn is_success(&self) -> bool {
        self.apply.is_success()
    }
}

/// Store handle plus the workflows built on it.
#[derive(Debug, Clone)]
pub struct Session {
    base: PathBuf,
    store: AssetStore,
}

impl Session {
    /// Open the store for `base`, honouring its override record.
    pub fn open(base: &Path) -> Result<Self> {
        Ok(Self {
            base: base.to_path_buf(),
            store: AssetStore::open(base)?,
        })
    }

    /// Base directory the session was opened with.
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Lights among the scene's current selection.
    pub fn selected_lights(&self, scene: &dyn SceneApi) -> Result<Vec<String>> {
        selected_lights(scene)
    }

    /// Capture lights and store them as a new version of `asset`.
    ///
    /// Uses `selection` when given, the scene's selection otherwise. Only
    /// objects whose shape is a light are captured.
    ///
    /// # Errors
    ///
    /// Fails for an invalid asset name, when no lights are selected, when
    /// none of them could be captured, or when the store write fails.
    #[instrument(skip(self, scene, description, selection))]
    pub fn publish(
        &self,
        scene: &dyn SceneApi,
        asset: &str,
        description: &str,
        selection: Option<&[String]>,
    ) -> Result<PublishReport> {
        validate_asset_name(asset)?;

        let lights = match selection {
            Some(objects) => filter_lights(scene, objects),
            None => selected_lights(scene)?,
        };
        if lights.is_empty() {
            return Err(RigError::NothingSelected);
        }

        let collection = collect_lights(scene, &lights);
        if collection.is_empty() {
            warn!(asset, selected = lights.len(), "No selected light could be captured");
            return Err(RigError::PublishFailed {
                asset: asset.to_string(),
            });
        }

        let light_count = collection.light_count();
        let mut record = collection.record.with_description(description);
        let version = self.store.write_snapshot(asset, &mut record)?;

        Ok(PublishReport {
            asset: asset.to_string(),
            version,
            path: self.store.record_path(asset, version),
            light_count,
            skipped: collection.skipped,
            diagnostics: collection.diagnostics,
        })
    }

    /// Recreate a stored version's lights in `scene`.
    ///
    /// Loads the latest version when `version` is `None`. A record that
    /// reads fine but produces no lights is reported through
    /// [`LoadReport::is_success`], not as an error.
    #[instrument(skip(self, scene))]
    pub fn load(
        &self,
        scene: &mut dyn SceneApi,
        asset: &str,
        version: Option<u32>,
    ) -> Result<LoadReport> {
        validate_asset_name(asset)?;
        let version = self.resolve_version(asset, version)?;

        let record = self
            .store
            .read_snapshot(asset, version)
            .ok_or_else(|| RigError::VersionNotFound {
                asset: asset.to_string(),
                version,
            })?;

        let apply = apply_record(scene, &record);
        info!(asset, version, created = apply.created.len(), "Load finished");
        Ok(LoadReport {
            asset: asset.to_string(),
            version,
            apply,
        })
    }

    /// Details about a stored version (latest when `version` is `None`).
    pub fn info(&self, asset: &str, version: Option<u32>) -> Result<VersionInfo> {
        validate_asset_name(asset)?;
        let version = self.resolve_version(asset, version)?;
        self.store
            .version_info(asset, version)
            .ok_or_else(|| RigError::VersionNotFound {
                asset: asset.to_string(),
                version,
            })
    }

    /// Versions of an existing asset, newest first.
    pub fn versions(&self, asset: &str) -> Result<Vec<u32>> {
        validate_asset_name(asset)?;
        let versions = self.store.list_versions(asset);
        if versions.is_empty() {
            return Err(RigError::AssetNotFound {
                asset: asset.to_string(),
            });
        }
        Ok(versions)
    }

    /// Redirect future sessions to `<custom_path>/Published_lights`.
    pub fn set_root_override(&self, custom_path: &str) -> Result<PathBuf> {
        write_path_override(&self.base, custom_path)
    }

    /// Remove the redirect; returns whether one existed.
    pub fn clear_root_override(&self) -> Result<bool> {
        clear_path_override(&self.base)
    }

    fn resolve_version(&self, asset: &str, version: Option<u32>) -> Result<u32> {
        let latest = self
            .store
            .latest_version(asset)
            .ok_or_else(|| RigError::AssetNotFound {
                asset: asset.to_string(),
            })?;
        Ok(version.unwrap_or(latest))
    }
}
