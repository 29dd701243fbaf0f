//! Filesystem-backed asset/version registry.
//!
//! Every publish lands in a fresh, numbered directory:
//!
//! ```text
//! <root>/<asset>/<version>/<asset>.json
//! ```
//!
//! Versions are allocated as `max(existing) + 1` and never reused.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, error, info, instrument, trace, warn};

use super::codec::{self, RECORD_EXTENSION};
use super::schema::{AssetSummary, SnapshotRecord, VersionInfo};
use crate::config::{default_base_dir, resolve_store_root};
use crate::error::{Result, RigError};

/// Upper bound on retries when another writer grabs the same version number.
const MAX_ALLOCATION_ATTEMPTS: u32 = 32;

/// Versioned snapshot store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Opens the store for the default per-user base directory.
    #[instrument]
    pub fn open_default() -> Result<Self> {
        let base = default_base_dir()?;
        Self::open(&base)
    }

    /// Opens the store for a base directory, honouring its override record.
    #[instrument(skip_all, fields(base = %base.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(base: P) -> Result<Self> {
        let root = resolve_store_root(base.as_ref())?;
        info!(root = %root.display(), "Asset store ready");
        Ok(Self { root })
    }

    /// Opens a store directly at `root`, without override lookup.
    pub fn at_root<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RigError::storage(&root, e))?;
        Ok(Self { root })
    }

    /// The resolved store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Asset names under the root, sorted.
    ///
    /// Plain files are ignored. An unreadable root yields an empty list.
    pub fn list_assets(&self) -> Vec<String> {
        let mut assets = subdirectory_names(&self.root);
        assets.sort();
        assets
    }

    /// Versions of an asset, newest first.
    ///
    /// Subdirectories whose names are not plain digits are skipped.
    pub fn list_versions(&self, asset: &str) -> Vec<u32> {
        let mut versions: Vec<u32> = subdirectory_names(&self.root.join(asset))
            .iter()
            .filter_map(|name| parse_version(name))
            .collect();
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions
    }

    /// Highest existing version of an asset.
    pub fn latest_version(&self, asset: &str) -> Option<u32> {
        self.list_versions(asset).first().copied()
    }

    /// Summaries of every asset (for listing).
    pub fn summaries(&self) -> Vec<AssetSummary> {
        self.list_assets()
            .into_iter()
            .map(|name| {
                let versions = self.list_versions(&name);
                AssetSummary {
                    version_count: versions.len(),
                    latest_version: versions.first().copied(),
                    name,
                }
            })
            .collect()
    }

    /// Directory of a version. Pure path computation.
    pub fn version_path(&self, asset: &str, version: u32) -> PathBuf {
        self.root.join(asset).join(version.to_string())
    }

    /// Record file of a version. Pure path computation.
    pub fn record_path(&self, asset: &str, version: u32) -> PathBuf {
        self.version_path(asset, version)
            .join(format!("{asset}.{RECORD_EXTENSION}"))
    }

    /// Create the next version directory and return its number.
    ///
    /// The version directory is created exclusively: if another writer
    /// claimed the number first, the next free number is tried instead.
    #[instrument(skip(self))]
    pub fn allocate_version(&self, asset: &str) -> Result<u32> {
        let asset_dir = self.root.join(asset);
        fs::create_dir_all(&asset_dir).map_err(|e| RigError::storage(&asset_dir, e))?;

        let mut candidate = self.latest_version(asset).map_or(1, |v| v.saturating_add(1));
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let path = self.version_path(asset, candidate);
            match fs::create_dir(&path) {
                Ok(()) => {
                    debug!(version = candidate, attempt, "Allocated version directory");
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    trace!(version = candidate, "Version taken, retrying");
                    let latest = self.latest_version(asset).unwrap_or(0);
                    candidate = latest.max(candidate).saturating_add(1);
                }
                Err(e) => return Err(RigError::storage(&path, e)),
            }
        }

        Err(RigError::VersionAllocation {
            asset: asset.to_string(),
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Publish `record` as a new version of `asset`.
    ///
    /// Stamps publish metadata onto `record`. Failures are logged and
    /// returned; nothing is retried.
    #[instrument(skip(self, record), fields(lights = record.lights.len()))]
    pub fn write_snapshot(&self, asset: &str, record: &mut SnapshotRecord) -> Result<u32> {
        match self.try_write_snapshot(asset, record) {
            Ok(version) => {
                info!(asset, version, "Snapshot published");
                Ok(version)
            }
            Err(e) => {
                error!(asset, error = %e, "Failed to publish snapshot");
                Err(e)
            }
        }
    }

    fn try_write_snapshot(&self, asset: &str, record: &mut SnapshotRecord) -> Result<u32> {
        let bytes = codec::encode(record, asset)?;
        let version = self.allocate_version(asset)?;
        let path = self.record_path(asset, version);

        // Records are write-once.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| RigError::storage(&path, e))?;
        file.write_all(&bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| RigError::storage(&path, e))?;

        Ok(version)
    }

    /// Load a stored record.
    ///
    /// Returns `None` when the version or its file does not exist, or when
    /// the file cannot be read or decoded (the cause is logged).
    #[instrument(skip(self))]
    pub fn read_snapshot(&self, asset: &str, version: u32) -> Option<SnapshotRecord> {
        let path = self.record_path(asset, version);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No record at path");
                return None;
            }
            Err(e) => {
                warn!(error = %RigError::storage(&path, e), "Failed to read snapshot");
                return None;
            }
        };

        match codec::decode(&bytes) {
            Ok(record) => {
                if !record.issues.is_empty() {
                    warn!(
                        path = %path.display(),
                        dropped = record.issues.len(),
                        "Snapshot has entries or values that could not be decoded"
                    );
                }
                debug!(lights = record.lights.len(), "Snapshot loaded");
                Some(record)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to decode snapshot");
                None
            }
        }
    }

    /// File and record details for one version.
    pub fn version_info(&self, asset: &str, version: u32) -> Option<VersionInfo> {
        let path = self.record_path(asset, version);
        let metadata = fs::metadata(&path).ok()?;
        let created_at = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::<Local>::from);

        let record = self.read_snapshot(asset, version);
        Some(VersionInfo {
            asset: asset.to_string(),
            version,
            created_at,
            published: record.as_ref().and_then(|r| r.published.clone()),
            description: record
                .as_ref()
                .map(|r| r.description.clone())
                .unwrap_or_default(),
            light_count: record.as_ref().map_or(0, SnapshotRecord::light_count),
            path,
        })
    }
}

/// Names of the directories directly inside `dir`.
fn subdirectory_names(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to list directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}

/// Parse a version directory name: ASCII digits only.
fn parse_version(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
