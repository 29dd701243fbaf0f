//! Store root redirection.
//!
//! A small JSON record in the base directory can point the store at another
//! folder:
//!
//! ```text
//! <base>/env.json        {"custom_path": "/mnt/show/lighting"}
//! ```
//!
//! When present and non-empty, the store root becomes
//! `<custom_path>/Published_lights`. The record is read once when a store is
//! opened; rewriting it only affects stores opened afterwards.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, RigError};

/// File name of the override record inside the base directory.
pub const OVERRIDE_FILE: &str = "env.json";

/// Folder created under a custom path to hold published assets.
pub const PUBLISHED_DIR: &str = "Published_lights";

/// Contents of the override record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_path: Option<String>,
}

impl PathOverride {
    /// The redirect target, ignoring empty values.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.custom_path.as_deref().filter(|p| !p.is_empty())
    }
}

/// Path of the override record for a base directory.
#[must_use]
pub fn override_path(base: &Path) -> PathBuf {
    base.join(OVERRIDE_FILE)
}

/// Read the override record, if one exists.
///
/// Returns `Ok(None)` when the file is absent.
pub fn read_path_override(base: &Path) -> Result<Option<PathOverride>> {
    let path = override_path(base);
    let contents = match fs::read(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RigError::storage(&path, e)),
    };

    serde_json::from_slice(&contents)
        .map(Some)
        .map_err(|e| RigError::Decode {
            path: Some(path),
            reason: e.to_string(),
        })
}

/// Write a new override record into the base directory.
#[instrument(skip_all, fields(base = %base.display(), custom_path = custom_path))]
pub fn write_path_override(base: &Path, custom_path: &str) -> Result<PathBuf> {
    fs::create_dir_all(base).map_err(|e| RigError::storage(base, e))?;

    let path = override_path(base);
    let record = PathOverride {
        custom_path: Some(custom_path.to_string()),
    };
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| RigError::Encode(e.to_string()))?;
    fs::write(&path, json).map_err(|e| RigError::storage(&path, e))?;

    info!(path = %path.display(), custom_path, "Store root override written");
    Ok(path)
}

/// Remove the override record. Returns whether one existed.
pub fn clear_path_override(base: &Path) -> Result<bool> {
    let path = override_path(base);
    match fs::remove_file(&path) {
        Ok(()) => {
            info!(path = %path.display(), "Store root override removed");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(RigError::storage(&path, e)),
    }
}

/// Resolve and create the store root for a base directory.
///
/// A broken override record is logged and ignored; only failing to create
/// the chosen root is an error.
#[instrument(skip_all, fields(base = %base.display()))]
pub fn resolve_store_root(base: &Path) -> Result<PathBuf> {
    let custom = match read_path_override(base) {
        Ok(record) => record.and_then(|r| r.target().map(PathBuf::from)),
        Err(e) => {
            warn!(error = %e, "Could not read store root override, using default");
            None
        }
    };

    let root = match custom {
        Some(custom) => custom.join(PUBLISHED_DIR),
        None => base.to_path_buf(),
    };

    fs::create_dir_all(&root).map_err(|e| RigError::storage(&root, e))?;
    debug!(root = %root.display(), "Store root resolved");
    Ok(root)
}
