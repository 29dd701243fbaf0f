//! Path resolution helpers for the store location.
//!
//! Supports absolute paths, "~" home directory expansion, and the default
//! per-user data directory.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, RigError};

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "lrig";

/// Expand a leading `~` to the home directory.
///
/// Other paths are returned unchanged.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    trace!(path = %path.display(), "Expanding path");

    let path_str = path.to_string_lossy();
    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() {
            home
        } else {
            home.join(rest)
        };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    Ok(path.to_path_buf())
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(RigError::NoDataDir("home"))
}

/// Returns the default base directory.
///
/// Location: `~/.local/share/lrig/` (platform equivalent elsewhere).
pub fn default_base_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or(RigError::NoDataDir("local data"))?;
    Ok(data_dir.join(APP_DIR_NAME))
}

/// Pick the base directory: an explicit one (flag or `LRIG_HOME`) wins over
/// the default.
pub fn resolve_base_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => expand_home(path),
        None => default_base_dir(),
    }
}

/// Check that an asset name can be used as a single directory segment.
///
/// The store itself uses names verbatim; this is for callers accepting
/// names from users.
pub fn validate_asset_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative directory reference")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RigError::InvalidAssetName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
