//! Error types for light-rig store and scene operations.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for light-rig operations.
#[derive(Error, Debug)]
pub enum RigError {
    // Storage errors
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode snapshot record{}: {reason}", path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    Decode {
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("Failed to encode snapshot record: {0}")]
    Encode(String),

    #[error("Asset not found: {asset}")]
    AssetNotFound { asset: String },

    #[error("Version {version} of asset '{asset}' not found")]
    VersionNotFound { asset: String, version: u32 },

    #[error("Could not allocate a new version for '{asset}' after {attempts} attempts")]
    VersionAllocation { asset: String, attempts: u32 },

    #[error("Invalid asset name '{name}': {reason}")]
    InvalidAssetName { name: String, reason: String },

    // Scene errors
    #[error("Scene operation on '{object}' failed: {reason}")]
    SceneOperation { object: String, reason: String },

    #[error("Scene file error ({path}): {reason}")]
    SceneFile { path: String, reason: String },

    #[error("No lights selected in the scene")]
    NothingSelected,

    // Workflow errors
    #[error("Publishing '{asset}' failed")]
    PublishFailed { asset: String },

    #[error("No lights could be created from '{asset}' v{version}")]
    ApplyFailed { asset: String, version: u32 },

    // Configuration errors
    #[error("Could not determine the {0} directory")]
    NoDataDir(&'static str),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RigError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Build a scene failure for a specific object.
    pub fn scene(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SceneOperation {
            object: object.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. }
                | Self::VersionNotFound { .. }
                | Self::InvalidAssetName { .. }
                | Self::NothingSelected
                | Self::SceneFile { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::AssetNotFound { .. } => Some("Run: lrig assets"),
            Self::VersionNotFound { .. } => Some("Run: lrig versions <ASSET>"),
            Self::NothingSelected => Some("Select lights in the scene or pass --select <NAME>"),
            Self::InvalidAssetName { .. } => Some("Use a plain directory-safe name"),
            Self::SceneFile { .. } => Some("Write a sample scene: lrig init-scene <FILE>"),
            Self::NoDataDir(_) => Some("Pass --home <DIR> or set LRIG_HOME"),
            Self::Storage { .. } | Self::PublishFailed { .. } => {
                Some("Check that the store root is writable: lrig root")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using RigError.
pub type Result<T> = std::result::Result<T, RigError>;
