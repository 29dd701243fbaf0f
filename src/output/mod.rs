//! Output mode abstraction for robot and human output.

use std::path::{Path, PathBuf};

use console::Term;
use serde::Serialize;

use crate::cli::Cli;
use crate::error::RigError;
use crate::session::{LoadReport, PublishReport};
use crate::store::{AssetSummary, VersionInfo};

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// Where the store lives and why.
#[derive(Debug, Clone, Serialize)]
pub struct RootStatus {
    /// Base directory (`--home`, `LRIG_HOME` or the platform default).
    pub base: PathBuf,
    /// Resolved store root.
    pub root: PathBuf,
    /// Redirect target from the override record, if one is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_path: Option<String>,
}

impl RootStatus {
    /// Returns true if the root comes from an override record.
    pub fn is_redirected(&self) -> bool {
        self.custom_path.is_some()
    }
}

/// Build metadata shown by `lrig version`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_timestamp: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rustc_version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
}

impl BuildInfo {
    /// Metadata captured at compile time.
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_sha: option_env!("VERGEN_GIT_SHA"),
            git_dirty: option_env!("VERGEN_GIT_DIRTY"),
            build_timestamp: option_env!("VERGEN_BUILD_TIMESTAMP"),
            rustc_version: option_env!("VERGEN_RUSTC_SEMVER"),
            target: option_env!("VERGEN_CARGO_TARGET_TRIPLE"),
        }
    }

    /// Returns true if the build came from a modified tree.
    pub fn is_dirty(&self) -> bool {
        self.git_dirty == Some("true")
    }
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human(Term),
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            if cli.no_color {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
            }
            Self::Human(Term::stdout())
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human(term) => Box::new(HumanOutput::new(term)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &RigError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Browsing
    fn asset_list(&self, root: &Path, assets: &[AssetSummary]);
    fn version_list(&self, asset: &str, versions: &[u32]);
    fn version_info(&self, info: &VersionInfo);

    // Workflows
    fn published(&self, report: &PublishReport);
    fn loaded(&self, report: &LoadReport);

    // Store location
    fn store_root(&self, status: &RootStatus);
    fn root_override_set(&self, override_file: &Path, new_root: &Path);
    fn root_override_cleared(&self, existed: bool);

    // Utilities
    fn scene_written(&self, path: &Path, lights: usize);
    fn build_info(&self, info: &BuildInfo);
}
