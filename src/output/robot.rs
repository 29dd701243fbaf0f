//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::RigError;
use crate::session::{LoadReport, PublishReport};
use crate::store::{AssetSummary, VersionInfo};

use super::{BuildInfo, Output, RobotFormat, RootStatus};

/// JSON output implementation for AI agents and scripting.
///
/// Results go to stdout, errors to stderr; one JSON document per call.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let rendered = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        rendered.unwrap_or_else(|e| {
            serde_json::json!({ "error": true, "message": format!("serialization failed: {e}") })
                .to_string()
        })
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }

    /// Output JSON to stderr.
    fn output_json_stderr<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON error serialized");
        eprintln!("{json}");
    }
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Robot: success");
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &RigError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Robot: warning");
        self.output_json_stderr(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Robot: info");
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    #[instrument(skip(self, assets), fields(count = assets.len()))]
    fn asset_list(&self, root: &Path, assets: &[AssetSummary]) {
        debug!("Robot: asset_list");
        self.output_json(&serde_json::json!({
            "root": root,
            "assets": assets,
        }));
    }

    #[instrument(skip(self, versions), fields(count = versions.len()))]
    fn version_list(&self, asset: &str, versions: &[u32]) {
        debug!("Robot: version_list");
        self.output_json(&serde_json::json!({
            "asset": asset,
            "versions": versions,
            "latest": versions.first(),
        }));
    }

    #[instrument(skip(self, info), fields(asset = %info.asset, version = info.version))]
    fn version_info(&self, info: &VersionInfo) {
        debug!("Robot: version_info");
        self.output_json(info);
    }

    #[instrument(skip(self, report), fields(asset = %report.asset, version = report.version))]
    fn published(&self, report: &PublishReport) {
        debug!("Robot: published");
        self.output_json(report);
    }

    #[instrument(skip(self, report), fields(asset = %report.asset, version = report.version))]
    fn loaded(&self, report: &LoadReport) {
        debug!("Robot: loaded");
        self.output_json(report);
    }

    #[instrument(skip(self, status))]
    fn store_root(&self, status: &RootStatus) {
        debug!("Robot: store_root");
        self.output_json(status);
    }

    #[instrument(skip(self))]
    fn root_override_set(&self, override_file: &Path, new_root: &Path) {
        debug!("Robot: root_override_set");
        self.output_json(&serde_json::json!({
            "override_file": override_file,
            "root": new_root,
            "ok": true
        }));
    }

    #[instrument(skip(self))]
    fn root_override_cleared(&self, existed: bool) {
        debug!("Robot: root_override_cleared");
        self.output_json(&serde_json::json!({ "cleared": existed, "ok": true }));
    }

    #[instrument(skip(self))]
    fn scene_written(&self, path: &Path, lights: usize) {
        debug!("Robot: scene_written");
        self.output_json(&serde_json::json!({
            "scene": path,
            "lights": lights,
            "ok": true
        }));
    }

    #[instrument(skip(self, info))]
    fn build_info(&self, info: &BuildInfo) {
        debug!("Robot: build_info");
        self.output_json(info);
    }
}
