//! Human-friendly output implementation using console styling.

use std::path::Path;

use console::{Alignment, Term, pad_str};
use tracing::{debug, instrument, trace};

use crate::error::RigError;
use crate::rig::Diagnostic;
use crate::session::{LoadReport, PublishReport};
use crate::store::{AssetSummary, VersionInfo};
use crate::theme::RigTheme;

use super::{BuildInfo, Output, RootStatus};

/// Width of the label column in key/value blocks.
const LABEL_WIDTH: usize = 12;

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    term: Term,
    stderr: Term,
    theme: RigTheme,
}

impl HumanOutput {
    #[instrument(skip(term))]
    pub fn new(term: Term) -> Self {
        debug!("Creating HumanOutput");
        Self {
            term,
            stderr: Term::stderr(),
            theme: RigTheme::default(),
        }
    }

    fn line(&self, text: &str) {
        if let Err(e) = self.term.write_line(text) {
            trace!(error = %e, "stdout write failed");
        }
    }

    fn err_line(&self, text: &str) {
        if let Err(e) = self.stderr.write_line(text) {
            trace!(error = %e, "stderr write failed");
        }
    }

    /// `  Label       value`
    fn field(&self, label: &str, value: &str) {
        let label = pad_str(label, LABEL_WIDTH, Alignment::Left, None);
        self.line(&format!(
            "  {}{}",
            self.theme.label.apply_to(label),
            self.theme.value.apply_to(value)
        ));
    }

    fn header(&self, title: &str) {
        self.line(&self.theme.header.apply_to(title).to_string());
    }

    fn diagnostics(&self, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        self.warning(&format!("{} value(s) could not be transferred:", diagnostics.len()));
        for diagnostic in diagnostics {
            self.err_line(&format!("    {}", self.theme.muted.apply_to(diagnostic)));
        }
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Outputting success");
        self.line(&format!(
            "{}{message}",
            self.theme.success.clone().bold().apply_to("[OK] ")
        ));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &RigError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        self.err_line(&format!(
            "{}{}",
            self.theme.error.clone().bold().apply_to("[ERR] "),
            console::style(error).bold()
        ));

        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            self.err_line(&format!(
                "      {}",
                self.theme.muted.apply_to(format!("Suggestion: {suggestion}"))
            ));
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Outputting warning");
        self.err_line(&format!(
            "{}{message}",
            self.theme.warning.clone().bold().apply_to("[WARN] ")
        ));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Outputting info");
        self.line(&format!(
            "{}{message}",
            self.theme.accent.clone().bold().apply_to("[INFO] ")
        ));
    }

    #[instrument(skip(self, assets), fields(count = assets.len()))]
    fn asset_list(&self, root: &Path, assets: &[AssetSummary]) {
        debug!("Outputting asset list");
        if assets.is_empty() {
            self.info(&format!("No assets published under {}", root.display()));
            return;
        }

        self.header("Published assets:");
        let width = assets.iter().map(|a| a.name.len()).max().unwrap_or(0);
        for asset in assets {
            let latest = asset
                .latest_version
                .map_or_else(|| "-".to_string(), |v| format!("v{v}"));
            self.line(&format!(
                "  {}  {} {}",
                self.theme
                    .asset_name
                    .apply_to(pad_str(&asset.name, width, Alignment::Left, None)),
                self.theme.version.apply_to(latest),
                self.theme
                    .muted
                    .apply_to(format!("({} versions)", asset.version_count))
            ));
        }
        self.line(&format!("  {}", self.theme.path.apply_to(root.display())));
    }

    #[instrument(skip(self, versions), fields(count = versions.len()))]
    fn version_list(&self, asset: &str, versions: &[u32]) {
        debug!(asset, "Outputting version list");
        self.header(&format!("Versions of {asset}:"));
        for (idx, version) in versions.iter().enumerate() {
            let marker = if idx == 0 { " (latest)" } else { "" };
            self.line(&format!(
                "  {}{}",
                self.theme.version.apply_to(format!("v{version}")),
                self.theme.muted.apply_to(marker)
            ));
        }
    }

    #[instrument(skip(self, info), fields(asset = %info.asset, version = info.version))]
    fn version_info(&self, info: &VersionInfo) {
        debug!("Outputting version info");
        self.header(&format!("{} v{}", info.asset, info.version));
        if let Some(created) = info.created_at {
            self.field("Created", &created.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        if let Some(published) = &info.published {
            self.field("Published", published);
        }
        let description = if info.description.is_empty() {
            "(none)"
        } else {
            info.description.as_str()
        };
        self.field("Description", description);
        self.field("Lights", &info.light_count.to_string());
        self.field("Path", &info.path.display().to_string());
    }

    #[instrument(skip(self, report), fields(asset = %report.asset, version = report.version))]
    fn published(&self, report: &PublishReport) {
        debug!("Outputting publish result");
        self.success(&format!(
            "Published {} v{} ({} lights)",
            report.asset, report.version, report.light_count
        ));
        self.line(&format!("  {}", self.theme.path.apply_to(report.path.display())));
        if !report.skipped.is_empty() {
            self.warning(&format!("Skipped without a shape: {}", report.skipped.join(", ")));
        }
        self.diagnostics(&report.diagnostics);
    }

    #[instrument(skip(self, report), fields(asset = %report.asset, version = report.version))]
    fn loaded(&self, report: &LoadReport) {
        debug!("Outputting load result");
        let apply = &report.apply;
        if apply.is_success() {
            self.success(&format!(
                "Loaded {} v{}: {} lights created",
                report.asset,
                report.version,
                apply.created.len()
            ));
        }
        for light in &apply.created {
            let renamed = if light.node == light.source {
                String::new()
            } else {
                format!(" (from {})", light.source)
            };
            self.line(&format!(
                "  {} {}{}",
                self.theme.value.apply_to(&light.node),
                self.theme.muted.apply_to(light.kind.node_type()),
                self.theme.muted.apply_to(renamed)
            ));
        }
        if !apply.failed.is_empty() {
            self.warning(&format!("Could not create: {}", apply.failed.join(", ")));
        }
        self.diagnostics(&apply.diagnostics);
    }

    #[instrument(skip(self, status))]
    fn store_root(&self, status: &RootStatus) {
        debug!("Outputting store root");
        self.field("Root", &status.root.display().to_string());
        self.field("Base", &status.base.display().to_string());
        if let Some(custom) = &status.custom_path {
            self.field("Redirect", custom);
        }
    }

    #[instrument(skip(self))]
    fn root_override_set(&self, override_file: &Path, new_root: &Path) {
        debug!("Outputting root override");
        self.success(&format!("Assets will be published to {}", new_root.display()));
        self.line(&format!("  {}", self.theme.path.apply_to(override_file.display())));
    }

    #[instrument(skip(self))]
    fn root_override_cleared(&self, existed: bool) {
        debug!(existed, "Outputting root override cleared");
        if existed {
            self.success("Store root redirect removed");
        } else {
            self.info("No store root redirect was set");
        }
    }

    #[instrument(skip(self))]
    fn scene_written(&self, path: &Path, lights: usize) {
        debug!("Outputting scene written");
        self.success(&format!("Wrote {} ({lights} lights)", path.display()));
    }

    #[instrument(skip(self, info))]
    fn build_info(&self, info: &BuildInfo) {
        debug!(version = info.version, "Outputting build info");
        self.header("lrig");
        self.field("Version", info.version);

        if let Some(sha) = info.git_sha {
            let dirty = if info.is_dirty() {
                self.theme.warning.apply_to(" (dirty)").to_string()
            } else {
                String::new()
            };
            let label = pad_str("Git SHA", LABEL_WIDTH, Alignment::Left, None);
            self.line(&format!(
                "  {}{}{dirty}",
                self.theme.label.apply_to(label),
                self.theme.value.apply_to(sha)
            ));
        }
        if let Some(time) = info.build_timestamp {
            self.field("Built", time);
        }
        if let Some(rustc) = info.rustc_version {
            self.field("Rust", rustc);
        }
        if let Some(target) = info.target {
            self.field("Target", target);
        }
    }
}
