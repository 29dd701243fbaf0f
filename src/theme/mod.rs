//! Theme system for human-mode output.

use console::Style;

/// Visual theme for `lrig` human-mode output.
///
/// Centralizes colors and styles for consistent rendering. Styles degrade
/// to plain text when colors are disabled globally.
pub struct RigTheme {
    // Brand colors
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub asset_name: Style,
    pub version: Style,
    pub path: Style,
}

impl Default for RigTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().color256(33),
            success: Style::new().color256(41),
            error: Style::new().color256(203),
            warning: Style::new().color256(214),
            muted: Style::new().color256(245),
            header: Style::new().bold().color256(33),
            label: Style::new().dim(),
            value: Style::new().bold(),
            asset_name: Style::new().bold().color256(214),
            version: Style::new().bold().color256(41),
            path: Style::new().italic().color256(245),
        }
    }
}
