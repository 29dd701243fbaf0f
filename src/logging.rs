//! Structured logging initialization for the light-rig CLI.
//!
//! Supports both human-friendly and machine-readable (JSON) output formats,
//! with proper TTY detection and verbosity control.

use std::io::{self, IsTerminal};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter directive for the given verbosity flags.
fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "lrig=error";
    }
    match verbose {
        0 => "lrig=info",
        1 => "lrig=debug",
        _ => "lrig=trace",
    }
}

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// # Arguments
///
/// * `robot_mode` - If true, output structured JSON logs for machine consumption
/// * `verbose` - Verbosity level: 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - If true, suppress non-essential output (only errors)
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override default filter (e.g., "lrig=debug")
///
/// # Output Behavior
///
/// | Mode | TTY | Output |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Pretty colored output to stderr |
/// | Human | no | Compact plain output to stderr |
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    // Allow RUST_LOG to override, but use our default otherwise
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let registry = tracing_subscriber::registry().with(filter);

    if robot_mode {
        // JSON lines so agents can parse diagnostics alongside stdout results
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_span_events(FmtSpan::NONE)
                    .with_writer(io::stderr),
            )
            .init();
        return;
    }

    let base = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr);

    if io::stderr().is_terminal() {
        registry.with(base).init();
    } else {
        // Piped or redirected: plain single-line records
        registry.with(base.with_ansi(false).compact()).init();
    }
}
