//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Light rig store - publish and restore versioned light setups.
///
/// Robot Mode: Use --robot or --format json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "lrig", version, about, long_about = None)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "LRIG_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Base directory holding the store and its root override
    #[arg(long, global = true, env = "LRIG_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Browsing ===
    /// List published assets
    #[command(visible_alias = "ls")]
    Assets,

    /// List the versions of an asset, newest first
    Versions(VersionsArgs),

    /// Show details about a stored version
    Info(InfoArgs),

    // === Publish & Load ===
    /// Capture lights from a scene file as a new version
    Publish(PublishArgs),

    /// Recreate a stored version's lights in a scene file
    Load(LoadArgs),

    // === Store Location ===
    /// Show where assets are stored
    Root,

    /// Redirect the store to <PATH>/Published_lights
    SetRoot(SetRootArgs),

    // === Utilities ===
    /// Write a sample three-light scene file
    InitScene(InitSceneArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Asset name
    pub asset: String,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Asset name
    pub asset: String,

    /// Version number (defaults to the latest)
    #[arg(long)]
    pub version: Option<u32>,
}

/// Arguments for publishing.
///
/// # Examples
///
/// ```bash
/// # Publish the lights selected in the scene file
/// lrig publish rigA --scene shot.json --description "key from left"
///
/// # Publish specific objects regardless of the stored selection
/// lrig publish rigA --scene shot.json --select key --select rim
/// ```
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Asset name
    pub asset: String,

    /// Scene file to capture from
    #[arg(long, short = 's', value_name = "FILE")]
    pub scene: PathBuf,

    /// Free-text description stored with the version
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Objects to capture instead of the scene's selection
    #[arg(long, value_name = "NAME")]
    pub select: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Asset name
    pub asset: String,

    /// Version number (defaults to the latest)
    #[arg(long)]
    pub version: Option<u32>,

    /// Scene file to create the lights in (updated in place)
    #[arg(long, short = 's', value_name = "FILE")]
    pub scene: PathBuf,
}

#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["path", "clear"])))]
pub struct SetRootArgs {
    /// Folder to publish into (Published_lights is created inside it)
    pub path: Option<PathBuf>,

    /// Remove the redirect and use the default location again
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct InitSceneArgs {
    /// Scene file to write
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
