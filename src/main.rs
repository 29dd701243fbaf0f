//! Light rig CLI - publish and restore versioned light setups.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;

use clap::{CommandFactory, Parser};
use console::style;
use serde::Serialize;
use tracing::{debug, instrument};

use lrig::cli::{self, Cli, Commands};
use lrig::config::{expand_home, read_path_override, resolve_base_dir};
use lrig::error::{Result, RigError};
use lrig::logging::init_logging;
use lrig::output::{BuildInfo, Output, OutputMode, RootStatus};
use lrig::scene::mock::MemoryScene;
use lrig::session::Session;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let output = OutputMode::from_cli(&cli).into_output();
    if let Err(e) = run(&cli, output.as_ref()) {
        output.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, output: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Assets) => cmd_assets(cli, output),
        Some(Commands::Versions(args)) => cmd_versions(cli, output, args),
        Some(Commands::Info(args)) => cmd_info(cli, output, args),
        Some(Commands::Publish(args)) => cmd_publish(cli, output, args),
        Some(Commands::Load(args)) => cmd_load(cli, output, args),
        Some(Commands::Root) => cmd_root(cli, output),
        Some(Commands::SetRoot(args)) => cmd_set_root(cli, output, args),
        Some(Commands::InitScene(args)) => cmd_init_scene(output, args),
        Some(Commands::Version) => {
            output.build_info(&BuildInfo::current());
            Ok(())
        }
        Some(Commands::Completions(args)) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "lrig", &mut io::stdout());
            Ok(())
        }
    }
}

fn open_session(cli: &Cli) -> Result<Session> {
    let base = resolve_base_dir(cli.home.as_deref())?;
    debug!(base = %base.display(), "Opening session");
    Session::open(&base)
}

// === Commands ===

fn cmd_assets(cli: &Cli, output: &dyn Output) -> Result<()> {
    let session = open_session(cli)?;
    output.asset_list(session.store().root(), &session.store().summaries());
    Ok(())
}

fn cmd_versions(cli: &Cli, output: &dyn Output, args: &cli::VersionsArgs) -> Result<()> {
    let session = open_session(cli)?;
    let versions = session.versions(&args.asset)?;
    output.version_list(&args.asset, &versions);
    Ok(())
}

fn cmd_info(cli: &Cli, output: &dyn Output, args: &cli::InfoArgs) -> Result<()> {
    let session = open_session(cli)?;
    let info = session.info(&args.asset, args.version)?;
    output.version_info(&info);
    Ok(())
}

#[instrument(skip_all, fields(asset = %args.asset, scene = %args.scene.display()))]
fn cmd_publish(cli: &Cli, output: &dyn Output, args: &cli::PublishArgs) -> Result<()> {
    let session = open_session(cli)?;
    let scene = MemoryScene::load(&args.scene)?;
    let selection = (!args.select.is_empty()).then_some(args.select.as_slice());

    let report = session.publish(&scene, &args.asset, &args.description, selection)?;
    output.published(&report);
    Ok(())
}

#[instrument(skip_all, fields(asset = %args.asset, scene = %args.scene.display()))]
fn cmd_load(cli: &Cli, output: &dyn Output, args: &cli::LoadArgs) -> Result<()> {
    let session = open_session(cli)?;
    let mut scene = MemoryScene::load(&args.scene)?;

    let report = session.load(&mut scene, &args.asset, args.version)?;
    output.loaded(&report);
    if !report.is_success() {
        return Err(RigError::ApplyFailed {
            asset: report.asset,
            version: report.version,
        });
    }
    scene.save(&args.scene)
}

fn cmd_root(cli: &Cli, output: &dyn Output) -> Result<()> {
    let session = open_session(cli)?;
    let custom_path = read_path_override(session.base())
        .ok()
        .flatten()
        .and_then(|record| record.target().map(str::to_string));

    output.store_root(&RootStatus {
        base: session.base().to_path_buf(),
        root: session.store().root().to_path_buf(),
        custom_path,
    });
    Ok(())
}

fn cmd_set_root(cli: &Cli, output: &dyn Output, args: &cli::SetRootArgs) -> Result<()> {
    let session = open_session(cli)?;
    match &args.path {
        Some(path) if !args.clear => {
            let target = std::path::absolute(expand_home(path)?)?;
            let override_file = session.set_root_override(&target.display().to_string())?;
            // Opening again resolves (and creates) the redirected root.
            let redirected = Session::open(session.base())?;
            output.root_override_set(&override_file, redirected.store().root());
        }
        _ => {
            let existed = session.clear_root_override()?;
            output.root_override_cleared(existed);
        }
    }
    Ok(())
}

fn cmd_init_scene(output: &dyn Output, args: &cli::InitSceneArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(RigError::SceneFile {
            path: args.path.display().to_string(),
            reason: "file already exists (pass --force to overwrite)".to_string(),
        });
    }
    let scene = MemoryScene::sample_rig();
    scene.save(&args.path)?;
    output.scene_written(&args.path, scene.selection().len());
    Ok(())
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(())
}

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    browse: RobotBrowse,
    workflow: RobotWorkflow,
    store: RobotStore,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct RobotBrowse {
    list_assets: &'static str,
    list_versions: &'static str,
    version_info: &'static str,
}

#[derive(Serialize)]
struct RobotWorkflow {
    sample_scene: &'static str,
    publish: &'static str,
    load: &'static str,
}

#[derive(Serialize)]
struct RobotStore {
    show_root: &'static str,
    redirect: &'static str,
    reset: &'static str,
    base_dir: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "lrig",
        version: env!("CARGO_PKG_VERSION"),
        description: "Versioned light-rig snapshots with robot mode for agents",
        browse: RobotBrowse {
            list_assets: "lrig assets --robot",
            list_versions: "lrig versions <ASSET> --robot",
            version_info: "lrig info <ASSET> [--version N] --robot",
        },
        workflow: RobotWorkflow {
            sample_scene: "lrig init-scene <FILE>",
            publish: "lrig publish <ASSET> --scene <FILE> [--description TEXT] [--select NAME]...",
            load: "lrig load <ASSET> [--version N] --scene <FILE>",
        },
        store: RobotStore {
            show_root: "lrig root --robot",
            redirect: "lrig set-root <PATH>",
            reset: "lrig set-root --clear",
            base_dir: "--home <DIR> or LRIG_HOME",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
    };

    match serde_json::to_string_pretty(&help) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{e}"),
    }
}

fn print_human_quick_start() {
    let command = |cmd: &str| style(format!("{cmd:<42}")).green();

    println!(
        "{} {} - light rig store\n",
        style("lrig").bold().cyan(),
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();
    println!("  {}  Write a sample scene", command("lrig init-scene shot.json"));
    println!("  {}  Publish its selected lights", command("lrig publish rigA -s shot.json"));
    println!("  {}  List assets", command("lrig assets"));
    println!("  {}  List versions", command("lrig versions rigA"));
    println!("  {}  Restore the latest version", command("lrig load rigA -s shot.json"));
    println!("  {}  Show the store location", command("lrig root"));
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("lrig --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("lrig --robot").cyan());
    println!();

    println!("Run {} for full help", style("lrig --help").yellow());
}
