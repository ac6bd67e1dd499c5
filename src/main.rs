//! Postcards UI - command line driver
//!
//! Replays recorded host event scripts against the headless UI core and
//! prints what the table would have done.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use postcards_ui::{
    config::UiConfig,
    core::PlayerId,
    game::{Game, GameSetup},
    logger::VerbosityLevel,
    script::{self, ReplayScript},
    RecordingHost,
};
use std::path::{Path, PathBuf};

/// Verbosity level for UI output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "postcards")]
#[command(about = "Postcards UI - headless table replay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script of host events and report the outcome
    Replay {
        /// Script file (.json)
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Table snapshot, required unless the script embeds one
        #[arg(long, value_name = "SETUP_FILE")]
        setup: Option<PathBuf>,

        /// Player the client belongs to (overrides the script)
        #[arg(long)]
        player: Option<u32>,

        /// UI configuration file
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Animation speed factor (overrides the config; 0 disables waiting)
        #[arg(long)]
        speed: Option<f64>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityArg>,

        /// Print the final element tree
        #[arg(long)]
        dump: bool,
    },

    /// Build the table from a snapshot and print the element tree
    Inspect {
        #[arg(value_name = "SETUP_FILE")]
        setup: PathBuf,

        #[arg(long)]
        player: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            setup,
            player,
            config,
            speed,
            verbosity,
            dump,
        } => run_replay(script, setup, player, config, speed, verbosity, dump).await?,
        Commands::Inspect { setup, player } => run_inspect(&setup, player)?,
    }

    Ok(())
}

fn load_setup(path: &Path) -> Result<GameSetup> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading table snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing table snapshot {}", path.display()))
}

fn viewer_of(setup: &GameSetup, requested: Option<PlayerId>) -> Result<PlayerId> {
    match requested {
        Some(id) if setup.player(id).is_none() => bail!("player {id} is not at this table"),
        Some(id) => Ok(id),
        None => setup
            .players
            .first()
            .map(|p| p.id)
            .context("table snapshot has no players"),
    }
}

async fn run_replay(
    script_path: PathBuf,
    setup_path: Option<PathBuf>,
    player: Option<u32>,
    config_path: Option<PathBuf>,
    speed: Option<f64>,
    verbosity: Option<VerbosityArg>,
    dump: bool,
) -> Result<()> {
    let replay = ReplayScript::load(&script_path)
        .with_context(|| format!("loading script {}", script_path.display()))?;
    let setup = match (setup_path, replay.setup.clone()) {
        (Some(path), _) => load_setup(&path)?,
        (None, Some(setup)) => setup,
        (None, None) => bail!("script has no table snapshot; pass --setup"),
    };

    let mut config = match config_path {
        Some(path) => UiConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => UiConfig::default(),
    };
    if let Some(speed) = speed {
        config.animation_speed = speed;
    }
    if let Some(VerbosityArg(level)) = verbosity {
        config.verbosity = level;
    }
    config.validate().context("invalid animation settings")?;

    let viewer = viewer_of(&setup, player.map(PlayerId::new).or(replay.viewer))?;
    let mut game = Game::setup(RecordingHost::new(viewer), config, &setup)?;
    let report = script::run(&mut game, &replay.steps).await?;

    println!("=== Replay: {} ===", script_path.display());
    println!("Viewer: player {viewer}");
    println!(
        "Steps: {}  Notifications: {}  Inputs: {} handled, {} stale  Timers: {}",
        report.steps,
        report.notifications,
        report.handled_inputs,
        report.stale_inputs,
        report.timers_fired
    );
    println!("\nDispatched actions:");
    for action in &game.host().actions {
        println!("  {} {}", action.name, action.payload);
    }
    if let Some(title) = game.host().last_title() {
        println!("\nStatus bar: {title}");
    }
    if dump {
        println!("\n{}", game.tree().dump());
    }
    Ok(())
}

fn run_inspect(setup_path: &Path, player: Option<u32>) -> Result<()> {
    let setup = load_setup(setup_path)?;
    let viewer = viewer_of(&setup, player.map(PlayerId::new))?;
    let game = Game::setup(RecordingHost::new(viewer), UiConfig::default(), &setup)?;
    game.tree()
        .verify_consistency()
        .context("tree and presentation disagree")?;
    print!("{}", game.tree().dump());
    Ok(())
}
