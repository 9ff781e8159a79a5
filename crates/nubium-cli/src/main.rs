//! Headless runner for Nubium levels.
//!
//! Loads a level from a JSON key-value store file, plays it with a scripted
//! input timeline and reports how the run ended.
//!
//! ```text
//! nubium --store levels.json --level 0 --storage --script "120:R,1:RJ,60:R"
//! nubium --store levels.json --query "play.html?editor" --frames 300
//! ```

mod script;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nubium_core::host::Host;
use nubium_core::{
    ArcadeHost, FrameOutcome, InputAggregator, JsonFileStore, LaunchParams, Phase, Session,
    SessionConfig, Viewport,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a Nubium level headlessly", long_about = None)]
struct Cli {
    /// JSON file backing the key-value store
    #[arg(long)]
    store: PathBuf,

    /// Index of the stored level
    #[arg(long)]
    level: Option<String>,

    /// Load from stored levels and persist completion
    #[arg(long)]
    storage: bool,

    /// Load the editor level without persistence
    #[arg(long)]
    editor: bool,

    /// Launch URL or query string instead of the flags above
    #[arg(long, conflicts_with_all = ["level", "storage", "editor"])]
    query: Option<String>,

    /// Session configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width override
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height override
    #[arg(long)]
    height: Option<f32>,

    /// Frames to simulate; defaults to the script length
    #[arg(long)]
    frames: Option<usize>,

    /// Input timeline, e.g. "60:R,1:RJ,30:"
    #[arg(long, default_value = "")]
    script: Script,

    /// Keep playing after the goal is reached
    #[arg(long)]
    keep_going: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SessionConfig::from_json_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if cli.width.is_some() || cli.height.is_some() {
        config.viewport = Viewport::new(
            cli.width.unwrap_or(config.viewport.width),
            cli.height.unwrap_or(config.viewport.height),
        );
    }
    config.validate().context("invalid viewport override")?;
    Ok(config)
}

fn launch_params(cli: &Cli) -> LaunchParams {
    match &cli.query {
        Some(query) => LaunchParams::from_query(query),
        None => LaunchParams {
            level: cli.level.clone(),
            storage: cli.storage,
            editor: cli.editor,
        },
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let params = launch_params(&cli);
    let store = JsonFileStore::open(&cli.store)
        .with_context(|| format!("opening store {}", cli.store.display()))?;
    let host = ArcadeHost::new(config.viewport);
    let bindings = config.bindings;

    let mut session =
        Session::launch(&params, store, host, config).context("failed to start level")?;

    let total = cli.frames.unwrap_or_else(|| cli.script.len());
    let mut input = InputAggregator::new(bindings);
    let mut played = 0usize;

    for held in cli.script.frames().take(total) {
        held.apply(&mut input, &bindings);
        let outcome = session.frame(input.intents())?;
        played += 1;
        for notice in session.take_notices() {
            warn!(%notice, "persistence notice");
        }

        match outcome {
            FrameOutcome::Continued => {}
            FrameOutcome::Died => info!(frame = played, "player died"),
            FrameOutcome::Won => {
                info!(frame = played, "goal reached");
                if !cli.keep_going {
                    break;
                }
            }
        }
    }

    let state = session.state();
    let position = state
        .buckets
        .player
        .and_then(|handle| session.host().position(handle));
    debug!(bounds = ?state.bounds, "final world bounds");

    let result = match session.phase() {
        Phase::Playing => "playing",
        Phase::Won => "won",
    };
    println!("result:   {result}");
    println!("frames:   {played}");
    println!("deaths:   {}", state.deaths);
    match position {
        Some(position) => println!("player:   ({:.1}, {:.1})", position.x, position.y),
        None => println!("player:   none"),
    }
    if let Some(label) = session.victory_label() {
        println!("victory:  {label} visible: {}", session.host().exists(label));
    }
    Ok(())
}
