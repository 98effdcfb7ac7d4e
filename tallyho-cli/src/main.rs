//! Tally-Ho CLI - Command-line interface
//!
//! Commands:
//! - play: Play an interactive two-round game against the AI
//! - selfplay: Pit two AI policies against each other over many games

mod play_cmd;
mod selfplay_cmd;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use tallyho_core::{GameConfig, ScoringPolicy};

#[derive(Parser)]
#[command(name = "tallyho")]
#[command(about = "Tally-Ho hidden-tile board game with a heuristic AI")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the AI in the terminal
    Play(play_cmd::PlayArgs),
    /// Run AI-vs-AI games and report statistics
    Selfplay(selfplay_cmd::SelfplayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Selfplay(args) => selfplay_cmd::run(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the optional game config and scoring policy files, defaults otherwise
pub(crate) fn load_settings(config: Option<&Path>, policy: Option<&Path>) -> Result<(GameConfig, ScoringPolicy)> {
    let config = match config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load game config: {}", path.display()))?,
        None => GameConfig::default(),
    };
    let policy = load_policy(policy)?;
    Ok((config, policy))
}

pub(crate) fn load_policy(path: Option<&Path>) -> Result<ScoringPolicy> {
    match path {
        Some(path) => ScoringPolicy::load(path)
            .with_context(|| format!("Failed to load scoring policy: {}", path.display())),
        None => Ok(ScoringPolicy::default()),
    }
}

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
