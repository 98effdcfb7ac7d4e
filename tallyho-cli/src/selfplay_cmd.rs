//! Selfplay command - AI vs. AI over many complete games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_policies(), play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use tallyho_core::{GameConfig, GameState, GreedyAi, RoundRecord, ScoringPolicy};

use crate::{create_rng, load_policy, load_settings};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of complete two-round games
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scoring policy JSON for the challenger seat
    #[arg(long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Scoring policy JSON for the opponent seat
    #[arg(long, value_name = "FILE")]
    pub opponent_policy: Option<PathBuf>,

    /// Game config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Winner of one game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
enum Winner {
    Challenger,
    Opponent,
    Draw,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    challenger_score: i32,
    opponent_score: i32,
    winner: Winner,
    rounds: Vec<RoundRecord>,
}

/// Aggregated selfplay results
#[derive(Clone, Debug)]
struct SelfplayResults {
    games: Vec<GameRecord>,
    challenger_wins: usize,
    opponent_wins: usize,
    draws: usize,
    avg_challenger_score: f32,
    avg_opponent_score: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Load config and both policies
/// 2. Play the games in parallel
/// 3. Report results
pub fn run(args: SelfplayArgs) -> Result<()> {
    let (config, challenger, opponent) = load_policies(&args)?;
    let base_seed = args.seed.unwrap_or_else(|| create_rng(None).gen());

    tracing::info!(games = args.games, base_seed, "starting selfplay");

    let results = play_games(&config, &challenger, &opponent, args.games, base_seed, !args.json)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_policies(args: &SelfplayArgs) -> Result<(GameConfig, ScoringPolicy, ScoringPolicy)> {
    let (config, challenger) = load_settings(args.config.as_deref(), args.policy.as_deref())?;
    let opponent = load_policy(args.opponent_policy.as_deref())?;
    Ok((config, challenger, opponent))
}

/// Play every game, one rayon task per game
fn play_games(
    config: &GameConfig,
    challenger: &ScoringPolicy,
    opponent: &ScoringPolicy,
    games: usize,
    base_seed: u64,
    show_progress: bool,
) -> Result<SelfplayResults> {
    let pb = if show_progress {
        let pb = ProgressBar::new(games as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let records = (0..games)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let record = play_single_game(config, challenger, opponent, i + 1, seed);
            pb.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    for record in &records {
        tracing::debug!(
            game = record.game_number,
            challenger = record.challenger_score,
            opponent = record.opponent_score,
            "game finished"
        );
    }

    Ok(compute_statistics(records))
}

fn report_results(results: &SelfplayResults, args: &SelfplayArgs) -> Result<()> {
    if args.json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; the challenger takes the user seat
fn play_single_game(
    config: &GameConfig,
    challenger: &ScoringPolicy,
    opponent: &ScoringPolicy,
    game_number: usize,
    seed: u64,
) -> Result<GameRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let state = GameState::new(config.clone(), &mut rng);
    let mut challenger_ai = GreedyAi::with_seed(challenger.clone(), rng.gen());
    let mut opponent_ai = GreedyAi::with_seed(opponent.clone(), rng.gen());

    let finished = challenger_ai.play_game(&mut opponent_ai, state)?;
    let totals = finished
        .final_scores()
        .with_context(|| format!("Game {} (seed {}) did not finish", game_number, seed))?;

    let winner = match totals.user.cmp(&totals.ai) {
        std::cmp::Ordering::Greater => Winner::Challenger,
        std::cmp::Ordering::Less => Winner::Opponent,
        std::cmp::Ordering::Equal => Winner::Draw,
    };

    Ok(GameRecord {
        game_number,
        seed,
        challenger_score: totals.user,
        opponent_score: totals.ai,
        winner,
        rounds: finished.history().to_vec(),
    })
}

fn compute_statistics(games: Vec<GameRecord>) -> SelfplayResults {
    let count = |w: Winner| games.iter().filter(|g| g.winner == w).count();
    let challenger_wins = count(Winner::Challenger);
    let opponent_wins = count(Winner::Opponent);
    let draws = count(Winner::Draw);

    let (avg_challenger_score, avg_opponent_score) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let n = games.len() as f32;
        (
            games.iter().map(|g| g.challenger_score).sum::<i32>() as f32 / n,
            games.iter().map(|g| g.opponent_score).sum::<i32>() as f32 / n,
        )
    };

    SelfplayResults {
        games,
        challenger_wins,
        opponent_wins,
        draws,
        avg_challenger_score,
        avg_opponent_score,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(results: &SelfplayResults) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        total_games: usize,
        challenger_wins: usize,
        opponent_wins: usize,
        draws: usize,
        avg_challenger_score: f32,
        avg_opponent_score: f32,
        games: &'a [GameRecord],
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        challenger_wins: results.challenger_wins,
        opponent_wins: results.opponent_wins,
        draws: results.draws,
        avg_challenger_score: results.avg_challenger_score,
        avg_opponent_score: results.avg_opponent_score,
        games: &results.games,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(results: &SelfplayResults) {
    let total = results.games.len();

    println!("\n=== Selfplay Results ===");
    println!("Total games:      {}", total);
    println!(
        "Challenger wins:  {} ({:.1}%)",
        results.challenger_wins,
        percent(results.challenger_wins, total)
    );
    println!(
        "Opponent wins:    {} ({:.1}%)",
        results.opponent_wins,
        percent(results.opponent_wins, total)
    );
    println!("Draws:            {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!(
        "Avg score:        {:.1} vs {:.1}",
        results.avg_challenger_score, results.avg_opponent_score
    );

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (seed {}): {} - {} {:?}",
            game.game_number, game.seed, game.challenger_score, game.opponent_score, game.winner
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
