//! Match command - play a batch of games between two AI levels
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use khet_core::{Difficulty, Game, GameResult, KhetError, Player, Preset};

use crate::play_cmd::result_text;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Red AI strength (easy, medium, hard)
    #[arg(long, default_value = "medium")]
    pub red: Difficulty,

    /// Silver AI strength (easy, medium, hard)
    #[arg(long, default_value = "medium")]
    pub silver: Difficulty,

    /// Maximum turns per game (both players counted)
    #[arg(long, default_value = "200")]
    pub max_turns: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    result: GameResult,
    turns: usize,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    silver: Difficulty,
    red: Difficulty,
    silver_wins: usize,
    red_wins: usize,
    unfinished: usize,
    avg_turns: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Play the match (games run in parallel)
/// 2. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let base_seed = crate::create_rng(seed).gen::<u64>();

    tracing::info!(
        "Starting match: silver={} vs red={} ({} games, seed={})",
        args.silver,
        args.red,
        args.games,
        base_seed
    );

    let results = play_match(&args, base_seed)?;

    tracing::info!(
        "Match finished: silver {} / red {} / unfinished {}",
        results.silver_wins,
        results.red_wins,
        results.unfinished
    );

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(args: &MatchArgs, base_seed: u64) -> Result<MatchResults> {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(args.games as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} games ({elapsed})")
                .context("Invalid progress template")?,
        );
        bar
    };

    let games = (0..args.games)
        .into_par_iter()
        .map(|idx| {
            let seed = base_seed.wrapping_add(idx as u64 * 12345);
            let record = play_single_game(args, idx + 1, seed);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>, KhetError>>()
        .context("Match aborted")?;

    progress.finish_and_clear();

    for record in &games {
        tracing::debug!(
            "Game {}: {:?} ({} turns)",
            record.game_number,
            record.result,
            record.turns
        );
    }

    Ok(compute_match_statistics(args.silver, args.red, games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(results).context("Failed to serialize match results")?;
        println!("{}", json);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one classic game; Silver and Red policies get distinct seeds
fn play_single_game(args: &MatchArgs, game_number: usize, seed: u64) -> Result<GameRecord, KhetError> {
    let mut game = Game::new(Preset::Classic, Player::Silver);
    let mut silver = args.silver.policy(seed);
    let mut red = args.red.policy(seed.wrapping_add(7777));

    let result = game.play_out(silver.as_mut(), red.as_mut(), args.max_turns)?;

    Ok(GameRecord {
        game_number,
        seed,
        result,
        turns: game.turns_played(),
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(silver: Difficulty, red: Difficulty, games: Vec<GameRecord>) -> MatchResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let silver_wins = count(GameResult::SilverWins);
    let red_wins = count(GameResult::RedWins);
    let unfinished = count(GameResult::Ongoing);

    let total_turns: usize = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    MatchResults {
        silver,
        red,
        silver_wins,
        red_wins,
        unfinished,
        avg_turns,
        games,
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

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Silver ({}) vs Red ({})", results.silver, results.red);
    println!("Total games: {}", total);
    println!(
        "Silver wins: {} ({:.1}%)",
        results.silver_wins,
        percent(results.silver_wins, total)
    );
    println!(
        "Red wins:    {} ({:.1}%)",
        results.red_wins,
        percent(results.red_wins, total)
    );
    println!(
        "Unfinished:  {} ({:.1}%)",
        results.unfinished,
        percent(results.unfinished, total)
    );
    println!("Avg turns:   {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} turns (seed {})",
            game.game_number,
            result_text(game.result),
            game.turns,
            game.seed
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
