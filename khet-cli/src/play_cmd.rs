//! Play command - one AI-vs-AI game
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_game(), report_game()
//! - Level 3: formatting utilities

use anyhow::{ensure, Context, Result};
use clap::Args;
use rand::Rng;
use serde::Serialize;

use khet_core::{Difficulty, Game, GameResult, Player, Policy, Preset, TurnOutcome};

use crate::render::render_board;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Red AI strength (easy, medium, hard)
    #[arg(long, default_value = "medium")]
    pub red: Difficulty,

    /// Silver AI strength (easy, medium, hard)
    #[arg(long, default_value = "medium")]
    pub silver: Difficulty,

    /// Starting layout
    #[arg(long, default_value = "classic")]
    pub preset: Preset,

    /// Player who moves first
    #[arg(long, default_value = "silver")]
    pub first: Player,

    /// Stop after this many turns (both players counted)
    #[arg(long, default_value = "200")]
    pub max_turns: usize,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Finished game with everything needed to replay it
#[derive(Serialize)]
struct GameRecord {
    seed: u64,
    silver: Difficulty,
    red: Difficulty,
    result: GameResult,
    turns: usize,
    history: Vec<TurnOutcome>,
    #[serde(skip)]
    game: Game,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let seed = crate::create_rng(seed).gen::<u64>();

    tracing::info!(
        "Starting game: silver={} red={} preset={} seed={}",
        args.silver,
        args.red,
        args.preset,
        seed
    );

    let record = play_game(&args, seed)?;
    report_game(&record, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_game(args: &PlayArgs, seed: u64) -> Result<GameRecord> {
    let mut game = Game::new(args.preset, args.first);
    ensure!(
        game.state().piece_count() > 0,
        "preset '{}' places no pieces",
        args.preset
    );

    let mut silver = args.silver.policy(seed);
    let mut red = args.red.policy(seed.wrapping_add(7777));

    while !game.state().is_game_over() && game.turns_played() < args.max_turns {
        let player = game.state().current_player();
        let policy: &mut dyn Policy = match player {
            Player::Silver => silver.as_mut(),
            Player::Red => red.as_mut(),
        };

        let turn = game
            .advance(policy)
            .with_context(|| format!("turn {} failed", game.turns_played() + 1))?;

        match turn {
            Some(outcome) => tracing::info!(
                "Turn {}: {} {} (laser: {})",
                game.turns_played(),
                outcome.player,
                outcome.mv,
                laser_summary(&outcome)
            ),
            None => {
                tracing::warn!("{} has no legal moves, game stalled", player);
                break;
            }
        }
    }

    tracing::info!("Game finished: {:?} after {} turns", game.result(), game.turns_played());

    Ok(GameRecord {
        seed,
        silver: args.silver,
        red: args.red,
        result: game.result(),
        turns: game.turns_played(),
        history: game.history().to_vec(),
        game,
    })
}

fn report_game(record: &GameRecord, args: &PlayArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(record).context("Failed to serialize game record")?;
        println!("{}", json);
    } else {
        println!("{}", render_board(record.game.state()));
        println!("Result: {}", result_text(record.result));
        println!("Turns:  {}", record.turns);
        println!("Seed:   {}", record.seed);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

fn laser_summary(outcome: &TurnOutcome) -> String {
    match outcome.laser.destroyed() {
        Some((at, piece)) => format!("destroyed {} {} at {}", piece.owner, piece.piece_type, at),
        None => format!("{:?}", outcome.laser.outcome),
    }
}

pub(crate) fn result_text(result: GameResult) -> &'static str {
    match result {
        GameResult::SilverWins => "Silver wins",
        GameResult::RedWins => "Red wins",
        GameResult::Ongoing => "unfinished",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(max_turns: usize) -> PlayArgs {
        PlayArgs {
            red: Difficulty::Easy,
            silver: Difficulty::Easy,
            preset: Preset::Classic,
            first: Player::Silver,
            max_turns,
            json: false,
        }
    }

    #[test]
    fn test_play_game_respects_turn_limit() {
        let record = play_game(&args(10), 3).unwrap();
        assert!(record.turns <= 10);
        assert_eq!(record.history.len(), record.turns);
    }

    #[test]
    fn test_play_game_is_reproducible() {
        let a = play_game(&args(20), 11).unwrap();
        let b = play_game(&args(20), 11).unwrap();
        assert_eq!(a.history, b.history);
        assert_eq!(a.result, b.result);
    }

    #[test]
    fn test_empty_preset_rejected() {
        let mut bad = args(10);
        bad.preset = Preset::Empty;
        assert!(play_game(&bad, 1).is_err());
    }
}
