//! Khet Core - Rules engine and AI
//!
//! This crate provides the core game logic for Khet 2.0:
//! - Board geometry (8x10 grid, facings, reserved squares)
//! - Piece types and their movement and optics rules
//! - Game state, move generation and move application
//! - Laser tracing and resolution
//! - Turn control and starting presets
//! - Position evaluation and greedy / alpha-beta policies

pub mod board;
pub mod pieces;
pub mod error;
pub mod game;
pub mod laser;
pub mod setup;
pub mod turn;
pub mod eval;
pub mod ai;

// Re-exports for convenient access
pub use board::{Direction, Facing, Position, BOARD_COLS, BOARD_ROWS};
pub use pieces::{PieceType, PIECE_TYPES};
pub use error::KhetError;
pub use game::{switch_player, GameResult, GameState, Move, Piece, Player};
pub use laser::{LaserOutcome, LaserResult, LaserSegment, MAX_LASER_STEPS};
pub use setup::Preset;
pub use turn::{play_turn, Game, TurnOutcome};
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use ai::{AlphaBetaAI, Difficulty, GreedyAI, Policy};
