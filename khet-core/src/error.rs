//! Engine error types

use crate::game::{Move, Player};

/// Errors raised by the rules engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KhetError {
    #[error("invalid move {mv}: {reason}")]
    InvalidMove { mv: Move, reason: &'static str },

    #[error("illegal move {mv} for {player}")]
    IllegalMove { mv: Move, player: Player },

    #[error("game is already over")]
    GameOver,

    #[error("malformed game state: {0}")]
    MalformedState(&'static str),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("unknown piece type: {0}")]
    UnknownPieceType(String),

    #[error("unknown facing: {0}")]
    UnknownFacing(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}
