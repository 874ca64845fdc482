//! Starting layouts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Facing, Position};
use crate::error::KhetError;
use crate::game::{GameState, Piece, Player};
use crate::pieces::PieceType;

/// Named starting layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    Classic,
    /// No pieces at all; only useful as a blank slate for custom positions
    Empty,
}

type SetupEntry = (i8, i8, PieceType, Player, Facing);

use Facing::{N, NE, NW, S, SE, SW};
use PieceType::{Anubis, Pharaoh, Pyramid, Scarab, Sphinx};
use Player::{Red, Silver};

/// Classic Khet 2.0 layout. Red starts at the top, Silver at the bottom.
const CLASSIC_SETUP: [SetupEntry; 26] = [
    (0, 0, Sphinx, Red, S),
    (0, 4, Anubis, Red, S),
    (0, 5, Pharaoh, Red, S),
    (0, 6, Anubis, Red, S),
    (0, 9, Pyramid, Red, SE),
    (1, 2, Pyramid, Red, SW),
    (2, 3, Pyramid, Silver, NW),
    (3, 1, Pyramid, Red, NE),
    (3, 3, Pyramid, Silver, SW),
    (3, 4, Scarab, Red, NE),
    (3, 5, Scarab, Red, SE),
    (3, 7, Pyramid, Red, SE),
    (3, 9, Pyramid, Silver, NW),
    (4, 1, Pyramid, Red, SE),
    (4, 3, Pyramid, Silver, NW),
    (4, 4, Scarab, Silver, SE),
    (4, 5, Scarab, Silver, NE),
    (4, 7, Pyramid, Red, NE),
    (4, 9, Pyramid, Silver, SW),
    (5, 6, Pyramid, Red, SE),
    (6, 6, Pyramid, Silver, NE),
    (7, 3, Pyramid, Silver, NW),
    (7, 4, Anubis, Silver, N),
    (7, 5, Pharaoh, Silver, N),
    (7, 6, Anubis, Silver, N),
    (7, 9, Sphinx, Silver, N),
];

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Empty => "empty",
        }
    }

    /// Piece placements for this preset
    pub fn placements(self) -> Vec<(Position, Piece)> {
        let table: &[SetupEntry] = match self {
            Preset::Classic => &CLASSIC_SETUP,
            Preset::Empty => &[],
        };

        table
            .iter()
            .map(|&(row, col, piece_type, owner, facing)| {
                (Position::new(row, col), Piece::new(piece_type, owner, facing))
            })
            .collect()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = KhetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Preset::Classic),
            "empty" => Ok(Preset::Empty),
            _ => Err(KhetError::UnknownPreset(s.to_string())),
        }
    }
}

impl GameState {
    /// Create the starting state for a preset
    pub fn new_game(preset: Preset, starting_player: Player) -> Self {
        GameState::new(&preset.placements(), starting_player)
    }
}
