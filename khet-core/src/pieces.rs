//! Piece type definitions and per-type behaviour tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Facing;
use crate::error::KhetError;

/// The five Khet piece types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pharaoh,
    Sphinx,
    Pyramid,
    Anubis,
    Scarab,
}

/// All piece types
pub const PIECE_TYPES: [PieceType; 5] = [
    PieceType::Pharaoh,
    PieceType::Sphinx,
    PieceType::Pyramid,
    PieceType::Anubis,
    PieceType::Scarab,
];

impl PieceType {
    pub fn name(self) -> &'static str {
        match self {
            PieceType::Pharaoh => "pharaoh",
            PieceType::Sphinx => "sphinx",
            PieceType::Pyramid => "pyramid",
            PieceType::Anubis => "anubis",
            PieceType::Scarab => "scarab",
        }
    }

    /// Single-letter board symbol
    pub fn symbol(self) -> char {
        match self {
            PieceType::Pharaoh => 'P',
            PieceType::Sphinx => 'S',
            PieceType::Pyramid => 'Y',
            PieceType::Anubis => 'A',
            PieceType::Scarab => 'C',
        }
    }

    /// Facings a piece of this type may hold.
    ///
    /// A Sphinx is further restricted by its home corner, see
    /// [`crate::game::sphinx_facings`]. Pharaoh facing is unused, so any is accepted.
    pub fn allowed_facings(self) -> &'static [Facing] {
        match self {
            PieceType::Pharaoh => &Facing::ALL,
            PieceType::Sphinx | PieceType::Anubis => &Facing::CARDINAL,
            PieceType::Pyramid | PieceType::Scarab => &Facing::DIAGONAL,
        }
    }

    /// Whether the piece may step to a neighbouring cell
    pub fn can_translate(self) -> bool {
        !matches!(self, PieceType::Sphinx)
    }

    /// Whether the piece may rotate in place
    pub fn can_rotate(self) -> bool {
        !matches!(self, PieceType::Pharaoh)
    }

    /// Whether a Scarab may trade places with this piece
    pub fn is_swappable(self) -> bool {
        matches!(self, PieceType::Pyramid | PieceType::Anubis)
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PieceType {
    type Err = KhetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PIECE_TYPES
            .iter()
            .copied()
            .find(|pt| pt.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KhetError::UnknownPieceType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_lookup() {
        assert_eq!("pyramid".parse::<PieceType>().unwrap(), PieceType::Pyramid);
        assert_eq!("Scarab".parse::<PieceType>().unwrap(), PieceType::Scarab);
        assert!("pawn".parse::<PieceType>().is_err());
    }

    #[test]
    fn test_facing_tables() {
        for facing in PieceType::Pyramid.allowed_facings() {
            assert!(facing.is_diagonal());
        }
        for facing in PieceType::Anubis.allowed_facings() {
            assert!(facing.is_cardinal());
        }
        assert_eq!(PieceType::Pharaoh.allowed_facings().len(), 8);
    }

    #[test]
    fn test_mobility_flags() {
        assert!(!PieceType::Sphinx.can_translate());
        assert!(!PieceType::Pharaoh.can_rotate());
        assert!(PieceType::Anubis.is_swappable());
        assert!(!PieceType::Scarab.is_swappable());
        assert!(!PieceType::Pharaoh.is_swappable());
    }
}
