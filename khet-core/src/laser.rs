//! Laser tracing and resolution
//!
//! A laser leaves the firing player's Sphinx and walks the board one cell at a
//! time. Each occupied cell applies its piece's optics to the side the beam
//! enters from: mirrors turn it, shields and Sphinxes absorb it, and anything
//! else is destroyed, ending the trace.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Direction, Facing, Position};
use crate::game::{GameState, Piece, Player};
use crate::pieces::PieceType;

/// Hard bound on laser steps; guarantees termination
pub const MAX_LASER_STEPS: usize = 100;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// One step of a laser trace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserSegment {
    pub start: Position,
    /// `None` when the step leaves the board
    pub end: Option<Position>,
    pub direction: Direction,
}

impl LaserSegment {
    pub fn is_off_board(&self) -> bool {
        self.end.is_none()
    }
}

/// How a laser trace ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaserOutcome {
    /// The firing player has no Sphinx
    NoEmitter,
    /// The beam left the board
    Exited,
    /// A Sphinx or an Anubis shield stopped the beam
    Absorbed { at: Position, piece: Piece },
    /// The beam destroyed a piece
    Destroyed { at: Position, piece: Piece },
    /// The beam revisited a cell in the same direction or ran out of steps
    Looped,
}

/// Full trace of a fired laser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserResult {
    pub player: Player,
    pub segments: Vec<LaserSegment>,
    pub outcome: LaserOutcome,
}

impl LaserResult {
    fn inert(player: Player) -> Self {
        Self {
            player,
            segments: Vec::new(),
            outcome: LaserOutcome::NoEmitter,
        }
    }

    /// Destroyed piece and its cell, if any
    pub fn destroyed(&self) -> Option<(Position, Piece)> {
        match self.outcome {
            LaserOutcome::Destroyed { at, piece } => Some((at, piece)),
            _ => None,
        }
    }

    /// Winner implied by this trace. Destroying any Pharaoh, even the firing
    /// player's own, hands the win to the player who did not fire.
    pub fn winner(&self) -> Option<Player> {
        match self.destroyed() {
            Some((_, piece)) if piece.piece_type == PieceType::Pharaoh => Some(self.player.opponent()),
            _ => None,
        }
    }

    /// Number of on-board cells the beam entered
    pub fn path_len(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_off_board()).count()
    }

    /// How many times the beam passes through `pos`
    pub fn visits(&self, pos: Position) -> usize {
        self.segments.iter().filter(|s| s.end == Some(pos)).count()
    }

    /// Number of mirror reflections along the trace
    pub fn reflections(&self) -> usize {
        self.segments
            .windows(2)
            .filter(|w| w[0].direction != w[1].direction)
            .count()
    }
}

// ============================================================================
// OPTICS
// ============================================================================

/// Effect of a laser entering a piece's cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Continue from this cell in a new direction
    Reflect(Direction),
    Absorb,
    Destroy,
}

/// Mirror mapping from entry side to outgoing travel direction
fn slash(entry: Direction) -> Direction {
    match entry {
        Direction::N => Direction::E,
        Direction::E => Direction::N,
        Direction::S => Direction::W,
        Direction::W => Direction::S,
    }
}

fn backslash(entry: Direction) -> Direction {
    match entry {
        Direction::N => Direction::W,
        Direction::W => Direction::N,
        Direction::S => Direction::E,
        Direction::E => Direction::S,
    }
}

/// Resolve a laser entering `piece` from side `entry`
pub fn interact(piece: &Piece, entry: Direction) -> Interaction {
    match piece.piece_type {
        PieceType::Sphinx => Interaction::Absorb,
        PieceType::Pharaoh => Interaction::Destroy,
        PieceType::Scarab => match piece.facing {
            Facing::NE | Facing::SE => Interaction::Reflect(slash(entry)),
            Facing::NW | Facing::SW => Interaction::Reflect(backslash(entry)),
            // Scarabs never hold a cardinal facing
            Facing::N | Facing::E | Facing::S | Facing::W => Interaction::Absorb,
        },
        PieceType::Pyramid => {
            if !piece.facing.sides().contains(&entry) {
                return Interaction::Destroy;
            }
            match piece.facing {
                Facing::NE | Facing::SW => Interaction::Reflect(slash(entry)),
                _ => Interaction::Reflect(backslash(entry)),
            }
        }
        PieceType::Anubis => {
            if piece.facing == entry.as_facing() {
                Interaction::Absorb
            } else {
                Interaction::Destroy
            }
        }
    }
}

// ============================================================================
// TRACING
// ============================================================================

impl GameState {
    /// Trace `player`'s laser without changing the state
    pub fn trace_laser(&self, player: Player) -> LaserResult {
        let (origin, sphinx) = match self.find_sphinx(player) {
            Some(found) => found,
            None => return LaserResult::inert(player),
        };

        let mut segments = Vec::new();
        let mut visited = FxHashSet::default();
        let mut current = origin;
        let mut direction = sphinx.facing.travel_direction();

        for _ in 0..MAX_LASER_STEPS {
            if !visited.insert((current, direction)) {
                break;
            }

            let next = current.step(direction);
            if !next.is_valid() {
                segments.push(LaserSegment { start: current, end: None, direction });
                return LaserResult { player, segments, outcome: LaserOutcome::Exited };
            }

            segments.push(LaserSegment { start: current, end: Some(next), direction });
            current = next;

            let piece = match self.piece_at(next) {
                Some(p) => p,
                None => continue,
            };

            let outcome = match interact(&piece, direction.opposite()) {
                Interaction::Reflect(new_direction) => {
                    direction = new_direction;
                    continue;
                }
                Interaction::Absorb => LaserOutcome::Absorbed { at: next, piece },
                Interaction::Destroy => LaserOutcome::Destroyed { at: next, piece },
            };
            return LaserResult { player, segments, outcome };
        }

        LaserResult { player, segments, outcome: LaserOutcome::Looped }
    }

    /// Fire `player`'s laser: remove any destroyed piece and end the game if
    /// it was a Pharaoh. Does not switch players.
    pub fn resolve_laser(&self, player: Player) -> (GameState, LaserResult) {
        let laser = self.trace_laser(player);
        let mut new_state = self.clone();

        if let Some((at, piece)) = laser.destroyed() {
            new_state.set_piece(at, None);
            tracing::debug!("{} laser destroyed {} {} at {}", player, piece.owner, piece.piece_type, at);
        }

        if let Some(winner) = laser.winner() {
            new_state.finish(winner);
            tracing::info!("pharaoh destroyed by {} laser, {} wins", player, winner);
        }

        (new_state, laser)
    }
}

// ============================================================================
// TESTS
// ============================================================================
