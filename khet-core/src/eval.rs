//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::game::{GameState, Player};
use crate::pieces::PieceType;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Heuristics {
    pub pharaoh_value: f32,
    pub sphinx_value: f32,
    pub anubis_value: f32,
    pub pyramid_value: f32,
    pub scarab_value: f32,
    /// Per laser visit to a Pharaoh's cell
    pub pharaoh_threat_weight: f32,
    /// Pharaoh distance-to-centre weight
    pub pharaoh_center_weight: f32,
    /// Per legal-move difference
    pub mobility_weight: f32,
    /// Per cell of laser path
    pub laser_length_weight: f32,
    /// Laser path reaching a Pharaoh
    pub laser_pharaoh_bonus: f32,
    /// Per-piece centre control
    pub center_weight: f32,
    pub pyramid_home_bonus: f32,
    /// Anubis closeness to its own Pharaoh
    pub anubis_guard_weight: f32,
    pub scarab_center_bonus: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            pharaoh_value: 1000.0,
            sphinx_value: 100.0,
            anubis_value: 50.0,
            pyramid_value: 30.0,
            scarab_value: 40.0,
            pharaoh_threat_weight: 200.0,
            pharaoh_center_weight: 10.0,
            mobility_weight: 2.0,
            laser_length_weight: 5.0,
            laser_pharaoh_bonus: 500.0,
            center_weight: 2.0,
            pyramid_home_bonus: 10.0,
            anubis_guard_weight: 5.0,
            scarab_center_bonus: 15.0,
        }
    }
}

impl Heuristics {
    pub fn piece_value(&self, piece_type: PieceType) -> f32 {
        match piece_type {
            PieceType::Pharaoh => self.pharaoh_value,
            PieceType::Sphinx => self.sphinx_value,
            PieceType::Anubis => self.anubis_value,
            PieceType::Pyramid => self.pyramid_value,
            PieceType::Scarab => self.scarab_value,
        }
    }
}

/// Win value (effectively infinite)
pub const WIN_VALUE: f32 = 10000.0;

/// Centre distances never exceed this on an 8×10 board
const MAX_CENTER_DISTANCE: f32 = 8.0;

/// Evaluate position from `player`'s perspective (higher is better)
pub fn evaluate(state: &GameState, player: Player, heuristics: &Heuristics) -> f32 {
    if state.is_game_over() {
        return if state.winner() == Some(player) {
            WIN_VALUE
        } else {
            -WIN_VALUE
        };
    }

    material(state, player, heuristics)
        + pharaoh_safety(state, player, heuristics)
        + mobility(state, player, heuristics)
        + laser_pressure(state, player, heuristics)
        + positional(state, player, heuristics)
}

/// Terminal scores shifted so that faster wins and slower losses score higher
pub fn evaluate_with_depth(state: &GameState, player: Player, heuristics: &Heuristics, depth: i32) -> f32 {
    let base = evaluate(state, player, heuristics);
    if !state.is_game_over() {
        return base;
    }
    if base > 0.0 {
        base + depth as f32
    } else {
        base - depth as f32
    }
}

fn material(state: &GameState, player: Player, heuristics: &Heuristics) -> f32 {
    state
        .pieces()
        .map(|(_, piece)| {
            let value = heuristics.piece_value(piece.piece_type);
            if piece.owner == player {
                value
            } else {
                -value
            }
        })
        .sum()
}

fn pharaoh_safety(state: &GameState, player: Player, heuristics: &Heuristics) -> f32 {
    let opponent = player.opponent();
    let (my_pharaoh, their_pharaoh) = match (state.find_pharaoh(player), state.find_pharaoh(opponent)) {
        (Some((mine, _)), Some((theirs, _))) => (mine, theirs),
        _ => return 0.0,
    };

    let my_threats = state.trace_laser(opponent).visits(my_pharaoh) as f32;
    let their_threats = state.trace_laser(player).visits(their_pharaoh) as f32;

    heuristics.pharaoh_threat_weight * (their_threats - my_threats)
        + heuristics.pharaoh_center_weight * (centrality(my_pharaoh) - centrality(their_pharaoh))
}

fn mobility(state: &GameState, player: Player, heuristics: &Heuristics) -> f32 {
    let mine = state.mobility(player) as f32;
    let theirs = state.mobility(player.opponent()) as f32;
    heuristics.mobility_weight * (mine - theirs)
}

fn laser_pressure(state: &GameState, player: Player, heuristics: &Heuristics) -> f32 {
    let opponent = player.opponent();
    let my_laser = state.trace_laser(player);
    let their_laser = state.trace_laser(opponent);

    let mut score =
        heuristics.laser_length_weight * (my_laser.path_len() as f32 - their_laser.path_len() as f32);

    if let Some((pos, _)) = state.find_pharaoh(opponent) {
        if my_laser.visits(pos) > 0 {
            score += heuristics.laser_pharaoh_bonus;
        }
    }
    if let Some((pos, _)) = state.find_pharaoh(player) {
        if their_laser.visits(pos) > 0 {
            score -= heuristics.laser_pharaoh_bonus;
        }
    }

    score
}

fn positional(state: &GameState, player: Player, heuristics: &Heuristics) -> f32 {
    let my_pharaoh = state.find_pharaoh(player).map(|(pos, _)| pos);
    let mut score = 0.0;

    for (pos, piece) in state.pieces_of(player) {
        score += heuristics.center_weight * centrality(pos);

        match piece.piece_type {
            PieceType::Pyramid => {
                let on_home_half = match player {
                    Player::Red => pos.row < 4,
                    Player::Silver => pos.row > 3,
                };
                if on_home_half {
                    score += heuristics.pyramid_home_bonus;
                }
            }
            PieceType::Anubis => {
                if let Some(pharaoh) = my_pharaoh {
                    let distance = (pos.row - pharaoh.row).abs() + (pos.col - pharaoh.col).abs();
                    score += heuristics.anubis_guard_weight * (MAX_CENTER_DISTANCE - distance as f32);
                }
            }
            PieceType::Scarab => {
                if (2..=5).contains(&pos.row) && (2..=7).contains(&pos.col) {
                    score += heuristics.scarab_center_bonus;
                }
            }
            PieceType::Pharaoh | PieceType::Sphinx => {}
        }
    }

    score
}

fn centrality(pos: Position) -> f32 {
    MAX_CENTER_DISTANCE - pos.distance_to_center()
}
