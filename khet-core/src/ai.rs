//! Move-choice policies built on the engine contract

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::KhetError;
use crate::eval::{evaluate, evaluate_with_depth, Heuristics};
use crate::game::{switch_player, GameState, Move, Player};
use crate::turn::play_turn;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Greedy policy picks uniformly among this many best moves
const GREEDY_TOP_N: usize = 3;

/// Children searched per node by alpha-beta
const DEFAULT_MAX_MOVES: usize = 24;

/// Noise scale for evaluation variety
const NOISE_SCALE: f32 = 0.1;

// ============================================================================
// POLICY CONTRACT
// ============================================================================

/// A move-choice strategy. Returns `None` when `player` has no legal move.
pub trait Policy {
    fn choose_move(&mut self, state: &GameState, player: Player) -> Option<Move>;
}

/// AI strength tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Build the policy for this tier
    pub fn policy(self, seed: u64) -> Box<dyn Policy + Send> {
        let heuristics = Heuristics::default();
        match self {
            Difficulty::Easy => Box::new(GreedyAI::with_seed(heuristics, seed)),
            Difficulty::Medium => Box::new(AlphaBetaAI::with_seed(2, heuristics, seed)),
            Difficulty::Hard => Box::new(AlphaBetaAI::with_seed(3, heuristics, seed)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = KhetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(KhetError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// View `state` with `player` to move
fn as_mover(state: &GameState, player: Player) -> GameState {
    if state.current_player() == player {
        state.clone()
    } else {
        switch_player(state)
    }
}

// ============================================================================
// GREEDY AI
// ============================================================================

/// One-ply greedy player: avoids self-inflicted losses, then picks randomly
/// among the best few moves by static evaluation.
pub struct GreedyAI {
    pub heuristics: Heuristics,
    rng: ChaCha8Rng,
}

impl GreedyAI {
    pub fn new(heuristics: Heuristics) -> Self {
        Self::with_seed(heuristics, 42)
    }

    pub fn with_seed(heuristics: Heuristics, seed: u64) -> Self {
        Self {
            heuristics,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Candidate moves with their post-laser scores, best first. Ties keep
    /// generator order.
    fn scored_moves(&self, state: &GameState, player: Player) -> Vec<(Move, f32)> {
        let root = as_mover(state, player);

        let outcomes: Vec<(Move, GameState)> = root
            .legal_moves()
            .into_iter()
            .filter_map(|mv| play_turn(&root, mv).ok().map(|(next, _)| (mv, next)))
            .collect();

        let safe: Vec<&(Move, GameState)> = outcomes
            .iter()
            .filter(|(_, next)| next.winner() != Some(player.opponent()))
            .collect();
        let candidates: Vec<&(Move, GameState)> = if safe.is_empty() {
            outcomes.iter().collect()
        } else {
            safe
        };

        let mut scored: Vec<(Move, f32)> = candidates
            .into_iter()
            .map(|(mv, next)| (*mv, evaluate(next, player, &self.heuristics)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }
}

impl Policy for GreedyAI {
    fn choose_move(&mut self, state: &GameState, player: Player) -> Option<Move> {
        let scored = self.scored_moves(state, player);
        if scored.is_empty() {
            return None;
        }

        let top = scored.len().min(GREEDY_TOP_N);
        let pick = self.rng.gen_range(0..top);
        Some(scored[pick].0)
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Depth-limited negamax over full turns (move plus laser).
///
/// Optional node and time budgets cut the search short: once either is spent,
/// remaining nodes are scored statically. The node budget keeps seeded play
/// reproducible; the time budget does not.
pub struct AlphaBetaAI {
    pub depth: u32,
    pub max_moves: usize,
    pub heuristics: Heuristics,
    pub max_nodes: Option<usize>,
    pub max_time: Option<Duration>,
    rng: ChaCha8Rng,
    nodes: usize,
    deadline: Option<Instant>,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self::with_seed(depth, heuristics, 42)
    }

    pub fn with_seed(depth: u32, heuristics: Heuristics, seed: u64) -> Self {
        Self {
            depth,
            max_moves: DEFAULT_MAX_MOVES,
            heuristics,
            max_nodes: None,
            max_time: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            nodes: 0,
            deadline: None,
        }
    }

    /// Cap the number of interior nodes expanded per search
    pub fn with_node_budget(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Cap the thinking time per search
    pub fn with_time_budget(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Interior nodes expanded by the last search
    pub fn nodes_searched(&self) -> usize {
        self.nodes
    }

    fn budget_spent(&self) -> bool {
        let nodes_spent = self.max_nodes.map_or(false, |max| self.nodes >= max);
        let time_spent = self.deadline.map_or(false, |deadline| Instant::now() >= deadline);
        nodes_spent || time_spent
    }

    /// Best move for `player` in `state`
    pub fn best_move(&mut self, state: &GameState, player: Player) -> Option<Move> {
        self.nodes = 0;
        self.deadline = self.max_time.map(|budget| Instant::now() + budget);

        let root = as_mover(state, player);
        let children = ordered_children(&root, &self.heuristics, self.max_moves);
        if children.is_empty() {
            return None;
        }
        if children.len() == 1 {
            return Some(children[0].0);
        }

        let depth = self.depth.max(1) as i32;
        let mut best_move = children[0].0;
        let mut best_score = f32::NEG_INFINITY;
        let mut alpha = f32::NEG_INFINITY;

        for (mv, child) in &children {
            let score = self.child_score(child, player, depth - 1, alpha, f32::INFINITY);
            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
            alpha = alpha.max(score);
        }

        Some(best_move)
    }

    /// Score of `child` for the player who just moved into it
    fn child_score(&mut self, child: &GameState, mover: Player, depth: i32, alpha: f32, beta: f32) -> f32 {
        if child.is_game_over() {
            // Terminal states keep the mover as current player
            evaluate_with_depth(child, mover, &self.heuristics, depth)
        } else {
            -self.negamax(child, depth, -beta, -alpha)
        }
    }

    fn negamax(&mut self, state: &GameState, depth: i32, mut alpha: f32, beta: f32) -> f32 {
        let player = state.current_player();

        if depth <= 0 || self.budget_spent() {
            let base = evaluate(state, player, &self.heuristics);
            let noise = (self.rng.gen::<f32>() - 0.5) * NOISE_SCALE;
            return base + noise;
        }

        self.nodes += 1;
        let children = ordered_children(state, &self.heuristics, self.max_moves);
        if children.is_empty() {
            return evaluate(state, player, &self.heuristics);
        }

        let mut best = f32::NEG_INFINITY;
        for (_, child) in &children {
            let score = self.child_score(child, player, depth - 1, alpha, beta);
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

impl Policy for AlphaBetaAI {
    fn choose_move(&mut self, state: &GameState, player: Player) -> Option<Move> {
        self.best_move(state, player)
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Score a finished turn for ordering (higher = search first): the laser's
/// material swing for the mover.
fn move_score(state: &GameState, next: &GameState, heuristics: &Heuristics) -> f32 {
    let mover = state.current_player();
    if next.is_game_over() {
        return if next.winner() == Some(mover) {
            f32::INFINITY
        } else {
            f32::NEG_INFINITY
        };
    }

    let value = |player: Player, s: &GameState| -> f32 {
        s.pieces_of(player)
            .iter()
            .map(|(_, p)| heuristics.piece_value(p.piece_type))
            .sum()
    };

    let their_loss = value(mover.opponent(), state) - value(mover.opponent(), next);
    let my_loss = value(mover, state) - value(mover, next);
    their_loss - my_loss
}

/// Legal turns from `state`, best-looking first, truncated to `max_moves`
fn ordered_children(state: &GameState, heuristics: &Heuristics, max_moves: usize) -> Vec<(Move, GameState)> {
    let mut children: Vec<(Move, GameState, f32)> = state
        .legal_moves()
        .into_iter()
        .filter_map(|mv| play_turn(state, mv).ok().map(|(next, _)| (mv, next)))
        .map(|(mv, next)| {
            let score = move_score(state, &next, heuristics);
            (mv, next, score)
        })
        .collect();

    children.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    children.truncate(max_moves);
    children.into_iter().map(|(mv, next, _)| (mv, next)).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Facing, Position};
    use crate::game::Piece;
    use crate::pieces::PieceType;
    use crate::setup::Preset;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    /// Turning the Silver Sphinx west fires along its own Pharaoh's row;
    /// every other Silver move is safe.
    fn self_mate_trap() -> GameState {
        GameState::new(
            &[
                (pos(7, 9), Piece::new(PieceType::Sphinx, Player::Silver, Facing::N)),
                (pos(7, 2), Piece::new(PieceType::Pharaoh, Player::Silver, Facing::N)),
                (pos(0, 0), Piece::new(PieceType::Sphinx, Player::Red, Facing::S)),
                (pos(3, 5), Piece::new(PieceType::Pharaoh, Player::Red, Facing::S)),
            ],
            Player::Silver,
        )
    }

    #[test]
    fn test_greedy_returns_move() {
        let game = GameState::new_game(Preset::Classic, Player::Silver);
        let mut ai = GreedyAI::new(Heuristics::default());
        let mv = ai.choose_move(&game, Player::Silver);
        assert!(mv.is_some());
        assert!(game.legal_moves().contains(&mv.unwrap()));
    }

    #[test]
    fn test_greedy_is_deterministic_per_seed() {
        let game = GameState::new_game(Preset::Classic, Player::Silver);
        let mut a = GreedyAI::with_seed(Heuristics::default(), 7);
        let mut b = GreedyAI::with_seed(Heuristics::default(), 7);
        assert_eq!(a.choose_move(&game, Player::Silver), b.choose_move(&game, Player::Silver));
    }

    #[test]
    fn test_greedy_avoids_self_destruction() {
        let game = self_mate_trap();
        let mut ai = GreedyAI::new(Heuristics::default());
        for _ in 0..10 {
            let mv = ai.choose_move(&game, Player::Silver).unwrap();
            assert_ne!(mv, Move::Rotate { at: pos(7, 9), facing: Facing::W });
        }
    }

    #[test]
    fn test_no_moves_returns_none() {
        let game = GameState::new(
            &[(pos(4, 4), Piece::new(PieceType::Pharaoh, Player::Red, Facing::S))],
            Player::Silver,
        );
        assert_eq!(GreedyAI::new(Heuristics::default()).choose_move(&game, Player::Silver), None);
        assert_eq!(AlphaBetaAI::new(2, Heuristics::default()).choose_move(&game, Player::Silver), None);
    }

    #[test]
    fn test_alpha_beta_avoids_self_destruction() {
        let game = self_mate_trap();
        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let mv = ai.best_move(&game, Player::Silver).unwrap();
        assert_ne!(mv, Move::Rotate { at: pos(7, 9), facing: Facing::W });
    }

    #[test]
    fn test_alpha_beta_takes_free_material() {
        // Rotating the Sphinx west burns the Red Anubis from its unshielded side
        let game = GameState::new(
            &[
                (pos(7, 9), Piece::new(PieceType::Sphinx, Player::Silver, Facing::N)),
                (pos(7, 4), Piece::new(PieceType::Anubis, Player::Red, Facing::N)),
                (pos(4, 5), Piece::new(PieceType::Pharaoh, Player::Silver, Facing::N)),
                (pos(0, 0), Piece::new(PieceType::Sphinx, Player::Red, Facing::E)),
                (pos(2, 5), Piece::new(PieceType::Pharaoh, Player::Red, Facing::S)),
            ],
            Player::Silver,
        );
        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let mv = ai.best_move(&game, Player::Silver);
        assert_eq!(mv, Some(Move::Rotate { at: pos(7, 9), facing: Facing::W }));
    }

    #[test]
    fn test_node_budget_limits_search() {
        let game = GameState::new_game(Preset::Classic, Player::Silver);

        let mut full = AlphaBetaAI::new(2, Heuristics::default());
        full.best_move(&game, Player::Silver).unwrap();
        assert!(full.nodes_searched() > 3);

        let mut capped = AlphaBetaAI::new(2, Heuristics::default()).with_node_budget(3);
        let mv = capped.best_move(&game, Player::Silver).unwrap();
        assert!(capped.nodes_searched() <= 3);
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    fn test_node_budget_still_avoids_self_destruction() {
        let game = self_mate_trap();
        let mut ai = AlphaBetaAI::new(3, Heuristics::default()).with_node_budget(1);
        let mv = ai.best_move(&game, Player::Silver).unwrap();
        assert_ne!(mv, Move::Rotate { at: pos(7, 9), facing: Facing::W });
    }

    #[test]
    fn test_zero_time_budget_returns_legal_move() {
        let game = GameState::new_game(Preset::Classic, Player::Silver);
        let mut ai = AlphaBetaAI::new(3, Heuristics::default()).with_time_budget(Duration::ZERO);
        let mv = ai.best_move(&game, Player::Silver).unwrap();
        assert!(game.legal_moves().contains(&mv));
        assert_eq!(ai.nodes_searched(), 0);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("grandmaster".parse::<Difficulty>().is_err());
    }
}
