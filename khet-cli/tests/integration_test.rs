//! Integration tests for the Khet engine
//!
//! Tests the full stack: move generation, laser resolution, turn control and
//! the AI policies over real games.

use khet_core::{
    game::is_reserved_for, play_turn, AlphaBetaAI, Difficulty, Game, GameResult, GameState, Heuristics,
    LaserOutcome, Move, Player, Policy, Preset, MAX_LASER_STEPS,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Uniformly random legal moves
struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_move(&mut self, state: &GameState, player: Player) -> Option<Move> {
        state.legal_moves_for(player).choose(&mut self.rng).copied()
    }
}

/// States reached by random play from the classic layout
fn random_reachable_states(seed: u64, turns: usize) -> Vec<GameState> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = GameState::new_game(Preset::Classic, Player::Silver);
    let mut states = vec![state.clone()];

    for _ in 0..turns {
        if state.is_game_over() {
            break;
        }
        let moves = state.legal_moves();
        let mv = match moves.choose(&mut rng) {
            Some(mv) => *mv,
            None => break,
        };
        state = play_turn(&state, mv).unwrap().0;
        states.push(state.clone());
    }

    states
}

// ============================================================================
// MOVE GENERATION PROPERTIES
// ============================================================================

#[test]
fn test_translates_never_enter_reserved_squares() {
    for seed in 0..8 {
        for state in random_reachable_states(seed, 40) {
            let player = state.current_player();
            for mv in state.legal_moves() {
                if let Move::Translate { to, .. } = mv {
                    assert!(!is_reserved_for(player, to), "{} entered reserved {}", player, to);
                }
            }
        }
    }
}

#[test]
fn test_sphinx_never_translates() {
    for state in random_reachable_states(3, 60) {
        for mv in state.legal_moves() {
            if let Move::Translate { from, .. } = mv {
                let piece = state.piece_at(from).unwrap();
                assert!(piece.piece_type.can_translate());
            }
        }
    }
}

#[test]
fn test_applied_moves_land_correctly() {
    for state in random_reachable_states(5, 30) {
        for mv in state.legal_moves() {
            let before = state.piece_at(mv.origin()).unwrap();
            let after = state.apply_move(mv).unwrap();

            match mv {
                Move::Rotate { at, facing } => {
                    assert_eq!(after.piece_at(at), Some(before.with_facing(facing)));
                    assert_eq!(after.piece_count(), state.piece_count());
                }
                Move::Translate { from, to } => {
                    assert_eq!(after.piece_at(to), Some(before));
                    assert!(after.piece_at(from).is_none());
                }
                Move::Swap { from, to } => {
                    assert_eq!(after.piece_at(to), Some(before));
                    assert_eq!(after.piece_at(from), state.piece_at(to));
                }
            }
            assert_eq!(after.current_player(), state.current_player());
        }
    }
}

#[test]
fn test_stale_move_rejected() {
    let state = GameState::new_game(Preset::Classic, Player::Silver);
    // (5,0) is empty in the classic layout
    let mv = Move::Translate {
        from: khet_core::Position::new(5, 0),
        to: khet_core::Position::new(5, 1),
    };
    assert!(state.apply_move(mv).is_err());
}

// ============================================================================
// LASER PROPERTIES
// ============================================================================

#[test]
fn test_laser_terminates_and_is_idempotent_on_reachable_states() {
    for seed in 10..14 {
        for state in random_reachable_states(seed, 50) {
            for player in [Player::Silver, Player::Red] {
                let laser = state.trace_laser(player);
                assert!(laser.segments.len() <= MAX_LASER_STEPS);
                assert_eq!(laser, state.trace_laser(player));
            }
        }
    }
}

#[test]
fn test_laser_never_destroys_sphinx() {
    for state in random_reachable_states(21, 80) {
        for player in [Player::Silver, Player::Red] {
            if let LaserOutcome::Destroyed { piece, .. } = state.trace_laser(player).outcome {
                assert_ne!(piece.piece_type, khet_core::PieceType::Sphinx);
            }
        }
    }
}

#[test]
fn test_classic_opening_fires_harmlessly() {
    let mut game = Game::new(Preset::Classic, Player::Silver);
    let laser = game.state().trace_laser(Player::Silver);
    assert_eq!(laser.outcome, LaserOutcome::Exited);
    assert_eq!(laser.reflections(), 5);

    let outcome = game.advance(&mut RandomPolicy::new(1)).unwrap().unwrap();
    assert_eq!(outcome.player, Player::Silver);
    assert_eq!(game.state().current_player(), Player::Red);
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_random_games_end_consistently() {
    for seed in 0..6 {
        let mut game = Game::new(Preset::Classic, Player::Silver);
        let mut silver = RandomPolicy::new(seed);
        let mut red = RandomPolicy::new(seed + 100);
        let result = game.play_out(&mut silver, &mut red, 300).unwrap();

        match result {
            GameResult::Ongoing => assert!(!game.state().is_game_over()),
            finished => {
                let winner = finished.winner().unwrap();
                let last = game.history().last().unwrap();
                assert!(last.game_over);
                assert_eq!(last.winner, Some(winner));
                // Whoever fired the fatal laser, the other player takes the win
                assert_eq!(winner, last.player.opponent());
            }
        }
    }
}

#[test]
fn test_seeded_ai_games_are_deterministic() {
    let play = |seed: u64| {
        let mut game = Game::new(Preset::Classic, Player::Silver);
        let mut silver = Difficulty::Easy.policy(seed);
        let mut red = Difficulty::Medium.policy(seed + 1);
        let result = game.play_out(silver.as_mut(), red.as_mut(), 20).unwrap();
        (result, game.history().to_vec())
    };

    assert_eq!(play(42), play(42));
}

#[test]
fn test_alpha_beta_plays_legal_moves() {
    let mut ai = AlphaBetaAI::with_seed(2, Heuristics::default(), 9);
    let mut game = Game::new(Preset::Classic, Player::Silver);

    for _ in 0..6 {
        if game.state().is_game_over() {
            break;
        }
        let player = game.state().current_player();
        let mv = ai.choose_move(game.state(), player).unwrap();
        assert!(game.state().legal_moves().contains(&mv));
        game.play(mv).unwrap();
    }
}

#[test]
fn test_turn_outcome_serializes() {
    let mut game = Game::new(Preset::Classic, Player::Silver);
    let outcome = game.advance(&mut RandomPolicy::new(4)).unwrap().unwrap();
    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"kind\""));
}
