//! Turn controller: move, fire, check for the end, hand over

use serde::{Deserialize, Serialize};

use crate::ai::Policy;
use crate::error::KhetError;
use crate::game::{switch_player, GameResult, GameState, Move, Player};
use crate::laser::LaserResult;
use crate::setup::Preset;

/// Record of one completed turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub player: Player,
    pub mv: Move,
    pub laser: LaserResult,
    pub game_over: bool,
    pub winner: Option<Player>,
}

/// Run one full turn for the player to move: apply `mv`, fire that player's
/// laser, and switch players unless the laser ended the game.
///
/// Does not check `mv` against the move generator; see [`Game::play`].
pub fn play_turn(state: &GameState, mv: Move) -> Result<(GameState, LaserResult), KhetError> {
    let player = state.current_player();
    let moved = state.apply_move(mv)?;
    let (fired, laser) = moved.resolve_laser(player);

    let next = if fired.is_game_over() {
        fired
    } else {
        switch_player(&fired)
    };

    Ok((next, laser))
}

/// Owns the current state of one game and replaces it wholesale each turn
#[derive(Clone, Debug)]
pub struct Game {
    state: GameState,
    history: Vec<TurnOutcome>,
}

impl Game {
    pub fn new(preset: Preset, starting_player: Player) -> Self {
        Self::from_state(GameState::new_game(preset, starting_player))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &[TurnOutcome] {
        &self.history
    }

    pub fn result(&self) -> GameResult {
        self.state.result()
    }

    /// Number of completed turns
    pub fn turns_played(&self) -> usize {
        self.history.len()
    }

    /// Play a move for the player to move.
    ///
    /// Rejects actions on a finished game and moves the generator would not
    /// produce; the state is untouched on error.
    pub fn play(&mut self, mv: Move) -> Result<TurnOutcome, KhetError> {
        if self.state.is_game_over() {
            return Err(KhetError::GameOver);
        }

        let player = self.state.current_player();
        if !self.state.legal_moves().contains(&mv) {
            return Err(KhetError::IllegalMove { mv, player });
        }

        let (next, laser) = play_turn(&self.state, mv)?;
        tracing::debug!(
            "turn {}: {} plays {}, laser {:?}",
            self.history.len() + 1,
            player,
            mv,
            laser.outcome
        );

        let outcome = TurnOutcome {
            player,
            mv,
            laser,
            game_over: next.is_game_over(),
            winner: next.winner(),
        };

        self.state = next;
        self.history.push(outcome.clone());
        Ok(outcome)
    }

    /// Ask `policy` for a move and play it.
    ///
    /// Returns `Ok(None)` when the player to move has no legal move; the game
    /// then stalls in place.
    pub fn advance(&mut self, policy: &mut dyn Policy) -> Result<Option<TurnOutcome>, KhetError> {
        if self.state.is_game_over() {
            return Err(KhetError::GameOver);
        }

        let player = self.state.current_player();
        match policy.choose_move(&self.state, player) {
            Some(mv) => self.play(mv).map(Some),
            None => {
                tracing::debug!("{} has no legal moves, stalling", player);
                Ok(None)
            }
        }
    }

    /// Alternate two policies until the game ends, stalls, or `max_turns`
    /// turns have been played in total.
    pub fn play_out(
        &mut self,
        silver: &mut dyn Policy,
        red: &mut dyn Policy,
        max_turns: usize,
    ) -> Result<GameResult, KhetError> {
        while !self.state.is_game_over() && self.history.len() < max_turns {
            let policy: &mut dyn Policy = match self.state.current_player() {
                Player::Silver => &mut *silver,
                Player::Red => &mut *red,
            };

            if self.advance(policy)?.is_none() {
                break;
            }
        }

        Ok(self.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Facing, Position};
    use crate::game::Piece;
    use crate::pieces::PieceType;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    /// Always plays the first legal move
    struct FirstMove;

    impl Policy for FirstMove {
        fn choose_move(&mut self, state: &GameState, player: Player) -> Option<Move> {
            state.legal_moves_for(player).into_iter().next()
        }
    }

    #[test]
    fn test_play_switches_player() {
        let mut game = Game::new(Preset::Classic, Player::Silver);
        let mv = game.state().legal_moves()[0];
        let outcome = game.play(mv).unwrap();
        assert_eq!(outcome.player, Player::Silver);
        assert!(!outcome.game_over);
        assert_eq!(game.state().current_player(), Player::Red);
        assert_eq!(game.turns_played(), 1);
    }

    #[test]
    fn test_illegal_move_rejected_without_change() {
        let mut game = Game::new(Preset::Classic, Player::Silver);
        let before = game.state().clone();
        // Red piece, but Silver to move
        let mv = Move::Rotate { at: pos(0, 0), facing: Facing::E };
        assert!(matches!(game.play(mv), Err(KhetError::IllegalMove { .. })));
        assert_eq!(game.state(), &before);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_winning_turn_does_not_switch_player() {
        // Silver rotates its Sphinx west, straight into the Red Pharaoh
        let state = GameState::new(
            &[
                (pos(7, 9), Piece::new(PieceType::Sphinx, Player::Silver, Facing::N)),
                (pos(7, 2), Piece::new(PieceType::Pharaoh, Player::Red, Facing::S)),
                (pos(0, 0), Piece::new(PieceType::Sphinx, Player::Red, Facing::S)),
            ],
            Player::Silver,
        );
        let mut game = Game::from_state(state);
        let outcome = game.play(Move::Rotate { at: pos(7, 9), facing: Facing::W }).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(Player::Red));
        assert_eq!(game.state().current_player(), Player::Silver);
        assert_eq!(game.result(), GameResult::RedWins);

        let next = Move::Rotate { at: pos(7, 9), facing: Facing::N };
        assert_eq!(game.play(next), Err(KhetError::GameOver));
    }

    #[test]
    fn test_advance_stalls_without_moves() {
        let state = GameState::new(
            &[(pos(4, 4), Piece::new(PieceType::Pharaoh, Player::Red, Facing::S))],
            Player::Silver,
        );
        let mut game = Game::from_state(state.clone());
        assert_eq!(game.advance(&mut FirstMove).unwrap(), None);
        assert_eq!(game.state(), &state);
    }

    #[test]
    fn test_play_out_respects_turn_limit() {
        let mut game = Game::new(Preset::Classic, Player::Silver);
        let result = game.play_out(&mut FirstMove, &mut FirstMove, 6).unwrap();
        assert!(game.turns_played() <= 6);
        if result == GameResult::Ongoing {
            assert_eq!(game.turns_played(), 6);
        }
    }
}
