//! Game state, move generation, and move application

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{
    Facing, Position, BOARD_CELLS, BOARD_COLS, BOARD_ROWS, RESERVED_RED, RESERVED_SILVER,
    STEP_OFFSETS,
};
use crate::error::KhetError;
use crate::pieces::PieceType;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Silver = 0,
    Red = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Silver => Player::Red,
            Player::Red => Player::Silver,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Silver => "silver",
            Player::Red => "red",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Player {
    type Err = KhetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silver" => Ok(Player::Silver),
            "red" => Ok(Player::Red),
            _ => Err(KhetError::UnknownPlayer(s.to_string())),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    SilverWins,
    RedWins,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Ongoing => None,
            GameResult::SilverWins => Some(Player::Silver),
            GameResult::RedWins => Some(Player::Red),
        }
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub owner: Player,
    pub facing: Facing,
}

impl Piece {
    pub const fn new(piece_type: PieceType, owner: Player, facing: Facing) -> Self {
        Self {
            piece_type,
            owner,
            facing,
        }
    }

    /// Copy of this piece with a different facing
    pub fn with_facing(self, facing: Facing) -> Self {
        Self { facing, ..self }
    }
}

/// A player action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Turn the piece at `at` to a new facing
    Rotate { at: Position, facing: Facing },
    /// Step a piece to an adjacent empty cell
    Translate { from: Position, to: Position },
    /// Scarab at `from` trades places with the Pyramid or Anubis at `to`
    Swap { from: Position, to: Position },
}

impl Move {
    /// Cell of the piece performing the move
    pub fn origin(&self) -> Position {
        match *self {
            Move::Rotate { at, .. } => at,
            Move::Translate { from, .. } | Move::Swap { from, .. } => from,
        }
    }

    /// Cell the acting piece ends up on
    pub fn destination(&self) -> Position {
        match *self {
            Move::Rotate { at, .. } => at,
            Move::Translate { to, .. } | Move::Swap { to, .. } => to,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rotate { at, facing } => write!(f, "rotate {} -> {}", at, facing),
            Move::Translate { from, to } => write!(f, "move {} -> {}", from, to),
            Move::Swap { from, to } => write!(f, "swap {} <-> {}", from, to),
        }
    }
}

/// Cells `player` may never translate a piece onto
pub fn reserved_squares(player: Player) -> &'static [Position] {
    match player {
        Player::Silver => &RESERVED_SILVER,
        Player::Red => &RESERVED_RED,
    }
}

pub fn is_reserved_for(player: Player, pos: Position) -> bool {
    reserved_squares(player).contains(&pos)
}

/// The two facings a Sphinx at `pos` may take: the vertical and horizontal
/// directions pointing into the board from its corner.
pub fn sphinx_facings(pos: Position) -> [Facing; 2] {
    let vertical = if pos.row < BOARD_ROWS / 2 { Facing::S } else { Facing::N };
    let horizontal = if pos.col < BOARD_COLS / 2 { Facing::E } else { Facing::W };
    [vertical, horizontal]
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to mutate)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    /// Dense row-major board, one optional piece per cell
    board: Vec<Option<Piece>>,

    /// Player to move
    current_player: Player,

    /// Set once a Pharaoh has been destroyed
    game_over: bool,

    winner: Option<Player>,
}

/// Unchecked wire form of [`GameState`]
#[derive(Deserialize)]
struct RawGameState {
    board: Vec<Option<Piece>>,
    current_player: Player,
    game_over: bool,
    winner: Option<Player>,
}

impl TryFrom<RawGameState> for GameState {
    type Error = KhetError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        if raw.board.len() != BOARD_CELLS {
            return Err(KhetError::MalformedState("board must have exactly 80 cells"));
        }
        if raw.game_over != raw.winner.is_some() {
            return Err(KhetError::MalformedState("game_over and winner disagree"));
        }

        Ok(Self {
            board: raw.board,
            current_player: raw.current_player,
            game_over: raw.game_over,
            winner: raw.winner,
        })
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a game from explicit piece placements. Off-board entries are ignored.
    pub fn new(pieces: &[(Position, Piece)], starting_player: Player) -> Self {
        let mut board = vec![None; BOARD_CELLS];
        for &(pos, piece) in pieces {
            if pos.is_valid() {
                board[pos.index()] = Some(piece);
            }
        }

        Self {
            board,
            current_player: starting_player,
            game_over: false,
            winner: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn result(&self) -> GameResult {
        match self.winner {
            Some(Player::Silver) => GameResult::SilverWins,
            Some(Player::Red) => GameResult::RedWins,
            None => GameResult::Ongoing,
        }
    }

    /// Piece at a cell; `None` for empty or off-board cells
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.board[pos.index()]
        } else {
            None
        }
    }

    /// All pieces in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|piece| (Position::from_index(idx), piece)))
    }

    /// Pieces owned by `player`, in row-major order
    pub fn pieces_of(&self, player: Player) -> Vec<(Position, Piece)> {
        self.pieces().filter(|(_, p)| p.owner == player).collect()
    }

    /// First piece of the given type and owner in row-major order
    pub fn find_piece(&self, piece_type: PieceType, player: Player) -> Option<(Position, Piece)> {
        self.pieces()
            .find(|(_, p)| p.piece_type == piece_type && p.owner == player)
    }

    pub fn find_sphinx(&self, player: Player) -> Option<(Position, Piece)> {
        self.find_piece(PieceType::Sphinx, player)
    }

    pub fn find_pharaoh(&self, player: Player) -> Option<(Position, Piece)> {
        self.find_piece(PieceType::Pharaoh, player)
    }

    pub fn piece_count(&self) -> usize {
        self.board.iter().flatten().count()
    }

    // ========================================================================
    // INTERNAL MUTATORS (only reachable through copy-then-modify paths)
    // ========================================================================

    pub(crate) fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        self.board[pos.index()] = piece;
    }

    pub(crate) fn finish(&mut self, winner: Player) {
        self.game_over = true;
        self.winner = Some(winner);
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Legal moves for the player to move
    pub fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_for(self.current_player)
    }

    /// Legal moves for `player`, in a deterministic order: board cells in
    /// row-major order, then each piece's fixed direction/rotation list.
    pub fn legal_moves_for(&self, player: Player) -> Vec<Move> {
        if self.game_over {
            return vec![];
        }

        let mut moves = Vec::new();

        for (pos, piece) in self.pieces() {
            if piece.owner != player {
                continue;
            }

            match piece.piece_type {
                PieceType::Pharaoh => {
                    self.generate_step_moves(pos, &piece, &mut moves);
                }
                PieceType::Sphinx => {
                    self.generate_sphinx_rotations(pos, &piece, &mut moves);
                }
                PieceType::Pyramid | PieceType::Anubis => {
                    self.generate_step_moves(pos, &piece, &mut moves);
                    self.generate_rotations(pos, &piece, &mut moves);
                }
                PieceType::Scarab => {
                    self.generate_scarab_steps(pos, &piece, &mut moves);
                    self.generate_scarab_rotations(pos, &piece, &mut moves);
                }
            }
        }

        moves
    }

    fn can_translate_to(&self, piece: &Piece, dest: Position) -> bool {
        dest.is_valid() && self.piece_at(dest).is_none() && !is_reserved_for(piece.owner, dest)
    }

    fn generate_step_moves(&self, pos: Position, piece: &Piece, moves: &mut Vec<Move>) {
        for offset in STEP_OFFSETS {
            let dest = pos.offset(offset);
            if self.can_translate_to(piece, dest) {
                moves.push(Move::Translate { from: pos, to: dest });
            }
        }
    }

    fn generate_scarab_steps(&self, pos: Position, piece: &Piece, moves: &mut Vec<Move>) {
        for offset in STEP_OFFSETS {
            let dest = pos.offset(offset);
            if !dest.is_valid() {
                continue;
            }

            match self.piece_at(dest) {
                None => {
                    if !is_reserved_for(piece.owner, dest) {
                        moves.push(Move::Translate { from: pos, to: dest });
                    }
                }
                // Reserved squares do not restrict swaps
                Some(target) if target.piece_type.is_swappable() => {
                    moves.push(Move::Swap { from: pos, to: dest });
                }
                Some(_) => {}
            }
        }
    }

    fn generate_rotations(&self, pos: Position, piece: &Piece, moves: &mut Vec<Move>) {
        for &facing in piece.piece_type.allowed_facings() {
            if facing != piece.facing {
                moves.push(Move::Rotate { at: pos, facing });
            }
        }
    }

    fn generate_sphinx_rotations(&self, pos: Position, piece: &Piece, moves: &mut Vec<Move>) {
        for facing in sphinx_facings(pos) {
            if facing != piece.facing {
                moves.push(Move::Rotate { at: pos, facing });
            }
        }
    }

    fn generate_scarab_rotations(&self, pos: Position, piece: &Piece, moves: &mut Vec<Move>) {
        for facing in [piece.facing.turned(2), piece.facing.turned(-2)] {
            if facing.is_diagonal() {
                moves.push(Move::Rotate { at: pos, facing });
            }
        }
    }

    /// Mobility heuristic: number of legal moves for `player`
    pub fn mobility(&self, player: Player) -> usize {
        self.legal_moves_for(player).len()
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply a move, returning the new state. Does not fire the laser or
    /// switch players. The input state is never modified.
    pub fn apply_move(&self, mv: Move) -> Result<Self, KhetError> {
        self.validate_move(mv)?;

        let mut new_state = self.clone();
        new_state.apply_move_internal(mv);
        Ok(new_state)
    }

    fn validate_move(&self, mv: Move) -> Result<(), KhetError> {
        let invalid = |reason| Err(KhetError::InvalidMove { mv, reason });

        let origin = mv.origin();
        let dest = mv.destination();
        if !origin.is_valid() || !dest.is_valid() {
            return invalid("cell is off the board");
        }

        let piece = match self.piece_at(origin) {
            Some(p) => p,
            None => return invalid("no piece at source cell"),
        };

        match mv {
            Move::Rotate { at, facing } => {
                if !piece.piece_type.can_rotate() {
                    return invalid("piece cannot rotate");
                }
                if facing == piece.facing {
                    return invalid("piece already has that facing");
                }
                let allowed = match piece.piece_type {
                    PieceType::Sphinx => sphinx_facings(at).contains(&facing),
                    PieceType::Scarab => facing == piece.facing.turned(2) || facing == piece.facing.turned(-2),
                    other => other.allowed_facings().contains(&facing),
                };
                if !allowed {
                    return invalid("facing not allowed for piece");
                }
            }
            Move::Translate { from, to } => {
                if !piece.piece_type.can_translate() {
                    return invalid("piece cannot move");
                }
                if from.distance_to(to) != 1 {
                    return invalid("destination is not adjacent");
                }
                if self.piece_at(to).is_some() {
                    return invalid("destination is occupied");
                }
                if is_reserved_for(piece.owner, to) {
                    return invalid("destination is reserved");
                }
            }
            Move::Swap { from, to } => {
                if piece.piece_type != PieceType::Scarab {
                    return invalid("only a scarab can swap");
                }
                if from.distance_to(to) != 1 {
                    return invalid("destination is not adjacent");
                }
                match self.piece_at(to) {
                    Some(target) if target.piece_type.is_swappable() => {}
                    _ => return invalid("swap target must be a pyramid or anubis"),
                }
            }
        }

        Ok(())
    }

    fn apply_move_internal(&mut self, mv: Move) {
        match mv {
            Move::Rotate { at, facing } => {
                let rotated = self.piece_at(at).map(|p| p.with_facing(facing));
                self.set_piece(at, rotated);
            }
            Move::Translate { from, to } => {
                let piece = self.piece_at(from);
                self.set_piece(from, None);
                self.set_piece(to, piece);
            }
            Move::Swap { from, to } => {
                let scarab = self.piece_at(from);
                let displaced = self.piece_at(to);
                self.set_piece(to, scarab);
                self.set_piece(from, displaced);
            }
        }
    }
}

/// Hand the turn to the other player, returning the new state
pub fn switch_player(state: &GameState) -> GameState {
    let mut new_state = state.clone();
    new_state.current_player = state.current_player.opponent();
    new_state
}

// ============================================================================
// TESTS
// ============================================================================
