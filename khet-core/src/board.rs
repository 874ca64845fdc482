//! Board geometry: grid positions, piece facings, and laser travel directions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KhetError;

/// Number of rows on the board
pub const BOARD_ROWS: i8 = 8;

/// Number of columns on the board
pub const BOARD_COLS: i8 = 10;

/// Total number of cells
pub const BOARD_CELLS: usize = (BOARD_ROWS as usize) * (BOARD_COLS as usize);

/// Single-step offsets (d_row, d_col) for the 8 neighbours, clockwise from N
pub const STEP_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
];

// ============================================================================
// POSITION
// ============================================================================

/// Board cell coordinates, row 0 at the top (Red's side)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this position is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_ROWS).contains(&self.row) && (0..BOARD_COLS).contains(&self.col)
    }

    /// Row-major cell index. Only meaningful for valid positions.
    pub fn index(&self) -> usize {
        self.row as usize * BOARD_COLS as usize + self.col as usize
    }

    /// Inverse of [`Position::index`]
    pub fn from_index(idx: usize) -> Self {
        Self::new((idx / BOARD_COLS as usize) as i8, (idx % BOARD_COLS as usize) as i8)
    }

    /// Shift by a (d_row, d_col) offset; the result may be off the board
    pub fn offset(&self, (dr, dc): (i8, i8)) -> Self {
        Self::new(self.row + dr, self.col + dc)
    }

    /// Neighbouring cell in a laser travel direction
    pub fn step(&self, dir: Direction) -> Self {
        self.offset(dir.delta())
    }

    /// Chebyshev distance (king-move distance)
    pub fn distance_to(&self, other: Position) -> i8 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// Manhattan distance from the geometric centre of the board
    pub fn distance_to_center(&self) -> f32 {
        let center_row = (BOARD_ROWS - 1) as f32 / 2.0;
        let center_col = (BOARD_COLS - 1) as f32 / 2.0;
        (self.row as f32 - center_row).abs() + (self.col as f32 - center_col).abs()
    }

    /// All board cells in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_CELLS).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

// ============================================================================
// LASER DIRECTION
// ============================================================================

/// Cardinal travel direction of a laser beam
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub fn opposite(self) -> Self {
        match self {
            Direction::N => Direction::S,
            Direction::E => Direction::W,
            Direction::S => Direction::N,
            Direction::W => Direction::E,
        }
    }

    /// Row/column delta for one step
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::N => (-1, 0),
            Direction::E => (0, 1),
            Direction::S => (1, 0),
            Direction::W => (0, -1),
        }
    }

    pub fn as_facing(self) -> Facing {
        match self {
            Direction::N => Facing::N,
            Direction::E => Facing::E,
            Direction::S => Facing::S,
            Direction::W => Facing::W,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_facing().as_str())
    }
}

// ============================================================================
// FACING
// ============================================================================

/// Compass facing of a piece, indexed clockwise from N in 45° steps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::N,
        Facing::NE,
        Facing::E,
        Facing::SE,
        Facing::S,
        Facing::SW,
        Facing::W,
        Facing::NW,
    ];

    pub const CARDINAL: [Facing; 4] = [Facing::N, Facing::E, Facing::S, Facing::W];

    pub const DIAGONAL: [Facing; 4] = [Facing::NE, Facing::SE, Facing::SW, Facing::NW];

    pub fn is_cardinal(self) -> bool {
        (self as u8) % 2 == 0
    }

    pub fn is_diagonal(self) -> bool {
        !self.is_cardinal()
    }

    /// Rotate clockwise by `eighths` × 45° (negative is counter-clockwise)
    pub fn turned(self, eighths: i8) -> Self {
        Self::ALL[(self as i8 + eighths).rem_euclid(8) as usize]
    }

    /// Laser travel direction for a beam emitted along this facing.
    ///
    /// Diagonals collapse onto their east/west component.
    pub fn travel_direction(self) -> Direction {
        match self {
            Facing::N => Direction::N,
            Facing::NE | Facing::E | Facing::SE => Direction::E,
            Facing::S => Direction::S,
            Facing::SW | Facing::W | Facing::NW => Direction::W,
        }
    }

    /// The board sides a diagonal facing points at; empty for cardinals
    pub fn sides(self) -> &'static [Direction] {
        match self {
            Facing::NE => &[Direction::N, Direction::E],
            Facing::SE => &[Direction::S, Direction::E],
            Facing::SW => &[Direction::S, Direction::W],
            Facing::NW => &[Direction::N, Direction::W],
            Facing::N | Facing::E | Facing::S | Facing::W => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facing::N => "N",
            Facing::NE => "NE",
            Facing::E => "E",
            Facing::SE => "SE",
            Facing::S => "S",
            Facing::SW => "SW",
            Facing::W => "W",
            Facing::NW => "NW",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facing {
    type Err = KhetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facing::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| KhetError::UnknownFacing(s.to_string()))
    }
}

// ============================================================================
// RESERVED SQUARES
// ============================================================================

const fn perimeter() -> [Position; 32] {
    let mut cells = [Position::new(0, 0); 32];
    let mut i = 0;
    let mut col = 0;
    while col < BOARD_COLS {
        cells[i] = Position::new(0, col);
        cells[i + 1] = Position::new(BOARD_ROWS - 1, col);
        i += 2;
        col += 1;
    }
    let mut row = 1;
    while row < BOARD_ROWS - 1 {
        cells[i] = Position::new(row, 0);
        cells[i + 1] = Position::new(row, BOARD_COLS - 1);
        i += 2;
        row += 1;
    }
    cells
}

/// Cells Silver's pieces may never be translated onto
pub const RESERVED_SILVER: [Position; 32] = perimeter();

/// Cells Red's pieces may never be translated onto
pub const RESERVED_RED: [Position; 32] = perimeter();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_validity() {
        assert!(Position::new(0, 0).is_valid());
        assert!(Position::new(7, 9).is_valid());
        assert!(!Position::new(8, 0).is_valid());
        assert!(!Position::new(0, 10).is_valid());
        assert!(!Position::new(-1, 3).is_valid());
    }

    #[test]
    fn test_index_roundtrip_is_row_major() {
        let cells: Vec<_> = Position::all().collect();
        assert_eq!(cells.len(), BOARD_CELLS);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[10], Position::new(1, 0));
        assert_eq!(Position::new(3, 7).index(), 37);
    }

    #[test]
    fn test_facing_turns() {
        assert_eq!(Facing::NE.turned(2), Facing::SE);
        assert_eq!(Facing::NE.turned(-2), Facing::NW);
        assert_eq!(Facing::N.turned(-1), Facing::NW);
        assert_eq!(Facing::NW.turned(1), Facing::N);
    }

    #[test]
    fn test_travel_direction_is_total() {
        for facing in Facing::ALL {
            let dir = facing.travel_direction();
            if facing.is_cardinal() {
                assert_eq!(dir.as_facing(), facing);
            }
        }
        assert_eq!(Facing::NE.travel_direction(), Direction::E);
        assert_eq!(Facing::SW.travel_direction(), Direction::W);
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!("sw".parse::<Facing>().unwrap(), Facing::SW);
        assert_eq!("N".parse::<Facing>().unwrap(), Facing::N);
        assert!("up".parse::<Facing>().is_err());
    }

    #[test]
    fn test_reserved_is_perimeter() {
        assert_eq!(RESERVED_SILVER.len(), 32);
        for pos in RESERVED_RED {
            assert!(pos.is_valid());
            assert!(
                pos.row == 0 || pos.row == BOARD_ROWS - 1 || pos.col == 0 || pos.col == BOARD_COLS - 1
            );
        }
        assert!(!RESERVED_SILVER.contains(&Position::new(3, 4)));
    }
}
