//! ASCII board rendering
//!
//! One 3-character token per cell: piece symbol (uppercase Silver, lowercase
//! Red) followed by its facing, `.` for an empty cell, and `|`/`-` for an
//! empty cell crossed by a laser.

use khet_core::{Direction, GameState, LaserResult, Piece, Player, Position, BOARD_COLS, BOARD_ROWS};
use rustc_hash::FxHashMap;

/// Render the board
pub fn render_board(state: &GameState) -> String {
    render(state, &FxHashMap::default())
}

/// Render the board with a laser path drawn through empty cells
pub fn render_with_laser(state: &GameState, laser: &LaserResult) -> String {
    let mut beam = FxHashMap::default();
    for segment in &laser.segments {
        if let Some(end) = segment.end {
            let mark = match segment.direction {
                Direction::N | Direction::S => '|',
                Direction::E | Direction::W => '-',
            };
            // Crossing beams
            beam.entry(end)
                .and_modify(|m| {
                    if *m != mark {
                        *m = '+';
                    }
                })
                .or_insert(mark);
        }
    }
    render(state, &beam)
}

fn render(state: &GameState, beam: &FxHashMap<Position, char>) -> String {
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..BOARD_COLS {
        out.push_str(&format!(" {:<3}", col));
    }
    out.push('\n');

    for row in 0..BOARD_ROWS {
        out.push_str(&format!("{:>2} ", row));
        for col in 0..BOARD_COLS {
            let pos = Position::new(row, col);
            let token = match state.piece_at(pos) {
                Some(piece) => piece_token(&piece),
                None => match beam.get(&pos) {
                    Some(mark) => format!("{}  ", mark),
                    None => ".  ".to_string(),
                },
            };
            out.push(' ');
            out.push_str(&token);
        }
        out.push('\n');
    }

    out
}

/// Three-character token for a piece
pub fn piece_token(piece: &Piece) -> String {
    let symbol = piece.piece_type.symbol();
    let symbol = match piece.owner {
        Player::Silver => symbol.to_ascii_uppercase(),
        Player::Red => symbol.to_ascii_lowercase(),
    };
    format!("{}{:<2}", symbol, piece.facing.as_str())
}
