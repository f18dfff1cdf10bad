//! Terminal-oriented ASCII board dump and its inverse.
//!
//! The dump is an 8x8 character grid with row 0 holding rank 8. White pieces
//! are uppercase, black pieces lowercase, and empty squares use `_`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::position::{Placement, Position};

pub const EMPTY_SQUARE_CHAR: char = '_';

/// Character grid of the board, row 0 == rank 8.
pub fn ascii_grid(position: &Position) -> [[char; 8]; 8] {
    let mut grid = [[EMPTY_SQUARE_CHAR; 8]; 8];
    for (row, cells) in grid.iter_mut().enumerate() {
        let rank = 7 - row as u8;
        for (file, cell) in cells.iter_mut().enumerate() {
            if let Some(piece) = position.piece_at(square_at(file as u8, rank)) {
                *cell = piece.to_char();
            }
        }
    }
    grid
}

/// Eight newline-separated rows of the ASCII grid.
pub fn render_ascii(position: &Position) -> String {
    ascii_grid(position)
        .iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the board with file and rank labels for terminal output.
pub fn render_game_state(position: &Position) -> String {
    let grid = ascii_grid(position);
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");
    for (row, cells) in grid.iter().enumerate() {
        let rank_char = char::from(b'8' - row as u8);
        out.push(rank_char);
        out.push(' ');
        for (file, ch) in cells.iter().enumerate() {
            out.push(*ch);
            if file < 7 {
                out.push(' ');
            }
        }
        out.push(' ');
        out.push(rank_char);
        out.push('\n');
    }
    out.push_str("  a b c d e f g h");

    out
}

/// Parse an ASCII grid back into a placement. Surrounding whitespace and
/// blank lines are ignored; each of the eight rows must hold eight cells.
pub fn placement_from_ascii(text: &str) -> ChessResult<Placement> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if rows.len() != 8 {
        return Err(ChessError::InvalidPlacement(format!(
            "expected 8 rows, found {}",
            rows.len()
        )));
    }

    let mut placement: Placement = [[None; 8]; 8];
    for (row, line) in rows.iter().enumerate() {
        let cells: Vec<char> = line.chars().collect();
        if cells.len() != 8 {
            return Err(ChessError::InvalidPlacement(format!(
                "row {} has {} cells: {line}",
                row + 1,
                cells.len()
            )));
        }
        for (file, &ch) in cells.iter().enumerate() {
            placement[row][file] = match ch {
                EMPTY_SQUARE_CHAR | '.' => None,
                _ => Some(ColoredPiece::from_char(ch).ok_or_else(|| {
                    ChessError::InvalidPlacement(format!("unknown piece character '{ch}'"))
                })?),
            };
        }
    }

    Ok(placement)
}
