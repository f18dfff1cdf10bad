//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square/bitboard representations used by move text and board dumps.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::{file_of, rank_of, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
/// The file letter is accepted in either case.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert algebraic notation (for example: "e4") to a one-hot bitboard.
#[inline]
pub fn algebraic_to_bitboard(square: &str) -> ChessResult<Bitboard> {
    algebraic_to_square(square).map(Bitboard::from_square)
}

/// Convert a square index to algebraic notation (for example: "e4").
/// Indices past 63 wrap, matching the bitset contract.
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let square = square & 63;
    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));
    format!("{file_char}{rank_char}")
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_bitboard, algebraic_to_square, square_to_algebraic};
    use crate::errors::ChessError;
    use crate::game_state::bitboard::Bitboard;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(algebraic_to_square("E4").expect("E4 should parse"), 28);
        assert_eq!(square_to_algebraic(0), "a1");
        assert_eq!(square_to_algebraic(63), "h8");
    }

    #[test]
    fn bitboard_conversion_sets_one_bit() {
        let e4 = algebraic_to_bitboard("e4").expect("e4 should parse");
        assert_eq!(e4, Bitboard(1u64 << 28));
    }

    #[test]
    fn out_of_range_squares_are_rejected() {
        for text in ["i1", "a9", "a0", "e", "e44", ""] {
            assert_eq!(
                algebraic_to_square(text),
                Err(ChessError::InvalidSquare(text.to_owned()))
            );
        }
    }
}
