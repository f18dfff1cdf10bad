//! King step table and castling geometry.

use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::{square_at, Color, Square};

pub const KING_ATTACKS: [Bitboard; 64] = generate_king_attacks();

#[inline]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[(square & 63) as usize]
}

#[inline]
pub fn king_destinations(square: Square, unreachable: Bitboard) -> Bitboard {
    king_attacks(square).without(unreachable)
}

const fn generate_king_attacks() -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let origin = Bitboard::from_square(sq as Square);
        table[sq] = origin
            .up()
            .union(origin.down())
            .union(origin.left())
            .union(origin.right())
            .union(origin.up_left())
            .union(origin.up_right())
            .union(origin.down_left())
            .union(origin.down_right());
        sq += 1;
    }

    table
}

/// Fixed squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingPath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub must_be_empty: Bitboard,
    /// King origin, the square it crosses, and its landing square.
    pub must_be_safe: Bitboard,
}

pub const fn castling_path(color: Color, short: bool) -> CastlingPath {
    let base = square_at(0, color.back_rank());
    if short {
        CastlingPath {
            king_from: base + 4,
            king_to: base + 6,
            rook_from: base + 7,
            rook_to: base + 5,
            must_be_empty: Bitboard::from_square(base + 5).union(Bitboard::from_square(base + 6)),
            must_be_safe: Bitboard::from_square(base + 4)
                .union(Bitboard::from_square(base + 5))
                .union(Bitboard::from_square(base + 6)),
        }
    } else {
        CastlingPath {
            king_from: base + 4,
            king_to: base + 2,
            rook_from: base,
            rook_to: base + 3,
            must_be_empty: Bitboard::from_square(base + 1)
                .union(Bitboard::from_square(base + 2))
                .union(Bitboard::from_square(base + 3)),
            must_be_safe: Bitboard::from_square(base + 4)
                .union(Bitboard::from_square(base + 3))
                .union(Bitboard::from_square(base + 2)),
        }
    }
}

/// Castling side implied by a king moving two files from its home square.
pub fn castling_side(color: Color, from: Square, to: Square) -> Option<bool> {
    [true, false].into_iter().find(|&short| {
        let path = castling_path(color, short);
        path.king_from == from && path.king_to == to
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_attacks_count_by_region() {
        assert_eq!(king_attacks(27).count(), 8);
        assert_eq!(king_attacks(0).count(), 3);
        assert_eq!(king_attacks(31).count(), 5);
    }

    #[test]
    fn castling_paths_match_board_geometry() {
        let white_short = castling_path(Color::White, true);
        assert_eq!((white_short.king_from, white_short.king_to), (4, 6));
        assert_eq!((white_short.rook_from, white_short.rook_to), (7, 5));

        let black_long = castling_path(Color::Black, false);
        assert_eq!((black_long.king_from, black_long.king_to), (60, 58));
        assert_eq!((black_long.rook_from, black_long.rook_to), (56, 59));
        assert_eq!(black_long.must_be_empty.count(), 3);
        assert!(!black_long.must_be_safe.contains(57));
    }

    #[test]
    fn castling_side_detects_two_file_king_moves() {
        assert_eq!(castling_side(Color::White, 4, 6), Some(true));
        assert_eq!(castling_side(Color::Black, 60, 58), Some(false));
        assert_eq!(castling_side(Color::White, 4, 5), None);
    }
}
