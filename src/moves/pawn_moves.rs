//! Pawn capture tables and push generation.

use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::{rank_of, Color, Square};

pub const WHITE_PAWN_ATTACKS: [Bitboard; 64] = generate_pawn_attacks(Color::White);
pub const BLACK_PAWN_ATTACKS: [Bitboard; 64] = generate_pawn_attacks(Color::Black);

/// Diagonal capture squares of a pawn, regardless of what stands there.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[(square & 63) as usize],
        Color::Black => BLACK_PAWN_ATTACKS[(square & 63) as usize],
    }
}

const fn generate_pawn_attacks(color: Color) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let origin = Bitboard::from_square(sq as Square);
        table[sq] = match color {
            Color::White => origin.up_left().union(origin.up_right()),
            Color::Black => origin.down_left().union(origin.down_right()),
        };
        sq += 1;
    }

    table
}

#[inline]
const fn forward(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => bb.up(),
        Color::Black => bb.down(),
    }
}

/// Square one rank forward of `square` for `color`, if on the board.
#[inline]
pub const fn square_in_front(color: Color, square: Square) -> Option<Square> {
    forward(color, Bitboard::from_square(square)).first_square()
}

/// Square directly behind `square` from `color`'s point of view.
#[inline]
pub const fn square_behind(color: Color, square: Square) -> Option<Square> {
    forward(color.opposite(), Bitboard::from_square(square)).first_square()
}

/// Forward pushes: one square when empty, two from the home rank when both
/// squares are empty.
pub fn pawn_push_destinations(color: Color, square: Square, occupied: Bitboard) -> Bitboard {
    let single = forward(color, Bitboard::from_square(square)).without(occupied);
    if single.is_empty() || rank_of(square) != color.pawn_home_rank() {
        return single;
    }
    single | forward(color, single).without(occupied)
}

/// Diagonal captures onto enemy-occupied squares.
#[inline]
pub fn pawn_capture_destinations(
    color: Color,
    square: Square,
    enemies: Bitboard,
    unreachable: Bitboard,
) -> Bitboard {
    (pawn_attacks(color, square) & enemies).without(unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_pawns_capture_one_way() {
        assert_eq!(pawn_attacks(Color::White, 8), Bitboard::from_square(17));
        assert_eq!(pawn_attacks(Color::Black, 55), Bitboard::from_square(46));
        assert_eq!(pawn_attacks(Color::White, 12).count(), 2);
    }

    #[test]
    fn home_rank_pawn_may_double_push() {
        let pushes = pawn_push_destinations(Color::White, 12, Bitboard::EMPTY);
        let expected: Bitboard = [20u8, 28].into_iter().collect();
        assert_eq!(pushes, expected);

        let pushes = pawn_push_destinations(Color::Black, 52, Bitboard::EMPTY);
        let expected: Bitboard = [44u8, 36].into_iter().collect();
        assert_eq!(pushes, expected);
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let blocker = Bitboard::from_square(20);
        assert!(pawn_push_destinations(Color::White, 12, blocker).is_empty());

        let far_blocker = Bitboard::from_square(28);
        assert_eq!(
            pawn_push_destinations(Color::White, 12, far_blocker),
            Bitboard::from_square(20)
        );
    }

    #[test]
    fn captures_need_enemy_targets() {
        let enemies: Bitboard = [19u8, 21].into_iter().collect();
        let own = Bitboard::from_square(21);
        assert_eq!(
            pawn_capture_destinations(Color::White, 12, enemies, own),
            Bitboard::from_square(19)
        );
    }

    #[test]
    fn front_and_behind_squares() {
        assert_eq!(square_in_front(Color::White, 12), Some(20));
        assert_eq!(square_behind(Color::White, 44), Some(36));
        assert_eq!(square_behind(Color::Black, 19), Some(27));
        assert_eq!(square_in_front(Color::White, 60), None);
    }
}
