//! Knight destination table.
//!
//! Built at compile time by composing the wrap-masked directional shifts, so
//! every jump inherits the same edge handling as the rest of the engine.

use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::Square;

pub const KNIGHT_ATTACKS: [Bitboard; 64] = generate_knight_attacks();

#[inline]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[(square & 63) as usize]
}

/// Knight jumps from `square` that do not land on an unreachable square.
#[inline]
pub fn knight_destinations(square: Square, unreachable: Bitboard) -> Bitboard {
    knight_attacks(square).without(unreachable)
}

const fn generate_knight_attacks() -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let origin = Bitboard::from_square(sq as Square);
        let up = origin.up();
        let down = origin.down();
        let left = origin.left();
        let right = origin.right();

        table[sq] = up
            .up_right()
            .union(up.up_left())
            .union(down.down_left())
            .union(down.down_right())
            .union(left.up_left())
            .union(left.down_left())
            .union(right.down_right())
            .union(right.up_right());
        sq += 1;
    }

    table
}
