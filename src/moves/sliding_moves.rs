//! Sliding-piece destination sets by ray expansion.
//!
//! Each ray grows one square per step from the origin. A step that adds no
//! new square (board edge, blocker, or an enemy already absorbed) ends the
//! ray. The test compares the popcount of `reach | enemies` against an
//! expected count that rises by one per step: an empty square raises the
//! popcount past the expectation, while an enemy square was already counted
//! in `enemies` and therefore stops the ray after being included.

use crate::game_state::bitboard::{Bitboard, Direction};
use crate::game_state::chess_types::Square;

/// Squares reachable along one direction.
///
/// `unreachable` holds squares the ray may not enter (friendly pieces, and
/// the enemy king when it must not be targeted). The origin is ignored if
/// present in it.
pub fn ray_destinations(
    origin: Square,
    direction: Direction,
    unreachable: Bitboard,
    enemies: Bitboard,
) -> Bitboard {
    let origin_bb = Bitboard::from_square(origin);
    let blocked = unreachable.without(origin_bb);
    let enemies = enemies.without(blocked);

    let mut reach = origin_bb;
    let mut expected = enemies.count();
    loop {
        reach = (reach | reach.shift(direction)).without(blocked);
        expected += 1;
        if (reach | enemies).count() <= expected {
            break;
        }
    }

    reach.without(origin_bb)
}

pub fn sliding_destinations(
    origin: Square,
    directions: &[Direction],
    unreachable: Bitboard,
    enemies: Bitboard,
) -> Bitboard {
    directions.iter().fold(Bitboard::EMPTY, |acc, &direction| {
        acc | ray_destinations(origin, direction, unreachable, enemies)
    })
}

#[inline]
pub fn rook_destinations(origin: Square, unreachable: Bitboard, enemies: Bitboard) -> Bitboard {
    sliding_destinations(origin, &Direction::ORTHOGONAL, unreachable, enemies)
}

#[inline]
pub fn bishop_destinations(origin: Square, unreachable: Bitboard, enemies: Bitboard) -> Bitboard {
    sliding_destinations(origin, &Direction::DIAGONAL, unreachable, enemies)
}

#[inline]
pub fn queen_destinations(origin: Square, unreachable: Bitboard, enemies: Bitboard) -> Bitboard {
    rook_destinations(origin, unreachable, enemies) | bishop_destinations(origin, unreachable, enemies)
}
