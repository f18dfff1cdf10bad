//! 64-bit square-set primitive.
//!
//! Bit `file + 8 * rank` stands for one square (`a1 == 0`, `h8 == 63`).
//! Directional shifts drop the column that would wrap around the board edge
//! before shifting, so a piece on the h-file never reappears on the a-file.
//! Single-bit accessors take their index modulo 64, so `-1` addresses `h8`.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::game_state::chess_types::Square;

const NOT_FILE_A: u64 = 0xFEFE_FEFE_FEFE_FEFE;
const NOT_FILE_H: u64 = 0x7F7F_7F7F_7F7F_7F7F;

/// Compass direction used by ray expansion. `Up` points toward rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(u64::MAX);

    #[inline]
    pub const fn from_square(square: Square) -> Self {
        Bitboard(1u64 << (square & 63))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    const fn wrap_index(index: i32) -> u32 {
        index.rem_euclid(64) as u32
    }

    #[inline]
    pub fn set(&mut self, index: i32) {
        self.0 |= 1u64 << Self::wrap_index(index);
    }

    #[inline]
    pub fn clear(&mut self, index: i32) {
        self.0 &= !(1u64 << Self::wrap_index(index));
    }

    #[inline]
    pub fn toggle(&mut self, index: i32) {
        self.0 ^= 1u64 << Self::wrap_index(index);
    }

    #[inline]
    pub const fn test(self, index: i32) -> bool {
        self.0 & (1u64 << Self::wrap_index(index)) != 0
    }

    #[inline]
    pub const fn contains(self, square: Square) -> bool {
        self.0 & (1u64 << (square & 63)) != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    /// Lowest set square, if any.
    #[inline]
    pub const fn first_square(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as Square)
        }
    }

    /// Iterate set squares in ascending index order.
    #[inline]
    pub fn squares(self) -> SquareIter {
        SquareIter(self.0)
    }

    #[inline]
    pub const fn union(self, other: Bitboard) -> Self {
        Bitboard(self.0 | other.0)
    }

    #[inline]
    pub const fn without(self, other: Bitboard) -> Self {
        Bitboard(self.0 & !other.0)
    }

    #[inline]
    pub const fn up(self) -> Self {
        Bitboard(self.0 << 8)
    }

    #[inline]
    pub const fn down(self) -> Self {
        Bitboard(self.0 >> 8)
    }

    #[inline]
    pub const fn right(self) -> Self {
        Bitboard((self.0 & NOT_FILE_H) << 1)
    }

    #[inline]
    pub const fn left(self) -> Self {
        Bitboard((self.0 & NOT_FILE_A) >> 1)
    }

    #[inline]
    pub const fn up_right(self) -> Self {
        Bitboard((self.0 & NOT_FILE_H) << 9)
    }

    #[inline]
    pub const fn up_left(self) -> Self {
        Bitboard((self.0 & NOT_FILE_A) << 7)
    }

    #[inline]
    pub const fn down_right(self) -> Self {
        Bitboard((self.0 & NOT_FILE_H) >> 7)
    }

    #[inline]
    pub const fn down_left(self) -> Self {
        Bitboard((self.0 & NOT_FILE_A) >> 9)
    }

    #[inline]
    pub const fn shift(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.up(),
            Direction::Down => self.down(),
            Direction::Left => self.left(),
            Direction::Right => self.right(),
            Direction::UpLeft => self.up_left(),
            Direction::UpRight => self.up_right(),
            Direction::DownLeft => self.down_left(),
            Direction::DownRight => self.down_right(),
        }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.0)
    }
}

/// Rank-8-first 8x8 grid of `1`/`.`, handy in assertion failures.
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let ch = if self.contains(rank * 8 + file) { '1' } else { '.' };
                write!(f, "{ch}")?;
            }
            if rank > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub struct SquareIter(u64);

impl Iterator for SquareIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let square = self.0.trailing_zeros() as Square;
        self.0 &= self.0 - 1;
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SquareIter {}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Bitboard::EMPTY, |acc, sq| acc | Bitboard::from_square(sq))
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}
