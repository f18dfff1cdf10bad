//! Zobrist hashing support for fast position identity and memoization.
//!
//! Keys are drawn from a seeded `StdRng`, so one seed always reproduces the
//! same tables. Two keys are maintained per position:
//!
//! * the full key folds in piece placement, castling rights (skipped when no
//!   right remains), the en-passant file (only while a target exists), and a
//!   side-to-move constant xored in when white is to move;
//! * the placement key covers pieces only and is what the memo cache is
//!   keyed on. It folds together positions that differ only
//!   in rights, en-passant availability, or side to move.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; 6]; 2],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    side_to_move: u64,
}

impl ZobristKeys {
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for piece in color {
                for sq in piece {
                    *sq = rng.random::<u64>();
                }
            }
        }

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.random::<u64>();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.random::<u64>();
        }

        Self {
            piece_square,
            castling,
            en_passant_file,
            side_to_move: rng.random::<u64>(),
        }
    }

    /// Return the key for a piece standing on a square.
    #[inline]
    pub fn piece_square_key(&self, piece: ColoredPiece, square: Square) -> u64 {
        self.piece_square[piece.color.index()][piece.kind.index()][(square & 63) as usize]
    }

    /// Contribution of a castling-rights mask; zero when no right remains.
    #[inline]
    pub fn castling_key(&self, castling_rights: CastlingRights) -> u64 {
        let rights = castling_rights & CASTLE_ALL;
        if rights == 0 {
            0
        } else {
            self.castling[rights as usize]
        }
    }

    /// Contribution of an en-passant target; zero when there is none.
    #[inline]
    pub fn en_passant_key(&self, en_passant_square: Option<Square>) -> u64 {
        match en_passant_square {
            Some(square) => self.en_passant_file[file_of(square) as usize],
            None => 0,
        }
    }

    /// Contribution of the side to move; white to move carries the constant.
    #[inline]
    pub fn side_to_move_key(&self, side_to_move: Color) -> u64 {
        match side_to_move {
            Color::White => self.side_to_move,
            Color::Black => 0,
        }
    }

    /// The constant flipped once per applied move.
    #[inline]
    pub fn side_flip_key(&self) -> u64 {
        self.side_to_move
    }

    /// Pieces-only key over a full set of piece bitboards.
    pub fn placement_key(&self, pieces: &[[Bitboard; 6]; 2]) -> u64 {
        let mut key = 0u64;
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let piece = ColoredPiece::new(color, kind);
                for sq in pieces[color.index()][kind.index()].squares() {
                    key ^= self.piece_square_key(piece, sq);
                }
            }
        }
        key
    }

    /// Full key computed from scratch.
    pub fn full_key(&self, position: &Position) -> u64 {
        self.placement_key(position.piece_boards())
            ^ self.castling_key(position.castling_rights())
            ^ self.en_passant_key(position.en_passant_square())
            ^ self.side_to_move_key(position.side_to_move())
    }
}
