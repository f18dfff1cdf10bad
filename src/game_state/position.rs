//! Position facade.
//!
//! `Position` owns twelve piece bitboards (`[color][piece_kind]`) plus the
//! scalar state a move needs (side to move, castling rights, en-passant
//! target, double-push flag, halfmove clock) and both incrementally-kept hash
//! keys. Generation, rules, hashing and memoization are layered on top in
//! their own modules as further `impl Position` blocks.
//!
//! Mutation (`make_move`, `set_square`, ...) is not synchronized. Callers who
//! want parallelism clone the position; clones are independent apart from
//! the shared, thread-safe engine context.

use std::fmt;
use std::sync::Arc;

use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_rules::{
    STARTING_BISHOPS, STARTING_KINGS, STARTING_KNIGHTS, STARTING_PAWNS, STARTING_QUEENS,
    STARTING_ROOKS,
};
use crate::game_state::chess_types::*;
use crate::hashing::engine_context::EngineContext;
use crate::hashing::position_cache::MemoRecord;
use crate::moves::king_moves::castling_path;
use crate::utils::render_game_state::render_game_state;

/// Piece grid handed in by collaborators. Row 0 is rank 8, column 0 is the
/// a-file.
pub type Placement = [[Option<ColoredPiece>; 8]; 8];

/// Optional metadata accompanying a placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionHeader {
    pub white_short: bool,
    pub white_long: bool,
    pub black_short: bool,
    pub black_long: bool,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
}

impl PositionHeader {
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = 0;
        for (held, flag) in [
            (self.white_short, CASTLE_WHITE_SHORT),
            (self.white_long, CASTLE_WHITE_LONG),
            (self.black_short, CASTLE_BLACK_SHORT),
            (self.black_long, CASTLE_BLACK_LONG),
        ] {
            if held {
                rights |= flag;
            }
        }
        rights
    }
}

#[derive(Debug, Clone)]
pub struct Position {
    // [color][piece_kind]
    pub(crate) pieces: [[Bitboard; 6]; 2],

    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) last_move_double_push: bool,
    pub(crate) halfmove_clock: u16,

    pub(crate) zobrist_key: u64,
    pub(crate) placement_key: u64,

    pub(crate) context: Arc<EngineContext>,
}

impl Position {
    /// Standard starting layout on the process-wide context.
    #[inline]
    pub fn new_game() -> Self {
        Self::new_game_with_context(EngineContext::shared())
    }

    pub fn new_game_with_context(context: Arc<EngineContext>) -> Self {
        let mut pieces = [[Bitboard::EMPTY; 6]; 2];
        let layout = [
            (PieceKind::Pawn, STARTING_PAWNS),
            (PieceKind::Knight, STARTING_KNIGHTS),
            (PieceKind::Bishop, STARTING_BISHOPS),
            (PieceKind::Rook, STARTING_ROOKS),
            (PieceKind::Queen, STARTING_QUEENS),
            (PieceKind::King, STARTING_KINGS),
        ];
        for (kind, [white, black]) in layout {
            pieces[Color::White.index()][kind.index()] = Bitboard(white);
            pieces[Color::Black.index()][kind.index()] = Bitboard(black);
        }

        let mut position = Self::blank(context);
        position.pieces = pieces;
        position.castling_rights = CASTLE_ALL;
        position.refresh_keys();
        position
    }

    /// Empty board, white to move, no rights.
    pub fn empty(context: Arc<EngineContext>) -> Self {
        let mut position = Self::blank(context);
        position.refresh_keys();
        position
    }

    fn blank(context: Arc<EngineContext>) -> Self {
        Self {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            last_move_double_push: false,
            halfmove_clock: 0,
            zobrist_key: 0,
            placement_key: 0,
            context,
        }
    }

    /// Build from a placement grid on the process-wide context.
    #[inline]
    pub fn from_placement(
        placement: &Placement,
        side_to_move: Color,
        header: Option<PositionHeader>,
    ) -> Self {
        Self::from_placement_with_context(EngineContext::shared(), placement, side_to_move, header)
    }

    /// Build from a placement grid. Without a header, castling rights are
    /// inferred from king and rook home squares and the halfmove clock is 0.
    pub fn from_placement_with_context(
        context: Arc<EngineContext>,
        placement: &Placement,
        side_to_move: Color,
        header: Option<PositionHeader>,
    ) -> Self {
        let mut position = Self::blank(context);
        for (row, cells) in placement.iter().enumerate() {
            let rank = 7 - row as u8;
            for (file, cell) in cells.iter().enumerate() {
                if let Some(piece) = cell {
                    let square = square_at(file as u8, rank);
                    position.pieces[piece.color.index()][piece.kind.index()] |=
                        Bitboard::from_square(square);
                }
            }
        }

        position.side_to_move = side_to_move;
        match header {
            Some(header) => {
                position.castling_rights = header.castling_rights();
                position.en_passant_square = header.en_passant;
                position.last_move_double_push = header.en_passant.is_some();
                position.halfmove_clock = header.halfmove_clock;
            }
            None => position.castling_rights = position.inferred_castling_rights(),
        }

        position.refresh_keys();
        position
    }

    /// Rights implied by kings and rooks still on their home squares.
    pub fn inferred_castling_rights(&self) -> CastlingRights {
        let mut rights = 0;
        for color in Color::ALL {
            for short in [true, false] {
                let path = castling_path(color, short);
                let king_home = self.pieces(color, PieceKind::King).contains(path.king_from);
                let rook_home = self.pieces(color, PieceKind::Rook).contains(path.rook_from);
                if king_home && rook_home {
                    rights |= castle_flag(color, short);
                }
            }
        }
        rights
    }

    #[inline]
    pub fn context(&self) -> &Arc<EngineContext> {
        &self.context
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn has_castling_right(&self, color: Color, short: bool) -> bool {
        self.castling_rights & castle_flag(color, short) != 0
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn last_move_double_push(&self) -> bool {
        self.last_move_double_push
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Full Zobrist key, kept up to date incrementally.
    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    /// Pieces-only key used for memoization.
    #[inline]
    pub fn placement_key(&self) -> u64 {
        self.placement_key
    }

    #[inline]
    pub fn piece_boards(&self) -> &[[Bitboard; 6]; 2] {
        &self.pieces
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.pieces[color.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy(Color::White) | self.occupancy(Color::Black)
    }

    pub fn piece_at(&self, square: Square) -> Option<ColoredPiece> {
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                if self.pieces(color, kind).contains(square) {
                    return Some(ColoredPiece::new(color, kind));
                }
            }
        }
        None
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).first_square()
    }

    /// Place a piece, replacing whatever stood on the square. Hash keys are
    /// recomputed from scratch.
    pub fn set_square(&mut self, square: Square, piece: ColoredPiece) {
        self.remove_any(square);
        self.pieces[piece.color.index()][piece.kind.index()] |= Bitboard::from_square(square);
        self.refresh_keys();
    }

    /// Empty a square. Hash keys are recomputed from scratch.
    pub fn clear_square(&mut self, square: Square) {
        self.remove_any(square);
        self.refresh_keys();
    }

    pub fn set_side_to_move(&mut self, side_to_move: Color) {
        self.side_to_move = side_to_move;
        self.refresh_keys();
    }

    fn remove_any(&mut self, square: Square) {
        let mask = Bitboard::from_square(square);
        for color_boards in &mut self.pieces {
            for bb in color_boards {
                *bb = bb.without(mask);
            }
        }
    }

    /// Placement grid view of the board.
    pub fn to_placement(&self) -> Placement {
        let mut placement: Placement = [[None; 8]; 8];
        for (row, cells) in placement.iter_mut().enumerate() {
            let rank = 7 - row as u8;
            for (file, cell) in cells.iter_mut().enumerate() {
                *cell = self.piece_at(square_at(file as u8, rank));
            }
        }
        placement
    }

    /// Full key recomputed from scratch, for validating incremental upkeep.
    #[inline]
    pub fn recomputed_zobrist_key(&self) -> u64 {
        self.context.zobrist().full_key(self)
    }

    #[inline]
    pub fn recomputed_placement_key(&self) -> u64 {
        self.context.zobrist().placement_key(&self.pieces)
    }

    pub(crate) fn refresh_keys(&mut self) {
        self.zobrist_key = self.recomputed_zobrist_key();
        self.placement_key = self.recomputed_placement_key();
    }

    /// Memo record for the current placement.
    #[inline]
    pub(crate) fn memo(&self) -> Arc<MemoRecord> {
        self.context.cache().get_or_create(self.placement_key)
    }

    /// True when no square is claimed by more than one piece bitboard.
    pub fn occupancy_is_consistent(&self) -> bool {
        let mut seen = Bitboard::EMPTY;
        for color_boards in &self.pieces {
            for &bb in color_boards {
                if (seen & bb).any() {
                    return false;
                }
                seen |= bb;
            }
        }
        true
    }
}

/// Board state equality; the engine context is not compared.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
            && self.last_move_double_push == other.last_move_double_push
            && self.halfmove_clock == other.halfmove_clock
            && self.zobrist_key == other.zobrist_key
            && self.placement_key == other.placement_key
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_game_state(self))
    }
}
