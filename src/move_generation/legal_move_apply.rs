//! Move application with make/unmake.
//!
//! `make_move` mutates the position in place and returns an `UndoState`
//! token; `unmake_move` consumes it and restores the exact prior state,
//! hash keys included. Both hash keys are updated incrementally: piece
//! terms as bits flip, then the castling and en-passant contributions are
//! reconciled and the side-to-move constant is flipped.

use tracing::debug;

use crate::errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::game_state::undo_state::UndoState;
use crate::moves::chess_move::{Move, MoveKind};
use crate::moves::king_moves::castling_path;
use crate::utils::move_text::{parse_human_move, parse_machine_move, render_algebraic};

impl Position {
    /// Apply `mv` in place and return the token that undoes it.
    pub fn make_move(&mut self, mv: &Move) -> UndoState {
        let mover = mv.piece;
        let color = mover.color;
        let capture_square = mv.capture_square();
        let captured = self
            .piece_at(capture_square)
            .filter(|piece| piece.color != color)
            .map(|piece| (piece, capture_square));

        let undo = UndoState {
            mv: *mv,
            captured,
            prev_side_to_move: self.side_to_move,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_last_move_double_push: self.last_move_double_push,
            prev_halfmove_clock: self.halfmove_clock,
            prev_zobrist_key: self.zobrist_key,
            prev_placement_key: self.placement_key,
        };

        // Pieces.
        if let Some((piece, square)) = captured {
            self.remove_piece(piece, square);
        }
        self.remove_piece(mover, mv.from);
        self.place_piece(mv.landing_piece(), mv.to);
        if let MoveKind::Castling { short } = mv.kind {
            let path = castling_path(color, short);
            let rook = ColoredPiece::new(color, PieceKind::Rook);
            self.remove_piece(rook, path.rook_from);
            self.place_piece(rook, path.rook_to);
        }

        // Scalar state.
        let new_rights = updated_castling_rights(self.castling_rights, mover, mv.from, mv.to);
        let is_double_push =
            mover.kind == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16;
        let new_en_passant = if is_double_push {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        };

        let zobrist = self.context.zobrist();
        self.zobrist_key ^= zobrist.castling_key(self.castling_rights)
            ^ zobrist.castling_key(new_rights)
            ^ zobrist.en_passant_key(self.en_passant_square)
            ^ zobrist.en_passant_key(new_en_passant)
            ^ zobrist.side_flip_key();

        self.castling_rights = new_rights;
        self.en_passant_square = new_en_passant;
        self.last_move_double_push = is_double_push;
        self.halfmove_clock = if mover.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        self.side_to_move = self.side_to_move.opposite();

        undo
    }

    /// Revert the move recorded in `undo`.
    pub fn unmake_move(&mut self, undo: UndoState) {
        let mv = undo.mv;
        let color = mv.piece.color;

        if let MoveKind::Castling { short } = mv.kind {
            let path = castling_path(color, short);
            let rook = ColoredPiece::new(color, PieceKind::Rook);
            self.remove_piece(rook, path.rook_to);
            self.place_piece(rook, path.rook_from);
        }
        self.remove_piece(mv.landing_piece(), mv.to);
        self.place_piece(mv.piece, mv.from);
        if let Some((piece, square)) = undo.captured {
            self.place_piece(piece, square);
        }

        self.side_to_move = undo.prev_side_to_move;
        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.last_move_double_push = undo.prev_last_move_double_push;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.zobrist_key = undo.prev_zobrist_key;
        self.placement_key = undo.prev_placement_key;
    }

    /// Apply `mv` permanently.
    #[inline]
    pub fn apply_move(&mut self, mv: &Move) {
        self.make_move(mv);
    }

    /// Copy-make: the position after `mv`, leaving `self` untouched.
    pub fn with_move(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        next.make_move(mv);
        next
    }

    /// Parse human move text, check it is legal, annotate it and apply it.
    pub fn play(&mut self, text: &str) -> ChessResult<Move> {
        let parsed = parse_human_move(text, self.side_to_move)?;
        self.play_resolved(self.resolve_move(&parsed)?)
    }

    /// Same as [`Position::play`] for machine notation.
    pub fn play_machine(&mut self, text: &str) -> ChessResult<Move> {
        let parsed = parse_machine_move(text)?;
        self.play_resolved(self.resolve_move(&parsed)?)
    }

    fn play_resolved(&mut self, mv: Move) -> ChessResult<Move> {
        let mv = self.annotate(&mv);
        debug!(mv = %render_algebraic(&mv), "applying move");
        self.make_move(&mv);
        Ok(mv)
    }

    #[inline]
    fn remove_piece(&mut self, piece: ColoredPiece, square: Square) {
        if self.pieces(piece.color, piece.kind).contains(square) {
            self.toggle_piece(piece, square);
        }
    }

    #[inline]
    fn place_piece(&mut self, piece: ColoredPiece, square: Square) {
        if !self.pieces(piece.color, piece.kind).contains(square) {
            self.toggle_piece(piece, square);
        }
    }
}

/// Rights left after a move: a king move drops both of its side's rights,
/// and any move from or onto a rook home square drops that square's right.
fn updated_castling_rights(
    rights: CastlingRights,
    mover: ColoredPiece,
    from: Square,
    to: Square,
) -> CastlingRights {
    let mut rights = rights;
    if mover.kind == PieceKind::King {
        rights &= !castle_flags_for(mover.color);
    }
    for color in Color::ALL {
        for short in [true, false] {
            let rook_home = castling_path(color, short).rook_from;
            if from == rook_home || to == rook_home {
                rights &= !castle_flag(color, short);
            }
        }
    }
    rights
}
