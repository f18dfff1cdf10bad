use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;

/// Undo token returned by `Position::make_move` and consumed by
/// `Position::unmake_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub mv: Move,
    /// Piece actually removed by the move and the square it stood on.
    pub captured: Option<(ColoredPiece, Square)>,

    pub prev_side_to_move: Color,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_last_move_double_push: bool,
    pub prev_halfmove_clock: u16,

    pub prev_zobrist_key: u64,
    pub prev_placement_key: u64,
}
