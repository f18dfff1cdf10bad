//! Move value type.
//!
//! A `Move` records everything needed to apply it and to undo it again:
//! source, destination, the moving piece, the captured piece (if any) and
//! the special-move kind. Equality looks only at source and destination,
//! which is what matching user input against generated moves needs.

use std::fmt;

use crate::game_state::chess_types::{ColoredPiece, PieceKind, Square};
use crate::utils::move_text::render_algebraic;

/// Special-move classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Castling { short: bool },
    /// Pawn capture landing on the skipped square; the captured pawn sits on
    /// `capture_square`, one rank behind the destination.
    EnPassant { capture_square: Square },
    Promotion { promote_to: PieceKind },
}

/// Check status of the opponent after the move, filled in on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckAnnotation {
    #[default]
    None,
    Check,
    Checkmate,
}

#[derive(Debug, Clone, Copy, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: ColoredPiece,
    pub captured: Option<ColoredPiece>,
    pub kind: MoveKind,
    pub annotation: CheckAnnotation,
}

impl Move {
    #[inline]
    pub fn new(
        from: Square,
        to: Square,
        piece: ColoredPiece,
        captured: Option<ColoredPiece>,
        kind: MoveKind,
    ) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            kind,
            annotation: CheckAnnotation::None,
        }
    }

    #[inline]
    pub fn quiet(from: Square, to: Square, piece: ColoredPiece) -> Self {
        Self::new(from, to, piece, None, MoveKind::Normal)
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Square the captured piece is removed from.
    #[inline]
    pub fn capture_square(&self) -> Square {
        match self.kind {
            MoveKind::EnPassant { capture_square } => capture_square,
            _ => self.to,
        }
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion { promote_to } => Some(promote_to),
            _ => None,
        }
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::Castling { .. })
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant { .. })
    }

    /// Piece standing on the destination after the move.
    #[inline]
    pub fn landing_piece(&self) -> ColoredPiece {
        match self.kind {
            MoveKind::Promotion { promote_to } => ColoredPiece::new(self.piece.color, promote_to),
            _ => self.piece,
        }
    }

    #[inline]
    pub fn with_annotation(mut self, annotation: CheckAnnotation) -> Self {
        self.annotation = annotation;
        self
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_algebraic(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{Color, PieceKind};

    const WHITE_PAWN: ColoredPiece = ColoredPiece::new(Color::White, PieceKind::Pawn);
    const BLACK_PAWN: ColoredPiece = ColoredPiece::new(Color::Black, PieceKind::Pawn);

    #[test]
    fn equality_ignores_kind_and_promotion() {
        let queen = Move::new(
            52,
            60,
            WHITE_PAWN,
            None,
            MoveKind::Promotion {
                promote_to: PieceKind::Queen,
            },
        );
        let knight = Move::new(
            52,
            60,
            WHITE_PAWN,
            None,
            MoveKind::Promotion {
                promote_to: PieceKind::Knight,
            },
        );
        assert_eq!(queen, knight);
        assert_ne!(queen.promotion(), knight.promotion());
        assert_eq!(queen.landing_piece().kind, PieceKind::Queen);
    }

    #[test]
    fn en_passant_capture_square_differs_from_destination() {
        let mv = Move::new(
            36,
            43,
            WHITE_PAWN,
            Some(BLACK_PAWN),
            MoveKind::EnPassant { capture_square: 35 },
        );
        assert!(mv.is_capture());
        assert!(mv.is_en_passant());
        assert_eq!(mv.capture_square(), 35);
        assert_eq!(Move::quiet(12, 28, WHITE_PAWN).capture_square(), 28);
    }
}
