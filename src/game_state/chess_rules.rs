//! Canonical chess-rule constants and the positional rule predicates that
//! need no move generation: draw by material, the fifty-move rule, pawn
//! double-push and en-passant legality, and promotion.

use tracing::debug;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::moves::pawn_moves::{pawn_attacks, square_behind, square_in_front};
use crate::utils::algebraic::square_to_algebraic;

/// Starting bitboards per piece kind, `[white, black]`.
pub const STARTING_PAWNS: [u64; 2] = [0x0000_0000_0000_FF00, 0x00FF_0000_0000_0000];
pub const STARTING_KNIGHTS: [u64; 2] = [0x0000_0000_0000_0042, 0x4200_0000_0000_0000];
pub const STARTING_BISHOPS: [u64; 2] = [0x0000_0000_0000_0024, 0x2400_0000_0000_0000];
pub const STARTING_ROOKS: [u64; 2] = [0x0000_0000_0000_0081, 0x8100_0000_0000_0000];
pub const STARTING_QUEENS: [u64; 2] = [0x0000_0000_0000_0008, 0x0800_0000_0000_0000];
pub const STARTING_KINGS: [u64; 2] = [0x0000_0000_0000_0010, 0x1000_0000_0000_0000];

/// Halfmove clock value at which the fifty-move draw applies.
pub const FIFTY_MOVE_HALFMOVE_LIMIT: u16 = 100;

/// Result of a promotion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    Promoted,
    /// The square held no pawn of that color, or the target kind is not a
    /// promotion piece. The position is unchanged.
    NoOp,
}

impl Position {
    /// Dead-draw material: K v K, K+B v K, K+N v K, or K+B v K+B with both
    /// bishops on the same shade. Always false when a king is missing or any
    /// queen, rook or pawn remains.
    pub fn is_insufficient_material(&self) -> bool {
        if Color::ALL
            .iter()
            .any(|&color| self.pieces(color, PieceKind::King).is_empty())
        {
            return false;
        }

        let heavy_or_pawn = Color::ALL.iter().any(|&color| {
            [PieceKind::Queen, PieceKind::Rook, PieceKind::Pawn]
                .iter()
                .any(|&kind| self.pieces(color, kind).any())
        });
        if heavy_or_pawn {
            return false;
        }

        let bishops = |color| self.pieces(color, PieceKind::Bishop);
        let knights = |color| self.pieces(color, PieceKind::Knight);
        let minors = |color| bishops(color).count() + knights(color).count();

        let (white_minors, black_minors) = (minors(Color::White), minors(Color::Black));
        match (white_minors, black_minors) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (1, 1) => {
                let (white_bishop, black_bishop) =
                    (bishops(Color::White).first_square(), bishops(Color::Black).first_square());
                match (white_bishop, black_bishop) {
                    (Some(w), Some(b)) => square_shade(w) == square_shade(b),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Whether `color` still holds enough material to deliver mate.
    pub fn has_mating_material(&self, color: Color) -> bool {
        if [PieceKind::Pawn, PieceKind::Queen, PieceKind::Rook]
            .iter()
            .any(|&kind| self.pieces(color, kind).any())
        {
            return true;
        }

        let bishops = self.pieces(color, PieceKind::Bishop);
        let knights = self.pieces(color, PieceKind::Knight);

        let mut shades = bishops.squares().map(square_shade);
        let bishops_on_both_shades = match shades.next() {
            Some(first) => shades.any(|shade| shade != first),
            None => false,
        };

        bishops_on_both_shades
            || knights.count() >= 2
            || (bishops.count() == 1 && knights.count() == 1)
    }

    /// Number of `color` pieces of each kind, indexed by `PieceKind::index`.
    pub fn piece_counts(&self, color: Color) -> [u32; 6] {
        PieceKind::ALL.map(|kind| self.pieces(color, kind).count())
    }

    /// The piece on `square`, provided it belongs to `color`.
    pub fn validate_piece_ownership(&self, square: Square, color: Color) -> ChessResult<ColoredPiece> {
        self.piece_at(square)
            .filter(|piece| piece.color == color)
            .ok_or_else(|| ChessError::NoPieceAtSource(square_to_algebraic(square)))
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_HALFMOVE_LIMIT
    }

    /// A pawn on its home rank moving two squares straight ahead over an
    /// empty square onto an empty square.
    pub fn is_double_push_legal(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        if piece.kind != PieceKind::Pawn || rank_of(from) != piece.color.pawn_home_rank() {
            return false;
        }

        let Some(middle) = square_in_front(piece.color, from) else {
            return false;
        };
        let Some(landing) = square_in_front(piece.color, middle) else {
            return false;
        };

        let occupied = self.occupied();
        landing == to && !occupied.contains(middle) && !occupied.contains(to)
    }

    /// A pawn capturing diagonally onto the en-passant target right after an
    /// enemy double push, with the pushed pawn directly behind the target.
    pub fn is_en_passant_legal(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        if piece.kind != PieceKind::Pawn
            || !self.last_move_double_push
            || self.en_passant_square != Some(to)
            || !pawn_attacks(piece.color, from).contains(to)
        {
            return false;
        }

        square_behind(piece.color, to).is_some_and(|capture_square| {
            self.pieces(piece.color.opposite(), PieceKind::Pawn)
                .contains(capture_square)
        })
    }

    /// A pawn move from `from` landing on its promotion rank.
    pub fn is_pawn_promoting(&self, from: Square, to: Square) -> bool {
        match self.piece_at(from) {
            Some(piece) => {
                piece.kind == PieceKind::Pawn && rank_of(to) == piece.color.promotion_rank()
            }
            None => false,
        }
    }

    /// Swap the `color` pawn on `square` for `promote_to`. Invalid requests
    /// leave the position untouched and report `NoOp`.
    pub fn promote_pawn(
        &mut self,
        square: Square,
        color: Color,
        promote_to: PieceKind,
    ) -> PromotionOutcome {
        if !promote_to.is_promotion_target() {
            debug!(square, ?color, ?promote_to, "promotion ignored: invalid target kind");
            return PromotionOutcome::NoOp;
        }
        if !self.pieces(color, PieceKind::Pawn).contains(square) {
            debug!(square, ?color, "promotion ignored: no pawn of that color on square");
            return PromotionOutcome::NoOp;
        }

        let pawn = ColoredPiece::new(color, PieceKind::Pawn);
        let promoted = ColoredPiece::new(color, promote_to);
        self.toggle_piece(pawn, square);
        self.toggle_piece(promoted, square);
        PromotionOutcome::Promoted
    }

    /// Flip one piece bit and keep both hash keys in step.
    #[inline]
    pub(crate) fn toggle_piece(&mut self, piece: ColoredPiece, square: Square) {
        self.pieces[piece.color.index()][piece.kind.index()] ^= Bitboard::from_square(square);
        let key = self.context.zobrist().piece_square_key(piece, square);
        self.zobrist_key ^= key;
        self.placement_key ^= key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::render_game_state::placement_from_ascii;

    fn position(ascii: &str) -> Position {
        let placement = placement_from_ascii(ascii).expect("placement should parse");
        Position::from_placement(&placement, Color::White, None)
    }

    const LONE_KINGS: &str = "
        ____k___
        ________
        ________
        ________
        ________
        ________
        ________
        ____K___
    ";

    #[test]
    fn lone_kings_are_insufficient() {
        assert!(position(LONE_KINGS).is_insufficient_material());
    }

    #[test]
    fn same_shade_bishops_stay_insufficient_until_a_pawn_appears() {
        let mut pos = position(LONE_KINGS);
        // c1 and f8 are both dark squares.
        pos.set_square(2, ColoredPiece::new(Color::White, PieceKind::Bishop));
        pos.set_square(61, ColoredPiece::new(Color::Black, PieceKind::Bishop));
        assert_eq!(square_shade(2), square_shade(61));
        assert!(pos.is_insufficient_material());

        pos.set_square(12, ColoredPiece::new(Color::White, PieceKind::Pawn));
        assert!(!pos.is_insufficient_material());
    }

    #[test]
    fn opposite_shade_bishops_are_sufficient() {
        let mut pos = position(LONE_KINGS);
        pos.set_square(2, ColoredPiece::new(Color::White, PieceKind::Bishop));
        pos.set_square(58, ColoredPiece::new(Color::Black, PieceKind::Bishop));
        assert!(!pos.is_insufficient_material());
    }

    #[test]
    fn single_minor_piece_is_insufficient() {
        let mut pos = position(LONE_KINGS);
        pos.set_square(1, ColoredPiece::new(Color::White, PieceKind::Knight));
        assert!(pos.is_insufficient_material());
        pos.set_square(6, ColoredPiece::new(Color::White, PieceKind::Knight));
        assert!(!pos.is_insufficient_material());
    }

    #[test]
    fn missing_king_is_never_insufficient() {
        let mut pos = position(LONE_KINGS);
        pos.clear_square(60);
        assert!(!pos.is_insufficient_material());
    }

    #[test]
    fn mating_material_by_piece_mix() {
        let mut pos = position(LONE_KINGS);
        assert!(!pos.has_mating_material(Color::White));

        pos.set_square(2, ColoredPiece::new(Color::White, PieceKind::Bishop));
        assert!(!pos.has_mating_material(Color::White));
        pos.set_square(1, ColoredPiece::new(Color::White, PieceKind::Knight));
        assert!(pos.has_mating_material(Color::White));

        pos.clear_square(1);
        pos.set_square(5, ColoredPiece::new(Color::White, PieceKind::Bishop));
        assert!(pos.has_mating_material(Color::White));

        assert!(!pos.has_mating_material(Color::Black));
        pos.set_square(48, ColoredPiece::new(Color::Black, PieceKind::Pawn));
        assert!(pos.has_mating_material(Color::Black));
    }

    #[test]
    fn piece_counts_and_ownership() {
        let pos = Position::new_game();
        assert_eq!(pos.piece_counts(Color::White), [8, 2, 2, 2, 1, 1]);
        assert_eq!(pos.piece_counts(Color::Black), [8, 2, 2, 2, 1, 1]);

        assert_eq!(
            pos.validate_piece_ownership(1, Color::White),
            Ok(ColoredPiece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(
            pos.validate_piece_ownership(1, Color::Black),
            Err(ChessError::NoPieceAtSource("b1".to_string()))
        );
        assert!(pos.validate_piece_ownership(27, Color::White).is_err());
    }

    #[test]
    fn bishop_and_knight_mate_needs_exactly_one_of_each() {
        let mut pos = position(LONE_KINGS);
        pos.set_square(1, ColoredPiece::new(Color::White, PieceKind::Knight));
        pos.set_square(2, ColoredPiece::new(Color::White, PieceKind::Bishop));
        assert!(pos.has_mating_material(Color::White));

        // c1 and a3 share a shade.
        pos.set_square(16, ColoredPiece::new(Color::White, PieceKind::Bishop));
        assert!(!pos.has_mating_material(Color::White));
    }

    #[test]
    fn double_push_requires_home_rank_and_clear_path() {
        let mut pos = Position::new_game();
        assert!(pos.is_double_push_legal(12, 28));
        assert!(!pos.is_double_push_legal(12, 20));
        assert!(pos.is_double_push_legal(52, 36));

        pos.set_square(20, ColoredPiece::new(Color::Black, PieceKind::Knight));
        assert!(!pos.is_double_push_legal(12, 28));
        assert!(!pos.is_double_push_legal(1, 17));
    }

    #[test]
    fn promotion_outcomes() {
        let mut pos = position(
            "
            ____k___
            P_______
            ________
            ________
            ________
            ________
            ________
            ____K___
            ",
        );
        assert!(pos.is_pawn_promoting(48, 56));
        assert!(!pos.is_pawn_promoting(4, 12));

        let before = pos.clone();
        assert_eq!(
            pos.promote_pawn(48, Color::White, PieceKind::King),
            PromotionOutcome::NoOp
        );
        assert_eq!(
            pos.promote_pawn(48, Color::Black, PieceKind::Queen),
            PromotionOutcome::NoOp
        );
        assert_eq!(pos, before);

        assert_eq!(
            pos.promote_pawn(48, Color::White, PieceKind::Rook),
            PromotionOutcome::Promoted
        );
        assert_eq!(
            pos.piece_at(48),
            Some(ColoredPiece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(pos.zobrist_key(), pos.recomputed_zobrist_key());
    }

    #[test]
    fn fifty_move_rule_at_one_hundred_plies() {
        let mut pos = Position::new_game();
        pos.halfmove_clock = 99;
        assert!(!pos.is_fifty_move_draw());
        pos.halfmove_clock = 100;
        assert!(pos.is_fifty_move_draw());
    }
}
