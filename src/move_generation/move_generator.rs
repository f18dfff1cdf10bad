//! Per-square move generation.
//!
//! Generation runs in two stages. The first produces a raw destination
//! bitboard for the piece on a square. The second turns each destination
//! bit into a typed `Move`, classifying captures, en passant, promotions
//! and castling in that order.
//!
//! `king_reachable` selects between the two uses of the first stage. Legal
//! generation passes `false`, which withholds the enemy king's square and
//! adds castling. Attack sets pass `true`, which lets a piece "reach" the
//! enemy king (so adjacent kings see each other) and leaves castling out.

use tracing::trace;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::moves::chess_move::{CheckAnnotation, Move, MoveKind};
use crate::moves::king_moves::{castling_path, castling_side, king_destinations};
use crate::moves::knight_moves::knight_destinations;
use crate::moves::pawn_moves::{
    pawn_attacks, pawn_capture_destinations, pawn_push_destinations, square_behind,
};
use crate::moves::sliding_moves::{bishop_destinations, queen_destinations, rook_destinations};
use crate::utils::algebraic::square_to_algebraic;
use crate::utils::move_text::ParsedMove;

impl Position {
    /// Raw destination set of the piece on `square`; empty for an empty
    /// square.
    pub fn destinations_from(&self, square: Square, king_reachable: bool) -> Bitboard {
        let Some(piece) = self.piece_at(square) else {
            return Bitboard::EMPTY;
        };
        let color = piece.color;
        let enemies = self.occupancy(color.opposite());
        let mut unreachable = self.occupancy(color);
        if !king_reachable {
            unreachable |= self.pieces(color.opposite(), PieceKind::King);
        }

        let destinations = match piece.kind {
            PieceKind::Pawn => self.pawn_destinations(square, color, enemies, unreachable),
            PieceKind::Knight => knight_destinations(square, unreachable),
            PieceKind::Bishop => bishop_destinations(square, unreachable, enemies),
            PieceKind::Rook => rook_destinations(square, unreachable, enemies),
            PieceKind::Queen => queen_destinations(square, unreachable, enemies),
            PieceKind::King => {
                let steps = king_destinations(square, unreachable);
                if king_reachable {
                    steps
                } else {
                    steps | self.castling_destinations(color, square)
                }
            }
        };

        trace!(
            square = %square_to_algebraic(square),
            piece = %piece.to_char(),
            king_reachable,
            count = destinations.count(),
            "generated destinations"
        );
        destinations
    }

    fn pawn_destinations(
        &self,
        square: Square,
        color: Color,
        enemies: Bitboard,
        unreachable: Bitboard,
    ) -> Bitboard {
        let mut destinations = pawn_push_destinations(color, square, self.occupied())
            | pawn_capture_destinations(color, square, enemies, unreachable);
        if let Some(target) = self.en_passant_square {
            if self.is_en_passant_legal(square, target) {
                destinations |= Bitboard::from_square(target);
            }
        }
        destinations
    }

    /// Castling landing squares available to the king on `king_square`.
    fn castling_destinations(&self, color: Color, king_square: Square) -> Bitboard {
        let mut destinations = Bitboard::EMPTY;
        for short in [true, false] {
            if self.castling_allowed(color, short, king_square) {
                destinations |= Bitboard::from_square(castling_path(color, short).king_to);
            }
        }
        destinations
    }

    fn castling_allowed(&self, color: Color, short: bool, king_square: Square) -> bool {
        let path = castling_path(color, short);
        self.has_castling_right(color, short)
            && path.king_from == king_square
            && self.pieces(color, PieceKind::King).contains(path.king_from)
            && self.pieces(color, PieceKind::Rook).contains(path.rook_from)
            && (self.occupied() & path.must_be_empty).is_empty()
            && (self.attack_bitboard(color.opposite()) & path.must_be_safe).is_empty()
    }

    /// Whether `color` may castle on the given side right now.
    pub fn can_castle(&self, color: Color, short: bool) -> bool {
        self.castling_allowed(color, short, castling_path(color, short).king_from)
    }

    /// King move of two files from its home square.
    #[inline]
    pub fn is_castle_move(&self, piece: ColoredPiece, from: Square, to: Square) -> bool {
        piece.kind == PieceKind::King && castling_side(piece.color, from, to).is_some()
    }

    /// Typed moves for the piece on `square`, not yet filtered for leaving
    /// the mover's own king in check.
    pub fn moves_from(&self, square: Square, king_reachable: bool) -> Vec<Move> {
        let Some(piece) = self.piece_at(square) else {
            return Vec::new();
        };
        let destinations = self.destinations_from(square, king_reachable);
        let mut moves = Vec::with_capacity(destinations.count() as usize);
        for to in destinations.squares() {
            self.push_moves_to(&mut moves, piece, square, to);
        }
        moves
    }

    fn push_moves_to(&self, moves: &mut Vec<Move>, piece: ColoredPiece, from: Square, to: Square) {
        let color = piece.color;
        let is_pawn = piece.kind == PieceKind::Pawn;
        let promotes = is_pawn && rank_of(to) == color.promotion_rank();

        if let Some(target) = self.piece_at(to).filter(|target| target.color != color) {
            if promotes {
                push_promotions(moves, piece, from, to, Some(target));
            } else {
                moves.push(Move::new(from, to, piece, Some(target), MoveKind::Normal));
            }
        } else if is_pawn && self.en_passant_square == Some(to) && self.is_en_passant_legal(from, to)
        {
            if let Some(capture_square) = square_behind(color, to) {
                let captured = ColoredPiece::new(color.opposite(), PieceKind::Pawn);
                moves.push(Move::new(
                    from,
                    to,
                    piece,
                    Some(captured),
                    MoveKind::EnPassant { capture_square },
                ));
            }
        } else if promotes {
            push_promotions(moves, piece, from, to, None);
        } else if let Some(short) = castling_side(color, from, to).filter(|_| piece.kind == PieceKind::King) {
            moves.push(Move::new(from, to, piece, None, MoveKind::Castling { short }));
        } else {
            moves.push(Move::quiet(from, to, piece));
        }
    }

    /// Unfiltered moves of every `color` piece.
    pub fn pseudo_moves(&self, color: Color, king_reachable: bool) -> Vec<Move> {
        self.occupancy(color)
            .squares()
            .flat_map(|square| self.moves_from(square, king_reachable))
            .collect()
    }

    /// Moves of the piece on `square` that do not leave its own king in
    /// check.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        let Some(piece) = self.piece_at(square) else {
            return Vec::new();
        };
        self.moves_from(square, false)
            .into_iter()
            .filter(|mv| !self.is_check_after_move(piece.color, mv))
            .collect()
    }

    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.occupancy(color)
            .squares()
            .flat_map(|square| self.legal_moves_from(square))
            .collect()
    }

    #[inline]
    pub fn legal_moves_for_side_to_move(&self) -> Vec<Move> {
        self.legal_moves(self.side_to_move)
    }

    /// Every square `color` attacks, memoized per placement.
    pub fn attack_bitboard(&self, color: Color) -> Bitboard {
        self.memo()
            .attacks_or_compute(color, || self.compute_attack_bitboard(color))
    }

    /// Attack set computed from scratch. Pawns contribute their diagonal
    /// capture squares whether or not an enemy stands there; pushes are not
    /// attacks. Squares held by `color`'s own pieces are never included.
    pub fn compute_attack_bitboard(&self, color: Color) -> Bitboard {
        let own = self.occupancy(color);
        own.squares().fold(Bitboard::EMPTY, |acc, square| {
            let attacks = match self.piece_at(square) {
                Some(piece) if piece.kind == PieceKind::Pawn => {
                    pawn_attacks(color, square).without(own)
                }
                _ => self.destinations_from(square, true),
            };
            acc | attacks
        })
    }

    /// Match parsed move text against the legal moves of the side to move.
    /// Without a requested promotion piece the first match (the queen
    /// promotion) wins.
    pub fn resolve_move(&self, parsed: &ParsedMove) -> ChessResult<Move> {
        self.validate_piece_ownership(parsed.from, self.side_to_move)?;

        self.legal_moves_from(parsed.from)
            .into_iter()
            .filter(|mv| mv.to == parsed.to)
            .find(|mv| parsed.promotion.is_none() || mv.promotion() == parsed.promotion)
            .ok_or_else(|| {
                ChessError::IllegalMove(format!(
                    "{}-{}",
                    square_to_algebraic(parsed.from),
                    square_to_algebraic(parsed.to)
                ))
            })
    }

    /// Copy of `mv` carrying the opponent's check status after it is played.
    pub fn annotate(&self, mv: &Move) -> Move {
        let next = self.with_move(mv);
        let opponent = mv.piece.color.opposite();
        let annotation = if next.is_checkmate(opponent) {
            CheckAnnotation::Checkmate
        } else if next.is_check(opponent) {
            CheckAnnotation::Check
        } else {
            CheckAnnotation::None
        };
        mv.with_annotation(annotation)
    }
}

fn push_promotions(
    moves: &mut Vec<Move>,
    piece: ColoredPiece,
    from: Square,
    to: Square,
    captured: Option<ColoredPiece>,
) {
    for promote_to in PieceKind::PROMOTION_TARGETS {
        moves.push(Move::new(
            from,
            to,
            piece,
            captured,
            MoveKind::Promotion { promote_to },
        ));
    }
}
