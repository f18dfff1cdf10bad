//! Move text encodings.
//!
//! Human notation is `e2-e4`, `e7-e8=Q`, or the castling tokens `O-O` and
//! `O-O-O` (resolved against the side to move). Captures use the same shape
//! as quiet moves, though `x` is accepted as the separator too. Machine
//! notation is the 4-5 character form `e2e4` / `e7e8q`.
//!
//! Parsing only checks shape. Whether the move is legal is decided by
//! `Position::resolve_move`, which matches the parsed squares against the
//! generated move list.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::chess_move::{CheckAnnotation, Move, MoveKind};
use crate::moves::king_moves::castling_path;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Move text reduced to squares plus an optional requested promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Parse human notation for the given side to move.
pub fn parse_human_move(text: &str, side_to_move: Color) -> ChessResult<ParsedMove> {
    let trimmed = text.trim().trim_end_matches(['+', '#']);
    if !trimmed.is_ascii() {
        return Err(ChessError::InvalidMoveText(text.to_owned()));
    }

    let castle = trimmed.to_ascii_uppercase().replace('0', "O");
    if castle == "O-O" || castle == "O-O-O" {
        let path = castling_path(side_to_move, castle == "O-O");
        return Ok(ParsedMove {
            from: path.king_from,
            to: path.king_to,
            promotion: None,
        });
    }

    let (body, promotion) = match trimmed.split_once('=') {
        Some((body, suffix)) => (body, Some(parse_promotion_suffix(suffix)?)),
        None => (trimmed, None),
    };

    let bytes = body.as_bytes();
    if bytes.len() != 5 || !matches!(bytes[2], b'-' | b'x' | b'X') {
        return Err(ChessError::InvalidMoveText(text.to_owned()));
    }

    Ok(ParsedMove {
        from: algebraic_to_square(&body[0..2])?,
        to: algebraic_to_square(&body[3..5])?,
        promotion,
    })
}

/// Parse machine notation (`e2e4`, `e7e8q`). The promotion letter may be
/// either case.
pub fn parse_machine_move(text: &str) -> ChessResult<ParsedMove> {
    let trimmed = text.trim();
    if !trimmed.is_ascii() || !(4..=5).contains(&trimmed.len()) {
        return Err(ChessError::InvalidMoveText(text.to_owned()));
    }

    let promotion = match trimmed.get(4..5) {
        Some(suffix) => Some(parse_promotion_suffix(suffix)?),
        None => None,
    };

    Ok(ParsedMove {
        from: algebraic_to_square(&trimmed[0..2])?,
        to: algebraic_to_square(&trimmed[2..4])?,
        promotion,
    })
}

fn parse_promotion_suffix(suffix: &str) -> ChessResult<PieceKind> {
    let mut chars = suffix.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => PieceKind::from_letter(letter)
            .filter(|kind| kind.is_promotion_target())
            .ok_or_else(|| ChessError::InvalidPromotionPiece(suffix.to_owned())),
        _ => Err(ChessError::InvalidPromotionPiece(suffix.to_owned())),
    }
}

fn castling_token(short: bool) -> &'static str {
    if short {
        "O-O"
    } else {
        "O-O-O"
    }
}

/// Human notation, the shape `parse_human_move` accepts.
pub fn render_human(mv: &Move) -> String {
    if let MoveKind::Castling { short } = mv.kind {
        return castling_token(short).to_owned();
    }

    let mut out = format!(
        "{}-{}",
        square_to_algebraic(mv.from),
        square_to_algebraic(mv.to)
    );
    if let Some(kind) = mv.promotion() {
        out.push('=');
        out.push(kind.letter());
    }
    out
}

/// Machine notation with a lowercase promotion letter.
pub fn render_machine(mv: &Move) -> String {
    let mut out = format!(
        "{}{}",
        square_to_algebraic(mv.from),
        square_to_algebraic(mv.to)
    );
    if let Some(kind) = mv.promotion() {
        out.push(kind.letter().to_ascii_lowercase());
    }
    out
}

/// Long algebraic rendering with capture separator and check suffix, for
/// example `Nb1-c3`, `e5xd6`, `e7xd8=Q+`, `O-O#`.
pub fn render_algebraic(mv: &Move) -> String {
    let mut out = match mv.kind {
        MoveKind::Castling { short } => castling_token(short).to_owned(),
        _ => {
            let mut body = String::with_capacity(8);
            if mv.piece.kind != PieceKind::Pawn {
                body.push(mv.piece.kind.letter());
            }
            body.push_str(&square_to_algebraic(mv.from));
            body.push(if mv.is_capture() { 'x' } else { '-' });
            body.push_str(&square_to_algebraic(mv.to));
            if let Some(kind) = mv.promotion() {
                body.push('=');
                body.push(kind.letter());
            }
            body
        }
    };

    match mv.annotation {
        CheckAnnotation::None => {}
        CheckAnnotation::Check => out.push('+'),
        CheckAnnotation::Checkmate => out.push('#'),
    }
    out
}
