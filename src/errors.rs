//! Error types for position construction and move input.
//!
//! Only input-level failures surface here. Rule predicates never fail; a
//! misuse of the rules layer yields a wrong answer or an explicit no-op
//! outcome instead of an error.

use thiserror::Error;

/// Errors reported to callers feeding external text or placements in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Move text that does not match either notation.
    #[error("Invalid move text: {0}")]
    InvalidMoveText(String),

    /// A square name outside `a1..=h8`.
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// A promotion suffix naming something other than Q, N, R or B.
    #[error("Invalid promotion piece: {0}")]
    InvalidPromotionPiece(String),

    /// A placement grid with the wrong shape or an unknown piece letter.
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// The source square of a move holds no piece of the side to move.
    #[error("No piece of the side to move at {0}")]
    NoPieceAtSource(String),

    /// Well-formed move text that is not legal in the position.
    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

/// Result type alias for fallible engine operations.
pub type ChessResult<T> = Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::ChessError;

    #[test]
    fn error_messages_carry_offending_text() {
        let err = ChessError::InvalidSquare("i9".to_owned());
        assert_eq!(err.to_string(), "Invalid square: i9");

        let err = ChessError::IllegalMove("e2-e5".to_owned());
        assert!(err.to_string().contains("e2-e5"));
    }
}
