//! Check, checkmate and stalemate.
//!
//! All three verdicts are memoized in the placement-keyed cache. Move
//! testing never touches `self`: candidate moves are made and unmade on a
//! scratch copy, so a caller's position is never observed half-updated.
//!
//! Stalemate is memoized as "not in check and no move escapes", which does
//! not depend on whose turn it is; the side-to-move condition is applied on
//! top of the memo so positions sharing a placement still answer correctly.

use tracing::debug;

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::moves::chess_move::Move;

impl Position {
    /// Whether `attacker` attacks `square`.
    #[inline]
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        self.attack_bitboard(attacker).contains(square)
    }

    /// Whether `color`'s king is attacked. False when that king is missing.
    pub fn is_check(&self, color: Color) -> bool {
        let Some(king) = self.king_square(color) else {
            return false;
        };
        self.memo()
            .check_or_compute(color, || self.is_square_attacked(king, color.opposite()))
    }

    /// Whether `color` would stand in check once `mv` is played.
    pub fn is_check_after_move(&self, color: Color, mv: &Move) -> bool {
        let mut scratch = self.clone();
        scratch.make_move(mv);
        scratch.is_check(color)
    }

    /// In check, and no candidate move of `color` gets out of it.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.memo().checkmate_or_compute(color, || {
            let mated = self.is_check(color) && !self.has_escape(color);
            if mated {
                debug!(?color, key = self.placement_key, "checkmate detected");
            }
            mated
        })
    }

    /// Not in check, no move avoids check, and `color` is the side to move.
    pub fn is_stalemate(&self, color: Color, side_to_move: Color) -> bool {
        let no_safe_moves = self.memo().no_safe_moves_or_compute(color, || {
            let stuck = !self.is_check(color) && !self.has_escape(color);
            if stuck {
                debug!(?color, key = self.placement_key, "no safe moves");
            }
            stuck
        });
        no_safe_moves && color == side_to_move
    }

    #[inline]
    pub fn is_stalemate_for_side_to_move(&self) -> bool {
        self.is_stalemate(self.side_to_move, self.side_to_move)
    }

    /// Some candidate move leaves `color` out of check.
    fn has_escape(&self, color: Color) -> bool {
        let mut scratch = self.clone();
        for mv in self.pseudo_moves(color, false) {
            let undo = scratch.make_move(&mv);
            let still_in_check = scratch.is_check(color);
            scratch.unmake_move(undo);
            if !still_in_check {
                return true;
            }
        }
        false
    }
}
