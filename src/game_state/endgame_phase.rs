//! Endgame-phase classifier.
//!
//! A heuristic vote over six conditions; the position counts as an endgame
//! once `EndgameThresholds::required_conditions` of them hold. It is not a
//! rule of chess and only promises a deterministic answer per position and
//! full-turn number.

use crate::config::EndgameThresholds;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

/// Individual condition outcomes of the vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndgameAssessment {
    pub queens_off_board: bool,
    pub few_pieces_remaining: bool,
    pub kings_active: bool,
    pub late_in_game: bool,
    pub low_mobility: bool,
    pub pawns_advanced: bool,
}

impl EndgameAssessment {
    pub fn satisfied(&self) -> usize {
        [
            self.queens_off_board,
            self.few_pieces_remaining,
            self.kings_active,
            self.late_in_game,
            self.low_mobility,
            self.pawns_advanced,
        ]
        .into_iter()
        .filter(|&held| held)
        .count()
    }
}

impl Position {
    pub fn queens_off_board(&self) -> bool {
        Color::ALL
            .iter()
            .all(|&color| self.pieces(color, PieceKind::Queen).is_empty())
    }

    /// Pieces on the board, kings and pawns included.
    #[inline]
    pub fn pieces_remaining(&self) -> u32 {
        self.occupied().count()
    }

    /// Both kings have at least `min_quiet_moves` legal non-capturing moves.
    pub fn are_kings_active(&self, min_quiet_moves: usize) -> bool {
        Color::ALL.iter().all(|&color| match self.king_square(color) {
            Some(king) => {
                self.legal_moves_from(king)
                    .iter()
                    .filter(|mv| !mv.is_capture())
                    .count()
                    >= min_quiet_moves
            }
            None => false,
        })
    }

    /// Combined size of both sides' attack sets.
    pub fn total_mobility(&self) -> u32 {
        self.attack_bitboard(Color::White).count() + self.attack_bitboard(Color::Black).count()
    }

    /// At least `ratio` of `color`'s pawns stand past the middle of the
    /// board: rank 4 or beyond for white, rank 5 or below for black. A side
    /// with no pawns has nothing to advance and never qualifies.
    pub fn pawns_have_progressed(&self, color: Color, ratio: f64) -> bool {
        let pawns = self.pieces(color, PieceKind::Pawn);
        if pawns.is_empty() {
            return false;
        }
        let advanced = pawns
            .squares()
            .filter(|&square| match color {
                Color::White => rank_of(square) >= 3,
                Color::Black => rank_of(square) <= 4,
            })
            .count();
        advanced as f64 >= ratio * pawns.count() as f64
    }

    /// Evaluate each condition with the context's thresholds.
    pub fn endgame_assessment(&self, full_turn: u32) -> EndgameAssessment {
        let thresholds = self.context.config().endgame;
        self.endgame_assessment_with(full_turn, &thresholds)
    }

    pub fn endgame_assessment_with(
        &self,
        full_turn: u32,
        thresholds: &EndgameThresholds,
    ) -> EndgameAssessment {
        EndgameAssessment {
            queens_off_board: self.queens_off_board(),
            few_pieces_remaining: self.pieces_remaining() <= thresholds.max_pieces,
            kings_active: self.are_kings_active(thresholds.active_king_moves),
            late_in_game: full_turn >= thresholds.min_full_turns,
            low_mobility: self.total_mobility() <= thresholds.max_total_mobility,
            pawns_advanced: self
                .pawns_have_progressed(self.side_to_move, thresholds.advanced_pawn_ratio),
        }
    }

    pub fn is_endgame(&self, full_turn: u32) -> bool {
        let required = self.context.config().endgame.required_conditions;
        self.endgame_assessment(full_turn).satisfied() >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::render_game_state::placement_from_ascii;

    fn position(ascii: &str, side: Color) -> Position {
        let placement = placement_from_ascii(ascii).expect("placement should parse");
        Position::from_placement(&placement, side, None)
    }

    #[test]
    fn opening_position_is_not_endgame() {
        let game = Position::new_game();
        let assessment = game.endgame_assessment(1);
        assert!(!assessment.queens_off_board);
        assert!(!assessment.few_pieces_remaining);
        assert!(!assessment.kings_active);
        assert!(!assessment.late_in_game);
        assert!(!assessment.pawns_advanced);
        assert!(!game.is_endgame(1));
        assert!(!game.is_endgame(80));
    }

    #[test]
    fn king_and_pawn_ending_is_endgame() {
        let game = position(
            "
            ________
            ________
            ___k____
            ________
            ____P___
            ___K____
            ________
            ________
            ",
            Color::White,
        );
        let assessment = game.endgame_assessment(40);
        assert!(assessment.queens_off_board);
        assert!(assessment.few_pieces_remaining);
        assert!(assessment.kings_active);
        assert!(assessment.late_in_game);
        assert!(assessment.low_mobility);
        assert!(assessment.pawns_advanced);
        assert_eq!(assessment.satisfied(), 6);
        assert!(game.is_endgame(40));
        assert!(game.is_endgame(1));
    }

    #[test]
    fn pawn_progress_uses_color_relative_ranks() {
        let game = position(
            "
            ____k___
            pp______
            ________
            ________
            _____p__
            PP______
            ______P_
            ____K___
            ",
            Color::White,
        );
        // White: no pawn has reached rank 4.
        assert!(!game.pawns_have_progressed(Color::White, 2.0 / 3.0));
        assert!(game.pawns_have_progressed(Color::White, 0.0));
        // Black: one of three pawns on rank 5 or below.
        assert!(!game.pawns_have_progressed(Color::Black, 2.0 / 3.0));
        assert!(game.pawns_have_progressed(Color::Black, 0.3));
    }

    #[test]
    fn pawnless_side_is_not_advanced() {
        let game = position(
            "
            ____k___
            ________
            ________
            ________
            ________
            ________
            ________
            R___K___
            ",
            Color::White,
        );
        assert!(!game.pawns_have_progressed(Color::White, 2.0 / 3.0));
        assert!(!game.pawns_have_progressed(Color::Black, 0.0));
        assert!(!game.endgame_assessment(40).pawns_advanced);
    }

    #[test]
    fn cramped_king_is_not_active() {
        let game = position(
            "
            _______k
            ______pp
            ________
            ________
            ________
            ________
            ________
            ___K____
            ",
            Color::White,
        );
        assert!(!game.are_kings_active(4));
        assert!(game.are_kings_active(1));
    }
}
