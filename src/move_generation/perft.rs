//! Perft node counting over the legal move generator.
//!
//! Walks the move tree with make/unmake on a scratch copy and tallies leaf
//! statistics. The parallel variant splits at the root and runs one scoped
//! thread per root move, each on its own position copy while sharing the
//! engine context (and therefore the memo cache).

use std::thread;

use crate::game_state::position::Position;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(position: &Position, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut scratch = position.clone();
    let mut total = PerftCounts::default();
    perft_recurse(&mut scratch, depth, &mut total);
    total
}

pub fn perft_parallel(position: &Position, depth: u8) -> PerftCounts {
    if depth == 0 {
        return perft(position, depth);
    }

    let root_moves = position.legal_moves_for_side_to_move();
    let mut total = PerftCounts::default();
    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|mv| {
                let mut local_position = position.clone();
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    visit(&mut local_position, mv, depth, &mut local);
                    local
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(local) => total.merge(local),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });
    total
}

/// Count of leaf nodes only, without per-leaf classification.
pub fn perft_nodes(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves_for_side_to_move();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut scratch = position.clone();
    moves
        .iter()
        .map(|mv| {
            let undo = scratch.make_move(mv);
            let nodes = perft_nodes(&scratch, depth - 1);
            scratch.unmake_move(undo);
            nodes
        })
        .sum()
}

fn perft_recurse(position: &mut Position, depth: u8, counts: &mut PerftCounts) {
    for mv in position.legal_moves_for_side_to_move() {
        visit(position, &mv, depth, counts);
    }
}

fn visit(position: &mut Position, mv: &Move, depth: u8, counts: &mut PerftCounts) {
    let undo = position.make_move(mv);
    if depth == 1 {
        tally_leaf(position, mv, counts);
    } else {
        perft_recurse(position, depth - 1, counts);
    }
    position.unmake_move(undo);
}

fn tally_leaf(after: &Position, mv: &Move, counts: &mut PerftCounts) {
    counts.nodes += 1;
    if mv.is_capture() {
        counts.captures += 1;
    }
    if mv.is_en_passant() {
        counts.en_passant += 1;
    }
    if mv.is_castling() {
        counts.castles += 1;
    }
    if mv.promotion().is_some() {
        counts.promotions += 1;
    }

    let opponent = mv.piece.color.opposite();
    if after.is_check(opponent) {
        counts.checks += 1;
        if after.is_checkmate(opponent) {
            counts.checkmates += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Color;
    use crate::utils::render_game_state::placement_from_ascii;

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let game = Position::new_game();
        assert_eq!(
            perft(&game, 0),
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn opening_position_node_counts() {
        let game = Position::new_game();
        assert_eq!(perft_nodes(&game, 1), 20);
        assert_eq!(perft_nodes(&game, 2), 400);
        assert_eq!(perft_nodes(&game, 3), 8902);
    }

    #[test]
    fn opening_position_depth_three_statistics() {
        let game = Position::new_game();
        let counts = perft(&game, 3);
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 8902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn parallel_perft_matches_sequential() {
        let game = Position::new_game();
        assert_eq!(perft_parallel(&game, 2), perft(&game, 2));
    }

    #[test]
    fn rook_and_pawn_endgame_node_counts() {
        // Exercises en passant and discovered checks along the fourth rank.
        let placement = placement_from_ascii(
            "
            ________
            __p_____
            ___p____
            KP_____r
            _R___p_k
            ________
            ____P_P_
            ________
            ",
        )
        .expect("placement should parse");
        let game = Position::from_placement(&placement, Color::White, None);
        assert_eq!(perft_nodes(&game, 1), 14);
        assert_eq!(perft_nodes(&game, 2), 191);
        assert_eq!(perft_nodes(&game, 3), 2812);
    }
}
