//! Crate root module declarations for the bitboard chess rules engine.
//!
//! The engine represents a position as twelve piece bitboards, generates
//! legal moves, answers rule predicates (check, checkmate, stalemate and the
//! draw conditions), and keeps an incrementally-updated Zobrist hash used to
//! memoize the expensive predicates. Front ends, game-level bookkeeping and
//! search sit outside this crate and drive it through `Position`.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod bitboard;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod endgame_phase;
    pub mod position;
    pub mod undo_state;
}

pub mod moves {
    pub mod chess_move;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod sliding_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod move_generator;
    pub mod perft;
}

pub mod hashing {
    pub mod engine_context;
    pub mod position_cache;
    pub mod zobrist;
}

pub mod utils {
    pub mod algebraic;
    pub mod move_text;
    pub mod render_game_state;
}
