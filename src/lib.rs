//! Crate root module declarations for the Quill chess engine.
//!
//! This file exposes the top-level subsystems (game state, move generation,
//! search, opening book, engine facade and text utilities) so the binary,
//! benches and external drivers can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod repetition_history;
    pub mod target_set;
    pub mod undo_state;
}

pub mod moves {
    pub mod attack_tables;
    pub mod chess_move;
    pub mod move_list;
    pub mod sliding_attacks;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_picker;
    pub mod principal_variation;
    pub mod score;
    pub mod window;
    pub mod zobrist;
}

pub mod tables {
    pub mod opening_book;
    pub mod tiny_move;
}

pub mod engines {
    pub mod chess_engine;
    pub mod time_management;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
    pub mod san;
}
