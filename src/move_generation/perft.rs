//! Movepath enumeration over the in-place apply/undo path.

use crate::game_state::chess_types::GameState;
use crate::move_generation::legal_move_apply::{apply_move_in_place, retract_move_in_place};
use crate::move_generation::legal_move_generator::{
    count_legal_moves, generate_legal_moves, has_legal_move,
};
use crate::moves::chess_move::ChessMove;

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

/// Leaf count at `depth`, materializing every level.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(game_state);
    let mut nodes = 0;
    for mv in &moves {
        let undo = apply_move_in_place(game_state, mv);
        nodes += perft(game_state, depth - 1);
        retract_move_in_place(game_state, &undo);
    }
    nodes
}

/// Leaf count at `depth`, counting the last ply without building moves.
pub fn perft_fast(game_state: &mut GameState, depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => count_legal_moves(game_state) as u64,
        _ => {
            let moves = generate_legal_moves(game_state);
            let mut nodes = 0;
            for mv in &moves {
                let undo = apply_move_in_place(game_state, mv);
                nodes += perft_fast(game_state, depth - 1);
                retract_move_in_place(game_state, &undo);
            }
            nodes
        }
    }
}

/// Leaf count per root move, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(ChessMove, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = generate_legal_moves(game_state);
    let mut split = Vec::with_capacity(moves.len());
    for mv in &moves {
        let undo = apply_move_in_place(game_state, mv);
        split.push((*mv, perft_fast(game_state, depth - 1)));
        retract_move_in_place(game_state, &undo);
    }
    split
}

/// Leaf count with a breakdown of the moves that reach the leaves.
pub fn perft_detailed(game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let moves = generate_legal_moves(game_state);
    let mut total = PerftCounts::default();
    for mv in &moves {
        let undo = apply_move_in_place(game_state, mv);
        if depth == 1 {
            total.merge(leaf_counts(game_state, mv));
        } else {
            total.merge(perft_detailed(game_state, depth - 1));
        }
        retract_move_in_place(game_state, &undo);
    }
    total
}

/// Classify the move just applied to reach a leaf.
fn leaf_counts(game_state: &GameState, mv: &ChessMove) -> PerftCounts {
    let gives_check = game_state.in_check();
    PerftCounts {
        nodes: 1,
        captures: u64::from(mv.is_capture()),
        en_passant: u64::from(mv.special == crate::moves::chess_move::SpecialCase::EnPassant),
        castles: u64::from(mv.is_castling()),
        promotions: u64::from(mv.is_promotion()),
        checks: u64::from(gives_check),
        checkmates: u64::from(gives_check && !has_legal_move(game_state)),
    }
}
