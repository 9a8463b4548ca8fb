//! Pieces shared by the per-piece generators: the move sink abstraction,
//! generation masks and pin-aware destination filtering.
//!
//! Materializing generation, move counting and the "any move?" probe all run
//! through the same generator code and differ only in their sink, so their
//! legality decisions cannot drift apart.

use crate::game_state::chess_types::*;
use crate::moves::chess_move::{ChessMove, SpecialCase};
use crate::moves::move_list::MoveList;
use crate::moves::sliding_attacks::{between, line_through};

/// Which families of moves a generator call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMask {
    /// Captures and promotions.
    Gainers,
    /// Everything else, castling included.
    Holders,
    All,
}

impl GenerationMask {
    #[inline]
    pub const fn gainers(self) -> bool {
        matches!(self, GenerationMask::Gainers | GenerationMask::All)
    }

    #[inline]
    pub const fn holders(self) -> bool {
        matches!(self, GenerationMask::Holders | GenerationMask::All)
    }
}

/// Receives generated moves.
pub trait MoveSink {
    fn accept(&mut self, mv: ChessMove);

    /// Accept one regular move from `from` to every square in `targets`.
    fn accept_targets(&mut self, game_state: &GameState, from: Square, man: Man, mut targets: u64) {
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            self.accept(ChessMove::new(
                from,
                to,
                man,
                game_state.board[to as usize],
                SpecialCase::Regular,
            ));
            targets &= targets - 1;
        }
    }

    /// Generation may stop early once this returns true.
    fn is_satisfied(&self) -> bool {
        false
    }
}

impl MoveSink for MoveList {
    #[inline]
    fn accept(&mut self, mv: ChessMove) {
        self.push(mv);
    }
}

/// Counts moves without building them.
#[derive(Debug, Default)]
pub struct MoveCounter {
    pub count: usize,
}

impl MoveSink for MoveCounter {
    #[inline]
    fn accept(&mut self, _mv: ChessMove) {
        self.count += 1;
    }

    #[inline]
    fn accept_targets(&mut self, _game_state: &GameState, _from: Square, _man: Man, targets: u64) {
        self.count += targets.count_ones() as usize;
    }
}

/// Records only whether any move exists.
#[derive(Debug, Default)]
pub struct AnyMoveProbe {
    pub found: bool,
}

impl MoveSink for AnyMoveProbe {
    #[inline]
    fn accept(&mut self, _mv: ChessMove) {
        self.found = true;
    }

    #[inline]
    fn accept_targets(&mut self, _game_state: &GameState, _from: Square, _man: Man, targets: u64) {
        self.found |= targets != 0;
    }

    #[inline]
    fn is_satisfied(&self) -> bool {
        self.found
    }
}

/// Per-call generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext {
    pub side: Color,
    pub mask: GenerationMask,
    /// Destinations open to non-king men: everything, or while in single
    /// check the checker's square and the squares between it and the king.
    pub restriction: u64,
    pub evading: bool,
}

impl GenerationContext {
    /// Context for the side to move. In check, non-king men are confined to
    /// capturing or blocking a single checker; under double check they get
    /// no destinations at all.
    pub fn new(game_state: &GameState, mask: GenerationMask) -> Self {
        let side = game_state.side_to_move;
        let checkers = game_state.pins.checkers;
        let restriction = match (checkers.len(), checkers.first(), game_state.king_square(side)) {
            (0, _, _) => !0,
            (1, Some(checker), Some(king_sq)) => match game_state.target_to_square[checker as usize] {
                Some(checker_sq) => square_mask(checker_sq) | between(king_sq, checker_sq),
                None => 0,
            },
            _ => 0,
        };
        Self {
            side,
            mask,
            restriction,
            evading: !checkers.is_empty(),
        }
    }
}

/// Destinations a man may reach without breaking its pin or ignoring a check.
#[inline]
pub fn allowed_destinations(game_state: &GameState, tid: TargetId, ctx: &GenerationContext) -> u64 {
    let mut allowed = ctx.restriction;
    if game_state.pins.pinned.contains(tid) {
        let line = game_state.pins.pin_direction[tid as usize];
        match (game_state.king_square(ctx.side), line) {
            (Some(king_sq), Some(line)) => allowed &= line_through(king_sq, line),
            _ => allowed = 0,
        }
    }
    allowed
}

/// Split a destination set into captures and quiet moves per the mask and
/// hand the selected ones to the sink.
#[inline]
pub fn emit_targets<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    man: Man,
    targets: u64,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    let mut selected = 0u64;
    if ctx.mask.gainers() {
        selected |= targets & game_state.occupancy_by_color[ctx.side.opposite().index()];
    }
    if ctx.mask.holders() {
        selected |= targets & !game_state.occupancy_all;
    }
    if selected != 0 {
        sink.accept_targets(game_state, from, man, selected);
    }
}
