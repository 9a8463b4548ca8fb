//! Undo records and the bounded undo log.
//!
//! One record holds everything needed to reverse a single applied move: the
//! move itself, the pre-move environment, the captured target id and the
//! pre-move check/pin state.

use arrayvec::ArrayVec;

use crate::errors::internal_fault;
use crate::game_state::chess_rules::{MAX_PLY, TAKE_BACK_MARGIN};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::PinState;
use crate::moves::chess_move::ChessMove;

/// Game-state fields that a move changes other than the board itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// Single undo record for `make_move` / `unmake_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub mv: ChessMove,
    pub environment: Environment,
    pub captured: Option<TargetId>,
    pub pins: PinState,
}

pub const UNDO_LOG_CAPACITY: usize = MAX_PLY + TAKE_BACK_MARGIN;

/// Bounded stack of undo records. Overflow and underflow are engine faults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLog {
    records: ArrayVec<UndoState, UNDO_LOG_CAPACITY>,
}

impl UndoLog {
    pub fn push(&mut self, record: UndoState) {
        if self.records.try_push(record).is_err() {
            internal_fault("undo log overflow");
        }
    }

    pub fn pop(&mut self) -> UndoState {
        match self.records.pop() {
            Some(record) => record,
            None => internal_fault("undo log underflow"),
        }
    }

    #[inline]
    pub fn last(&self) -> Option<&UndoState> {
        self.records.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget the oldest record so an over-the-board game can keep going
    /// with a bounded take-back depth.
    pub fn discard_oldest(&mut self) {
        if !self.records.is_empty() {
            self.records.remove(0);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::target_set::TargetSet;

    fn record(tid: TargetId) -> UndoState {
        UndoState {
            mv: ChessMove::null(Color::Light),
            environment: Environment {
                side_to_move: Color::Light,
                castling_rights: CASTLE_ALL,
                en_passant_square: None,
                halfmove_clock: 0,
                fullmove_number: 1,
            },
            captured: Some(tid),
            pins: PinState {
                checkers: TargetSet::EMPTY,
                pinned: TargetSet::EMPTY,
                frozen: TargetSet::EMPTY,
                pin_direction: [None; TARGET_ID_COUNT],
            },
        }
    }

    #[test]
    fn push_pop_and_discard_oldest() {
        let mut log = UndoLog::default();
        log.push(record(1));
        log.push(record(2));
        log.push(record(3));
        log.discard_oldest();
        assert_eq!(log.len(), 2);
        assert_eq!(log.pop().captured, Some(3));
        assert_eq!(log.pop().captured, Some(2));
        assert!(log.is_empty());
    }

    #[test]
    #[should_panic(expected = "undo log overflow")]
    fn overflow_is_fatal() {
        let mut log = UndoLog::default();
        for _ in 0..=UNDO_LOG_CAPACITY {
            log.push(record(0));
        }
    }

    #[test]
    #[should_panic(expected = "undo log underflow")]
    fn underflow_is_fatal() {
        UndoLog::default().pop();
    }
}
