//! Bounded stack of position hashes for repetition detection.
//!
//! A hash is pushed before each move is applied and popped when it is undone.
//! Lookups only compare same-side-to-move entries and never reach further
//! back than the half-move clock allows.

use arrayvec::ArrayVec;

use crate::errors::internal_fault;
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, MAX_PLY};
use crate::search::zobrist::PositionHash;

pub const HISTORY_CAPACITY: usize = FIFTY_MOVE_HALFMOVES as usize + MAX_PLY;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionHistory {
    hashes: ArrayVec<PositionHash, HISTORY_CAPACITY>,
}

impl RepetitionHistory {
    /// Record a hash; when full the oldest entry falls off.
    pub fn push(&mut self, hash: PositionHash) {
        if self.hashes.is_full() {
            self.hashes.remove(0);
        }
        self.hashes.push(hash);
    }

    pub fn pop(&mut self) -> PositionHash {
        match self.hashes.pop() {
            Some(hash) => hash,
            None => internal_fault("repetition history underflow"),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn clear(&mut self) {
        self.hashes.clear();
    }

    /// Number of earlier occurrences of `current` with the same side to
    /// move, scanning at most `halfmove_clock` plies back.
    pub fn count_occurrences(&self, current: PositionHash, halfmove_clock: u16) -> usize {
        let len = self.hashes.len();
        let reach = usize::from(halfmove_clock).min(len);
        (1..reach)
            .step_by(2)
            .filter(|offset| self.hashes[len - 1 - offset] == current)
            .count()
    }

    #[inline]
    pub fn is_repeated_once(&self, current: PositionHash, halfmove_clock: u16) -> bool {
        self.count_occurrences(current, halfmove_clock) >= 1
    }

    #[inline]
    pub fn is_repeated_twice(&self, current: PositionHash, halfmove_clock: u16) -> bool {
        self.count_occurrences(current, halfmove_clock) >= 2
    }
}
