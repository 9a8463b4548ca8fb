//! Fixed-capacity move list used at every search node.

use arrayvec::ArrayVec;

use crate::game_state::chess_rules::MAX_MOVES;
use crate::moves::chess_move::{ChessMove, MoveFlags};

#[derive(Debug, Clone, Default)]
pub struct MoveList {
    moves: ArrayVec<ChessMove, MAX_MOVES>,
}

impl MoveList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, mv: ChessMove) {
        self.moves.push(mv);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ChessMove> {
        self.moves.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ChessMove> {
        self.moves.get_mut(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ChessMove> {
        self.moves.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ChessMove> {
        self.moves.iter_mut()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChessMove] {
        &self.moves
    }

    /// Index of a move with the same identity.
    pub fn locate(&self, mv: &ChessMove) -> Option<usize> {
        self.moves.iter().position(|candidate| candidate == mv)
    }

    pub fn contains(&self, mv: &ChessMove) -> bool {
        self.locate(mv).is_some()
    }

    /// Mark the move with `mv`'s identity as already tried.
    pub fn mark_searched(&mut self, mv: &ChessMove) -> bool {
        match self.locate(mv) {
            Some(index) => {
                self.moves[index].flags.insert(MoveFlags::SEARCHED);
                true
            }
            None => false,
        }
    }

    pub fn clear_searched(&mut self) {
        for mv in self.moves.iter_mut() {
            mv.flags.remove(MoveFlags::SEARCHED);
        }
    }

    /// Highest-scored move not yet tried; marks it tried.
    ///
    /// Ties go to the earliest move in the list.
    pub fn take_best_unsearched(&mut self) -> Option<ChessMove> {
        let mut best: Option<usize> = None;
        for (index, mv) in self.moves.iter().enumerate() {
            if mv.is_searched() {
                continue;
            }
            match best {
                Some(current) if self.moves[current].score >= mv.score => {}
                _ => best = Some(index),
            }
        }
        let index = best?;
        self.moves[index].flags.insert(MoveFlags::SEARCHED);
        Some(self.moves[index])
    }

    /// Stable sort by descending score.
    pub fn sort_by_score_descending(&mut self) {
        self.moves.sort_by(|a, b| b.score.cmp(&a.score));
    }

    /// Move the entry at `index` to the front, keeping the others in order.
    pub fn shift_to_front(&mut self, index: usize) {
        if index < self.moves.len() {
            self.moves[..=index].rotate_right(1);
        }
    }

    /// Index of the best certain-scored move.
    pub fn best_certain_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, mv) in self.moves.iter().enumerate() {
            if !mv.is_certain() {
                continue;
            }
            match best {
                Some(current) if self.moves[current].score >= mv.score => {}
                _ => best = Some(index),
            }
        }
        best
    }

    pub fn all_certain(&self) -> bool {
        self.moves.iter().all(ChessMove::is_certain)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ChessMove;
    type IntoIter = std::slice::Iter<'a, ChessMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
