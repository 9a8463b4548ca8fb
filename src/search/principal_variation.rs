//! Principal-variation bookkeeping for the alpha-beta search.
//!
//! Each ply owns the best continuation found below it during the current
//! iteration. When a move improves a node inside the window, the child's line
//! is copied up behind it. The root line is persisted as the `prior` line,
//! which seeds move ordering for the next iteration and is the search result.

use arrayvec::ArrayVec;

use crate::game_state::chess_rules::{MAX_PLY, MAX_PV_LEN};
use crate::moves::chess_move::ChessMove;
use crate::search::score::Score;

pub type PvLine = ArrayVec<ChessMove, MAX_PV_LEN>;

#[derive(Debug, Clone)]
pub struct PrincipalVariation {
    prior: PvLine,
    prior_score: Score,
    trace: [PvLine; MAX_PLY + 1],
}

impl Default for PrincipalVariation {
    fn default() -> Self {
        Self {
            prior: PvLine::new(),
            prior_score: Score::BROKEN,
            trace: std::array::from_fn(|_| PvLine::new()),
        }
    }
}

impl PrincipalVariation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.prior.clear();
        self.prior_score = Score::BROKEN;
        for line in self.trace.iter_mut() {
            line.clear();
        }
    }

    #[inline]
    pub fn clear_at_ply(&mut self, ply: usize) {
        if let Some(line) = self.trace.get_mut(ply) {
            line.clear();
        }
    }

    /// `mv` followed by the line found one ply deeper becomes this ply's line.
    pub fn copy_up_to_ply(&mut self, ply: usize, mv: ChessMove) {
        if ply >= MAX_PLY {
            return;
        }
        let (upper, lower) = self.trace.split_at_mut(ply + 1);
        let line = &mut upper[ply];
        line.clear();
        line.push(mv);
        for child in lower[0].iter().take(MAX_PV_LEN - 1) {
            line.push(*child);
        }
    }

    /// Persist the root line as the result of the search.
    pub fn copy_to_prior(&mut self, score: Score) {
        self.prior = self.trace[0].clone();
        self.prior_score = score;
    }

    pub fn set_single_move_pv(&mut self, mv: ChessMove, score: Score) {
        self.trace[0].clear();
        self.trace[0].push(mv);
        self.copy_to_prior(score);
    }

    /// Move the prior line expects at `ply`, if it reaches that far.
    #[inline]
    pub fn prior_move(&self, ply: usize) -> Option<ChessMove> {
        self.prior.get(ply).copied()
    }

    #[inline]
    pub fn prior_line(&self) -> &PvLine {
        &self.prior
    }

    #[inline]
    pub fn prior_score(&self) -> Score {
        self.prior_score
    }

    #[inline]
    pub fn line_at_ply(&self, ply: usize) -> &[ChessMove] {
        self.trace.get(ply).map_or(&[], |line| line.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::*;
    use crate::moves::chess_move::SpecialCase;

    fn pawn_push(from: Square) -> ChessMove {
        ChessMove::new(
            from,
            from + 8,
            Man::new(Color::Light, PieceKind::Pawn),
            None,
            SpecialCase::Regular,
        )
    }

    #[test]
    fn lines_copy_up_from_the_leaf() {
        let mut pv = PrincipalVariation::new();
        pv.copy_up_to_ply(2, pawn_push(10));
        pv.copy_up_to_ply(1, pawn_push(9));
        pv.copy_up_to_ply(0, pawn_push(8));
        assert_eq!(
            pv.line_at_ply(0),
            &[pawn_push(8), pawn_push(9), pawn_push(10)]
        );

        pv.copy_to_prior(Score::centipawns(35));
        assert_eq!(pv.prior_move(1), Some(pawn_push(9)));
        assert_eq!(pv.prior_move(3), None);
        assert_eq!(pv.prior_score(), Score::centipawns(35));
    }

    #[test]
    fn clearing_a_ply_cuts_the_copied_tail() {
        let mut pv = PrincipalVariation::new();
        pv.copy_up_to_ply(1, pawn_push(9));
        pv.clear_at_ply(1);
        pv.copy_up_to_ply(0, pawn_push(8));
        assert_eq!(pv.line_at_ply(0), &[pawn_push(8)]);
    }

    #[test]
    fn lines_are_capped() {
        let mut pv = PrincipalVariation::new();
        for ply in (0..MAX_PV_LEN + 2).rev() {
            pv.copy_up_to_ply(ply, pawn_push(8 + ply as Square));
        }
        assert_eq!(pv.line_at_ply(0).len(), MAX_PV_LEN);
    }

    #[test]
    fn single_move_line_replaces_prior() {
        let mut pv = PrincipalVariation::new();
        pv.copy_up_to_ply(1, pawn_push(9));
        pv.copy_up_to_ply(0, pawn_push(8));
        pv.copy_to_prior(Score::EVEN);
        pv.set_single_move_pv(pawn_push(12), Score::MATE_IN_1);
        assert_eq!(pv.prior_line().as_slice(), &[pawn_push(12)]);
        assert_eq!(pv.prior_score(), Score::MATE_IN_1);
    }
}
