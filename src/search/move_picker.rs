//! Lazy, phase-driven move supply for one search node.
//!
//! Full-width nodes never materialize every legal move up front. They offer
//! the inherited principal-variation move, then gainers by estimated gain,
//! then the two killers, then the quiet moves of each man, pawns first and
//! king last, ordered by how far they step toward the center. A move offered
//! in one phase is flagged searched so later phases skip it.

use arrayvec::ArrayVec;

use crate::game_state::chess_types::*;
use crate::game_state::target_set::TargetSet;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_generator::{
    generate_moves, generate_moves_for_target, generate_moves_from_square,
};
use crate::move_generation::legal_move_shared::{GenerationContext, GenerationMask};
use crate::moves::chess_move::ChessMove;
use crate::moves::move_list::MoveList;
use crate::search::board_scoring::center_distance;
use crate::search::score::Score;

/// How a node searches its moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root, walking the ordered root list.
    Base,
    /// In check: every evasion.
    Evasion,
    /// Above the horizon: every move.
    Full,
    /// At or below the horizon: captures and promotions only.
    Gain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    PrincipalVariation,
    Gainers,
    Killer,
    KillerBeforeLast,
    Holders,
    BestUnsearched,
    Done,
}

/// Score each move with its likely material gain.
///
/// A move onto a square the opponent attacks is assumed to lose the mover.
pub fn assign_likely_gain(game_state: &GameState, list: &mut MoveList) {
    let enemy = game_state.side_to_move.opposite();
    for mv in list.iter_mut() {
        let mut gain = mv.max_gain();
        if is_square_attacked(game_state, mv.to, enemy) {
            gain -= mv.from_man.value();
        }
        mv.score = Score::centipawns(gain);
    }
}

/// Score each move by how much closer to the center it lands.
pub fn assign_center_tropism_gain(list: &mut MoveList) {
    for mv in list.iter_mut() {
        mv.score = Score::centipawns(center_distance(mv.from) - center_distance(mv.to));
    }
}

#[derive(Debug, Clone)]
pub struct MovePicker {
    kind: NodeKind,
    phase: Phase,
    list: MoveList,
    pv_move: Option<ChessMove>,
    killer: Option<ChessMove>,
    killer_before_last: Option<ChessMove>,
    /// Moves already offered outside the current list.
    offered: ArrayVec<ChessMove, 3>,
    holder_kind: usize,
    holder_targets: TargetSet,
    holder_ctx: Option<GenerationContext>,
}

impl MovePicker {
    pub fn new(
        kind: NodeKind,
        pv_move: Option<ChessMove>,
        killer: Option<ChessMove>,
        killer_before_last: Option<ChessMove>,
    ) -> Self {
        let phase = match kind {
            NodeKind::Full => Phase::PrincipalVariation,
            NodeKind::Base => Phase::Done,
            NodeKind::Evasion | NodeKind::Gain => Phase::Init,
        };
        Self {
            kind,
            phase,
            list: MoveList::new(),
            pv_move,
            killer,
            killer_before_last,
            offered: ArrayVec::new(),
            holder_kind: 0,
            holder_targets: TargetSet::EMPTY,
            holder_ctx: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The next move to search, or `None` when the node is exhausted.
    ///
    /// `game_state` must be the node's own position on every call.
    pub fn next(&mut self, game_state: &GameState) -> Option<ChessMove> {
        loop {
            match self.phase {
                Phase::Init => {
                    let mask = match self.kind {
                        NodeKind::Gain => GenerationMask::Gainers,
                        _ => GenerationMask::All,
                    };
                    self.list = generate_moves(game_state, mask);
                    assign_likely_gain(game_state, &mut self.list);
                    self.phase = Phase::PrincipalVariation;
                }
                Phase::PrincipalVariation => {
                    if self.kind == NodeKind::Full {
                        self.phase = Phase::Gainers;
                        if let Some(pv) = self.pv_move.filter(|pv| is_playable(game_state, pv)) {
                            self.offered.push(pv);
                            return Some(pv);
                        }
                    } else {
                        self.phase = Phase::BestUnsearched;
                        if let Some(pv) = self.pv_move {
                            if self.list.mark_searched(&pv) {
                                return Some(pv);
                            }
                        }
                    }
                }
                Phase::Gainers => {
                    if self.list.is_empty() {
                        self.list = generate_moves(game_state, GenerationMask::Gainers);
                        assign_likely_gain(game_state, &mut self.list);
                        for offered in &self.offered {
                            self.list.mark_searched(offered);
                        }
                        if self.list.is_empty() {
                            self.phase = Phase::Killer;
                            continue;
                        }
                    }
                    if let Some(mv) = self.list.take_best_unsearched() {
                        return Some(mv);
                    }
                    self.phase = Phase::Killer;
                }
                Phase::Killer => {
                    self.phase = Phase::KillerBeforeLast;
                    let killer = self
                        .killer
                        .filter(|killer| Some(*killer) != self.pv_move)
                        .filter(|killer| is_playable_quiet(game_state, killer));
                    if let Some(killer) = killer {
                        self.offered.push(killer);
                        return Some(killer);
                    }
                }
                Phase::KillerBeforeLast => {
                    self.phase = Phase::Holders;
                    self.start_holders(game_state);
                    let killer = self
                        .killer_before_last
                        .filter(|killer| Some(*killer) != self.pv_move && Some(*killer) != self.killer)
                        .filter(|killer| is_playable_quiet(game_state, killer));
                    if let Some(killer) = killer {
                        self.offered.push(killer);
                        return Some(killer);
                    }
                }
                Phase::Holders => {
                    if let Some(mv) = self.list.take_best_unsearched() {
                        return Some(mv);
                    }
                    if !self.load_next_holder(game_state) {
                        self.phase = Phase::Done;
                    }
                }
                Phase::BestUnsearched => {
                    if let Some(mv) = self.list.take_best_unsearched() {
                        return Some(mv);
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return None,
            }
        }
    }

    fn start_holders(&mut self, game_state: &GameState) {
        self.list.clear();
        self.holder_kind = 0;
        self.holder_targets =
            game_state.targets_by_man[game_state.side_to_move.index()][PieceKind::Pawn.index()];
        self.holder_ctx = Some(GenerationContext::new(game_state, GenerationMask::Holders));
    }

    /// Fill the list with the quiet moves of the next man that has any.
    fn load_next_holder(&mut self, game_state: &GameState) -> bool {
        let Some(ctx) = self.holder_ctx else {
            return false;
        };
        let side = game_state.side_to_move.index();
        loop {
            while let Some(tid) = self.holder_targets.pop_first() {
                self.list.clear();
                generate_moves_for_target(game_state, tid, &ctx, &mut self.list);
                if self.list.is_empty() {
                    continue;
                }
                for offered in &self.offered {
                    self.list.mark_searched(offered);
                }
                assign_center_tropism_gain(&mut self.list);
                return true;
            }
            self.holder_kind += 1;
            let Some(kind) = PieceKind::ALL.get(self.holder_kind) else {
                return false;
            };
            self.holder_targets = game_state.targets_by_man[side][kind.index()];
        }
    }
}

/// Whether a move remembered from another position is legal here.
fn is_playable(game_state: &GameState, mv: &ChessMove) -> bool {
    owns_origin(game_state, mv)
        && generate_moves_from_square(game_state, mv.from, GenerationMask::All).contains(mv)
}

fn is_playable_quiet(game_state: &GameState, mv: &ChessMove) -> bool {
    owns_origin(game_state, mv)
        && generate_moves_from_square(game_state, mv.from, GenerationMask::Holders).contains(mv)
}

#[inline]
fn owns_origin(game_state: &GameState, mv: &ChessMove) -> bool {
    !mv.is_null()
        && mv.from_man.color == game_state.side_to_move
        && game_state.board[mv.from as usize] == Some(mv.from_man)
}
