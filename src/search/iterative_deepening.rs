//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Root shortcuts settle forced or trivial positions without searching.
//! Otherwise the root moves are ordered by a quiescence-only pass and then
//! searched to depth 1, 2, ... with the previous principal line tried first.
//! Below the horizon only captures and promotions are searched, from a stand
//! pat bound. Checks extend the search by one ply.
//!
//! A deadline and an external interrupt flag are polled cooperatively; once
//! either fires every node on the path unwinds with a broken score and the
//! best line from completed work is returned.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::game_state::chess_rules::{MAX_PLY, MAX_PV_LEN};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::generate_annotated_moves;
use crate::moves::chess_move::{ChessMove, MoveFlags};
use crate::moves::move_list::MoveList;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_picker::{MovePicker, NodeKind};
use crate::search::principal_variation::PrincipalVariation;
use crate::search::score::Score;
use crate::search::window::Window;
use crate::tables::opening_book::OpeningBook;

/// Gain-only moves that cannot lift the stand-pat bound to within this many
/// centipawns of alpha are skipped.
pub const DELTA_MARGIN: i16 = 200;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub time_limit_ms: u64,
    pub use_book: bool,
    /// Nodes between deadline polls.
    pub time_check_interval: u64,
    pub book_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_PLY as u8,
            time_limit_ms: 5_000,
            use_book: true,
            time_check_interval: 256,
            book_seed: None,
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTermination {
    /// Checkmate or stalemate at the root.
    NoMoves,
    MateIn1,
    AllCertain,
    Singleton,
    Book,
    ForcedMate,
    ForcedLose,
    LimitDepth,
    LimitTime,
    Interrupted,
}

impl fmt::Display for SearchTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SearchTermination::NoMoves => "no moves",
            SearchTermination::MateIn1 => "mate in 1",
            SearchTermination::AllCertain => "all moves certain",
            SearchTermination::Singleton => "single legal move",
            SearchTermination::Book => "book",
            SearchTermination::ForcedMate => "forced mate",
            SearchTermination::ForcedLose => "forced loss",
            SearchTermination::LimitDepth => "depth limit",
            SearchTermination::LimitTime => "time limit",
            SearchTermination::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<ChessMove>,
    pub line: Vec<ChessMove>,
    pub best_score: Score,
    pub termination: SearchTermination,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Search `game_state` and return the best line found.
///
/// The position is used as scratch space and is restored before returning.
pub fn iterative_deepening_search<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: &S,
    config: SearchConfig,
    book: Option<&OpeningBook>,
    interrupt: Option<&AtomicBool>,
) -> SearchResult {
    Searcher::new(game_state, scorer, config, book, interrupt).run()
}

pub struct Searcher<'a, S: BoardScorer> {
    game_state: &'a mut GameState,
    scorer: &'a S,
    config: SearchConfig,
    book: Option<&'a OpeningBook>,
    interrupt: Option<&'a AtomicBool>,

    root: MoveList,
    pv: PrincipalVariation,
    killers: [Option<ChessMove>; MAX_PLY + 1],

    ply: usize,
    depth: i32,
    nodes: u64,
    reached_depth: u8,
    started: Instant,
    deadline: Instant,
    stopped: Option<SearchTermination>,
    preliminary: bool,
    first_time_down: bool,
}

/// One ply of descent. Constructing it makes the move and steps the ply and
/// depth; dropping it takes the move back, on every exit path.
struct PlyGuard<'g, 'a, S: BoardScorer> {
    searcher: &'g mut Searcher<'a, S>,
}

impl<'g, 'a, S: BoardScorer> PlyGuard<'g, 'a, S> {
    fn enter(searcher: &'g mut Searcher<'a, S>, mv: &ChessMove) -> Self {
        searcher.game_state.make_move(mv);
        searcher.ply += 1;
        searcher.depth -= 1;
        Self { searcher }
    }
}

impl<'a, S: BoardScorer> Deref for PlyGuard<'_, 'a, S> {
    type Target = Searcher<'a, S>;

    fn deref(&self) -> &Self::Target {
        self.searcher
    }
}

impl<S: BoardScorer> DerefMut for PlyGuard<'_, '_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.searcher
    }
}

impl<S: BoardScorer> Drop for PlyGuard<'_, '_, S> {
    fn drop(&mut self) {
        self.searcher.depth += 1;
        self.searcher.ply -= 1;
        self.searcher.game_state.unmake_move();
    }
}

impl<'a, S: BoardScorer> Searcher<'a, S> {
    pub fn new(
        game_state: &'a mut GameState,
        scorer: &'a S,
        config: SearchConfig,
        book: Option<&'a OpeningBook>,
        interrupt: Option<&'a AtomicBool>,
    ) -> Self {
        let started = Instant::now();
        Self {
            game_state,
            scorer,
            config,
            book,
            interrupt,
            root: MoveList::new(),
            pv: PrincipalVariation::new(),
            killers: [None; MAX_PLY + 1],
            ply: 0,
            depth: 0,
            nodes: 0,
            reached_depth: 0,
            started,
            deadline: started + Duration::from_millis(config.time_limit_ms),
            stopped: None,
            preliminary: false,
            first_time_down: false,
        }
    }

    pub fn run(mut self) -> SearchResult {
        let termination = self.search_root();
        let line: Vec<ChessMove> = self.pv.prior_line().iter().copied().collect();
        let result = SearchResult {
            best_move: line.first().copied(),
            best_score: self.pv.prior_score(),
            line,
            termination,
            reached_depth: self.reached_depth,
            nodes: self.nodes,
            elapsed: self.started.elapsed(),
        };
        info!(
            termination = %result.termination,
            best = %result.best_move.map_or_else(|| "-".to_owned(), |mv| mv.to_coordinate()),
            score = %result.best_score,
            depth = result.reached_depth,
            nodes = result.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "search finished"
        );
        result
    }

    fn search_root(&mut self) -> SearchTermination {
        self.root = generate_annotated_moves(self.game_state);

        if self.root.is_empty() {
            let score = if self.game_state.in_check() {
                Score::LOSE_IN_0
            } else {
                Score::EVEN
            };
            self.pv.reset();
            self.pv.copy_to_prior(score);
            debug!(%score, "no legal moves at the root");
            return SearchTermination::NoMoves;
        }

        for mv in self.root.iter_mut() {
            if mv.flags.contains(MoveFlags::MATE) {
                mv.flags.insert(MoveFlags::CERTAIN);
                mv.score = Score::MATE_IN_1;
            }
        }
        if let Some(index) = self.root.best_certain_index() {
            if self.root.as_slice()[index].score == Score::MATE_IN_1 {
                return self.settle(index, SearchTermination::MateIn1);
            }
        }

        for index in 0..self.root.len() {
            let mv = self.root.as_slice()[index];
            if mv.is_certain() {
                continue;
            }
            self.game_state.make_move(&mv);
            let drawn = self.game_state.is_draw();
            self.game_state.unmake_move();
            if drawn {
                if let Some(entry) = self.root.get_mut(index) {
                    entry.flags.insert(MoveFlags::CERTAIN);
                    entry.score = Score::EVEN;
                }
            }
        }

        if self.root.all_certain() {
            if let Some(index) = self.root.best_certain_index() {
                return self.settle(index, SearchTermination::AllCertain);
            }
        }

        if self.root.len() == 1 {
            if let Some(only) = self.root.get_mut(0) {
                only.score = Score::EVEN;
            }
            return self.settle(0, SearchTermination::Singleton);
        }

        if self.config.use_book {
            if let Some(book) = self.book {
                let mut rng = match self.config.book_seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                if let Some(pick) = book.pick_move(self.game_state, &self.root, &mut rng) {
                    let index = self.root.locate(&pick).unwrap_or(0);
                    if let Some(entry) = self.root.get_mut(index) {
                        entry.flags.insert(MoveFlags::BOOK);
                        entry.score = Score::EVEN;
                    }
                    return self.settle(index, SearchTermination::Book);
                }
            }
        }

        self.order_root_moves();
        if Instant::now() >= self.deadline {
            if let Some(first) = self.root.get(0).copied() {
                self.pv.set_single_move_pv(first, Score::EVEN);
            }
            return SearchTermination::LimitTime;
        }

        for iteration in 0..self.config.max_depth.max(1) {
            self.depth = i32::from(iteration) + 1;
            self.first_time_down = true;
            self.search_node(Window::full());
            if let Some(reason) = self.stopped {
                return reason;
            }

            self.reached_depth = iteration + 1;
            let score = self.pv.prior_score();
            debug!(
                depth = self.reached_depth,
                %score,
                nodes = self.nodes,
                line = %format_line(self.pv.prior_line()),
                "iteration complete"
            );
            if score.is_mating() {
                return SearchTermination::ForcedMate;
            }
            if score.is_losing() {
                return SearchTermination::ForcedLose;
            }
        }
        SearchTermination::LimitDepth
    }

    /// Finish with the root move at `index` as the whole line.
    fn settle(&mut self, index: usize, termination: SearchTermination) -> SearchTermination {
        if let Some(mv) = self.root.get(index).copied() {
            debug!(mv = %mv.to_coordinate(), score = %mv.score, %termination, "root shortcut");
            self.pv.reset();
            self.pv.set_single_move_pv(mv, mv.score);
        }
        termination
    }

    /// Score each uncertain root move with a quiescence search and sort.
    fn order_root_moves(&mut self) {
        self.preliminary = true;
        self.depth = 0;
        for index in 0..self.root.len() {
            let mv = self.root.as_slice()[index];
            if mv.is_certain() {
                continue;
            }
            let score = {
                let mut child = PlyGuard::enter(self, &mv);
                child.search_node(Window::full()).shift_up()
            };
            if let Some(entry) = self.root.get_mut(index) {
                entry.score = score;
            }
        }
        self.root.sort_by_score_descending();
        self.preliminary = false;

        self.pv.reset();
        if let Some(first) = self.root.get(0).copied() {
            self.pv.set_single_move_pv(first, first.score);
        }
    }

    fn poll_limits(&mut self) {
        if self.preliminary || self.stopped.is_some() {
            return;
        }
        if is_poll_node(self.nodes, self.config.time_check_interval)
            && Instant::now() >= self.deadline
        {
            self.stopped = Some(SearchTermination::LimitTime);
            return;
        }
        if let Some(flag) = self.interrupt {
            if flag.swap(false, Ordering::Relaxed) {
                self.stopped = Some(SearchTermination::Interrupted);
            }
        }
    }

    #[inline]
    fn aborted(&self) -> bool {
        !self.preliminary && self.stopped.is_some()
    }

    fn search_node(&mut self, mut window: Window) -> Score {
        self.nodes += 1;
        self.pv.clear_at_ply(self.ply);
        self.poll_limits();
        if self.aborted() {
            return Score::BROKEN;
        }

        if self.ply > 0 && self.game_state.is_likely_draw() {
            return Score::EVEN;
        }
        if self.ply >= MAX_PLY {
            return self.scorer.score(self.game_state);
        }

        let in_check = self.game_state.in_check();
        let mut stand_pat = None;
        if self.depth <= 0 && !in_check {
            let static_score = self.scorer.score(self.game_state);
            if static_score > window.alpha {
                window.alpha = static_score;
            }
            if window.is_cut_off() {
                return window.alpha;
            }
            stand_pat = Some(static_score);
        }

        let kind = if self.ply == 0 && !self.preliminary {
            NodeKind::Base
        } else if in_check {
            NodeKind::Evasion
        } else if self.depth > 0 {
            NodeKind::Full
        } else {
            NodeKind::Gain
        };
        if kind == NodeKind::Evasion {
            self.depth += 1;
        }

        let pv_move = if self.first_time_down && self.ply < MAX_PV_LEN {
            self.pv.prior_move(self.ply)
        } else {
            None
        };
        let killer = self.killers[self.ply];
        let killer_before_last = self.ply.checked_sub(2).and_then(|ply| self.killers[ply]);
        let mut picker = MovePicker::new(kind, pv_move, killer, killer_before_last);

        let mut best: Option<ChessMove> = None;
        let mut tried = 0usize;
        let mut root_index = 0usize;

        while !self.aborted() && !window.is_cut_off() {
            let next = match kind {
                NodeKind::Base => {
                    let mv = self.root.get(root_index).copied();
                    root_index += 1;
                    mv
                }
                _ => picker.next(self.game_state),
            };
            let Some(mv) = next else {
                break;
            };

            if let Some(static_score) = stand_pat {
                if kind == NodeKind::Gain
                    && static_score.offset(mv.max_gain()).offset(DELTA_MARGIN) <= window.alpha
                {
                    tried += 1;
                    continue;
                }
            }
            if self.preliminary && kind == NodeKind::Gain && tried > 0 {
                break;
            }
            tried += 1;

            let score = if kind == NodeKind::Base && mv.is_certain() {
                self.pv.clear_at_ply(self.ply + 1);
                mv.score
            } else {
                let mut child = PlyGuard::enter(self, &mv);
                child.search_node(window.go_down()).shift_up()
            };
            if self.aborted() || score.is_broken() {
                break;
            }

            if score > window.alpha {
                let inside = score < window.beta;
                best = Some(mv);
                window.alpha = score;
                if inside {
                    self.pv.copy_up_to_ply(self.ply, mv);
                    if kind == NodeKind::Base {
                        self.pv.copy_to_prior(score);
                        if let Some(index) = self.root.locate(&mv) {
                            self.root.shift_to_front(index);
                        }
                    }
                }
            }
        }

        if !self.aborted() {
            if let Some(best) = best.filter(ChessMove::is_quiet) {
                self.killers[self.ply] = Some(best);
            }
            if tried == 0 && kind != NodeKind::Gain {
                window.alpha = if in_check {
                    Score::LOSE_IN_0
                } else {
                    Score::EVEN
                };
            }
        }
        if kind == NodeKind::Evasion {
            self.depth -= 1;
        }
        self.first_time_down = false;

        if self.aborted() {
            Score::BROKEN
        } else {
            window.alpha
        }
    }
}

/// Whether the deadline is read at this node count. Any interval works, not
/// only powers of two; zero polls every node.
#[inline]
fn is_poll_node(nodes: u64, interval: u64) -> bool {
    nodes % interval.max(1) == 0
}

fn format_line(line: &[ChessMove]) -> String {
    line.iter()
        .map(ChessMove::to_coordinate)
        .collect::<Vec<_>>()
        .join(" ")
}
