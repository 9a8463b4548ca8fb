//! Engine facade for an external driver.
//!
//! `ChessEngine` owns the game in progress, the option set, an optional
//! opening book and the interrupt flag. Every operation that takes user input
//! either succeeds completely or leaves the engine as it was.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engines::time_management::{resolve_time_budget, Clock};
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{MAX_PLY, TAKE_BACK_MARGIN};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::{generate_annotated_moves, has_legal_move};
use crate::moves::chess_move::ChessMove;
use crate::moves::move_list::MoveList;
use crate::search::board_scoring::PlacementScorer;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchResult};
use crate::tables::opening_book::OpeningBook;
use crate::utils::render_game_state::render_game_state;
use crate::utils::san;

/// How the game stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTermination {
    Checkmate,
    Stalemate,
    FiftyMoves,
    Insufficient,
    Repetition,
    Unterminated,
}

impl GameTermination {
    pub fn is_over(self) -> bool {
        self != GameTermination::Unterminated
    }
}

impl fmt::Display for GameTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameTermination::Checkmate => "checkmate",
            GameTermination::Stalemate => "stalemate",
            GameTermination::FiftyMoves => "fifty-move rule",
            GameTermination::Insufficient => "insufficient material",
            GameTermination::Repetition => "repetition",
            GameTermination::Unterminated => "in progress",
        };
        f.write_str(text)
    }
}

/// Settings a driver may change by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub depth: u8,
    pub move_time_ms: u64,
    pub own_book: bool,
    pub book_seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            depth: search.max_depth,
            move_time_ms: search.time_limit_ms,
            own_book: search.use_book,
            book_seed: search.book_seed,
        }
    }
}

impl EngineOptions {
    /// Set one option from driver text. Names are case-insensitive; a
    /// rejected value leaves every option unchanged.
    pub fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        let trimmed = value.trim();
        let bad_value = || ChessError::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        };

        if name.eq_ignore_ascii_case("Depth") {
            self.depth = trimmed
                .parse::<u8>()
                .ok()
                .filter(|depth| (1..=MAX_PLY as u8).contains(depth))
                .ok_or_else(bad_value)?;
        } else if name.eq_ignore_ascii_case("MoveTime") {
            self.move_time_ms = trimmed
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms >= 1)
                .ok_or_else(bad_value)?;
        } else if name.eq_ignore_ascii_case("OwnBook") {
            self.own_book = match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => return Err(bad_value()),
            };
        } else if name.eq_ignore_ascii_case("BookSeed") {
            self.book_seed = Some(trimmed.parse::<u64>().map_err(|_| bad_value())?);
        } else {
            return Err(ChessError::UnknownOption(name.to_owned()));
        }
        Ok(())
    }

    fn search_config(&self, time_limit_ms: Option<u64>, depth: Option<u8>) -> SearchConfig {
        SearchConfig {
            max_depth: depth.unwrap_or(self.depth).clamp(1, MAX_PLY as u8),
            time_limit_ms: time_limit_ms.unwrap_or(self.move_time_ms).max(1),
            use_book: self.own_book,
            book_seed: self.book_seed,
            ..SearchConfig::default()
        }
    }
}

pub struct ChessEngine {
    game_state: GameState,
    options: EngineOptions,
    book: Option<OpeningBook>,
    interrupt: Arc<AtomicBool>,
}

impl Default for ChessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessEngine {
    /// Engine at the standard starting position with default options.
    pub fn new() -> Self {
        Self {
            game_state: GameState::new_game(),
            options: EngineOptions::default(),
            book: None,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        let mut options = self.options;
        options.set_option(name, value)?;
        debug!(name, value, "option set");
        self.options = options;
        Ok(())
    }

    /// Install an opening book from its packed image.
    pub fn load_book(&mut self, image: &[u8]) -> ChessResult<()> {
        let book = OpeningBook::from_bytes(image)?;
        debug!(records = book.len(), "opening book loaded");
        self.book = Some(book);
        Ok(())
    }

    pub fn set_book(&mut self, book: OpeningBook) {
        self.book = Some(book);
    }

    pub fn new_game(&mut self) {
        self.game_state = GameState::new_game();
    }

    /// Replace the game with the position `fen` describes.
    pub fn load_fen(&mut self, fen: &str) -> ChessResult<()> {
        match GameState::from_fen(fen) {
            Ok(game_state) => {
                self.game_state = game_state;
                Ok(())
            }
            Err(err) => {
                warn!(fen, error = %err, "position description rejected");
                Err(err)
            }
        }
    }

    pub fn fen(&self) -> String {
        self.game_state.to_fen()
    }

    /// The legal move `text` names, with its annotation flags.
    pub fn match_move(&mut self, text: &str) -> ChessResult<ChessMove> {
        san::match_move(&mut self.game_state, text)
    }

    /// Play the move `text` names. Only the most recent moves can be taken
    /// back.
    pub fn play_move(&mut self, text: &str) -> ChessResult<ChessMove> {
        let mv = match self.match_move(text) {
            Ok(mv) => mv,
            Err(err) => {
                warn!(text, error = %err, "move text rejected");
                return Err(err);
            }
        };
        self.play(&mv);
        Ok(mv)
    }

    /// Play a move taken from `legal_moves` or a search result.
    pub fn play(&mut self, mv: &ChessMove) {
        if self.game_state.undo_log.len() >= TAKE_BACK_MARGIN {
            self.game_state.undo_log.discard_oldest();
        }
        self.game_state.make_move(mv);
    }

    pub fn take_back(&mut self) -> ChessResult<ChessMove> {
        if self.game_state.undo_log.is_empty() {
            return Err(ChessError::NothingToTakeBack);
        }
        Ok(self.game_state.unmake_move())
    }

    /// Legal moves of the side to move, annotated for notation.
    pub fn legal_moves(&mut self) -> MoveList {
        generate_annotated_moves(&mut self.game_state)
    }

    pub fn termination(&self) -> GameTermination {
        let game_state = &self.game_state;
        if !has_legal_move(game_state) {
            if game_state.in_check() {
                GameTermination::Checkmate
            } else {
                GameTermination::Stalemate
            }
        } else if game_state.is_fifty_move_draw() {
            GameTermination::FiftyMoves
        } else if game_state.is_insufficient_material() {
            GameTermination::Insufficient
        } else if game_state.is_repeated_twice() {
            GameTermination::Repetition
        } else {
            GameTermination::Unterminated
        }
    }

    /// Search the current position. Missing budgets fall back to the
    /// `MoveTime` and `Depth` options.
    pub fn search(&mut self, time_limit_ms: Option<u64>, depth: Option<u8>) -> SearchResult {
        let config = self.options.search_config(time_limit_ms, depth);
        iterative_deepening_search(
            &mut self.game_state,
            &PlacementScorer,
            config,
            self.book.as_ref(),
            Some(&*self.interrupt),
        )
    }

    /// Search with a budget derived from a game clock.
    pub fn search_with_clock(&mut self, clock: &Clock, depth: Option<u8>) -> SearchResult {
        let budget = resolve_time_budget(
            self.game_state.side_to_move,
            self.game_state.fullmove_number,
            clock,
        );
        self.search(budget, depth)
    }

    /// Flag another thread can set to stop a running search.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }
}

impl fmt::Display for ChessEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_game_state(&self.game_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::search::iterative_deepening::SearchTermination;
    use crate::search::score::Score;
    use crate::tables::opening_book::BookRecord;
    use std::sync::atomic::Ordering;

    fn engine_at(fen: &str) -> ChessEngine {
        let mut engine = ChessEngine::new();
        engine.load_fen(fen).expect("FEN should load");
        engine
    }

    #[test]
    fn options_accept_valid_values_only() {
        let mut engine = ChessEngine::new();
        engine.set_option("Depth", "6").expect("depth");
        engine.set_option("movetime", " 250 ").expect("move time");
        engine.set_option("OwnBook", "false").expect("book flag");
        engine.set_option("BookSeed", "42").expect("seed");
        let expected = EngineOptions {
            depth: 6,
            move_time_ms: 250,
            own_book: false,
            book_seed: Some(42),
        };
        assert_eq!(*engine.options(), expected);

        for (name, value) in [
            ("Depth", "0"),
            ("Depth", "21"),
            ("MoveTime", "0"),
            ("OwnBook", "maybe"),
            ("BookSeed", "-1"),
        ] {
            assert!(matches!(
                engine.set_option(name, value),
                Err(ChessError::InvalidOptionValue { .. })
            ));
        }
        assert_eq!(
            engine.set_option("Hash", "64"),
            Err(ChessError::UnknownOption("Hash".to_owned()))
        );
        assert_eq!(*engine.options(), expected);
    }

    #[test]
    fn rejected_position_keeps_the_current_game() {
        let mut engine = ChessEngine::new();
        engine.play_move("e4").expect("legal");
        let before = engine.fen();
        assert!(engine.load_fen("not a position").is_err());
        assert_eq!(engine.fen(), before);
    }

    #[test]
    fn play_and_take_back() {
        let mut engine = ChessEngine::new();
        assert_eq!(engine.take_back(), Err(ChessError::NothingToTakeBack));

        engine.play_move("e4").expect("legal");
        engine.play_move("e7e5").expect("legal");
        assert!(engine.play_move("Ke3").is_err());
        assert_eq!(
            engine.fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );

        engine.take_back().expect("undo e5");
        engine.take_back().expect("undo e4");
        assert_eq!(engine.fen(), STARTING_POSITION_FEN);
        assert_eq!(engine.take_back(), Err(ChessError::NothingToTakeBack));
    }

    #[test]
    fn take_back_depth_is_bounded() {
        let mut engine = ChessEngine::new();
        let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
        for text in shuffle.iter().cycle().take(TAKE_BACK_MARGIN + 4) {
            engine.play_move(text).expect("legal");
        }
        let mut undone = 0;
        while engine.take_back().is_ok() {
            undone += 1;
        }
        assert_eq!(undone, TAKE_BACK_MARGIN);
        assert_eq!(engine.game_state().verify_consistency(), Ok(()));
    }

    #[test]
    fn terminations_in_priority_order() {
        let cases = [
            ("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", GameTermination::Unterminated),
            ("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1", GameTermination::Checkmate),
            ("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", GameTermination::Stalemate),
            ("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80", GameTermination::FiftyMoves),
            ("4k3/8/8/8/8/8/8/4KB2 w - - 0 1", GameTermination::Insufficient),
        ];
        for (fen, expected) in cases {
            assert_eq!(engine_at(fen).termination(), expected, "{fen}");
        }
    }

    #[test]
    fn repeated_position_is_a_draw() {
        let mut engine = ChessEngine::new();
        for text in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"] {
            assert_eq!(engine.termination(), GameTermination::Unterminated);
            engine.play_move(text).expect("legal");
        }
        assert_eq!(engine.termination(), GameTermination::Repetition);
        assert!(engine.termination().is_over());
    }

    #[test]
    fn legal_moves_are_annotated() {
        let mut engine = engine_at("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let moves = engine.legal_moves();
        assert!(moves.iter().any(|mv| san::move_to_san(mv) == "Ra8#"));
    }

    #[test]
    fn search_finds_the_mate_and_restores_the_game() {
        let mut engine = engine_at("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let before = engine.game_state().clone();
        let result = engine.search(Some(1_000), Some(4));
        assert_eq!(result.termination, SearchTermination::MateIn1);
        assert_eq!(result.best_score, Score::MATE_IN_1);
        assert_eq!(engine.game_state(), &before);
    }

    #[test]
    fn search_uses_the_installed_book() {
        let mut engine = ChessEngine::new();
        let e4 = engine.match_move("e4").expect("legal");
        let record = BookRecord::for_move(engine.game_state(), &e4, 10);
        engine.set_book(OpeningBook::from_records(vec![record]));
        engine.set_option("BookSeed", "7").expect("seed");

        let result = engine.search(Some(1_000), Some(2));
        assert_eq!(result.termination, SearchTermination::Book);
        assert_eq!(result.best_move.map(|mv| mv.to_coordinate()), Some("e2e4".to_owned()));

        engine.set_option("OwnBook", "off").expect("flag");
        let result = engine.search(Some(1_000), Some(1));
        assert_ne!(result.termination, SearchTermination::Book);
    }

    #[test]
    fn clock_search_returns_a_move() {
        let mut engine = ChessEngine::new();
        engine.set_option("OwnBook", "false").expect("flag");
        let clock = Clock {
            remaining_ms: [Some(2_000), Some(2_000)],
            ..Clock::default()
        };
        let result = engine.search_with_clock(&clock, Some(2));
        assert!(result.best_move.is_some());
    }

    #[test]
    fn interrupt_handle_is_shared() {
        let engine = ChessEngine::new();
        let handle = engine.interrupt_handle();
        handle.store(true, Ordering::SeqCst);
        assert!(engine.interrupt.load(Ordering::SeqCst));
    }

    #[test]
    fn display_renders_the_board() {
        let text = ChessEngine::new().to_string();
        assert!(text.starts_with("8 r n b q k b n r"));
    }
}
