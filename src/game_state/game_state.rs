//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine. Next to the board itself
//! it keeps square bitboards, occupancy caches, target-id indices, material
//! and man counts, the incremental hash, check/pin state and the history and
//! undo stacks used by make/unmake workflows. Every index is kept exactly in
//! step with the board; `verify_consistency` re-derives them all.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, STARTING_POSITION_FEN};
use crate::game_state::chess_types::*;
use crate::game_state::repetition_history::RepetitionHistory;
use crate::game_state::target_set::TargetSet;
use crate::game_state::undo_state::{Environment, UndoLog};
use crate::move_generation::legal_move_checks::compute_pin_state;
use crate::search::zobrist::{
    compute_hash, en_passant_key, flip_castling_rights, man_square_key, PositionHash,
};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Check and pin facts derived from the board after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinState {
    /// Enemy men giving check to the side to move.
    pub checkers: TargetSet,
    /// Men of either color standing alone between their king and an enemy
    /// sweeper.
    pub pinned: TargetSet,
    /// Pinned men that cannot move at all.
    pub frozen: TargetSet,
    /// Line of the pin for each pinned target id.
    pub pin_direction: [Option<Bidirection>; TARGET_ID_COUNT],
}

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // --- Mailbox board ---
    pub board: [Option<Man>; 64],

    // --- Bitboard representation ---
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Counts and material ---
    pub man_count_by_color: [u8; 2],
    pub man_count: [[u8; 6]; 2],
    pub material: [i16; 2],

    // --- Target-id indices ---
    pub square_to_target: [Option<TargetId>; 64],
    pub target_to_square: [Option<Square>; TARGET_ID_COUNT],
    pub targets_by_color: [TargetSet; 2],
    pub targets_by_man: [[TargetSet; 6]; 2],
    pub targets_all: TargetSet,
    pub sweepers: TargetSet,

    // --- Derived check/pin facts ---
    pub pins: PinState,

    // --- Incremental hashing ---
    pub hash: PositionHash,

    // --- Search / repetition support ---
    pub history: RepetitionHistory,

    // --- Make/unmake stack ---
    pub undo_log: UndoLog,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: [None; 64],
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            man_count_by_color: [0; 2],
            man_count: [[0; 6]; 2],
            material: [0; 2],

            square_to_target: [None; 64],
            target_to_square: [None; TARGET_ID_COUNT],
            targets_by_color: [TargetSet::EMPTY; 2],
            targets_by_man: [[TargetSet::EMPTY; 6]; 2],
            targets_all: TargetSet::EMPTY,
            sweepers: TargetSet::EMPTY,

            pins: PinState::default(),
            hash: 0,

            history: RepetitionHistory::default(),
            undo_log: UndoLog::default(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard initial array.
    pub fn new_game() -> Self {
        match parse_fen(STARTING_POSITION_FEN) {
            Ok(state) => state,
            Err(_) => crate::errors::internal_fault("starting position failed to load"),
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Build a position from a bare board and environment, assigning target
    /// ids and deriving every index.
    ///
    /// Kings receive their color's fixed id; other men are numbered in square
    /// order. The board must hold exactly one king per color and at most
    /// sixteen men per color, no pawns on the first or last rank, and the
    /// side not to move must not be in check.
    pub fn from_board(board: [Option<Man>; 64], environment: Environment) -> ChessResult<Self> {
        let mut state = Self::default();
        state.restore_environment(environment);

        for color in Color::ALL {
            let kings: Vec<Square> = (0..64u8)
                .filter(|sq| board[*sq as usize] == Some(Man::new(color, PieceKind::King)))
                .collect();
            let &[king_sq] = kings.as_slice() else {
                return Err(ChessError::InvalidFen(format!(
                    "expected exactly one {color:?} king, found {}",
                    kings.len()
                )));
            };
            state.place_man(king_sq, Man::new(color, PieceKind::King), color.king_target_id());

            let mut next_tid = color.king_target_id() + 1;
            for sq in 0..64u8 {
                let Some(man) = board[sq as usize] else {
                    continue;
                };
                if man.color != color || man.kind == PieceKind::King {
                    continue;
                }
                if man.kind == PieceKind::Pawn
                    && (square_rank(sq) == 0 || square_rank(sq) == 7)
                {
                    return Err(ChessError::InvalidFen(
                        "pawn on first or last rank".to_owned(),
                    ));
                }
                if next_tid >= color.king_target_id() + TARGET_IDS_PER_COLOR {
                    return Err(ChessError::InvalidFen(format!(
                        "more than {TARGET_IDS_PER_COLOR} {color:?} men"
                    )));
                }
                state.place_man(sq, man, next_tid);
                next_tid += 1;
            }
        }

        state.validate_environment()?;
        state.refresh_pins();

        let waiting = state.side_to_move.opposite();
        if let Some(king_sq) = state.king_square(waiting) {
            if crate::move_generation::legal_move_checks::is_square_attacked(
                &state,
                king_sq,
                state.side_to_move,
            ) {
                return Err(ChessError::InvalidFen(
                    "side not to move is in check".to_owned(),
                ));
            }
        }
        if state.pins.checkers.len() > 2 {
            return Err(ChessError::InvalidFen(
                "side to move is attacked by more than two men".to_owned(),
            ));
        }

        debug_assert_eq!(state.verify_consistency(), Ok(()));
        Ok(state)
    }

    /// Reject castling rights and en-passant targets the board cannot support.
    fn validate_environment(&mut self) -> ChessResult<()> {
        for castling in crate::game_state::chess_rules::Castling::ALL {
            if self.castling_rights & castling.right() == 0 {
                continue;
            }
            let color = castling.color();
            let king_home = self.board[castling.king_from() as usize]
                == Some(Man::new(color, PieceKind::King));
            let rook_home = self.board[castling.rook_from() as usize]
                == Some(Man::new(color, PieceKind::Rook));
            if !king_home || !rook_home {
                return Err(ChessError::InvalidFen(format!(
                    "castling right {castling:?} without king and rook at home"
                )));
            }
        }

        if let Some(ep) = self.en_passant_square {
            let mover = self.side_to_move.opposite();
            let expected_rank = match mover {
                Color::Light => 2,
                Color::Dark => 5,
            };
            let pawn_sq = (ep as i8 + mover.pawn_advance()) as Square;
            let origin_sq = (ep as i8 - mover.pawn_advance()) as Square;
            if self.halfmove_clock != 0
                || square_rank(ep) != expected_rank
                || self.board[pawn_sq as usize] != Some(Man::new(mover, PieceKind::Pawn))
                || self.board[ep as usize].is_some()
                || self.board[origin_sq as usize].is_some()
            {
                return Err(ChessError::InvalidFen(format!(
                    "inconsistent en-passant square {}",
                    crate::utils::algebraic::square_to_algebraic(ep)
                )));
            }
            // Same rule as a played double step: no capturer beside the
            // pawn, no target.
            let capturers = self.pieces[self.side_to_move.index()][PieceKind::Pawn.index()];
            if capturers & rank_neighbours(pawn_sq) == 0 {
                self.en_passant_square = None;
            }
        }

        self.hash = compute_hash(self);
        Ok(())
    }

    #[inline]
    pub fn opponent(&self) -> Color {
        self.side_to_move.opposite()
    }

    #[inline]
    pub fn man_at(&self, square: Square) -> Option<Man> {
        self.board[square as usize]
    }

    #[inline]
    pub fn is_vacant(&self, square: Square) -> bool {
        self.board[square as usize].is_none()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.target_to_square[color.king_target_id() as usize]
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        !self.pins.checkers.is_empty()
    }

    /// Bitboard of the squares occupied by the given target ids.
    pub fn squares_of(&self, targets: TargetSet) -> u64 {
        targets
            .iter()
            .filter_map(|tid| self.target_to_square[tid as usize])
            .fold(0, |acc, sq| acc | square_mask(sq))
    }

    /// Target ids standing on the squares of a bitboard.
    pub fn targets_on(&self, mut squares: u64) -> TargetSet {
        let mut targets = TargetSet::EMPTY;
        while squares != 0 {
            let sq = squares.trailing_zeros() as usize;
            if let Some(tid) = self.square_to_target[sq] {
                targets.insert(tid);
            }
            squares &= squares - 1;
        }
        targets
    }

    pub fn environment(&self) -> Environment {
        Environment {
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Restore environment fields without touching the hash.
    pub(crate) fn restore_environment(&mut self, environment: Environment) {
        self.side_to_move = environment.side_to_move;
        self.castling_rights = environment.castling_rights;
        self.en_passant_square = environment.en_passant_square;
        self.halfmove_clock = environment.halfmove_clock;
        self.fullmove_number = environment.fullmove_number;
    }

    /// Put `man` with identity `tid` on an empty square.
    pub(crate) fn place_man(&mut self, square: Square, man: Man, tid: TargetId) {
        let (c, k) = (man.color.index(), man.kind.index());
        let mask = square_mask(square);

        self.board[square as usize] = Some(man);
        self.pieces[c][k] |= mask;
        self.occupancy_by_color[c] |= mask;
        self.occupancy_all |= mask;

        self.man_count_by_color[c] += 1;
        self.man_count[c][k] += 1;
        self.material[c] += man.value();

        self.square_to_target[square as usize] = Some(tid);
        self.target_to_square[tid as usize] = Some(square);
        self.targets_by_color[c].insert(tid);
        self.targets_by_man[c][k].insert(tid);
        self.targets_all.insert(tid);
        if man.kind.is_sweeper() {
            self.sweepers.insert(tid);
        }

        self.hash ^= man_square_key(man, square);
    }

    /// Take the man off `square`, returning its target id.
    pub(crate) fn remove_man(&mut self, square: Square) -> Option<TargetId> {
        let man = self.board[square as usize]?;
        let tid = self.square_to_target[square as usize]?;
        let (c, k) = (man.color.index(), man.kind.index());
        let mask = square_mask(square);

        self.board[square as usize] = None;
        self.pieces[c][k] &= !mask;
        self.occupancy_by_color[c] &= !mask;
        self.occupancy_all &= !mask;

        self.man_count_by_color[c] -= 1;
        self.man_count[c][k] -= 1;
        self.material[c] -= man.value();

        self.square_to_target[square as usize] = None;
        self.target_to_square[tid as usize] = None;
        self.targets_by_color[c].remove(tid);
        self.targets_by_man[c][k].remove(tid);
        self.targets_all.remove(tid);
        self.sweepers.remove(tid);

        self.hash ^= man_square_key(man, square);
        Some(tid)
    }

    /// Move the man on `from` to the empty square `to`, keeping its identity.
    pub(crate) fn relocate_man(&mut self, from: Square, to: Square) {
        let Some(man) = self.board[from as usize] else {
            crate::errors::internal_fault("relocating from a vacant square");
        };
        let Some(tid) = self.square_to_target[from as usize] else {
            crate::errors::internal_fault("occupied square without a target id");
        };
        let (c, k) = (man.color.index(), man.kind.index());
        let swap = square_mask(from) | square_mask(to);

        self.board[from as usize] = None;
        self.board[to as usize] = Some(man);
        self.pieces[c][k] ^= swap;
        self.occupancy_by_color[c] ^= swap;
        self.occupancy_all ^= swap;

        self.square_to_target[from as usize] = None;
        self.square_to_target[to as usize] = Some(tid);
        self.target_to_square[tid as usize] = Some(to);

        self.hash ^= man_square_key(man, from) ^ man_square_key(man, to);
    }

    /// Fold the en-passant target in or out of the hash and the state.
    pub(crate) fn set_en_passant(&mut self, square: Option<Square>) {
        if let Some(old) = self.en_passant_square {
            self.hash ^= en_passant_key(old);
        }
        if let Some(new) = square {
            self.hash ^= en_passant_key(new);
        }
        self.en_passant_square = square;
    }

    /// Recompute checkers, pins and frozen men from scratch.
    #[inline]
    pub fn refresh_pins(&mut self) {
        self.pins = compute_pin_state(self);
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_HALFMOVES
    }

    /// Neither side has a pawn, rook or queen, nor more than one minor piece.
    pub fn is_insufficient_material(&self) -> bool {
        Color::ALL.iter().all(|color| {
            let counts = &self.man_count[color.index()];
            counts[PieceKind::Pawn.index()] == 0
                && counts[PieceKind::Rook.index()] == 0
                && counts[PieceKind::Queen.index()] == 0
                && counts[PieceKind::Knight.index()] + counts[PieceKind::Bishop.index()] <= 1
        })
    }

    #[inline]
    pub fn is_repeated_once(&self) -> bool {
        self.history
            .is_repeated_once(self.hash, self.halfmove_clock)
    }

    #[inline]
    pub fn is_repeated_twice(&self) -> bool {
        self.history
            .is_repeated_twice(self.hash, self.halfmove_clock)
    }

    /// Cheap draw test used inside the search tree.
    pub fn is_likely_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_insufficient_material() || self.is_repeated_once()
    }

    /// Draw test used for root moves and game termination.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_insufficient_material() || self.is_repeated_twice()
    }

    /// Mirror the position top-to-bottom and swap colors.
    ///
    /// The result has fresh target ids and empty history.
    pub fn flipped(&self) -> Self {
        let mut board = [None; 64];
        for (sq, man) in self.board.iter().enumerate() {
            if let Some(man) = man {
                board[flip_square(sq as Square) as usize] = Some(man.flipped());
            }
        }
        let environment = Environment {
            side_to_move: self.side_to_move.opposite(),
            castling_rights: flip_castling_rights(self.castling_rights),
            en_passant_square: self.en_passant_square.map(flip_square),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };
        match Self::from_board(board, environment) {
            Ok(state) => state,
            Err(_) => crate::errors::internal_fault("mirrored position failed to load"),
        }
    }

    /// Re-derive every index from the board and report the first mismatch.
    pub fn verify_consistency(&self) -> Result<(), String> {
        let mut pieces = [[0u64; 6]; 2];
        let mut man_count = [[0u8; 6]; 2];
        let mut material = [0i16; 2];
        let mut targets_by_man = [[TargetSet::EMPTY; 6]; 2];
        let mut sweepers = TargetSet::EMPTY;

        for sq in 0..64u8 {
            let man = self.board[sq as usize];
            let tid = self.square_to_target[sq as usize];
            match (man, tid) {
                (None, None) => {}
                (Some(man), Some(tid)) => {
                    if self.target_to_square[tid as usize] != Some(sq) {
                        return Err(format!("target {tid} does not map back to square {sq}"));
                    }
                    if Color::from_target_id(tid) != man.color {
                        return Err(format!("target {tid} is outside its color block"));
                    }
                    if (man.kind == PieceKind::King) != (tid == man.color.king_target_id()) {
                        return Err(format!("king target id mismatch at square {sq}"));
                    }
                    let (c, k) = (man.color.index(), man.kind.index());
                    pieces[c][k] |= square_mask(sq);
                    man_count[c][k] += 1;
                    material[c] += man.value();
                    targets_by_man[c][k].insert(tid);
                    if man.kind.is_sweeper() {
                        sweepers.insert(tid);
                    }
                }
                _ => return Err(format!("board and target map disagree at square {sq}")),
            }
        }

        for (tid, sq) in self.target_to_square.iter().enumerate() {
            if let Some(sq) = sq {
                if self.square_to_target[*sq as usize] != Some(tid as TargetId) {
                    return Err(format!("square {sq} does not map back to target {tid}"));
                }
            }
        }

        if pieces != self.pieces {
            return Err("piece bitboards out of step".to_owned());
        }
        let by_color = [
            pieces[0].iter().fold(0u64, |acc, bb| acc | *bb),
            pieces[1].iter().fold(0u64, |acc, bb| acc | *bb),
        ];
        if by_color != self.occupancy_by_color || (by_color[0] | by_color[1]) != self.occupancy_all {
            return Err("occupancy caches out of step".to_owned());
        }
        if man_count != self.man_count {
            return Err("man counts out of step".to_owned());
        }
        let by_color_count = [
            man_count[0].iter().sum::<u8>(),
            man_count[1].iter().sum::<u8>(),
        ];
        if by_color_count != self.man_count_by_color {
            return Err("per-color man counts out of step".to_owned());
        }
        if material != self.material {
            return Err("material sums out of step".to_owned());
        }
        if targets_by_man != self.targets_by_man {
            return Err("per-man target sets out of step".to_owned());
        }
        let targets_by_color = [
            TargetSet(targets_by_man[0].iter().fold(0u32, |acc, set| acc | set.0)),
            TargetSet(targets_by_man[1].iter().fold(0u32, |acc, set| acc | set.0)),
        ];
        if targets_by_color != self.targets_by_color {
            return Err("per-color target sets out of step".to_owned());
        }
        if TargetSet(targets_by_color[0].0 | targets_by_color[1].0) != self.targets_all {
            return Err("target set out of step".to_owned());
        }
        if sweepers != self.sweepers {
            return Err("sweeper set out of step".to_owned());
        }
        if compute_hash(self) != self.hash {
            return Err("hash out of step".to_owned());
        }
        if compute_pin_state(self) != self.pins {
            return Err("check/pin state out of step".to_owned());
        }
        Ok(())
    }
}
