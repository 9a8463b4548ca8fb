//! Read-only opening book of fixed-size records keyed by position hash.
//!
//! Each eight-byte record holds the five leading bytes of a book hash, a
//! two-byte compressed move and a popularity byte. Records are kept sorted
//! by hash prefix so a lookup is a binary search followed by a scan of the
//! matching run. Positions are stored from Light's side of the board, which
//! lets one entry serve both colors.

use rand::Rng;
use tracing::trace;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Color, GameState};
use crate::moves::chess_move::{ChessMove, MoveFlags};
use crate::moves::move_list::MoveList;
use crate::search::zobrist::{book_hash, PositionHash};
use crate::tables::tiny_move::TinyMove;

pub const BOOK_RECORD_LEN: usize = 8;
const PREFIX_LEN: usize = 5;

type HashPrefix = [u8; PREFIX_LEN];

#[inline]
fn hash_prefix(hash: PositionHash) -> HashPrefix {
    let bytes = hash.to_be_bytes();
    [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookRecord {
    pub hash_prefix: HashPrefix,
    pub tiny_move: TinyMove,
    pub popularity: u8,
}

impl BookRecord {
    /// Record for playing `mv` in `game_state`, normalized to Light's view.
    pub fn for_move(game_state: &GameState, mv: &ChessMove, popularity: u8) -> Self {
        let tiny = TinyMove::from_move(mv);
        let tiny_move = match game_state.side_to_move {
            Color::Light => tiny,
            Color::Dark => tiny.flipped(),
        };
        Self {
            hash_prefix: hash_prefix(book_hash(game_state)),
            tiny_move,
            popularity,
        }
    }

    pub fn from_bytes(bytes: [u8; BOOK_RECORD_LEN]) -> Self {
        Self {
            hash_prefix: [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]],
            tiny_move: TinyMove::from_bytes([bytes[5], bytes[6]]),
            popularity: bytes[7],
        }
    }

    pub fn to_bytes(&self) -> [u8; BOOK_RECORD_LEN] {
        let [p0, p1, p2, p3, p4] = self.hash_prefix;
        let [m0, m1] = self.tiny_move.to_bytes();
        [p0, p1, p2, p3, p4, m0, m1, self.popularity]
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    records: Vec<BookRecord>,
}

impl OpeningBook {
    /// Load a book image of concatenated eight-byte records.
    pub fn from_bytes(image: &[u8]) -> ChessResult<Self> {
        if image.len() % BOOK_RECORD_LEN != 0 {
            return Err(ChessError::InvalidBookImage(image.len()));
        }
        let records = image
            .chunks_exact(BOOK_RECORD_LEN)
            .map(|chunk| {
                let mut bytes = [0u8; BOOK_RECORD_LEN];
                bytes.copy_from_slice(chunk);
                BookRecord::from_bytes(bytes)
            })
            .collect();
        Ok(Self::from_records(records))
    }

    pub fn from_records(mut records: Vec<BookRecord>) -> Self {
        records.sort_by_key(|record| record.hash_prefix);
        Self { records }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.records.iter().flat_map(BookRecord::to_bytes).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The contiguous run of records for `game_state`.
    pub fn lookup(&self, game_state: &GameState) -> &[BookRecord] {
        let prefix = hash_prefix(book_hash(game_state));
        let start = self.records.partition_point(|record| record.hash_prefix < prefix);
        let run = self.records[start..]
            .iter()
            .take_while(|record| record.hash_prefix == prefix)
            .count();
        &self.records[start..start + run]
    }

    /// Weighted random pick among the book moves found in `moves`.
    ///
    /// Moves already carrying a certain score are passed over. The chosen
    /// move is returned with its book flag set.
    pub fn pick_move<R: Rng + ?Sized>(
        &self,
        game_state: &GameState,
        moves: &MoveList,
        rng: &mut R,
    ) -> Option<ChessMove> {
        let run = self.lookup(game_state);
        if run.is_empty() {
            trace!(records = 0, "book miss");
            return None;
        }

        let candidates: Vec<(ChessMove, u32)> = run
            .iter()
            .filter_map(|record| {
                let tiny = match game_state.side_to_move {
                    Color::Light => record.tiny_move,
                    Color::Dark => record.tiny_move.flipped(),
                };
                moves
                    .iter()
                    .find(|mv| !mv.is_certain() && tiny.matches(mv))
                    .map(|mv| (*mv, u32::from(record.popularity)))
            })
            .collect();
        trace!(records = run.len(), candidates = candidates.len(), "book lookup");

        let (first, _) = *candidates.first()?;
        let total: u32 = candidates.iter().map(|(_, weight)| weight).sum();
        let mut chosen = first;
        if total > 0 {
            let mut pick = rng.random_range(0..total);
            for (mv, weight) in &candidates {
                if pick < *weight {
                    chosen = *mv;
                    break;
                }
                pick -= weight;
            }
        }
        chosen.flags.insert(MoveFlags::BOOK);
        Some(chosen)
    }
}
