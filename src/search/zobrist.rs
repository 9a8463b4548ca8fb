//! Zobrist hashing support for position identity, repetition tracking and
//! opening-book lookup.
//!
//! The keys are generated at compile time from a fixed seed so hashes are
//! deterministic across runs. There is no side-to-move key: repetition scans
//! only compare positions with the same side to move, and the book hash is
//! taken on the position normalized to Light to move.

use crate::game_state::chess_rules::Castling;
use crate::game_state::chess_types::*;

/// 64-bit XOR-foldable position code.
pub type PositionHash = u64;

const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

static MAN_SQUARE_KEYS: [[u64; 64]; 12] = generate_man_square_keys();
const CASTLING_KEYS: [u64; 4] = generate_tail_keys::<4>(12 * 64);
const EN_PASSANT_FILE_KEYS: [u64; 8] = generate_tail_keys::<8>(12 * 64 + 4);

const fn splitmix64(counter: u64) -> u64 {
    let mut z = SEED.wrapping_mul(counter.wrapping_add(1));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

const fn generate_man_square_keys() -> [[u64; 64]; 12] {
    let mut table = [[0u64; 64]; 12];
    let mut man = 0usize;
    while man < 12 {
        let mut sq = 0usize;
        while sq < 64 {
            table[man][sq] = splitmix64((man * 64 + sq) as u64);
            sq += 1;
        }
        man += 1;
    }
    table
}

const fn generate_tail_keys<const N: usize>(offset: usize) -> [u64; N] {
    let mut table = [0u64; N];
    let mut i = 0usize;
    while i < N {
        table[i] = splitmix64((offset + i) as u64);
        i += 1;
    }
    table
}

/// Return the Zobrist key for a man standing on a square.
#[inline]
pub fn man_square_key(man: Man, square: Square) -> u64 {
    MAN_SQUARE_KEYS[man.index()][square as usize]
}

/// Return the Zobrist key contribution for one held castling right.
#[inline]
pub fn castling_key(castling: Castling) -> u64 {
    CASTLING_KEYS[castling.index()]
}

/// Return the Zobrist key contribution for a valid en-passant file.
#[inline]
pub fn en_passant_key(square: Square) -> u64 {
    EN_PASSANT_FILE_KEYS[square_file(square) as usize]
}

/// Key contribution of a whole castling-rights mask.
pub fn castling_rights_key(rights: CastlingRights) -> u64 {
    Castling::ALL
        .iter()
        .filter(|castling| rights & castling.right() != 0)
        .fold(0, |acc, castling| acc ^ castling_key(*castling))
}

/// Recompute the hash of `game_state` from scratch.
pub fn compute_hash(game_state: &GameState) -> PositionHash {
    let mut hash = 0u64;
    for (sq, man) in game_state.board.iter().enumerate() {
        if let Some(man) = man {
            hash ^= man_square_key(*man, sq as Square);
        }
    }
    hash ^= castling_rights_key(game_state.castling_rights);
    if let Some(ep) = game_state.en_passant_square {
        hash ^= en_passant_key(ep);
    }
    hash
}

/// Hash of the position seen from Light's side of the board.
///
/// When Dark is to move the position is mirrored first, so one book entry
/// serves both colors.
pub fn book_hash(game_state: &GameState) -> PositionHash {
    if game_state.side_to_move == Color::Light {
        return game_state.hash;
    }

    let mut hash = 0u64;
    for (sq, man) in game_state.board.iter().enumerate() {
        if let Some(man) = man {
            hash ^= man_square_key(man.flipped(), flip_square(sq as Square));
        }
    }
    hash ^= castling_rights_key(flip_castling_rights(game_state.castling_rights));
    if let Some(ep) = game_state.en_passant_square {
        hash ^= en_passant_key(ep);
    }
    hash
}

/// Swap the light and dark halves of a castling-rights mask.
#[inline]
pub const fn flip_castling_rights(rights: CastlingRights) -> CastlingRights {
    ((rights & 0x03) << 2) | ((rights & 0x0C) >> 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct() {
        let mut all: Vec<u64> = MAN_SQUARE_KEYS.iter().flatten().copied().collect();
        all.extend_from_slice(&CASTLING_KEYS);
        all.extend_from_slice(&EN_PASSANT_FILE_KEYS);
        let count = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count);
        assert!(!all.contains(&0));
    }

    #[test]
    fn castling_rights_flip_swaps_colors() {
        assert_eq!(
            flip_castling_rights(CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_QUEENSIDE),
            CASTLE_DARK_KINGSIDE | CASTLE_LIGHT_QUEENSIDE
        );
        assert_eq!(flip_castling_rights(CASTLE_ALL), CASTLE_ALL);
    }

    #[test]
    fn incremental_hash_matches_recomputation_at_start() {
        let state = GameState::new_game();
        assert_eq!(state.hash, compute_hash(&state));
    }

    #[test]
    fn book_hash_is_color_symmetric() {
        let light = GameState::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        let dark = GameState::from_fen("4k3/8/8/4p3/8/8/8/4K3 b - - 0 1")
            .expect("FEN should parse");
        assert_eq!(book_hash(&light), book_hash(&dark));
    }
}
