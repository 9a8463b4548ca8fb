//! Two-byte move encoding used by opening-book records.
//!
//! Bits 0..6 hold the origin square, bits 6..12 the destination and bits
//! 12..15 the special-case code. Book moves are stored from Light's side of
//! the board; `flipped` converts them for Dark.

use crate::game_state::chess_types::{flip_square, Square};
use crate::moves::chess_move::{ChessMove, SpecialCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TinyMove(pub u16);

impl TinyMove {
    #[inline]
    pub const fn new(from: Square, to: Square, special: SpecialCase) -> Self {
        TinyMove(
            (from as u16 & 0x3F) | ((to as u16 & 0x3F) << 6) | ((special.code() as u16 & 0x7) << 12),
        )
    }

    #[inline]
    pub const fn from_move(mv: &ChessMove) -> Self {
        Self::new(mv.from, mv.to, mv.special)
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        TinyMove(u16::from_be_bytes(bytes))
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn from(self) -> Square {
        (self.0 & 0x3F) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> 6) & 0x3F) as Square
    }

    #[inline]
    pub const fn special(self) -> SpecialCase {
        SpecialCase::from_code(((self.0 >> 12) & 0x7) as u8)
    }

    /// The same move seen from the other side of the board.
    #[inline]
    pub const fn flipped(self) -> Self {
        Self::new(flip_square(self.from()), flip_square(self.to()), self.special())
    }

    #[inline]
    pub fn matches(self, mv: &ChessMove) -> bool {
        self.from() == mv.from && self.to() == mv.to && self.special() == mv.special
    }
}
