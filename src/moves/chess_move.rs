//! Move record produced by the generator and consumed by apply/undo, the
//! search and notation.
//!
//! Identity is (from, to, from man, to man, special case). Annotation flags
//! and the ordering score ride along but never take part in comparisons.

use std::fmt;

use crate::game_state::chess_types::*;
use crate::search::score::Score;
use crate::utils::algebraic::square_to_algebraic;

/// How a move deviates from a plain relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialCase {
    Regular,
    EnPassant,
    CastleQueenside,
    CastleKingside,
    PromoteKnight,
    PromoteBishop,
    PromoteRook,
    PromoteQueen,
}

impl SpecialCase {
    /// Three-bit code used by compressed book moves.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            SpecialCase::Regular => 0,
            SpecialCase::EnPassant => 1,
            SpecialCase::CastleQueenside => 2,
            SpecialCase::CastleKingside => 3,
            SpecialCase::PromoteKnight => 4,
            SpecialCase::PromoteBishop => 5,
            SpecialCase::PromoteRook => 6,
            SpecialCase::PromoteQueen => 7,
        }
    }

    #[inline]
    pub const fn from_code(code: u8) -> Self {
        match code & 7 {
            0 => SpecialCase::Regular,
            1 => SpecialCase::EnPassant,
            2 => SpecialCase::CastleQueenside,
            3 => SpecialCase::CastleKingside,
            4 => SpecialCase::PromoteKnight,
            5 => SpecialCase::PromoteBishop,
            6 => SpecialCase::PromoteRook,
            _ => SpecialCase::PromoteQueen,
        }
    }

    #[inline]
    pub const fn promotion(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Knight => SpecialCase::PromoteKnight,
            PieceKind::Bishop => SpecialCase::PromoteBishop,
            PieceKind::Rook => SpecialCase::PromoteRook,
            _ => SpecialCase::PromoteQueen,
        }
    }

    #[inline]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self {
            SpecialCase::PromoteKnight => Some(PieceKind::Knight),
            SpecialCase::PromoteBishop => Some(PieceKind::Bishop),
            SpecialCase::PromoteRook => Some(PieceKind::Rook),
            SpecialCase::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, SpecialCase::CastleKingside | SpecialCase::CastleQueenside)
    }
}

/// Annotation bits carried by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const DISAMBIGUATE_FILE: u8 = 1 << 0;
    pub const DISAMBIGUATE_RANK: u8 = 1 << 1;
    pub const BOOK: u8 = 1 << 2;
    pub const CERTAIN: u8 = 1 << 3;
    pub const CHECK: u8 = 1 << 4;
    pub const MATE: u8 = 1 << 5;
    pub const NULL: u8 = 1 << 6;
    pub const SEARCHED: u8 = 1 << 7;

    #[inline]
    pub const fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    #[inline]
    pub fn insert(&mut self, bit: u8) {
        self.0 |= bit;
    }

    #[inline]
    pub fn remove(&mut self, bit: u8) {
        self.0 &= !bit;
    }
}

#[derive(Debug, Clone, Copy, Eq)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub from_man: Man,
    pub to_man: Option<Man>,
    pub special: SpecialCase,
    pub flags: MoveFlags,
    pub score: Score,
}

impl PartialEq for ChessMove {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.from_man == other.from_man
            && self.to_man == other.to_man
            && self.special == other.special
    }
}

impl ChessMove {
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        from_man: Man,
        to_man: Option<Man>,
        special: SpecialCase,
    ) -> Self {
        Self {
            from,
            to,
            from_man,
            to_man,
            special,
            flags: MoveFlags(0),
            score: Score::EVEN,
        }
    }

    /// A pass: the side to move changes and nothing on the board moves.
    pub const fn null(color: Color) -> Self {
        let mut mv = Self::new(0, 0, Man::new(color, PieceKind::King), None, SpecialCase::Regular);
        mv.flags = MoveFlags(MoveFlags::NULL);
        mv
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.flags.contains(MoveFlags::NULL)
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.to_man.is_some() || matches!(self.special, SpecialCase::EnPassant)
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.special.promotion_kind().is_some()
    }

    /// Captures and promotions.
    #[inline]
    pub const fn is_gainer(&self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    #[inline]
    pub const fn is_quiet(&self) -> bool {
        !self.is_gainer()
    }

    #[inline]
    pub const fn is_castling(&self) -> bool {
        self.special.is_castling()
    }

    #[inline]
    pub const fn is_pawn_two_step(&self) -> bool {
        matches!(self.from_man.kind, PieceKind::Pawn) && self.from.abs_diff(self.to) == 16
    }

    #[inline]
    pub const fn is_searched(&self) -> bool {
        self.flags.contains(MoveFlags::SEARCHED)
    }

    #[inline]
    pub const fn is_certain(&self) -> bool {
        self.flags.contains(MoveFlags::CERTAIN)
    }

    /// Square of the pawn removed by an en-passant capture.
    #[inline]
    pub const fn en_passant_victim(&self) -> Square {
        (self.to as i8 - self.from_man.color.pawn_advance()) as Square
    }

    /// Greatest material this move can win outright.
    pub const fn max_gain(&self) -> i16 {
        let captured = match self.to_man {
            Some(man) => man.value(),
            None => {
                if matches!(self.special, SpecialCase::EnPassant) {
                    PieceKind::Pawn.value()
                } else {
                    0
                }
            }
        };
        let promoted = match self.special.promotion_kind() {
            Some(kind) => kind.value() - PieceKind::Pawn.value(),
            None => 0,
        };
        captured + promoted
    }

    /// Coordinate form such as `e2e4` or `e7e8q`.
    pub fn to_coordinate(&self) -> String {
        let mut text = String::with_capacity(5);
        text.push_str(&square_to_algebraic(self.from));
        text.push_str(&square_to_algebraic(self.to));
        if let Some(kind) = self.special.promotion_kind() {
            text.push(kind.letter().to_ascii_lowercase());
        }
        text
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        f.write_str(&self.to_coordinate())
    }
}
