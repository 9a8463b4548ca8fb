//! Canonical chess-rule constants.
//!
//! Starting position, draw thresholds, search depth bounds and the fixed
//! geometry of the four castling moves.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-move clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Deepest ply the search will ever visit.
pub const MAX_PLY: usize = 20;

/// Longest principal variation kept.
pub const MAX_PV_LEN: usize = 7;

/// Moves a game may take back in addition to the search's own plies.
pub const TAKE_BACK_MARGIN: usize = 8;

/// Upper bound on legal moves in any position.
pub const MAX_MOVES: usize = 256;

/// Total material of one side in the initial array.
pub const INITIAL_MATERIAL: i16 = 8 * PieceKind::Pawn.value()
    + 2 * PieceKind::Knight.value()
    + 2 * PieceKind::Bishop.value()
    + 2 * PieceKind::Rook.value()
    + PieceKind::Queen.value();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Castling {
    LightKingside,
    LightQueenside,
    DarkKingside,
    DarkQueenside,
}

impl Castling {
    pub const ALL: [Castling; 4] = [
        Castling::LightKingside,
        Castling::LightQueenside,
        Castling::DarkKingside,
        Castling::DarkQueenside,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Castling::LightKingside => 0,
            Castling::LightQueenside => 1,
            Castling::DarkKingside => 2,
            Castling::DarkQueenside => 3,
        }
    }

    #[inline]
    pub const fn for_side(color: Color, kingside: bool) -> Self {
        match (color, kingside) {
            (Color::Light, true) => Castling::LightKingside,
            (Color::Light, false) => Castling::LightQueenside,
            (Color::Dark, true) => Castling::DarkKingside,
            (Color::Dark, false) => Castling::DarkQueenside,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        match self {
            Castling::LightKingside | Castling::LightQueenside => Color::Light,
            Castling::DarkKingside | Castling::DarkQueenside => Color::Dark,
        }
    }

    #[inline]
    pub const fn is_kingside(self) -> bool {
        matches!(self, Castling::LightKingside | Castling::DarkKingside)
    }

    #[inline]
    pub const fn right(self) -> CastlingRights {
        match self {
            Castling::LightKingside => CASTLE_LIGHT_KINGSIDE,
            Castling::LightQueenside => CASTLE_LIGHT_QUEENSIDE,
            Castling::DarkKingside => CASTLE_DARK_KINGSIDE,
            Castling::DarkQueenside => CASTLE_DARK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn king_from(self) -> Square {
        match self.color() {
            Color::Light => 4,
            Color::Dark => 60,
        }
    }

    #[inline]
    pub const fn king_to(self) -> Square {
        match self {
            Castling::LightKingside => 6,
            Castling::LightQueenside => 2,
            Castling::DarkKingside => 62,
            Castling::DarkQueenside => 58,
        }
    }

    #[inline]
    pub const fn rook_from(self) -> Square {
        match self {
            Castling::LightKingside => 7,
            Castling::LightQueenside => 0,
            Castling::DarkKingside => 63,
            Castling::DarkQueenside => 56,
        }
    }

    #[inline]
    pub const fn rook_to(self) -> Square {
        match self {
            Castling::LightKingside => 5,
            Castling::LightQueenside => 3,
            Castling::DarkKingside => 61,
            Castling::DarkQueenside => 59,
        }
    }

    /// Squares between king and rook that must be empty.
    #[inline]
    pub const fn vacant_mask(self) -> u64 {
        match self {
            Castling::LightKingside => 0x0000_0000_0000_0060,
            Castling::LightQueenside => 0x0000_0000_0000_000E,
            Castling::DarkKingside => 0x6000_0000_0000_0000,
            Castling::DarkQueenside => 0x0E00_0000_0000_0000,
        }
    }

    /// Squares the king crosses or lands on; none may be attacked.
    #[inline]
    pub const fn transit_mask(self) -> u64 {
        match self {
            Castling::LightKingside => 0x0000_0000_0000_0060,
            Castling::LightQueenside => 0x0000_0000_0000_000C,
            Castling::DarkKingside => 0x6000_0000_0000_0000,
            Castling::DarkQueenside => 0x0C00_0000_0000_0000,
        }
    }
}
