//! Primitive chess vocabulary: squares, colors, piece kinds, men and the
//! small bitmask types shared by every other module.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Board square index (`0..=63`, a1 = 0, h8 = 63).
pub type Square = u8;

/// Stable identity of one man on the board, independent of its square.
pub type TargetId = u8;

/// Number of target ids; each color owns a block of sixteen.
pub const TARGET_ID_COUNT: usize = 32;
pub const TARGET_IDS_PER_COLOR: u8 = 16;

#[inline]
pub const fn square_file(square: Square) -> u8 {
    square & 7
}

#[inline]
pub const fn square_rank(square: Square) -> u8 {
    square >> 3
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    (rank << 3) | file
}

/// Mirror a square across the board's horizontal midline.
#[inline]
pub const fn flip_square(square: Square) -> Square {
    square ^ 0x38
}

#[inline]
pub const fn square_mask(square: Square) -> u64 {
    1u64 << square
}

/// Squares beside `square` on the same rank.
#[inline]
pub const fn rank_neighbours(square: Square) -> u64 {
    let mut neighbours = 0u64;
    if square_file(square) > 0 {
        neighbours |= square_mask(square - 1);
    }
    if square_file(square) < 7 {
        neighbours |= square_mask(square + 1);
    }
    neighbours
}

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Square offset of a single pawn advance.
    #[inline]
    pub const fn pawn_advance(self) -> i8 {
        match self {
            Color::Light => 8,
            Color::Dark => -8,
        }
    }

    /// Rank (0-based) on which this color's pawns start.
    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Color::Light => 1,
            Color::Dark => 6,
        }
    }

    /// Rank (0-based) on which this color's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }

    /// First target id of this color's block; also the king's id.
    #[inline]
    pub const fn king_target_id(self) -> TargetId {
        match self {
            Color::Light => 0,
            Color::Dark => TARGET_IDS_PER_COLOR,
        }
    }

    #[inline]
    pub const fn from_target_id(tid: TargetId) -> Self {
        if tid < TARGET_IDS_PER_COLOR {
            Color::Light
        } else {
            Color::Dark
        }
    }

    pub const fn fen_char(self) -> char {
        match self {
            Color::Light => 'w',
            Color::Dark => 'b',
        }
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Material value in centipawns.
    #[inline]
    pub const fn value(self) -> i16 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 325,
            PieceKind::Bishop => 333,
            PieceKind::Rook => 500,
            PieceKind::Queen => 925,
            PieceKind::King => 0,
        }
    }

    /// Bishops, rooks and queens attack along open lines.
    #[inline]
    pub const fn is_sweeper(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Upper-case letter used in move text and position descriptions.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Man {
    pub color: Color,
    pub kind: PieceKind,
}

impl Man {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Index `0..12` used by hash tables: light men first.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    #[inline]
    pub const fn value(self) -> i16 {
        self.kind.value()
    }

    #[inline]
    pub const fn flipped(self) -> Self {
        Self::new(self.color.opposite(), self.kind)
    }

    pub fn fen_char(self) -> char {
        match self.color {
            Color::Light => self.kind.letter(),
            Color::Dark => self.kind.letter().to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_letter(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else {
            Color::Dark
        };
        Some(Self::new(color, kind))
    }
}

/// The four directions a pin line can run through the king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bidirection {
    EastWest,
    NorthSouth,
    NortheastSouthwest,
    NorthwestSoutheast,
}

impl Bidirection {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Bidirection::EastWest => 0,
            Bidirection::NorthSouth => 1,
            Bidirection::NortheastSouthwest => 2,
            Bidirection::NorthwestSoutheast => 3,
        }
    }

    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        matches!(self, Bidirection::EastWest | Bidirection::NorthSouth)
    }

    /// Line through two distinct squares, if they share a rank, file or diagonal.
    pub const fn between_squares(a: Square, b: Square) -> Option<Self> {
        let df = square_file(b) as i8 - square_file(a) as i8;
        let dr = square_rank(b) as i8 - square_rank(a) as i8;
        if df == 0 && dr == 0 {
            None
        } else if dr == 0 {
            Some(Bidirection::EastWest)
        } else if df == 0 {
            Some(Bidirection::NorthSouth)
        } else if df == dr {
            Some(Bidirection::NortheastSouthwest)
        } else if df == -dr {
            Some(Bidirection::NorthwestSoutheast)
        } else {
            None
        }
    }
}

/// Castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0x0F;
