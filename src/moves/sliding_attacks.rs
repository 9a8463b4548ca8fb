//! Occupancy-aware attack maps for bishops, rooks and queens, plus the line
//! geometry (between-squares and pin lines) used by pin and check handling.
//!
//! Each direction has a precomputed ray; the first blocker along a ray is
//! found with a single bit scan.

use crate::game_state::chess_types::{Bidirection, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ray {
    North,
    Northeast,
    East,
    Northwest,
    South,
    Southwest,
    West,
    Southeast,
}

impl Ray {
    const fn index(self) -> usize {
        self as usize
    }

    /// Rays whose squares have increasing indices.
    const fn is_ascending(self) -> bool {
        matches!(self, Ray::North | Ray::Northeast | Ray::East | Ray::Northwest)
    }
}

const STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (-1, 1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (1, -1),
];

static RAYS: [[u64; 64]; 8] = generate_rays();
static BETWEEN: [[u64; 64]; 64] = generate_between();
static LINES: [[u64; 4]; 64] = generate_lines();

const BISHOP_RAYS: [Ray; 4] = [Ray::Northeast, Ray::Northwest, Ray::Southwest, Ray::Southeast];
const ROOK_RAYS: [Ray; 4] = [Ray::North, Ray::East, Ray::South, Ray::West];

const fn trace_ray_const(square: i32, file_step: i32, rank_step: i32) -> u64 {
    let mut file = (square % 8) + file_step;
    let mut rank = (square / 8) + rank_step;
    let mut attacks = 0u64;

    while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
        attacks |= 1u64 << (rank * 8 + file);
        file += file_step;
        rank += rank_step;
    }

    attacks
}

const fn generate_rays() -> [[u64; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    let mut dir = 0usize;
    while dir < 8 {
        let mut sq = 0usize;
        while sq < 64 {
            table[dir][sq] = trace_ray_const(sq as i32, STEPS[dir].0, STEPS[dir].1);
            sq += 1;
        }
        dir += 1;
    }
    table
}

const fn generate_between() -> [[u64; 64]; 64] {
    let rays = generate_rays();
    let mut table = [[0u64; 64]; 64];
    let mut from = 0usize;
    while from < 64 {
        let mut dir = 0usize;
        while dir < 8 {
            let (df, dr) = STEPS[dir];
            let mut file = (from % 8) as i32 + df;
            let mut rank = (from / 8) as i32 + dr;
            while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                let to = (rank * 8 + file) as usize;
                // Strictly between = ray from `from` minus ray from `to` minus `to`.
                table[from][to] = rays[dir][from] & !rays[dir][to] & !(1u64 << to);
                file += df;
                rank += dr;
            }
            dir += 1;
        }
        from += 1;
    }
    table
}

const fn generate_lines() -> [[u64; 4]; 64] {
    let rays = generate_rays();
    let mut table = [[0u64; 4]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        table[sq][0] = rays[Ray::East.index()][sq] | rays[Ray::West.index()][sq];
        table[sq][1] = rays[Ray::North.index()][sq] | rays[Ray::South.index()][sq];
        table[sq][2] = rays[Ray::Northeast.index()][sq] | rays[Ray::Southwest.index()][sq];
        table[sq][3] = rays[Ray::Northwest.index()][sq] | rays[Ray::Southeast.index()][sq];
        sq += 1;
    }
    table
}

#[inline]
fn ray_attacks(ray: Ray, square: Square, occupancy: u64) -> u64 {
    let full = RAYS[ray.index()][square as usize];
    let blockers = full & occupancy;
    if blockers == 0 {
        return full;
    }
    let first = if ray.is_ascending() {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    full & !RAYS[ray.index()][first as usize]
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    BISHOP_RAYS
        .iter()
        .fold(0, |acc, ray| acc | ray_attacks(*ray, square, occupancy))
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    ROOK_RAYS
        .iter()
        .fold(0, |acc, ray| acc | ray_attacks(*ray, square, occupancy))
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

/// Squares strictly between two aligned squares; empty when not aligned.
#[inline]
pub fn between(a: Square, b: Square) -> u64 {
    BETWEEN[a as usize][b as usize]
}

/// Every square on the line through `square` along `bidirection`, excluding
/// `square` itself.
#[inline]
pub fn line_through(square: Square, bidirection: Bidirection) -> u64 {
    LINES[square as usize][bidirection.index()]
}
