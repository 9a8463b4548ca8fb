//! Pluggable board evaluation interfaces and the placement evaluator.
//!
//! Search delegates static position scoring to `BoardScorer`, so alternate
//! heuristics can be swapped without altering search code. Every scorer
//! answers from the side to move's point of view.

use crate::game_state::chess_rules::INITIAL_MATERIAL;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::knight_attacks;
use crate::moves::sliding_attacks::{bishop_attacks, queen_attacks, rook_attacks};
use crate::search::score::Score;

pub trait BoardScorer {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> Score;
}

/// Material balance only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> Score {
        let good = game_state.side_to_move.index();
        let evil = game_state.side_to_move.opposite().index();
        clamp_to_score(i32::from(game_state.material[good]) - i32::from(game_state.material[evil]))
    }
}

/// Pawn placement, indexed by [color][square].
const PAWN_PLACEMENT: [[i16; 64]; 2] = {
    const LIGHT: [i16; 64] = [
        0, 0, 0, 0, 0, 0, 0, 0, //
        0, 0, 0, -20, -20, 0, 0, 0, //
        10, 10, 10, 20, 20, 10, 10, 10, //
        15, 15, 15, 40, 40, 15, 15, 15, //
        30, 30, 40, 60, 60, 40, 30, 30, //
        50, 60, 70, 80, 80, 70, 60, 50, //
        70, 80, 90, 100, 100, 90, 80, 70, //
        0, 0, 0, 0, 0, 0, 0, 0, //
    ];
    let mut dark = [0i16; 64];
    let mut sq = 0;
    while sq < 64 {
        dark[sq] = LIGHT[sq ^ 0x38];
        sq += 1;
    }
    [LIGHT, dark]
};

const KNIGHT_CENTER_TROPISM: [i16; 64] = [
    -24, -16, -8, 0, 0, -8, -16, -24, //
    -16, -8, 0, 8, 8, 0, -8, -16, //
    -8, 0, 8, 16, 16, 8, 0, -8, //
    0, 8, 16, 24, 24, 16, 8, 0, //
    0, 8, 16, 24, 24, 16, 8, 0, //
    -8, 0, 8, 16, 16, 8, 0, -8, //
    -16, -8, 0, 8, 8, 0, -8, -16, //
    -24, -16, -8, 0, 0, -8, -16, -24, //
];

const fn isqrt(value: u32) -> u32 {
    let mut root = 0u32;
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

/// Euclidean distance from the board's center, scaled so a corner is 254.
pub const CENTER_DISTANCE: [u8; 64] = {
    let mut table = [0u8; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (2 * (sq % 8) as i32 - 7).unsigned_abs();
        let rank = (2 * (sq / 8) as i32 - 7).unsigned_abs();
        table[sq] = isqrt((file * file + rank * rank) * 663) as u8;
        sq += 1;
    }
    table
};

#[inline]
pub fn center_distance(square: Square) -> i16 {
    i16::from(CENTER_DISTANCE[square as usize])
}

#[inline]
const fn is_rim_square(square: Square) -> bool {
    let file = square_file(square);
    let rank = square_rank(square);
    file == 0 || file == 7 || rank == 0 || rank == 7
}

fn clamp_to_score(value: i32) -> Score {
    let clamped = value.clamp(i32::from(Score::SLOW_LOSE.0), i32::from(Score::SLOW_MATE.0));
    Score::centipawns(clamped as i16)
}

/// Material plus per-man placement terms, with a small bonus for having the
/// move.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementScorer;

/// Inputs shared by every per-man term of one evaluation.
struct EvaluationContext<'a> {
    game_state: &'a GameState,
    file_pawns: [[u8; 8]; 2],
}

impl PlacementScorer {
    pub const ON_MOVE_BONUS: i32 = 10;
    pub const DOUBLED_PAWN_PENALTY: i32 = -15;

    fn pawn_term(ctx: &EvaluationContext, color: Color, sq: Square) -> i32 {
        let mut score = i32::from(PAWN_PLACEMENT[color.index()][sq as usize]);
        if ctx.file_pawns[color.index()][square_file(sq) as usize] > 1 {
            score += Self::DOUBLED_PAWN_PENALTY;
        }
        score
    }

    fn knight_term(ctx: &EvaluationContext, color: Color, sq: Square, pinned: bool) -> i32 {
        let mut score = 0;
        if is_rim_square(sq) {
            score -= 12;
        }
        score += i32::from(KNIGHT_CENTER_TROPISM[sq as usize]) / 2;

        if let Some(enemy_king) = ctx.game_state.king_square(color.opposite()) {
            let file_gap = i32::from(square_file(sq).abs_diff(square_file(enemy_king)));
            let rank_gap = i32::from(square_rank(sq).abs_diff(square_rank(enemy_king)));
            score += (file_gap + rank_gap - 7) * -4;
        }

        if pinned {
            score -= 20;
        } else {
            score += (knight_attacks(sq).count_ones() as i32 - 5) * 4;
        }
        score
    }

    fn bishop_term(ctx: &EvaluationContext, sq: Square, pinned: bool) -> i32 {
        let mut score = 0;
        if is_rim_square(sq) {
            score -= 10;
        }
        if pinned {
            score -= 20;
        } else {
            let reach = bishop_attacks(sq, ctx.game_state.occupancy_all).count_ones() as i32;
            score += (reach - 6) * 3;
        }
        score
    }

    fn rook_term(ctx: &EvaluationContext, color: Color, sq: Square, pinned: bool) -> i32 {
        let mut score = 0;
        if pinned {
            score -= 25;
        } else {
            let reach = rook_attacks(sq, ctx.game_state.occupancy_all).count_ones() as i32;
            score += (reach - 7) * 2;
        }

        let file = square_file(sq) as usize;
        let own = ctx.file_pawns[color.index()][file];
        let other = ctx.file_pawns[color.opposite().index()][file];
        if own + other == 0 {
            score += 20;
        } else if own == 0 {
            score += 15;
        }
        score
    }

    fn queen_term(ctx: &EvaluationContext, sq: Square, pinned: bool) -> i32 {
        let mut score = 0;
        if is_rim_square(sq) {
            score -= 8;
        }
        if pinned {
            score -= 30;
        } else {
            score += queen_attacks(sq, ctx.game_state.occupancy_all).count_ones() as i32 - 11;
        }
        score
    }

    /// Stay sheltered while the enemy still has a third of its army, then
    /// head for the center.
    fn king_term(ctx: &EvaluationContext, color: Color, sq: Square) -> i32 {
        let distance = i32::from(center_distance(sq));
        if ctx.game_state.material[color.opposite().index()] > INITIAL_MATERIAL / 3 {
            (distance - 128) / 2
        } else {
            (128 - distance) / 2
        }
    }

    fn placement(ctx: &EvaluationContext, color: Color) -> i32 {
        let game_state = ctx.game_state;
        let mut total = 0;
        for tid in game_state.targets_by_color[color.index()] {
            let Some(sq) = game_state.target_to_square[tid as usize] else {
                continue;
            };
            let Some(man) = game_state.board[sq as usize] else {
                continue;
            };
            let pinned = game_state.pins.pinned.contains(tid);
            total += match man.kind {
                PieceKind::Pawn => Self::pawn_term(ctx, color, sq),
                PieceKind::Knight => Self::knight_term(ctx, color, sq, pinned),
                PieceKind::Bishop => Self::bishop_term(ctx, sq, pinned),
                PieceKind::Rook => Self::rook_term(ctx, color, sq, pinned),
                PieceKind::Queen => Self::queen_term(ctx, sq, pinned),
                PieceKind::King => Self::king_term(ctx, color, sq),
            };
        }
        total
    }
}

impl BoardScorer for PlacementScorer {
    fn score(&self, game_state: &GameState) -> Score {
        let mut file_pawns = [[0u8; 8]; 2];
        for color in Color::ALL {
            let mut pawns = game_state.pieces[color.index()][PieceKind::Pawn.index()];
            while pawns != 0 {
                let sq = pawns.trailing_zeros() as Square;
                file_pawns[color.index()][square_file(sq) as usize] += 1;
                pawns &= pawns - 1;
            }
        }
        let ctx = EvaluationContext {
            game_state,
            file_pawns,
        };

        let good = game_state.side_to_move;
        let evil = good.opposite();
        let good_total = i32::from(game_state.material[good.index()])
            + Self::placement(&ctx, good)
            + Self::ON_MOVE_BONUS;
        let evil_total = i32::from(game_state.material[evil.index()]) + Self::placement(&ctx, evil);
        clamp_to_score(good_total - evil_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    fn state(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn start_position_is_worth_the_move_bonus() {
        let start = state(STARTING_POSITION_FEN);
        assert_eq!(PlacementScorer.score(&start), Score::centipawns(10));
        assert_eq!(MaterialScorer.score(&start), Score::EVEN);
    }

    #[test]
    fn mirrored_positions_score_alike_for_the_side_to_move() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
        ] {
            let position = state(fen);
            let mirrored = position.flipped();
            assert_eq!(
                PlacementScorer.score(&position),
                PlacementScorer.score(&mirrored),
                "{fen}"
            );
        }
    }

    #[test]
    fn extra_material_dominates() {
        let up_a_queen = state("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        assert!(PlacementScorer.score(&up_a_queen) > Score::centipawns(800));
        let down_a_queen = state("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        assert!(PlacementScorer.score(&down_a_queen) < Score::centipawns(-800));
    }

    #[test]
    fn center_distance_is_symmetric_and_smallest_in_the_middle() {
        assert_eq!(CENTER_DISTANCE[0], CENTER_DISTANCE[63]);
        assert_eq!(CENTER_DISTANCE[7], CENTER_DISTANCE[56]);
        assert_eq!(CENTER_DISTANCE[27], CENTER_DISTANCE[36]);
        assert!(CENTER_DISTANCE[27] < CENTER_DISTANCE[0]);
        assert_eq!(CENTER_DISTANCE[0], 254);
    }

    #[test]
    fn doubled_pawns_are_penalised() {
        let doubled = state("4k3/8/8/8/4P3/4P3/8/4K3 w - - 0 1");
        let split = state("4k3/8/8/8/4P3/3P4/8/4K3 w - - 0 1");
        assert!(PlacementScorer.score(&doubled) < PlacementScorer.score(&split));
    }
}
