use crate::game_state::chess_rules::Castling;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{attackers_to_with_occupancy, is_square_attacked};
use crate::move_generation::legal_move_shared::{emit_targets, GenerationContext, MoveSink};
use crate::moves::attack_tables::king_attacks;
use crate::moves::chess_move::{ChessMove, SpecialCase};

/// Squares adjacent to the king it may step to without being attacked.
///
/// The king is lifted off the board before testing, so a square further
/// along a sliding checker's line counts as attacked.
pub fn safe_king_destinations(game_state: &GameState, from: Square, side: Color) -> u64 {
    let enemy = side.opposite();
    let occupancy = game_state.occupancy_all & !square_mask(from);
    let mut candidates = king_attacks(from) & !game_state.occupancy_by_color[side.index()];
    let mut safe = 0u64;

    while candidates != 0 {
        let to = candidates.trailing_zeros() as Square;
        if attackers_to_with_occupancy(game_state, to, enemy, occupancy) == 0 {
            safe |= square_mask(to);
        }
        candidates &= candidates - 1;
    }

    safe
}

pub fn generate_king_moves_from<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    let king = Man::new(ctx.side, PieceKind::King);
    let targets = safe_king_destinations(game_state, from, ctx.side);
    emit_targets(game_state, from, king, targets, ctx, sink);

    if ctx.mask.holders() && !ctx.evading {
        generate_castling_moves(game_state, ctx.side, sink);
    }
}

fn generate_castling_moves<S: MoveSink>(game_state: &GameState, side: Color, sink: &mut S) {
    let enemy = side.opposite();
    let king = Man::new(side, PieceKind::King);

    // Cannot castle out of check.
    if game_state.in_check() {
        return;
    }

    for kingside in [true, false] {
        let castling = Castling::for_side(side, kingside);
        if game_state.castling_rights & castling.right() == 0 {
            continue;
        }
        if game_state.board[castling.king_from() as usize] != Some(king) {
            continue;
        }
        if game_state.occupancy_all & castling.vacant_mask() != 0 {
            continue;
        }

        let mut transit = castling.transit_mask();
        let mut attacked = false;
        while transit != 0 {
            let sq = transit.trailing_zeros() as Square;
            if is_square_attacked(game_state, sq, enemy) {
                attacked = true;
                break;
            }
            transit &= transit - 1;
        }
        if attacked {
            continue;
        }

        let special = if kingside {
            SpecialCase::CastleKingside
        } else {
            SpecialCase::CastleQueenside
        };
        sink.accept(ChessMove::new(
            castling.king_from(),
            castling.king_to(),
            king,
            None,
            special,
        ));
    }
}
