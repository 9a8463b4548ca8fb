use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::en_passant_is_legal;
use crate::move_generation::legal_move_shared::{allowed_destinations, GenerationContext, MoveSink};
use crate::moves::attack_tables::pawn_attacks;
use crate::moves::chess_move::{ChessMove, SpecialCase};

/// Legal pawn moves from one square.
///
/// En passant is decided by the scratch legality probe alone, so it is
/// tried before the frozen check and without the pin/check restriction.
pub fn generate_pawn_moves_from<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    tid: TargetId,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    let side = ctx.side;
    let pawn = Man::new(side, PieceKind::Pawn);
    let attacks = pawn_attacks(side, from);

    if ctx.mask.gainers() {
        generate_en_passant_from(game_state, from, side, sink);
    }

    if game_state.pins.frozen.contains(tid) {
        return;
    }

    let allowed = allowed_destinations(game_state, tid, ctx);
    let advance = side.pawn_advance();
    let one = (from as i8 + advance) as Square;
    let promoting = square_rank(one) == side.promotion_rank();

    if game_state.is_vacant(one) {
        if allowed & square_mask(one) != 0 {
            if promoting {
                if ctx.mask.gainers() {
                    emit_promotions(from, one, pawn, None, sink);
                }
            } else if ctx.mask.holders() {
                sink.accept(ChessMove::new(from, one, pawn, None, SpecialCase::Regular));
            }
        }

        if ctx.mask.holders() && square_rank(from) == side.pawn_start_rank() {
            let two = (one as i8 + advance) as Square;
            if game_state.is_vacant(two) && allowed & square_mask(two) != 0 {
                sink.accept(ChessMove::new(from, two, pawn, None, SpecialCase::Regular));
            }
        }
    }

    if ctx.mask.gainers() {
        let mut captures =
            attacks & game_state.occupancy_by_color[side.opposite().index()] & allowed;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            let victim = game_state.board[to as usize];
            if promoting {
                emit_promotions(from, to, pawn, victim, sink);
            } else {
                sink.accept(ChessMove::new(from, to, pawn, victim, SpecialCase::Regular));
            }
            captures &= captures - 1;
        }
    }
}

/// The en-passant capture from `from`, if the scratch probe allows it.
pub fn generate_en_passant_from<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    side: Color,
    sink: &mut S,
) {
    let Some(ep) = game_state.en_passant_square else {
        return;
    };
    if pawn_attacks(side, from) & square_mask(ep) != 0 && en_passant_is_legal(game_state, from) {
        let pawn = Man::new(side, PieceKind::Pawn);
        sink.accept(ChessMove::new(from, ep, pawn, None, SpecialCase::EnPassant));
    }
}

fn emit_promotions<S: MoveSink>(
    from: Square,
    to: Square,
    pawn: Man,
    victim: Option<Man>,
    sink: &mut S,
) {
    for kind in PieceKind::PROMOTIONS {
        sink.accept(ChessMove::new(from, to, pawn, victim, SpecialCase::promotion(kind)));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves_from;
    use crate::game_state::chess_types::*;
    use crate::move_generation::legal_move_shared::{GenerationContext, GenerationMask};
    use crate::moves::move_list::MoveList;

    fn pawn_moves(fen: &str, from: Square, mask: GenerationMask) -> MoveList {
        let state = GameState::from_fen(fen).expect("FEN should parse");
        let tid = state.square_to_target[from as usize].expect("pawn on square");
        let ctx = GenerationContext::new(&state, mask);
        let mut list = MoveList::new();
        generate_pawn_moves_from(&state, from, tid, &ctx, &mut list);
        list
    }

    #[test]
    fn start_pawn_has_single_and_double_step() {
        let list = pawn_moves(
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            12,
            GenerationMask::All,
        );
        let mut targets: Vec<u8> = list.iter().map(|mv| mv.to).collect();
        targets.sort_unstable();
        assert_eq!(targets, vec![20, 28]);
    }

    #[test]
    fn promotion_with_capture_expands_to_four_each() {
        let list = pawn_moves("3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1", 52, GenerationMask::All);
        // Four pushes to e8 and four captures on d8.
        assert_eq!(list.len(), 8);
        assert!(list.iter().all(|mv| mv.is_promotion()));
        let quiet = pawn_moves("3r3k/4P3/8/8/8/8/8/4K3 w - - 0 1", 52, GenerationMask::Holders);
        assert!(quiet.is_empty());
    }

    #[test]
    fn en_passant_is_generated_only_as_gainer() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        let gainers = pawn_moves(fen, 36, GenerationMask::Gainers);
        assert_eq!(gainers.len(), 1);
        assert_eq!(gainers.get(0).expect("move").to, 43);
        let holders = pawn_moves(fen, 36, GenerationMask::Holders);
        assert_eq!(holders.len(), 1);
        assert_eq!(holders.get(0).expect("move").to, 44);
    }

    #[test]
    fn file_pinned_pawn_may_still_advance() {
        let list = pawn_moves("4r2k/8/8/8/8/8/4P3/4K3 w - - 0 1", 12, GenerationMask::All);
        assert_eq!(list.len(), 2);
        let rank_pinned = pawn_moves("7k/8/8/8/8/8/K1P4r/8 w - - 0 1", 10, GenerationMask::All);
        assert!(rank_pinned.is_empty());
    }
}
