use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{
    allowed_destinations, emit_targets, GenerationContext, MoveSink,
};
use crate::moves::sliding_attacks::queen_attacks;

/// A queen is never frozen; a pin only narrows it to the pin line.
pub fn generate_queen_moves_from<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    tid: TargetId,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    let own_occ = game_state.occupancy_by_color[ctx.side.index()];
    let targets = queen_attacks(from, game_state.occupancy_all)
        & !own_occ
        & allowed_destinations(game_state, tid, ctx);
    emit_targets(
        game_state,
        from,
        Man::new(ctx.side, PieceKind::Queen),
        targets,
        ctx,
        sink,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_shared::GenerationMask;
    use crate::moves::move_list::MoveList;

    #[test]
    fn file_pinned_queen_stays_on_the_file() {
        let state = GameState::from_fen("4r2k/8/8/8/8/8/4Q3/4K3 w - - 0 1").expect("FEN should parse");
        let tid = state.square_to_target[12].expect("queen");
        let ctx = GenerationContext::new(&state, GenerationMask::All);
        let mut list = MoveList::new();
        generate_queen_moves_from(&state, 12, tid, &ctx, &mut list);
        assert!(list.iter().all(|mv| square_file(mv.to) == 4));
        // e3..e7 plus the capture on e8.
        assert_eq!(list.len(), 6);
    }
}
