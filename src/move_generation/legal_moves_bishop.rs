use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{
    allowed_destinations, emit_targets, GenerationContext, MoveSink,
};
use crate::moves::sliding_attacks::bishop_attacks;

pub fn generate_bishop_moves_from<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    tid: TargetId,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    if game_state.pins.frozen.contains(tid) {
        return;
    }

    let own_occ = game_state.occupancy_by_color[ctx.side.index()];
    let targets = bishop_attacks(from, game_state.occupancy_all)
        & !own_occ
        & allowed_destinations(game_state, tid, ctx);
    emit_targets(
        game_state,
        from,
        Man::new(ctx.side, PieceKind::Bishop),
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
    fn diagonally_pinned_bishop_slides_along_the_pin() {
        // Bishop d2 pinned by the a5 bishop against the e1 king.
        let state = GameState::from_fen("7k/8/8/b7/8/8/3B4/4K3 w - - 0 1").expect("FEN should parse");
        let tid = state.square_to_target[11].expect("bishop");
        let ctx = GenerationContext::new(&state, GenerationMask::All);
        let mut list = MoveList::new();
        generate_bishop_moves_from(&state, 11, tid, &ctx, &mut list);
        let mut targets: Vec<u8> = list.iter().map(|mv| mv.to).collect();
        targets.sort_unstable();
        // c3, b4 and the capture on a5.
        assert_eq!(targets, vec![18, 25, 32]);
    }
}
