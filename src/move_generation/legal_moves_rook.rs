use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{
    allowed_destinations, emit_targets, GenerationContext, MoveSink,
};
use crate::moves::sliding_attacks::rook_attacks;

pub fn generate_rook_moves_from<S: MoveSink>(
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
    let targets = rook_attacks(from, game_state.occupancy_all)
        & !own_occ
        & allowed_destinations(game_state, tid, ctx);
    emit_targets(
        game_state,
        from,
        Man::new(ctx.side, PieceKind::Rook),
        targets,
        ctx,
        sink,
    );
}
