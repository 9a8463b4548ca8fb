use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{
    allowed_destinations, emit_targets, GenerationContext, MoveSink,
};
use crate::moves::attack_tables::knight_attacks;

pub fn generate_knight_moves_from<S: MoveSink>(
    game_state: &GameState,
    from: Square,
    tid: TargetId,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    // A pinned knight can never stay on its pin line.
    if game_state.pins.frozen.contains(tid) {
        return;
    }

    let own_occ = game_state.occupancy_by_color[ctx.side.index()];
    let targets = knight_attacks(from) & !own_occ & allowed_destinations(game_state, tid, ctx);
    emit_targets(
        game_state,
        from,
        Man::new(ctx.side, PieceKind::Knight),
        targets,
        ctx,
        sink,
    );
}
