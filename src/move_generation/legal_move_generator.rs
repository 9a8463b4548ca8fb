//! Full legal move generation pipeline.
//!
//! Dispatches every man of the side to move to its per-kind generator under a
//! shared context. While in check the context confines non-king men to the
//! checking line, which turns the same code into the evasion generator. The
//! result can be materialized, counted or merely probed through the sink.

use crate::errors::internal_fault;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{apply_move_in_place, retract_move_in_place};
use crate::move_generation::legal_move_shared::{
    AnyMoveProbe, GenerationContext, GenerationMask, MoveCounter, MoveSink,
};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves_from;
use crate::move_generation::legal_moves_king::generate_king_moves_from;
use crate::move_generation::legal_moves_knight::generate_knight_moves_from;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves_from;
use crate::move_generation::legal_moves_queen::generate_queen_moves_from;
use crate::move_generation::legal_moves_rook::generate_rook_moves_from;
use crate::moves::chess_move::{ChessMove, MoveFlags};
use crate::moves::move_list::MoveList;

/// Legal moves of one man, identified by target id.
pub fn generate_moves_for_target<S: MoveSink>(
    game_state: &GameState,
    tid: TargetId,
    ctx: &GenerationContext,
    sink: &mut S,
) {
    let Some(from) = game_state.target_to_square[tid as usize] else {
        return;
    };
    let Some(man) = game_state.board[from as usize] else {
        internal_fault("target id maps to a vacant square");
    };

    match man.kind {
        PieceKind::Pawn => generate_pawn_moves_from(game_state, from, tid, ctx, sink),
        PieceKind::Knight => generate_knight_moves_from(game_state, from, tid, ctx, sink),
        PieceKind::Bishop => generate_bishop_moves_from(game_state, from, tid, ctx, sink),
        PieceKind::Rook => generate_rook_moves_from(game_state, from, tid, ctx, sink),
        PieceKind::Queen => generate_queen_moves_from(game_state, from, tid, ctx, sink),
        PieceKind::King => generate_king_moves_from(game_state, from, ctx, sink),
    }
}

/// Feed every legal move of the side to move selected by `mask` into `sink`.
pub fn generate_moves_into<S: MoveSink>(game_state: &GameState, mask: GenerationMask, sink: &mut S) {
    let ctx = GenerationContext::new(game_state, mask);
    let side = game_state.side_to_move;
    let double_check = game_state.pins.checkers.len() >= 2;

    for tid in game_state.targets_by_color[side.index()] {
        // Under double check only the king moves, barring an en-passant
        // capture that the pawn generator's probe admits on its own.
        if double_check {
            let kind = game_state.target_to_square[tid as usize]
                .and_then(|sq| game_state.board[sq as usize])
                .map(|man| man.kind);
            if !matches!(kind, Some(PieceKind::King | PieceKind::Pawn)) {
                continue;
            }
        }
        generate_moves_for_target(game_state, tid, &ctx, sink);
        if sink.is_satisfied() {
            return;
        }
    }
}

pub fn generate_moves(game_state: &GameState, mask: GenerationMask) -> MoveList {
    let mut list = MoveList::new();
    generate_moves_into(game_state, mask, &mut list);
    list
}

#[inline]
pub fn generate_legal_moves(game_state: &GameState) -> MoveList {
    generate_moves(game_state, GenerationMask::All)
}

/// Legal moves of whatever man stands on `from`, if it belongs to the side
/// to move.
pub fn generate_moves_from_square(
    game_state: &GameState,
    from: Square,
    mask: GenerationMask,
) -> MoveList {
    let mut list = MoveList::new();
    let Some(tid) = game_state.square_to_target[from as usize] else {
        return list;
    };
    if Color::from_target_id(tid) != game_state.side_to_move {
        return list;
    }
    let ctx = GenerationContext::new(game_state, mask);
    generate_moves_for_target(game_state, tid, &ctx, &mut list);
    list
}

/// Number of legal moves, without building them.
pub fn count_legal_moves(game_state: &GameState) -> usize {
    let mut counter = MoveCounter::default();
    generate_moves_into(game_state, GenerationMask::All, &mut counter);
    counter.count
}

/// Whether the side to move has any legal move; stops at the first one.
pub fn has_legal_move(game_state: &GameState) -> bool {
    let mut probe = AnyMoveProbe::default();
    generate_moves_into(game_state, GenerationMask::All, &mut probe);
    probe.found
}

/// Set check, mate and disambiguation flags on every move of `list`.
///
/// Each move is played out on `game_state` and taken back again.
pub fn mark_notation(game_state: &mut GameState, list: &mut MoveList) {
    let snapshot: Vec<ChessMove> = list.iter().copied().collect();

    for mv in list.iter_mut() {
        if !matches!(mv.from_man.kind, PieceKind::Pawn | PieceKind::King) {
            let rivals: Vec<&ChessMove> = snapshot
                .iter()
                .filter(|other| {
                    other.to == mv.to && other.from_man == mv.from_man && other.from != mv.from
                })
                .collect();
            if !rivals.is_empty() {
                let shares_file = rivals
                    .iter()
                    .any(|other| square_file(other.from) == square_file(mv.from));
                let shares_rank = rivals
                    .iter()
                    .any(|other| square_rank(other.from) == square_rank(mv.from));
                if !shares_file {
                    mv.flags.insert(MoveFlags::DISAMBIGUATE_FILE);
                } else if !shares_rank {
                    mv.flags.insert(MoveFlags::DISAMBIGUATE_RANK);
                } else {
                    mv.flags.insert(MoveFlags::DISAMBIGUATE_FILE);
                    mv.flags.insert(MoveFlags::DISAMBIGUATE_RANK);
                }
            }
        }

        let undo = apply_move_in_place(game_state, mv);
        if game_state.in_check() {
            mv.flags.insert(MoveFlags::CHECK);
            if !has_legal_move(game_state) {
                mv.flags.insert(MoveFlags::MATE);
            }
        }
        retract_move_in_place(game_state, &undo);
    }
}

/// All legal moves with notation flags set.
pub fn generate_annotated_moves(game_state: &mut GameState) -> MoveList {
    let mut list = generate_legal_moves(game_state);
    mark_notation(game_state, &mut list);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn state(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let start = state(STARTING_POSITION_FEN);
        assert_eq!(generate_legal_moves(&start).len(), 20);
        assert_eq!(count_legal_moves(&start), 20);
        assert!(has_legal_move(&start));
    }

    #[test]
    fn gainers_and_holders_partition_all_moves() {
        let kiwipete = state(KIWIPETE);
        let all = generate_legal_moves(&kiwipete);
        let gainers = generate_moves(&kiwipete, GenerationMask::Gainers);
        let holders = generate_moves(&kiwipete, GenerationMask::Holders);
        assert_eq!(all.len(), 48);
        assert_eq!(gainers.len() + holders.len(), all.len());
        assert!(gainers.iter().all(ChessMove::is_gainer));
        assert!(holders.iter().all(ChessMove::is_quiet));
    }

    #[test]
    fn counting_stays_in_step_with_generation() {
        for fen in [
            STARTING_POSITION_FEN,
            KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1",
        ] {
            let position = state(fen);
            assert_eq!(count_legal_moves(&position), generate_legal_moves(&position).len(), "{fen}");
        }
    }

    #[test]
    fn single_check_evasions() {
        // Rook e8 checks. Bishop d1 blocks on e2, knight c3 on e2 or e4.
        let position = state("4r2k/8/8/8/8/2N5/8/3BK3 w - - 0 1");
        assert!(position.in_check());
        let moves = generate_legal_moves(&position);
        let blocks: Vec<_> = moves
            .iter()
            .filter(|mv| mv.from_man.kind != PieceKind::King)
            .collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|mv| square_file(mv.to) == 4));
        // The king steps to d2, f1 or f2.
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let position = state("4r2k/8/8/8/8/3n4/8/R3K3 w Q - 0 1");
        let moves = generate_legal_moves(&position);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.from_man.kind == PieceKind::King));
        assert!(moves.iter().all(|mv| !mv.is_castling()));
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        let mated = state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(mated.in_check());
        assert!(!has_legal_move(&mated));
        assert_eq!(count_legal_moves(&mated), 0);

        let stalemated = state("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!stalemated.in_check());
        assert!(!has_legal_move(&stalemated));
    }

    #[test]
    fn moves_from_a_single_square() {
        let start = state(STARTING_POSITION_FEN);
        assert_eq!(generate_moves_from_square(&start, 6, GenerationMask::All).len(), 2);
        assert!(generate_moves_from_square(&start, 62, GenerationMask::All).is_empty());
        assert!(generate_moves_from_square(&start, 27, GenerationMask::All).is_empty());
    }

    #[test]
    fn notation_marks_mate_and_disambiguation() {
        let mut position = state("6k1/5ppp/8/8/8/8/8/R3R1K1 w - - 0 1");
        let moves = generate_annotated_moves(&mut position);

        let mate = moves
            .iter()
            .find(|mv| mv.from == 4 && mv.to == 60)
            .expect("Re8 is legal");
        assert!(mate.flags.contains(MoveFlags::CHECK));
        assert!(mate.flags.contains(MoveFlags::MATE));

        // Both rooks reach d1 and c1; they share the rank, so files tell them apart.
        let to_d1: Vec<_> = moves.iter().filter(|mv| mv.to == 3).collect();
        assert_eq!(to_d1.len(), 2);
        assert!(to_d1.iter().all(|mv| mv.flags.contains(MoveFlags::DISAMBIGUATE_FILE)));
        assert!(to_d1.iter().all(|mv| !mv.flags.contains(MoveFlags::DISAMBIGUATE_RANK)));

        // Only the a1 rook reaches a8, so no flag there.
        let to_a8 = moves.iter().find(|mv| mv.to == 56).expect("Ra8 is legal");
        assert_eq!(to_a8.flags.0 & (MoveFlags::DISAMBIGUATE_FILE | MoveFlags::DISAMBIGUATE_RANK), 0);
        assert_eq!(position.verify_consistency(), Ok(()));
    }
}
