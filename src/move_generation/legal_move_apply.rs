//! In-place move application and its exact reversal.
//!
//! `apply_move_in_place` returns the record `retract_move_in_place` needs;
//! `GameState::make_move`/`unmake_move` wrap the pair and keep the
//! repetition history and undo log in step. Moves are assumed legal.

use crate::errors::internal_fault;
use crate::game_state::chess_rules::Castling;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::UndoState;
use crate::moves::chess_move::{ChessMove, SpecialCase};
use crate::search::zobrist::{castling_key, castling_rights_key};

pub fn apply_move_in_place(game_state: &mut GameState, mv: &ChessMove) -> UndoState {
    let environment = game_state.environment();
    let pins = game_state.pins;
    let mut captured = None;

    if !mv.is_null() {
        let mover = mv.from_man.color;
        match mv.special {
            SpecialCase::Regular => {
                if mv.to_man.is_some() {
                    captured = game_state.remove_man(mv.to);
                }
                game_state.relocate_man(mv.from, mv.to);
            }
            SpecialCase::EnPassant => {
                captured = game_state.remove_man(mv.en_passant_victim());
                game_state.relocate_man(mv.from, mv.to);
            }
            SpecialCase::CastleKingside | SpecialCase::CastleQueenside => {
                let castling =
                    Castling::for_side(mover, mv.special == SpecialCase::CastleKingside);
                game_state.relocate_man(castling.king_from(), castling.king_to());
                game_state.relocate_man(castling.rook_from(), castling.rook_to());
            }
            SpecialCase::PromoteKnight
            | SpecialCase::PromoteBishop
            | SpecialCase::PromoteRook
            | SpecialCase::PromoteQueen => {
                let Some(tid) = game_state.remove_man(mv.from) else {
                    internal_fault("promotion from a vacant square");
                };
                if mv.to_man.is_some() {
                    captured = game_state.remove_man(mv.to);
                }
                let kind = mv.special.promotion_kind().unwrap_or(PieceKind::Queen);
                game_state.place_man(mv.to, Man::new(mover, kind), tid);
            }
        }

        for castling in Castling::ALL {
            if game_state.castling_rights & castling.right() == 0 {
                continue;
            }
            if mv.from == castling.king_from()
                || mv.from == castling.rook_from()
                || mv.to == castling.rook_from()
            {
                game_state.castling_rights &= !castling.right();
                game_state.hash ^= castling_key(castling);
            }
        }
    }

    game_state.set_en_passant(None);
    if mv.is_pawn_two_step() {
        let enemy_pawns = game_state.pieces[mv.from_man.color.opposite().index()]
            [PieceKind::Pawn.index()];
        if enemy_pawns & rank_neighbours(mv.to) != 0 {
            game_state.set_en_passant(Some((mv.from + mv.to) / 2));
        }
    }

    if !mv.is_null() && (mv.from_man.kind == PieceKind::Pawn || mv.to_man.is_some()) {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }

    game_state.side_to_move = game_state.side_to_move.opposite();
    if game_state.side_to_move == Color::Light {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.refresh_pins();

    UndoState {
        mv: *mv,
        environment,
        captured,
        pins,
    }
}

pub fn retract_move_in_place(game_state: &mut GameState, undo: &UndoState) {
    let mv = &undo.mv;

    if !mv.is_null() {
        let mover = mv.from_man.color;
        match mv.special {
            SpecialCase::Regular => {
                game_state.relocate_man(mv.to, mv.from);
                restore_captured(game_state, mv.to, mv.to_man, undo.captured);
            }
            SpecialCase::EnPassant => {
                game_state.relocate_man(mv.to, mv.from);
                let victim = Some(Man::new(mover.opposite(), PieceKind::Pawn));
                restore_captured(game_state, mv.en_passant_victim(), victim, undo.captured);
            }
            SpecialCase::CastleKingside | SpecialCase::CastleQueenside => {
                let castling =
                    Castling::for_side(mover, mv.special == SpecialCase::CastleKingside);
                game_state.relocate_man(castling.rook_to(), castling.rook_from());
                game_state.relocate_man(castling.king_to(), castling.king_from());
            }
            SpecialCase::PromoteKnight
            | SpecialCase::PromoteBishop
            | SpecialCase::PromoteRook
            | SpecialCase::PromoteQueen => {
                let Some(tid) = game_state.remove_man(mv.to) else {
                    internal_fault("retracting a promotion onto a vacant square");
                };
                restore_captured(game_state, mv.to, mv.to_man, undo.captured);
                game_state.place_man(mv.from, mv.from_man, tid);
            }
        }
    }

    let previous = undo.environment;
    game_state.hash ^= castling_rights_key(game_state.castling_rights)
        ^ castling_rights_key(previous.castling_rights);
    game_state.set_en_passant(previous.en_passant_square);
    game_state.restore_environment(previous);
    game_state.pins = undo.pins;
}

fn restore_captured(
    game_state: &mut GameState,
    square: Square,
    man: Option<Man>,
    captured: Option<TargetId>,
) {
    match (man, captured) {
        (Some(man), Some(tid)) => game_state.place_man(square, man, tid),
        (None, None) => {}
        _ => internal_fault("undo record disagrees with the captured man"),
    }
}

impl GameState {
    /// Apply a legal move, recording the prior hash and the undo record.
    pub fn make_move(&mut self, mv: &ChessMove) {
        self.history.push(self.hash);
        let undo = apply_move_in_place(self, mv);
        self.undo_log.push(undo);
    }

    /// Reverse the most recent `make_move`, returning the move undone.
    pub fn unmake_move(&mut self) -> ChessMove {
        let undo = self.undo_log.pop();
        retract_move_in_place(self, &undo);
        self.history.pop();
        undo.mv
    }

    /// Pass the turn without moving a man.
    pub fn make_null_move(&mut self) {
        let null = ChessMove::null(self.side_to_move);
        self.make_move(&null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn find_move(state: &GameState, from: &str, to: &str) -> ChessMove {
        let from = crate::utils::algebraic::algebraic_to_square(from).expect("square");
        let to = crate::utils::algebraic::algebraic_to_square(to).expect("square");
        *generate_legal_moves(state)
            .iter()
            .find(|mv| mv.from == from && mv.to == to)
            .expect("move should be legal")
    }

    fn assert_round_trips(fen: &str) {
        let mut state = GameState::from_fen(fen).expect("FEN should parse");
        let before = state.clone();
        for mv in generate_legal_moves(&before).iter() {
            state.make_move(mv);
            assert_eq!(state.verify_consistency(), Ok(()), "after {mv} in {fen}");
            let undone = state.unmake_move();
            assert_eq!(undone, *mv);
            assert_eq!(state, before, "undo of {mv} in {fen}");
        }
    }

    #[test]
    fn every_move_round_trips_in_tricky_positions() {
        assert_round_trips(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        assert_round_trips("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_round_trips("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        assert_round_trips("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
        assert_round_trips("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
    }

    #[test]
    fn en_passant_target_only_beside_an_enemy_pawn() {
        let mut state = GameState::new_game();
        state.make_move(&find_move(&state, "e2", "e4"));
        assert_eq!(state.en_passant_square, None);

        let mut state = GameState::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        state.make_move(&find_move(&state, "e2", "e4"));
        assert_eq!(state.en_passant_square, Some(20));
        assert_eq!(state.verify_consistency(), Ok(()));
    }

    #[test]
    fn capturing_a_home_rook_clears_that_right() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        state.make_move(&find_move(&state, "a1", "a8"));
        assert_eq!(state.castling_rights, CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_KINGSIDE);
        assert_eq!(state.verify_consistency(), Ok(()));
    }

    #[test]
    fn castling_relocates_the_rook_and_clears_both_rights() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 9").expect("FEN should parse");
        state.make_move(&find_move(&state, "e1", "g1"));
        assert_eq!(state.man_at(5), Some(Man::new(Color::Light, PieceKind::Rook)));
        assert_eq!(state.man_at(6), Some(Man::new(Color::Light, PieceKind::King)));
        assert_eq!(state.castling_rights, CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);
        assert_eq!(state.halfmove_clock, 4);
        assert_eq!(state.fullmove_number, 9);
    }

    #[test]
    fn promotion_keeps_the_pawns_target_id() {
        let mut state = GameState::from_fen("3r3k/4P3/8/8/8/8/8/4K3 w - - 5 40").expect("FEN should parse");
        let tid = state.square_to_target[52];
        let promotion = *generate_legal_moves(&state)
            .iter()
            .find(|mv| mv.to == 59 && mv.special == SpecialCase::PromoteQueen)
            .expect("capture-promotion");
        state.make_move(&promotion);
        assert_eq!(state.square_to_target[59], tid);
        assert_eq!(state.man_at(59), Some(Man::new(Color::Light, PieceKind::Queen)));
        assert_eq!(state.halfmove_clock, 0);
        assert!(state.in_check());
        assert_eq!(state.verify_consistency(), Ok(()));
    }

    #[test]
    fn null_move_passes_the_turn() {
        let mut state = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let before = state.clone();
        state.make_null_move();
        assert_eq!(state.side_to_move, Color::Dark);
        assert_eq!(state.en_passant_square, None);
        assert_eq!(state.halfmove_clock, 1);
        assert_eq!(state.verify_consistency(), Ok(()));
        assert!(state.unmake_move().is_null());
        assert_eq!(state, before);
    }

    #[test]
    fn knight_shuffle_repeats_the_start_position() {
        let mut state = GameState::new_game();
        let start_hash = state.hash;
        let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];

        for (from, to) in shuffle {
            state.make_move(&find_move(&state, from, to));
        }
        assert_eq!(state.hash, start_hash);
        assert!(state.is_repeated_once());
        assert!(!state.is_repeated_twice());

        for (from, to) in shuffle {
            state.make_move(&find_move(&state, from, to));
        }
        assert!(state.is_repeated_twice());
        assert!(state.is_draw());
    }
}
