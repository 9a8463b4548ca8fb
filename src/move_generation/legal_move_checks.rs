//! Attack detection, check/pin derivation and the en-passant legality probe.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::PinState;
use crate::moves::attack_tables::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::sliding_attacks::{between, bishop_attacks, rook_attacks};

/// Squares holding men of `attacker_color` that attack `square`, with sliders
/// traced through `occupancy` instead of the real board.
pub fn attackers_to_with_occupancy(
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
    occupancy: u64,
) -> u64 {
    let own = &game_state.pieces[attacker_color.index()];
    let diagonal = own[PieceKind::Bishop.index()] | own[PieceKind::Queen.index()];
    let orthogonal = own[PieceKind::Rook.index()] | own[PieceKind::Queen.index()];

    // A pawn of `attacker_color` attacks `square` exactly when a pawn of the
    // other color on `square` would attack it back.
    (pawn_attacks(attacker_color.opposite(), square) & own[PieceKind::Pawn.index()])
        | (knight_attacks(square) & own[PieceKind::Knight.index()])
        | (king_attacks(square) & own[PieceKind::King.index()])
        | (bishop_attacks(square, occupancy) & diagonal)
        | (rook_attacks(square, occupancy) & orthogonal)
}

#[inline]
pub fn attackers_to(game_state: &GameState, square: Square, attacker_color: Color) -> u64 {
    attackers_to_with_occupancy(game_state, square, attacker_color, game_state.occupancy_all)
}

#[inline]
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    attackers_to(game_state, square, attacker_color) != 0
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Derive checkers for the side to move and pins/frozen men for both colors.
pub fn compute_pin_state(game_state: &GameState) -> PinState {
    let mut pins = PinState::default();

    let side = game_state.side_to_move;
    if let Some(king_sq) = game_state.king_square(side) {
        pins.checkers = game_state.targets_on(attackers_to(game_state, king_sq, side.opposite()));
    }

    for color in Color::ALL {
        let Some(king_sq) = game_state.king_square(color) else {
            continue;
        };
        let enemy_sweepers = game_state
            .sweepers
            .intersection(game_state.targets_by_color[color.opposite().index()]);

        for tid in enemy_sweepers {
            let Some(sweeper_sq) = game_state.target_to_square[tid as usize] else {
                continue;
            };
            let Some(sweeper) = game_state.board[sweeper_sq as usize] else {
                continue;
            };
            let Some(line) = Bidirection::between_squares(king_sq, sweeper_sq) else {
                continue;
            };
            let reaches = match sweeper.kind {
                PieceKind::Bishop => !line.is_orthogonal(),
                PieceKind::Rook => line.is_orthogonal(),
                PieceKind::Queen => true,
                PieceKind::Pawn | PieceKind::Knight | PieceKind::King => false,
            };
            if !reaches {
                continue;
            }

            let blockers = between(king_sq, sweeper_sq) & game_state.occupancy_all;
            if blockers.count_ones() != 1 || blockers & game_state.occupancy_by_color[color.index()] == 0 {
                continue;
            }
            let pinned_sq = blockers.trailing_zeros() as Square;
            let (Some(pinned_tid), Some(pinned)) = (
                game_state.square_to_target[pinned_sq as usize],
                game_state.board[pinned_sq as usize],
            ) else {
                continue;
            };

            pins.pinned.insert(pinned_tid);
            pins.pin_direction[pinned_tid as usize] = Some(line);

            let pinner_ahead = match color {
                Color::Light => square_rank(sweeper_sq) > square_rank(king_sq),
                Color::Dark => square_rank(sweeper_sq) < square_rank(king_sq),
            };
            let frozen = match pinned.kind {
                PieceKind::Knight => true,
                PieceKind::Bishop => line.is_orthogonal(),
                PieceKind::Rook => !line.is_orthogonal(),
                PieceKind::Pawn => match line {
                    Bidirection::EastWest => true,
                    Bidirection::NorthSouth => false,
                    Bidirection::NortheastSouthwest | Bidirection::NorthwestSoutheast => {
                        !pinner_ahead
                    }
                },
                PieceKind::Queen | PieceKind::King => false,
            };
            if frozen {
                pins.frozen.insert(pinned_tid);
            }
        }
    }

    pins
}

/// Whether the pawn on `from` may legally capture en passant onto the current
/// en-passant target.
///
/// The capture is played out on copies of the occupancy and piece bitboards
/// and the mover's king is tested against the result.
pub fn en_passant_is_legal(game_state: &GameState, from: Square) -> bool {
    let Some(target) = game_state.en_passant_square else {
        return false;
    };
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let Some(king_sq) = game_state.king_square(side) else {
        return false;
    };
    let victim = (target as i8 - side.pawn_advance()) as Square;

    let occupancy =
        (game_state.occupancy_all & !square_mask(from) & !square_mask(victim)) | square_mask(target);
    let enemy_men = &game_state.pieces[enemy.index()];
    let enemy_pawns = enemy_men[PieceKind::Pawn.index()] & !square_mask(victim);
    let diagonal = enemy_men[PieceKind::Bishop.index()] | enemy_men[PieceKind::Queen.index()];
    let orthogonal = enemy_men[PieceKind::Rook.index()] | enemy_men[PieceKind::Queen.index()];

    let attacked = (pawn_attacks(side, king_sq) & enemy_pawns) != 0
        || (knight_attacks(king_sq) & enemy_men[PieceKind::Knight.index()]) != 0
        || (bishop_attacks(king_sq, occupancy) & diagonal) != 0
        || (rook_attacks(king_sq, occupancy) & orthogonal) != 0;
    !attacked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_has_no_attacks_on_kings() {
        let state = GameState::new_game();
        assert!(!is_king_in_check(&state, Color::Light));
        assert!(!is_king_in_check(&state, Color::Dark));
        // e3 is covered by the d2 and f2 pawns.
        assert_eq!(attackers_to(&state, 20, Color::Light).count_ones(), 2);
        // f3 is covered by the e2 and g2 pawns and the g1 knight.
        assert_eq!(attackers_to(&state, 21, Color::Light).count_ones(), 3);
    }

    #[test]
    fn detects_check_and_checker() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1").expect("FEN should parse");
        assert!(state.in_check());
        assert_eq!(state.squares_of(state.pins.checkers), 1u64 << 4);
    }

    #[test]
    fn classifies_pins_and_frozen_men() {
        // Knight e2 is pinned on the file and frozen, rook f1 is pinned on
        // the rank and may still slide along it, bishop d2 is free.
        let state = GameState::from_fen("4r2k/8/8/8/8/8/3BN3/2q1KR1r w - - 0 1")
            .expect("FEN should parse");
        let knight = state.square_to_target[12].expect("knight");
        let bishop = state.square_to_target[11].expect("bishop");
        let rook = state.square_to_target[5].expect("rook");
        assert!(state.pins.pinned.contains(knight));
        assert!(state.pins.frozen.contains(knight));
        assert!(!state.pins.pinned.contains(bishop));
        assert!(state.pins.pinned.contains(rook));
        assert!(!state.pins.frozen.contains(rook));
        assert_eq!(state.pins.pin_direction[rook as usize], Some(Bidirection::EastWest));
    }

    #[test]
    fn pawn_pinned_from_behind_on_a_diagonal_is_frozen() {
        // Pawn d2 is pinned to the e3 king by a bishop behind it on c1.
        let state = GameState::from_fen("7k/8/8/8/8/4K3/3P4/2b5 w - - 0 1").expect("FEN should parse");
        let pawn = state.square_to_target[11].expect("pawn");
        assert!(state.pins.pinned.contains(pawn));
        assert!(state.pins.frozen.contains(pawn));

        let ahead = GameState::from_fen("7k/8/8/8/1b6/2P5/3K4/8 w - - 0 1").expect("FEN should parse");
        let pawn = ahead.square_to_target[18].expect("pawn");
        assert!(ahead.pins.pinned.contains(pawn));
        assert!(!ahead.pins.frozen.contains(pawn));
    }

    #[test]
    fn en_passant_exposing_the_king_on_the_rank_is_illegal() {
        // Light king a5, light pawn b5, dark pawn c5 just advanced, dark rook h5.
        let state = GameState::from_fen("7k/8/8/KPp4r/8/8/8/8 w - c6 0 2").expect("FEN should parse");
        assert!(!en_passant_is_legal(&state, 33));

        let open = GameState::from_fen("7k/8/8/1Pp5/8/8/8/K7 w - c6 0 2").expect("FEN should parse");
        assert!(en_passant_is_legal(&open, 33));
    }
}
