//! Standard algebraic move text.
//!
//! Encoding relies on the annotation flags set by `mark_notation`; text is
//! matched by encoding every legal move and comparing, so only a move's
//! canonical text (or its coordinate form) is accepted.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::generate_annotated_moves;
use crate::moves::chess_move::{ChessMove, MoveFlags, SpecialCase};
use crate::utils::algebraic::{file_char, rank_char, square_to_algebraic};

/// Canonical text of an annotated move, such as `Nbd7`, `exd6`, `e8=Q+` or `O-O#`.
pub fn move_to_san(mv: &ChessMove) -> String {
    let mut out = String::with_capacity(8);

    match mv.special {
        SpecialCase::CastleKingside => out.push_str("O-O"),
        SpecialCase::CastleQueenside => out.push_str("O-O-O"),
        _ => {
            if mv.from_man.kind == PieceKind::Pawn {
                if mv.is_capture() {
                    out.push(file_char(mv.from));
                }
            } else {
                out.push(mv.from_man.kind.letter());
                if mv.flags.contains(MoveFlags::DISAMBIGUATE_FILE) {
                    out.push(file_char(mv.from));
                }
                if mv.flags.contains(MoveFlags::DISAMBIGUATE_RANK) {
                    out.push(rank_char(mv.from));
                }
            }
            if mv.is_capture() {
                out.push('x');
            }
            out.push_str(&square_to_algebraic(mv.to));
            if let Some(kind) = mv.special.promotion_kind() {
                out.push('=');
                out.push(kind.letter());
            }
        }
    }

    if mv.flags.contains(MoveFlags::MATE) {
        out.push('#');
    } else if mv.flags.contains(MoveFlags::CHECK) {
        out.push('+');
    }
    out
}

/// The legal move whose canonical or coordinate text is `text`.
///
/// The returned move carries its annotation flags. The position is played
/// through while annotating and is restored before returning.
pub fn match_move(game_state: &mut GameState, text: &str) -> ChessResult<ChessMove> {
    let text = text.trim();
    let moves = generate_annotated_moves(game_state);

    let mut matches = moves
        .iter()
        .filter(|mv| move_to_san(mv) == text || mv.to_coordinate() == text);
    let Some(found) = matches.next() else {
        return Err(ChessError::IllegalMove(text.to_owned()));
    };
    if matches.next().is_some() {
        return Err(ChessError::AmbiguousMove(text.to_owned()));
    }
    Ok(*found)
}

/// Canonical text for each move of `line`, played from `game_state`.
///
/// Moves are re-annotated in their own position, so lines whose deeper moves
/// carry no notation flags still print correctly. Stops at the first move that
/// is not legal where it is played.
pub fn line_to_san(game_state: &GameState, line: &[ChessMove]) -> Vec<String> {
    let mut scratch = game_state.clone();
    let mut texts = Vec::with_capacity(line.len());
    for mv in line {
        let annotated = generate_annotated_moves(&mut scratch);
        let Some(found) = annotated
            .iter()
            .find(|candidate| {
                candidate.from == mv.from && candidate.to == mv.to && candidate.special == mv.special
            })
            .copied()
        else {
            break;
        };
        texts.push(move_to_san(&found));
        scratch.make_move(&found);
    }
    texts
}
