//! Position description (FEN) parser.
//!
//! Parsing is strict and all-or-nothing: the six fields are decoded into a
//! bare board and environment, and `GameState::from_board` derives every
//! index and rejects positions that cannot arise in play.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::Environment;
use crate::utils::algebraic::algebraic_to_square;

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(reason.into())
}

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let &[board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        fields.as_slice()
    else {
        return Err(invalid(format!("expected 6 fields, found {}", fields.len())));
    };

    let board = parse_board(board_part)?;
    let side_to_move = parse_side_to_move(side_part)?;
    let castling_rights = parse_castling_rights(castling_part)?;
    let en_passant_square = parse_en_passant_square(en_passant_part)?;
    let halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(format!("invalid halfmove clock '{halfmove_part}'")))?;
    let fullmove_number = fullmove_part
        .parse::<u16>()
        .ok()
        .filter(|number| *number >= 1)
        .ok_or_else(|| invalid(format!("invalid fullmove number '{fullmove_part}'")))?;

    GameState::from_board(
        board,
        Environment {
            side_to_move,
            castling_rights,
            en_passant_square,
            halfmove_clock,
            fullmove_number,
        },
    )
}

fn parse_board(board_part: &str) -> ChessResult<[Option<Man>; 64]> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    let mut board = [None; 64];
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(invalid(format!("invalid vacant-square run '{ch}'")));
                }
                file += run as u8;
            } else {
                let man = Man::from_fen_char(ch)
                    .ok_or_else(|| invalid(format!("invalid man '{ch}' in board layout")))?;
                if file >= 8 {
                    return Err(invalid(format!("rank {} has too many files", rank + 1)));
                }
                board[make_square(file, rank) as usize] = Some(man);
                file += 1;
            }
            if file > 8 {
                return Err(invalid(format!("rank {} has too many files", rank + 1)));
            }
        }

        if file != 8 {
            return Err(invalid(format!("rank {} does not cover 8 files", rank + 1)));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(format!("invalid side to move '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        let right = match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid(format!("invalid castling right '{ch}'"))),
        };
        if rights & right != 0 {
            return Err(invalid(format!("repeated castling right '{ch}'")));
        }
        rights |= right;
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|_| invalid(format!("invalid en-passant square '{en_passant_part}'")))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn parses_the_starting_position() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.castling_rights, 0x0F);
        assert_eq!(game_state.man_count_by_color, [16, 16]);
        assert_eq!(game_state.square_to_target[4], Some(0));
        assert_eq!(game_state.square_to_target[60], Some(16));
        assert_eq!(game_state.square_to_target[0], Some(1));
        assert_eq!(game_state.verify_consistency(), Ok(()));
    }

    #[test]
    fn rejects_malformed_descriptions() {
        for bad in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w KQkq - 0 1",
            "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KKkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
        ] {
            assert!(
                matches!(parse_fen(bad), Err(ChessError::InvalidFen(_))),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn rejects_impossible_positions() {
        for bad in [
            // No light king.
            "4k3/8/8/8/8/8/8/8 w - - 0 1",
            // Two dark kings.
            "4k2k/8/8/8/8/8/8/4K3 w - - 0 1",
            // Pawn on the last rank.
            "4k2P/8/8/8/8/8/8/4K3 w - - 0 1",
            // Side not to move is in check.
            "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1",
            // Castling right without the rook at home.
            "4k3/8/8/8/8/8/8/4K3 w K - 0 1",
            // En-passant square with no pawn that just advanced.
            "4k3/8/8/8/8/8/8/4K3 w - e6 0 1",
        ] {
            assert!(parse_fen(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn accepts_en_passant_after_a_double_step() {
        let game_state = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("valid");
        assert_eq!(game_state.en_passant_square, Some(43));
    }
}
