//! Terminal-oriented board renderer.
//!
//! Produces a human-readable diagram for the engine facade's `Display`, the
//! command-line driver and test diagnostics.

use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

/// Render the board, rank 8 at the top, followed by the environment.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');
        for file in 0..8u8 {
            let ch = game_state.board[make_square(file, rank) as usize].map_or('.', Man::fen_char);
            out.push(ch);
            if file < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");

    let side = match game_state.side_to_move {
        Color::Light => "white",
        Color::Dark => "black",
    };
    let en_passant = game_state
        .en_passant_square
        .map_or_else(|| "-".to_owned(), square_to_algebraic);
    out.push_str(&format!(
        "{side} to move, en passant {en_passant}, halfmove {}, move {}\n",
        game_state.halfmove_clock, game_state.fullmove_number
    ));

    out
}
