//! PGN (Portable Game Notation) export.
//!
//! Produces a tag section followed by numbered SAN movetext and the result
//! token, wrapped at 80 columns.

use crate::{Game, Position};
use teal_core::Color;

const LINE_WIDTH: usize = 80;

/// Renders `game` as PGN.
///
/// `tags` are written in the given order. A `Result` tag is added when the
/// caller did not supply one, and games that did not start from the
/// standard position get `SetUp` and `FEN` tags.
///
/// # Example
///
/// ```
/// use teal_engine::{pgn, Game};
///
/// let mut game = Game::new();
/// game.make_move_san("e4").unwrap();
/// game.make_move_san("e5").unwrap();
///
/// let text = pgn::write_pgn(&game, &[("White", "Alice"), ("Black", "Bob")]);
/// assert!(text.contains("[White \"Alice\"]"));
/// assert!(text.ends_with("1. e4 e5 *\n"));
/// ```
pub fn write_pgn(game: &Game, tags: &[(&str, &str)]) -> String {
    let result = result_token(game);
    let has_tag = |name: &str| tags.iter().any(|(key, _)| *key == name);

    let mut out = String::new();
    for (key, value) in tags {
        push_tag(&mut out, key, value);
    }
    if !has_tag("Result") {
        push_tag(&mut out, "Result", result);
    }
    let start = game.start_position();
    if *start != Position::startpos() && !has_tag("FEN") {
        push_tag(&mut out, "SetUp", "1");
        push_tag(&mut out, "FEN", &start.to_fen());
    }
    out.push('\n');

    let mut tokens = movetext_tokens(game);
    tokens.push(result.to_string());
    out.push_str(&wrap(&tokens));
    out.push('\n');
    out
}

/// `1-0`, `0-1`, `1/2-1/2`, or `*` while the game is running.
pub fn result_token(game: &Game) -> &'static str {
    game.result().map_or("*", |r| r.to_pgn())
}

fn push_tag(out: &mut String, key: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{key} \"{escaped}\"]\n"));
}

fn movetext_tokens(game: &Game) -> Vec<String> {
    let start = game.start_position();
    let mut number = start.fullmove_number;
    let mut side = start.side_to_move;
    let mut tokens = Vec::with_capacity(game.ply_count() * 3 / 2 + 1);

    for (ply, gm) in game.move_history().iter().enumerate() {
        match side {
            Color::White => tokens.push(format!("{number}.")),
            Color::Black if ply == 0 => tokens.push(format!("{number}...")),
            Color::Black => {}
        }
        tokens.push(gm.san.clone());
        if side == Color::Black {
            number += 1;
        }
        side = side.opposite();
    }
    tokens
}

fn wrap(tokens: &[String]) -> String {
    let mut text = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            text.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            text.push(' ');
            line_len += 1;
        }
        text.push_str(token);
        line_len += token.len();
    }
    text
}
