//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::movegen::{is_in_check, legal_moves, make_move};
use crate::position::CastleSide;
use crate::Position;
use teal_core::{File, Move, PieceKind, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state BEFORE the move is made, and the move
/// must be legal in it. A move with no piece on its origin square falls
/// back to coordinate notation.
pub fn move_to_san(position: &Position, m: Move) -> String {
    if let Some(side) = CastleSide::from_move_kind(m.kind()) {
        let san = match side {
            CastleSide::KingSide => "O-O",
            CastleSide::QueenSide => "O-O-O",
        };
        return add_check_suffix(position, m, san.to_string());
    }

    let from = m.from();
    let to = m.to();
    let Some(piece) = position.piece_at(from) else {
        return m.to_uci();
    };

    let mut san = String::new();

    if piece.kind != PieceKind::Pawn {
        san.push(piece.kind.to_san_char());
        san.push_str(&get_disambiguation(position, m, piece.kind));
    }

    if m.is_capture() {
        if piece.kind == PieceKind::Pawn {
            // Pawn captures include the source file
            san.push(from.file().to_char());
        }
        san.push('x');
    }

    san.push_str(&to.to_algebraic());

    if let Some(promotion) = m.promotion_piece() {
        san.push('=');
        san.push(promotion.to_san_char());
    }

    add_check_suffix(position, m, san)
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// Check and mate markers and trailing annotation glyphs (`!`, `?`) are
/// ignored. Castling accepts both letter O and digit zero.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    let san = san.trim_end_matches(['+', '#', '!', '?']);

    match san {
        "O-O" | "0-0" => return find_castling_move(position, CastleSide::KingSide, san),
        "O-O-O" | "0-0-0" => return find_castling_move(position, CastleSide::QueenSide, san),
        _ => {}
    }

    let parsed = parse_san_components(san)?;
    find_matching_move(position, &parsed, san)
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    piece: PieceKind,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<PieceKind>,
    is_capture: bool,
}

fn san_char_to_piece(c: char) -> Option<PieceKind> {
    if c.is_ascii_uppercase() {
        PieceKind::from_char(c)
    } else {
        None
    }
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    if !san.is_ascii() {
        return Err(SanError::InvalidFormat(san.to_string()));
    }

    let (piece, rest) = match san.chars().next() {
        Some(c) if c.is_ascii_uppercase() => {
            let piece = san_char_to_piece(c).ok_or_else(|| {
                SanError::InvalidFormat(format!("invalid piece character: {c}"))
            })?;
            (piece, &san[1..])
        }
        Some(_) => (PieceKind::Pawn, san),
        None => return Err(SanError::Empty),
    };

    let (body, promotion) = match rest.split_once('=') {
        Some((body, promo)) => {
            let mut chars = promo.chars();
            let piece = match (chars.next(), chars.next()) {
                (Some(c), None) => san_char_to_piece(c).filter(|p| p.is_promotion_target()),
                _ => None,
            }
            .ok_or_else(|| SanError::InvalidFormat(format!("invalid promotion: {san}")))?;
            (body, Some(piece))
        }
        None => (rest, None),
    };

    let is_capture = body.contains('x');
    let body: Vec<char> = body.chars().filter(|&c| c != 'x').collect();

    if body.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {san}")));
    }

    let (disambig, dest) = body.split_at(body.len() - 2);
    let to_file = File::from_char(dest[0])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid file: {san}")))?;
    let to_rank = Rank::from_char(dest[1])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid rank: {san}")))?;
    let (from_file, from_rank) = parse_disambiguation(disambig, san)?;

    // Pawn captures always name the origin file.
    if piece == PieceKind::Pawn && is_capture && from_file.is_none() {
        return Err(SanError::InvalidFormat(format!(
            "pawn capture without origin file: {san}"
        )));
    }

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to_square: Square::new(to_file, to_rank),
        promotion,
        is_capture,
    })
}

fn parse_disambiguation(chars: &[char], san: &str) -> Result<(Option<File>, Option<Rank>), SanError> {
    let invalid = || SanError::InvalidFormat(format!("invalid disambiguation: {san}"));

    match *chars {
        [] => Ok((None, None)),
        [c] => {
            if let Some(f) = File::from_char(c) {
                Ok((Some(f), None))
            } else if let Some(r) = Rank::from_char(c) {
                Ok((None, Some(r)))
            } else {
                Err(invalid())
            }
        }
        [f, r] => {
            let file = File::from_char(f).ok_or_else(invalid)?;
            let rank = Rank::from_char(r).ok_or_else(invalid)?;
            Ok((Some(file), Some(rank)))
        }
        _ => Err(invalid()),
    }
}

fn find_castling_move(position: &Position, side: CastleSide, san: &str) -> Result<Move, SanError> {
    legal_moves(position)
        .iter()
        .find(|m| m.kind() == side.move_kind())
        .copied()
        .ok_or_else(|| SanError::NoMatchingMove(san.to_string()))
}

fn find_matching_move(position: &Position, parsed: &ParsedSan, san: &str) -> Result<Move, SanError> {
    let moves = legal_moves(position);
    let matching: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|m| {
            m.to() == parsed.to_square
                && !m.kind().is_castling()
                && position.piece_at(m.from()).map(|p| p.kind) == Some(parsed.piece)
                && parsed.from_file.map_or(true, |f| m.from().file() == f)
                && parsed.from_rank.map_or(true, |r| m.from().rank() == r)
                && m.promotion_piece() == parsed.promotion
                && capture_marker_matches(parsed, *m)
        })
        .collect();

    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(san.to_string())),
        [m] => Ok(*m),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// A capture marker needs a capture. Pawns must also mark every capture,
/// since `d5` and `exd5` are different moves.
fn capture_marker_matches(parsed: &ParsedSan, m: Move) -> bool {
    if parsed.piece == PieceKind::Pawn {
        parsed.is_capture == m.is_capture()
    } else {
        !parsed.is_capture || m.is_capture()
    }
}

/// Origin file, rank, or both, as needed to tell `m` apart from other
/// legal moves of the same piece kind to the same square.
fn get_disambiguation(position: &Position, m: Move, piece: PieceKind) -> String {
    let to = m.to();
    let from = m.from();

    let rivals: Vec<Square> = legal_moves(position)
        .iter()
        .filter(|other| {
            other.to() == to
                && other.from() != from
                && position.piece_at(other.from()).map(|p| p.kind) == Some(piece)
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|sq| sq.file() != from.file()) {
        return from.file().to_char().to_string();
    }
    if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        return from.rank().to_char().to_string();
    }
    from.to_algebraic()
}

fn add_check_suffix(position: &Position, m: Move, mut san: String) -> String {
    let new_pos = make_move(position, m);
    if is_in_check(&new_pos, new_pos.side_to_move) {
        if legal_moves(&new_pos).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}
