//! Piece movement geometry.
//!
//! One function per piece kind maps an origin square and a board to the
//! squares the piece could reach, ignoring whether its own king would be
//! left in check. [`destinations`] dispatches with a single exhaustive
//! match over [`PieceKind`].

use teal_core::{Color, Piece, PieceKind, Square};

use crate::Board;

/// A (file, rank) displacement.
pub type Offset = (i8, i8);

pub const KNIGHT_OFFSETS: [Offset; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [Offset; 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ROOK_DIRECTIONS: [Offset; 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const BISHOP_DIRECTIONS: [Offset; 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

pub const QUEEN_DIRECTIONS: [Offset; 8] = KING_OFFSETS;

/// Returns the pseudo-legal destinations of `piece` standing on `origin`.
///
/// `en_passant` is the current en passant target; only pawns use it.
pub fn destinations(
    board: &Board,
    origin: Square,
    piece: Piece,
    en_passant: Option<Square>,
) -> Vec<Square> {
    match piece.kind {
        PieceKind::Pawn => pawn_destinations(board, origin, piece.color, en_passant),
        PieceKind::Knight => step_destinations(board, origin, piece.color, &KNIGHT_OFFSETS),
        PieceKind::Bishop => slide_destinations(board, origin, piece.color, &BISHOP_DIRECTIONS),
        PieceKind::Rook => slide_destinations(board, origin, piece.color, &ROOK_DIRECTIONS),
        PieceKind::Queen => slide_destinations(board, origin, piece.color, &QUEEN_DIRECTIONS),
        PieceKind::King => step_destinations(board, origin, piece.color, &KING_OFFSETS),
    }
}

/// Returns every square `piece` on `origin` attacks, including squares
/// held by its own side. Pawns attack their forward diagonals only.
pub fn attacks(board: &Board, origin: Square, piece: Piece) -> Vec<Square> {
    let directions: &[Offset] = match piece.kind {
        PieceKind::Pawn => return pawn_attacks(origin, piece.color).collect(),
        PieceKind::Knight => return offsets_from(origin, &KNIGHT_OFFSETS).collect(),
        PieceKind::King => return offsets_from(origin, &KING_OFFSETS).collect(),
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
    };

    let mut squares = Vec::new();
    for &direction in directions {
        for sq in ray(origin, direction) {
            squares.push(sq);
            if !board.is_empty(sq) {
                break;
            }
        }
    }
    squares
}

/// Squares a pawn of `color` on `origin` attacks diagonally.
pub fn pawn_attacks(origin: Square, color: Color) -> impl Iterator<Item = Square> {
    let forward = color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(move |side| origin.offset(side, forward))
}

/// Squares along `direction` from `origin`, nearest first, to the board edge.
pub fn ray(origin: Square, direction: Offset) -> impl Iterator<Item = Square> {
    let (df, dr) = direction;
    std::iter::successors(origin.offset(df, dr), move |sq| sq.offset(df, dr))
}

/// The first occupied square along `direction`, with its piece.
pub fn first_blocker(board: &Board, origin: Square, direction: Offset) -> Option<(Square, Piece)> {
    ray(origin, direction).find_map(|sq| board.piece_at(sq).map(|p| (sq, p)))
}

fn offsets_from(origin: Square, offsets: &[Offset]) -> impl Iterator<Item = Square> + '_ {
    offsets.iter().filter_map(move |&(df, dr)| origin.offset(df, dr))
}

fn step_destinations(board: &Board, origin: Square, color: Color, offsets: &[Offset]) -> Vec<Square> {
    offsets_from(origin, offsets)
        .filter(|&sq| board.color_at(sq) != Some(color))
        .collect()
}

fn slide_destinations(
    board: &Board,
    origin: Square,
    color: Color,
    directions: &[Offset],
) -> Vec<Square> {
    let mut squares = Vec::new();
    for &direction in directions {
        for sq in ray(origin, direction) {
            match board.color_at(sq) {
                None => squares.push(sq),
                Some(c) => {
                    if c != color {
                        squares.push(sq);
                    }
                    break;
                }
            }
        }
    }
    squares
}

fn pawn_destinations(
    board: &Board,
    origin: Square,
    color: Color,
    en_passant: Option<Square>,
) -> Vec<Square> {
    let mut squares = Vec::new();
    let forward = color.pawn_direction();

    if let Some(single) = origin.offset(0, forward) {
        if board.is_empty(single) {
            squares.push(single);
            if origin.rank() == color.pawn_rank() {
                if let Some(double) = single.offset(0, forward) {
                    if board.is_empty(double) {
                        squares.push(double);
                    }
                }
            }
        }
    }

    for target in pawn_attacks(origin, color) {
        let enemy_there = board.color_at(target) == Some(color.opposite());
        if enemy_there || en_passant == Some(target) {
            squares.push(target);
        }
    }

    squares
}
