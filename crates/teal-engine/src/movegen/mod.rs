//! Move generation.
//!
//! Pseudo-legal moves come from the piece catalogue in [`crate::geometry`],
//! tagged with their [`MoveKind`]. Legal moves are the pseudo-legal moves
//! that do not leave the mover's king attacked once made on a copy of the
//! position.

pub mod perft;

use crate::geometry::{self, first_blocker, pawn_attacks, Offset};
use crate::position::CastleSide;
use crate::{Board, Position};
use teal_core::{Color, Move, MoveKind, Piece, PieceKind, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if `m` is in the list.
    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates every pseudo-legal move for the side to move, castling and
/// all four promotion choices included.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move;
    let board = &position.board;

    for (from, piece) in board.pieces().filter(|(_, p)| p.color == us) {
        for to in geometry::destinations(board, from, piece, position.en_passant) {
            push_tagged(position, from, to, piece, &mut moves);
        }
    }

    generate_castling_moves(position, &mut moves);
    moves
}

/// Generates all legal moves for the given position.
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = pseudo_legal_moves(position);

    let us = position.side_to_move;
    moves.retain(|m| {
        let new_pos = make_move(position, *m);
        !is_in_check(&new_pos, us)
    });

    moves
}

/// Tags a catalogue destination with its move kind and pushes it.
fn push_tagged(position: &Position, from: Square, to: Square, piece: Piece, moves: &mut MoveList) {
    let capture = position.board.color_at(to) == Some(piece.color.opposite());

    if piece.kind != PieceKind::Pawn {
        let kind = if capture {
            MoveKind::Capture
        } else {
            MoveKind::Normal
        };
        moves.push(Move::new(from, to, kind));
        return;
    }

    if to.rank() == piece.color.promotion_rank() {
        for promotion in PieceKind::PROMOTIONS {
            moves.push(Move::promotion(from, to, promotion, capture));
        }
    } else if from.file() != to.file() && !capture {
        // Diagonal onto an empty square is only produced for the en passant target.
        moves.push(Move::new(from, to, MoveKind::EnPassantCapture));
    } else if to.rank().index().abs_diff(from.rank().index()) == 2 {
        moves.push(Move::new(from, to, MoveKind::DoublePawnPush));
    } else if capture {
        moves.push(Move::new(from, to, MoveKind::Capture));
    } else {
        moves.push(Move::normal(from, to));
    }
}

/// Generates castling moves if the rights, the board and the attack
/// situation allow them.
fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let board = &position.board;
    let king_from = CastleSide::king_origin(us);

    if board.piece_at(king_from) != Some(Piece::new(us, PieceKind::King)) {
        return;
    }
    // Can't castle out of check
    if is_attacked(board, king_from, them) {
        return;
    }

    for side in CastleSide::ALL {
        if !position.castling.has(us, side) {
            continue;
        }
        if board.piece_at(side.rook_origin(us)) != Some(Piece::new(us, PieceKind::Rook)) {
            continue;
        }
        if !side.between(us).iter().all(|&sq| board.is_empty(sq)) {
            continue;
        }
        if side.king_path(us).iter().any(|&sq| is_attacked(board, sq, them)) {
            continue;
        }
        moves.push(Move::new(king_from, side.king_target(us), side.move_kind()));
    }
}

/// Returns true if `sq` is attacked by any piece of color `by`.
///
/// Looks outward from `sq` for an attacker of each kind instead of
/// generating every enemy move. Pawns attack their forward diagonals
/// whether or not the target is occupied.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let is = |target: Square, kind: PieceKind| board.piece_at(target) == Some(Piece::new(by, kind));

    // A pawn of `by` attacks `sq` from the squares a defending pawn would attack.
    if pawn_attacks(sq, by.opposite()).any(|from| is(from, PieceKind::Pawn)) {
        return true;
    }

    let steps = |offsets: &[Offset], kind: PieceKind| {
        offsets
            .iter()
            .filter_map(|&(df, dr)| sq.offset(df, dr))
            .any(|from| is(from, kind))
    };
    if steps(&geometry::KNIGHT_OFFSETS, PieceKind::Knight)
        || steps(&geometry::KING_OFFSETS, PieceKind::King)
    {
        return true;
    }

    let slides = |directions: &[Offset], kind: PieceKind| {
        directions.iter().any(|&direction| {
            matches!(
                first_blocker(board, sq, direction),
                Some((_, piece)) if piece.color == by
                    && (piece.kind == kind || piece.kind == PieceKind::Queen)
            )
        })
    };
    slides(&geometry::ROOK_DIRECTIONS, PieceKind::Rook)
        || slides(&geometry::BISHOP_DIRECTIONS, PieceKind::Bishop)
}

/// Returns true if the king of the given color is attacked.
///
/// A board without that king is reported as not in check and logged; legal
/// play from a validated position never reaches one.
pub fn is_in_check(position: &Position, color: Color) -> bool {
    match position.board.king_square(color) {
        Ok(king) => is_attacked(&position.board, king, color.opposite()),
        Err(violation) => {
            tracing::error!(%violation, fen = %position.to_fen(), "check test on kingless board");
            false
        }
    }
}

/// Returns every square attacked by `by`, a1 to h8, without duplicates.
pub fn attacked_squares(board: &Board, by: Color) -> Vec<Square> {
    let mut attacked = [false; 64];
    for (from, piece) in board.pieces().filter(|(_, p)| p.color == by) {
        for sq in geometry::attacks(board, from, piece) {
            attacked[sq.index() as usize] = true;
        }
    }
    Square::all()
        .filter(|sq| attacked[sq.index() as usize])
        .collect()
}

/// Makes a move and returns the new position.
///
/// `m` must come from [`pseudo_legal_moves`] or [`legal_moves`] for
/// `position`; nothing is validated here.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut new_pos = position.clone();
    let us = position.side_to_move;
    let them = us.opposite();
    let from = m.from();
    let to = m.to();

    let Some(piece) = position.piece_at(from) else {
        debug_assert!(false, "no piece on {from} for {m:?}");
        return new_pos;
    };

    let mut is_capture = position.piece_at(to).is_some();
    let board = &mut new_pos.board;

    // The captured pawn sits behind the target square, not on it.
    if m.kind() == MoveKind::EnPassantCapture {
        if let Some(captured_sq) = to.offset(0, -us.pawn_direction()) {
            board.set(captured_sq, None);
        }
        is_capture = true;
    }

    let placed = match m.promotion_piece() {
        Some(kind) => Piece::new(us, kind),
        None => piece,
    };
    board.set(from, None);
    board.set(to, Some(placed));

    if let Some(side) = CastleSide::from_move_kind(m.kind()) {
        let rook = board.piece_at(side.rook_origin(us));
        board.set(side.rook_origin(us), None);
        board.set(side.rook_target(us), rook);
    }

    if piece.kind == PieceKind::King {
        new_pos.castling.revoke_all(us);
    }
    new_pos.castling.revoke_for_rook_square(from);
    new_pos.castling.revoke_for_rook_square(to);

    new_pos.en_passant = if m.kind() == MoveKind::DoublePawnPush {
        from.offset(0, us.pawn_direction())
    } else {
        None
    };

    if piece.kind == PieceKind::Pawn || is_capture {
        new_pos.halfmove_clock = 0;
    } else {
        new_pos.halfmove_clock = new_pos.halfmove_clock.saturating_add(1);
    }

    if us == Color::Black {
        new_pos.fullmove_number = new_pos.fullmove_number.saturating_add(1);
    }

    new_pos.side_to_move = them;

    new_pos
}
