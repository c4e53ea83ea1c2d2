//! Mailbox board: 64 cells, each holding an optional piece.
//!
//! The board only answers geometric and occupancy questions. Whether a
//! move is legal is decided by the move generator.

use std::fmt;

use teal_core::{Color, File, Piece, PieceKind, Rank, Square};

use crate::error::InvariantViolation;

/// An 8x8 grid of squares indexed by [`Square::index`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// Creates a board from a placement array indexed by square.
    pub const fn from_cells(cells: [Option<Piece>; 64]) -> Self {
        Board { cells }
    }

    /// Returns the piece standing on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index() as usize]
    }

    /// Places `piece` on `sq`, or clears the square when `None`.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index() as usize] = piece;
    }

    /// Returns true if no piece stands on `sq`.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Returns the color of the piece on `sq`, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|p| p.color)
    }

    /// Iterates over every occupied square and its piece, a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Returns the squares holding pieces of `color`, a1 to h8.
    pub fn squares_occupied_by(&self, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|(_, p)| p.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Returns the squares holding `color` pieces of the given kind.
    pub fn squares_of(&self, color: Color, kind: PieceKind) -> Vec<Square> {
        self.pieces()
            .filter(|(_, p)| p.color == color && p.kind == kind)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Counts `color` pieces of the given kind.
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces()
            .filter(|(_, p)| p.color == color && p.kind == kind)
            .count()
    }

    /// Returns the square of the `color` king.
    ///
    /// A reachable position always has exactly one king per color, so an
    /// error here means the engine itself is broken.
    pub fn king_square(&self, color: Color) -> Result<Square, InvariantViolation> {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
            .ok_or(InvariantViolation::MissingKing(color))
    }

    /// Returns the raw cell array, indexed by square.
    pub fn cells(&self) -> &[Option<Piece>; 64] {
        &self.cells
    }

    /// Builds the standard starting layout.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        let back_row = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in Color::ALL {
            for (file, kind) in File::ALL.into_iter().zip(back_row) {
                board.set(
                    Square::new(file, color.back_rank()),
                    Some(Piece::new(color, kind)),
                );
                board.set(
                    Square::new(file, color.pawn_rank()),
                    Some(Piece::new(color, PieceKind::Pawn)),
                );
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(")?;
        write!(f, "{}", self)?;
        write!(f, ")")
    }
}

/// Renders an ASCII diagram, rank 8 at the top, `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let c = match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => piece.to_fen_char(),
                    None => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")
    }
}
