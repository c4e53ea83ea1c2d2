//! Chess position representation.

use teal_core::{Color, FenError, FenRecord, File, MoveKind, Piece, PieceKind, Rank, Square};

use crate::Board;

/// The two castling directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// The move kind tag of a castling move toward this side.
    #[inline]
    pub const fn move_kind(self) -> MoveKind {
        match self {
            CastleSide::KingSide => MoveKind::CastleKingSide,
            CastleSide::QueenSide => MoveKind::CastleQueenSide,
        }
    }

    /// Maps a castling move kind back to its side.
    #[inline]
    pub const fn from_move_kind(kind: MoveKind) -> Option<Self> {
        match kind {
            MoveKind::CastleKingSide => Some(CastleSide::KingSide),
            MoveKind::CastleQueenSide => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    /// Where the king starts.
    #[inline]
    pub const fn king_origin(color: Color) -> Square {
        Square::new(File::E, color.back_rank())
    }

    /// Where the king lands.
    #[inline]
    pub const fn king_target(self, color: Color) -> Square {
        match self {
            CastleSide::KingSide => Square::new(File::G, color.back_rank()),
            CastleSide::QueenSide => Square::new(File::C, color.back_rank()),
        }
    }

    /// Where the rook starts.
    #[inline]
    pub const fn rook_origin(self, color: Color) -> Square {
        match self {
            CastleSide::KingSide => Square::new(File::H, color.back_rank()),
            CastleSide::QueenSide => Square::new(File::A, color.back_rank()),
        }
    }

    /// Where the rook lands.
    #[inline]
    pub const fn rook_target(self, color: Color) -> Square {
        match self {
            CastleSide::KingSide => Square::new(File::F, color.back_rank()),
            CastleSide::QueenSide => Square::new(File::D, color.back_rank()),
        }
    }

    /// Squares between king and rook; all must be empty.
    pub fn between(self, color: Color) -> Vec<Square> {
        let files: &[File] = match self {
            CastleSide::KingSide => &[File::F, File::G],
            CastleSide::QueenSide => &[File::B, File::C, File::D],
        };
        files
            .iter()
            .map(|&file| Square::new(file, color.back_rank()))
            .collect()
    }

    /// Squares the king crosses or lands on; none may be attacked.
    pub fn king_path(self, color: Color) -> [Square; 2] {
        let rank = color.back_rank();
        match self {
            CastleSide::KingSide => [Square::new(File::F, rank), Square::new(File::G, rank)],
            CastleSide::QueenSide => [Square::new(File::D, rank), Square::new(File::C, rank)],
        }
    }
}

/// Castling availability: four independent flags.
///
/// Rights are only ever revoked while a game is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    pub const ALL: CastlingRights = CastlingRights {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    /// Returns true if `color` may still castle toward `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => self.white_king_side,
            (Color::White, CastleSide::QueenSide) => self.white_queen_side,
            (Color::Black, CastleSide::KingSide) => self.black_king_side,
            (Color::Black, CastleSide::QueenSide) => self.black_queen_side,
        }
    }

    /// Removes one right.
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        let flag = match (color, side) {
            (Color::White, CastleSide::KingSide) => &mut self.white_king_side,
            (Color::White, CastleSide::QueenSide) => &mut self.white_queen_side,
            (Color::Black, CastleSide::KingSide) => &mut self.black_king_side,
            (Color::Black, CastleSide::QueenSide) => &mut self.black_queen_side,
        };
        *flag = false;
    }

    /// Removes both rights of `color`.
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::KingSide);
        self.revoke(color, CastleSide::QueenSide);
    }

    /// Revokes the right tied to a rook starting on `sq`, if any.
    ///
    /// Called for both the origin and the destination of every move, which
    /// covers a rook moving away and a rook being captured at home.
    pub fn revoke_for_rook_square(&mut self, sq: Square) {
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if side.rook_origin(color) == sq {
                    self.revoke(color, side);
                }
            }
        }
    }

    /// Returns true when no side may castle.
    pub const fn is_empty(self) -> bool {
        !(self.white_king_side
            || self.white_queen_side
            || self.black_king_side
            || self.black_queen_side)
    }

    /// Returns true if every right in `self` is also held by `other`.
    pub const fn is_subset_of(self, other: CastlingRights) -> bool {
        (!self.white_king_side || other.white_king_side)
            && (!self.white_queen_side || other.white_queen_side)
            && (!self.black_king_side || other.black_king_side)
            && (!self.black_queen_side || other.black_queen_side)
    }

    /// Builds rights from an already validated FEN castling field.
    pub fn from_fen_field(field: &str) -> Self {
        CastlingRights {
            white_king_side: field.contains('K'),
            white_queen_side: field.contains('Q'),
            black_king_side: field.contains('k'),
            black_queen_side: field.contains('q'),
        }
    }

    /// Renders the FEN castling field (`KQkq` subset or `-`).
    pub fn to_fen_field(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        [
            (self.white_king_side, 'K'),
            (self.white_queen_side, 'Q'),
            (self.black_king_side, 'k'),
            (self.black_queen_side, 'q'),
        ]
        .into_iter()
        .filter(|(held, _)| *held)
        .map(|(_, c)| c)
        .collect()
    }
}

/// The part of a position that decides repetition: placement, side to
/// move, castling rights and en passant target. Move counters excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionSignature {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece placement.
    pub board: Board,

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Position {
            board: Board::startpos(),
            castling: CastlingRights::ALL,
            ..Position::empty()
        }
    }

    /// Creates a position from a FEN string.
    ///
    /// On top of the structural checks this rejects positions without
    /// exactly one king per color and en passant targets that could not
    /// follow a double pawn push.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let record = FenRecord::parse(fen)?;
        let position = Position {
            board: Board::from_cells(record.placement),
            side_to_move: record.active_color,
            castling: CastlingRights::from_fen_field(&record.castling),
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        };

        for color in Color::ALL {
            let count = position.board.count(color, PieceKind::King);
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        if let Some(target) = position.en_passant {
            if !position.en_passant_is_consistent(target) {
                return Err(FenError::InconsistentEnPassant(target.to_algebraic()));
            }
        }

        Ok(position)
    }

    /// Checks that `target` sits behind a pawn that just double-stepped.
    fn en_passant_is_consistent(&self, target: Square) -> bool {
        let pusher = self.side_to_move.opposite();
        let expected_rank = match pusher {
            Color::White => Rank::R3,
            Color::Black => Rank::R6,
        };
        if target.rank() != expected_rank || !self.board.is_empty(target) {
            return false;
        }
        let forward = pusher.pawn_direction();
        let pawn_square = target.offset(0, forward);
        let origin = target.offset(0, -forward);
        match (pawn_square, origin) {
            (Some(pawn_square), Some(origin)) => {
                self.board.piece_at(pawn_square) == Some(Piece::new(pusher, PieceKind::Pawn))
                    && self.board.is_empty(origin)
            }
            _ => false,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        FenRecord {
            placement: *self.board.cells(),
            active_color: self.side_to_move,
            castling: self.castling.to_fen_field(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Returns the repetition signature of this position.
    pub fn signature(&self) -> PositionSignature {
        PositionSignature {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
