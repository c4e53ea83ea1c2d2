//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// What a move does besides relocating the moving piece.
///
/// A promotion that does not capture is tagged [`MoveKind::Normal`] and
/// carries its promotion piece on the [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Quiet move (including a non-capturing promotion).
    Normal,
    /// Capture of the piece on the destination square.
    Capture,
    /// Pawn advance of two squares from its starting rank.
    DoublePawnPush,
    /// Pawn capture onto the en passant target square.
    EnPassantCapture,
    /// King moves two squares toward the h-file rook (O-O).
    CastleKingSide,
    /// King moves two squares toward the a-file rook (O-O-O).
    CastleQueenSide,
    /// Pawn capture onto the last rank.
    PromotionCapture,
}

impl MoveKind {
    /// Returns true if the move removes an enemy piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(
            self,
            MoveKind::Capture | MoveKind::EnPassantCapture | MoveKind::PromotionCapture
        )
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveKind::CastleKingSide | MoveKind::CastleQueenSide)
    }
}

/// A chess move as produced by the move generator.
///
/// Castling is represented by the king's two-square move; the rook
/// relocation happens when the move is made.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a move with no promotion.
    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    /// Creates a quiet move.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Normal)
    }

    /// Creates a promotion; `capture` selects the capturing variant.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind, capture: bool) -> Self {
        Move {
            from,
            to,
            kind: if capture {
                MoveKind::PromotionCapture
            } else {
                MoveKind::Normal
            },
            promotion: Some(piece),
        }
    }

    /// Returns the origin square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the move kind tag.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// Returns the piece a pawn promotes to, if any.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind.is_capture()
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses coordinate notation into (from, to, promotion).
    ///
    /// The move kind cannot be known without a position, so callers resolve
    /// the returned triple against the legal move list.
    pub fn parse_uci(s: &str) -> Option<(Square, Square, Option<PieceKind>)> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            Some(c) => {
                let piece = PieceKind::from_char(c)?;
                if !piece.is_promotion_target() {
                    return None;
                }
                Some(piece)
            }
            None => None,
        };
        Some((from, to, promotion))
    }

    /// Placeholder move; never legal.
    pub const NULL: Move = Move::normal(Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self.to_uci(), self.kind)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_accessors() {
        let m = Move::new(sq("e2"), sq("e4"), MoveKind::DoublePawnPush);
        assert_eq!(m.from(), Square::new(File::E, Rank::R2));
        assert_eq!(m.to(), Square::new(File::E, Rank::R4));
        assert_eq!(m.kind(), MoveKind::DoublePawnPush);
        assert!(!m.is_promotion());
        assert!(!m.is_capture());
    }

    #[test]
    fn move_uci() {
        assert_eq!(Move::normal(sq("g1"), sq("f3")).to_uci(), "g1f3");
        let promo = Move::promotion(sq("e7"), sq("e8"), PieceKind::Queen, false);
        assert_eq!(promo.to_uci(), "e7e8q");
        assert_eq!(promo.kind(), MoveKind::Normal);
        let promo_capture = Move::promotion(sq("e7"), sq("d8"), PieceKind::Knight, true);
        assert_eq!(promo_capture.to_uci(), "e7d8n");
        assert_eq!(promo_capture.kind(), MoveKind::PromotionCapture);
        assert!(promo_capture.is_capture());
    }

    #[test]
    fn parse_uci() {
        assert_eq!(Move::parse_uci("e2e4"), Some((sq("e2"), sq("e4"), None)));
        assert_eq!(
            Move::parse_uci("a7a8N"),
            Some((sq("a7"), sq("a8"), Some(PieceKind::Knight)))
        );
        assert_eq!(Move::parse_uci("e7e8k"), None);
        assert_eq!(Move::parse_uci("e7e8p"), None);
        assert_eq!(Move::parse_uci("e2e9"), None);
        assert_eq!(Move::parse_uci("e2"), None);
        assert_eq!(Move::parse_uci("e2e4qq"), None);
        assert_eq!(Move::parse_uci("é2e4"), None);
    }

    #[test]
    fn kind_classification() {
        assert!(MoveKind::EnPassantCapture.is_capture());
        assert!(MoveKind::PromotionCapture.is_capture());
        assert!(!MoveKind::DoublePawnPush.is_capture());
        assert!(MoveKind::CastleQueenSide.is_castling());
        assert!(!MoveKind::Normal.is_castling());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::normal(sq("e2"), sq("e3"));
        assert_eq!(format!("{:?}", m), "Move(e2e3, Normal)");
        assert_eq!(format!("{}", m), "e2e3");
    }
}
