//! Standard chess rules implementation.

use super::RuleSet;
use crate::movegen::{is_in_check, legal_moves, make_move};
use crate::{MoveList, Position};
use teal_core::{Move, PieceKind};

/// Standard chess rules (FIDE).
///
/// - Standard piece movement
/// - Castling (kingside and queenside)
/// - En passant
/// - Pawn promotion
/// - Check, checkmate, and stalemate detection
/// - Dead positions by insufficient material
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        legal_moves(position)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        make_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_in_check(position, position.side_to_move)
    }

    /// Only kings and minor pieces remain, and either one minor at most is
    /// left or every minor is a bishop on the same square color.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        let mut minors = Vec::new();
        for (sq, piece) in position.board.pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight | PieceKind::Bishop => minors.push((sq, piece.kind)),
            }
        }

        match minors.first() {
            None => true,
            Some(_) if minors.len() == 1 => true,
            Some(&(first, _)) => minors
                .iter()
                .all(|&(sq, kind)| kind == PieceKind::Bishop && sq.is_light() == first.is_light()),
        }
    }
}
