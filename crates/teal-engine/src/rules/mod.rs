//! Rule set abstraction and game status.
//!
//! The engine delegates rule decisions that depend on a single position
//! (move generation, check, mate, dead material) to a [`RuleSet`]. Rules
//! that need the game's history, repetition and the fifty-move rule, are
//! evaluated by [`Game`](crate::Game).

mod standard;

pub use standard::StandardChess;

use std::fmt;

use crate::{MoveList, Position};
use teal_core::{Color, Move};

/// Where a game stands after the last applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// No special condition; the default state.
    Ongoing,
    /// The side to move is in check and has legal moves.
    Check,
    /// The side to move is in check with no legal moves.
    Checkmate,
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// The half-move clock reached the fifty-move limit.
    DrawByFiftyMoves,
    /// The current position signature occurred often enough.
    DrawByRepetition,
    /// Neither side can force mate with the material left.
    DrawByInsufficientMaterial,
}

impl GameStatus {
    /// Returns true if no further moves may be applied.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }

    #[inline]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawByFiftyMoves
                | GameStatus::DrawByRepetition
                | GameStatus::DrawByInsufficientMaterial
        )
    }

    /// The outcome this status implies, given who is to move.
    pub const fn result(self, side_to_move: Color) -> Option<GameResult> {
        match self {
            GameStatus::Ongoing | GameStatus::Check => None,
            GameStatus::Checkmate => Some(match side_to_move {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }),
            _ => Some(GameResult::Draw),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::DrawByFiftyMoves => "draw by the fifty-move rule",
            GameStatus::DrawByRepetition => "draw by repetition",
            GameStatus::DrawByInsufficientMaterial => "draw by insufficient material",
        };
        f.write_str(s)
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    /// The PGN result token.
    pub const fn to_pgn(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

/// Trait for the rules the engine plays by.
///
/// # Example
///
/// ```
/// use teal_engine::rules::{GameStatus, RuleSet};
/// use teal_engine::StandardChess;
///
/// let position = StandardChess.initial_position();
/// assert_eq!(StandardChess.generate_moves(&position).len(), 20);
/// assert_eq!(StandardChess.position_status(&position), GameStatus::Ongoing);
/// ```
pub trait RuleSet {
    /// Returns the initial position.
    fn initial_position(&self) -> Position;

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> MoveList;

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).contains(&m)
    }

    /// Makes a move on the position, returning the new position.
    ///
    /// The move is trusted; use [`try_make_move`](RuleSet::try_make_move)
    /// for moves from outside the generator.
    fn make_move(&self, position: &Position, m: Move) -> Position;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        if self.is_legal(position, m) {
            Some(self.make_move(position, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns true if neither side has sufficient material to checkmate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    /// Status decidable from the position alone, ignoring history.
    ///
    /// Never returns [`GameStatus::DrawByRepetition`]. Returns
    /// [`GameStatus::DrawByFiftyMoves`] only when `fifty_move_limit` is
    /// given and reached.
    fn position_status_with(&self, position: &Position, fifty_move_limit: Option<u32>) -> GameStatus {
        let in_check = self.is_check(position);
        if self.generate_moves(position).is_empty() {
            return if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.is_insufficient_material(position) {
            return GameStatus::DrawByInsufficientMaterial;
        }
        if fifty_move_limit.is_some_and(|limit| position.halfmove_clock >= limit) {
            return GameStatus::DrawByFiftyMoves;
        }
        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    /// [`position_status_with`](RuleSet::position_status_with) without the
    /// fifty-move rule.
    fn position_status(&self, position: &Position) -> GameStatus {
        self.position_status_with(position, None)
    }
}
