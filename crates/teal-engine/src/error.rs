//! Engine error types.

use teal_core::{Color, FenError};
use thiserror::Error;

use crate::rules::GameStatus;
use crate::san::SanError;

/// A position broke an invariant the engine relies on.
///
/// Positions built through [`crate::Position::from_fen`] and advanced by
/// legal moves never produce these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("no {0} king on the board")]
    MissingKing(Color),
}

/// Errors returned when driving a [`crate::Game`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("game is over: {0}")]
    GameOver(GameStatus),

    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),

    #[error("invalid UCI move: {0}")]
    InvalidUci(String),

    #[error(transparent)]
    Notation(#[from] FenError),
}
