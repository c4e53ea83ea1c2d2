//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and its
//! consumers:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveKind`] for move representation
//! - FEN parsing and serialization ([`FenRecord`])

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenRecord};
pub use mov::{Move, MoveKind};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
