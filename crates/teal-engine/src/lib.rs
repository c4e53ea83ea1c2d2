//! Chess rules engine over a mailbox board.
//!
//! This crate provides:
//! - [`Board`] - 64 cells of optional pieces with occupancy queries
//! - [`geometry`] - per-piece movement geometry (pseudo-legal destinations)
//! - [`Position`] - Full game state including piece positions, castling rights, etc.
//! - [`movegen`] - pseudo-legal and legal move generation, attack detection, perft
//! - [`Game`] - Complete game management with history tracking and status
//! - [`RuleSet`] - Trait for the position-level rules
//! - SAN notation parsing and generation, PGN export
//! - [`RulesConfig`] - draw thresholds loaded from TOML
//!
//! # Example
//!
//! ```
//! use teal_engine::{Game, GameStatus, Position, StandardChess};
//! use teal_engine::rules::RuleSet;
//!
//! // Using Position directly (stateless)
//! let position = StandardChess.initial_position();
//! let moves = StandardChess.generate_moves(&position);
//! assert_eq!(moves.len(), 20);
//!
//! // Using Game for full game management
//! let mut game = Game::new();
//! game.make_move_san("e4").unwrap();
//! game.make_move_uci("e7e5").unwrap();
//! assert_eq!(game.status(), GameStatus::Ongoing);
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod board;
pub mod config;
mod error;
mod game;
pub mod geometry;
pub mod movegen;
pub mod pgn;
mod position;
pub mod rules;
pub mod san;

pub use board::Board;
pub use config::{ConfigError, RulesConfig};
pub use error::{GameError, InvariantViolation};
pub use game::{Game, GameMove};
pub use movegen::{
    attacked_squares, is_attacked, is_in_check, legal_moves, make_move, pseudo_legal_moves,
    MoveList,
};
pub use position::{CastleSide, CastlingRights, Position, PositionSignature};
pub use rules::{GameResult, GameStatus, RuleSet, StandardChess};
pub use san::{move_to_san, san_to_move, SanError};
