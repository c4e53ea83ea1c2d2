//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! This module checks the structure of a FEN record: field count, rank
//! shape, legal characters and field syntax. Checks that need the whole
//! position (king count, en passant consistency) belong to the engine,
//! which reports them with the same [`FenError`] type.

use crate::{Color, Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    WrongFieldCount(usize),

    #[error("invalid piece placement: expected 8 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("invalid piece placement: rank {rank} describes {squares} squares, expected 8")]
    InvalidRankLength { rank: u8, squares: u32 },

    #[error("invalid piece placement: illegal character '{character}' in rank {rank}")]
    IllegalCharacter { character: char, rank: u8 },

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("en passant target {0} does not follow a double pawn push")]
    InconsistentEnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },
}

/// A structurally valid FEN record.
///
/// The engine turns this into its position representation and applies the
/// position-level checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Piece placement indexed by [`Square::index`].
    pub placement: [Option<Piece>; 64],
    /// Side to move.
    pub active_color: Color,
    /// Castling availability, `-` or a subsequence of `KQkq`.
    pub castling: String,
    /// En passant target square.
    pub en_passant: Option<Square>,
    /// Half-moves since the last pawn move or capture.
    pub halfmove_clock: u32,
    /// Starts at 1 and increments after Black's move.
    pub fullmove_number: u32,
}

impl FenRecord {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount(fields.len()));
        }

        let placement = Self::parse_placement(fields[0])?;

        let active_color = Color::from_fen_str(fields[1])
            .ok_or_else(|| FenError::InvalidActiveColor(fields[1].to_string()))?;

        let castling = fields[2];
        Self::validate_castling(castling)?;

        let en_passant = Self::parse_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(fields[5].to_string()))?;

        Ok(FenRecord {
            placement,
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], FenError> {
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount(ranks.len()));
        }

        let mut placement = [None; 64];
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut squares = 0u32;
            for c in rank_str.chars() {
                if let Some(run @ 1..=8) = c.to_digit(10) {
                    squares += run;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::from_coords(squares as u8, rank) {
                        placement[sq.index() as usize] = Some(piece);
                    }
                    squares += 1;
                } else {
                    return Err(FenError::IllegalCharacter {
                        character: c,
                        rank: rank + 1,
                    });
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidRankLength {
                    rank: rank + 1,
                    squares,
                });
            }
        }

        Ok(placement)
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        // Each flag at most once, in the canonical KQkq order.
        let mut expected = "KQkq".chars();
        for c in castling.chars() {
            if !expected.any(|e| e == c) {
                return Err(FenError::InvalidCastlingRights(castling.to_string()));
            }
        }
        if castling.is_empty() {
            return Err(FenError::InvalidCastlingRights(castling.to_string()));
        }

        Ok(())
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }

        match Square::from_algebraic(field) {
            Some(sq) if matches!(sq.rank().to_char(), '3' | '6') => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }

    /// Returns the piece placement field.
    pub fn placement_field(&self) -> String {
        let mut field = String::new();
        for rank in (0..8u8).rev() {
            let mut empty_run = 0;
            for file in 0..8u8 {
                let index = (rank * 8 + file) as usize;
                match self.placement[index] {
                    Some(piece) => {
                        if empty_run > 0 {
                            field.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        field.push(piece.to_fen_char());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                field.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                field.push('/');
            }
        }
        field
    }
}

impl fmt::Display for FenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let en_passant = match self.en_passant {
            Some(sq) => sq.to_algebraic(),
            None => "-".to_string(),
        };
        write!(
            f,
            "{} {} {} {} {} {}",
            self.placement_field(),
            self.active_color.to_fen_char(),
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for FenRecord {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn parse_startpos() {
        let fen = FenRecord::parse(FenRecord::STARTPOS).unwrap();
        assert_eq!(fen.active_color, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.placement[Square::E1.index() as usize],
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            fen.placement[Square::D8.index() as usize],
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(fen.placement.iter().filter(|p| p.is_some()).count(), 32);
    }

    #[test]
    fn roundtrip() {
        for original in [
            FenRecord::STARTPOS,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "8/8/8/8/8/8/8/8 w - - 0 1",
        ] {
            let parsed = FenRecord::parse(original).unwrap();
            assert_eq!(parsed.to_string(), original);
        }
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(
            FenRecord::parse("invalid"),
            Err(FenError::WrongFieldCount(1))
        );
        assert_eq!(
            FenRecord::parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::WrongFieldCount(5))
        );
    }

    #[test]
    fn invalid_active_color() {
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_rank_count() {
        assert_eq!(
            FenRecord::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(FenError::InvalidRankCount(7))
        );
    }

    #[test]
    fn illegal_character() {
        assert_eq!(
            FenRecord::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::IllegalCharacter {
                character: 'X',
                rank: 2
            })
        );
        // A zero run is not a legal empty-square count.
        assert!(matches!(
            FenRecord::parse("08/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::IllegalCharacter { character: '0', .. })
        ));
    }

    #[test]
    fn invalid_rank_length() {
        assert_eq!(
            FenRecord::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidRankLength {
                rank: 8,
                squares: 9
            })
        );
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/7 w - - 0 1"),
            Err(FenError::InvalidRankLength { rank: 1, squares: 7 })
        ));
    }

    #[test]
    fn castling_rights_syntax() {
        assert!(FenRecord::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").is_ok());
        assert!(FenRecord::parse("8/8/8/8/8/8/8/8 w Qk - 0 1").is_ok());
        for bad in ["XYZ", "KK", "qK", "-K"] {
            let fen = format!("8/8/8/8/8/8/8/8 w {} - 0 1", bad);
            assert!(
                matches!(
                    FenRecord::parse(&fen),
                    Err(FenError::InvalidCastlingRights(_))
                ),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn en_passant_syntax() {
        let fen = FenRecord::parse("8/8/8/8/8/8/8/8 b - d6 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("d6"));
        for bad in ["abc", "x3", "e4", "e"] {
            let fen = format!("8/8/8/8/8/8/8/8 w - {} 0 1", bad);
            assert!(matches!(
                FenRecord::parse(&fen),
                Err(FenError::InvalidEnPassantSquare(_))
            ));
        }
    }

    #[test]
    fn invalid_counters() {
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenRecord::parse("8/8/8/8/8/8/8/8 w - - 0 -3"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn error_display() {
        let err = FenError::WrongFieldCount(3);
        assert!(err.to_string().contains('3'));

        let err = FenError::KingCount {
            color: Color::Black,
            count: 0,
        };
        assert_eq!(err.to_string(), "expected exactly one Black king, found 0");

        let err = FenError::InconsistentEnPassant("e3".to_string());
        assert!(err.to_string().contains("e3"));
    }

    #[test]
    fn default_is_startpos() {
        assert_eq!(FenRecord::default().to_string(), FenRecord::STARTPOS);
    }
}
