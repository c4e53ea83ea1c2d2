//! Full game management with history tracking.
//!
//! The [`Game`] struct owns the current [`Position`] and everything that
//! depends on how it was reached:
//! - Position signatures for repetition detection
//! - Move history with SAN notation and captured pieces
//! - The [`GameStatus`] state machine, recomputed after every move

use crate::config::{ConfigError, RulesConfig};
use crate::error::GameError;
use crate::movegen::{attacked_squares, make_move};
use crate::pgn;
use crate::position::PositionSignature;
use crate::rules::{GameResult, GameStatus, RuleSet, StandardChess};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{Board, MoveList, Position};
use teal_core::{Color, FenError, Move, MoveKind, Piece, PieceKind, Square};

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move in internal format.
    pub mv: Move,
    /// SAN notation for the move, check markers included.
    pub san: String,
    /// The piece this move removed from the board, if any.
    pub captured: Option<Piece>,
}

/// A complete chess game with history tracking.
///
/// Unlike [`Position`], which represents a single board state, `Game` tracks
/// the history needed for repetition detection and decides the game status.
/// [`Game::apply`] is the only way the position changes; every failed call
/// leaves the game exactly as it was.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current position.
    position: Position,
    /// Signatures of every position reached, the starting one included.
    history: Vec<PositionSignature>,
    /// Move history with SAN notation.
    moves: Vec<GameMove>,
    /// Starting position.
    start_pos: Position,
    /// Status after the last move.
    status: GameStatus,
    config: RulesConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(StandardChess.initial_position())
    }

    /// Creates a game from a custom starting position.
    ///
    /// The status is evaluated immediately, so a position that is already
    /// mate or a dead draw yields a finished game.
    pub fn from_position(position: Position) -> Self {
        let mut game = Game {
            history: vec![position.signature()],
            position: position.clone(),
            moves: Vec::new(),
            start_pos: position,
            status: GameStatus::Ongoing,
            config: RulesConfig::default(),
        };
        game.status = game.evaluate_status();
        game
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let position = Position::from_fen(fen)?;
        Ok(Self::from_position(position))
    }

    /// Replaces the rule thresholds and re-evaluates the status.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails
    /// [`RulesConfig::validate`]; the game is dropped in that case.
    pub fn with_config(mut self, config: RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        self.status = self.evaluate_status();
        Ok(self)
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.position.board
    }

    /// Returns the starting position.
    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Returns the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.status.result(self.position.side_to_move)
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        StandardChess.is_check(&self.position)
    }

    /// Returns all legal moves in the current position; none once the
    /// game is over.
    pub fn legal_moves(&self) -> MoveList {
        if self.is_game_over() {
            return MoveList::new();
        }
        StandardChess.generate_moves(&self.position)
    }

    /// Squares the piece on `from` may legally move to, a1 to h8.
    ///
    /// A promotion target is listed once even though it stands for four moves.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let mut squares: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|m| m.from() == from)
            .map(|m| m.to())
            .collect();
        squares.sort_by_key(|sq| sq.index());
        squares.dedup();
        squares
    }

    /// All legal moves from `from` to `to`. More than one only for promotions.
    pub fn find_moves(&self, from: Square, to: Square) -> Vec<Move> {
        self.legal_moves()
            .iter()
            .copied()
            .filter(|m| m.from() == from && m.to() == to)
            .collect()
    }

    /// Squares attacked by the side not to move.
    pub fn opponent_attacks(&self) -> Vec<Square> {
        attacked_squares(&self.position.board, self.position.side_to_move.opposite())
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the signatures of every position reached so far.
    pub fn signature_history(&self) -> &[PositionSignature] {
        &self.history
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns the current full move number.
    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number
    }

    /// Pieces of `color` captured so far, in the order they fell.
    pub fn captured_pieces(&self, color: Color) -> Vec<Piece> {
        self.moves
            .iter()
            .filter_map(|gm| gm.captured)
            .filter(|piece| piece.color == color)
            .collect()
    }

    /// Applies a move and returns the new status.
    ///
    /// # Errors
    ///
    /// [`GameError::GameOver`] once the game has ended and
    /// [`GameError::IllegalMove`] for anything not in [`Game::legal_moves`].
    /// The game is unchanged in both cases.
    pub fn apply(&mut self, m: Move) -> Result<GameStatus, GameError> {
        self.ensure_not_over()?;

        if !self.legal_moves().contains(&m) {
            tracing::warn!(mv = %m.to_uci(), fen = %self.position.to_fen(), "rejected illegal move");
            return Err(GameError::IllegalMove(m.to_uci()));
        }

        Ok(self.apply_move(m))
    }

    /// Makes a move given in SAN notation.
    pub fn make_move_san(&mut self, san: &str) -> Result<GameStatus, GameError> {
        self.ensure_not_over()?;

        let m = san_to_move(&self.position, san).map_err(|e| {
            tracing::warn!(san, error = %e, "rejected SAN move");
            e
        })?;
        Ok(self.apply_move(m))
    }

    /// Makes a move given in coordinate notation, e.g. `e2e4` or `e7e8q`.
    ///
    /// The coordinates are resolved against the legal moves, so castling is
    /// entered as the king's two-square move.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<GameStatus, GameError> {
        self.ensure_not_over()?;

        let (from, to, promotion) =
            Move::parse_uci(uci).ok_or_else(|| GameError::InvalidUci(uci.to_string()))?;

        let matching = self
            .legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion_piece() == promotion);

        match matching {
            Some(legal_move) => Ok(self.apply_move(legal_move)),
            None => {
                tracing::warn!(uci, fen = %self.position.to_fen(), "rejected illegal move");
                Err(GameError::IllegalMove(uci.to_string()))
            }
        }
    }

    fn ensure_not_over(&self) -> Result<(), GameError> {
        if self.is_game_over() {
            tracing::warn!(status = %self.status, "move submitted after game end");
            return Err(GameError::GameOver(self.status));
        }
        Ok(())
    }

    /// Applies a move already known to be legal.
    fn apply_move(&mut self, m: Move) -> GameStatus {
        let san = move_to_san(&self.position, m);
        let captured = self.captured_by(m);

        self.position = make_move(&self.position, m);
        self.history.push(self.position.signature());
        self.moves.push(GameMove {
            mv: m,
            san,
            captured,
        });

        self.status = self.evaluate_status();

        if let Some(last) = self.moves.last() {
            tracing::debug!(
                mv = %m.to_uci(),
                san = %last.san,
                fen = %self.position.to_fen(),
                "applied move"
            );
        }
        if self.status.is_terminal() {
            tracing::info!(status = %self.status, ply = self.moves.len(), "game over");
        }

        self.status
    }

    fn captured_by(&self, m: Move) -> Option<Piece> {
        match m.kind() {
            MoveKind::EnPassantCapture => Some(Piece::new(
                self.position.side_to_move.opposite(),
                PieceKind::Pawn,
            )),
            _ => self.position.piece_at(m.to()),
        }
    }

    /// Decides the status of the current position.
    ///
    /// Precedence: mate and stalemate, dead material, repetition, the
    /// fifty-move rule, then check.
    fn evaluate_status(&self) -> GameStatus {
        let base = StandardChess.position_status(&self.position);
        match base {
            GameStatus::Checkmate | GameStatus::Stalemate => return base,
            GameStatus::DrawByInsufficientMaterial if self.config.insufficient_material => {
                return base
            }
            _ => {}
        }

        if self.position_count() >= self.config.repetition_limit {
            return GameStatus::DrawByRepetition;
        }
        if self.position.halfmove_clock >= self.config.fifty_move_limit {
            return GameStatus::DrawByFiftyMoves;
        }
        if self.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    /// Counts how many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        let current = self.position.signature();
        self.history.iter().filter(|&&s| s == current).count()
    }

    /// Returns to the starting position, dropping all history.
    pub fn reset(&mut self) {
        let mut game = Game::from_position(self.start_pos.clone());
        game.config = self.config;
        game.status = game.evaluate_status();
        *self = game;
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Generates SAN for a move in the current position.
    pub fn move_to_san(&self, m: Move) -> String {
        move_to_san(&self.position, m)
    }

    /// Parses SAN and returns the corresponding move.
    pub fn san_to_move(&self, san: &str) -> Result<Move, SanError> {
        san_to_move(&self.position, san)
    }

    /// Renders the game as PGN with the given tag pairs.
    pub fn to_pgn(&self, tags: &[(&str, &str)]) -> String {
        pgn::write_pgn(self, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert!(!game.is_game_over());
        assert!(!game.is_check());
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.signature_history().len(), 1);
    }

    #[test]
    fn make_move_uci() {
        let mut game = Game::new();
        game.make_move_uci("e2e4").unwrap();
        assert_eq!(game.ply_count(), 1);
        assert_eq!(game.move_history()[0].san, "e4");
        assert_eq!(game.position().en_passant, Some(sq("e3")));
    }

    #[test]
    fn make_move_san() {
        let mut game = Game::new();
        game.make_move_san("e4").unwrap();
        assert_eq!(game.ply_count(), 1);
        game.make_move_san("e5").unwrap();
        assert_eq!(game.ply_count(), 2);
        assert_eq!(game.fullmove_number(), 2);
    }

    #[test]
    fn apply_rejects_moves_outside_the_legal_list() {
        let mut game = Game::new();
        let before = game.to_fen();

        // Right squares, wrong kind tag.
        let mislabeled = Move::normal(sq("e2"), sq("e4"));
        assert_eq!(
            game.apply(mislabeled),
            Err(GameError::IllegalMove("e2e4".to_string()))
        );
        assert_eq!(game.to_fen(), before);
        assert_eq!(game.signature_history().len(), 1);

        let status = game.apply(Move::normal(sq("g1"), sq("f3"))).unwrap();
        assert_eq!(status, GameStatus::Ongoing);
    }

    #[test]
    fn illegal_move() {
        let mut game = Game::new();
        assert_eq!(
            game.make_move_uci("e2e5"),
            Err(GameError::IllegalMove("e2e5".to_string()))
        );
        assert_eq!(
            game.make_move_uci("e2"),
            Err(GameError::InvalidUci("e2".to_string()))
        );
        assert!(matches!(
            game.make_move_san("Nf4"),
            Err(GameError::InvalidSan(SanError::NoMatchingMove(_)))
        ));
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new();
        game.make_move_san("f3").unwrap();
        game.make_move_san("e5").unwrap();
        game.make_move_san("g4").unwrap();
        let status = game.make_move_san("Qh4").unwrap();
        assert_eq!(status, GameStatus::Checkmate);
        assert!(game.is_game_over());
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.result(), Some(GameResult::BlackWins));
        assert_eq!(game.move_history()[3].san, "Qh4#");
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn cannot_move_after_game_over() {
        let mut game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.status(), GameStatus::Stalemate);
        assert_eq!(
            game.make_move_uci("h8g8"),
            Err(GameError::GameOver(GameStatus::Stalemate))
        );
        assert!(matches!(
            game.apply(Move::normal(sq("h8"), sq("g8"))),
            Err(GameError::GameOver(_))
        ));
    }

    #[test]
    fn check_status() {
        let mut game = Game::new();
        for uci in ["e2e4", "f7f6", "d2d4", "g7g5"] {
            game.make_move_uci(uci).unwrap();
        }
        assert_eq!(game.make_move_uci("d1h5").unwrap(), GameStatus::Checkmate);

        let mut game = Game::new();
        for uci in ["e2e4", "f7f5"] {
            game.make_move_uci(uci).unwrap();
        }
        assert_eq!(game.make_move_uci("d1h5").unwrap(), GameStatus::Check);
        assert!(game.is_check());
        assert_eq!(game.move_history()[2].san, "Qh5+");
    }

    #[test]
    fn threefold_repetition() {
        let mut game = Game::new();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.position_count(), 2);
        assert_eq!(game.status(), GameStatus::Ongoing);

        for san in ["Nf3", "Nf6", "Ng1"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.make_move_san("Ng8").unwrap(), GameStatus::DrawByRepetition);
        assert_eq!(game.position_count(), 3);
        assert_eq!(game.result(), Some(GameResult::Draw));
    }

    #[test]
    fn repetition_limit_from_config() {
        let config = RulesConfig {
            repetition_limit: 2,
            ..RulesConfig::default()
        };
        let mut game = Game::new().with_config(config).unwrap();
        for san in ["Nf3", "Nf6", "Ng1"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.make_move_san("Ng8").unwrap(), GameStatus::DrawByRepetition);
    }

    #[test]
    fn fifty_move_rule() {
        // Rook on the board so it's not insufficient material
        let mut game = Game::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 99 1").unwrap();
        assert_eq!(game.status(), GameStatus::Ongoing);
        let status = game.make_move_uci("a1a2").unwrap();
        assert_eq!(status, GameStatus::DrawByFiftyMoves);
        assert_eq!(game.result(), Some(GameResult::Draw));
    }

    #[test]
    fn fifty_move_limit_from_config() {
        let config = RulesConfig {
            fifty_move_limit: 150,
            ..RulesConfig::default()
        };
        let game = Game::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 120 70")
            .unwrap()
            .with_config(config)
            .unwrap();
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn pawn_move_resets_halfmove_clock() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/P7/R3K3 w Q - 99 1").unwrap();
        assert_eq!(game.make_move_uci("a2a3").unwrap(), GameStatus::Ongoing);
        assert_eq!(game.position().halfmove_clock, 0);
    }

    #[test]
    fn insufficient_material() {
        let game = Game::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.status(), GameStatus::DrawByInsufficientMaterial);

        let config = RulesConfig {
            insufficient_material: false,
            ..RulesConfig::default()
        };
        let game = game.with_config(config).unwrap();
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn capture_into_insufficient_material() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert_eq!(game.status(), GameStatus::Check);
        assert_eq!(
            game.make_move_uci("e1e2").unwrap(),
            GameStatus::DrawByInsufficientMaterial
        );
        assert_eq!(
            game.captured_pieces(Color::Black),
            vec![Piece::new(Color::Black, PieceKind::Rook)]
        );
    }

    #[test]
    fn move_history_and_captures() {
        let mut game = Game::new();
        for san in ["e4", "d5", "exd5", "Qxd5", "Nc3"] {
            game.make_move_san(san).unwrap();
        }

        let history = game.move_history();
        assert_eq!(history.len(), 5);
        assert_eq!(history[2].san, "exd5");
        assert_eq!(
            history[2].captured,
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
        assert_eq!(history[4].captured, None);
        assert_eq!(
            game.captured_pieces(Color::White),
            vec![Piece::new(Color::White, PieceKind::Pawn)]
        );
    }

    #[test]
    fn en_passant_capture_recorded() {
        let mut game = Game::new();
        for uci in ["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"] {
            game.make_move_uci(uci).unwrap();
        }
        let last = game.move_history().last().unwrap();
        assert_eq!(last.san, "exd6");
        assert_eq!(last.captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert!(game.board().is_empty(sq("d5")));
    }

    #[test]
    fn promotion_via_uci() {
        let mut game = Game::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        assert_eq!(game.find_moves(sq("a7"), sq("a8")).len(), 4);
        assert_eq!(game.legal_destinations(sq("a7")), vec![sq("a8")]);
        assert!(matches!(
            game.make_move_uci("a7a8"),
            Err(GameError::IllegalMove(_))
        ));
        game.make_move_uci("a7a8n").unwrap();
        assert_eq!(
            game.board().piece_at(sq("a8")),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn legal_destinations_for_knight() {
        let game = Game::new();
        assert_eq!(game.legal_destinations(sq("g1")), vec![sq("f3"), sq("h3")]);
        assert!(game.legal_destinations(sq("e1")).is_empty());
        assert!(game.legal_destinations(sq("e4")).is_empty());
    }

    #[test]
    fn opponent_attacks_after_e4() {
        let mut game = Game::new();
        game.make_move_uci("e2e4").unwrap();
        let attacks = game.opponent_attacks();
        assert!(attacks.contains(&sq("d5")));
        assert!(attacks.contains(&sq("f5")));
        assert!(!attacks.contains(&sq("e5")));
    }

    #[test]
    fn reset_restores_start() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        game.make_move_uci("e1e2").unwrap();
        assert_eq!(game.position().castling.to_fen_field(), "kq");

        game.reset();
        assert_eq!(game.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.signature_history().len(), 1);
    }

    #[test]
    fn bare_pawn_destination_is_not_a_capture() {
        let mut game = Game::from_fen("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            game.make_move_san("d5"),
            Err(GameError::InvalidSan(SanError::NoMatchingMove("d5".to_string())))
        );
        assert_eq!(game.ply_count(), 0);

        game.make_move_san("exd5").unwrap();
        assert_eq!(game.move_history()[0].san, "exd5");
    }

    #[test]
    fn with_config_rejects_invalid_limits() {
        let config = RulesConfig {
            repetition_limit: 0,
            ..RulesConfig::default()
        };
        assert!(matches!(
            Game::new().with_config(config),
            Err(ConfigError::Invalid(_))
        ));

        let config = RulesConfig {
            fifty_move_limit: 0,
            ..RulesConfig::default()
        };
        assert!(Game::new().with_config(config).is_err());
    }

    #[test]
    fn reset_keeps_config() {
        let config = RulesConfig {
            fifty_move_limit: 150,
            ..RulesConfig::default()
        };
        let mut game = Game::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 120 70")
            .unwrap()
            .with_config(config)
            .unwrap();
        game.make_move_uci("a1a2").unwrap();
        game.reset();
        assert_eq!(game.config(), &config);
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn from_fen_errors() {
        assert!(matches!(
            Game::from_fen("not a fen"),
            Err(FenError::WrongFieldCount(_))
        ));
    }
}
