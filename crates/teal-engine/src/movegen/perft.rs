//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::{legal_moves, make_move};
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|m| perft(&make_move(position, *m), depth - 1))
        .sum()
}

/// Perft with divide: the node count below each root move, sorted by the
/// move's coordinate notation.
///
/// A depth of zero yields no entries.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = legal_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let nodes = perft(&make_move(position, *m), depth - 1);
        tracing::trace!(mv = %m.to_uci(), nodes, "perft divide");
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn perft_fen(fen: &str, depth: u32) -> u64 {
        perft(&Position::from_fen(fen).unwrap(), depth)
    }

    // Starting position perft values (well-known and verified)
    #[test]
    fn perft_startpos_shallow() {
        let position = Position::startpos();
        assert_eq!(perft(&position, 0), 1);
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&Position::startpos(), 3), 8902);
    }

    // Slow without optimizations
    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&Position::startpos(), 4), 197_281);
    }

    // Kiwipete - a position with lots of special moves
    #[test]
    fn perft_kiwipete() {
        assert_eq!(perft_fen(KIWIPETE, 1), 48);
        assert_eq!(perft_fen(KIWIPETE, 2), 2039);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_depth_3() {
        assert_eq!(perft_fen(KIWIPETE, 3), 97_862);
    }

    // Position 3: check evasion, en passant, promotion
    #[test]
    fn perft_position3() {
        assert_eq!(perft_fen(POSITION_3, 1), 14);
        assert_eq!(perft_fen(POSITION_3, 2), 191);
        assert_eq!(perft_fen(POSITION_3, 3), 2812);
    }

    #[test]
    #[ignore]
    fn perft_position3_depth_4() {
        assert_eq!(perft_fen(POSITION_3, 4), 43_238);
    }

    // Position 4: castling rights lost to captures, promotions with check
    #[test]
    fn perft_position4() {
        assert_eq!(perft_fen(POSITION_4, 1), 6);
        assert_eq!(perft_fen(POSITION_4, 2), 264);
    }

    #[test]
    #[ignore]
    fn perft_position4_depth_3() {
        assert_eq!(perft_fen(POSITION_4, 3), 9467);
    }

    #[test]
    fn perft_position5() {
        assert_eq!(perft_fen(POSITION_5, 1), 44);
        assert_eq!(perft_fen(POSITION_5, 2), 1486);
    }

    #[test]
    #[ignore]
    fn perft_position5_depth_3() {
        assert_eq!(perft_fen(POSITION_5, 3), 62_379);
    }

    #[test]
    fn perft_divide_startpos() {
        let position = Position::startpos();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(results[0].0, "a2a3");

        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&position, 2));
    }

    #[test]
    fn perft_divide_depth_zero_is_empty() {
        assert!(perft_divide(&Position::startpos(), 0).is_empty());
    }
}
