//! Perft runner - counts move-generator leaf nodes for a position.
//!
//! Compare the output against published node counts to validate move
//! generation, or use `--divide` to find the root move whose subtree
//! disagrees.

use clap::Parser;
use serde::Serialize;
use std::time::Instant;
use teal_core::FenRecord;
use teal_engine::movegen::perft::{perft, perft_divide};
use teal_engine::Position;

/// Counts leaf nodes of the legal move tree.
#[derive(Parser)]
#[command(name = "teal-perft")]
#[command(about = "Counts legal move tree leaf nodes for a FEN position")]
struct Args {
    /// Position to search, in FEN
    #[arg(long, default_value = FenRecord::STARTPOS)]
    fen: String,

    /// Search depth in plies
    #[arg(long, default_value = "4")]
    depth: u32,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Emit a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DivideEntry {
    mv: String,
    nodes: u64,
}

#[derive(Serialize)]
struct PerftReport {
    fen: String,
    depth: u32,
    nodes: u64,
    elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    divide: Option<Vec<DivideEntry>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let position = Position::from_fen(&args.fen)?;
    tracing::info!(fen = %args.fen, depth = args.depth, "starting perft");

    let started = Instant::now();
    let (nodes, divide) = if args.divide {
        let entries: Vec<DivideEntry> = perft_divide(&position, args.depth)
            .into_iter()
            .map(|(mv, nodes)| DivideEntry { mv, nodes })
            .collect();
        let total = if args.depth == 0 {
            1
        } else {
            entries.iter().map(|e| e.nodes).sum()
        };
        (total, Some(entries))
    } else {
        (perft(&position, args.depth), None)
    };
    let elapsed = started.elapsed();
    tracing::info!(nodes, elapsed_ms = elapsed.as_millis() as u64, "perft finished");

    let report = PerftReport {
        fen: position.to_fen(),
        depth: args.depth,
        nodes,
        elapsed_ms: elapsed.as_millis(),
        divide,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(entries) = &report.divide {
        for entry in entries {
            println!("{}: {}", entry.mv, entry.nodes);
        }
        println!();
    }
    println!("{}", position.board);
    println!("Depth: {}", report.depth);
    println!("Nodes: {}", report.nodes);
    println!("Time:  {} ms", report.elapsed_ms);
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        println!("NPS:   {:.0}", report.nodes as f64 / secs);
    }

    Ok(())
}
