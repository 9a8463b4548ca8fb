use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use quill_chess::engines::chess_engine::ChessEngine;
use quill_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use quill_chess::move_generation::perft::perft_divide;
use quill_chess::utils::san::line_to_san;

/// Search a position and print the best line found.
#[derive(Debug, Parser)]
#[command(name = "quill", version)]
struct Args {
    /// Position description to start from.
    #[arg(long, default_value = STARTING_POSITION_FEN)]
    fen: String,

    /// Moves to play before searching, in SAN or coordinate form.
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,

    /// Maximum search depth in plies.
    #[arg(long, default_value_t = 20)]
    depth: u8,

    /// Search time budget in milliseconds.
    #[arg(long, default_value_t = 5_000)]
    movetime: u64,

    /// Packed opening book image.
    #[arg(long)]
    book: Option<std::path::PathBuf>,

    /// Count move paths to this depth instead of searching.
    #[arg(long)]
    perft: Option<u8>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "quill failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = ChessEngine::new();
    engine.load_fen(&args.fen)?;
    for text in &args.moves {
        engine.play_move(text)?;
    }
    if let Some(path) = &args.book {
        engine.load_book(&std::fs::read(path)?)?;
    } else {
        engine.set_option("OwnBook", "false")?;
    }
    engine.set_option("Depth", &args.depth.to_string())?;
    engine.set_option("MoveTime", &args.movetime.to_string())?;

    println!("{engine}");

    if let Some(depth) = args.perft {
        let mut game_state = engine.game_state().clone();
        let mut total = 0;
        for (mv, count) in perft_divide(&mut game_state, depth) {
            println!("{}: {count}", mv.to_coordinate());
            total += count;
        }
        println!("total: {total}");
        return Ok(());
    }

    let status = engine.termination();
    if status.is_over() {
        println!("game over: {status}");
        return Ok(());
    }

    let result = engine.search(None, None);
    let line = line_to_san(engine.game_state(), &result.line);
    println!("line: {}", line.join(" "));
    println!("score: {}", result.best_score);
    println!(
        "termination: {} (depth {}, {} nodes, {} ms)",
        result.termination,
        result.reached_depth,
        result.nodes,
        result.elapsed.as_millis()
    );
    Ok(())
}
