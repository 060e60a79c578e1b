use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use npuzzle_solver::engine::Board;
use npuzzle_solver::heuristics::HeuristicKind;
use npuzzle_solver::solver::{solve_board, SolveError};
use npuzzle_solver::utils::parse_board;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Optimally solves an n^2-1 sliding-tile puzzle with A*", long_about = None)]
struct Args {
    /// Heuristic guiding the search: misplaced, manhattan or linear-conflict (fastest, but
    /// may overestimate and return a longer path)
    #[clap(short = 'H', long, default_value = "manhattan")]
    heuristic: HeuristicKind,

    /// Print only the summary, not every board along the path
    #[clap(short, long)]
    quiet: bool,

    /// Path to the board file (one row per line, cells separated by spaces, 0 for the blank)
    board_file: PathBuf,
}

fn read_board_file(path: &PathBuf) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_board(&content).with_context(|| format!("invalid board in {}", path.display()))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let board = match read_board_file(&args.board_file) {
        Ok(board) => board,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(1);
        }
    };
    info!("Loaded {0}x{0} board from {1}", board.size(), args.board_file.display());
    println!("Initial board state:\n{}\n", board);
    info!("Searching with the {} heuristic", args.heuristic);

    let started = Instant::now();
    let result = solve_board(&board, &args.heuristic);
    let elapsed = started.elapsed();

    match result {
        Ok(solution) => {
            if args.heuristic == HeuristicKind::LinearConflict {
                println!("Solution:         {} moves (not guaranteed optimal)", solution.steps);
            } else {
                println!("Optimal solution: {} moves", solution.steps);
            }
            println!("Nodes expanded:   {}", solution.expansions);
            println!("Peak frontier:    {}", solution.max_frontier);
            println!("Search time:      {:.2?}\n", elapsed);

            if args.quiet {
                let labels: Vec<&str> = solution.moves.iter().map(|mv| mv.label()).collect();
                println!("Moves: {}", labels.join(" "));
            } else {
                for (i, (mv, next)) in solution.moves.iter().zip(&solution.path[1..]).enumerate() {
                    println!("Move {}: {}\n{}\n", i + 1, mv, next);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e {
                SolveError::NoSolution { .. } => error!("{}", e),
                _ => println!("{}", e),
            }
            ExitCode::from(e.code().unsigned_abs() as u8)
        }
    }
}
