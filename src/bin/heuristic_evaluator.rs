use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use npuzzle_solver::engine::Board;
use npuzzle_solver::heuristics::HeuristicKind;
use npuzzle_solver::solver::solve_board;
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares heuristics by nodes expanded on seeded boards", long_about = None)]
struct Args {
    /// Board dimension (3 for the 8-puzzle, 4 for the 15-puzzle)
    #[clap(short, long, default_value_t = 3)]
    size: usize,

    /// Number of boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Scramble the goal with this many random moves instead of drawing a uniformly random
    /// board (recommended for 4x4 and larger)
    #[clap(long)]
    scramble: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.size > 3 && args.scramble.is_none() {
        warn!(
            "uniformly random {0}x{0} boards can take A* a very long time; consider --scramble",
            args.size
        );
    }

    let mut all_expansions: HashMap<HeuristicKind, Vec<usize>> = HashMap::new();
    for kind in HeuristicKind::ALL {
        all_expansions.insert(kind, Vec::new());
    }

    info!("Starting heuristic evaluation for {} boards", args.boards);

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx;
        let initial_board = match args.scramble {
            Some(moves) => Board::scrambled_with_seed(args.size, moves, current_seed),
            None => Board::new_random_with_seed(args.size, current_seed),
        }
        .context("failed to generate a board")?;

        println!("\nEvaluating Board {} (Seed: {})\n{}", board_idx, current_seed, initial_board);

        let optimal_steps = solve_board(&initial_board, &HeuristicKind::ManhattanDistance)
            .with_context(|| format!("manhattan failed on board {}", board_idx))?
            .steps;
        for kind in HeuristicKind::ALL {
            let solution = solve_board(&initial_board, &kind)
                .with_context(|| format!("{} failed on board {}", kind, board_idx))?;
            println!(
                "  Heuristic: {:<16} Steps: {:<4} Expansions: {:<9} Peak frontier: {}",
                kind.name(),
                solution.steps,
                solution.expansions,
                solution.max_frontier
            );

            if solution.steps != optimal_steps {
                // Linear conflict may overestimate; the other two never do.
                if kind == HeuristicKind::LinearConflict {
                    warn!(
                        "{} found {} steps on board {} where the optimum is {}",
                        kind, solution.steps, board_idx, optimal_steps
                    );
                } else {
                    bail!(
                        "{} found {} steps on board {} but the optimum is {}",
                        kind,
                        solution.steps,
                        board_idx,
                        optimal_steps
                    );
                }
            }

            if let Some(expansions) = all_expansions.get_mut(&kind) {
                expansions.push(solution.expansions);
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Average Expansions ---");

    let mut sorted_averages: Vec<(HeuristicKind, f64)> = Vec::new();
    for (kind, expansions) in &all_expansions {
        if expansions.is_empty() {
            println!("Heuristic {}: No results recorded.", kind);
            continue;
        }
        let total: usize = expansions.iter().sum();
        sorted_averages.push((*kind, total as f64 / expansions.len() as f64));
    }

    // Fewest expansions first
    sorted_averages.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (kind, average) in sorted_averages {
        println!("Heuristic {:<16}: Average Expansions = {:.2}", kind.name(), average);
    }
    Ok(())
}
