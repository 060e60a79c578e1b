use anyhow::{Context, Result};
use clap::Parser;
use npuzzle_solver::engine::{Board, Move};
use npuzzle_solver::heuristics::HeuristicKind;
use npuzzle_solver::solver::solve_board;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the sliding-tile puzzle in the terminal", long_about = None)]
struct Args {
    /// Board dimension
    #[clap(short, long, default_value_t = 3)]
    size: usize,

    /// Seed for the starting board; random if omitted
    #[clap(long)]
    seed: Option<u64>,

    /// Start from the goal scrambled by this many moves instead of a uniformly random board
    #[clap(long)]
    scramble: Option<usize>,
}

fn parse_move(input: &str) -> Option<Move> {
    match input {
        "w" | "up" => Some(Move::Up),
        "s" | "down" => Some(Move::Down),
        "a" | "left" => Some(Move::Left),
        "d" | "right" => Some(Move::Right),
        _ => None,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut board = match args.scramble {
        Some(moves) => Board::scrambled_with_seed(args.size, moves, seed),
        None => Board::new_random_with_seed(args.size, seed),
    }
    .context("failed to generate a board")?;
    let mut history: Vec<Board> = Vec::new();

    println!("Welcome to the sliding-tile puzzle! (seed {})", seed);
    println!("Slide tiles into the blank with w/a/s/d (tile moves up/left/down/right).");

    loop {
        println!("---------------------");
        println!("Steps: {}", history.len());
        println!("{}", board);

        if board.is_goal() {
            println!();
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total Steps: {}", history.len());
            println!("---------------------");
            break;
        }

        print!("Enter a move (w/a/s/d), 'h' for a hint, 'u' to undo, 'q' to quit: ");
        io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }

        let trimmed_input = input.trim().to_ascii_lowercase();
        match trimmed_input.as_str() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => match history.pop() {
                Some(previous) => {
                    board = previous;
                    println!("Move undone.");
                }
                None => println!("Cannot undo further (already at the initial board)."),
            },
            "h" => match solve_board(&board, &HeuristicKind::ManhattanDistance) {
                Ok(solution) => match solution.moves.first() {
                    Some(mv) => println!(
                        "Hint: slide {} ({} moves left, {} nodes searched).",
                        mv, solution.steps, solution.expansions
                    ),
                    None => println!("Already solved."),
                },
                Err(e) => println!("No hint available: {}", e),
            },
            other => match parse_move(other) {
                Some(mv) => match board.apply_move(mv) {
                    Some(next) => {
                        history.push(std::mem::replace(&mut board, next));
                    }
                    None => println!("Invalid move: no tile can slide {} into the blank.", mv),
                },
                None => println!("Invalid input. Use w/a/s/d, 'h', 'u' or 'q'."),
            },
        }
    }
    Ok(())
}
