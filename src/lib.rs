//! # n²−1 Puzzle Solver Library
//!
//! This library solves the sliding-tile puzzle (8-puzzle, 15-puzzle, ...) with A* search and
//! compares heuristic functions by the number of nodes each one expands. With an admissible
//! heuristic (misplaced tiles, Manhattan distance) the solution is optimal.
//!
//! It is used by three binaries:
//! - `puzzle_solver`: Reads a board file, solves it with a chosen heuristic and prints the
//!   path together with search statistics.
//! - `heuristic_evaluator`: Solves the same seeded boards with every heuristic and reports
//!   how many nodes each one expanded.
//! - `human_player`: Lets a person play a shuffled board in the terminal, with solver hints.
//!
//! ## Modules
//! - `engine`: The validated `Board`, the `Move` labels, the blank locator and the successor
//!   generator, plus seeded board generation.
//! - `solvability`: The permutation-parity test run before every search.
//! - `heuristics`: The `Heuristic` trait and the misplaced-tiles, Manhattan-distance and
//!   linear-conflict estimates.
//! - `solver`: `solve` / `solve_board`, the A* search engine and its error type.
//! - `utils`: Parsing boards from text.
//!
//! ## Example
//! ```
//! use npuzzle_solver::{solve, HeuristicKind};
//!
//! let start = vec![vec![2, 3, 7], vec![1, 8, 0], vec![6, 5, 4]];
//! let solution = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();
//! assert_eq!(solution.steps, 17);
//! assert_eq!(solution.path.len(), 18);
//! ```

pub mod engine;
pub mod heuristics;
pub mod solvability;
pub mod solver;
pub mod utils;

pub use engine::{Board, BoardError, Move};
pub use heuristics::{
    linear_conflict, manhattan_distance, misplaced_tiles, Heuristic, HeuristicKind,
};
pub use solvability::is_solvable;
pub use solver::{solve, solve_board, Solution, SolveError};
