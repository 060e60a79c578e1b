use crate::engine::Board;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An estimate of the number of moves left to reach the goal board.
///
/// Implementations must be pure and deterministic. A* only guarantees an optimal solution
/// when the estimate never exceeds the true remaining cost.
///
/// Any `Fn(&Board) -> u32` is a heuristic, so a closure can be passed straight to the solver:
///
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::Heuristic;
///
/// let zero = |_: &Board| 0u32;
/// assert_eq!(zero.estimate(&Board::goal(3)), 0);
/// ```
pub trait Heuristic {
    fn estimate(&self, board: &Board) -> u32;
}

impl<F> Heuristic for F
where
    F: Fn(&Board) -> u32,
{
    fn estimate(&self, board: &Board) -> u32 {
        self(board)
    }
}

/// The built-in heuristics, from least to most informed.
///
/// `MisplacedTiles` and `ManhattanDistance` are admissible, so A* returns optimal step counts
/// with them. `LinearConflict` can overestimate (see [`linear_conflict`]), so its solutions are
/// usually but not always optimal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    /// Number of non-blank tiles out of place. See [`misplaced_tiles`].
    MisplacedTiles,
    /// Sum of tile Manhattan distances. See [`manhattan_distance`].
    ManhattanDistance,
    /// Manhattan distance plus two moves per linear conflict. See [`linear_conflict`].
    ///
    /// Not admissible on every board: it can overestimate and lead to a longer solution.
    LinearConflict,
}

impl HeuristicKind {
    /// Every built-in heuristic, weakest first.
    pub const ALL: [HeuristicKind; 3] = [
        HeuristicKind::MisplacedTiles,
        HeuristicKind::ManhattanDistance,
        HeuristicKind::LinearConflict,
    ];

    /// Short name used on the command line and in reports.
    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::MisplacedTiles => "misplaced",
            HeuristicKind::ManhattanDistance => "manhattan",
            HeuristicKind::LinearConflict => "linear-conflict",
        }
    }
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, board: &Board) -> u32 {
        match self {
            HeuristicKind::MisplacedTiles => misplaced_tiles(board),
            HeuristicKind::ManhattanDistance => manhattan_distance(board),
            HeuristicKind::LinearConflict => linear_conflict(board),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known heuristic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown heuristic '{0}' (expected misplaced, manhattan or linear-conflict)")]
pub struct ParseHeuristicError(pub String);

impl FromStr for HeuristicKind {
    type Err = ParseHeuristicError;

    /// Accepts the names from [`HeuristicKind::name`] and the short aliases `h1`, `h2`, `h3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "misplaced" | "misplaced-tiles" | "h1" => Ok(HeuristicKind::MisplacedTiles),
            "manhattan" | "manhattan-distance" | "h2" => Ok(HeuristicKind::ManhattanDistance),
            "linear-conflict" | "linear" | "h3" => Ok(HeuristicKind::LinearConflict),
            _ => Err(ParseHeuristicError(s.to_string())),
        }
    }
}

/// Counts the non-blank tiles that are not on their goal cell.
///
/// Admissible, since every misplaced tile needs at least one move, but weakly informed.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::misplaced_tiles;
///
/// let board = Board::from_rows(&[vec![2, 3, 7], vec![1, 8, 0], vec![6, 5, 4]]).unwrap();
/// assert_eq!(misplaced_tiles(&board), 7);
/// ```
pub fn misplaced_tiles(board: &Board) -> u32 {
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(i, &t)| t != 0 && t as usize != i)
        .count() as u32
}

/// Sums, over every non-blank tile, the row and column distance to its goal cell.
///
/// This is the exact cost of moving each tile on its own, ignoring collisions, so it is
/// admissible and never smaller than [`misplaced_tiles`].
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::manhattan_distance;
///
/// let board = Board::from_rows(&[vec![2, 3, 7], vec![1, 8, 0], vec![6, 5, 4]]).unwrap();
/// assert_eq!(manhattan_distance(&board), 15);
/// ```
pub fn manhattan_distance(board: &Board) -> u32 {
    let n = board.size();
    let mut total = 0;
    for (i, &tile) in board.tiles().iter().enumerate() {
        if tile == 0 {
            continue;
        }
        let (goal_r, goal_c) = board.goal_position(tile);
        total += (i / n).abs_diff(goal_r) + (i % n).abs_diff(goal_c);
    }
    total as u32
}

/// Counts inversions in a sequence of goal coordinates.
fn count_order_inversions(goal_coords: &[usize]) -> u32 {
    let mut inversions = 0;
    for m in 0..goal_coords.len() {
        for k in m + 1..goal_coords.len() {
            if goal_coords[m] > goal_coords[k] {
                inversions += 1;
            }
        }
    }
    inversions
}

/// Counts linear conflicts on the board.
///
/// For each row, the tiles whose goal row is that row are collected left to right, and every
/// pair whose goal columns are in reversed order is one conflict. Columns are handled the same
/// way with goal rows, scanning top to bottom. The blank never takes part.
pub fn count_linear_conflicts(board: &Board) -> u32 {
    let n = board.size();
    let mut conflicts = 0;
    let mut line = Vec::with_capacity(n);

    for r in 0..n {
        line.clear();
        for c in 0..n {
            let tile = board.tile(r, c);
            if tile == 0 {
                continue;
            }
            let (goal_r, goal_c) = board.goal_position(tile);
            if goal_r == r {
                line.push(goal_c);
            }
        }
        conflicts += count_order_inversions(&line);
    }

    for c in 0..n {
        line.clear();
        for r in 0..n {
            let tile = board.tile(r, c);
            if tile == 0 {
                continue;
            }
            let (goal_r, goal_c) = board.goal_position(tile);
            if goal_c == c {
                line.push(goal_r);
            }
        }
        conflicts += count_order_inversions(&line);
    }

    conflicts
}

/// Manhattan distance plus two moves for every linear conflict.
///
/// Two tiles in their goal line but in reversed order cannot pass each other, so one of them
/// has to step out of the line and back in, costing two moves the Manhattan distance misses.
///
/// Every reversed pair counts, so three or more tiles mutually reversed in one line are charged
/// more than the moves they actually need. On those boards the estimate exceeds the true
/// distance (for `[[2, 7, 0], [5, 4, 3], [8, 1, 6]]` it is 28 against an optimum of 26) and A*
/// guided by it may return a longer than optimal solution. Use [`manhattan_distance`] when
/// optimality matters.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::heuristics::{linear_conflict, manhattan_distance};
///
/// // Tiles 1 and 2 are swapped in their goal row.
/// let board = Board::from_rows(&[vec![0, 2, 1], vec![3, 4, 5], vec![6, 7, 8]]).unwrap();
/// assert_eq!(manhattan_distance(&board), 2);
/// assert_eq!(linear_conflict(&board), 4);
/// ```
pub fn linear_conflict(board: &Board) -> u32 {
    manhattan_distance(board) + 2 * count_linear_conflicts(board)
}
