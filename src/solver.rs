use crate::engine::{Board, BoardError, Move};
use crate::heuristics::Heuristic;
use crate::solvability::is_solvable;
use log::{debug, error, trace};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use thiserror::Error;

/// An optimal solution found by the solver, together with search statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Number of moves in the optimal solution.
    pub steps: usize,
    /// Number of nodes popped from the frontier, including discarded duplicates.
    pub expansions: usize,
    /// Largest frontier size observed during the search.
    pub max_frontier: usize,
    /// Every board from the start to the goal, inclusive. Always `steps + 1` long.
    pub path: Vec<Board>,
    /// The move leading from each board in `path` to the next. Always `steps` long.
    pub moves: Vec<Move>,
}

/// Reasons the solver did not return a solution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The input is not an n×n permutation of `0..n²`.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] BoardError),

    /// The board's permutation parity differs from the goal's.
    #[error("puzzle is unsolvable")]
    Unsolvable,

    /// The frontier ran dry on a board the parity check accepted. This is an engine defect,
    /// never a property of the input.
    #[error("internal fault: frontier exhausted after {expansions} expansions without reaching the goal")]
    NoSolution { expansions: usize, max_frontier: usize },
}

impl SolveError {
    /// Numeric code for the error: `-1` invalid input, `-2` unsolvable, `-3` internal fault.
    pub fn code(&self) -> i32 {
        match self {
            SolveError::InvalidInput(_) => -1,
            SolveError::Unsolvable => -2,
            SolveError::NoSolution { .. } => -3,
        }
    }
}

/// A node of the search tree, stored in the solver's arena.
#[derive(Debug)]
struct SearchNode {
    board: Board,
    /// Moves from the start (g).
    cost: usize,
    /// g + h, the frontier priority.
    estimate: usize,
    /// Arena index of the node this one was expanded from.
    parent: Option<usize>,
    /// The move that produced this node from its parent.
    mv: Option<Move>,
}

/// Walks parent links from `goal_idx` back to the root and returns the path start-first.
fn reconstruct_path(arena: &[SearchNode], goal_idx: usize) -> (Vec<Board>, Vec<Move>) {
    let mut path = Vec::new();
    let mut moves = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        let node = &arena[idx];
        path.push(node.board.clone());
        if let Some(mv) = node.mv {
            moves.push(mv);
        }
        cursor = node.parent;
    }
    path.reverse();
    moves.reverse();
    (path, moves)
}

/// Validates `rows` and solves the puzzle optimally with A*.
///
/// Checks run in order and fail fast, before any search state exists:
/// 1. the grid is a non-empty n×n square, else `SolveError::InvalidInput`;
/// 2. its values are exactly `0..n²`, else `SolveError::InvalidInput`;
/// 3. the board is solvable, else `SolveError::Unsolvable`.
///
/// # Examples
/// ```
/// use npuzzle_solver::heuristics::HeuristicKind;
/// use npuzzle_solver::solver::{solve, SolveError};
///
/// let rows = vec![vec![1, 2, 0], vec![3, 4, 5], vec![6, 7, 8]];
/// let solution = solve(&rows, &HeuristicKind::ManhattanDistance).unwrap();
/// assert_eq!(solution.steps, 2);
/// assert_eq!(solution.path.len(), 3);
///
/// let unsolvable = vec![vec![7, 5, 6], vec![2, 4, 3], vec![8, 1, 0]];
/// assert_eq!(solve(&unsolvable, &HeuristicKind::ManhattanDistance), Err(SolveError::Unsolvable));
/// ```
pub fn solve<H>(rows: &[Vec<i64>], heuristic: &H) -> Result<Solution, SolveError>
where
    H: Heuristic + ?Sized,
{
    let board = Board::from_rows(rows)?;
    solve_board(&board, heuristic)
}

/// Solves an already validated board optimally with A*.
///
/// The frontier is a binary heap keyed on ascending `f = g + h`. Among equal `f`, the node
/// pushed first is popped first: the arena index of a node is also its insertion sequence
/// number, so it serves as the secondary key. Duplicates are removed lazily: a popped board
/// that was already expanded is discarded. The goal test happens on pop, so the first goal
/// popped carries an optimal cost whenever the heuristic is admissible.
pub fn solve_board<H>(start: &Board, heuristic: &H) -> Result<Solution, SolveError>
where
    H: Heuristic + ?Sized,
{
    if !is_solvable(start) {
        debug!("rejecting unsolvable board:\n{}", start);
        return Err(SolveError::Unsolvable);
    }

    let initial_estimate = heuristic.estimate(start) as usize;
    debug!(
        "solving {n}x{n} board, initial estimate {}",
        initial_estimate,
        n = start.size()
    );

    let mut arena = vec![SearchNode {
        board: start.clone(),
        cost: 0,
        estimate: initial_estimate,
        parent: None,
        mv: None,
    }];
    let mut frontier = BinaryHeap::new();
    frontier.push((Reverse(initial_estimate), Reverse(0usize)));
    let mut visited: HashSet<Board> = HashSet::new();
    let mut expansions = 0;
    let mut max_frontier = frontier.len();

    while let Some((_, Reverse(idx))) = frontier.pop() {
        expansions += 1;

        if arena[idx].board.is_goal() {
            let (path, moves) = reconstruct_path(&arena, idx);
            let solution = Solution {
                steps: arena[idx].cost,
                expansions,
                max_frontier,
                path,
                moves,
            };
            debug!(
                "solved in {} steps ({} expansions, peak frontier {})",
                solution.steps, solution.expansions, solution.max_frontier
            );
            return Ok(solution);
        }

        if !visited.insert(arena[idx].board.clone()) {
            continue;
        }
        trace!(
            "expanding node {} (g={}, f={})",
            idx,
            arena[idx].cost,
            arena[idx].estimate
        );

        let cost = arena[idx].cost + 1;
        let successors = arena[idx].board.successors();
        for (board, mv) in successors {
            if visited.contains(&board) {
                continue;
            }
            let estimate = cost + heuristic.estimate(&board) as usize;
            arena.push(SearchNode {
                board,
                cost,
                estimate,
                parent: Some(idx),
                mv: Some(mv),
            });
            frontier.push((Reverse(estimate), Reverse(arena.len() - 1)));
        }
        max_frontier = max_frontier.max(frontier.len());
    }

    error!(
        "frontier exhausted after {} expansions on a board that passed the solvability check:\n{}",
        expansions, start
    );
    Err(SolveError::NoSolution {
        expansions,
        max_frontier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::{linear_conflict, manhattan_distance, HeuristicKind};

    static EIGHT_PUZZLES: [[[i64; 3]; 3]; 3] = [
        [[2, 3, 7], [1, 8, 0], [6, 5, 4]],
        [[7, 0, 8], [4, 6, 1], [5, 3, 2]],
        [[5, 7, 6], [2, 4, 3], [8, 1, 0]],
    ];
    static EIGHT_PUZZLE_STEPS: [usize; 3] = [17, 25, 28];

    fn rows<const N: usize>(grid: &[[i64; N]; N]) -> Vec<Vec<i64>> {
        grid.iter().map(|r| r.to_vec()).collect()
    }

    fn fifteen_puzzle() -> Vec<Vec<i64>> {
        vec![
            vec![1, 2, 6, 3],
            vec![0, 9, 5, 7],
            vec![4, 13, 10, 11],
            vec![8, 12, 14, 15],
        ]
    }

    /// Checks the structural guarantees every returned solution must satisfy.
    fn assert_valid_solution(start: &[Vec<i64>], solution: &Solution) {
        assert_eq!(solution.path.len(), solution.steps + 1);
        assert_eq!(solution.moves.len(), solution.steps);
        assert_eq!(solution.path[0].to_rows(), start.to_vec());
        assert!(solution.path.last().unwrap().is_goal());

        for (i, pair) in solution.path.windows(2).enumerate() {
            let successors = pair[0].successors();
            assert!(
                successors.contains(&(pair[1].clone(), solution.moves[i])),
                "step {} is not a single blank swap",
                i
            );
        }

        let mut replay = solution.path[0].clone();
        for &mv in &solution.moves {
            replay = replay.apply_move(mv).unwrap();
        }
        assert!(replay.is_goal());
    }

    #[test_log::test]
    fn test_concrete_scenario_misplaced_vs_manhattan() {
        let start = rows(&EIGHT_PUZZLES[0]);
        let misplaced = solve(&start, &HeuristicKind::MisplacedTiles).unwrap();
        let manhattan = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();

        assert_eq!(misplaced.steps, 17);
        assert_eq!(manhattan.steps, 17);
        assert!(manhattan.expansions < misplaced.expansions);
        assert_valid_solution(&start, &misplaced);
        assert_valid_solution(&start, &manhattan);
    }

    #[test_log::test]
    fn test_all_heuristics_agree_on_optimal_steps() {
        for (grid, &expected) in EIGHT_PUZZLES.iter().zip(EIGHT_PUZZLE_STEPS.iter()) {
            let start = rows(grid);
            for kind in HeuristicKind::ALL {
                let solution = solve(&start, &kind).unwrap();
                assert_eq!(solution.steps, expected, "{} on {:?}", kind, grid);
                assert_valid_solution(&start, &solution);
            }
        }
    }

    #[test]
    fn test_zero_heuristic_finds_same_length() {
        let start = rows(&EIGHT_PUZZLES[0]);
        let zero = |_: &Board| 0u32;
        let blind = solve(&start, &zero).unwrap();
        let informed = solve(&start, &HeuristicKind::LinearConflict).unwrap();
        assert_eq!(blind.steps, 17);
        assert!(informed.expansions < blind.expansions);
    }

    #[test_log::test]
    fn test_expansions_follow_dominance() {
        for grid in &EIGHT_PUZZLES {
            let start = rows(grid);
            let h1 = solve(&start, &HeuristicKind::MisplacedTiles).unwrap();
            let h2 = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();
            let h3 = solve(&start, &HeuristicKind::LinearConflict).unwrap();
            assert!(h2.expansions < h1.expansions, "manhattan vs misplaced on {:?}", grid);
            assert!(h3.expansions < h2.expansions, "linear conflict vs manhattan on {:?}", grid);
        }
    }

    #[test_log::test]
    fn test_fifteen_puzzle() {
        let start = fifteen_puzzle();
        let misplaced = solve(&start, &HeuristicKind::MisplacedTiles).unwrap();
        let manhattan = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();
        assert_eq!(misplaced.steps, 9);
        assert_eq!(manhattan.steps, 9);
        assert!(misplaced.expansions >= manhattan.expansions);
        assert_valid_solution(&start, &manhattan);
    }

    #[test]
    fn test_overestimating_heuristic_can_miss_the_optimum() {
        let start = vec![vec![8, 3, 0], vec![7, 4, 6], vec![2, 1, 5]];
        let manhattan = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();
        let conflict = solve(&start, &HeuristicKind::LinearConflict).unwrap();
        assert_eq!(manhattan.steps, 28);
        assert!(conflict.steps > manhattan.steps);
        assert_valid_solution(&start, &conflict);
    }

    #[test]
    fn test_plain_function_heuristics() {
        let start = fifteen_puzzle();
        assert_eq!(solve(&start, &manhattan_distance).unwrap().steps, 9);
        assert_eq!(solve(&start, &linear_conflict).unwrap().steps, 9);
    }

    #[test]
    fn test_invalid_input() {
        let duplicate = vec![vec![0, 1, 2], vec![2, 3, 4], vec![5, 6, 7]];
        let err = solve(&duplicate, &HeuristicKind::ManhattanDistance).unwrap_err();
        assert_eq!(
            err,
            SolveError::InvalidInput(BoardError::DuplicateValue { value: 2 })
        );
        assert_eq!(err.code(), -1);

        let ragged = vec![vec![0, 1, 2], vec![3, 4], vec![5, 6, 7]];
        assert!(matches!(
            solve(&ragged, &HeuristicKind::ManhattanDistance),
            Err(SolveError::InvalidInput(BoardError::NotSquare { row: 1, .. }))
        ));

        let empty: Vec<Vec<i64>> = Vec::new();
        assert_eq!(
            solve(&empty, &HeuristicKind::ManhattanDistance),
            Err(SolveError::InvalidInput(BoardError::Empty))
        );
    }

    #[test]
    fn test_invalid_input_never_calls_heuristic() {
        let calls = std::cell::Cell::new(0u32);
        let counting = |_: &Board| {
            calls.set(calls.get() + 1);
            0u32
        };
        let ragged = vec![vec![0, 1], vec![2]];
        assert!(solve(&ragged, &counting).is_err());
        let unsolvable = vec![vec![7, 5, 6], vec![2, 4, 3], vec![8, 1, 0]];
        assert!(solve(&unsolvable, &counting).is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_unsolvable() {
        let three = vec![vec![7, 5, 6], vec![2, 4, 3], vec![8, 1, 0]];
        let err = solve(&three, &HeuristicKind::LinearConflict).unwrap_err();
        assert_eq!(err, SolveError::Unsolvable);
        assert_eq!(err.code(), -2);

        let four = vec![
            vec![0, 1, 2, 3],
            vec![4, 5, 6, 7],
            vec![8, 9, 10, 11],
            vec![12, 14, 13, 15],
        ];
        assert_eq!(
            solve(&four, &HeuristicKind::LinearConflict),
            Err(SolveError::Unsolvable)
        );
    }

    #[test]
    fn test_already_solved() {
        for n in 1..=4 {
            let solution = solve(&Board::goal_rows(n), &HeuristicKind::ManhattanDistance).unwrap();
            assert_eq!(solution.steps, 0);
            assert_eq!(solution.expansions, 1);
            assert_eq!(solution.max_frontier, 1);
            assert_eq!(solution.path, vec![Board::goal(n)]);
            assert!(solution.moves.is_empty());
        }
    }

    #[test]
    fn test_one_move_away() {
        let start = vec![vec![1, 0, 2], vec![3, 4, 5], vec![6, 7, 8]];
        let solution = solve(&start, &HeuristicKind::MisplacedTiles).unwrap();
        assert_eq!(solution.steps, 1);
        assert_eq!(solution.moves, vec![Move::Right]);
        assert_eq!(solution.expansions, 2);
        assert_eq!(solution.max_frontier, 3);
    }

    #[test]
    fn test_solving_is_deterministic() {
        let start = rows(&EIGHT_PUZZLES[1]);
        let a = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();
        let b = solve(&start, &HeuristicKind::ManhattanDistance).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scrambled_boards_within_scramble_length() {
        for seed in 0..5 {
            let board = Board::scrambled_with_seed(4, 20, seed).unwrap();
            let manhattan = solve_board(&board, &HeuristicKind::ManhattanDistance).unwrap();
            let conflict = solve_board(&board, &HeuristicKind::LinearConflict).unwrap();
            assert!(manhattan.steps <= 20);
            assert_eq!(manhattan.steps, conflict.steps);
        }
    }

    #[test]
    fn test_independent_searches_in_parallel() {
        let expected: Vec<Solution> = EIGHT_PUZZLES
            .iter()
            .map(|g| solve(&rows(g), &HeuristicKind::LinearConflict).unwrap())
            .collect();

        let parallel: Vec<Solution> = std::thread::scope(|s| {
            let handles: Vec<_> = EIGHT_PUZZLES
                .iter()
                .map(|g| s.spawn(move || solve(&rows(g), &HeuristicKind::LinearConflict).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(parallel, expected);
    }

    #[test]
    fn test_no_solution_code() {
        let err = SolveError::NoSolution {
            expansions: 10,
            max_frontier: 4,
        };
        assert_eq!(err.code(), -3);
        assert!(err.to_string().contains("internal fault"));
    }
}
