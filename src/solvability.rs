//! Parity test deciding whether a board can reach the goal.
//!
//! Every legal move preserves a parity invariant built from the number of inversions among
//! the non-blank tiles (and, on even-width boards, the blank's row). The goal has no
//! inversions and its blank in row 0, so a board is solvable exactly when its invariant
//! matches the goal's.
use crate::engine::Board;

/// Counts pairs of non-blank tiles that appear in the wrong relative order when the board is
/// read row-major.
///
/// Uses a plain pairwise comparison, which is O(n⁴) on an n×n board.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::solvability::count_inversions;
///
/// assert_eq!(count_inversions(&Board::goal(3)), 0);
/// let b = Board::from_rows(&[vec![0, 2], vec![1, 3]]).unwrap();
/// assert_eq!(count_inversions(&b), 1);
/// ```
pub fn count_inversions(board: &Board) -> usize {
    let tiles: Vec<u8> = board.tiles().iter().copied().filter(|&t| t != 0).collect();
    let mut inversions = 0;
    for i in 0..tiles.len() {
        for j in i + 1..tiles.len() {
            if tiles[i] > tiles[j] {
                inversions += 1;
            }
        }
    }
    inversions
}

/// Returns `true` if the goal board can be reached from `board` with legal moves.
///
/// - Odd width: solvable iff the inversion count is even.
/// - Even width: solvable iff inversions plus the blank's zero-based row is even.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
/// use npuzzle_solver::solvability::is_solvable;
///
/// let unsolvable = Board::from_rows(&[vec![7, 5, 6], vec![2, 4, 3], vec![8, 1, 0]]).unwrap();
/// assert!(!is_solvable(&unsolvable));
/// assert!(is_solvable(&Board::goal(4)));
/// ```
pub fn is_solvable(board: &Board) -> bool {
    let inversions = count_inversions(board);
    if board.size() % 2 == 1 {
        inversions % 2 == 0
    } else {
        let (blank_row, _) = board.locate_blank();
        (inversions + blank_row) % 2 == 0
    }
}
