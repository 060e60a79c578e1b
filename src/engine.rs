//! Board representation for the n²−1 sliding-tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Move`: The direction a tile slides into the blank.
//! - `Board`: An immutable, validated n×n arrangement of the values `0..n²`, where `0` is the
//!   blank. Includes the blank locator, the successor generator and seeded board generation.
//! - `BoardError`: Why a grid of integers is not a valid board.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use thiserror::Error;

/// Largest supported board dimension. Every tile value of a 16×16 board fits in a `u8`.
pub const MAX_BOARD_SIZE: usize = 16;

/// The direction a tile slides when it moves into the blank.
///
/// `Move::Up` means the tile directly below the blank slides up, so the blank itself
/// travels down one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

/// Successor generation order: the blank's neighbour above, below, left and right.
/// Each neighbour slides towards the blank, hence the inverted labels.
const SUCCESSOR_ORDER: [Move; 4] = [Move::Down, Move::Up, Move::Right, Move::Left];

impl Move {
    /// All four moves, in label order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Offset from the blank to the tile that slides for this move.
    fn tile_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Down => (-1, 0),
            Move::Left => (0, 1),
            Move::Right => (0, -1),
        }
    }

    /// The move that undoes this one.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Move;
    /// assert_eq!(Move::Up.opposite(), Move::Down);
    /// assert_eq!(Move::Left.opposite(), Move::Right);
    /// ```
    pub fn opposite(&self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Lowercase label used in solver output (`"up"`, `"down"`, `"left"`, `"right"`).
    pub fn label(&self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a grid of integers cannot be turned into a `Board`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The grid has no rows.
    #[error("board is empty")]
    Empty,

    /// A row's length differs from the number of rows.
    #[error("row {row} has {len} cells, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Its actual length.
        len: usize,
        /// The number of rows, which every row length must equal.
        expected: usize,
    },

    /// A flat tile list does not hold `size * size` values.
    #[error("expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },

    /// The board is larger than `MAX_BOARD_SIZE`.
    #[error("board size {size} exceeds the maximum of {max}", max = MAX_BOARD_SIZE)]
    TooLarge { size: usize },

    /// A cell holds a value outside `0..=max`.
    #[error("value {value} is out of range 0..={max}")]
    ValueOutOfRange { value: i64, max: usize },

    /// A value appears more than once.
    #[error("value {value} appears more than once")]
    DuplicateValue { value: i64 },
}

/// An immutable n×n sliding-tile board.
///
/// Tiles are stored flat in row-major order. The flat vector doubles as the canonical
/// hashable form of a state: two boards are equal exactly when their tile layouts are equal.
/// A `Board` can only be built through validating constructors, so it always holds each
/// value of `0..n²` exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<u8>,
    // Index of the blank in `tiles`; derived from `tiles`, cached for O(1) lookup.
    blank: usize,
}

/// Checks that `values` is a permutation of `0..size * size` and converts it to tiles.
///
/// Returns the tiles together with the index of the blank.
fn validate_permutation(
    size: usize,
    values: impl IntoIterator<Item = i64>,
) -> Result<(Vec<u8>, usize), BoardError> {
    let cell_count = size * size;
    let mut seen = vec![false; cell_count];
    let mut tiles = Vec::with_capacity(cell_count);
    let mut blank = 0;

    for value in values {
        if value < 0 || value as usize >= cell_count {
            return Err(BoardError::ValueOutOfRange {
                value,
                max: cell_count - 1,
            });
        }
        let v = value as usize;
        if seen[v] {
            return Err(BoardError::DuplicateValue { value });
        }
        seen[v] = true;
        if v == 0 {
            blank = tiles.len();
        }
        tiles.push(v as u8);
    }

    if tiles.len() != cell_count {
        return Err(BoardError::WrongTileCount {
            expected: cell_count,
            found: tiles.len(),
        });
    }
    Ok((tiles, blank))
}

impl Board {
    /// Builds a board from rows of integers, validating shape first and values second.
    ///
    /// # Errors
    /// - `BoardError::Empty` if there are no rows.
    /// - `BoardError::NotSquare` if some row's length differs from the row count.
    /// - `BoardError::TooLarge` if the board exceeds `MAX_BOARD_SIZE`.
    /// - `BoardError::ValueOutOfRange` / `BoardError::DuplicateValue` if the values are not
    ///   exactly `0..n²`.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::{Board, BoardError};
    ///
    /// let board = Board::from_rows(&[vec![1, 2], vec![0, 3]]).unwrap();
    /// assert_eq!(board.locate_blank(), (1, 0));
    ///
    /// let ragged = Board::from_rows(&[vec![0, 1, 2], vec![3, 4]]);
    /// assert!(matches!(ragged, Err(BoardError::NotSquare { row: 1, .. })));
    /// ```
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self, BoardError> {
        if rows.is_empty() {
            return Err(BoardError::Empty);
        }
        let size = rows.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
        }
        if size > MAX_BOARD_SIZE {
            return Err(BoardError::TooLarge { size });
        }

        let (tiles, blank) = validate_permutation(size, rows.iter().flatten().copied())?;
        Ok(Board { size, tiles, blank })
    }

    /// Builds a board of dimension `size` from a flat, row-major tile list.
    ///
    /// # Errors
    /// Same conditions as [`Board::from_rows`], with `BoardError::WrongTileCount` standing in
    /// for a shape mismatch.
    pub fn from_tiles(size: usize, tiles: &[u8]) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if size > MAX_BOARD_SIZE {
            return Err(BoardError::TooLarge { size });
        }
        if tiles.len() != size * size {
            return Err(BoardError::WrongTileCount {
                expected: size * size,
                found: tiles.len(),
            });
        }
        let (tiles, blank) = validate_permutation(size, tiles.iter().map(|&t| t as i64))?;
        Ok(Board { size, tiles, blank })
    }

    /// The canonical solved board of dimension `n`: cell (i, j) holds `i * n + j`, so the
    /// blank sits in the top-left corner.
    ///
    /// # Panics
    /// Panics if `n` is 0 or greater than `MAX_BOARD_SIZE`.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Board;
    /// let goal = Board::goal(3);
    /// assert_eq!(goal.to_rows(), vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
    /// assert!(goal.is_goal());
    /// ```
    pub fn goal(n: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&n),
            "board size {} is outside 1..={}",
            n,
            MAX_BOARD_SIZE
        );
        Board {
            size: n,
            tiles: (0..n * n).map(|v| v as u8).collect(),
            blank: 0,
        }
    }

    /// The goal board of dimension `n` as rows of integers, for comparing against grids.
    ///
    /// # Panics
    /// Same as [`Board::goal`].
    pub fn goal_rows(n: usize) -> Vec<Vec<i64>> {
        Board::goal(n).to_rows()
    }

    /// A uniformly random, solvable board generated from `seed`.
    ///
    /// The values are shuffled with a `SmallRng`; if the shuffle lands in the unsolvable half
    /// of the permutations, the first two non-blank tiles are swapped, which flips the
    /// inversion parity without moving the blank. The same seed always yields the same board.
    pub fn new_random_with_seed(size: usize, seed: u64) -> Result<Self, BoardError> {
        let mut tiles: Vec<u8> = Board::goal_checked(size)?.tiles;
        let mut rng = SmallRng::seed_from_u64(seed);
        tiles.shuffle(&mut rng);

        let mut board = Board::from_tiles(size, &tiles)?;
        if !crate::solvability::is_solvable(&board) {
            let mut non_blank = (0..tiles.len()).filter(|&i| tiles[i] != 0);
            if let (Some(a), Some(b)) = (non_blank.next(), non_blank.next()) {
                tiles.swap(a, b);
                board = Board::from_tiles(size, &tiles)?;
            }
        }
        Ok(board)
    }

    /// A board reached from the goal by a seeded random walk of `moves` legal moves.
    ///
    /// The walk never immediately undoes its previous move, so the optimal solution length is
    /// at most `moves`. Useful for generating 15-puzzle instances that A* can still solve.
    pub fn scrambled_with_seed(size: usize, moves: usize, seed: u64) -> Result<Self, BoardError> {
        let mut board = Board::goal_checked(size)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut previous: Option<Move> = None;

        for _ in 0..moves {
            let candidates: Vec<(Board, Move)> = board
                .successors()
                .into_iter()
                .filter(|(_, mv)| previous != Some(mv.opposite()))
                .collect();
            if candidates.is_empty() {
                break; // 1x1 board
            }
            let (next, mv) = candidates[rng.gen_range(0..candidates.len())].clone();
            board = next;
            previous = Some(mv);
        }
        Ok(board)
    }

    fn goal_checked(size: usize) -> Result<Self, BoardError> {
        match size {
            0 => Err(BoardError::Empty),
            s if s > MAX_BOARD_SIZE => Err(BoardError::TooLarge { size: s }),
            s => Ok(Board::goal(s)),
        }
    }

    /// The board dimension `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The tiles in row-major order.
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the board.
    pub fn tile(&self, r: usize, c: usize) -> u8 {
        assert!(r < self.size && c < self.size, "cell ({}, {}) out of bounds", r, c);
        self.tiles[r * self.size + c]
    }

    /// Iterates over the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.tiles.chunks(self.size)
    }

    /// The board as rows of integers, the same shape accepted by [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|row| row.iter().map(|&t| t as i64).collect())
            .collect()
    }

    /// Where `value` sits on the goal board, as `(row, col)`.
    pub fn goal_position(&self, value: u8) -> (usize, usize) {
        let v = value as usize;
        (v / self.size, v % self.size)
    }

    /// Returns the `(row, col)` of the blank.
    pub fn locate_blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Whether this is the canonical goal board.
    pub fn is_goal(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, &t)| t as usize == i)
    }

    /// Slides a tile into the blank in the given direction.
    ///
    /// Returns `None` if no tile sits on the side of the blank that `mv` needs.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::{Board, Move};
    /// let goal = Board::goal(3);
    /// // The blank is top-left: the tile below can slide up, nothing can slide down.
    /// let moved = goal.apply_move(Move::Up).unwrap();
    /// assert_eq!(moved.locate_blank(), (1, 0));
    /// assert!(goal.apply_move(Move::Down).is_none());
    /// ```
    pub fn apply_move(&self, mv: Move) -> Option<Board> {
        let (br, bc) = self.locate_blank();
        let (dr, dc) = mv.tile_offset();
        let nr = br as isize + dr;
        let nc = bc as isize + dc;
        if nr < 0 || nr >= self.size as isize || nc < 0 || nc >= self.size as isize {
            return None;
        }

        let from = nr as usize * self.size + nc as usize;
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, from);
        Some(Board {
            size: self.size,
            tiles,
            blank: from,
        })
    }

    /// All boards reachable in one move, each paired with the move that produced it.
    ///
    /// The blank's neighbours are considered above, below, left and right, in that order;
    /// this order is relied upon for deterministic tie-breaking during search. A corner blank
    /// yields 2 successors, an edge blank 3 and an interior blank 4.
    pub fn successors(&self) -> Vec<(Board, Move)> {
        SUCCESSOR_ORDER
            .iter()
            .filter_map(|&mv| self.apply_move(mv).map(|board| (board, mv)))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, &tile) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                if tile == 0 {
                    write!(f, "{:>width$}", ".", width = width)?;
                } else {
                    write!(f, "{:>width$}", tile, width = width)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn board(rows: &[&[i64]]) -> Board {
        let rows: Vec<Vec<i64>> = rows.iter().map(|r| r.to_vec()).collect();
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_goal_board_layout() {
        let goal = Board::goal(4);
        assert_eq!(goal.size(), 4);
        assert_eq!(goal.locate_blank(), (0, 0));
        assert_eq!(goal.tile(2, 3), 11);
        assert!(goal.is_goal());
        assert_eq!(Board::goal_rows(2), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert_eq!(Board::from_rows(&[]), Err(BoardError::Empty));
        assert_eq!(
            Board::from_rows(&[vec![0, 1, 2], vec![3, 4], vec![5, 6, 7]]),
            Err(BoardError::NotSquare {
                row: 1,
                len: 2,
                expected: 3
            })
        );
        assert_eq!(
            Board::from_rows(&[vec![0, 1, 2], vec![3, 4, 5]]),
            Err(BoardError::NotSquare {
                row: 0,
                len: 3,
                expected: 2
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_bad_values() {
        assert_eq!(
            Board::from_rows(&[vec![0, 1, 2], vec![2, 3, 4], vec![5, 6, 7]]),
            Err(BoardError::DuplicateValue { value: 2 })
        );
        assert_eq!(
            Board::from_rows(&[vec![0, 1], vec![2, 4]]),
            Err(BoardError::ValueOutOfRange { value: 4, max: 3 })
        );
        assert_eq!(
            Board::from_rows(&[vec![0, 1], vec![-2, 3]]),
            Err(BoardError::ValueOutOfRange { value: -2, max: 3 })
        );
    }

    #[test]
    fn test_from_rows_rejects_oversized_board() {
        let n = MAX_BOARD_SIZE + 1;
        let rows: Vec<Vec<i64>> = (0..n)
            .map(|r| (0..n).map(|c| (r * n + c) as i64).collect())
            .collect();
        assert_eq!(Board::from_rows(&rows), Err(BoardError::TooLarge { size: n }));
    }

    #[test]
    fn test_from_tiles_matches_from_rows() {
        let a = Board::from_tiles(3, &[2, 3, 7, 1, 8, 0, 6, 5, 4]).unwrap();
        let b = board(&[&[2, 3, 7], &[1, 8, 0], &[6, 5, 4]]);
        assert_eq!(a, b);
        assert_eq!(
            Board::from_tiles(3, &[0, 1, 2]),
            Err(BoardError::WrongTileCount {
                expected: 9,
                found: 3
            })
        );
    }

    #[test]
    fn test_locate_blank() {
        let b = board(&[&[2, 3, 7], &[1, 8, 0], &[6, 5, 4]]);
        assert_eq!(b.locate_blank(), (1, 2));
        assert_eq!(b.tile(1, 2), 0);
    }

    #[test]
    fn test_successor_counts_by_blank_position() {
        let corner = Board::goal(3);
        assert_eq!(corner.successors().len(), 2);

        let edge = board(&[&[1, 0, 2], &[3, 4, 5], &[6, 7, 8]]);
        assert_eq!(edge.successors().len(), 3);

        let interior = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        assert_eq!(interior.successors().len(), 4);
    }

    #[test]
    fn test_successor_order_and_labels() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let succ = b.successors();
        let labels: Vec<Move> = succ.iter().map(|(_, mv)| *mv).collect();
        // Neighbour above slides down, below slides up, left slides right, right slides left.
        assert_eq!(labels, vec![Move::Down, Move::Up, Move::Right, Move::Left]);

        assert_eq!(succ[0].0.to_rows(), vec![vec![1, 0, 3], vec![4, 2, 5], vec![6, 7, 8]]);
        assert_eq!(succ[1].0.to_rows(), vec![vec![1, 2, 3], vec![4, 7, 5], vec![6, 0, 8]]);
        assert_eq!(succ[2].0.to_rows(), vec![vec![1, 2, 3], vec![0, 4, 5], vec![6, 7, 8]]);
        assert_eq!(succ[3].0.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 0], vec![6, 7, 8]]);
    }

    #[test]
    fn test_successors_do_not_mutate_original() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let before = b.clone();
        let _ = b.successors();
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_move_then_opposite_restores() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        for mv in Move::ALL {
            let moved = b.apply_move(mv).unwrap();
            assert_ne!(moved, b);
            assert_eq!(moved.apply_move(mv.opposite()).unwrap(), b);
        }
    }

    #[test]
    fn test_equality_is_by_content() {
        let a = board(&[&[1, 0], &[2, 3]]);
        let b = Board::goal(2).apply_move(Move::Left).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_random_board_is_solvable_and_deterministic() {
        for seed in 0..20 {
            let a = Board::new_random_with_seed(3, seed).unwrap();
            let b = Board::new_random_with_seed(3, seed).unwrap();
            assert_eq!(a, b);
            assert!(crate::solvability::is_solvable(&a));
        }
        for seed in 0..20 {
            assert!(crate::solvability::is_solvable(
                &Board::new_random_with_seed(4, seed).unwrap()
            ));
        }
        assert_eq!(Board::new_random_with_seed(0, 1), Err(BoardError::Empty));
    }

    #[test]
    fn test_scrambled_board() {
        let a = Board::scrambled_with_seed(4, 30, 7).unwrap();
        assert_eq!(a, Board::scrambled_with_seed(4, 30, 7).unwrap());
        assert!(crate::solvability::is_solvable(&a));
        assert_eq!(Board::scrambled_with_seed(3, 0, 1).unwrap(), Board::goal(3));
        assert_eq!(Board::scrambled_with_seed(1, 5, 1).unwrap(), Board::goal(1));
    }

    #[test]
    fn test_display_board_formatting() {
        let b = board(&[&[2, 3, 7], &[1, 8, 0], &[6, 5, 4]]);
        assert_eq!(b.to_string(), "2 3 7\n1 8 .\n6 5 4");

        let b4 = Board::goal(4);
        assert_eq!(
            b4.to_string(),
            " .  1  2  3\n 4  5  6  7\n 8  9 10 11\n12 13 14 15"
        );
    }

    #[test]
    #[should_panic(expected = "outside 1..=16")]
    fn test_goal_panics_on_zero_size() {
        Board::goal(0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_tile_panics_outside_board() {
        Board::goal(3).tile(3, 0);
    }

    #[test]
    fn test_fallible_constructors_reject_unsupported_sizes() {
        let too_large = MAX_BOARD_SIZE + 1;
        assert_eq!(
            Board::new_random_with_seed(too_large, 1),
            Err(BoardError::TooLarge { size: too_large })
        );
        assert_eq!(Board::scrambled_with_seed(0, 3, 1), Err(BoardError::Empty));
    }

    #[test]
    fn test_move_labels() {
        let labels: Vec<String> = Move::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["up", "down", "left", "right"]);
    }
}
