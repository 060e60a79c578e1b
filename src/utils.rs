use crate::engine::{Board, BoardError};
use thiserror::Error;

/// Errors produced while reading a board from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A cell is neither an integer nor a blank marker.
    #[error("unrecognized cell '{cell}' in row {row} col {col}")]
    InvalidCell { row: usize, col: usize, cell: String },

    /// The cells parsed, but they do not form a valid board.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Parses text rows into a grid of integers without validating the board.
///
/// Each string slice is one row. Cells are separated by whitespace and/or commas. The blank
/// may be written as `0`, `_` or `.`. Empty rows and rows starting with `#` are skipped.
/// The grid's shape and values are left for [`Board::from_rows`] to check.
///
/// # Errors
/// `ParseError::InvalidCell` if a cell is not an integer or a blank marker. Row and column
/// indices in the error count only the rows that were kept.
pub fn rows_from_str_array(s: &[&str]) -> Result<Vec<Vec<i64>>, ParseError> {
    let mut rows = Vec::new();

    for line in s.iter().map(|l| l.trim()) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = rows.len();
        let cells = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|cell| !cell.is_empty())
            .enumerate()
            .map(|(col, cell)| match cell {
                "_" | "." => Ok(0),
                _ => cell.parse::<i64>().map_err(|_| ParseError::InvalidCell {
                    row,
                    col,
                    cell: cell.to_string(),
                }),
            })
            .collect::<Result<Vec<i64>, ParseError>>()?;
        rows.push(cells);
    }

    Ok(rows)
}

/// Parses an array of string slices into a validated `Board`.
///
/// See [`rows_from_str_array`] for the accepted format.
///
/// # Errors
/// * `ParseError::InvalidCell` for a cell that is not a number or blank marker.
/// * `ParseError::Board` if the parsed grid is empty, not square, or not a permutation of
///   `0..n²`.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["2 3 7", "1 8 _", "6 5 4"]).unwrap();
/// assert_eq!(board.size(), 3);
/// assert_eq!(board.locate_blank(), (1, 2));
///
/// assert!(board_from_str_array(&["1 2 x"]).is_err());
/// assert!(board_from_str_array(&["0 1", "2"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseError> {
    let rows = rows_from_str_array(s)?;
    Ok(Board::from_rows(&rows)?)
}

/// Parses a multi-line string into a validated `Board`, one row per line.
pub fn parse_board(text: &str) -> Result<Board, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    board_from_str_array(&lines)
}
