use crate::engine::{Board, Position};
use crate::problem::ProblemError;

/// Parses an array of string slices into a `Board`.
///
/// Each string slice is one row, starting from the top. Cells are separated by
/// whitespace; a number is the linear index of the tile (`width * home_row +
/// home_col`, as printed by `Board`'s `Display`) and `-` marks the empty cell.
/// Blank lines are ignored, so the output of `Board::to_string` parses back.
///
/// # Arguments
/// * `rows`: The rows of the board.
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(ProblemError::MalformedBoard)` if:
///     - No rows are given, or the rows have different widths.
///     - A cell is neither a number nor `-`.
///     - The tiles do not form a valid arrangement (see `Board::from_cells`).
///
/// # Examples
/// ```
/// use eight_puzzle::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 2 -", "0 4 5", "3 6 7"]).unwrap();
/// assert_eq!(board.get((0, 0)), Some((0, 1)));
/// assert_eq!(board.empty_position(), (0, 2));
///
/// assert!(board_from_str_array(&["1 2 x"]).is_err());
/// ```
pub fn board_from_str_array(rows: &[&str]) -> Result<Board, ProblemError> {
    let grid: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.split_whitespace().collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    let height = grid.len();
    let width = grid.first().map_or(0, Vec::len);
    if height == 0 {
        return Err(ProblemError::MalformedBoard("no rows given".to_string()));
    }

    let mut cells: Vec<Option<Position>> = Vec::with_capacity(width * height);
    for (r, row) in grid.iter().enumerate() {
        if row.len() != width {
            return Err(ProblemError::MalformedBoard(format!(
                "row {} has {} cells, expected {}",
                r,
                row.len(),
                width
            )));
        }
        for (c, token) in row.iter().enumerate() {
            if *token == "-" {
                cells.push(None);
                continue;
            }
            let index: usize = token.parse().map_err(|_| {
                ProblemError::MalformedBoard(format!(
                    "unrecognized cell '{}' in row {} col {}",
                    token, r, c
                ))
            })?;
            cells.push(Some((index / width, index % width)));
        }
    }

    Board::from_cells(width, height, cells)
}

/// Checks whether the goal can be reached from `board`.
///
/// Reading the tiles in row-major order (skipping the empty cell), every move
/// either keeps the number of inversions or, on boards with even width,
/// changes it by an odd amount while moving the empty cell one row. The goal
/// has no inversions and the empty cell in the bottom row, so:
/// - odd width: solvable iff the inversion count is even;
/// - even width: solvable iff inversions plus the empty cell's row distance
///   from the bottom is even.
///
/// Boards of width or height 1 only reach the arrangements obtained by
/// sliding along the line, which all have zero inversions.
pub fn is_solvable(board: &Board) -> bool {
    let tiles: Vec<usize> = board
        .iter()
        .filter_map(|(_, home)| home.map(|home| board.tile_index(home)))
        .collect();

    let inversions: usize = tiles
        .iter()
        .enumerate()
        .map(|(i, &tile)| tiles[i + 1..].iter().filter(|&&later| later < tile).count())
        .sum();

    if board.width() == 1 || board.height() == 1 {
        return inversions == 0;
    }

    let (empty_row, _) = board.empty_position();
    let rows_from_bottom = board.height() - 1 - empty_row;
    if board.width() % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + rows_from_bottom) % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BoardSize, Puzzle};
    use crate::problem::Problem;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_board_from_str_array_goal() {
        let board = board_from_str_array(&["0 1 2", "3 4 5", "6 7 -"]).unwrap();
        assert_eq!(board, Board::goal(BoardSize::new(3, 3).unwrap()));
    }

    #[test]
    fn test_board_from_str_array_round_trips_display() {
        let size = BoardSize::new(4, 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(17);
        let puzzle = Puzzle::initialize_random(30, &size, &mut rng).unwrap();
        let text = puzzle.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(&board_from_str_array(&rows).unwrap(), puzzle.board());
    }

    #[test]
    fn test_board_from_str_array_skips_blank_lines() {
        let board = board_from_str_array(&["", "0 1", "  ", "2 -", ""]).unwrap();
        assert_eq!(board.width(), 2);
        assert_eq!(board.height(), 2);
    }

    #[test]
    fn test_board_from_str_array_invalid_token() {
        let err = board_from_str_array(&["0 1 2", "3 x 5", "6 7 -"]).unwrap_err();
        assert!(err.to_string().contains("unrecognized cell 'x' in row 1 col 1"));
    }

    #[test]
    fn test_board_from_str_array_ragged_rows() {
        let err = board_from_str_array(&["0 1 2", "3 4", "5 6 -"]).unwrap_err();
        assert!(err.to_string().contains("row 1 has 2 cells, expected 3"));
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        assert!(board_from_str_array(&[]).is_err());
    }

    #[test]
    fn test_board_from_str_array_rejects_bad_tiles() {
        // 8 is the empty cell's home on a 3x3 board.
        assert!(board_from_str_array(&["0 1 2", "3 4 5", "6 8 -"]).is_err());
        // Repeated tile.
        assert!(board_from_str_array(&["0 1 2", "3 4 5", "6 6 -"]).is_err());
        // No empty cell.
        assert!(board_from_str_array(&["0 1 2", "3 4 5", "6 7 1"]).is_err());
    }

    #[test]
    fn test_shuffled_boards_are_solvable() {
        for (w, h) in [(3, 3), (4, 4), (4, 3), (2, 5), (1, 4), (5, 1)] {
            let size = BoardSize::new(w, h).unwrap();
            let mut rng = SmallRng::seed_from_u64(w as u64 * 31 + h as u64);
            for _ in 0..20 {
                let puzzle = Puzzle::initialize_random(25, &size, &mut rng).unwrap();
                assert!(is_solvable(puzzle.board()), "{}x{}:\n{}", w, h, puzzle);
            }
        }
    }

    #[test]
    fn test_swapped_tiles_are_unsolvable() {
        let odd = board_from_str_array(&["1 0 2", "3 4 5", "6 7 -"]).unwrap();
        assert!(!is_solvable(&odd));

        let even = board_from_str_array(&["1 0 2 3", "4 5 6 7", "8 9 10 11", "12 13 14 -"]).unwrap();
        assert!(!is_solvable(&even));

        let line = board_from_str_array(&["1 0 -"]).unwrap();
        assert!(!is_solvable(&line));
    }
}
