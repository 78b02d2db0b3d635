//! Sliding-tile puzzle model.
//!
//! This module defines the puzzle's fundamental components:
//! - `Action`: The four directions in which the empty cell can move.
//! - `Board`: The tile arrangement, stored as a mapping from each cell to the
//!   home cell of the tile currently occupying it (`None` for the empty cell).
//! - `Puzzle`: The `Problem` implementation the search engine operates on.
use crate::problem::{Problem, ProblemError, Reversible};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fmt;

/// A board cell as `(row, column)`, with `(0, 0)` in the top-left corner.
pub type Position = (usize, usize);

/// Direction in which to move the empty cell.
///
/// Moving the empty cell is the same as sliding the neighbouring tile in the
/// opposite direction into the gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the empty cell one row up.
    Up,
    /// Move the empty cell one column right.
    Right,
    /// Move the empty cell one row down.
    Down,
    /// Move the empty cell one column left.
    Left,
}

impl Action {
    /// Every action, in the order the search engine tries them.
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Returns the action that cancels this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use eight_puzzle::engine::Action;
    /// assert_eq!(Action::Up.opposite(), Action::Down);
    /// assert_eq!(Action::Left.opposite(), Action::Right);
    /// ```
    pub fn opposite(self) -> Self {
        match self {
            Action::Up => Action::Down,
            Action::Right => Action::Left,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
        }
    }

    /// Returns the cell reached by moving from `pos` in this direction, or
    /// `None` if that would leave a `width` x `height` board.
    fn step(self, pos: Position, width: usize, height: usize) -> Option<Position> {
        let (row, col) = pos;
        match self {
            Action::Up if row > 0 => Some((row - 1, col)),
            Action::Right if col + 1 < width => Some((row, col + 1)),
            Action::Down if row + 1 < height => Some((row + 1, col)),
            Action::Left if col > 0 => Some((row, col - 1)),
            _ => None,
        }
    }
}

impl Reversible for Action {
    fn opposite(self) -> Self {
        Action::opposite(self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "UP",
            Action::Right => "RIGHT",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
        };
        write!(f, "{}", name)
    }
}

/// Width and height of a board, validated to be non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardSize {
    width: usize,
    height: usize,
}

impl BoardSize {
    /// Creates a board size.
    ///
    /// # Errors
    /// `ProblemError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, ProblemError> {
        if width == 0 || height == 0 {
            return Err(ProblemError::InvalidDimensions { width, height });
        }
        Ok(BoardSize { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// The arrangement of tiles on a `width` x `height` board.
///
/// Each cell maps to the home cell of the tile currently sitting there, or to
/// `None` for the single empty cell. The home values of the non-empty cells
/// cover every cell except the bottom-right one exactly once; the bottom-right
/// cell is where the empty cell belongs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major cells.
    cells: Vec<Option<Position>>,
}

impl Board {
    /// Creates the solved board: every cell maps to itself except the
    /// bottom-right one, which is empty.
    ///
    /// # Examples
    /// ```
    /// use eight_puzzle::engine::{Board, BoardSize};
    /// let board = Board::goal(BoardSize::new(3, 3).unwrap());
    /// assert_eq!(board.get((1, 2)), Some((1, 2)));
    /// assert_eq!(board.get((2, 2)), None);
    /// ```
    pub fn goal(size: BoardSize) -> Self {
        let (width, height) = (size.width, size.height);
        let mut cells: Vec<Option<Position>> = (0..height)
            .flat_map(|row| (0..width).map(move |col| Some((row, col))))
            .collect();
        cells[width * height - 1] = None;
        Board {
            width,
            height,
            cells,
        }
    }

    /// Creates a board from row-major cells.
    ///
    /// # Arguments
    /// * `width`, `height`: Dimensions of the board.
    /// * `cells`: `width * height` entries, each the home cell of the tile in
    ///   that position or `None` for the empty cell.
    ///
    /// # Errors
    /// * `ProblemError::InvalidDimensions` if either dimension is zero.
    /// * `ProblemError::MalformedBoard` if the cell count is wrong, there is
    ///   not exactly one empty cell, or the home cells are out of range,
    ///   repeated, or include the empty cell's home.
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<Option<Position>>,
    ) -> Result<Self, ProblemError> {
        BoardSize::new(width, height)?;
        if cells.len() != width * height {
            return Err(ProblemError::MalformedBoard(format!(
                "expected {} cells for a {}x{} board, found {}",
                width * height,
                width,
                height,
                cells.len()
            )));
        }

        let empty_count = cells.iter().filter(|cell| cell.is_none()).count();
        if empty_count != 1 {
            return Err(ProblemError::MalformedBoard(format!(
                "expected exactly one empty cell, found {}",
                empty_count
            )));
        }

        let empty_home = (height - 1, width - 1);
        let mut seen = vec![false; width * height];
        for &(row, col) in cells.iter().flatten() {
            if row >= height || col >= width || (row, col) == empty_home {
                return Err(ProblemError::MalformedBoard(format!(
                    "tile home ({}, {}) is not a valid tile position",
                    row, col
                )));
            }
            let idx = row * width + col;
            if seen[idx] {
                return Err(ProblemError::MalformedBoard(format!(
                    "tile home ({}, {}) appears more than once",
                    row, col
                )));
            }
            seen[idx] = true;
        }

        Ok(Board {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the home cell of the tile at `pos`, or `None` if `pos` is the
    /// empty cell.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn get(&self, pos: Position) -> Option<Position> {
        assert!(
            pos.0 < self.height && pos.1 < self.width,
            "position {:?} is outside a {}x{} board",
            pos,
            self.width,
            self.height
        );
        self.cells[self.index(pos)]
    }

    /// Iterates over `(cell, home)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Option<Position>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &home)| ((idx / self.width, idx % self.width), home))
    }

    /// Returns the position of the empty cell (linear scan).
    pub fn empty_position(&self) -> Position {
        match self.cells.iter().position(Option::is_none) {
            Some(idx) => (idx / self.width, idx % self.width),
            None => unreachable!("board constructors guarantee exactly one empty cell"),
        }
    }

    /// Returns the cell the empty cell belongs in: the bottom-right corner.
    pub fn home_of_empty(&self) -> Position {
        (self.height - 1, self.width - 1)
    }

    /// Returns the linear index used to display a tile whose home is `home`.
    pub fn tile_index(&self, home: Position) -> usize {
        self.width * home.0 + home.1
    }

    fn index(&self, pos: Position) -> usize {
        pos.0 * self.width + pos.1
    }

    /// Returns a copy of the board with the empty cell swapped with `to`.
    fn with_empty_moved(&self, from: Position, to: Position) -> Board {
        let mut cells = self.cells.clone();
        cells.swap(self.index(from), self.index(to));
        Board {
            width: self.width,
            height: self.height,
            cells,
        }
    }
}

impl fmt::Display for Board {
    /// Renders one line per row, tiles as their linear index and the empty
    /// cell as `-`, separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.width {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.cells[self.index((row, col))] {
                    Some(home) => write!(f, "{}", self.tile_index(home))?,
                    None => write!(f, "-")?,
                }
            }
        }
        Ok(())
    }
}

/// The sliding-tile puzzle as a search problem.
///
/// A `Puzzle` is an immutable snapshot; `invoke` returns a new instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Puzzle {
    board: Board,
}

impl Puzzle {
    pub fn new(board: Board) -> Self {
        Puzzle { board }
    }

    /// Builds a scrambled, non-goal puzzle of the given size.
    ///
    /// With a `seed` the scramble is reproducible; without one the thread-local
    /// random source is used.
    ///
    /// # Errors
    /// Propagates `ProblemError` from `Problem::initialize_random`.
    pub fn random(
        size: BoardSize,
        iterations: usize,
        seed: Option<u64>,
    ) -> Result<Self, ProblemError> {
        match seed {
            Some(seed) => {
                let mut rng = SmallRng::seed_from_u64(seed);
                Self::initialize_random(iterations, &size, &mut rng)
            }
            None => Self::initialize_random(iterations, &size, &mut rand::thread_rng()),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn width(&self) -> usize {
        self.board.width
    }

    pub fn height(&self) -> usize {
        self.board.height
    }
}

impl Problem for Puzzle {
    type State = Board;
    type Action = Action;
    type Config = BoardSize;

    fn state(&self) -> &Board {
        &self.board
    }

    fn goal_test(&self) -> bool {
        let empty_home = self.board.home_of_empty();
        self.board.iter().all(|(pos, home)| match home {
            Some(home) => home == pos,
            None => pos == empty_home,
        })
    }

    fn all_actions() -> &'static [Action] {
        &Action::ALL
    }

    fn can_invoke(&self, action: Action) -> bool {
        action
            .step(self.board.empty_position(), self.width(), self.height())
            .is_some()
    }

    fn invoke(&self, action: Action) -> Result<Self, ProblemError> {
        let empty = self.board.empty_position();
        let Some(dest) = action.step(empty, self.width(), self.height()) else {
            return Err(ProblemError::InvalidAction {
                action: action.to_string(),
            });
        };
        Ok(Puzzle {
            board: self.board.with_empty_moved(empty, dest),
        })
    }

    fn initialize_goal(config: &BoardSize) -> Result<Self, ProblemError> {
        Ok(Puzzle {
            board: Board::goal(*config),
        })
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    fn goal(width: usize, height: usize) -> Puzzle {
        Puzzle::initialize_goal(&BoardSize::new(width, height).unwrap()).unwrap()
    }

    #[test]
    fn test_board_size_rejects_zero() {
        assert_eq!(
            BoardSize::new(0, 3),
            Err(ProblemError::InvalidDimensions {
                width: 0,
                height: 3
            })
        );
        assert!(BoardSize::new(3, 0).is_err());
    }

    #[test]
    fn test_goal_board_mapping() {
        let puzzle = goal(3, 3);
        for (pos, home) in puzzle.board().iter() {
            if pos == (2, 2) {
                assert_eq!(home, None);
            } else {
                assert_eq!(home, Some(pos));
            }
        }
        assert_eq!(puzzle.board().empty_position(), (2, 2));
    }

    #[test]
    fn test_goal_test_on_goal_boards() {
        for (w, h) in [(1, 1), (2, 2), (3, 3), (4, 4), (4, 3), (2, 5)] {
            assert!(goal(w, h).goal_test(), "{}x{} goal board", w, h);
        }
    }

    #[test]
    fn test_single_move_leaves_goal() {
        for (w, h) in [(2, 2), (3, 3), (4, 4), (3, 2)] {
            let puzzle = goal(w, h);
            for action in puzzle.actions() {
                assert!(!puzzle.invoke(action).unwrap().goal_test());
            }
        }
    }

    #[test]
    fn test_can_invoke_in_corners() {
        let puzzle = goal(3, 3);
        assert!(puzzle.can_invoke(Action::Up));
        assert!(puzzle.can_invoke(Action::Left));
        assert!(!puzzle.can_invoke(Action::Down));
        assert!(!puzzle.can_invoke(Action::Right));

        let top_left = puzzle
            .invoke(Action::Up)
            .and_then(|p| p.invoke(Action::Up))
            .and_then(|p| p.invoke(Action::Left))
            .and_then(|p| p.invoke(Action::Left))
            .unwrap();
        assert_eq!(top_left.board().empty_position(), (0, 0));
        assert_eq!(top_left.actions(), vec![Action::Right, Action::Down]);
    }

    #[test]
    fn test_invoke_swaps_empty_and_tile() {
        let puzzle = goal(3, 3);
        let moved = puzzle.invoke(Action::Left).unwrap();
        assert_eq!(moved.board().get((2, 1)), None);
        assert_eq!(moved.board().get((2, 2)), Some((2, 1)));
        // The receiver is untouched.
        assert!(puzzle.goal_test());
    }

    #[test]
    fn test_invoke_invalid_action_is_error() {
        let puzzle = goal(3, 3);
        let err = puzzle.invoke(Action::Down).unwrap_err();
        assert_eq!(
            err,
            ProblemError::InvalidAction {
                action: "DOWN".to_string()
            }
        );
    }

    #[test]
    fn test_action_round_trip_restores_state() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut puzzle = goal(4, 3);
        for _ in 0..200 {
            for action in puzzle.actions() {
                let back = puzzle
                    .invoke(action)
                    .and_then(|p| p.invoke(action.opposite()))
                    .unwrap();
                assert_eq!(back.state(), puzzle.state());
            }
            let action = *puzzle.actions().choose(&mut rng).unwrap();
            puzzle = puzzle.invoke(action).unwrap();
        }
    }

    #[test]
    fn test_display_goal_board() {
        assert_eq!(goal(3, 3).to_string(), "0 1 2\n3 4 5\n6 7 -");
        assert_eq!(goal(4, 2).to_string(), "0 1 2 3\n4 5 6 -");
    }

    #[test]
    fn test_display_after_move() {
        let puzzle = goal(3, 3).invoke(Action::Up).unwrap();
        assert_eq!(puzzle.to_string(), "0 1 2\n3 4 -\n6 7 5");
    }

    #[test]
    fn test_action_display() {
        let names: Vec<String> = Action::ALL.iter().map(|a| a.to_string()).collect();
        assert_eq!(names, vec!["UP", "RIGHT", "DOWN", "LEFT"]);
    }

    #[test]
    fn test_from_cells_valid() {
        let cells = vec![Some((0, 1)), None, Some((1, 0)), Some((0, 0))];
        let board = Board::from_cells(2, 2, cells).unwrap();
        assert_eq!(board.empty_position(), (0, 1));
        assert_eq!(board.get((1, 1)), Some((0, 0)));
    }

    #[test]
    fn test_from_cells_rejects_malformed() {
        // Wrong cell count.
        assert!(Board::from_cells(2, 2, vec![None, Some((0, 0)), Some((0, 1))]).is_err());
        // Two empty cells.
        assert!(Board::from_cells(2, 2, vec![None, None, Some((0, 0)), Some((0, 1))]).is_err());
        // Duplicate home.
        assert!(
            Board::from_cells(2, 2, vec![None, Some((0, 0)), Some((0, 0)), Some((0, 1))]).is_err()
        );
        // Home of the empty cell used by a tile.
        assert!(
            Board::from_cells(2, 2, vec![None, Some((0, 0)), Some((1, 1)), Some((0, 1))]).is_err()
        );
        // Out-of-range home.
        assert!(
            Board::from_cells(2, 2, vec![None, Some((0, 0)), Some((5, 0)), Some((0, 1))]).is_err()
        );
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        goal(3, 3).board().get((3, 0));
    }

    #[test]
    fn test_random_puzzle_with_seed() {
        let size = BoardSize::new(3, 3).unwrap();
        let a = Puzzle::random(size, 20, Some(9)).unwrap();
        let b = Puzzle::random(size, 20, Some(9)).unwrap();
        assert_eq!(a, b);
        assert!(!a.goal_test());
        assert!(!Puzzle::random(size, 20, None).unwrap().goal_test());
    }
}
