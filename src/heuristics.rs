use crate::engine::{Position, Puzzle};
use std::fmt;

/// Counts the tiles that are not in their home cell.
///
/// The empty cell is not a tile and is skipped; counting it would score a
/// board one move from the goal as 2 and break admissibility.
///
/// # Arguments
/// * `puzzle`: The puzzle state to evaluate.
///
/// # Returns
/// The number of misplaced tiles, a lower bound on the moves to the goal.
///
/// # Examples
/// ```
/// use eight_puzzle::engine::{Action, BoardSize, Puzzle};
/// use eight_puzzle::heuristics::misplaced_tiles;
/// use eight_puzzle::problem::Problem;
///
/// let goal = Puzzle::initialize_goal(&BoardSize::new(3, 3).unwrap()).unwrap();
/// assert_eq!(misplaced_tiles(&goal), 0);
/// assert_eq!(misplaced_tiles(&goal.invoke(Action::Left).unwrap()), 1);
/// ```
pub fn misplaced_tiles(puzzle: &Puzzle) -> u32 {
    puzzle
        .board()
        .iter()
        .filter(|&(pos, home)| home.is_some_and(|home| home != pos))
        .count() as u32
}

/// Sums the Manhattan distances between every tile and its home cell.
///
/// Each move shifts exactly one tile by one cell, so the sum never exceeds
/// the true number of moves left. The empty cell is skipped for the same
/// reason as in `misplaced_tiles`.
///
/// # Arguments
/// * `puzzle`: The puzzle state to evaluate.
///
/// # Returns
/// The sum of `|row difference| + |column difference|` over all tiles.
pub fn manhattan_distance(puzzle: &Puzzle) -> u32 {
    puzzle
        .board()
        .iter()
        .filter_map(|(pos, home)| home.map(|home| tile_distance(pos, home)))
        .sum()
}

/// Manhattan distance for one tile, i.e. the distance from its current cell to
/// the cell where it belongs.
fn tile_distance(a: Position, b: Position) -> u32 {
    (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}

/// Runtime selection of a heuristic, e.g. from a command-line flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    /// `misplaced_tiles`
    Misplaced,
    /// `manhattan_distance`
    Manhattan,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::Misplaced, Heuristic::Manhattan];

    /// Evaluates the selected heuristic on `puzzle`.
    pub fn evaluate(self, puzzle: &Puzzle) -> u32 {
        match self {
            Heuristic::Misplaced => misplaced_tiles(puzzle),
            Heuristic::Manhattan => manhattan_distance(puzzle),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Misplaced => f.pad("misplaced"),
            Heuristic::Manhattan => f.pad("manhattan"),
        }
    }
}
