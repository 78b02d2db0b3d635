use clap::{ArgAction, Parser};
use eight_puzzle::engine::{BoardSize, Puzzle};
use eight_puzzle::heuristics::Heuristic;
use eight_puzzle::problem::Problem;
use eight_puzzle::solver::{a_star_with_config, flatten_solution, SearchConfig};
use eight_puzzle::utils::{board_from_str_array, is_solvable};
use log::LevelFilter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Sliding-tile puzzle solver.", long_about = None)]
struct Args {
    /// Number of iterations to shuffle the solution before searching
    #[clap(short, long, default_value_t = 15)]
    iterations: usize,

    /// Width of the board
    #[clap(long, default_value_t = 3)]
    width: usize,

    /// Height of the board
    #[clap(long, default_value_t = 3)]
    height: usize,

    /// Heuristic guiding the search
    #[clap(long, value_enum, default_value_t = Heuristic::Manhattan)]
    heuristic: Heuristic,

    /// Seed for the shuffle; omit for a different board on every run
    #[clap(long)]
    seed: Option<u64>,

    /// Give up after expanding this many nodes
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Be verbose; repeat (`-vv`) to be even more verbose
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Same as `-vv`
    #[clap(long)]
    debug: bool,

    /// Solve the board in this file instead of a shuffled one
    /// (rows of tile indices, `-` for the empty cell)
    board_file: Option<PathBuf>,
}

fn log_level(args: &Args) -> LevelFilter {
    match (args.debug, args.verbose) {
        (true, _) | (_, 2..=u8::MAX) => LevelFilter::Debug,
        (_, 1) => LevelFilter::Info,
        _ => LevelFilter::Warn,
    }
}

fn setup_logging(args: &Args) {
    env_logger::Builder::new()
        .filter_level(log_level(args))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn read_board_file(path: &Path) -> Result<Puzzle, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    let lines: Vec<&str> = content.lines().collect();
    let board = board_from_str_array(&lines).map_err(|e| format!("Invalid board format: {}", e))?;
    if !is_solvable(&board) {
        return Err("Board cannot reach the goal arrangement".to_string());
    }
    Ok(Puzzle::new(board))
}

fn initial_puzzle(args: &Args) -> Result<Puzzle, String> {
    match &args.board_file {
        Some(path) => read_board_file(path)
            .map_err(|e| format!("Failed to load board from {}: {}", path.display(), e)),
        None => {
            let size = BoardSize::new(args.width, args.height).map_err(|e| e.to_string())?;
            Puzzle::random(size, args.iterations, args.seed).map_err(|e| e.to_string())
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let puzzle = match initial_puzzle(&args) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    println!("{}", puzzle);

    println!("\nSearching for solution ..");
    let config = SearchConfig {
        max_expansions: args.max_expansions,
    };
    let heuristic = args.heuristic;
    let solution = match a_star_with_config(puzzle, |p: &Puzzle| heuristic.evaluate(p), &config) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            process::exit(1);
        }
    };

    println!("\nFound following solution:\n");
    let path = flatten_solution(&solution.node);
    for (action, state) in &path {
        println!("{}", state);
        println!("{}", action);
        println!();
    }
    println!(
        "{} moves, {} nodes expanded ({} heuristic).",
        path.len(),
        solution.stats.expanded,
        heuristic
    );

    assert!(solution.node.problem().goal_test());
}
