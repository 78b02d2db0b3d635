use clap::Parser;
use eight_puzzle::engine::{BoardSize, Puzzle};
use eight_puzzle::heuristics::Heuristic;
use eight_puzzle::solver::{a_star_with_config, SearchConfig};
use std::collections::HashMap;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare heuristics on seeded boards.", long_about = None)]
struct Args {
    /// Number of boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board `n` uses `start_seed + n`
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Number of iterations to shuffle each board
    #[clap(short, long, default_value_t = 30)]
    iterations: usize,

    /// Width of the board
    #[clap(long, default_value_t = 3)]
    width: usize,

    /// Height of the board
    #[clap(long, default_value_t = 3)]
    height: usize,

    /// Give up on a board after expanding this many nodes
    #[clap(long)]
    max_expansions: Option<usize>,
}

fn main() {
    let args = Args::parse();
    env_logger::init();

    let size = match BoardSize::new(args.width, args.height) {
        Ok(size) => size,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let config = SearchConfig {
        max_expansions: args.max_expansions,
    };

    let mut all_expansions: HashMap<Heuristic, Vec<usize>> = HashMap::new();

    println!("Starting heuristic evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        let puzzle = match Puzzle::random(size, args.iterations, Some(seed)) {
            Ok(puzzle) => puzzle,
            Err(e) => {
                eprintln!("Skipping board {} (Seed: {}): {}", board_idx, seed, e);
                continue;
            }
        };

        println!("\nEvaluating Board {} (Seed: {})", board_idx, seed);

        for heuristic in Heuristic::ALL {
            match a_star_with_config(puzzle.clone(), |p: &Puzzle| heuristic.evaluate(p), &config) {
                Ok(solution) => {
                    println!(
                        "  Heuristic: {:<10}, Moves: {:<4}, Expanded: {:<8}, Generated: {}",
                        heuristic,
                        solution.node.depth(),
                        solution.stats.expanded,
                        solution.stats.generated
                    );
                    all_expansions
                        .entry(heuristic)
                        .or_default()
                        .push(solution.stats.expanded);
                }
                Err(e) => {
                    eprintln!("  Heuristic: {:<10}, failed: {}", heuristic, e);
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Average Expanded Nodes ---");

    let mut averages: Vec<(Heuristic, f64)> = all_expansions
        .iter()
        .filter(|(_, counts)| !counts.is_empty())
        .map(|(&heuristic, counts)| {
            let total: usize = counts.iter().sum();
            (heuristic, total as f64 / counts.len() as f64)
        })
        .collect();

    // Fewest expansions first.
    averages.sort_by(|a, b| a.1.total_cmp(&b.1));

    for (heuristic, average) in averages {
        println!("Heuristic {:<10}: Average Expanded = {:.2}", heuristic, average);
    }
}
