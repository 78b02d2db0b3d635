use clap::Parser;
use eight_puzzle::engine::{Action, BoardSize, Puzzle};
use eight_puzzle::problem::Problem;
use std::io::{self, Write};
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the sliding-tile puzzle.", long_about = None)]
struct Args {
    /// Number of iterations to shuffle the solution before playing
    #[clap(short, long, default_value_t = 15)]
    iterations: usize,

    /// Width of the board
    #[clap(long, default_value_t = 3)]
    width: usize,

    /// Height of the board
    #[clap(long, default_value_t = 3)]
    height: usize,

    /// Seed for the shuffle
    #[clap(long)]
    seed: Option<u64>,
}

fn parse_action(input: &str) -> Option<Action> {
    match input {
        "w" => Some(Action::Up),
        "a" => Some(Action::Left),
        "s" => Some(Action::Down),
        "d" => Some(Action::Right),
        _ => None,
    }
}

fn main() {
    let args = Args::parse();
    env_logger::init();

    let mut puzzle = match BoardSize::new(args.width, args.height)
        .and_then(|size| Puzzle::random(size, args.iterations, args.seed))
    {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Failed to create a board: {}", e);
            process::exit(1);
        }
    };
    let mut moves = 0;

    loop {
        println!("\n{}", puzzle);

        if puzzle.goal_test() {
            println!("\nSolved in {} moves!", moves);
            break;
        }

        print!("\nType W for UP, A for LEFT, S for DOWN, D for RIGHT or Q to quit: ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim().to_lowercase();
        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        let Some(action) = parse_action(&trimmed_input) else {
            continue;
        };
        match puzzle.invoke(action) {
            Ok(next) => {
                puzzle = next;
                moves += 1;
            }
            Err(e) => println!("Invalid move: {}", e),
        }
    }
}
