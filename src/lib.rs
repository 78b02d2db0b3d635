//! # Eight Puzzle Library
//!
//! This library provides a generic best-first (A*) state-space search engine
//! and instantiates it on the sliding-tile puzzle (8-puzzle, 15-puzzle and
//! any other rectangular board).
//!
//! It is used by three binaries:
//! - `ai_solver`: Scrambles a board (or loads one from a file), searches for an
//!   optimal solution and prints every step.
//! - `human_player`: Allows interactive play via the command line.
//! - `heuristic_evaluator`: Compares how many nodes each heuristic expands.
//!
//! ## Modules
//! - `problem`: The `Problem` trait every search-compatible state model implements,
//!   plus randomized initialization and the shared `ProblemError`.
//! - `engine`: The sliding-tile model (`Board`, `Action`, `Puzzle`).
//! - `heuristics`: Admissible estimates of the remaining moves to the goal.
//! - `solver`: The A* engine (`a_star`, `Node`, `flatten_solution`).
//! - `utils`: Parsing boards from text and checking solvability.

pub mod engine;
pub mod heuristics;
pub mod problem;
pub mod solver;
pub mod utils;
