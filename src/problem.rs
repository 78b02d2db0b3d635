//! The contract every search-compatible state model satisfies.
//!
//! A `Problem` is an immutable snapshot of a domain: it exposes its current
//! state, the fixed set of actions the domain defines, which of them are legal
//! right now, and the transition to a new snapshot. The search engine in
//! `solver` only ever talks to this trait, so it stays domain-agnostic.
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::hash::Hash;

/// Upper bound on reshuffles performed by `Problem::initialize_random` when a
/// shuffle happens to land back on the goal state.
pub const MAX_SHUFFLE_ATTEMPTS: usize = 100;

/// Errors raised by problem construction and state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProblemError {
    /// `invoke` was called with an action for which `can_invoke` is false.
    #[error("action {action} cannot be invoked from the current state")]
    InvalidAction { action: String },
    /// A board needs at least one row and one column.
    #[error("invalid board dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },
    /// A board whose cells do not form a valid tile arrangement.
    #[error("malformed board: {0}")]
    MalformedBoard(String),
    /// Random initialization kept producing the goal state.
    #[error("random shuffle stayed in the goal state after {attempts} attempts")]
    RandomizationStalemate { attempts: usize },
}

/// Actions that can be undone by another action of the same domain.
pub trait Reversible {
    /// Returns the action that cancels `self`.
    fn opposite(self) -> Self;
}

/// A state model the search engine can operate on.
///
/// Implementations must never mutate the receiver in `invoke`: every
/// transition returns a fresh instance so that search nodes can keep their
/// snapshots for path reconstruction.
pub trait Problem: Clone + Sized {
    /// Opaque state value, compared and hashed for duplicate detection.
    type State: Clone + Eq + Hash + fmt::Debug;
    /// One of the domain's closed set of actions.
    type Action: Reversible + Copy + Eq + fmt::Debug + fmt::Display + 'static;
    /// Domain configuration needed to build a goal instance (e.g. board size).
    type Config;

    /// Returns the current state.
    fn state(&self) -> &Self::State;

    /// Returns `true` if the current state satisfies the goal condition.
    fn goal_test(&self) -> bool;

    /// Returns every action the domain defines, independent of the state.
    fn all_actions() -> &'static [Self::Action];

    /// Returns `true` if `action` is legal from the current state.
    fn can_invoke(&self, action: Self::Action) -> bool;

    /// Returns the actions applicable in the current state, in
    /// `all_actions` order.
    fn actions(&self) -> Vec<Self::Action> {
        Self::all_actions()
            .iter()
            .copied()
            .filter(|&action| self.can_invoke(action))
            .collect()
    }

    /// Applies `action` and returns the resulting instance.
    ///
    /// # Errors
    /// `ProblemError::InvalidAction` if `can_invoke(action)` is false.
    fn invoke(&self, action: Self::Action) -> Result<Self, ProblemError>;

    /// Builds an instance that is already in the goal state.
    fn initialize_goal(config: &Self::Config) -> Result<Self, ProblemError>;

    /// Builds a scrambled, non-goal instance.
    ///
    /// Starting from the goal, `iterations` legal actions are applied, each
    /// picked at random but never the inverse of the previous one (unless it is
    /// the only legal move). If the result is still the goal, shuffling
    /// continues, at most `MAX_SHUFFLE_ATTEMPTS` times.
    ///
    /// # Errors
    /// `ProblemError::RandomizationStalemate` when every attempt ends in the
    /// goal state, e.g. with `iterations == 0` or a 1x1 board.
    fn initialize_random<R: Rng + ?Sized>(
        iterations: usize,
        config: &Self::Config,
        rng: &mut R,
    ) -> Result<Self, ProblemError> {
        let mut current = Self::initialize_goal(config)?;
        let mut previous: Option<Self::Action> = None;

        for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
            for _ in 0..iterations {
                let Some(action) = random_action(&current.actions(), previous, rng) else {
                    break;
                };
                current = current.invoke(action)?;
                previous = Some(action);
            }
            if !current.goal_test() {
                return Ok(current);
            }
            log::debug!("shuffle attempt {} ended in the goal state, retrying", attempt);
        }

        Err(ProblemError::RandomizationStalemate {
            attempts: MAX_SHUFFLE_ATTEMPTS,
        })
    }
}

/// Picks a random action from `actions`, avoiding the one that would cancel
/// `previous`. Returns `None` only when `actions` is empty.
fn random_action<A, R>(actions: &[A], previous: Option<A>, rng: &mut R) -> Option<A>
where
    A: Reversible + Copy + Eq,
    R: Rng + ?Sized,
{
    let cancelling = previous.map(Reversible::opposite);
    let candidates: Vec<A> = actions
        .iter()
        .copied()
        .filter(|&action| Some(action) != cancelling)
        .collect();

    if candidates.is_empty() {
        actions.choose(rng).copied()
    } else {
        candidates.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Action, BoardSize, Puzzle};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_actions_filters_through_can_invoke() {
        let goal = Puzzle::initialize_goal(&BoardSize::new(3, 3).unwrap()).unwrap();
        // Empty cell sits in the bottom-right corner.
        assert_eq!(goal.actions(), vec![Action::Up, Action::Left]);
    }

    /// Legal actions seen through the trait alone, without naming the domain.
    fn legal_actions<P: Problem>(problem: &P) -> Vec<P::Action> {
        problem.actions()
    }

    #[test]
    fn test_actions_through_generic_problem() {
        let goal = Puzzle::initialize_goal(&BoardSize::new(2, 2).unwrap()).unwrap();
        assert_eq!(legal_actions(&goal), vec![Action::Up, Action::Left]);
        let moved = goal.invoke(Action::Up).unwrap();
        assert_eq!(legal_actions(&moved), vec![Action::Down, Action::Left]);
    }

    #[test]
    fn test_random_action_never_cancels_previous() {
        let mut rng = SmallRng::seed_from_u64(7);
        let actions = [Action::Up, Action::Right, Action::Down];
        for _ in 0..200 {
            let picked = random_action(&actions, Some(Action::Up), &mut rng).unwrap();
            assert_ne!(picked, Action::Down);
        }
    }

    #[test]
    fn test_random_action_falls_back_to_only_move() {
        let mut rng = SmallRng::seed_from_u64(7);
        let picked = random_action(&[Action::Down], Some(Action::Up), &mut rng);
        assert_eq!(picked, Some(Action::Down));
        assert_eq!(random_action::<Action, _>(&[], None, &mut rng), None);
    }

    #[test]
    fn test_initialize_random_is_not_goal() {
        let size = BoardSize::new(3, 3).unwrap();
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let puzzle = Puzzle::initialize_random(15, &size, &mut rng).unwrap();
            assert!(!puzzle.goal_test());
        }
    }

    #[test]
    fn test_initialize_random_is_reproducible_with_seed() {
        let size = BoardSize::new(4, 4).unwrap();
        let a = Puzzle::initialize_random(30, &size, &mut SmallRng::seed_from_u64(42)).unwrap();
        let b = Puzzle::initialize_random(30, &size, &mut SmallRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_initialize_random_zero_iterations_is_stalemate() {
        let size = BoardSize::new(3, 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let result = Puzzle::initialize_random(0, &size, &mut rng);
        assert_eq!(
            result.unwrap_err(),
            ProblemError::RandomizationStalemate {
                attempts: MAX_SHUFFLE_ATTEMPTS
            }
        );
    }

    #[test]
    fn test_initialize_random_single_cell_board_is_stalemate() {
        let size = BoardSize::new(1, 1).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let result = Puzzle::initialize_random(10, &size, &mut rng);
        assert!(matches!(
            result,
            Err(ProblemError::RandomizationStalemate { .. })
        ));
    }
}
