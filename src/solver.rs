//! A* graph search over any `Problem`.
//!
//! The frontier is a binary heap ordered by `f = g + h` next to a state-keyed
//! index that holds the cheapest known node for every frontier state. When a
//! cheaper path to a frontier state turns up, the index entry is replaced and
//! the old heap entry is skipped once it surfaces. Expanded states go into the
//! explored set and are never reopened.
use crate::problem::{Problem, ProblemError};
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// Cost of a single action; every move counts the same.
pub const STEP_COST: u32 = 1;

const PROGRESS_LOG_INTERVAL: usize = 100;

/// Errors that can end a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The problem rejected a transition.
    #[error(transparent)]
    Problem(#[from] ProblemError),
    /// The frontier emptied before a goal was found: the goal is unreachable
    /// under this problem formulation.
    #[error("frontier exhausted after expanding {expanded} nodes without reaching the goal")]
    Exhausted { expanded: usize },
    /// The expansion cap in `SearchConfig` was hit.
    #[error("search abandoned after expanding {expanded} nodes")]
    Abandoned { expanded: usize },
}

/// Tunables for a single search call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop with `SearchError::Abandoned` once this many nodes were expanded
    /// without reaching the goal. `None` searches until the frontier empties.
    pub max_expansions: Option<usize>,
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes removed from the frontier and expanded.
    pub expanded: usize,
    /// Child instances produced by invoking actions.
    pub generated: usize,
    /// Children dropped because their state was explored or already on the
    /// frontier with a path that is at least as cheap.
    pub duplicates: usize,
    /// Distinct states in the explored set when the search ended.
    pub explored: usize,
    /// Largest number of distinct states on the frontier at once.
    pub max_frontier: usize,
}

/// A vertex of the search tree.
///
/// A child holds its parent; parents do not know their children. Two nodes
/// with equal problem states are the same search vertex regardless of the
/// path that produced them.
pub struct Node<P: Problem> {
    problem: P,
    parent: Option<Rc<Node<P>>>,
    action: Option<P::Action>,
    path_cost: u32,
    depth: u32,
}

impl<P: Problem> Node<P> {
    fn root(problem: P) -> Self {
        Node {
            problem,
            parent: None,
            action: None,
            path_cost: 0,
            depth: 0,
        }
    }

    fn child(parent: &Rc<Node<P>>, problem: P, action: P::Action) -> Self {
        Node {
            problem,
            parent: Some(Rc::clone(parent)),
            action: Some(action),
            path_cost: parent.path_cost + STEP_COST,
            depth: parent.depth + 1,
        }
    }

    /// The problem instance at this vertex.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn parent(&self) -> Option<&Node<P>> {
        self.parent.as_deref()
    }

    /// The action that produced this node from its parent; `None` for the root.
    pub fn action(&self) -> Option<P::Action> {
        self.action
    }

    /// Cumulative path cost from the root (g).
    pub fn path_cost(&self) -> u32 {
        self.path_cost
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the actions leading from the root to this node.
    pub fn path(&self) -> Vec<P::Action> {
        let mut actions: Vec<P::Action> = self.ancestors().filter_map(Node::action).collect();
        actions.reverse();
        actions
    }

    /// Iterates from this node up to the root.
    fn ancestors(&self) -> impl Iterator<Item = &Node<P>> {
        std::iter::successors(Some(self), |node| node.parent())
    }
}

impl<P: Problem + fmt::Debug> fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("problem", &self.problem)
            .field("action", &self.action)
            .field("path_cost", &self.path_cost)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// The outcome of a successful search.
#[derive(Debug)]
pub struct Solution<P: Problem + fmt::Debug> {
    /// The first node whose state passed the goal test, with its full
    /// parent chain.
    pub node: Rc<Node<P>>,
    pub stats: SearchStats,
}

impl<P: Problem + fmt::Debug> Solution<P> {
    /// Returns the actions leading from the start to the goal.
    pub fn actions(&self) -> Vec<P::Action> {
        self.node.path()
    }
}

/// Walks the parent chain of `node` into `(action, resulting problem)` pairs,
/// ordered from the root to `node`. The root itself has no action and is not
/// included.
pub fn flatten_solution<P: Problem>(node: &Node<P>) -> Vec<(P::Action, P)> {
    let mut path: Vec<(P::Action, P)> = node
        .ancestors()
        .filter_map(|n| n.action.map(|action| (action, n.problem.clone())))
        .collect();
    path.reverse();
    path
}

/// Heap entry ranking a frontier node by `f = g + h`.
struct FrontierEntry<P: Problem> {
    f: u32,
    g: u32,
    order: u64,
    node: Rc<Node<P>>,
}

impl<P: Problem> Ord for FrontierEntry<P> {
    /// `BinaryHeap` pops the greatest entry, so the lowest `f` ranks highest.
    /// Ties go to the deeper node, then to the older entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<P: Problem> PartialOrd for FrontierEntry<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Problem> PartialEq for FrontierEntry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P: Problem> Eq for FrontierEntry<P> {}

/// State of one A* run.
struct Search<'a, P: Problem, H> {
    heuristic: H,
    config: &'a SearchConfig,
    heap: BinaryHeap<FrontierEntry<P>>,
    frontier: HashMap<P::State, Rc<Node<P>>>,
    explored: HashSet<P::State>,
    stats: SearchStats,
    pushed: u64,
}

impl<'a, P, H> Search<'a, P, H>
where
    P: Problem,
    H: Fn(&P) -> u32,
{
    fn new(problem: P, heuristic: H, config: &'a SearchConfig) -> Self {
        let mut search = Search {
            heuristic,
            config,
            heap: BinaryHeap::new(),
            frontier: HashMap::new(),
            explored: HashSet::new(),
            stats: SearchStats::default(),
            pushed: 0,
        };
        let h = (search.heuristic)(&problem);
        search.push(Rc::new(Node::root(problem)), h);
        search
    }

    fn push(&mut self, node: Rc<Node<P>>, h: u32) {
        self.frontier
            .insert(node.problem.state().clone(), Rc::clone(&node));
        self.heap.push(FrontierEntry {
            f: node.path_cost + h,
            g: node.path_cost,
            order: self.pushed,
            node,
        });
        self.pushed += 1;
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }

    /// Pops the cheapest live frontier node, skipping superseded heap entries.
    fn pop(&mut self) -> Option<Rc<Node<P>>> {
        while let Some(entry) = self.heap.pop() {
            let state = entry.node.problem.state();
            let live = self
                .frontier
                .get(state)
                .is_some_and(|current| Rc::ptr_eq(current, &entry.node));
            if live {
                self.frontier.remove(state);
                return Some(entry.node);
            }
        }
        None
    }

    /// Runs one iteration. Returns the goal node once it is popped.
    fn step(&mut self) -> Result<Option<Rc<Node<P>>>, SearchError> {
        let Some(node) = self.pop() else {
            return Err(SearchError::Exhausted {
                expanded: self.stats.expanded,
            });
        };

        if node.problem.goal_test() {
            return Ok(Some(node));
        }

        if let Some(limit) = self.config.max_expansions {
            if self.stats.expanded >= limit {
                return Err(SearchError::Abandoned {
                    expanded: self.stats.expanded,
                });
            }
        }

        self.explored.insert(node.problem.state().clone());
        self.stats.expanded += 1;

        for action in node.problem.actions() {
            let problem = node.problem.invoke(action)?;
            self.stats.generated += 1;

            if self.explored.contains(problem.state()) {
                self.stats.duplicates += 1;
                continue;
            }

            let g = node.path_cost + STEP_COST;
            if let Some(existing) = self.frontier.get(problem.state()) {
                if g >= existing.path_cost {
                    self.stats.duplicates += 1;
                    continue;
                }
            }

            let h = (self.heuristic)(&problem);
            let child = Rc::new(Node::child(&node, problem, action));
            self.push(child, h);
        }

        Ok(None)
    }

    fn log_progress(&self, iteration: usize) {
        let (f, depth) = self
            .heap
            .peek()
            .map_or((0, 0), |entry| (entry.f, entry.node.depth));
        debug!(
            "{} {} {} {} {}",
            iteration,
            self.frontier.len(),
            self.explored.len(),
            f,
            depth
        );
    }
}

/// Runs A* from `problem` guided by `heuristic` until a goal is popped.
///
/// `heuristic` must never overestimate the remaining cost; the returned path
/// is then optimal.
///
/// # Errors
/// * `SearchError::Exhausted` if the goal is unreachable.
/// * `SearchError::Problem` if the problem rejects a transition.
///
/// # Examples
/// ```
/// use eight_puzzle::engine::{Action, BoardSize, Puzzle};
/// use eight_puzzle::heuristics::manhattan_distance;
/// use eight_puzzle::problem::Problem;
/// use eight_puzzle::solver::a_star;
///
/// let goal = Puzzle::initialize_goal(&BoardSize::new(3, 3).unwrap()).unwrap();
/// let start = goal.invoke(Action::Left).unwrap();
/// let solution = a_star(start, manhattan_distance).unwrap();
/// assert_eq!(solution.actions(), vec![Action::Right]);
/// ```
pub fn a_star<P, H>(problem: P, heuristic: H) -> Result<Solution<P>, SearchError>
where
    P: Problem + fmt::Debug,
    H: Fn(&P) -> u32,
{
    a_star_with_config(problem, heuristic, &SearchConfig::default())
}

/// Same as `a_star`, with an explicit `SearchConfig`.
///
/// # Errors
/// Everything `a_star` returns, plus `SearchError::Abandoned` when
/// `config.max_expansions` is reached.
pub fn a_star_with_config<P, H>(
    problem: P,
    heuristic: H,
    config: &SearchConfig,
) -> Result<Solution<P>, SearchError>
where
    P: Problem + fmt::Debug,
    H: Fn(&P) -> u32,
{
    let mut search = Search::new(problem, heuristic, config);
    let mut iteration = 0;
    loop {
        let outcome = search.step();
        search.stats.explored = search.explored.len();
        match outcome {
            Ok(Some(node)) => {
                info!(
                    "Reached goal at depth {} (cost {}): {:?}",
                    node.depth, node.path_cost, search.stats
                );
                return Ok(Solution {
                    node,
                    stats: search.stats,
                });
            }
            Ok(None) => {}
            Err(err) => {
                info!("Search stopped: {} ({:?})", err, search.stats);
                return Err(err);
            }
        }

        if iteration % PROGRESS_LOG_INTERVAL == 0 {
            search.log_progress(iteration);
        }
        iteration += 1;
    }
}
