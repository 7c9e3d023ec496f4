use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use crate::{Action, State};

/// A successful search: the chosen action indices and their summed cost.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Indices into the searched action slice, in execution order
    pub steps: Vec<usize>,
    /// Sum of the costs of the chosen actions
    pub cost: f32,
    /// Nodes expanded before the goal was reached
    pub expansions: usize,
}

/// Trait defining the interface for search algorithms used by the planner.
///
/// Implementations must return the cheapest sequence they can find and must
/// never return an empty one: the planner deals with goals that already hold
/// before searching.
///
/// # Examples
///
/// ```
/// use goap_agent::{Action, SearchAlgorithm, SearchResult, State};
///
/// /// Only considers single-action plans.
/// struct OneStep;
///
/// impl SearchAlgorithm for OneStep {
///     fn search(&self, actions: &[&Action], current: &State, goal: &State) -> Option<SearchResult> {
///         actions
///             .iter()
///             .enumerate()
///             .filter(|(_, a)| a.can_perform(current))
///             .find(|(_, a)| {
///                 let mut next = current.clone();
///                 a.apply_effects(&mut next);
///                 next.satisfies(goal)
///             })
///             .map(|(idx, a)| SearchResult { steps: vec![idx], cost: a.cost, expansions: 1 })
///     }
/// }
/// ```
pub trait SearchAlgorithm {
    /// Finds a sequence of actions that transforms `current` into a state
    /// satisfying `goal`, or `None` when there is none.
    fn search(&self, actions: &[&Action], current: &State, goal: &State) -> Option<SearchResult>;
}

/// Represents a node in the search tree.
#[derive(Debug, Clone)]
struct Node {
    /// Accumulated state at this node
    state: State,
    /// Index of the parent node
    parent: Option<usize>,
    /// Action that led here from the parent
    action: Option<usize>,
    /// Actions already used on the path to this node
    used: BTreeSet<usize>,
    /// Path cost from the root
    g_cost: f32,
}

/// Priority-queue entry ordered by cost, then by discovery order.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    g_cost: f32,
    tie: u64,
    idx: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.g_cost
            .total_cmp(&other.g_cost)
            .then(self.tie.cmp(&other.tie))
    }
}

/// Manages the state of one search invocation.
struct SearchContext {
    nodes: Vec<Node>,
    open_set: BinaryHeap<Reverse<OpenEntry>>,
    /// Cheapest known cost per (state, used actions) pair
    best: HashMap<(State, BTreeSet<usize>), f32>,
    tie: u64,
}

impl SearchContext {
    fn new(initial_state: &State) -> Self {
        let mut context = Self {
            nodes: Vec::new(),
            open_set: BinaryHeap::new(),
            best: HashMap::new(),
            tie: 0,
        };
        context.push(Node {
            state: initial_state.clone(),
            parent: None,
            action: None,
            used: BTreeSet::new(),
            g_cost: 0.0,
        });
        context
    }

    fn push(&mut self, node: Node) {
        let idx = self.nodes.len();
        self.best
            .insert((node.state.clone(), node.used.clone()), node.g_cost);
        self.open_set.push(Reverse(OpenEntry {
            g_cost: node.g_cost,
            tie: self.tie,
            idx,
        }));
        self.tie += 1;
        self.nodes.push(node);
    }

    /// Pops the cheapest node that has not been superseded by a cheaper path.
    fn next_node(&mut self) -> Option<usize> {
        while let Some(Reverse(entry)) = self.open_set.pop() {
            let node = &self.nodes[entry.idx];
            let best = self
                .best
                .get(&(node.state.clone(), node.used.clone()))
                .copied()
                .unwrap_or(f32::INFINITY);
            if node.g_cost <= best {
                return Some(entry.idx);
            }
        }
        None
    }

    /// Attaches a child for every usable action not yet used on this path.
    fn expand(&mut self, parent_idx: usize, actions: &[&Action]) {
        for (action_idx, action) in actions.iter().enumerate() {
            let parent = &self.nodes[parent_idx];
            if parent.used.contains(&action_idx) || !action.can_perform(&parent.state) {
                continue;
            }

            let mut state = parent.state.clone();
            action.apply_effects(&mut state);
            if state == parent.state {
                continue;
            }

            let mut used = parent.used.clone();
            used.insert(action_idx);
            let g_cost = parent.g_cost + action.cost;

            let known = self.best.get(&(state.clone(), used.clone())).copied();
            if known.map_or(false, |best| best <= g_cost) {
                continue;
            }

            self.push(Node {
                state,
                parent: Some(parent_idx),
                action: Some(action_idx),
                used,
                g_cost,
            });
        }
    }

    /// Follows parent links back to the root and returns actions root-first.
    fn reconstruct_path(&self, node_idx: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = Some(node_idx);

        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if let Some(action) = node.action {
                path.push(action);
            }
            current = node.parent;
        }

        path.reverse();
        path
    }
}

/// Cost-ordered search over partial world states.
///
/// Expands nodes cheapest first, so the first goal node taken from the
/// frontier is the cheapest one. Equal costs are resolved by discovery order,
/// which follows the order of the action slice. Each action is used at most
/// once on any path.
#[derive(Debug, Clone, Default)]
pub struct DijkstraSearch {
    max_expansions: Option<usize>,
}

impl DijkstraSearch {
    /// Creates an unbounded search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives up (returning `None`) after expanding `max_expansions` nodes.
    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }

    /// The expansion budget, if any.
    pub fn max_expansions(&self) -> Option<usize> {
        self.max_expansions
    }
}

impl SearchAlgorithm for DijkstraSearch {
    fn search(&self, actions: &[&Action], current: &State, goal: &State) -> Option<SearchResult> {
        let mut context = SearchContext::new(current);
        let mut expansions = 0;

        while let Some(idx) = context.next_node() {
            // The root never counts as a goal node.
            if idx != 0 && context.nodes[idx].state.satisfies(goal) {
                log::trace!(
                    "Search reached goal after {} expansions ({} nodes)",
                    expansions,
                    context.nodes.len()
                );
                return Some(SearchResult {
                    steps: context.reconstruct_path(idx),
                    cost: context.nodes[idx].g_cost,
                    expansions,
                });
            }

            if let Some(max) = self.max_expansions {
                if expansions >= max {
                    log::warn!("Search gave up after {} expansions", expansions);
                    return None;
                }
            }
            expansions += 1;

            context.expand(idx, actions);
        }

        log::trace!("Search exhausted after {} expansions", expansions);
        None
    }
}
