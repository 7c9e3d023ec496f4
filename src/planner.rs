//! # Planner for Goal-Oriented Action Planning (GOAP)
//!
//! The planner turns a world snapshot, one goal and the agent's actions into
//! the cheapest ordered sequence of actions that makes the goal hold.
//!
//! 1. Every action is reset and asked, through its procedural precondition,
//!    whether it can take part in this attempt (binding a target if needed).
//! 2. The accepted actions are handed, in registration order, to a
//!    [`SearchAlgorithm`] (by default [`DijkstraSearch`]).
//! 3. The result is returned as a [`PlanOutcome`].
//!
//! ## Basic Usage
//!
//! ```
//! use goap_agent::{Action, PlanOutcome, Planner, State};
//!
//! let pick_up_axe = Action::new("pick_up_axe", 1.0)
//!     .unwrap()
//!     .with_effect("has_axe", true);
//! let chop_wood = Action::new("chop_wood", 1.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("has_wood", true);
//!
//! let planner = Planner::new();
//! let current_state: State = [("has_axe", false), ("has_wood", false)].into_iter().collect();
//! let goal = State::from_fact("has_wood", true);
//!
//! match planner.plan_actions(&[chop_wood, pick_up_axe], &current_state, &goal) {
//!     PlanOutcome::Found(plan) => {
//!         assert_eq!(plan.to_string(), "pick_up_axe -> chop_wood -> GOAL");
//!         assert_eq!(plan.cost(), 2.0);
//!     }
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::catalog::ActionCatalog;
use crate::provider::DataProvider;
use crate::search::{DijkstraSearch, SearchAlgorithm};
use crate::state::{Goal, State};
use crate::Action;

/// An ordered sequence of action kinds that satisfies a goal.
///
/// Plans are consumed front to back and are never empty when produced by
/// the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    goal: Goal,
    steps: VecDeque<String>,
    cost: f32,
}

impl Plan {
    /// Creates a plan for `goal` from ordered action kinds.
    pub fn new(goal: Goal, steps: impl IntoIterator<Item = String>, cost: f32) -> Self {
        Self {
            goal,
            steps: steps.into_iter().collect(),
            cost,
        }
    }

    /// The goal this plan was built for.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Total cost of the plan as found by the search.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// The kind of the action currently at the head of the plan.
    pub fn front(&self) -> Option<&str> {
        self.steps.front().map(String::as_str)
    }

    /// Remaining action kinds, head first.
    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(String::as_str)
    }

    /// Number of remaining actions.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether every action has been consumed.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drops the head action once it is done.
    pub(crate) fn pop_front(&mut self) -> Option<String> {
        self.steps.pop_front()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{} -> ", step)?;
        }
        write!(f, "GOAL")
    }
}

/// Result of one planning attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// The cheapest non-empty plan reaching the goal.
    Found(Plan),
    /// The goal already holds; there is nothing to do.
    AlreadySatisfied,
    /// No combination of usable actions reaches the goal.
    NotFound,
}

impl PlanOutcome {
    /// Whether a plan was found.
    pub fn is_found(&self) -> bool {
        matches!(self, PlanOutcome::Found(_))
    }

    /// The found plan, if any.
    pub fn into_plan(self) -> Option<Plan> {
        match self {
            PlanOutcome::Found(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Planner settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Upper bound on nodes expanded per search; `None` means unbounded.
    pub max_expansions: Option<usize>,
}

/// The GOAP planner.
///
/// Uses [`DijkstraSearch`] unless another [`SearchAlgorithm`] is supplied.
pub struct Planner {
    search_algorithm: Box<dyn SearchAlgorithm>,
}

impl Planner {
    /// Creates a planner with an unbounded [`DijkstraSearch`].
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    /// Creates a planner with a [`DijkstraSearch`] configured by `config`.
    pub fn with_config(config: PlannerConfig) -> Self {
        let search = match config.max_expansions {
            Some(max) => DijkstraSearch::with_max_expansions(max),
            None => DijkstraSearch::new(),
        };
        Self {
            search_algorithm: Box::new(search),
        }
    }

    /// Creates a planner using a custom search algorithm.
    pub fn with_search_algorithm(search_algorithm: Box<dyn SearchAlgorithm>) -> Self {
        Self { search_algorithm }
    }

    /// Plans for `goal` with the actions of `catalog`.
    ///
    /// All actions are reset first; those whose procedural precondition
    /// rejects `provider` are left out of this attempt.
    pub fn plan<P: DataProvider>(
        &self,
        provider: &P,
        catalog: &mut ActionCatalog<P>,
        current_state: &State,
        goal: &Goal,
    ) -> PlanOutcome {
        let usable = catalog.prepare_for_planning(provider);
        if current_state.satisfies(goal) {
            log::debug!("Goal {} already satisfied", goal);
            return PlanOutcome::AlreadySatisfied;
        }

        let actions: Vec<&Action> = usable
            .iter()
            .map(|&idx| catalog.definition_at(idx))
            .collect();
        log::debug!(
            "Planning for {} with {} of {} actions",
            goal,
            actions.len(),
            catalog.len()
        );

        self.search(&actions, current_state, goal, |idx| {
            catalog.kind_at(usable[idx]).to_string()
        })
    }

    /// Plans for `goal` using plain action definitions, in slice order.
    ///
    /// Plan steps are named after [`Action::kind`].
    pub fn plan_actions(&self, actions: &[Action], current_state: &State, goal: &Goal) -> PlanOutcome {
        if current_state.satisfies(goal) {
            return PlanOutcome::AlreadySatisfied;
        }
        let actions: Vec<&Action> = actions.iter().collect();
        self.search(&actions, current_state, goal, |idx| actions[idx].kind().to_string())
    }

    /// Runs the search; `kind_of` maps an index of `actions` to the plan
    /// step naming it.
    fn search<F>(&self, actions: &[&Action], current_state: &State, goal: &Goal, kind_of: F) -> PlanOutcome
    where
        F: Fn(usize) -> String,
    {
        match self.search_algorithm.search(actions, current_state, goal) {
            Some(result) if !result.steps.is_empty() => {
                let steps = result.steps.iter().map(|&idx| kind_of(idx));
                PlanOutcome::Found(Plan::new(goal.clone(), steps, result.cost))
            }
            _ => PlanOutcome::NotFound,
        }
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner").finish_non_exhaustive()
    }
}
