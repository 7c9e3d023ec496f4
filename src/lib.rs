mod action;
mod agent;
mod catalog;
mod error;
mod fsm;
mod planner;
mod provider;
mod search;
mod state;
mod visualizer;

pub use action::{Action, ActionBehavior, ActionRecord};
pub use agent::{Agent, AgentBuilder};
pub use catalog::ActionCatalog;
pub use error::{GoapError, Result};
pub use fsm::{ExecutionController, FsmState, StateStack};
pub use planner::{Plan, PlanOutcome, Planner, PlannerConfig};
pub use provider::DataProvider;
pub use search::{DijkstraSearch, SearchAlgorithm, SearchResult};
pub use state::{Fact, Goal, State};
pub use visualizer::GoapVisualizer;
