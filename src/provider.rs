//! The collaborator an agent plans for.
//!
//! A [`DataProvider`] is supplied by the hosting simulation. It produces world
//! snapshots and prioritized goals, moves the agent, owns the blackboard
//! handed to actions, and is told about every planning and execution outcome.

use std::fmt;

use crate::action::{Action, ActionRecord};
use crate::planner::Plan;
use crate::state::{Goal, State};
use crate::GoapError;

/// Host-side source of world data and sink of agent notifications.
pub trait DataProvider {
    /// Handle to whatever an action has to be in range of.
    type Target: fmt::Debug;
    /// Scratch data shared with [`ActionBehavior::perform`](crate::ActionBehavior::perform).
    type Blackboard;

    /// Current world snapshot. Must be free of side effects.
    fn world_state(&self) -> State;

    /// Goals in priority order; the first one that yields a plan wins.
    fn create_goal_state(&self) -> Vec<Goal>;

    /// A plan was found for `goal` and is about to run.
    fn plan_found(&mut self, _goal: &Goal, _plan: &Plan) {}

    /// No offered goal produced a plan.
    fn plan_failed(&mut self, _goals: &[Goal]) {}

    /// `perform` returned `false` for the head action of the running plan.
    fn plan_aborted(&mut self, _action: &Action) {}

    /// The running plan completed.
    fn actions_finished(&mut self) {}

    /// A configuration fault unwound the agent to idle.
    fn execution_fault(&mut self, _error: &GoapError) {}

    /// Moves the agent one tick toward the target bound in `record`.
    ///
    /// Returns `true` once the agent has arrived.
    fn move_agent(&mut self, action: &Action, record: &mut ActionRecord<Self::Target>) -> bool;

    /// Scratch data handed to the head action's `perform`.
    fn blackboard(&mut self) -> &mut Self::Blackboard;
}
