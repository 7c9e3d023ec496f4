//! # Actions for Goal-Oriented Action Planning (GOAP)
//!
//! An action is split into three parts:
//!
//! * [`Action`]: the immutable definition the planner reasons over
//!   (kind, cost, preconditions, effects, whether it must be in range of a
//!   target).
//! * [`ActionRecord`]: the execution-scoped mutable record (bound target,
//!   in-range flag, done flag). It is reset before every planning attempt, so
//!   nothing from a previous plan leaks into the next one.
//! * [`ActionBehavior`]: the runtime hooks a host implements to bind targets,
//!   perform one tick of work and report completion.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_agent::{Action, State};
//!
//! let chop_wood = Action::new("chop_wood", 2.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("has_wood", true)
//!     .requiring_range();
//!
//! let mut current_state = State::from_fact("has_axe", true);
//! assert!(chop_wood.can_perform(&current_state));
//!
//! chop_wood.apply_effects(&mut current_state);
//! assert_eq!(current_state.get("has_wood"), Some(true));
//! assert!(chop_wood.requires_in_range);
//! ```

use crate::provider::DataProvider;
use crate::{GoapError, Result, State};

/// The immutable definition of an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Kind identifier, unique within an agent's catalog
    pub name: String,
    /// Non-negative planning cost
    pub cost: f32,
    /// Facts that must hold before the action can run
    pub preconditions: State,
    /// Facts the action makes hold once it is done
    pub effects: State,
    /// Whether the agent has to reach the bound target before performing
    pub requires_in_range: bool,
}

impl Action {
    /// Creates an action with no preconditions or effects.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::InvalidActionCost`] if `cost` is negative, NaN or
    /// infinite.
    pub fn new(name: impl Into<String>, cost: f32) -> Result<Self> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(GoapError::InvalidActionCost);
        }

        Ok(Self {
            name: name.into(),
            cost,
            preconditions: State::new(),
            effects: State::new(),
            requires_in_range: false,
        })
    }

    /// Adds a fact that must hold before the action can run.
    pub fn with_precondition(mut self, key: impl Into<String>, value: bool) -> Self {
        self.preconditions.set(key, value);
        self
    }

    /// Adds a fact the action makes hold once it is done.
    pub fn with_effect(mut self, key: impl Into<String>, value: bool) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Marks the action as needing the agent to be in range of its target.
    pub fn requiring_range(mut self) -> Self {
        self.requires_in_range = true;
        self
    }

    /// The action name, the default kind of its behavior.
    pub fn kind(&self) -> &str {
        &self.name
    }

    /// Checks whether every precondition holds in `state`.
    pub fn can_perform(&self, state: &State) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Applies the action's effects to `state`, overwriting matching keys.
    pub fn apply_effects(&self, state: &mut State) {
        state.apply_effects(&self.effects);
    }
}

/// Per-execution mutable data of an action.
///
/// `T` is the host's target handle (an entity id, a position...).
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord<T> {
    target: Option<T>,
    in_range: bool,
    done: bool,
}

impl<T> ActionRecord<T> {
    /// Creates a record with no target, out of range and not done.
    pub fn new() -> Self {
        Self {
            target: None,
            in_range: false,
            done: false,
        }
    }

    /// The target bound during planning, if any.
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Binds the target the agent has to reach.
    pub fn set_target(&mut self, target: T) {
        self.target = Some(target);
    }

    /// Unbinds the target.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Whether the agent has reached the target.
    pub fn is_in_range(&self) -> bool {
        self.in_range
    }

    /// Records whether the agent is in range of the target.
    pub fn set_in_range(&mut self, in_range: bool) {
        self.in_range = in_range;
    }

    /// Whether the action has finished its work.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Marks the action as finished; the plan moves on at the next tick.
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Clears target, range and completion so the action can join a new plan.
    pub fn reset(&mut self) {
        self.target = None;
        self.in_range = false;
        self.done = false;
    }
}

impl<T> Default for ActionRecord<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime hooks of an action, implemented by the host.
///
/// Only [`action`](ActionBehavior::action) and
/// [`perform`](ActionBehavior::perform) are required. The defaults accept the
/// action unconditionally during planning and read completion from the
/// record.
///
/// # Examples
///
/// ```
/// use goap_agent::{Action, ActionBehavior, ActionRecord, DataProvider, Goal, State};
///
/// struct Farm {
///     crops: u32,
/// }
///
/// impl DataProvider for Farm {
///     type Target = ();
///     type Blackboard = u32;
///
///     fn world_state(&self) -> State {
///         State::from_fact("has_crops", self.crops > 0)
///     }
///
///     fn create_goal_state(&self) -> Vec<Goal> {
///         vec![State::from_fact("has_crops", true)]
///     }
///
///     fn move_agent(&mut self, _action: &Action, _record: &mut ActionRecord<()>) -> bool {
///         true
///     }
///
///     fn blackboard(&mut self) -> &mut u32 {
///         &mut self.crops
///     }
/// }
///
/// struct Harvest {
///     action: Action,
/// }
///
/// impl ActionBehavior<Farm> for Harvest {
///     fn action(&self) -> &Action {
///         &self.action
///     }
///
///     fn perform(&mut self, record: &mut ActionRecord<()>, crops: &mut u32) -> bool {
///         *crops += 1;
///         record.mark_done();
///         true
///     }
/// }
/// ```
pub trait ActionBehavior<P: DataProvider> {
    /// The immutable definition of this action.
    fn action(&self) -> &Action;

    /// The explicit kind identifier of this action.
    ///
    /// The catalog registers the action under this kind and plans name their
    /// steps with it. Defaults to the action name.
    fn kind(&self) -> &str {
        &self.action().name
    }

    /// Called before every planning attempt; binds a target or rejects the
    /// action for this attempt by returning `false`.
    fn check_procedural_precondition(
        &mut self,
        _provider: &P,
        _record: &mut ActionRecord<P::Target>,
    ) -> bool {
        true
    }

    /// Performs one tick of work.
    ///
    /// Returns `false` on failure, which aborts the plan. Returning `true`
    /// does not mean the action is finished; completion is reported through
    /// [`is_done`](ActionBehavior::is_done).
    fn perform(&mut self, record: &mut ActionRecord<P::Target>, blackboard: &mut P::Blackboard)
        -> bool;

    fn is_done(&self, record: &ActionRecord<P::Target>) -> bool {
        record.is_done()
    }

    /// Clears any behavior-owned execution state. The catalog resets the
    /// record itself.
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_action() {
        let action = Action::new("test_action", 1.0).unwrap();
        assert_eq!(action.name, "test_action");
        assert_eq!(action.kind(), "test_action");
        assert_eq!(action.cost, 1.0);
        assert!(action.preconditions.is_empty());
        assert!(action.effects.is_empty());
        assert!(!action.requires_in_range);
    }

    #[test]
    fn test_zero_cost_is_allowed() {
        assert!(Action::new("free", 0.0).is_ok());
    }

    #[test]
    fn test_create_invalid_action() {
        let result = Action::new("test_action", -1.0);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));

        let result = Action::new("test_action", f32::NAN);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));

        let result = Action::new("test_action", f32::INFINITY);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));
    }

    #[test]
    fn test_can_perform_with_empty_preconditions() {
        let action = Action::new("test_action", 1.0).unwrap();
        assert!(action.can_perform(&State::new()));
    }

    #[test]
    fn test_can_perform_with_matching_preconditions() {
        let action = Action::new("test_action", 1.0)
            .unwrap()
            .with_precondition("has_tool", true);

        assert!(action.can_perform(&State::from_fact("has_tool", true)));
        assert!(!action.can_perform(&State::from_fact("has_tool", false)));
        assert!(!action.can_perform(&State::new()));
    }

    #[test]
    fn test_apply_effects_overwrite() {
        let action = Action::new("test_action", 1.0)
            .unwrap()
            .with_effect("has_result", true)
            .with_effect("is_complete", true);

        let mut state = State::from_fact("has_result", false);
        action.apply_effects(&mut state);

        assert_eq!(state.get("has_result"), Some(true));
        assert_eq!(state.get("is_complete"), Some(true));
    }

    #[test]
    fn test_record_defaults_out_of_range() {
        let record: ActionRecord<u32> = ActionRecord::new();
        assert!(record.target().is_none());
        assert!(!record.is_in_range());
        assert!(!record.is_done());
    }

    #[test]
    fn test_record_reset_is_idempotent() {
        let mut record = ActionRecord::new();
        record.set_target(7u32);
        record.set_in_range(true);
        record.mark_done();

        record.reset();
        let once = record.clone();
        record.reset();

        assert_eq!(record, once);
        assert_eq!(record, ActionRecord::default());
    }
}
