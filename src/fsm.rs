//! Stack-based execution state machine.
//!
//! The controller keeps a stack of [`FsmState`] frames and runs only the top
//! one per tick:
//!
//! - `Idle` plans for the provider's goals, in priority order.
//! - `PerformAction` works through the plan one action at a time.
//! - `MoveTo` is pushed on top of `PerformAction` while the head action's
//!   target is out of range, and popped once the provider reports arrival.
//!
//! Every state handler is a function of the current context returning a
//! [`Transition`]; the controller applies it to the stack afterwards.

use std::fmt;

use crate::catalog::ActionCatalog;
use crate::error::GoapError;
use crate::planner::{Plan, PlanOutcome, Planner};
use crate::provider::DataProvider;
use crate::state::Goal;

/// Behavior states of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsmState {
    /// Looking for a plan
    Idle,
    /// Moving toward the head action's target
    MoveTo,
    /// Executing the queued actions
    PerformAction,
}

impl fmt::Display for FsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsmState::Idle => "Idle",
            FsmState::MoveTo => "MoveTo",
            FsmState::PerformAction => "PerformAction",
        };
        write!(f, "{}", name)
    }
}

/// What a state handler asks the controller to do with the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Stay,
    Push(FsmState),
    Pop,
    /// Pop the current frame and push another in its place.
    Replace(FsmState),
    /// Drop everything above `Idle`.
    UnwindToIdle,
}

/// A stack of behavior frames; the top frame is the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStack {
    frames: Vec<FsmState>,
}

impl StateStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame, making it the active one.
    pub fn push(&mut self, state: FsmState) {
        self.frames.push(state);
    }

    /// Pops the active frame.
    pub fn pop(&mut self) -> Option<FsmState> {
        self.frames.pop()
    }

    /// Drops every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// The active frame.
    pub fn top(&self) -> Option<FsmState> {
        self.frames.last().copied()
    }

    /// All frames, bottom first.
    pub fn frames(&self) -> &[FsmState] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pops frames until `Idle` is on top, pushing one if none is left.
    pub fn unwind_to_idle(&mut self) {
        while let Some(top) = self.top() {
            if top == FsmState::Idle {
                return;
            }
            self.frames.pop();
        }
        self.frames.push(FsmState::Idle);
    }

    /// At most one `Idle` and one `PerformAction` frame, and every `MoveTo`
    /// sits directly on a `PerformAction`.
    pub fn is_well_formed(&self) -> bool {
        let count = |state| self.frames.iter().filter(|&&s| s == state).count();
        if count(FsmState::Idle) > 1 || count(FsmState::PerformAction) > 1 {
            return false;
        }
        self.frames.iter().enumerate().all(|(idx, &state)| {
            state != FsmState::MoveTo
                || (idx > 0 && self.frames[idx - 1] == FsmState::PerformAction)
        })
    }
}

/// Everything a state handler may touch during one tick.
struct Tick<'a, P: DataProvider> {
    plan: &'a mut Option<Plan>,
    planner: &'a Planner,
    catalog: &'a mut ActionCatalog<P>,
    provider: &'a mut P,
}

/// Drives one agent: owns the state stack and the running plan.
#[derive(Debug)]
pub struct ExecutionController {
    stack: StateStack,
    plan: Option<Plan>,
}

impl ExecutionController {
    /// Creates a controller with `Idle` on the stack.
    pub fn new() -> Self {
        let mut stack = StateStack::new();
        stack.push(FsmState::Idle);
        Self { stack, plan: None }
    }

    /// The active state.
    pub fn state(&self) -> Option<FsmState> {
        self.stack.top()
    }

    /// The state stack.
    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    /// The plan being executed, if any.
    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Clears the stack, drops the running plan and goes back to `Idle`.
    pub fn abort(&mut self) {
        log::info!("Aborting execution");
        self.stack.clear();
        self.stack.push(FsmState::Idle);
        self.plan = None;
    }

    /// Runs the top state for one tick.
    pub fn update<P: DataProvider>(
        &mut self,
        planner: &Planner,
        catalog: &mut ActionCatalog<P>,
        provider: &mut P,
    ) {
        let Some(state) = self.stack.top() else {
            log::trace!("State stack is empty, nothing to run");
            return;
        };

        let mut tick = Tick {
            plan: &mut self.plan,
            planner,
            catalog,
            provider,
        };
        let transition = match state {
            FsmState::Idle => idle(&mut tick),
            FsmState::MoveTo => move_to(&mut tick),
            FsmState::PerformAction => perform_action(&mut tick),
        };

        log::trace!("{} -> {:?}", state, transition);
        self.apply(transition);
        debug_assert!(self.stack.is_well_formed(), "{:?}", self.stack);
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Push(state) => self.stack.push(state),
            Transition::Pop => {
                self.stack.pop();
            }
            Transition::Replace(state) => {
                self.stack.pop();
                self.stack.push(state);
            }
            Transition::UnwindToIdle => self.stack.unwind_to_idle(),
        }
    }
}

impl Default for ExecutionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Plans for the first goal that yields a plan.
fn idle<P: DataProvider>(tick: &mut Tick<'_, P>) -> Transition {
    let world_state = tick.provider.world_state();
    let goals = tick.provider.create_goal_state();

    let mut not_found = goals.is_empty();
    for goal in &goals {
        match tick
            .planner
            .plan(&*tick.provider, &mut *tick.catalog, &world_state, goal)
        {
            PlanOutcome::Found(plan) => {
                log::info!("Plan found for {}: {}", goal, plan);
                tick.provider.plan_found(goal, &plan);
                *tick.plan = Some(plan);
                return Transition::Replace(FsmState::PerformAction);
            }
            PlanOutcome::AlreadySatisfied => {}
            PlanOutcome::NotFound => not_found = true,
        }
    }

    if not_found {
        log::warn!("Failed plan: {}", pretty_goals(&goals));
        tick.provider.plan_failed(&goals);
    } else {
        log::debug!("All goals already satisfied");
    }
    Transition::Replace(FsmState::Idle)
}

/// Renders goals as `[{a: true}, {b: false}]`.
fn pretty_goals(goals: &[Goal]) -> String {
    let goals: Vec<String> = goals.iter().map(ToString::to_string).collect();
    format!("[{}]", goals.join(", "))
}

/// Moves toward the head action's target, popping on arrival.
fn move_to<P: DataProvider>(tick: &mut Tick<'_, P>) -> Transition {
    let Some(kind) = tick.plan.as_ref().and_then(|p| p.front()).map(str::to_string) else {
        log::error!("Moving without an action to move for");
        *tick.plan = None;
        return Transition::UnwindToIdle;
    };
    let Some((behavior, record)) = tick.catalog.entry_mut(&kind) else {
        return fault(tick, GoapError::UnknownAction(kind));
    };

    let action = behavior.action();
    if action.requires_in_range && record.target().is_none() {
        return fault(tick, GoapError::MissingTarget(kind));
    }

    log::trace!("Moving toward {:?} for {}", record.target(), kind);
    if tick.provider.move_agent(action, record) {
        log::debug!("Arrived at target of {}", kind);
        record.set_in_range(true);
        Transition::Pop
    } else {
        Transition::Stay
    }
}

/// Advances the plan by one tick of the head action.
fn perform_action<P: DataProvider>(tick: &mut Tick<'_, P>) -> Transition {
    let Some(plan) = tick.plan.as_mut() else {
        return finished(tick);
    };
    let Some(head) = plan.front().map(str::to_string) else {
        return finished(tick);
    };

    let Some((behavior, record)) = tick.catalog.entry_mut(&head) else {
        return fault(tick, GoapError::UnknownAction(head));
    };
    if behavior.is_done(record) {
        log::debug!("Action {} done", head);
        plan.pop_front();
    }

    let Some(kind) = plan.front().map(str::to_string) else {
        return finished(tick);
    };
    let Some((behavior, record)) = tick.catalog.entry_mut(&kind) else {
        return fault(tick, GoapError::UnknownAction(kind));
    };

    let in_range = !behavior.action().requires_in_range || record.is_in_range();
    if !in_range {
        return Transition::Push(FsmState::MoveTo);
    }

    if behavior.perform(record, tick.provider.blackboard()) {
        Transition::Stay
    } else {
        log::warn!("Action {} failed, aborting plan", kind);
        *tick.plan = None;
        tick.provider.plan_aborted(behavior.action());
        Transition::Replace(FsmState::Idle)
    }
}

/// The plan ran out of actions.
fn finished<P: DataProvider>(tick: &mut Tick<'_, P>) -> Transition {
    log::info!("Done actions");
    *tick.plan = None;
    tick.provider.actions_finished();
    Transition::Replace(FsmState::Idle)
}

/// Reports a configuration fault and unwinds to `Idle`.
fn fault<P: DataProvider>(tick: &mut Tick<'_, P>, error: GoapError) -> Transition {
    log::error!("Execution fault: {}", error);
    *tick.plan = None;
    tick.provider.execution_fault(&error);
    Transition::UnwindToIdle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_controller_starts_idle() {
        let controller = ExecutionController::new();
        assert_eq!(controller.state(), Some(FsmState::Idle));
        assert_eq!(controller.stack().len(), 1);
        assert!(controller.plan().is_none());
    }

    #[test]
    fn test_apply_transitions() {
        let mut controller = ExecutionController::new();
        controller.apply(Transition::Replace(FsmState::PerformAction));
        assert_eq!(controller.stack().frames(), [FsmState::PerformAction]);

        controller.apply(Transition::Push(FsmState::MoveTo));
        assert_eq!(
            controller.stack().frames(),
            [FsmState::PerformAction, FsmState::MoveTo]
        );
        assert!(controller.stack().is_well_formed());

        controller.apply(Transition::Pop);
        assert_eq!(controller.state(), Some(FsmState::PerformAction));

        controller.apply(Transition::Stay);
        assert_eq!(controller.state(), Some(FsmState::PerformAction));
    }

    #[test]
    fn test_unwind_to_idle_from_move_to() {
        let mut stack = StateStack::new();
        stack.push(FsmState::PerformAction);
        stack.push(FsmState::MoveTo);

        stack.unwind_to_idle();
        assert_eq!(stack.frames(), [FsmState::Idle]);
    }

    #[test]
    fn test_unwind_to_idle_keeps_idle_base() {
        let mut stack = StateStack::new();
        stack.push(FsmState::Idle);
        stack.push(FsmState::PerformAction);
        stack.push(FsmState::MoveTo);

        stack.unwind_to_idle();
        assert_eq!(stack.frames(), [FsmState::Idle]);
    }

    #[test]
    fn test_well_formed() {
        let mut stack = StateStack::new();
        assert!(stack.is_well_formed());

        stack.push(FsmState::MoveTo);
        assert!(!stack.is_well_formed());

        stack.clear();
        stack.push(FsmState::Idle);
        stack.push(FsmState::Idle);
        assert!(!stack.is_well_formed());

        stack.clear();
        stack.push(FsmState::PerformAction);
        stack.push(FsmState::PerformAction);
        assert!(!stack.is_well_formed());
    }

    #[test]
    fn test_abort_resets_to_idle() {
        let mut controller = ExecutionController::new();
        controller.apply(Transition::Replace(FsmState::PerformAction));
        controller.apply(Transition::Push(FsmState::MoveTo));

        controller.abort();
        assert_eq!(controller.stack().frames(), [FsmState::Idle]);
        assert!(controller.plan().is_none());
    }

    #[test]
    fn test_pretty_goals() {
        let goals = vec![
            Goal::from_fact("has_wood", true),
            [("has_axe", false), ("tired", true)].into_iter().collect(),
        ];
        assert_eq!(
            pretty_goals(&goals),
            "[{has_wood: true}, {has_axe: false, tired: true}]"
        );
        assert_eq!(pretty_goals(&[]), "[]");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(FsmState::PerformAction.to_string(), "PerformAction");
        assert_eq!(FsmState::MoveTo.to_string(), "MoveTo");
    }
}
