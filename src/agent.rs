//! # Agent runtime
//!
//! An [`Agent`] ties the pieces together: it owns the action catalog, the
//! planner, the execution controller and the data provider, and advances
//! its behavior by one step every time the host calls [`Agent::update`].
//!
//! ```
//! use goap_agent::{Action, ActionBehavior, ActionRecord, Agent, DataProvider, FsmState, Goal, State};
//!
//! #[derive(Default)]
//! struct Lamp {
//!     lit: bool,
//! }
//!
//! impl DataProvider for Lamp {
//!     type Target = ();
//!     type Blackboard = bool;
//!
//!     fn world_state(&self) -> State {
//!         State::from_fact("lit", self.lit)
//!     }
//!
//!     fn create_goal_state(&self) -> Vec<Goal> {
//!         vec![State::from_fact("lit", true)]
//!     }
//!
//!     fn move_agent(&mut self, _: &Action, _: &mut ActionRecord<()>) -> bool {
//!         true
//!     }
//!
//!     fn blackboard(&mut self) -> &mut bool {
//!         &mut self.lit
//!     }
//! }
//!
//! struct SwitchOn(Action);
//!
//! impl ActionBehavior<Lamp> for SwitchOn {
//!     fn action(&self) -> &Action {
//!         &self.0
//!     }
//!
//!     fn perform(&mut self, record: &mut ActionRecord<()>, lit: &mut bool) -> bool {
//!         *lit = true;
//!         record.mark_done();
//!         true
//!     }
//! }
//!
//! let switch_on = Action::new("switch_on", 1.0).unwrap().with_effect("lit", true);
//! let mut agent = Agent::builder("lamp_keeper")
//!     .data_provider(Lamp::default())
//!     .action(SwitchOn(switch_on))
//!     .build()
//!     .unwrap();
//!
//! agent.update(); // plans
//! assert_eq!(agent.state(), Some(FsmState::PerformAction));
//! agent.update(); // performs
//! assert!(agent.provider().lit);
//! ```

use crate::action::ActionBehavior;
use crate::catalog::ActionCatalog;
use crate::error::{GoapError, Result};
use crate::fsm::{ExecutionController, FsmState, StateStack};
use crate::planner::{Plan, Planner};
use crate::provider::DataProvider;

/// A planning agent driven one tick at a time.
pub struct Agent<P: DataProvider> {
    name: String,
    provider: P,
    catalog: ActionCatalog<P>,
    planner: Planner,
    controller: ExecutionController,
}

impl<P: DataProvider> Agent<P> {
    /// Starts building an agent called `name`.
    pub fn builder(name: impl Into<String>) -> AgentBuilder<P> {
        AgentBuilder::new(name)
    }

    /// The agent's name, used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs one tick of behavior.
    pub fn update(&mut self) {
        log::trace!("Agent {} tick in {:?}", self.name, self.controller.state());
        self.controller
            .update(&self.planner, &mut self.catalog, &mut self.provider);
    }

    /// Drops the current plan and returns to `Idle`.
    pub fn abort_fsm(&mut self) {
        log::info!("Agent {} aborted", self.name);
        self.controller.abort();
    }

    /// Registers an action.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::ActionAlreadyInCollection`] if the kind is taken.
    pub fn add_action<B>(&mut self, behavior: B) -> Result<()>
    where
        B: ActionBehavior<P> + 'static,
    {
        self.catalog.add(behavior)
    }

    /// Removes an action by kind. Returns whether anything was removed.
    pub fn remove_action(&mut self, kind: &str) -> bool {
        self.catalog.remove(kind)
    }

    /// Looks up an action by kind.
    pub fn action(&self, kind: &str) -> Option<&dyn ActionBehavior<P>> {
        self.catalog.get(kind)
    }

    /// The agent's action catalog.
    pub fn actions(&self) -> &ActionCatalog<P> {
        &self.catalog
    }

    /// The active behavior state, the top of the stack.
    pub fn state(&self) -> Option<FsmState> {
        self.controller.state()
    }

    /// The full state stack, bottom first.
    pub fn stack(&self) -> &StateStack {
        self.controller.stack()
    }

    /// The plan being executed, if any.
    pub fn current_plan(&self) -> Option<&Plan> {
        self.controller.plan()
    }

    /// The data provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the data provider, for the host to update the world between ticks.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

/// Builder for [`Agent`].
///
/// The first data provider given wins; later ones are ignored.
pub struct AgentBuilder<P: DataProvider> {
    name: String,
    provider: Option<P>,
    actions: Vec<Box<dyn ActionBehavior<P>>>,
    planner: Option<Planner>,
}

impl<P: DataProvider> AgentBuilder<P> {
    /// Creates a builder with no provider, no actions and the default planner.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: None,
            actions: Vec::new(),
            planner: None,
        }
    }

    /// Sets the data provider. Only the first call has an effect.
    pub fn data_provider(mut self, provider: P) -> Self {
        if self.provider.is_some() {
            log::warn!(
                "Agent {} already has a data provider, ignoring another",
                self.name
            );
        } else {
            self.provider = Some(provider);
        }
        self
    }

    /// Adds an action. Duplicate kinds are reported by [`build`](Self::build).
    pub fn action<B>(mut self, behavior: B) -> Self
    where
        B: ActionBehavior<P> + 'static,
    {
        self.actions.push(Box::new(behavior));
        self
    }

    /// Replaces the default [`Planner`].
    pub fn planner(mut self, planner: Planner) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Builds the agent with `Idle` on its stack.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::MissingDataProvider`] when no provider was given
    /// and [`GoapError::ActionAlreadyInCollection`] for duplicate kinds.
    pub fn build(self) -> Result<Agent<P>> {
        let provider = self.provider.ok_or(GoapError::MissingDataProvider)?;

        let mut catalog = ActionCatalog::new();
        for behavior in self.actions {
            catalog.add_boxed(behavior)?;
        }
        log::debug!(
            "Agent {} starts with actions {:?}",
            self.name,
            catalog
        );

        Ok(Agent {
            name: self.name,
            provider,
            catalog,
            planner: self.planner.unwrap_or_default(),
            controller: ExecutionController::new(),
        })
    }
}
