//! Ordered registry of the actions an agent can use.

use std::fmt;

use crate::action::{Action, ActionBehavior, ActionRecord};
use crate::error::{GoapError, Result};
use crate::provider::DataProvider;

struct Entry<P: DataProvider> {
    behavior: Box<dyn ActionBehavior<P>>,
    record: ActionRecord<P::Target>,
}

/// Actions of an agent, in registration order.
///
/// Kinds are unique. Registration order is the iteration order the planner
/// uses, which keeps planning deterministic.
pub struct ActionCatalog<P: DataProvider> {
    entries: Vec<Entry<P>>,
}

impl<P: DataProvider> ActionCatalog<P> {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers an action.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::ActionAlreadyInCollection`] if an action of the
    /// same kind is already registered.
    pub fn add<B>(&mut self, behavior: B) -> Result<()>
    where
        B: ActionBehavior<P> + 'static,
    {
        self.add_boxed(Box::new(behavior))
    }

    /// Registers an already boxed action; see [`add`](Self::add).
    pub fn add_boxed(&mut self, behavior: Box<dyn ActionBehavior<P>>) -> Result<()> {
        if self.contains(behavior.kind()) {
            return Err(GoapError::ActionAlreadyInCollection(
                behavior.kind().to_string(),
            ));
        }

        log::debug!("Registered action {}", behavior.kind());
        self.entries.push(Entry {
            behavior,
            record: ActionRecord::new(),
        });
        Ok(())
    }

    /// Removes an action by kind. Returns whether anything was removed.
    pub fn remove(&mut self, kind: &str) -> bool {
        let initial_len = self.entries.len();
        self.entries.retain(|e| e.behavior.kind() != kind);
        self.entries.len() != initial_len
    }

    /// Looks up an action by kind.
    pub fn get(&self, kind: &str) -> Option<&dyn ActionBehavior<P>> {
        self.position(kind)
            .map(|idx| self.entries[idx].behavior.as_ref())
    }

    /// The execution record of an action.
    pub fn record(&self, kind: &str) -> Option<&ActionRecord<P::Target>> {
        self.position(kind).map(|idx| &self.entries[idx].record)
    }

    /// Mutable access to an action and its execution record at once.
    pub fn entry_mut(
        &mut self,
        kind: &str,
    ) -> Option<(&mut dyn ActionBehavior<P>, &mut ActionRecord<P::Target>)> {
        let idx = self.position(kind)?;
        let entry = &mut self.entries[idx];
        let behavior: &mut dyn ActionBehavior<P> = entry.behavior.as_mut();
        Some((behavior, &mut entry.record))
    }

    /// Whether an action of this kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.position(kind).is_some()
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.behavior.kind())
    }

    /// Action definitions, in registration order.
    pub fn definitions(&self) -> Vec<&Action> {
        self.entries.iter().map(|e| e.behavior.action()).collect()
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no action is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resets every action and keeps those whose procedural precondition
    /// accepts the current context.
    ///
    /// Returns the indices of the usable actions, in registration order.
    pub(crate) fn prepare_for_planning(&mut self, provider: &P) -> Vec<usize> {
        let mut usable = Vec::new();
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            entry.record.reset();
            entry.behavior.reset();
            if entry
                .behavior
                .check_procedural_precondition(provider, &mut entry.record)
            {
                usable.push(idx);
            } else {
                log::debug!(
                    "Action {} rejected by its procedural precondition",
                    entry.behavior.kind()
                );
            }
        }
        usable
    }

    /// Definition of the action at `idx`.
    pub(crate) fn definition_at(&self, idx: usize) -> &Action {
        self.entries[idx].behavior.action()
    }

    /// Kind under which the action at `idx` was registered.
    pub(crate) fn kind_at(&self, idx: usize) -> &str {
        self.entries[idx].behavior.kind()
    }

    fn position(&self, kind: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.behavior.kind() == kind)
    }
}

impl<P: DataProvider> Default for ActionCatalog<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DataProvider> fmt::Debug for ActionCatalog<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
