//! # World State for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides [`Fact`] and [`State`], the symbolic substrate every
//! part of the planner reasons over.
//!
//! A `State` is a set of named boolean facts. The same structure is used for:
//!
//! - **World State**: what the data provider believes is true right now
//! - **Goals**: conditions the agent wants to make true
//! - **Preconditions**: what must hold before an action can run
//! - **Effects**: what an action makes true (or false) once it has run
//!
//! Facts are kept sorted by key, so iterating a state, printing it, or
//! hashing it is deterministic.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_agent::State;
//!
//! let mut current_state = State::new();
//! current_state.set("has_axe", false);
//! current_state.set("has_wood", false);
//!
//! let goal = State::from_fact("has_wood", true);
//! assert!(!current_state.satisfies(&goal));
//!
//! // Effects overwrite matching keys and add new ones
//! let effects: State = [("has_wood", true), ("tired", true)].into_iter().collect();
//! current_state.apply_effects(&effects);
//!
//! assert!(current_state.satisfies(&goal));
//! assert_eq!(current_state.get("tired"), Some(true));
//! assert_eq!(current_state.to_string(), "{has_axe: false, has_wood: true, tired: true}");
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A named boolean proposition about the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fact {
    pub key: String,
    pub value: bool,
}

impl Fact {
    /// Creates a fact.
    pub fn new(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl<K: Into<String>> From<(K, bool)> for Fact {
    fn from((key, value): (K, bool)) -> Self {
        Self::new(key, value)
    }
}

/// A set of facts with unique keys.
///
/// `State` represents world snapshots, goals, preconditions and effects.
///
/// # Examples
///
/// ```
/// use goap_agent::State;
///
/// let mut state = State::new();
/// state.set("door_open", false);
/// state.set("has_key", true);
///
/// assert_eq!(state.get("door_open"), Some(false));
/// assert_eq!(state.get("window_open"), None);
///
/// // Setting an existing key replaces its value
/// state.set("door_open", true);
/// assert_eq!(state.get("door_open"), Some(true));
/// assert_eq!(state.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    values: BTreeMap<String, bool>,
}

/// A desired end condition; satisfied by any state holding all of its facts.
pub type Goal = State;

impl State {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Creates a state holding a single fact.
    pub fn from_fact(key: impl Into<String>, value: bool) -> Self {
        let mut state = Self::new();
        state.set(key, value);
        state
    }

    /// Sets a fact, replacing any previous value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), value);
    }

    /// Inserts a [`Fact`], replacing any previous value for its key.
    pub fn insert_fact(&mut self, fact: Fact) {
        self.values.insert(fact.key, fact.value);
    }

    /// Gets the value of a fact, or `None` when the key is unknown.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    /// Removes a fact and returns its previous value.
    pub fn remove(&mut self, key: &str) -> Option<bool> {
        self.values.remove(key)
    }

    /// Checks if this state satisfies another state's requirements.
    ///
    /// Every fact in `other` must be present here with an equal value.
    /// Keys missing from this state never satisfy a requirement, and extra
    /// keys in this state are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_agent::State;
    ///
    /// let world: State = [("has_key", true), ("door_open", false)].into_iter().collect();
    ///
    /// assert!(world.satisfies(&State::from_fact("has_key", true)));
    /// assert!(!world.satisfies(&State::from_fact("door_open", true)));
    /// assert!(!world.satisfies(&State::from_fact("has_sword", false)));
    /// assert!(world.satisfies(&State::new()));
    /// ```
    pub fn satisfies(&self, other: &State) -> bool {
        other
            .values
            .iter()
            .all(|(key, value)| self.values.get(key) == Some(value))
    }

    /// Applies `effects` on top of this state.
    ///
    /// Matching keys are overwritten and new keys are added.
    pub fn apply_effects(&mut self, effects: &State) {
        for (key, value) in effects.values.iter() {
            self.values.insert(key.clone(), *value);
        }
    }

    /// Returns the facts of `goal` that do not hold in this state.
    pub fn unsatisfied(&self, goal: &State) -> State {
        goal.values
            .iter()
            .filter(|(key, value)| self.values.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the state holds no facts.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Iterates the facts of this state in key order.
    pub fn facts(&self) -> impl Iterator<Item = Fact> + '_ {
        self.values
            .iter()
            .map(|(key, value)| Fact::new(key.clone(), *value))
    }

    /// Gets all the key-value pairs in the state.
    pub fn values(&self) -> &BTreeMap<String, bool> {
        &self.values
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for State {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }
}

impl FromIterator<Fact> for State {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|f| (f.key, f.value)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, bool)> for State {
    fn extend<I: IntoIterator<Item = (K, bool)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = (&'a String, &'a bool);
    type IntoIter = btree_map::Iter<'a, String, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
            first = false;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = State::new();
        assert!(state.is_empty());
        assert_eq!(state.to_string(), "{}");
    }

    #[test]
    fn test_set_and_get() {
        let mut state = State::new();
        state.set("foo", true);
        assert_eq!(state.get("foo"), Some(true));
        state.set("foo", false);
        assert_eq!(state.get("foo"), Some(false));
        assert_eq!(state.get("bar"), None);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_satisfies() {
        let mut state = State::new();
        state.set("a", true);
        state.set("b", false);

        let mut required = State::new();
        required.set("a", true);
        assert!(state.satisfies(&required));
        required.set("b", false);
        assert!(state.satisfies(&required));
        required.set("b", true);
        assert!(!state.satisfies(&required));
        required.set("c", true);
        assert!(!state.satisfies(&required));
    }

    #[test]
    fn test_apply_effects() {
        let mut state: State = [("x", false), ("y", false)].into_iter().collect();
        let effects: State = [("x", true), ("z", true)].into_iter().collect();

        state.apply_effects(&effects);
        assert_eq!(state.get("x"), Some(true));
        assert_eq!(state.get("y"), Some(false));
        assert_eq!(state.get("z"), Some(true));
    }

    #[test]
    fn test_unsatisfied() {
        let state: State = [("a", true), ("b", false)].into_iter().collect();
        let goal: State = [("a", true), ("b", true), ("c", false)].into_iter().collect();

        let missing = state.unsatisfied(&goal);
        assert_eq!(missing.len(), 2);
        assert_eq!(missing.get("b"), Some(true));
        assert_eq!(missing.get("c"), Some(false));
        assert_eq!(missing.get("a"), None);
    }

    #[test]
    fn test_equal_states_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a: State = [("x", true), ("y", false)].into_iter().collect();
        let b: State = [("y", false), ("x", true)].into_iter().collect();
        assert_eq!(a, b);

        let hash = |s: &State| {
            let mut hasher = DefaultHasher::new();
            s.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_facts_and_display_are_ordered() {
        let mut state = State::new();
        state.insert_fact(Fact::new("zeta", true));
        state.insert_fact(("alpha", false).into());

        let keys: Vec<_> = state.facts().map(|f| f.key).collect();
        assert_eq!(keys, ["alpha", "zeta"]);
        assert_eq!(state.to_string(), "{alpha: false, zeta: true}");
        assert_eq!(Fact::new("zeta", true).to_string(), "zeta: true");
    }

    #[test]
    fn test_remove() {
        let mut state = State::from_fact("lit", true);
        assert_eq!(state.remove("lit"), Some(true));
        assert_eq!(state.remove("lit"), None);
        assert!(state.is_empty());
    }
}
