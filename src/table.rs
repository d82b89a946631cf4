//! This module defines the `TransitionTable`, which maps a state and the symbols under every
//! head to the [`Action`] the machine takes.
//!
//! Rules are kept in declaration order. Resolution tries an exact key match first and falls
//! back to the first wildcard rule of the state, in declaration order, whose pattern matches.

use indexmap::{Equivalent, IndexMap};
use std::collections::HashMap;

use crate::types::{Action, ConfigError, WILDCARD};

/// The left-hand side of a rule: a source state and one read symbol per tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub state: String,
    pub read: Vec<char>,
}

impl RuleKey {
    /// Returns true if any read position is the wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.read.contains(&WILDCARD)
    }
}

/// Borrowed form of [`RuleKey`]. Hashes identically, so lookups need no allocation.
#[derive(Hash)]
struct RuleKeyRef<'a> {
    state: &'a str,
    read: &'a [char],
}

impl Equivalent<RuleKey> for RuleKeyRef<'_> {
    fn equivalent(&self, key: &RuleKey) -> bool {
        self.state == key.state && self.read == key.read.as_slice()
    }
}

/// Returns true if `pattern` matches `symbols` position by position.
pub fn matches(pattern: &[char], symbols: &[char]) -> bool {
    pattern.len() == symbols.len()
        && pattern
            .iter()
            .zip(symbols)
            .all(|(&expected, &actual)| expected == WILDCARD || expected == actual)
}

/// An insertion-ordered set of transition rules for a fixed number of tapes.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    tapes: usize,
    rules: IndexMap<RuleKey, Action>,
    by_state: HashMap<String, Vec<usize>>,
}

impl TransitionTable {
    /// Creates an empty table for machines with `tapes` tapes.
    pub fn new(tapes: usize) -> Self {
        Self {
            tapes,
            rules: IndexMap::new(),
            by_state: HashMap::new(),
        }
    }

    /// Appends a rule.
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::InconsistentTapeCount)` if the read, write, or move lists do not
    ///   have one entry per tape.
    /// * `Err(ConfigError::DuplicateRule)` if the same state and read pattern already exist.
    pub fn insert(
        &mut self,
        state: impl Into<String>,
        read: Vec<char>,
        action: Action,
    ) -> Result<(), ConfigError> {
        let key = RuleKey {
            state: state.into(),
            read,
        };

        for (found, what) in [
            (key.read.len(), "read pattern"),
            (action.write.len(), "write pattern"),
            (action.moves.len(), "moves"),
        ] {
            if found != self.tapes {
                return Err(ConfigError::InconsistentTapeCount {
                    expected: self.tapes,
                    found,
                    context: format!("{} of rule '{}'", what, describe(&key)),
                });
            }
        }

        if self.rules.contains_key(&key) {
            return Err(ConfigError::DuplicateRule(describe(&key)));
        }

        let (index, _) = self.rules.insert_full(key.clone(), action);
        self.by_state.entry(key.state).or_default().push(index);

        Ok(())
    }

    /// Finds the action for `state` given the symbols under the heads.
    ///
    /// An exact rule always wins, even over a wildcard rule declared before it. Among
    /// wildcard rules the first declared match wins.
    pub fn resolve(&self, state: &str, symbols: &[char]) -> Option<&Action> {
        let exact = RuleKeyRef {
            state,
            read: symbols,
        };
        if let Some(action) = self.rules.get(&exact) {
            return Some(action);
        }

        self.by_state
            .get(state)?
            .iter()
            .filter_map(|&index| self.rules.get_index(index))
            .find(|(key, _)| matches(&key.read, symbols))
            .map(|(_, action)| action)
    }

    /// The number of tapes every rule addresses.
    pub fn tapes(&self) -> usize {
        self.tapes
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over all rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &Action)> {
        self.rules.iter()
    }

    /// Iterates over the rules of one source state in declaration order.
    pub fn rules_for<'a>(&'a self, state: &str) -> impl Iterator<Item = (&'a RuleKey, &'a Action)> {
        self.by_state
            .get(state)
            .into_iter()
            .flatten()
            .filter_map(|&index| self.rules.get_index(index))
    }

    /// Returns true if at least one rule leaves `state`.
    pub fn has_state(&self, state: &str) -> bool {
        self.by_state.contains_key(state)
    }
}

/// Formats a key the way rule sets spell it: `state|s1,...,sN`.
pub fn describe(key: &RuleKey) -> String {
    let symbols: Vec<String> = key.read.iter().map(char::to_string).collect();
    format!("{}|{}", key.state, symbols.join(","))
}
