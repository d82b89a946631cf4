//! This module provides functions for analyzing Turing Machine programs before execution.
//!
//! [`analyze`] performs the structural checks that make a program unusable when they fail.
//! [`lint`] reports problems that do not stop a program from running but usually point at a
//! mistake: states that can never be entered, and wildcard rules whose precedence depends on
//! declaration order.

use std::collections::HashSet;
use std::fmt;

use crate::table::{describe, RuleKey};
use crate::types::{ConfigError, Program, WILDCARD};

/// Represents the non-fatal findings of [`lint`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisWarning {
    /// States with outgoing rules that cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// Two wildcard rules of one state that can match the same symbols. The first declared
    /// rule always wins, so a rule set written for the opposite precedence behaves differently.
    OverlappingWildcards {
        state: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {:?}", states)
            }
            AnalysisWarning::OverlappingWildcards {
                state,
                first,
                second,
            } => write!(
                f,
                "Wildcard rules '{}' and '{}' of state '{}' overlap; '{}' takes precedence",
                first, second, state, first
            ),
        }
    }
}

/// Analyzes a `Program` for structural errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(ConfigError)` describing the first violated check.
pub fn analyze(program: &Program) -> Result<(), ConfigError> {
    let checks: [fn(&Program) -> Result<(), ConfigError>; 3] =
        [check_structure, check_initial_state, check_state_names];

    checks.iter().try_for_each(|check| check(program))
}

/// Collects the non-fatal findings for a `Program`.
pub fn lint(program: &Program) -> Vec<AnalysisWarning> {
    let mut warnings = Vec::new();

    let unreachable = unreachable_states(program);
    if !unreachable.is_empty() {
        warnings.push(AnalysisWarning::UnreachableStates(unreachable));
    }

    warnings.extend(overlapping_wildcards(program));
    warnings
}

/// Checks that the program addresses at least one tape and that every rule agrees on it.
fn check_structure(program: &Program) -> Result<(), ConfigError> {
    let tapes = program.tapes();
    if tapes == 0 {
        return Err(ConfigError::InvalidConfig("No tapes defined".to_string()));
    }

    for (key, action) in program.table.iter() {
        for found in [key.read.len(), action.write.len(), action.moves.len()] {
            if found != tapes {
                return Err(ConfigError::InconsistentTapeCount {
                    expected: tapes,
                    found,
                    context: format!("rule '{}'", describe(key)),
                });
            }
        }
    }

    Ok(())
}

fn check_initial_state(program: &Program) -> Result<(), ConfigError> {
    if program.initial_state.trim().is_empty() {
        return Err(ConfigError::MissingInitialState);
    }

    Ok(())
}

/// Checks that no rule or accepting state uses an empty state name.
fn check_state_names(program: &Program) -> Result<(), ConfigError> {
    let empty_accepting = program
        .accepting_states
        .iter()
        .any(|state| state.trim().is_empty());
    if empty_accepting {
        return Err(ConfigError::InvalidConfig(
            "Accepting states must have a name".to_string(),
        ));
    }

    if let Some((key, _)) = program
        .table
        .iter()
        .find(|(_, action)| action.next_state.trim().is_empty())
    {
        return Err(ConfigError::MalformedRuleKey(format!(
            "rule '{}' has no next state",
            describe(key)
        )));
    }

    Ok(())
}

/// Finds the rule source states that a depth-first walk from the initial state never visits.
fn unreachable_states(program: &Program) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.initial_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for (_, action) in program.table.rules_for(state) {
            if !visited.contains(action.next_state.as_str()) {
                queue.push(action.next_state.as_str());
            }
        }
    }

    let mut unreachable: Vec<String> = program
        .states()
        .into_iter()
        .filter(|state| !visited.contains(state))
        .map(str::to_string)
        .collect();
    unreachable.sort();
    unreachable
}

/// Finds pairs of wildcard rules of the same state that both match some configuration.
fn overlapping_wildcards(program: &Program) -> Vec<AnalysisWarning> {
    let mut warnings = Vec::new();

    for state in program.states() {
        let wildcards: Vec<&RuleKey> = program
            .table
            .rules_for(state)
            .map(|(key, _)| key)
            .filter(|key| key.has_wildcard())
            .collect();

        for (i, first) in wildcards.iter().enumerate() {
            for second in &wildcards[i + 1..] {
                if patterns_overlap(&first.read, &second.read) {
                    warnings.push(AnalysisWarning::OverlappingWildcards {
                        state: state.to_string(),
                        first: describe(first),
                        second: describe(second),
                    });
                }
            }
        }
    }

    warnings
}

fn patterns_overlap(a: &[char], b: &[char]) -> bool {
    a.iter()
        .zip(b)
        .all(|(&x, &y)| x == WILDCARD || y == WILDCARD || x == y)
}
