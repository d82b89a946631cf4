//! This module defines the core data structures and types shared by the simulator:
//! reserved symbols, head directions, rule actions, execution outcomes, and the error type.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::table::TransitionTable;

/// The symbol held by every cell that has never been written.
pub const BLANK: char = '_';
/// Matches any symbol in a read pattern; leaves the cell untouched in a write pattern.
/// Never stored on a tape.
pub const WILDCARD: char = '*';
/// The step limit used by the CLI when none is given.
pub const DEFAULT_MAX_STEPS: usize = 50_000;
/// The tape count assumed for a rule set that neither declares one nor has any rules.
pub const DEFAULT_TAPES: usize = 3;

/// A loaded rule set: the initial state, the accepting states, and the transition table.
///
/// A program is immutable once built and is shared between machines through an `Arc`.
#[derive(Debug, Clone)]
pub struct Program {
    /// The name of the rule set.
    pub name: String,
    /// The state every run starts in.
    pub initial_state: String,
    /// Reaching any of these states ends a run with [`Outcome::Accepted`].
    pub accepting_states: HashSet<String>,
    /// The transition rules, in declaration order.
    pub table: TransitionTable,
}

impl Program {
    /// The number of tapes the rules address.
    pub fn tapes(&self) -> usize {
        self.table.tapes()
    }

    /// Checks whether `state` ends a run with acceptance.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.contains(state)
    }

    /// The distinct source states of all rules, in declaration order.
    pub fn states(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.table
            .iter()
            .map(|(key, _)| key.state.as_str())
            .filter(|state| seen.insert(*state))
            .collect()
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    #[serde(rename = "L", alias = "Left")]
    Left,
    /// Move the head one position to the right.
    #[serde(rename = "R", alias = "Right")]
    Right,
    /// Keep the head in the same position.
    #[serde(rename = "S", alias = "Stay")]
    Stay,
}

/// What a matching rule does to the machine.
///
/// `write` and `moves` hold one entry per tape. A `WILDCARD` in `write` leaves that
/// tape's cell unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The state the machine transitions to.
    pub next_state: String,
    /// The symbols written under each head.
    pub write: Vec<char>,
    /// The head movement applied to each tape after writing.
    pub moves: Vec<Direction>,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A rule matched and was applied.
    Advanced,
    /// No rule matched; the machine was left untouched.
    Halted,
}

/// The terminal classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The machine entered an accepting state.
    Accepted,
    /// No rule matched before an accepting state was reached.
    Rejected,
    /// The run stopped only because the step budget was spent.
    StepLimitExceeded,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::StepLimitExceeded => "step limit exceeded",
        };
        f.write_str(name)
    }
}

/// The result of [`TuringMachine::run`](crate::machine::TuringMachine::run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub final_state: String,
    pub steps_taken: usize,
    pub outcome: Outcome,
}

/// Represents the errors that can occur while building a program or preparing a machine.
///
/// Rejection and step-limit exhaustion are not errors; they are reported through
/// [`Outcome`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule set does not name an initial state.
    #[error("Missing initial state")]
    MissingInitialState,
    /// A rule key is not of the form `state|s1,...,sN`.
    #[error("Malformed rule key: {0}")]
    MalformedRuleKey(String),
    /// A rule, config, or input disagrees with the number of tapes.
    #[error("Inconsistent tape count in {context}: expected {expected}, found {found}")]
    InconsistentTapeCount {
        expected: usize,
        found: usize,
        context: String,
    },
    /// The same state and read pattern were declared twice.
    #[error("Duplicate rule: {0}")]
    DuplicateRule(String),
    /// A symbol is not a single character or is misplaced.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    /// The wildcard symbol was about to be stored on a tape.
    #[error("The wildcard symbol '*' cannot be written to a tape")]
    WildcardOnTape,
    /// More tape inputs were supplied than the machine has tapes.
    #[error("Too many tape inputs provided: {inputs} inputs for {tapes} tapes")]
    TooManyInputs { inputs: usize, tapes: usize },
    /// The machine configuration itself is unusable.
    #[error("Invalid machine configuration: {0}")]
    InvalidConfig(String),
    /// The rule-set document is not valid JSON or has the wrong shape.
    #[error("Rule set parsing error: {0}")]
    ParseError(#[from] serde_json::Error),
    /// Reading or writing a file failed.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"L\"");

        let right: Direction = serde_json::from_str("\"R\"").unwrap();
        let stay: Direction = serde_json::from_str("\"Stay\"").unwrap();
        assert_eq!(right, Direction::Right);
        assert_eq!(stay, Direction::Stay);

        assert!(serde_json::from_str::<Direction>("\"X\"").is_err());
    }

    #[test]
    fn test_program_states_in_declaration_order() {
        let mut table = TransitionTable::new(1);
        let action = |next: &str| Action {
            next_state: next.to_string(),
            write: vec![WILDCARD],
            moves: vec![Direction::Right],
        };
        table.insert("scan", vec!['1'], action("scan")).unwrap();
        table.insert("back", vec!['*'], action("done")).unwrap();
        table.insert("scan", vec!['_'], action("back")).unwrap();

        let program = Program {
            name: "States".to_string(),
            initial_state: "scan".to_string(),
            accepting_states: HashSet::from(["done".to_string()]),
            table,
        };

        assert_eq!(program.states(), vec!["scan", "back"]);
        assert_eq!(program.tapes(), 1);
        assert!(program.is_accepting("done"));
        assert!(!program.is_accepting("scan"));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Accepted.to_string(), "accepted");
        assert_eq!(Outcome::StepLimitExceeded.to_string(), "step limit exceeded");
    }

    #[test]
    fn test_error_display() {
        let error = ConfigError::InconsistentTapeCount {
            expected: 3,
            found: 2,
            context: "rule 'q0|1,1'".to_string(),
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("expected 3"));
        assert!(error_msg.contains("q0|1,1"));
        assert!(ConfigError::WildcardOnTape.to_string().contains('*'));
    }
}
