//! This module parses JSON rule sets into a [`Program`].
//!
//! A rule set looks like this:
//!
//! ```json
//! {
//!   "name": "Unary addition",
//!   "initial_state": "q0",
//!   "accepting_states": ["qf"],
//!   "transitions": {
//!     "q0|*,1,*": { "next": "q0", "write": ["1", "*", "*"], "move": ["R", "R", "S"] }
//!   }
//! }
//! ```
//!
//! Transition keys are `state|s1,...,sN`, one symbol per tape. Rules keep the order they are
//! declared in, which decides between overlapping wildcard rules.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;

use crate::analyzer::{analyze, lint};
use crate::table::TransitionTable;
use crate::types::{Action, ConfigError, Direction, Program, DEFAULT_TAPES};

const DEFAULT_NAME: &str = "Untitled";

#[derive(Debug, Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    initial_state: Option<String>,
    #[serde(default)]
    accepting_states: Vec<String>,
    #[serde(default)]
    tapes: Option<usize>,
    #[serde(default)]
    transitions: IndexMap<String, RawAction>,
    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    next: String,
    write: Vec<String>,
    #[serde(rename = "move")]
    moves: Vec<Direction>,
    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

/// Parses the given JSON rule set into a `Program`.
///
/// The parsed program is validated before being returned, and any lint warnings are logged.
///
/// # Returns
///
/// * `Ok(Program)` if the input is a well-formed, valid rule set.
/// * `Err(ConfigError::ParseError)` if the input is not JSON of the expected shape.
/// * `Err(ConfigError::MissingInitialState)` if no initial state is named.
/// * `Err(ConfigError::MalformedRuleKey)` or `Err(ConfigError::InvalidSymbol)` for bad rules.
/// * `Err(ConfigError::InconsistentTapeCount)` if rules disagree on the number of tapes.
pub fn parse(input: &str) -> Result<Program, ConfigError> {
    let document: RuleSetDocument = serde_json::from_str(input)?;
    let name = document.name.unwrap_or_else(|| DEFAULT_NAME.to_string());

    // Unknown keys are ignored.
    if !document.extra.is_empty() {
        let keys: Vec<&String> = document.extra.keys().collect();
        tracing::warn!(program = %name, ?keys, "ignoring unknown rule set keys");
    }

    let initial_state = document
        .initial_state
        .filter(|state| !state.trim().is_empty())
        .ok_or(ConfigError::MissingInitialState)?;

    let rules = document
        .transitions
        .iter()
        .map(|(key, raw)| {
            if !raw.extra.is_empty() {
                let keys: Vec<&String> = raw.extra.keys().collect();
                tracing::warn!(program = %name, rule = %key, ?keys, "ignoring unknown rule keys");
            }
            Ok((parse_key(key)?, raw))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let tapes = document
        .tapes
        .or_else(|| rules.first().map(|((_, read), _)| read.len()))
        .unwrap_or(DEFAULT_TAPES);

    let mut table = TransitionTable::new(tapes);
    for ((state, read), raw) in rules {
        let action = Action {
            next_state: raw.next.clone(),
            write: raw
                .write
                .iter()
                .map(|symbol| parse_symbol(symbol))
                .collect::<Result<_, _>>()?,
            moves: raw.moves.clone(),
        };
        table.insert(state, read, action)?;
    }

    let program = Program {
        name,
        initial_state,
        accepting_states: document.accepting_states.into_iter().collect::<HashSet<_>>(),
        table,
    };

    analyze(&program)?;
    for warning in lint(&program) {
        tracing::warn!(program = %program.name, "{}", warning);
    }

    tracing::debug!(
        program = %program.name,
        tapes = program.tapes(),
        rules = program.table.len(),
        "parsed rule set"
    );
    Ok(program)
}

/// Splits a `state|s1,...,sN` key into its state and read pattern.
fn parse_key(key: &str) -> Result<(String, Vec<char>), ConfigError> {
    let (state, symbols) = key
        .split_once('|')
        .ok_or_else(|| ConfigError::MalformedRuleKey(key.to_string()))?;

    if state.trim().is_empty() {
        return Err(ConfigError::MalformedRuleKey(key.to_string()));
    }

    let read = symbols
        .split(',')
        .map(single_char)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ConfigError::MalformedRuleKey(key.to_string()))?;

    Ok((state.to_string(), read))
}

fn parse_symbol(symbol: &str) -> Result<char, ConfigError> {
    single_char(symbol).ok_or_else(|| ConfigError::InvalidSymbol(format!("{:?}", symbol)))
}

fn single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
