//! This crate provides the core logic for a deterministic multi-tape Turing Machine simulator.
//! It includes modules for parsing JSON rule sets, matching transitions with wildcards,
//! executing machines on growable tapes, and recording derivation traces.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `analyze` and `lint` functions and the `AnalysisWarning` enum from the analyzer module.
pub use analyzer::{analyze, lint, AnalysisWarning};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the machine and its construction types from the machine module.
pub use machine::{MachineConfig, TapeInput, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the `ProgramCatalog` struct from the programs module.
pub use programs::ProgramCatalog;
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the trace types from the trace module.
pub use trace::{TapeWindow, Trace, TraceEntry};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Action, ConfigError, Direction, Outcome, Program, RunResult, Step, BLANK, WILDCARD,
};
