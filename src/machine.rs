//! This module defines the `TuringMachine` struct, which simulates a deterministic multi-tape
//! Turing Machine. It owns the tapes, the head positions, and the current state, and drives
//! them through a shared, read-only [`Program`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::tape::{Tape, DEFAULT_CHUNK_SIZE};
use crate::trace::{Trace, DEFAULT_TRACE_RADIUS};
use crate::types::{
    ConfigError, Outcome, Program, RunResult, Step, DEFAULT_TAPES, WILDCARD,
};

/// Construction-time settings for a [`TuringMachine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// The number of tapes. Must match the program.
    pub tapes: usize,
    /// The number of cells a tape grows by when a head leaves its buffer.
    pub chunk_size: usize,
    /// Records a [`TraceEntry`](crate::trace::TraceEntry) per step when set.
    pub trace: bool,
    /// The number of cells shown on each side of a head in the trace.
    pub trace_radius: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tapes: DEFAULT_TAPES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            trace: true,
            trace_radius: DEFAULT_TRACE_RADIUS,
        }
    }
}

impl MachineConfig {
    /// The default configuration sized for `program`.
    pub fn for_program(program: &Program) -> Self {
        Self {
            tapes: program.tapes(),
            ..Self::default()
        }
    }

    /// Disables trace recording.
    pub fn without_trace(mut self) -> Self {
        self.trace = false;
        self
    }
}

/// The initial contents of one tape.
///
/// `content` is written rightwards starting at the head; `head` overrides the default head
/// position of 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeInput {
    pub content: Option<String>,
    pub head: Option<isize>,
}

impl TapeInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            head: None,
        }
    }

    pub fn with_head(mut self, head: isize) -> Self {
        self.head = Some(head);
        self
    }
}

impl From<&str> for TapeInput {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

/// Represents a multi-tape Turing Machine.
///
/// A machine is mutated only by [`step`](Self::step) and [`run`](Self::run); tape contents
/// are replaced only through [`reset`](Self::reset) and [`load`](Self::load).
#[derive(Debug, Clone)]
pub struct TuringMachine {
    program: Arc<Program>,
    config: MachineConfig,
    state: String,
    blank: Tape,
    tapes: Vec<Tape>,
    heads: Vec<isize>,
    symbols: Vec<char>,
    trace: Trace,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a machine with blank tapes in the program's initial state.
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::InvalidConfig)` if the config has no tapes or a zero chunk size.
    /// * `Err(ConfigError::InconsistentTapeCount)` if the config and program disagree on the
    ///   number of tapes.
    pub fn new(program: Arc<Program>, config: MachineConfig) -> Result<Self, ConfigError> {
        if config.tapes == 0 {
            return Err(ConfigError::InvalidConfig(
                "a machine needs at least one tape".to_string(),
            ));
        }
        if program.tapes() != config.tapes {
            return Err(ConfigError::InconsistentTapeCount {
                expected: config.tapes,
                found: program.tapes(),
                context: format!("program '{}'", program.name),
            });
        }

        let mut machine = Self {
            state: program.initial_state.clone(),
            blank: Tape::new(config.chunk_size)?,
            tapes: Vec::new(),
            heads: Vec::new(),
            symbols: vec![WILDCARD; config.tapes],
            trace: Trace::new(config.trace_radius, config.trace),
            step_count: 0,
            program,
            config,
        };
        machine.reset();

        Ok(machine)
    }

    /// Resets the machine to blank tapes, heads at 0, and the initial state.
    ///
    /// The trace is cleared and restarted with the reset configuration.
    pub fn reset(&mut self) {
        self.clear();
        self.record();
    }

    /// Resets the machine and places `inputs` on the tapes, one input per tape.
    ///
    /// Tapes without an input stay blank. Validation happens before anything is touched, so
    /// a failed load leaves the machine as it was.
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::TooManyInputs)` if there are more inputs than tapes.
    /// * `Err(ConfigError::WildcardOnTape)` if an input contains the wildcard.
    pub fn load(&mut self, inputs: &[TapeInput]) -> Result<(), ConfigError> {
        if inputs.len() > self.tapes.len() {
            return Err(ConfigError::TooManyInputs {
                inputs: inputs.len(),
                tapes: self.tapes.len(),
            });
        }
        if inputs
            .iter()
            .filter_map(|input| input.content.as_deref())
            .any(|content| content.contains(WILDCARD))
        {
            return Err(ConfigError::WildcardOnTape);
        }

        self.clear();
        for (i, input) in inputs.iter().enumerate() {
            if let Some(head) = input.head {
                self.heads[i] = head;
            }
            let start = self.heads[i];
            for (offset, symbol) in input.content.iter().flat_map(|c| c.chars()).enumerate() {
                self.tapes[i].put(start + offset as isize, symbol);
            }
        }
        self.record();

        tracing::debug!(
            program = %self.program.name,
            inputs = inputs.len(),
            heads = ?self.heads,
            "loaded tapes"
        );
        Ok(())
    }

    /// Executes a single step.
    ///
    /// Reads the symbol under every head and resolves a rule. If none matches, nothing is
    /// changed and `Step::Halted` is returned. Otherwise the writes (skipping wildcards) and
    /// moves are applied, the state changes, and the new configuration is traced.
    pub fn step(&mut self) -> Step {
        for (i, tape) in self.tapes.iter_mut().enumerate() {
            self.symbols[i] = tape.read(self.heads[i]);
        }

        let Some(action) = self.program.table.resolve(&self.state, &self.symbols) else {
            tracing::trace!(state = %self.state, symbols = ?self.symbols, "no matching rule");
            return Step::Halted;
        };

        for (i, (&symbol, &direction)) in action.write.iter().zip(&action.moves).enumerate() {
            if symbol != WILDCARD {
                self.tapes[i].put(self.heads[i], symbol);
            }
            self.heads[i] = Tape::move_head(self.heads[i], direction);
        }

        tracing::trace!(from = %self.state, to = %action.next_state, symbols = ?self.symbols, "step");
        self.state.clone_from(&action.next_state);
        self.step_count += 1;
        self.record();

        Step::Advanced
    }

    /// Runs the machine until it accepts, rejects, or has taken `max_steps` steps.
    pub fn run(&mut self, max_steps: usize) -> RunResult {
        let mut steps_taken = 0;
        let mut halted = false;

        while !self.is_accepting() && steps_taken < max_steps {
            match self.step() {
                Step::Advanced => steps_taken += 1,
                Step::Halted => {
                    halted = true;
                    break;
                }
            }
        }

        let outcome = if self.is_accepting() {
            Outcome::Accepted
        } else if halted {
            Outcome::Rejected
        } else {
            Outcome::StepLimitExceeded
        };

        tracing::debug!(
            program = %self.program.name,
            state = %self.state,
            steps = steps_taken,
            %outcome,
            "run finished"
        );

        RunResult {
            final_state: self.state.clone(),
            steps_taken,
            outcome,
        }
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Checks whether the current state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.program.is_accepting(&self.state)
    }

    /// Returns the total number of steps executed since the last reset or load.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns a slice of the machine's tapes.
    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// Returns the logical head position of every tape.
    pub fn heads(&self) -> &[isize] {
        &self.heads
    }

    /// Returns the symbols currently under each head.
    pub fn symbols(&self) -> Vec<char> {
        self.tapes
            .iter()
            .zip(&self.heads)
            .map(|(tape, &head)| tape.peek(head))
            .collect()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    fn clear(&mut self) {
        self.state.clone_from(&self.program.initial_state);
        self.tapes = vec![self.blank.clone(); self.config.tapes];
        self.heads = vec![0; self.config.tapes];
        self.trace.clear();
        self.step_count = 0;
    }

    fn record(&mut self) {
        self.trace.record(&self.state, &self.tapes, &self.heads);
    }
}
