//! This module records a windowed snapshot of every tape after each step and renders the
//! snapshots as a line-oriented derivation log.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::tape::Tape;
use crate::types::ConfigError;

/// The number of cells shown on each side of a head when none is configured.
pub const DEFAULT_TRACE_RADIUS: usize = 15;

const SEPARATOR_WIDTH: usize = 60;

/// A fixed-width view of one tape around its head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TapeWindow {
    /// The symbols in the window, left to right.
    pub symbols: String,
    /// The column of the head within `symbols`.
    pub head: usize,
}

/// A snapshot of the machine: its state and a window on every tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub state: String,
    pub windows: Vec<TapeWindow>,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {}", self.state)?;
        for (i, window) in self.windows.iter().enumerate() {
            let prefix = format!("  Tape {}: ...", i);
            writeln!(f, "{}{}...", prefix, window.symbols)?;
            writeln!(f, "{:width$}^", "", width = prefix.len() + window.head)?;
        }
        writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))
    }
}

/// An append-only sequence of [`TraceEntry`] values.
///
/// A disabled trace ignores every `record` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    enabled: bool,
    radius: usize,
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new(radius: usize, enabled: bool) -> Self {
        Self {
            enabled,
            radius,
            entries: Vec::new(),
        }
    }

    /// Appends a snapshot of `tapes` around `heads`. Does not grow the tapes.
    pub fn record(&mut self, state: &str, tapes: &[Tape], heads: &[isize]) {
        if !self.enabled {
            return;
        }

        let windows = tapes
            .iter()
            .zip(heads)
            .map(|(tape, &head)| TapeWindow {
                symbols: tape.window(head, self.radius).into_iter().collect(),
                head: self.radius,
            })
            .collect();

        self.entries.push(TraceEntry {
            state: state.to_string(),
            windows,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders every entry as one block of the derivation log.
    pub fn render(&self) -> String {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Writes the rendered derivation log to `path`.
    pub fn export(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.render()).map_err(|e| {
            ConfigError::FileError(format!("Failed to write trace {}: {}", path.display(), e))
        })?;

        tracing::debug!(entries = self.len(), path = %path.display(), "exported derivation log");
        Ok(())
    }
}
