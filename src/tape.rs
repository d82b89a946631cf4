//! This module defines the `Tape` struct: a logically infinite, bidirectional tape backed by
//! a finite buffer that grows in fixed-size chunks.
//!
//! Heads are logical positions (`isize`). The buffer keeps an `origin`, the physical index of
//! logical position 0, and shifts it whenever chunks are prepended, so a logical position
//! addresses the same cell for the whole lifetime of the tape.

use std::fmt;
use std::iter;

use crate::types::{ConfigError, Direction, BLANK, WILDCARD};

/// The chunk size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// A growable tape with a blank default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    origin: usize,
    chunk: usize,
}

impl Tape {
    /// Creates a blank tape of `2 * chunk` cells with logical position 0 in the middle.
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::InvalidConfig)` if `chunk` is 0.
    pub fn new(chunk: usize) -> Result<Self, ConfigError> {
        if chunk == 0 {
            return Err(ConfigError::InvalidConfig(
                "chunk size must be positive".to_string(),
            ));
        }

        Ok(Self::blank(chunk))
    }

    fn blank(chunk: usize) -> Self {
        Self {
            cells: vec![BLANK; 2 * chunk],
            origin: chunk,
            chunk,
        }
    }

    /// Returns the symbol at `head`, growing the buffer first if `head` lies outside it.
    pub fn read(&mut self, head: isize) -> char {
        let index = self.ensure(head);
        self.cells[index]
    }

    /// Returns the symbol at `head` without growing the buffer.
    pub fn peek(&self, head: isize) -> char {
        self.physical(head)
            .map(|index| self.cells[index])
            .unwrap_or(BLANK)
    }

    /// Overwrites the cell at `head`.
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::WildcardOnTape)` if `symbol` is the wildcard.
    pub fn write(&mut self, head: isize, symbol: char) -> Result<(), ConfigError> {
        if symbol == WILDCARD {
            return Err(ConfigError::WildcardOnTape);
        }

        self.put(head, symbol);
        Ok(())
    }

    /// Moves a head one cell. Growth is deferred to the next `read` or `write`.
    pub fn move_head(head: isize, direction: Direction) -> isize {
        match direction {
            Direction::Left => head - 1,
            Direction::Right => head + 1,
            Direction::Stay => head,
        }
    }

    /// Returns `2 * radius + 1` symbols centred on `head`.
    pub fn window(&self, head: isize, radius: usize) -> Vec<char> {
        let radius = radius as isize;
        (head - radius..=head + radius)
            .map(|pos| self.peek(pos))
            .collect()
    }

    /// The raw buffer, including blank padding.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// The physical index of logical position 0.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// The half-open logical range currently backed by the buffer.
    pub fn bounds(&self) -> (isize, isize) {
        let start = -(self.origin as isize);
        (start, start + self.cells.len() as isize)
    }

    /// The inclusive logical range between the first and last non-blank cells.
    pub fn span(&self) -> Option<(isize, isize)> {
        let first = self.cells.iter().position(|&c| c != BLANK)?;
        let last = self.cells.iter().rposition(|&c| c != BLANK)?;
        let origin = self.origin as isize;
        Some((first as isize - origin, last as isize - origin))
    }

    /// The tape contents with leading and trailing blanks removed.
    pub fn trimmed(&self) -> String {
        match self.span() {
            Some((first, last)) => (first..=last).map(|pos| self.peek(pos)).collect(),
            None => String::new(),
        }
    }

    /// Writes without the wildcard check. Callers guarantee `symbol != WILDCARD`.
    pub(crate) fn put(&mut self, head: isize, symbol: char) {
        let index = self.ensure(head);
        self.cells[index] = symbol;
    }

    fn physical(&self, head: isize) -> Option<usize> {
        let index = self.origin as isize + head;
        (index >= 0 && (index as usize) < self.cells.len()).then_some(index as usize)
    }

    /// Grows the buffer in whole chunks until `head` is addressable and returns its index.
    fn ensure(&mut self, head: isize) -> usize {
        let index = self.origin as isize + head;

        if index < 0 {
            let grow = index.unsigned_abs().div_ceil(self.chunk) * self.chunk;
            self.cells.splice(0..0, iter::repeat(BLANK).take(grow));
            self.origin += grow;
            tracing::trace!(grow, origin = self.origin, "tape grew left");
            return (index + grow as isize) as usize;
        }

        let index = index as usize;
        if index >= self.cells.len() {
            let grow = (index - self.cells.len() + 1).div_ceil(self.chunk) * self.chunk;
            self.cells.resize(self.cells.len() + grow, BLANK);
            tracing::trace!(grow, len = self.cells.len(), "tape grew right");
        }

        index
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::blank(DEFAULT_CHUNK_SIZE)
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_chunk_is_rejected() {
        assert!(matches!(Tape::new(0), Err(ConfigError::InvalidConfig(_))));
        assert_eq!(Tape::default(), Tape::new(DEFAULT_CHUNK_SIZE).unwrap());
    }

    #[test]
    fn test_new_tape_is_blank_and_centred() {
        let tape = Tape::new(4).unwrap();
        assert_eq!(tape.cells().len(), 8);
        assert_eq!(tape.origin(), 4);
        assert_eq!(tape.bounds(), (-4, 4));
        assert_eq!(tape.span(), None);
        assert_eq!(tape.trimmed(), "");
    }

    #[test]
    fn test_read_grows_right_in_chunks() {
        let mut tape = Tape::new(4).unwrap();
        assert_eq!(tape.read(4), BLANK);
        assert_eq!(tape.cells().len(), 12);

        assert_eq!(tape.read(13), BLANK);
        assert_eq!(tape.cells().len(), 20);
        assert_eq!(tape.origin(), 4);
    }

    #[test]
    fn test_read_grows_left_and_shifts_origin() {
        let mut tape = Tape::new(4).unwrap();
        tape.write(-4, 'a').unwrap();
        tape.write(3, 'b').unwrap();

        assert_eq!(tape.read(-5), BLANK);
        assert_eq!(tape.origin(), 8);
        assert_eq!(tape.bounds(), (-8, 4));

        // Previously written logical positions stay addressable.
        assert_eq!(tape.read(-4), 'a');
        assert_eq!(tape.read(3), 'b');
        assert_eq!(tape.trimmed(), "a______b");
    }

    #[test]
    fn test_far_left_growth_uses_whole_chunks() {
        let mut tape = Tape::new(10).unwrap();
        assert_eq!(tape.read(-35), BLANK);
        assert_eq!(tape.origin(), 40);
        assert_eq!(tape.cells().len(), 50);
    }

    #[test]
    fn test_write_rejects_wildcard() {
        let mut tape = Tape::new(2).unwrap();
        assert!(matches!(
            tape.write(0, WILDCARD),
            Err(ConfigError::WildcardOnTape)
        ));
        assert_eq!(tape.peek(0), BLANK);
    }

    #[test]
    fn test_move_head() {
        assert_eq!(Tape::move_head(0, Direction::Left), -1);
        assert_eq!(Tape::move_head(0, Direction::Right), 1);
        assert_eq!(Tape::move_head(7, Direction::Stay), 7);
    }

    #[test]
    fn test_peek_does_not_grow() {
        let tape = Tape::new(2).unwrap();
        assert_eq!(tape.peek(1000), BLANK);
        assert_eq!(tape.peek(-1000), BLANK);
        assert_eq!(tape.cells().len(), 4);
    }

    #[test]
    fn test_window_is_centred_on_head() {
        let mut tape = Tape::new(2).unwrap();
        tape.write(0, '1').unwrap();
        tape.write(1, '0').unwrap();

        assert_eq!(tape.window(0, 2), vec!['_', '_', '1', '0', '_']);
        assert_eq!(tape.window(-3, 1), vec!['_', '_', '_']);
    }

    proptest! {
        #[test]
        fn unwritten_cells_read_blank(chunk in 1usize..16, pos in -5_000isize..5_000) {
            let mut tape = Tape::new(chunk).unwrap();
            prop_assert_eq!(tape.read(pos), BLANK);
            let (start, end) = tape.bounds();
            prop_assert!(start <= pos && pos < end);
        }

        #[test]
        fn write_then_read_returns_symbol(
            chunk in 1usize..16,
            writes in prop::collection::vec((-500isize..500, "[a-z01]"), 1..20),
        ) {
            let mut tape = Tape::new(chunk).unwrap();
            let mut expected = std::collections::HashMap::new();
            for (pos, symbol) in &writes {
                let symbol = symbol.chars().next().unwrap();
                tape.write(*pos, symbol).unwrap();
                expected.insert(*pos, symbol);
            }
            for (pos, symbol) in expected {
                prop_assert_eq!(tape.read(pos), symbol);
            }
        }
    }
}
