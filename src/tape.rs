//! This module defines the `Tape`, a one-dimensional symbol store that is unbounded in both
//! directions and only materializes the cells that have been written.

use std::collections::VecDeque;
use std::fmt;

/// A Turing Machine tape.
///
/// Cells are stored in a `VecDeque` whose first element sits at index `origin`. Reading
/// outside the materialized span yields the blank symbol; writing outside it grows the
/// storage towards the written index, filling the gap with blanks.
///
/// ```text
///   origin = -2
///   | a | b | c | d |
///    -2  -1   0   1   index
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    origin: i64,
    blank: char,
}

impl Tape {
    /// Creates an empty tape.
    pub fn new(blank: char) -> Self {
        Self {
            cells: VecDeque::new(),
            origin: 0,
            blank,
        }
    }

    /// Creates a tape holding `symbols` at indices `0..symbols.len()`.
    pub fn from_symbols(symbols: impl IntoIterator<Item = char>, blank: char) -> Self {
        Self {
            cells: symbols.into_iter().collect(),
            origin: 0,
            blank,
        }
    }

    /// Returns the symbol at `index`, or the blank symbol if the cell was never written.
    pub fn read(&self, index: i64) -> char {
        self.offset(index)
            .and_then(|i| self.cells.get(i))
            .copied()
            .unwrap_or(self.blank)
    }

    /// Stores `symbol` at `index`, growing the tape in either direction as needed.
    ///
    /// Storage is contiguous: every cell between the materialized span and `index` is filled
    /// with blanks, so memory grows with the distance of the write from the span. A head moving
    /// one cell per step only ever writes next to the span.
    pub fn write(&mut self, index: i64, symbol: char) {
        if self.cells.is_empty() {
            self.origin = index;
            self.cells.push_back(symbol);
            return;
        }

        if index < self.origin {
            // Extend to the left
            for _ in index..self.origin {
                self.cells.push_front(self.blank);
            }
            self.origin = index;
        }

        let end = self.origin + self.cells.len() as i64;
        if index >= end {
            // Extend to the right
            for _ in end..=index {
                self.cells.push_back(self.blank);
            }
        }

        let i = (index - self.origin) as usize;
        self.cells[i] = symbol;
    }

    /// Returns the materialized cells in ascending index order.
    pub fn snapshot(&self) -> Vec<char> {
        self.cells.iter().copied().collect()
    }

    /// Returns the materialized cells without blank cells at either edge.
    pub fn trimmed(&self) -> Vec<char> {
        let blank = self.blank;
        let start = self.cells.iter().position(|&c| c != blank);
        let end = self.cells.iter().rposition(|&c| c != blank);

        match (start, end) {
            (Some(start), Some(end)) => self.cells.range(start..=end).copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the lowest and highest materialized index, or `None` for an empty tape.
    pub fn span(&self) -> Option<(i64, i64)> {
        if self.cells.is_empty() {
            None
        } else {
            Some((self.origin, self.origin + self.cells.len() as i64 - 1))
        }
    }

    /// Returns the number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> char {
        self.blank
    }

    fn offset(&self, index: i64) -> Option<usize> {
        index
            .checked_sub(self.origin)
            .and_then(|d| usize::try_from(d).ok())
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.cells {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
