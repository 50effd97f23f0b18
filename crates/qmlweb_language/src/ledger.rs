//! Interval ledger of source rewrites.
//!
//! The declarative grammar never edits the source buffer. Instead it records
//! `(byte range, replacement)` entries here and asks the ledger for the
//! effective text of any range it wants to capture.
//!
//! Only the first recorded entry that overlaps a queried range is applied.
//! Edits nested inside or adjacent to an earlier entry are not composed.

use std::ops::Range;

/// Range-to-replacement edit table over one source buffer.
#[derive(Debug, Clone)]
pub struct IntervalLedger<'src> {
    source: &'src str,
    entries: Vec<(Range<usize>, String)>,
}

impl<'src> IntervalLedger<'src> {
    /// Creates an empty ledger over `source`.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self {
            source,
            entries: Vec::new(),
        }
    }

    /// Records that `range` should read as `replacement`.
    pub fn record(&mut self, range: Range<usize>, replacement: impl Into<String>) {
        self.entries.push((range, replacement.into()));
    }

    /// Returns the number of recorded edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no edits were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the text of `range` with the first overlapping edit applied.
    ///
    /// Ranges that touch an edit at a single boundary (`range.end ==
    /// edit.start` or `edit.end == range.start`) count as overlapping.
    #[must_use]
    pub fn effective_text(&self, range: Range<usize>) -> String {
        let overlapping = self
            .entries
            .iter()
            .find(|(edit, _)| range.end >= edit.start && edit.end >= range.start);

        match overlapping {
            Some((edit, replacement)) => {
                let mut text = String::with_capacity(range.len() + replacement.len());
                text.push_str(self.slice(range.start, edit.start));
                text.push_str(replacement);
                text.push_str(self.slice(edit.end, range.end));
                text
            }
            None => self.slice(range.start, range.end).to_string(),
        }
    }

    /// Raw source between two offsets, empty when inverted or out of bounds.
    fn slice(&self, start: usize, end: usize) -> &'src str {
        if start >= end {
            return "";
        }
        self.source.get(start..end.min(self.source.len())).unwrap_or("")
    }
}
