//! Byte ranges of tokens and tree nodes.
//!
//! A [`Span`] pairs the [`Position`] where a construct begins with the byte
//! offset where it ends, which is all the capture machinery needs to slice
//! verbatim text back out of a document.

use std::ops::Range;

use qmlweb_foundation::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A half-open byte range of source text with its starting position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Line, column and byte offset of the first byte.
    pub origin: Position,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span from `start..end` beginning at `line`:`column`.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            origin: Position::new(line, column, start),
            end,
        }
    }

    /// An empty span at the very beginning of a document.
    #[must_use]
    pub const fn start_of_input() -> Self {
        Self::new(0, 0, 1, 1)
    }

    /// Byte offset of the first byte.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.origin.offset
    }

    /// The covered bytes as a range.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.origin.offset..self.end
    }

    /// Joins this span with a later one.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        self.until(other.end)
    }

    /// Extends or shrinks this span so it ends at `end`.
    #[must_use]
    pub const fn until(self, end: usize) -> Self {
        Self {
            origin: self.origin,
            end,
        }
    }

    /// The covered text, or `""` if the span does not fit `source`.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or_default()
    }

    /// Where the span begins, for error reporting.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.origin
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::start_of_input()
    }
}
