//! Source positions and excerpts for error reporting.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of context lines shown on each side of the failing line.
pub const CONTEXT_LINES: u32 = 3;

/// A point in source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Byte offset from the start of the source.
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line: {}, col: {}, pos: {}",
            self.line, self.column, self.offset
        )
    }
}

/// Renders the lines around `line` (1-based) for a diagnostic.
///
/// Up to [`CONTEXT_LINES`] lines before and after the failing line are
/// included, clipped to the bounds of `source`. Each line is prefixed with a
/// two-character marker (`>>` on the failing line) and its 1-based number.
#[must_use]
pub fn excerpt(source: &str, line: u32) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let first = line.saturating_sub(CONTEXT_LINES).max(1);
    let last = line.saturating_add(CONTEXT_LINES);

    let mut out = String::new();
    for number in first..=last {
        let Some(text) = lines.get(number as usize - 1) else {
            break;
        };
        let mark = if number == line { ">>" } else { "  " };
        out.push_str(mark);
        out.push_str(&number.to_string());
        out.push_str("  ");
        out.push_str(text);
        out.push('\n');
    }
    out
}
