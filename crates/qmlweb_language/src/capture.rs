//! Verbatim source capture.
//!
//! A capture runs a sub-parse and returns its result together with the text
//! it consumed, read through the [`IntervalLedger`] so that rewrites recorded
//! during the sub-parse show up in the captured text.

#[cfg(feature = "serde")]
use serde::Serialize;

use qmlweb_foundation::Result;

use crate::grammar::Grammar;
use crate::ledger::IntervalLedger;

/// A parsed node together with the source text it was parsed from.
///
/// The text runs from the first token of the node up to the first token after
/// it, so it includes trailing whitespace and comments.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Captured<T> {
    /// The parsed node.
    pub node: T,
    /// Effective source text of the node.
    pub source: String,
}

impl<T> Captured<T> {
    /// Creates a captured value.
    #[must_use]
    pub fn new(node: T, source: impl Into<String>) -> Self {
        Self {
            node,
            source: source.into(),
        }
    }

    /// Returns the source text without surrounding whitespace.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.source.trim()
    }

    /// Maps the node, keeping the source.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Captured<U> {
        Captured {
            node: f(self.node),
            source: self.source,
        }
    }
}

/// Grammars that can capture the text of their sub-parses.
pub trait Capture<'src>: Grammar<'src> {
    /// Returns the ledger of rewrites recorded so far.
    fn ledger(&self) -> &IntervalLedger<'src>;

    /// Runs `parse` and captures the text between the current token before
    /// and after it.
    ///
    /// # Errors
    /// Returns whatever error `parse` returns.
    fn capture<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<Captured<T>> {
        let start = self.cursor().position();
        let node = parse(self)?;
        let end = self.cursor().position();
        Ok(Captured::new(node, self.ledger().effective_text(start..end)))
    }

    /// Like [`Capture::capture`], but treats the sub-parse as a function body
    /// so that `return` is accepted.
    ///
    /// # Errors
    /// Returns whatever error `parse` returns.
    fn capture_body<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Captured<T>> {
        self.cursor_mut().in_function += 1;
        let captured = self.capture(parse);
        self.cursor_mut().in_function -= 1;
        captured
    }
}
