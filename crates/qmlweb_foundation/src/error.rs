//! Error types for the qmlweb parser.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every failure, whether it comes from the tokenizer, the script grammar or
//! the declarative grammar, is reported through the same [`Error`] shape.

use thiserror::Error;

use crate::diagnostic::{Position, excerpt};

/// The main error type for qmlweb parsing.
///
/// The rendered form is the message, the position in
/// `(line: L, col: C, pos: P)` form and a source excerpt around the failing
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} ({position})\n{excerpt}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Where in the source the error was raised.
    pub position: Position,
    /// Rendered source lines around `position` (may be empty).
    pub excerpt: String,
    /// Name of the file being parsed, when the caller supplied one.
    pub file: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind and position and no excerpt.
    #[must_use]
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        Self {
            kind,
            position,
            excerpt: String::new(),
            file: None,
        }
    }

    /// Creates an error whose excerpt is rendered from `source`.
    #[must_use]
    pub fn with_source(kind: ErrorKind, position: Position, source: &str) -> Self {
        Self {
            kind,
            position,
            excerpt: excerpt(source, position.line),
            file: None,
        }
    }

    /// Attaches the name of the file that was being parsed.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Re-renders the excerpt against `source`.
    #[must_use]
    pub fn with_excerpt(mut self, source: &str) -> Self {
        self.excerpt = excerpt(source, self.position.line);
        self
    }

    /// Creates an unexpected token error without an expectation.
    #[must_use]
    pub fn unexpected_token(found: impl Into<String>, position: Position) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken {
                found: found.into(),
                expected: None,
            },
            position,
        )
    }

    /// Creates an unexpected token error naming what was expected.
    #[must_use]
    pub fn expected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        position: Position,
    ) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken {
                found: found.into(),
                expected: Some(expected.into()),
            },
            position,
        )
    }

    /// Creates an unexpected end of input error.
    #[must_use]
    pub fn unexpected_eof(position: Position) -> Self {
        Self::new(ErrorKind::UnexpectedEof, position)
    }

    /// Creates a generic syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::new(ErrorKind::Syntax(message.into()), position)
    }

    /// Returns the message without position or excerpt.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A token did not match what the grammar expected.
    #[error("Unexpected token {found}{}", expectation(.expected))]
    UnexpectedToken {
        /// Description of the token that was found.
        found: String,
        /// Description of what the grammar expected, if known.
        expected: Option<String>,
    },

    /// Input ended where a construct was required.
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// An alias path had unbalanced `[` / `]`.
    #[error("Unbalanced brackets in alias path")]
    UnbalancedAliasPath,

    /// A document did not have an element at its root.
    #[error("Expected a root element")]
    MissingRootElement,

    /// Generic grammar failure.
    #[error("{0}")]
    Syntax(String),

    /// Malformed token reported by the tokenizer.
    #[error("{0}")]
    Lexical(String),
}

impl ErrorKind {
    /// Returns true if this error was raised by the tokenizer.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical(_))
    }
}

#[allow(clippy::ref_option)]
fn expectation(expected: &Option<String>) -> String {
    expected
        .as_deref()
        .map_or_else(String::new, |e| format!(", expected {e}"))
}

/// Result type alias using the qmlweb [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
