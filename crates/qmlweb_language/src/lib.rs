//! Tokenizer, script grammar and declarative grammar core for QML documents.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of script and declarative source
//! - [`Grammar`] - A recursive-descent script grammar with override slots
//! - [`DeclarativeParser`] - The declarative productions layered on top
//! - [`IntervalLedger`] and [`Captured`] - Verbatim source capture with
//!   targeted rewrites
//!
//! # Example
//!
//! ```
//! use qmlweb_language::{DocumentKind, Member, parse};
//!
//! let tree = parse("import QtQuick 2.0\nItem {\n  width: 10\n}", DocumentKind::Document).unwrap();
//! let document = tree.as_document().unwrap();
//! assert_eq!(document.imports[0].module_name(), "QtQuick");
//! assert!(matches!(document.root.members[0], Member::Binding(_)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod capture;
pub mod declarative;
pub mod exports;
pub mod grammar;
pub mod ledger;
pub mod lexer;
pub mod options;
pub mod span;
pub mod token;
pub mod tree;


pub use ast::{Expr, ExprKind, Function, Statement, StatementKind};
pub use capture::{Capture, Captured};
pub use declarative::DeclarativeParser;
pub use exports::{ScriptExports, parse_script_exports};
pub use grammar::{Cursor, Grammar, ScriptParser};
pub use ledger::IntervalLedger;
pub use lexer::Lexer;
pub use options::{DocumentKind, ParseOptions};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use tree::{
    AliasDecl, AliasPath, AliasSegment, BindingValue, Declaration, DefaultPropertyDecl, Document,
    Element, Import, Member, MethodDecl, ObjectMember, PropertyBinding, PropertyDecl,
    QualifiedName, ScriptResource, SignalDecl, SignalParameter, Tree,
};

use qmlweb_foundation::Result;

/// Parses `source` with the grammar selected by `kind`.
///
/// # Errors
/// Returns the first lexical or grammar error.
pub fn parse(source: &str, kind: DocumentKind) -> Result<Tree> {
    parse_with(source, &ParseOptions::new().with_kind(kind))
}

/// Parses `source` with explicit options.
///
/// Line breaks are normalized and a leading byte order mark is removed before
/// parsing; positions and captured text refer to the normalized text.
///
/// # Errors
/// Returns the first lexical or grammar error.
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Tree> {
    tracing::debug!(
        file = options.file_name.as_deref().unwrap_or("<input>"),
        kind = ?options.kind,
        "parsing"
    );
    let text = normalize_newlines(source);
    DeclarativeParser::new(&text, options).parse()
}

/// Converts `\r\n`, `\r`, U+2028 and U+2029 to `\n` and strips a leading
/// byte order mark.
#[must_use]
pub fn normalize_newlines(source: &str) -> String {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut text = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                text.push('\n');
            }
            '\u{2028}' | '\u{2029}' => text.push('\n'),
            _ => text.push(c),
        }
    }
    text
}
