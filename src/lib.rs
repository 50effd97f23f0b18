//! qmlweb - Parser for QML declarative documents
//!
//! This crate re-exports both layers of the parser for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: qmlweb_language   - Lexer, script grammar, declarative grammar core
//! Layer 0: qmlweb_foundation - Error, Position, source excerpts
//! ```

pub use qmlweb_foundation as foundation;
pub use qmlweb_language as language;

pub use qmlweb_foundation::{Error, ErrorKind, Result};
pub use qmlweb_language::{
    DocumentKind, ParseOptions, ScriptExports, Tree, parse, parse_script_exports, parse_with,
};
