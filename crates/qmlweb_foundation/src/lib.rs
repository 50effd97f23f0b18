//! Error types and source diagnostics for the qmlweb parser.
//!
//! This crate provides:
//! - [`Error`] - Uniform parse error carrying position, file and excerpt
//! - [`ErrorKind`] - Categorized error kinds
//! - [`Position`] - Line, column and byte offset of a failure
//! - [`excerpt`] - Source context rendering for diagnostics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostic;
pub mod error;

pub use diagnostic::{CONTEXT_LINES, Position, excerpt};
pub use error::{Error, ErrorKind, Result};
