//! Integration tests for error reporting
//!
//! Tests error kinds, positions, excerpts and file names.

mod errors;
mod excerpts;
