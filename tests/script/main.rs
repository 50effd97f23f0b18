//! Integration tests for the script grammar
//!
//! Tests plain script resources, pragmas and exported names.

mod exports;
mod statements;
