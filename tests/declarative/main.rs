//! Integration tests for the declarative grammar
//!
//! Tests documents, verbatim capture, legacy blocks and concurrent parsing.

mod capture;
mod concurrency;
mod documents;
mod legacy;

use qmlweb::language::{Document, Member, PropertyBinding};
use qmlweb::{DocumentKind, Tree, parse};

/// Parses `source` as a document, panicking on failure.
pub fn document(source: &str) -> Document {
    match parse(source, DocumentKind::Document).expect("parse failed") {
        Tree::Document(document) => document,
        Tree::Script(_) => panic!("expected a document"),
    }
}

/// Finds the binding for `path` among `members`.
pub fn binding<'a>(members: &'a [Member], path: &str) -> &'a PropertyBinding {
    members
        .iter()
        .find_map(|member| match member {
            Member::Binding(binding) if binding.path.to_string() == path => Some(binding),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no binding for {path}"))
}
