//! Integration tests for string-keyed legacy blocks

use qmlweb::language::{ExprKind, Member, StatementKind};
use qmlweb::{DocumentKind, parse};

use crate::{binding, document};

fn legacy_members(members: &[Member], path: &str) -> Vec<Member> {
    match &binding(members, path).value.captured().node.kind {
        StatementKind::ObjectBlock(inner) => inner.clone(),
        other => panic!("expected legacy block, got {other:?}"),
    }
}

#[test]
fn string_keys_and_commas() {
    let doc = document("Item {\n  config: { \"name\": \"x\", \"size\": 3 }\n}");
    let members = legacy_members(&doc.root.members, "config");
    assert_eq!(members.len(), 2);
    assert_eq!(binding(&members, "name").value.captured().trimmed(), "\"x\"");
}

#[test]
fn bare_names_after_first_string_key() {
    let doc = document("Item { config: { \"a\": 1, b: 2, c { d: 3 } } }");
    let members = legacy_members(&doc.root.members, "config");
    assert_eq!(members.len(), 3);
    assert!(matches!(&members[1], Member::Binding(b) if b.path.to_string() == "b"));
    assert!(matches!(&members[2], Member::Object(o) if o.path.to_string() == "c"));
}

#[test]
fn uppercase_names_are_not_elements_in_legacy_blocks() {
    let doc = document("Item { config: { \"a\": 1, Foo: 2 } }");
    let members = legacy_members(&doc.root.members, "config");
    assert!(matches!(&members[1], Member::Binding(b) if b.path.to_string() == "Foo"));
}

#[test]
fn trailing_comma_ends_block() {
    let doc = document("Item { config: { \"a\": 1, } }");
    assert_eq!(legacy_members(&doc.root.members, "config").len(), 1);
}

#[test]
fn nested_legacy_blocks_and_functions() {
    let doc = document(
        "Item { config: { \"inner\": { \"deep\": true }, \"run\": function() { return 1 } } }",
    );
    let members = legacy_members(&doc.root.members, "config");
    let inner = legacy_members(&members, "inner");
    assert_eq!(inner.len(), 1);
    let run = binding(&members, "run");
    let expr = run.value.captured().node.as_expression().unwrap();
    assert!(matches!(expr.kind, ExprKind::Function(_)));
}

#[test]
fn legacy_mode_is_scoped_to_its_block() {
    let doc = document(
        "Item {\n  first: { \"a\": 1 }\n  Child { second: 2\n third: 3 }\n  fourth: 4\n}",
    );
    let Member::Element(child) = &doc.root.members[1] else {
        panic!("expected element after legacy block");
    };
    assert_eq!(child.members.len(), 2);
    assert!(matches!(&doc.root.members[2], Member::Binding(b) if b.path.to_string() == "fourth"));
}

#[test]
fn missing_comma_fails() {
    assert!(parse("Item { config: { \"a\": 1 \"b\": 2 } }", DocumentKind::Document).is_err());
}

#[test]
fn semicolon_in_legacy_block_fails() {
    assert!(parse("Item { config: { \"a\": 1, ; } }", DocumentKind::Document).is_err());
}
