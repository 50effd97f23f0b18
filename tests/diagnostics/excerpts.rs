//! Integration tests for rendered error messages

use qmlweb::foundation::{Position, excerpt};
use qmlweb::{DocumentKind, ParseOptions, parse, parse_with};

#[test]
fn rendered_message_layout() {
    let source = "import QtQuick 2.0\nItem {\n  width: 10\n  height: )\n  color: \"red\"\n}";
    let err = parse(source, DocumentKind::Document).unwrap_err();
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        "Unexpected token punc ) (line: 4, col: 11, pos: 48)\n\
         \x20 1  import QtQuick 2.0\n\
         \x20 2  Item {\n\
         \x20 3    width: 10\n\
         >>4    height: )\n\
         \x20 5    color: \"red\"\n\
         \x20 6  }\n"
    );
}

#[test]
fn excerpt_is_clipped_to_seven_lines() {
    let source: String = (1..=20).map(|n| format!("l{n}\n")).collect();
    let out = excerpt(&source, 10);
    assert_eq!(out.lines().count(), 7);
    assert!(out.starts_with("  7  l7\n"));
    assert!(out.contains(">>10  l10\n"));
    assert!(out.ends_with("  13  l13\n"));
}

#[test]
fn file_name_is_per_invocation() {
    let first = parse_with("Item { x: ) }", &ParseOptions::new().with_file_name("A.qml"));
    let second = parse("Item { x: ) }", DocumentKind::Document);
    assert_eq!(first.unwrap_err().file.as_deref(), Some("A.qml"));
    assert!(second.unwrap_err().file.is_none());
}

#[test]
fn position_display() {
    assert_eq!(Position::new(2, 5, 17).to_string(), "line: 2, col: 5, pos: 17");
}
