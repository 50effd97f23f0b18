//! Integration tests for script statements
//!
//! Parses whole script resources through the public entry points.

use qmlweb::language::{ExprKind, ParseOptions, StatementKind};
use qmlweb::{DocumentKind, Tree, parse, parse_with};

fn script(source: &str) -> Vec<qmlweb::language::Statement> {
    match parse(source, DocumentKind::Script).expect("parse failed") {
        Tree::Script(script) => script.statements,
        Tree::Document(_) => panic!("expected a script resource"),
    }
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn library_script() {
    let statements = script(
        r"
.pragma library

var counter = 0;

function increment(step) {
    counter += step || 1;
    return counter;
}

function reset() { counter = 0 }
",
    );
    assert_eq!(statements.len(), 4);
    assert!(matches!(&statements[0].kind, StatementKind::Pragma(p) if p == "library"));
    assert!(matches!(&statements[2].kind, StatementKind::Function(f) if f.name.as_deref() == Some("increment")));
}

#[test]
fn control_flow() {
    let statements = script(
        r"
for (var i = 0; i < items.length; i++) {
    if (items[i] === null) continue;
    switch (typeof items[i]) {
        case 'string': log(items[i]); break;
        default: log(String(items[i]));
    }
}
",
    );
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0].kind, StatementKind::For { .. }));
}

#[test]
fn expressions_with_regexp_and_objects() {
    let statements = script("var re = /^on[A-Z]/g, o = { a: [1, 2], b: function () { return re } };");
    let StatementKind::Var { declarations, .. } = &statements[0].kind else {
        panic!("expected var");
    };
    assert_eq!(declarations.len(), 2);
    assert!(matches!(
        declarations[0].init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Regexp { .. })
    ));
    assert!(matches!(
        declarations[1].init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Object(_))
    ));
}

#[test]
fn elements_are_expressions_in_scripts() {
    let statements = script("var item = Rectangle { width: 1 };");
    let StatementKind::Var { declarations, .. } = &statements[0].kind else {
        panic!("expected var");
    };
    assert!(matches!(
        declarations[0].init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Element(_))
    ));
}

#[test]
fn return_outside_function_fails() {
    assert!(parse("return 1;", DocumentKind::Script).is_err());
}

// =============================================================================
// Exigent Mode
// =============================================================================

#[test]
fn exigent_mode_requires_semicolons() {
    let options = ParseOptions::new().with_kind(DocumentKind::Script).exigent(true);
    assert!(parse_with("var a = 1;\nvar b = [1, 2];\n", &options).is_ok());
    assert!(parse_with("var a = 1\nvar b = 2;\n", &options).is_err());
    assert!(parse_with("var b = [1, 2,];\n", &options).is_err());
}

#[test]
fn relaxed_mode_inserts_semicolons() {
    assert!(parse("var a = 1\nvar b = [1, 2,]\n", DocumentKind::Script).is_ok());
}
