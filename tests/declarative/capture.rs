//! Integration tests for verbatim capture and the instanceof rewrite

use qmlweb::language::{Declaration, ExprKind, Lexer, Member, Span};
use qmlweb::{DocumentKind, ParseOptions, Tree, parse_with};

use crate::{binding, document};

/// Collects the span of every captured node under `members` with its text.
fn captured_texts(members: &[Member], out: &mut Vec<(Span, String)>) {
    for member in members {
        match member {
            Member::Element(element) => captured_texts(&element.members, out),
            Member::Object(object) => captured_texts(&object.members, out),
            Member::Binding(binding) => {
                let captured = binding.value.captured();
                out.push((captured.node.span, captured.source.clone()));
            }
            Member::Property(property) => {
                if let Some(value) = &property.value {
                    out.push((value.node.span, value.source.clone()));
                }
            }
            Member::Default(default) => {
                if let Declaration::Property(property) = &default.declaration {
                    if let Some(value) = &property.value {
                        out.push((value.node.span, value.source.clone()));
                    }
                }
            }
            Member::Method(method) => out.push((method.function.span, method.source.clone())),
            Member::Alias(_) | Member::Signal(_) => {}
        }
    }
}

/// Asserts that each text is exactly the source from its node's first byte
/// up to the token following the node.
fn assert_exact_slices(source: &str, captures: &[(Span, String)]) {
    let tokens = Lexer::tokenize_all(source);
    for (span, text) in captures {
        let next = tokens
            .iter()
            .find(|token| token.span.start() >= span.end)
            .map_or(source.len(), |token| token.span.start());
        assert_eq!(text, &source[span.start()..next]);
    }
}

const SOURCE: &str = r#"import QtQuick 2.0
Item {
    id: root
    width: parent.width /* half */ / 2
    property var model: { "first": 1, "second": [1, 2] }
    function toggle() {
        visible = !visible;
    }
    Rectangle {
        color: enabled ? "red"
                       : "blue"
        onClicked: {
            root.toggle()
        }
    }
}
"#;

#[test]
fn captured_texts_are_exact_source_slices() {
    let doc = document(SOURCE);
    let mut captures = Vec::new();
    captured_texts(&doc.root.members, &mut captures);
    assert_eq!(captures.len(), 6);
    assert_exact_slices(SOURCE, &captures);
    for pair in captures.windows(2) {
        assert!(pair[0].0.start() < pair[1].0.start());
    }
}

#[test]
fn captured_text_keeps_comments_and_layout() {
    let doc = document(SOURCE);
    let width = binding(&doc.root.members, "width");
    assert_eq!(width.value.captured().trimmed(), "parent.width /* half */ / 2");

    let Member::Element(rect) = &doc.root.members[4] else {
        panic!("expected Rectangle");
    };
    let color = binding(&rect.members, "color");
    assert_eq!(
        color.value.captured().trimmed(),
        "enabled ? \"red\"\n                       : \"blue\""
    );
}

#[test]
fn rewrite_only_changes_instanceof_span() {
    let source = "Item {\n  a: x  instanceof  Foo.Bar   || y\n}";
    let doc = document(source);
    let a = binding(&doc.root.members, "a");
    assert_eq!(
        a.value.captured().trimmed(),
        "__qmlweb_instanceof(x, \"Foo.Bar\", __component)   || y"
    );

    let expr = a.value.captured().node.as_expression().unwrap();
    let ExprKind::Binary { op, left, .. } = &expr.kind else {
        panic!("expected binary expression");
    };
    assert_eq!(*op, "||");
    assert!(matches!(left.kind, ExprKind::Binary { op: "instanceof", .. }));
}

#[test]
fn rewrite_inside_method_source() {
    let doc = document("Item {\n  function isItem(o) { return o instanceof Item }\n}");
    let Member::Method(method) = &doc.root.members[0] else {
        panic!("expected method");
    };
    assert_eq!(
        method.source.trim(),
        "function isItem(o) { return __qmlweb_instanceof(o, \"Item\", __component) }"
    );
}

#[test]
fn rewrite_uses_configured_names() {
    let options = ParseOptions::new()
        .with_kind(DocumentKind::Document)
        .with_instanceof_helper("QmlWeb.instanceOf")
        .with_component_ref("$component");
    let Tree::Document(doc) = parse_with("Item { ok: a instanceof B }", &options).unwrap() else {
        panic!("expected document");
    };
    assert_eq!(
        binding(&doc.root.members, "ok").value.captured().trimmed(),
        "QmlWeb.instanceOf(a, \"B\", $component)"
    );
}

#[test]
fn array_literal_source() {
    let doc = document("Item {\n  values: [ 1,\n    2 ]\n}");
    let values = binding(&doc.root.members, "values");
    let expr = values.value.captured().node.as_expression().unwrap();
    let ExprKind::Array { elements, source } = &expr.kind else {
        panic!("expected array");
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(source.as_deref(), Some("[ 1,\n    2 ]\n"));
}
