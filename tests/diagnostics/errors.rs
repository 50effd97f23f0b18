//! Integration tests for error kinds and positions

use qmlweb::{DocumentKind, ErrorKind, ParseOptions, parse, parse_with};

// =============================================================================
// Declarative Errors
// =============================================================================

#[test]
fn property_without_name() {
    let err = parse("property int", DocumentKind::Document).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnexpectedToken {
            found: "eof".to_string(),
            expected: Some("name".to_string()),
        }
    );
    assert_eq!(err.message(), "Unexpected token eof, expected name");
    assert_eq!((err.position.line, err.position.column), (1, 13));
}

#[test]
fn property_without_name_on_later_line() {
    let err = parse("Item {\n    property int\n}", DocumentKind::Document).unwrap_err();
    assert!(err.message().contains("expected name"));
    assert_eq!(err.position.line, 3);
    assert_eq!(err.position.column, 1);
}

#[test]
fn unbalanced_alias_path() {
    let err = parse("Item { property alias x: a[b }", DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnbalancedAliasPath);
}

#[test]
fn readonly_without_value() {
    let err = parse("Item { readonly property int x\n}", DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax("Expected ': ...'".to_string()));
}

#[test]
fn missing_colon_in_binding() {
    let err = parse("Item { width 10 }", DocumentKind::Document).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnexpectedToken { ref expected, .. } if expected.as_deref() == Some("punc :")
    ));
}

// =============================================================================
// Structural Errors
// =============================================================================

#[test]
fn trailing_content_after_root() {
    let err = parse("Item {}\nfoo", DocumentKind::Document).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
    assert_eq!(err.position.line, 2);
}

#[test]
fn end_of_input_inside_block() {
    let err = parse("Item {\n  Rectangle {\n", DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEof);
}

#[test]
fn empty_input() {
    let err = parse("", DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEof);
}

#[test]
fn binding_as_root() {
    let err = parse("width: 1", DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRootElement);
}

// =============================================================================
// Script and Lexical Errors
// =============================================================================

#[test]
fn invalid_assignment_in_binding() {
    let err = parse("Item { x: 1 = 2 }", DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax("Invalid assignment".to_string()));
}

#[test]
fn unterminated_string() {
    let err = parse("Item { text: \"open\n}", DocumentKind::Document).unwrap_err();
    assert!(err.kind.is_lexical());
    assert!(!err.excerpt.is_empty());
}

#[test]
fn script_errors_share_the_same_shape() {
    let options = ParseOptions::new()
        .with_kind(DocumentKind::Script)
        .with_file_name("lib.js");
    let err = parse_with("var x = ;", &options).unwrap_err();
    assert_eq!(err.file.as_deref(), Some("lib.js"));
    assert!(err.excerpt.starts_with(">>1  var x = ;"));
    assert_eq!(err.position.offset, 8);
}

// =============================================================================
// Nesting Limit
// =============================================================================

#[test]
fn deep_nesting_is_reported_not_overflowed() {
    let source = format!("{}{}", "Item {".repeat(20_000), "}".repeat(20_000));
    let err = parse(&source, DocumentKind::Document).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax("nesting too deep".to_string()));
    assert!(err.excerpt.contains(">>1  "));

    let script = format!("var x = {}0{};", "(".repeat(20_000), ")".repeat(20_000));
    let err = parse(&script, DocumentKind::Script).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax("nesting too deep".to_string()));
}

#[test]
fn raised_nesting_limit_admits_deeper_documents() {
    let source = format!("{}{}", "Item {".repeat(40), "}".repeat(40));
    let tight = ParseOptions::new().with_max_depth(20);
    let roomy = ParseOptions::new().with_max_depth(48);
    assert!(parse_with(&source, &tight).is_err());
    assert!(parse_with(&source, &roomy).is_ok());
}
