//! Integration tests for script export scanning

use qmlweb::parse_script_exports;

#[test]
fn pragmas_and_exports_in_source_order() {
    let exports = parse_script_exports(
        ".pragma library\nvar a = 1, b = 2;\nfunction helper() { var inner; }\nconst LIMIT = 10;\n",
    )
    .unwrap();
    assert_eq!(exports.pragmas, vec!["library"]);
    assert_eq!(exports.exports, vec!["a", "b", "helper", "LIMIT"]);
}

#[test]
fn empty_script_has_no_exports() {
    let exports = parse_script_exports("").unwrap();
    assert!(exports.pragmas.is_empty());
    assert!(exports.exports.is_empty());
}

#[test]
fn crlf_and_bom_are_accepted() {
    let exports = parse_script_exports("\u{feff}var a;\r\nvar b;\r\n").unwrap();
    assert_eq!(exports.exports, vec!["a", "b"]);
}

#[test]
fn syntax_errors_are_reported() {
    let err = parse_script_exports("function () {}").unwrap_err();
    assert!(err.message().contains("expected name"));
}
