//! Parses on several threads at once

use std::thread;

use qmlweb::language::Member;
use qmlweb::{DocumentKind, ParseOptions, Tree, parse_with};

#[test]
fn parallel_parses_do_not_interfere() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let file = format!("File{i}.qml");
                let options = ParseOptions::new()
                    .with_file_name(file.clone())
                    .with_kind(DocumentKind::Document);

                // Every other file puts its parser into legacy mode and then fails.
                let source = if i % 2 == 0 {
                    format!("Item {{\n  index: {i}\n  ok: a instanceof B\n}}")
                } else {
                    format!("Item {{\n  m: {{ \"k\": {i} }}\n  bad: )\n}}")
                };

                (i, file, parse_with(&source, &options))
            })
        })
        .collect();

    for handle in handles {
        let (i, file, result) = handle.join().expect("thread panicked");
        if i % 2 == 0 {
            let Ok(Tree::Document(doc)) = result else {
                panic!("file {i} should parse");
            };
            assert!(matches!(&doc.root.members[0], Member::Binding(b)
                if b.value.captured().trimmed() == i.to_string()));
        } else {
            let err = result.expect_err("odd files fail");
            assert_eq!(err.file.as_deref(), Some(file.as_str()));
            assert_eq!(err.position.line, 3);
        }
    }
}

#[test]
fn trees_and_options_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ParseOptions>();
    assert_send_sync::<Tree>();
    assert_send_sync::<qmlweb::Error>();
}
