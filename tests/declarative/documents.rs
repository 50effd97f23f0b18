//! Integration tests for declarative documents

use qmlweb::language::{Declaration, ExprKind, Member, StatementKind};

use crate::{binding, document};

// =============================================================================
// End to End
// =============================================================================

#[test]
fn import_version_and_root_binding() {
    let doc = document("import Foo 1.0\nItem {\n  width: 10\n}");
    assert_eq!(doc.imports.len(), 1);
    assert_eq!(doc.imports[0].module_name(), "Foo");
    assert_eq!(doc.imports[0].version.as_deref(), Some("1.0"));
    assert_eq!(doc.root.type_name.to_string(), "Item");
    assert_eq!(doc.root.members.len(), 1);
    let width = binding(&doc.root.members, "width");
    assert_eq!(width.value.captured().trimmed(), "10");
    let expr = width.value.captured().node.as_expression().unwrap();
    assert!(matches!(expr.kind, ExprKind::Num(n) if (n - 10.0).abs() < f64::EPSILON));
}

#[test]
fn realistic_document() {
    let doc = document(
        r#"import QtQuick 2.5
import QtQuick.Controls 1.4 as Controls
import "components"

Rectangle {
    id: window
    property alias title: label.text
    property list<Item> pages: []
    readonly property bool wide: width > 800
    default property alias content: body.data
    signal pageChanged(int index, var page)

    function show(index) {
        pages[index].visible = true;
        pageChanged(index, pages[index]);
    }

    Text {
        id: label
        font { bold: true; pixelSize: 20 }
        anchors.horizontalCenter: parent.horizontalCenter
    }

    Controls.Button {
        onClicked: window.show(0)
    }

    Behavior on color { ColorAnimation { duration: 200 } }
}
"#,
    );

    assert_eq!(doc.imports.len(), 3);
    assert_eq!(doc.imports[1].alias.as_deref(), Some("Controls"));
    assert_eq!(doc.imports[2].path, vec!["components"]);

    let members = &doc.root.members;
    assert!(matches!(&members[1], Member::Alias(a) if a.target.to_string() == "label.text"));
    assert!(matches!(&members[2], Member::Property(p) if p.generic.as_deref() == Some("Item")));
    assert!(matches!(&members[3], Member::Property(p) if p.readonly));
    assert!(matches!(&members[4], Member::Default(d) if matches!(d.declaration, Declaration::Alias(_))));
    assert!(matches!(&members[5], Member::Signal(s) if s.parameters.len() == 2));
    assert!(matches!(&members[6], Member::Method(m) if m.name == "show"));

    let Member::Element(text) = &members[7] else {
        panic!("expected Text element");
    };
    assert!(matches!(&text.members[1], Member::Object(o) if o.members.len() == 2));

    let Member::Element(button) = &members[8] else {
        panic!("expected Button element");
    };
    assert_eq!(button.type_name.segments, vec!["Controls", "Button"]);
    assert!(binding(&button.members, "onClicked").value.is_handler());

    assert!(matches!(&members[9], Member::Element(e) if e.on.as_deref() == Some("color")));
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn dotted_paths_classify_by_last_segment() {
    let doc = document("Item {\n  A.b.C { }\n  a.b.c { }\n}");
    assert!(matches!(&doc.root.members[0], Member::Element(_)));
    assert!(matches!(&doc.root.members[1], Member::Object(_)));
}

#[test]
fn event_handler_routing() {
    // The same leading string starts a script block in a handler and a
    // string-keyed block elsewhere.
    let doc = document("Item {\n  onClicked: { \"a\"; go() }\n  clicked: { \"a\": 1 }\n}");
    let handler = binding(&doc.root.members, "onClicked");
    assert!(handler.value.is_handler());
    assert!(matches!(handler.value.captured().node.kind, StatementKind::Block(_)));

    let plain = binding(&doc.root.members, "clicked");
    assert!(!plain.value.is_handler());
    assert!(matches!(plain.value.captured().node.kind, StatementKind::ObjectBlock(_)));
}

#[test]
fn generic_property_form() {
    let doc = document("Item { property list<Item> things: [] }");
    let Member::Property(things) = &doc.root.members[0] else {
        panic!("expected property");
    };
    assert_eq!(things.type_name, "list");
    assert_eq!(things.generic.as_deref(), Some("Item"));
    assert_eq!(things.name, "things");
}

#[test]
fn alias_bracket_stack_is_balanced() {
    let doc = document("Item { property alias x: a.b[c][d].e }");
    let Member::Alias(alias) = &doc.root.members[0] else {
        panic!("expected alias");
    };
    assert_eq!(alias.target.segments.len(), 3);
    assert_eq!(alias.target.to_string(), "a.b[c][d].e");
}
