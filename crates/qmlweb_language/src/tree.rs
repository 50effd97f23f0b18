//! Declarative document tree.
//!
//! A [`Tree`] is either a [`Document`] (imports plus one root element) or a
//! [`ScriptResource`] (plain top-level statements). Element bodies are
//! ordered [`Member`] lists; script code inside them is kept both as parsed
//! AST and as captured source text.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::ast::{Function, Statement};
use crate::capture::Captured;
use crate::span::Span;

/// Result of a parse.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Tree {
    /// A declarative document.
    Document(Document),
    /// A plain script file.
    Script(ScriptResource),
}

impl Tree {
    /// Returns the document, if this is one.
    #[must_use]
    pub const fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(document) => Some(document),
            Self::Script(_) => None,
        }
    }

    /// Returns the script resource, if this is one.
    #[must_use]
    pub const fn as_script(&self) -> Option<&ScriptResource> {
        match self {
            Self::Script(script) => Some(script),
            Self::Document(_) => None,
        }
    }
}

/// A declarative file: imports followed by exactly one root element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Document {
    /// Imports in source order.
    pub imports: Vec<Import>,
    /// The root element.
    pub root: Element,
}

/// A plain script file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScriptResource {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// `import QtQuick 2.0 as Q` or `import "dir" as D`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Import {
    /// Module path segments (a single segment for the string form).
    pub path: Vec<String>,
    /// Version as written, like `2.0`.
    pub version: Option<String>,
    /// Namespace alias after `as`.
    pub alias: Option<String>,
    /// True for the dotted-name form, false for the string form.
    pub dotted: bool,
    /// Source location.
    pub span: Span,
}

impl Import {
    /// Returns the module path joined with `.`.
    #[must_use]
    pub fn module_name(&self) -> String {
        self.path.join(".")
    }
}

/// A possibly dotted name like `QtQuick.Controls.Button` or `anchors.fill`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QualifiedName {
    /// Segments in order.
    pub segments: Vec<String>,
}

impl QualifiedName {
    /// Creates a qualified name from its segments.
    #[must_use]
    pub const fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Returns the last segment.
    #[must_use]
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns true if this name refers to an element type.
    #[must_use]
    pub fn is_element_type(&self) -> bool {
        is_element_name(self.last())
    }

    /// Returns true if this name refers to a signal handler.
    #[must_use]
    pub fn is_event_handler(&self) -> bool {
        is_event_handler_name(self.last())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        Self::new(name.split('.').map(String::from).collect())
    }
}

/// Returns true if `name` starts with an upper-case character.
///
/// Applied to the last segment of a dotted name, this decides between an
/// element (`Item { }`) and a grouped property (`font { }`).
#[must_use]
pub fn is_element_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Returns true if `name` has the shape `on[_]Xyz`.
#[must_use]
pub fn is_event_handler_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("on") else {
        return false;
    };
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    let mut chars = rest.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `Type { members }`, optionally `Type on target { members }`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element {
    /// The element type.
    pub type_name: QualifiedName,
    /// Target property of a value source, from `Type on target`.
    pub on: Option<String>,
    /// Members in source order.
    pub members: Vec<Member>,
    /// Source location.
    pub span: Span,
}

/// `font { members }`: a grouped property under a lower-case name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectMember {
    /// The property path.
    pub path: QualifiedName,
    /// Members in source order.
    pub members: Vec<Member>,
    /// Source location.
    pub span: Span,
}

/// `[readonly] property type[<Arg>] name[: value]`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PropertyDecl {
    /// The declared name.
    pub name: String,
    /// The declared type, like `int` or `list`.
    pub type_name: String,
    /// Generic argument, like `Item` in `list<Item>`.
    pub generic: Option<String>,
    /// Whether the property was declared `readonly`.
    pub readonly: bool,
    /// The initial value, with its source text.
    pub value: Option<Captured<Statement>>,
    /// Source location.
    pub span: Span,
}

/// `[readonly] property alias name: target.path`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AliasDecl {
    /// The declared name.
    pub name: String,
    /// Whether the alias was declared `readonly`.
    pub readonly: bool,
    /// The aliased path.
    pub target: AliasPath,
    /// Source location.
    pub span: Span,
}

/// A dotted path with bracketed sub-paths, like `a.b[c.d][e].f`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AliasPath {
    /// Segments in order.
    pub segments: Vec<AliasSegment>,
}

impl fmt::Display for AliasPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            for subscript in &segment.subscripts {
                write!(f, "[{subscript}]")?;
            }
        }
        Ok(())
    }
}

/// One segment of an [`AliasPath`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AliasSegment {
    /// The segment name (an identifier or a numeric index).
    pub name: String,
    /// Bracketed sub-paths following the name.
    pub subscripts: Vec<AliasPath>,
}

impl AliasSegment {
    /// Creates a segment with no subscripts.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscripts: Vec::new(),
        }
    }
}

/// `signal name(type a, type b)`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SignalDecl {
    /// The signal name.
    pub name: String,
    /// Parameters in order.
    pub parameters: Vec<SignalParameter>,
    /// Source location.
    pub span: Span,
}

/// One typed signal parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SignalParameter {
    /// The parameter type (`var` is allowed).
    pub type_name: String,
    /// The parameter name.
    pub name: String,
}

/// A member function.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MethodDecl {
    /// The function name.
    pub name: String,
    /// The parsed function.
    pub function: Function,
    /// Source text from `function` up to the next token.
    pub source: String,
}

/// `path: value`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PropertyBinding {
    /// The bound property path.
    pub path: QualifiedName,
    /// The bound value.
    pub value: BindingValue,
    /// Source location.
    pub span: Span,
}

/// Value of a [`PropertyBinding`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BindingValue {
    /// A value that may itself be declarative (an element, a legacy block).
    Expression(Captured<Statement>),
    /// Plain script run when a signal fires.
    Handler(Captured<Statement>),
}

impl BindingValue {
    /// Returns the captured value regardless of kind.
    #[must_use]
    pub const fn captured(&self) -> &Captured<Statement> {
        match self {
            Self::Expression(captured) | Self::Handler(captured) => captured,
        }
    }

    /// Returns true for signal handlers.
    #[must_use]
    pub const fn is_handler(&self) -> bool {
        matches!(self, Self::Handler(_))
    }
}

/// `default property ...`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DefaultPropertyDecl {
    /// The wrapped declaration.
    pub declaration: Declaration,
}

/// A property or alias declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Declaration {
    /// `property type name`
    Property(PropertyDecl),
    /// `property alias name: path`
    Alias(AliasDecl),
}

/// One item inside an element or object block.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Member {
    /// Nested element.
    Element(Element),
    /// Grouped property block.
    Object(ObjectMember),
    /// Property declaration.
    Property(PropertyDecl),
    /// Alias declaration.
    Alias(AliasDecl),
    /// Signal declaration.
    Signal(SignalDecl),
    /// Member function.
    Method(MethodDecl),
    /// Property binding.
    Binding(PropertyBinding),
    /// Default property declaration.
    Default(DefaultPropertyDecl),
}

impl From<Declaration> for Member {
    fn from(declaration: Declaration) -> Self {
        match declaration {
            Declaration::Property(property) => Self::Property(property),
            Declaration::Alias(alias) => Self::Alias(alias),
        }
    }
}
