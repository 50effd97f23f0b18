//! Per-invocation parser configuration.

use crate::grammar::DEFAULT_MAX_DEPTH;

/// Default name of the runtime helper that `instanceof` is rewritten to.
pub const DEFAULT_INSTANCEOF_HELPER: &str = "__qmlweb_instanceof";

/// Default expression passed to the helper as the enclosing component.
pub const DEFAULT_COMPONENT_REF: &str = "__component";

/// Which grammar the top level of a source is parsed with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Imports followed by one root element.
    #[default]
    Document,
    /// Plain script statements.
    Script,
}

/// Options for one parse invocation.
///
/// # Example
///
/// ```
/// use qmlweb_language::{DocumentKind, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_file_name("Main.qml")
///     .with_kind(DocumentKind::Document)
///     .exigent(true);
/// assert_eq!(options.file_name.as_deref(), Some("Main.qml"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name reported in errors.
    pub file_name: Option<String>,
    /// Top-level grammar.
    pub kind: DocumentKind,
    /// Require explicit semicolons and reject trailing commas in arrays.
    pub exigent: bool,
    /// Function called in place of `instanceof`.
    pub instanceof_helper: String,
    /// Component expression passed to the helper.
    pub component_ref: String,
    /// Nesting depth past which parsing fails with "nesting too deep".
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            file_name: None,
            kind: DocumentKind::Document,
            exigent: false,
            instanceof_helper: DEFAULT_INSTANCEOF_HELPER.to_string(),
            component_ref: DEFAULT_COMPONENT_REF.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file name reported in errors.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the top-level grammar.
    #[must_use]
    pub const fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enables or disables exigent mode.
    #[must_use]
    pub const fn exigent(mut self, exigent: bool) -> Self {
        self.exigent = exigent;
        self
    }

    /// Sets the function `instanceof` expressions are rewritten to call.
    #[must_use]
    pub fn with_instanceof_helper(mut self, helper: impl Into<String>) -> Self {
        self.instanceof_helper = helper.into();
        self
    }

    /// Sets the component expression passed to the `instanceof` helper.
    #[must_use]
    pub fn with_component_ref(mut self, component: impl Into<String>) -> Self {
        self.component_ref = component.into();
        self
    }

    /// Sets how deeply statements, expressions and blocks may nest.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
