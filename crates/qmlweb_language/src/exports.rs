//! Top-level names of a script resource.

#[cfg(feature = "serde")]
use serde::Serialize;

use qmlweb_foundation::Result;

use crate::ast::StatementKind;
use crate::options::{DocumentKind, ParseOptions};
use crate::parse_with;
use crate::tree::{ScriptResource, Tree};

/// Pragmas and exported names of a script resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScriptExports {
    /// Pragma names in source order, like `library`.
    pub pragmas: Vec<String>,
    /// Top-level variable and function names in source order.
    pub exports: Vec<String>,
}

impl ScriptExports {
    /// Collects pragmas and exported names from top-level statements.
    ///
    /// Every declarator of a top-level `var` or `const` is exported, so
    /// `var a = 1, b;` exports both `a` and `b`, not only the first name.
    /// Nested declarations are not exported.
    #[must_use]
    pub fn scan(script: &ScriptResource) -> Self {
        let mut found = Self::default();
        for statement in &script.statements {
            match &statement.kind {
                StatementKind::Var { declarations, .. } => {
                    found
                        .exports
                        .extend(declarations.iter().map(|d| d.name.clone()));
                }
                StatementKind::Function(function) => {
                    if let Some(name) = &function.name {
                        found.exports.push(name.clone());
                    }
                }
                StatementKind::Pragma(pragma) => found.pragmas.push(pragma.clone()),
                _ => {}
            }
        }
        found
    }
}

/// Parses `source` as a script resource and returns its pragmas and exports.
///
/// # Errors
/// Returns the first parse error.
///
/// # Example
///
/// ```
/// let exports = qmlweb_language::parse_script_exports(
///     ".pragma library\nvar a = 1, b;\nfunction f() {}\n",
/// )
/// .unwrap();
/// assert_eq!(exports.pragmas, vec!["library"]);
/// assert_eq!(exports.exports, vec!["a", "b", "f"]);
/// ```
pub fn parse_script_exports(source: &str) -> Result<ScriptExports> {
    let options = ParseOptions::new().with_kind(DocumentKind::Script);
    match parse_with(source, &options)? {
        Tree::Script(script) => Ok(ScriptExports::scan(&script)),
        Tree::Document(_) => Ok(ScriptExports::default()),
    }
}
