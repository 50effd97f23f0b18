//! Abstract Syntax Tree for embedded script code.
//!
//! These nodes are produced by the script grammar in [`crate::grammar`].
//! Three variants exist only because the declarative grammar core overrides
//! parts of the script grammar: [`ExprKind::Element`],
//! [`StatementKind::ObjectBlock`] and [`StatementKind::Pragma`].

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::span::Span;
use crate::tree::{Element, Member, QualifiedName};

/// A script expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Expr {
    /// What kind of expression this is.
    pub kind: ExprKind,
    /// Source location, including enclosing parentheses.
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ExprKind {
    /// Number literal like `42`
    Num(f64),
    /// String literal like `"hello"`
    String(String),
    /// Regular expression literal like `/a+/g`
    Regexp {
        /// Pattern between the slashes.
        pattern: String,
        /// Trailing flags.
        flags: String,
    },
    /// `true`, `false`, `null` or `undefined`
    Atom(&'static str),
    /// Identifier reference like `parent`
    Name(String),
    /// Array literal like `[1, , 3]`; holes are `None`
    Array {
        /// Elements in source order.
        elements: Vec<Option<Expr>>,
        /// Bracketed source text re-derived through the interval ledger.
        source: Option<String>,
    },
    /// Object literal like `{ a: 1, get b() { ... } }`
    Object(Vec<ObjectProperty>),
    /// Function expression
    Function(Box<Function>),
    /// Member access like `a.b`
    Dot {
        /// The object being accessed.
        object: Box<Expr>,
        /// The property name.
        property: String,
    },
    /// Computed member access like `a[b]`
    Sub {
        /// The object being accessed.
        object: Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
    },
    /// Call like `f(a, b)`
    Call {
        /// The function being called.
        callee: Box<Expr>,
        /// Arguments in source order.
        arguments: Vec<Expr>,
    },
    /// Constructor call like `new Date(0)`
    New {
        /// The constructor expression.
        callee: Box<Expr>,
        /// Arguments in source order.
        arguments: Vec<Expr>,
    },
    /// Unary operator application like `!a` or `i++`
    Unary {
        /// The operator.
        op: &'static str,
        /// Whether the operator precedes its operand.
        prefix: bool,
        /// The operand.
        operand: Box<Expr>,
    },
    /// Binary operator application like `a + b`
    Binary {
        /// The operator.
        op: &'static str,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Conditional like `a ? b : c`
    Conditional {
        /// The condition.
        test: Box<Expr>,
        /// Value when the condition holds.
        consequent: Box<Expr>,
        /// Value otherwise.
        alternate: Box<Expr>,
    },
    /// Assignment like `a = b` or `a += b`
    Assign {
        /// The assignment operator.
        op: &'static str,
        /// The assigned target.
        target: Box<Expr>,
        /// The assigned value.
        value: Box<Expr>,
    },
    /// Comma expression like `a, b`
    Sequence(Vec<Expr>),
    /// Declarative element used as a value, like `delegate: Rectangle { }`
    Element(Box<Element>),
}

impl Expr {
    /// Creates a new expression.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the identifier if this is a name reference.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if this expression may appear on the left of `=`.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Name(_) | ExprKind::Dot { .. } | ExprKind::Sub { .. } | ExprKind::Call { .. }
        )
    }

    /// Converts a name or dotted member chain like `A.b.C` into a qualified name.
    #[must_use]
    pub fn to_qualified_name(&self) -> Option<QualifiedName> {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match &current.kind {
                ExprKind::Name(name) => {
                    segments.push(name.clone());
                    break;
                }
                ExprKind::Dot { object, property } => {
                    segments.push(property.clone());
                    current = object;
                }
                _ => return None,
            }
        }
        segments.reverse();
        Some(QualifiedName::new(segments))
    }
}

/// One entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectProperty {
    /// The key as written (names, strings and numbers all become text).
    pub key: String,
    /// Whether this is a plain value, a getter or a setter.
    pub kind: AccessorKind,
    /// The value, or the accessor function.
    pub value: Expr,
}

/// Kinds of object literal entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AccessorKind {
    /// `key: value`
    Init,
    /// `get key() { ... }`
    Get,
    /// `set key(v) { ... }`
    Set,
}

/// A function literal or declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Function {
    /// The function name, if any.
    pub name: Option<String>,
    /// Parameter names in order.
    pub params: Vec<String>,
    /// Body statements.
    pub body: Vec<Statement>,
    /// Source location from `function` to the closing brace.
    pub span: Span,
}

/// A script statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Statement {
    /// What kind of statement this is.
    pub kind: StatementKind,
    /// Source location.
    pub span: Span,
}

impl Statement {
    /// Creates a new statement.
    #[must_use]
    pub const fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the expression if this is an expression statement.
    #[must_use]
    pub const fn as_expression(&self) -> Option<&Expr> {
        match &self.kind {
            StatementKind::Expression(expr) => Some(expr),
            _ => None,
        }
    }
}

/// Statement variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum StatementKind {
    /// `;`
    Empty,
    /// `{ ... }`
    Block(Vec<Statement>),
    /// Expression followed by a (possibly inserted) semicolon
    Expression(Expr),
    /// `var a = 1, b;` or `const c = 2;`
    Var {
        /// `var` or `const`.
        kind: VarKind,
        /// Declared bindings in order.
        declarations: Vec<VarDeclarator>,
    },
    /// `function name(...) { ... }`
    Function(Function),
    /// `return expr;`
    Return(Option<Expr>),
    /// `break label;`
    Break(Option<String>),
    /// `continue label;`
    Continue(Option<String>),
    /// `throw expr;`
    Throw(Expr),
    /// `if (test) consequent else alternate`
    If {
        /// The condition.
        test: Expr,
        /// Statement run when the condition holds.
        consequent: Box<Statement>,
        /// Statement run otherwise.
        alternate: Option<Box<Statement>>,
    },
    /// `while (test) body`
    While {
        /// The loop condition.
        test: Expr,
        /// The loop body.
        body: Box<Statement>,
    },
    /// `do body while (test);`
    DoWhile {
        /// The loop body.
        body: Box<Statement>,
        /// The loop condition.
        test: Expr,
    },
    /// `for (init; test; update) body`
    For {
        /// Initializer (a `var` statement or an expression statement).
        init: Option<Box<Statement>>,
        /// Loop condition.
        test: Option<Expr>,
        /// Update expression.
        update: Option<Expr>,
        /// The loop body.
        body: Box<Statement>,
    },
    /// `for (left in right) body`
    ForIn {
        /// The iteration variable (a `var` statement or an expression statement).
        left: Box<Statement>,
        /// The iterated object.
        right: Expr,
        /// The loop body.
        body: Box<Statement>,
    },
    /// `switch (discriminant) { case ...: ... }`
    Switch {
        /// The switched-on value.
        discriminant: Expr,
        /// Cases in order.
        cases: Vec<SwitchCase>,
    },
    /// `try { } catch (e) { } finally { }`
    Try {
        /// The protected block.
        block: Vec<Statement>,
        /// The catch clause.
        handler: Option<CatchClause>,
        /// The finally block.
        finalizer: Option<Vec<Statement>>,
    },
    /// `label: body`
    Labeled {
        /// The label name.
        label: String,
        /// The labeled statement.
        body: Box<Statement>,
    },
    /// `with (object) body`
    With {
        /// The scope object.
        object: Expr,
        /// The body.
        body: Box<Statement>,
    },
    /// `debugger;`
    Debugger,
    /// `.pragma library`
    Pragma(String),
    /// Legacy string-keyed declarative block used as a property value
    ObjectBlock(Vec<Member>),
}

/// `var` or `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum VarKind {
    /// `var`
    Var,
    /// `const`
    Const,
}

/// One binding in a `var` statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VarDeclarator {
    /// The declared name.
    pub name: String,
    /// The initializer, if any.
    pub init: Option<Expr>,
}

/// One `case` (or `default`) of a switch statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SwitchCase {
    /// The case value; `None` for `default`.
    pub test: Option<Expr>,
    /// Statements under this case.
    pub body: Vec<Statement>,
}

/// The `catch (name) { ... }` clause of a try statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CatchClause {
    /// The bound exception name.
    pub param: String,
    /// The handler body.
    pub body: Vec<Statement>,
}
