//! Declarative grammar core.
//!
//! [`DeclarativeParser`] implements [`Grammar`] and overrides its slots to
//! recognize element trees, property/alias/signal declarations, imports and
//! pragmas on top of the script grammar:
//!
//! - `statement` handles `.pragma`, legacy string-keyed blocks and anonymous
//!   functions used as property values
//! - `expression` turns `Name { ... }` into an element expression
//! - `array_literal` re-derives the bracketed source through the ledger
//! - `binary` records the `instanceof` rewrite in the ledger
//! - `token_error` and `croak` attach the source excerpt and file name
//!
//! All parsing state lives in the parser value, so independent parses share
//! nothing.

use std::mem;

use qmlweb_foundation::{Error, ErrorKind, Result};

use crate::ast::{Expr, ExprKind, Statement, StatementKind};
use crate::capture::{Capture, Captured};
use crate::grammar::{Cursor, Grammar, binary_expr, mismatch_error};
use crate::ledger::IntervalLedger;
use crate::options::{DocumentKind, ParseOptions};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::tree::{
    AliasDecl, AliasPath, AliasSegment, BindingValue, Declaration, DefaultPropertyDecl, Document,
    Element, Import, Member, MethodDecl, ObjectMember, PropertyBinding, PropertyDecl,
    QualifiedName, ScriptResource, SignalDecl, SignalParameter, Tree,
};

/// How the statement slot parses what it does not special-case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Forward {
    /// A full script statement.
    Statement,
    /// A single expression without a terminating semicolon.
    Expression,
}

/// Parser for declarative documents and script resources.
pub struct DeclarativeParser<'src> {
    cursor: Cursor<'src>,
    ledger: IntervalLedger<'src>,
    options: ParseOptions,
    /// Inside a block whose keys are string literals.
    legacy_object_mode: bool,
    /// The next statement-slot call parses a property value.
    in_property_value: bool,
}

impl<'src> DeclarativeParser<'src> {
    /// Creates a parser over already normalized `source`.
    #[must_use]
    pub fn new(source: &'src str, options: &ParseOptions) -> Self {
        Self {
            cursor: Cursor::new(source, options.exigent).with_max_depth(options.max_depth),
            ledger: IntervalLedger::new(source),
            options: options.clone(),
            legacy_object_mode: false,
            in_property_value: false,
        }
    }

    /// Parses the whole source with the grammar selected by the options.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn parse(mut self) -> Result<Tree> {
        match self.options.kind {
            DocumentKind::Document => self.parse_document().map(Tree::Document),
            DocumentKind::Script => self.parse_script().map(Tree::Script),
        }
    }

    /// Parses imports followed by exactly one root element.
    ///
    /// # Errors
    /// Returns an error if the root is missing, is not an element, or is
    /// followed by anything but the end of input.
    pub fn parse_document(&mut self) -> Result<Document> {
        let mut imports = Vec::new();
        while self.token().is_name_value("import") {
            imports.push(self.import()?);
        }

        if self.token().is_eof() {
            return Err(self.unexpected());
        }
        let start = self.token().span;
        let root = match self.member(false)? {
            Some(Member::Element(element)) => element,
            _ => return Err(self.fail(ErrorKind::MissingRootElement, start)),
        };
        if !self.token().is_eof() {
            return Err(self.unexpected());
        }

        Ok(Document { imports, root })
    }

    /// Parses statements until the end of input.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn parse_script(&mut self) -> Result<ScriptResource> {
        let mut statements = Vec::new();
        while !self.token().is_eof() {
            statements.push(self.statement()?);
        }
        Ok(ScriptResource { statements })
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Attaches the source excerpt and the file name.
    fn decorate(&self, error: Error) -> Error {
        let error = error.with_excerpt(self.cursor.source());
        match &self.options.file_name {
            Some(file) => error.with_file(file.clone()),
            None => error,
        }
    }

    /// Creates a decorated error of `kind` at `at`.
    fn fail(&self, kind: ErrorKind, at: Span) -> Error {
        self.decorate(Error::new(kind, at.position()))
    }

    // =========================================================================
    // Imports and pragmas
    // =========================================================================

    /// `import Module.Path 1.0 as Alias` or `import "path" as Alias`
    fn import(&mut self) -> Result<Import> {
        let start = self.next().span;
        let (first, dotted) = match &self.token().kind {
            TokenKind::Name(name) => (name.clone(), true),
            TokenKind::String(path) => (path.clone(), false),
            _ => return Err(self.expected("module name")),
        };
        self.next();

        let mut path = vec![first];
        while self.token().is_punc('.') {
            self.next();
            path.push(self.as_name()?);
        }

        let version = if self.token().is_num() {
            let text = self.token().text(self.cursor.source()).to_string();
            self.next();
            Some(text)
        } else {
            None
        };

        let alias = if self.token().is_name_value("as") {
            self.next();
            Some(self.expect_name()?)
        } else {
            None
        };

        if self.token().is_punc(';') {
            self.next();
        }

        Ok(Import {
            path,
            version,
            alias,
            dotted,
            span: self.cursor.span_from(start),
        })
    }

    /// `.pragma name`
    fn pragma(&mut self) -> Result<Statement> {
        let start = self.next().span;
        self.next();
        let name = self.as_name()?;
        if self.token().is_punc(';') {
            self.next();
        }
        Ok(Statement::new(
            StatementKind::Pragma(name),
            self.cursor.span_from(start),
        ))
    }

    // =========================================================================
    // Blocks and members
    // =========================================================================

    /// Parses `{ members }`, restoring the legacy mode on exit.
    fn object_block(&mut self) -> Result<Vec<Member>> {
        self.expect_punc('{')?;
        let was_legacy = self.legacy_object_mode;
        let members = self.nested(Self::block_members);
        self.legacy_object_mode = was_legacy;
        let members = members?;
        self.expect_punc('}')?;
        Ok(members)
    }

    fn block_members(&mut self) -> Result<Vec<Member>> {
        let mut members = Vec::new();
        let mut first = true;
        while !self.token().is_punc('}') {
            if self.token().is_eof() {
                return Err(self.unexpected());
            }
            if let Some(member) = self.member(first)? {
                members.push(member);
            }
            first = false;
        }
        Ok(members)
    }

    /// Parses one block member; `None` means nothing was produced.
    fn member(&mut self, first: bool) -> Result<Option<Member>> {
        let start = self.token().span;

        if !self.legacy_object_mode {
            if self.token().is_keyword("function") {
                return self.method().map(Some);
            }
            if self.token().is_name_value("signal") {
                self.next();
                if self.token().is_punc(':') {
                    self.next();
                    let value = self.capture_body(|p| p.statement())?;
                    return Ok(Some(Member::Binding(PropertyBinding {
                        path: QualifiedName::from("signal"),
                        value: BindingValue::Expression(value),
                        span: self.cursor.span_from(start),
                    })));
                }
                return self.signal(start).map(|signal| Some(Member::Signal(signal)));
            }
        } else if !first {
            self.expect_punc(',')?;
            if self.token().is_punc('}') {
                return Ok(None);
            }
        }

        match self.token().kind.clone() {
            TokenKind::Name(name) => self.named_member(&name, start).map(Some),
            TokenKind::Keyword("default") => {
                self.next();
                self.expect_name_value("property")?;
                let declaration = self.declaration(false, start)?;
                Ok(Some(Member::Default(DefaultPropertyDecl { declaration })))
            }
            TokenKind::String(key) => {
                if first {
                    self.legacy_object_mode = true;
                }
                if !self.legacy_object_mode {
                    return Err(self.unexpected());
                }
                self.next();
                self.expect_punc(':')?;
                let value = self.legacy_value()?;
                Ok(Some(Member::Binding(PropertyBinding {
                    path: QualifiedName::new(vec![key]),
                    value: BindingValue::Expression(value),
                    span: self.cursor.span_from(start),
                })))
            }
            TokenKind::Num(_) | TokenKind::Operator(_) | TokenKind::Atom(_) | TokenKind::Error(_) => {
                Err(self.unexpected())
            }
            TokenKind::Punc(';') => {
                if self.legacy_object_mode {
                    return Err(self.unexpected());
                }
                self.next();
                Ok(None)
            }
            other => {
                tracing::warn!(
                    token = %other.describe(),
                    line = start.origin.line,
                    column = start.origin.column,
                    "skipping unrecognized token in element body"
                );
                self.next();
                Ok(None)
            }
        }
    }

    /// Members that start with a name: declarations, elements, grouped
    /// properties and bindings.
    fn named_member(&mut self, name: &str, start: Span) -> Result<Member> {
        if !self.legacy_object_mode {
            if name == "readonly" && self.peek().is_name_value("property") {
                self.next();
                self.next();
                return Ok(self.declaration(true, start)?.into());
            }
            if name == "property" && !self.peek().is_punc(':') {
                self.next();
                return Ok(self.declaration(false, start)?.into());
            }
        }

        let path = self.property_path()?;

        if !self.legacy_object_mode && path.is_element_type() {
            let on = if self.token().is_name_value("on") {
                self.next();
                Some(self.expect_name()?)
            } else {
                None
            };
            let members = self.object_block()?;
            return Ok(Member::Element(Element {
                type_name: path,
                on,
                members,
                span: self.cursor.span_from(start),
            }));
        }

        if self.token().is_punc('{') {
            let members = self.object_block()?;
            return Ok(Member::Object(ObjectMember {
                path,
                members,
                span: self.cursor.span_from(start),
            }));
        }

        self.expect_punc(':')?;
        let value = if self.legacy_object_mode {
            BindingValue::Expression(self.legacy_value()?)
        } else if path.is_event_handler() {
            BindingValue::Handler(self.capture_body(|p| p.script_statement())?)
        } else {
            BindingValue::Expression(self.property_value()?)
        };
        Ok(Member::Binding(PropertyBinding {
            path,
            value,
            span: self.cursor.span_from(start),
        }))
    }

    /// A dotted property or type name.
    fn property_path(&mut self) -> Result<QualifiedName> {
        let mut segments = vec![self.as_name()?];
        while self.token().is_punc('.') {
            self.next();
            segments.push(self.as_name()?);
        }
        Ok(QualifiedName::new(segments))
    }

    /// Value of a declaration or binding; may be declarative.
    fn property_value(&mut self) -> Result<Captured<Statement>> {
        self.in_property_value = true;
        self.capture_body(|p| p.statement())
    }

    /// Value inside a legacy block: a single expression.
    fn legacy_value(&mut self) -> Result<Captured<Statement>> {
        self.in_property_value = true;
        self.capture_body(|p| p.forward_statement(Forward::Expression))
    }

    /// `function name(...) { ... }` as a member.
    fn method(&mut self) -> Result<Member> {
        let start = self.token().span;
        let captured = self.capture(|p| {
            p.next();
            p.function_literal(true, start)
        })?;
        let Captured { node, source } = captured;
        Ok(Member::Method(MethodDecl {
            name: node.name.clone().unwrap_or_default(),
            function: node,
            source,
        }))
    }

    /// `signal name(type a, var b)` after the `signal` word.
    fn signal(&mut self, start: Span) -> Result<SignalDecl> {
        let name = self.expect_name()?;
        let mut parameters = Vec::new();
        if self.token().is_punc('(') {
            self.next();
            let mut first = true;
            while !self.token().is_punc(')') {
                if first {
                    first = false;
                } else {
                    self.expect_punc(',')?;
                }
                let type_name = match &self.token().kind {
                    TokenKind::Name(type_name) => type_name.clone(),
                    TokenKind::Keyword("var") => "var".to_string(),
                    _ => return Err(self.expected("parameter type")),
                };
                self.next();
                let name = self.expect_name()?;
                parameters.push(SignalParameter { type_name, name });
            }
            self.next();
        }
        if self.token().is_punc(';') {
            self.next();
        }
        Ok(SignalDecl {
            name,
            parameters,
            span: self.cursor.span_from(start),
        })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// `type[<Arg>] name[: value]` after `property`.
    fn declaration(&mut self, readonly: bool, start: Span) -> Result<Declaration> {
        let type_name = match &self.token().kind {
            TokenKind::Name(name) => name.clone(),
            TokenKind::Keyword(word) => (*word).to_string(),
            _ => return Err(self.expected("type name")),
        };
        self.next();

        let generic = if self.token().is_operator("<") {
            self.next();
            let argument = self.expect_name()?;
            if !self.token().is_operator(">") {
                return Err(self.expected("'>'"));
            }
            self.next();
            Some(argument)
        } else {
            None
        };
        let name = self.expect_name()?;

        if type_name == "alias" {
            self.expect_punc(':')?;
            let target = self.alias_path()?;
            if self.token().is_punc(';') {
                self.next();
            }
            return Ok(Declaration::Alias(AliasDecl {
                name,
                readonly,
                target,
                span: self.cursor.span_from(start),
            }));
        }

        let value = if self.token().is_punc(':') {
            self.next();
            Some(self.property_value()?)
        } else if readonly {
            return Err(self.croak("Expected ': ...'", None));
        } else {
            if self.token().is_punc(';') {
                self.next();
            }
            None
        };

        Ok(Declaration::Property(PropertyDecl {
            name,
            type_name,
            generic,
            readonly,
            value,
            span: self.cursor.span_from(start),
        }))
    }

    /// Parses `a.b[c.d][e].f` with an explicit stack of open brackets.
    fn alias_path(&mut self) -> Result<AliasPath> {
        let mut open: Vec<AliasPath> = Vec::new();
        let mut current = AliasPath::default();
        let mut expect_segment = true;

        loop {
            if expect_segment {
                let name = match &self.token().kind {
                    TokenKind::Name(name) => name.clone(),
                    TokenKind::Num(_) => self.token().text(self.cursor.source()).to_string(),
                    _ => return Err(self.expected("name")),
                };
                self.next();
                current.segments.push(AliasSegment::new(name));
                expect_segment = false;
            } else if self.token().is_punc('.') {
                self.next();
                expect_segment = true;
            } else if self.token().is_punc('[') {
                self.next();
                open.push(mem::take(&mut current));
                expect_segment = true;
            } else if self.token().is_punc(']') {
                let Some(parent) = open.pop() else {
                    return Err(self.fail(ErrorKind::UnbalancedAliasPath, self.token().span));
                };
                self.next();
                let finished = mem::replace(&mut current, parent);
                if let Some(last) = current.segments.last_mut() {
                    last.subscripts.push(finished);
                }
            } else {
                break;
            }
        }

        if !open.is_empty() {
            return Err(self.fail(ErrorKind::UnbalancedAliasPath, self.token().span));
        }
        Ok(current)
    }

    // =========================================================================
    // Statement slot
    // =========================================================================

    fn forward_statement(&mut self, forward: Forward) -> Result<Statement> {
        let in_value = mem::take(&mut self.in_property_value);
        let start = self.token().span;

        if self.token().is_punc('.') {
            if self.peek().is_name_value("pragma") {
                return self.pragma();
            }
            return Err(self.unexpected());
        }

        if in_value && self.token().is_punc('{') && self.peek().is_string() {
            let members = self.object_block()?;
            return Ok(Statement::new(
                StatementKind::ObjectBlock(members),
                self.cursor.span_from(start),
            ));
        }

        if in_value && self.token().is_keyword("function") {
            self.next();
            let function = self.function_literal(false, start)?;
            let span = self.cursor.span_from(start);
            return Ok(Statement::new(
                StatementKind::Expression(Expr::new(ExprKind::Function(Box::new(function)), span)),
                span,
            ));
        }

        match forward {
            Forward::Statement => self.script_statement(),
            Forward::Expression => {
                let expr = self.expression(false, false)?;
                Ok(Statement::new(
                    StatementKind::Expression(expr),
                    self.cursor.span_from(start),
                ))
            }
        }
    }
}

/// Quotes `text` as a double-quoted script string literal.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

impl<'src> Grammar<'src> for DeclarativeParser<'src> {
    fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor<'src> {
        &mut self.cursor
    }

    fn statement(&mut self) -> Result<Statement> {
        self.forward_statement(Forward::Statement)
    }

    fn expression(&mut self, commas: bool, no_in: bool) -> Result<Expr> {
        let start = self.token().span;
        let mut expr = self.maybe_assign(no_in)?;
        if self.token().is_punc('{') {
            if let Some(type_name) = expr.to_qualified_name() {
                let members = self.object_block()?;
                let span = self.cursor.span_from(start);
                let element = Element {
                    type_name,
                    on: None,
                    members,
                    span,
                };
                expr = Expr::new(ExprKind::Element(Box::new(element)), span);
            }
        }
        self.sequence_tail(expr, commas, no_in)
    }

    fn array_literal(&mut self, open: Span) -> Result<Expr> {
        let from = open.end;
        let mut expr = self.script_array_literal(open)?;
        let to = self.cursor.position();
        if let ExprKind::Array { source, .. } = &mut expr.kind {
            *source = Some(format!("[{}", self.ledger.effective_text(from..to)));
        }
        Ok(expr)
    }

    fn binary(&mut self, op: &'static str, left: Expr, right: Expr) -> Result<Expr> {
        if op == "instanceof" {
            let source = self.cursor.source();
            let rewrite = format!(
                "{}({}, {}, {})",
                self.options.instanceof_helper,
                left.span.text(source),
                quote(right.span.text(source)),
                self.options.component_ref,
            );
            self.ledger.record(left.span.to(right.span).range(), rewrite);
        }
        Ok(binary_expr(op, left, right))
    }

    fn token_error(&self, token: &Token, expected: Option<&str>) -> Error {
        self.decorate(mismatch_error(token, expected))
    }

    fn croak(&self, message: &str, at: Option<Span>) -> Error {
        let span = at.unwrap_or(self.cursor.token().span);
        self.decorate(Error::syntax(message, span.position()))
    }
}

impl<'src> Capture<'src> for DeclarativeParser<'src> {
    fn ledger(&self) -> &IntervalLedger<'src> {
        &self.ledger
    }
}
