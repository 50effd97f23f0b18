//! Recursive-descent script grammar with overridable entry points.
//!
//! [`Grammar`] implements an ES5-level statement and expression grammar as
//! provided trait methods on top of a [`Cursor`]. A small, fixed set of
//! methods are override slots:
//!
//! - [`Grammar::statement`] - parse one statement
//! - [`Grammar::expression`] - parse a (comma) expression
//! - [`Grammar::array_literal`] - parse an array literal after `[`
//! - [`Grammar::binary`] - build a binary operator application
//! - [`Grammar::token_error`] - raise a token mismatch error
//! - [`Grammar::croak`] - raise a generic parse failure
//!
//! Every other production calls back into the slots, so an implementor that
//! overrides a slot sees every use of it, including nested ones. The
//! `script_*` methods are the original behavior of each slot and stay
//! reachable for delegation.

use qmlweb_foundation::{Error, ErrorKind, Result};

use crate::ast::{
    AccessorKind, CatchClause, Expr, ExprKind, Function, ObjectProperty, Statement, StatementKind,
    SwitchCase, VarDeclarator, VarKind,
};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Assignment operators.
const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "/=", "*=", "%=", ">>=", "<<=", ">>>=", "|=", "^=", "&=",
];

/// Prefix unary operators.
const UNARY_PREFIX: &[&str] = &["typeof", "void", "delete", "--", "++", "!", "~", "-", "+"];

/// Returns the binding power of a binary operator, or `None` if `op` is not one.
#[must_use]
pub fn binary_precedence(op: &str) -> Option<u8> {
    let precedence = match op {
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "===" | "!=" | "!==" => 6,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => 7,
        ">>" | "<<" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => return None,
    };
    Some(precedence)
}

/// Builds a binary expression spanning both operands.
#[must_use]
pub fn binary_expr(op: &'static str, left: Expr, right: Expr) -> Expr {
    let span = left.span.to(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

/// Builds the error for a token that does not fit the grammar.
///
/// Lexer error tokens are reported with the lexer's own message.
#[must_use]
pub fn mismatch_error(token: &Token, expected: Option<&str>) -> Error {
    let position = token.span.position();
    match (&token.kind, expected) {
        (TokenKind::Error(message), _) => Error::new(ErrorKind::Lexical(message.clone()), position),
        (TokenKind::Eof, None) => Error::unexpected_eof(position),
        (kind, Some(expected)) => Error::expected_token(kind.describe(), expected, position),
        (kind, None) => Error::unexpected_token(kind.describe(), position),
    }
}

/// Default limit on nested statements, expressions and element blocks.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Token position and parsing context shared by all productions.
pub struct Cursor<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    token: Token,
    /// Token after the current one, once peeked.
    peeked: Option<Token>,
    /// End offset of the most recently consumed token.
    prev_end: usize,
    /// Nesting depth of function bodies; `return` is only valid inside one.
    pub in_function: u32,
    /// Nesting depth of loops and switches.
    pub in_loop: u32,
    /// Labels in scope.
    pub labels: Vec<String>,
    /// Disables automatic semicolon insertion and trailing commas.
    exigent: bool,
    /// Current nesting depth.
    depth: usize,
    /// Nesting depth at which parsing fails instead of recursing.
    max_depth: usize,
}

impl<'src> Cursor<'src> {
    /// Creates a cursor positioned at the first token of `source`.
    #[must_use]
    pub fn new(source: &'src str, exigent: bool) -> Self {
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token();
        Self {
            lexer,
            token,
            peeked: None,
            prev_end: 0,
            in_function: 0,
            in_loop: 0,
            labels: Vec::new(),
            exigent,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the full source text.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.lexer.source()
    }

    /// Returns the current token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Returns the token after the current one without consuming anything.
    pub fn peek(&mut self) -> &Token {
        self.peeked.get_or_insert_with(|| self.lexer.next_token())
    }

    /// Consumes the current token and returns it.
    pub fn next(&mut self) -> Token {
        let upcoming = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        self.prev_end = self.token.span.end;
        std::mem::replace(&mut self.token, upcoming)
    }

    /// Returns the byte offset where the current token starts.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.token.span.start()
    }

    /// Returns the end offset of the most recently consumed token.
    #[must_use]
    pub const fn prev_end(&self) -> usize {
        self.prev_end
    }

    /// Returns true if semicolons and trailing commas are strictly required.
    #[must_use]
    pub const fn is_exigent(&self) -> bool {
        self.exigent
    }

    /// Returns true if a semicolon may be inserted before the current token.
    #[must_use]
    pub fn can_insert_semicolon(&self) -> bool {
        !self.exigent
            && (self.token.newline_before || self.token.is_eof() || self.token.is_punc('}'))
    }

    /// Returns a span from `start` to the end of the last consumed token.
    #[must_use]
    pub const fn span_from(&self, start: Span) -> Span {
        start.until(self.prev_end)
    }
}

/// The script grammar, as provided methods over a [`Cursor`].
pub trait Grammar<'src>: Sized {
    /// Returns the cursor.
    fn cursor(&self) -> &Cursor<'src>;

    /// Returns the cursor mutably.
    fn cursor_mut(&mut self) -> &mut Cursor<'src>;

    // =========================================================================
    // Override slots
    // =========================================================================

    /// Parses one statement.
    ///
    /// # Errors
    /// Returns an error if the statement is malformed.
    fn statement(&mut self) -> Result<Statement> {
        self.script_statement()
    }

    /// Parses an expression; `commas` allows a sequence, `no_in` forbids `in`.
    ///
    /// # Errors
    /// Returns an error if the expression is malformed.
    fn expression(&mut self, commas: bool, no_in: bool) -> Result<Expr> {
        self.script_expression(commas, no_in)
    }

    /// Parses an array literal whose `[` (at `open`) was already consumed.
    ///
    /// # Errors
    /// Returns an error if the literal is malformed.
    fn array_literal(&mut self, open: Span) -> Result<Expr> {
        self.script_array_literal(open)
    }

    /// Builds the node for a reduced binary operator application.
    ///
    /// # Errors
    /// Implementations may reject an operator application.
    fn binary(&mut self, op: &'static str, left: Expr, right: Expr) -> Result<Expr> {
        Ok(binary_expr(op, left, right))
    }

    /// Creates the error for a token that does not match the grammar.
    fn token_error(&self, token: &Token, expected: Option<&str>) -> Error {
        mismatch_error(token, expected)
    }

    /// Creates a generic parse failure at `at`, or at the current token.
    fn croak(&self, message: &str, at: Option<Span>) -> Error {
        let span = at.unwrap_or(self.cursor().token().span);
        Error::syntax(message, span.position())
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Returns the current token.
    fn token<'a>(&'a self) -> &'a Token
    where
        'src: 'a,
    {
        self.cursor().token()
    }

    /// Returns the token after the current one.
    fn peek<'a>(&'a mut self) -> &'a Token
    where
        'src: 'a,
    {
        self.cursor_mut().peek()
    }

    /// Consumes the current token.
    fn next(&mut self) -> Token {
        self.cursor_mut().next()
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// # Errors
    /// Fails with "nesting too deep" once the cursor's limit is reached,
    /// otherwise returns what `f` returns.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let cursor = self.cursor();
        if cursor.depth >= cursor.max_depth {
            return Err(self.croak("nesting too deep", None));
        }
        self.cursor_mut().depth += 1;
        let result = f(self);
        self.cursor_mut().depth -= 1;
        result
    }

    /// Creates an error for the current token.
    fn unexpected(&self) -> Error {
        self.token_error(self.token(), None)
    }

    /// Creates an error for the current token naming what was expected.
    fn expected(&self, what: &str) -> Error {
        self.token_error(self.token(), Some(what))
    }

    /// Consumes the punctuation `c` or fails.
    ///
    /// # Errors
    /// Returns an error if the current token is not `c`.
    fn expect_punc(&mut self, c: char) -> Result<Token> {
        if self.token().is_punc(c) {
            Ok(self.next())
        } else {
            Err(self.expected(&format!("punc {c}")))
        }
    }

    /// Consumes the name `value` or fails.
    ///
    /// # Errors
    /// Returns an error if the current token is not the name `value`.
    fn expect_name_value(&mut self, value: &str) -> Result<Token> {
        if self.token().is_name_value(value) {
            Ok(self.next())
        } else {
            Err(self.expected(&format!("name {value}")))
        }
    }

    /// Consumes a name token and returns it.
    ///
    /// # Errors
    /// Returns an error if the current token is not a name.
    fn expect_name(&mut self) -> Result<String> {
        match &self.token().kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.next();
                Ok(name)
            }
            _ => Err(self.expected("name")),
        }
    }

    /// Consumes a name-like token (name, keyword, atom or word operator).
    ///
    /// # Errors
    /// Returns an error if the current token cannot be used as a name.
    fn as_name(&mut self) -> Result<String> {
        let name = match &self.token().kind {
            TokenKind::Name(name) => name.clone(),
            TokenKind::Keyword(word) | TokenKind::Atom(word) => (*word).to_string(),
            TokenKind::Operator(op) if op.chars().all(char::is_alphabetic) => (*op).to_string(),
            _ => return Err(self.expected("name")),
        };
        self.next();
        Ok(name)
    }

    /// Consumes a `;`, or accepts an inserted one.
    ///
    /// # Errors
    /// Returns an error if no semicolon is present and none can be inserted.
    fn semicolon(&mut self) -> Result<()> {
        if self.token().is_punc(';') {
            self.next();
            Ok(())
        } else if self.cursor().can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// The original statement production.
    ///
    /// # Errors
    /// Returns an error if the statement is malformed or nested too deeply.
    fn script_statement(&mut self) -> Result<Statement> {
        self.nested(Self::any_statement)
    }

    /// Dispatches on the first token of a statement.
    ///
    /// # Errors
    /// Returns an error if the statement is malformed.
    fn any_statement(&mut self) -> Result<Statement> {
        let start = self.token().span;
        match self.token().kind.clone() {
            TokenKind::String(_)
            | TokenKind::Num(_)
            | TokenKind::Regexp { .. }
            | TokenKind::Operator(_)
            | TokenKind::Atom(_) => self.simple_statement(),
            TokenKind::Name(label) => {
                if self.peek().is_punc(':') {
                    self.next();
                    self.next();
                    self.labeled_statement(label, start)
                } else {
                    self.simple_statement()
                }
            }
            TokenKind::Punc('{') => {
                let body = self.block()?;
                Ok(Statement::new(
                    StatementKind::Block(body),
                    self.cursor().span_from(start),
                ))
            }
            TokenKind::Punc('[' | '(') => self.simple_statement(),
            TokenKind::Punc(';') => {
                self.next();
                Ok(Statement::new(StatementKind::Empty, start))
            }
            TokenKind::Keyword(keyword) => {
                self.next();
                let kind = self.keyword_statement(keyword, start)?;
                Ok(Statement::new(kind, self.cursor().span_from(start)))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parses the statement introduced by `keyword` (already consumed).
    ///
    /// # Errors
    /// Returns an error if the statement is malformed.
    fn keyword_statement(&mut self, keyword: &'static str, start: Span) -> Result<StatementKind> {
        match keyword {
            "break" | "continue" => self.break_continue(keyword),
            "debugger" => {
                self.semicolon()?;
                Ok(StatementKind::Debugger)
            }
            "do" => {
                let body = self.loop_body()?;
                if !self.token().is_keyword("while") {
                    return Err(self.expected("keyword while"));
                }
                self.next();
                let test = self.parenthesised()?;
                self.semicolon()?;
                Ok(StatementKind::DoWhile {
                    body: Box::new(body),
                    test,
                })
            }
            "for" => self.for_statement(),
            "function" => Ok(StatementKind::Function(self.function_literal(true, start)?)),
            "if" => {
                let test = self.parenthesised()?;
                let consequent = Box::new(self.statement()?);
                let alternate = if self.token().is_keyword("else") {
                    self.next();
                    Some(Box::new(self.statement()?))
                } else {
                    None
                };
                Ok(StatementKind::If {
                    test,
                    consequent,
                    alternate,
                })
            }
            "return" => {
                if self.cursor().in_function == 0 {
                    return Err(self.croak("'return' outside of function", Some(start)));
                }
                let value = if self.token().is_punc(';') {
                    self.next();
                    None
                } else if self.cursor().can_insert_semicolon() {
                    None
                } else {
                    let value = self.expression(true, false)?;
                    self.semicolon()?;
                    Some(value)
                };
                Ok(StatementKind::Return(value))
            }
            "switch" => {
                let discriminant = self.parenthesised()?;
                let cases = self.switch_block()?;
                Ok(StatementKind::Switch {
                    discriminant,
                    cases,
                })
            }
            "throw" => {
                if self.token().newline_before {
                    return Err(self.croak("Illegal newline after 'throw'", None));
                }
                let value = self.expression(true, false)?;
                self.semicolon()?;
                Ok(StatementKind::Throw(value))
            }
            "try" => self.try_statement(),
            "var" | "const" => {
                let declarations = self.var_definitions(false)?;
                self.semicolon()?;
                let kind = if keyword == "var" {
                    VarKind::Var
                } else {
                    VarKind::Const
                };
                Ok(StatementKind::Var { kind, declarations })
            }
            "while" => {
                let test = self.parenthesised()?;
                let body = Box::new(self.loop_body()?);
                Ok(StatementKind::While { test, body })
            }
            "with" => {
                let object = self.parenthesised()?;
                let body = Box::new(self.statement()?);
                Ok(StatementKind::With { object, body })
            }
            _ => Err(self.croak(&format!("Unexpected keyword {keyword}"), Some(start))),
        }
    }

    /// Parses an expression followed by a semicolon.
    ///
    /// # Errors
    /// Returns an error if the expression is malformed.
    fn simple_statement(&mut self) -> Result<Statement> {
        let start = self.token().span;
        let expr = self.expression(true, false)?;
        self.semicolon()?;
        Ok(Statement::new(
            StatementKind::Expression(expr),
            self.cursor().span_from(start),
        ))
    }

    /// Parses the statement after `label:`.
    ///
    /// # Errors
    /// Returns an error if the labeled statement is malformed.
    fn labeled_statement(&mut self, label: String, start: Span) -> Result<Statement> {
        self.cursor_mut().labels.push(label.clone());
        let body = self.statement();
        self.cursor_mut().labels.pop();
        let body = body?;
        Ok(Statement::new(
            StatementKind::Labeled {
                label,
                body: Box::new(body),
            },
            self.cursor().span_from(start),
        ))
    }

    /// Parses the rest of a `break` or `continue` statement.
    ///
    /// # Errors
    /// Returns an error if the label is unknown or no loop encloses it.
    fn break_continue(&mut self, keyword: &'static str) -> Result<StatementKind> {
        let mut label = None;
        if !self.cursor().can_insert_semicolon() {
            if let Some(name) = self.token().as_name() {
                label = Some(name.to_string());
                self.next();
            }
        }
        self.semicolon()?;

        match &label {
            Some(name) if !self.cursor().labels.contains(name) => {
                return Err(self.croak(
                    &format!("Label {name} without matching loop or statement"),
                    None,
                ));
            }
            None if self.cursor().in_loop == 0 => {
                return Err(self.croak(&format!("{keyword} not inside a loop or switch"), None));
            }
            _ => {}
        }

        Ok(if keyword == "break" {
            StatementKind::Break(label)
        } else {
            StatementKind::Continue(label)
        })
    }

    /// Parses a statement inside a loop.
    ///
    /// # Errors
    /// Returns an error if the statement is malformed.
    fn loop_body(&mut self) -> Result<Statement> {
        self.cursor_mut().in_loop += 1;
        let body = self.statement();
        self.cursor_mut().in_loop -= 1;
        body
    }

    /// Parses `for (...) body` after the keyword.
    ///
    /// # Errors
    /// Returns an error if the loop header or body is malformed.
    fn for_statement(&mut self) -> Result<StatementKind> {
        self.expect_punc('(')?;
        let mut init = None;
        if !self.token().is_punc(';') {
            let start = self.token().span;
            let statement = if self.token().is_keyword("var") {
                self.next();
                let declarations = self.var_definitions(true)?;
                StatementKind::Var {
                    kind: VarKind::Var,
                    declarations,
                }
            } else {
                StatementKind::Expression(self.expression(true, true)?)
            };
            let statement = Statement::new(statement, self.cursor().span_from(start));

            if self.token().is_operator("in") {
                if let StatementKind::Var { declarations, .. } = &statement.kind {
                    if declarations.len() > 1 {
                        return Err(self.croak(
                            "Only one variable declaration allowed in for..in loop",
                            Some(start),
                        ));
                    }
                }
                self.next();
                let right = self.expression(true, false)?;
                self.expect_punc(')')?;
                let body = self.loop_body()?;
                return Ok(StatementKind::ForIn {
                    left: Box::new(statement),
                    right,
                    body: Box::new(body),
                });
            }
            init = Some(Box::new(statement));
        }

        self.expect_punc(';')?;
        let test = if self.token().is_punc(';') {
            None
        } else {
            Some(self.expression(true, false)?)
        };
        self.expect_punc(';')?;
        let update = if self.token().is_punc(')') {
            None
        } else {
            Some(self.expression(true, false)?)
        };
        self.expect_punc(')')?;
        let body = self.loop_body()?;
        Ok(StatementKind::For {
            init,
            test,
            update,
            body: Box::new(body),
        })
    }

    /// Parses `{ statements }`.
    ///
    /// # Errors
    /// Returns an error if the block is unterminated or malformed.
    fn block(&mut self) -> Result<Vec<Statement>> {
        self.expect_punc('{')?;
        let mut statements = Vec::new();
        while !self.token().is_punc('}') {
            if self.token().is_eof() {
                return Err(self.unexpected());
            }
            statements.push(self.statement()?);
        }
        self.next();
        Ok(statements)
    }

    /// Parses `{ case ...: ... default: ... }`.
    ///
    /// # Errors
    /// Returns an error if the switch body is malformed.
    fn switch_block(&mut self) -> Result<Vec<SwitchCase>> {
        self.expect_punc('{')?;
        self.cursor_mut().in_loop += 1;
        let cases = self.switch_cases();
        self.cursor_mut().in_loop -= 1;
        let cases = cases?;
        self.next();
        Ok(cases)
    }

    /// Parses switch cases up to (not including) the closing brace.
    ///
    /// # Errors
    /// Returns an error if a case is malformed.
    fn switch_cases(&mut self) -> Result<Vec<SwitchCase>> {
        let mut cases: Vec<SwitchCase> = Vec::new();
        while !self.token().is_punc('}') {
            if self.token().is_eof() {
                return Err(self.unexpected());
            }
            if self.token().is_keyword("case") {
                self.next();
                let test = self.expression(true, false)?;
                self.expect_punc(':')?;
                cases.push(SwitchCase {
                    test: Some(test),
                    body: Vec::new(),
                });
            } else if self.token().is_keyword("default") {
                self.next();
                self.expect_punc(':')?;
                cases.push(SwitchCase {
                    test: None,
                    body: Vec::new(),
                });
            } else {
                if cases.is_empty() {
                    return Err(self.unexpected());
                }
                let statement = self.statement()?;
                if let Some(case) = cases.last_mut() {
                    case.body.push(statement);
                }
            }
        }
        Ok(cases)
    }

    /// Parses `try { } catch (e) { } finally { }` after the keyword.
    ///
    /// # Errors
    /// Returns an error if neither catch nor finally follows.
    fn try_statement(&mut self) -> Result<StatementKind> {
        let block = self.block()?;
        let mut handler = None;
        let mut finalizer = None;
        if self.token().is_keyword("catch") {
            self.next();
            self.expect_punc('(')?;
            let param = self.expect_name()?;
            self.expect_punc(')')?;
            handler = Some(CatchClause {
                param,
                body: self.block()?,
            });
        }
        if self.token().is_keyword("finally") {
            self.next();
            finalizer = Some(self.block()?);
        }
        if handler.is_none() && finalizer.is_none() {
            return Err(self.croak("Missing catch/finally blocks", None));
        }
        Ok(StatementKind::Try {
            block,
            handler,
            finalizer,
        })
    }

    /// Parses `a = 1, b` after `var`.
    ///
    /// # Errors
    /// Returns an error if a declarator is malformed.
    fn var_definitions(&mut self, no_in: bool) -> Result<Vec<VarDeclarator>> {
        let mut declarations = Vec::new();
        loop {
            let name = self.expect_name()?;
            let init = if self.token().is_operator("=") {
                self.next();
                Some(self.expression(false, no_in)?)
            } else {
                None
            };
            declarations.push(VarDeclarator { name, init });
            if !self.token().is_punc(',') {
                break;
            }
            self.next();
        }
        Ok(declarations)
    }

    /// Parses a function after the `function` keyword (which started at `start`).
    ///
    /// # Errors
    /// Returns an error if a required name is missing or the body is malformed.
    fn function_literal(&mut self, named: bool, start: Span) -> Result<Function> {
        let name = match self.token().as_name() {
            Some(name) => {
                let name = name.to_string();
                self.next();
                Some(name)
            }
            None if named => return Err(self.expected("name")),
            None => None,
        };

        self.expect_punc('(')?;
        let mut params = Vec::new();
        let mut first = true;
        while !self.token().is_punc(')') {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            params.push(self.expect_name()?);
        }
        self.next();

        let cursor = self.cursor_mut();
        cursor.in_function += 1;
        let saved_loop = std::mem::take(&mut cursor.in_loop);
        let saved_labels = std::mem::take(&mut cursor.labels);
        let body = self.block();
        let cursor = self.cursor_mut();
        cursor.in_function -= 1;
        cursor.in_loop = saved_loop;
        cursor.labels = saved_labels;

        Ok(Function {
            name,
            params,
            body: body?,
            span: self.cursor().span_from(start),
        })
    }

    /// Parses `( expression )`.
    ///
    /// # Errors
    /// Returns an error if the parentheses or expression are malformed.
    fn parenthesised(&mut self) -> Result<Expr> {
        self.expect_punc('(')?;
        let expr = self.expression(true, false)?;
        self.expect_punc(')')?;
        Ok(expr)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// The original expression production.
    ///
    /// # Errors
    /// Returns an error if the expression is malformed.
    fn script_expression(&mut self, commas: bool, no_in: bool) -> Result<Expr> {
        let expr = self.maybe_assign(no_in)?;
        self.sequence_tail(expr, commas, no_in)
    }

    /// Continues `first` into a comma sequence when `commas` allows it.
    ///
    /// # Errors
    /// Returns an error if a later expression is malformed.
    fn sequence_tail(&mut self, first: Expr, commas: bool, no_in: bool) -> Result<Expr> {
        if !commas || !self.token().is_punc(',') {
            return Ok(first);
        }
        self.next();
        let rest = self.expression(true, no_in)?;
        let span = first.span.to(rest.span);
        let mut items = vec![first];
        match rest.kind {
            ExprKind::Sequence(more) => items.extend(more),
            _ => items.push(rest),
        }
        Ok(Expr::new(ExprKind::Sequence(items), span))
    }

    /// Parses an assignment or anything of higher precedence.
    ///
    /// # Errors
    /// Returns an error if the target is not assignable or the expression is
    /// nested too deeply.
    fn maybe_assign(&mut self, no_in: bool) -> Result<Expr> {
        self.nested(|p| p.assignment(no_in))
    }

    /// [`Grammar::maybe_assign`] without the nesting check.
    ///
    /// # Errors
    /// Returns an error if the target is not assignable.
    fn assignment(&mut self, no_in: bool) -> Result<Expr> {
        let start = self.token().span;
        let left = self.maybe_conditional(no_in)?;
        let op = match self.token().kind {
            TokenKind::Operator(op) if ASSIGNMENT_OPERATORS.contains(&op) => op,
            _ => return Ok(left),
        };
        if !left.is_assignable() {
            return Err(self.croak("Invalid assignment", Some(start)));
        }
        self.next();
        let value = self.maybe_assign(no_in)?;
        let span = left.span.to(value.span);
        Ok(Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(left),
                value: Box::new(value),
            },
            span,
        ))
    }

    /// Parses `test ? a : b` or anything of higher precedence.
    ///
    /// # Errors
    /// Returns an error if a branch is malformed.
    fn maybe_conditional(&mut self, no_in: bool) -> Result<Expr> {
        let test = self.expr_ops(no_in)?;
        if !self.token().is_operator("?") {
            return Ok(test);
        }
        self.next();
        let consequent = self.expression(false, false)?;
        self.expect_punc(':')?;
        let alternate = self.expression(false, no_in)?;
        let span = test.span.to(alternate.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    /// Parses a chain of binary operators.
    ///
    /// # Errors
    /// Returns an error if an operand is malformed.
    fn expr_ops(&mut self, no_in: bool) -> Result<Expr> {
        let left = self.maybe_unary(true)?;
        self.expr_op(left, 0, no_in)
    }

    /// Precedence climbing over binary operators binding tighter than `min`.
    ///
    /// # Errors
    /// Returns an error if an operand is malformed.
    fn expr_op(&mut self, left: Expr, min: u8, no_in: bool) -> Result<Expr> {
        let op = match self.token().kind {
            TokenKind::Operator(op) if !(no_in && op == "in") => op,
            _ => return Ok(left),
        };
        match binary_precedence(op) {
            Some(precedence) if precedence > min => {
                self.next();
                let operand = self.maybe_unary(true)?;
                let right = self.expr_op(operand, precedence, no_in)?;
                let combined = self.binary(op, left, right)?;
                self.expr_op(combined, min, no_in)
            }
            _ => Ok(left),
        }
    }

    /// Parses prefix and postfix unary operators around an atom.
    ///
    /// # Errors
    /// Returns an error if `++`/`--` is applied to a non-assignable operand.
    fn maybe_unary(&mut self, allow_calls: bool) -> Result<Expr> {
        let start = self.token().span;
        if let TokenKind::Operator(op) = self.token().kind {
            if UNARY_PREFIX.contains(&op) {
                self.next();
                let operand = self.nested(|p| p.maybe_unary(allow_calls))?;
                return self.make_unary(op, true, operand, start);
            }
        }

        let mut expr = self.expr_atom(allow_calls)?;
        while let TokenKind::Operator(op @ ("++" | "--")) = self.token().kind {
            if self.token().newline_before {
                break;
            }
            self.next();
            let span = self.cursor().span_from(expr.span);
            expr = self.make_unary(op, false, expr, span)?;
        }
        Ok(expr)
    }

    /// Builds a unary expression, validating increment targets.
    ///
    /// # Errors
    /// Returns an error if `++`/`--` is applied to a non-assignable operand.
    fn make_unary(&mut self, op: &'static str, prefix: bool, operand: Expr, start: Span) -> Result<Expr> {
        if matches!(op, "++" | "--") && !operand.is_assignable() {
            return Err(self.croak(&format!("Invalid use of {op} operator"), Some(start)));
        }
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                prefix,
                operand: Box::new(operand),
            },
            self.cursor().span_from(start),
        ))
    }

    /// Parses a primary expression followed by its member chain.
    ///
    /// # Errors
    /// Returns an error if no expression starts at the current token.
    fn expr_atom(&mut self, allow_calls: bool) -> Result<Expr> {
        let start = self.token().span;
        let atom = match self.token().kind.clone() {
            TokenKind::Operator("new") => {
                self.next();
                return self.new_expression(start, allow_calls);
            }
            TokenKind::Punc('(') => {
                self.next();
                let inner = self.expression(true, false)?;
                self.expect_punc(')')?;
                Expr::new(inner.kind, self.cursor().span_from(start))
            }
            TokenKind::Punc('[') => {
                self.next();
                self.array_literal(start)?
            }
            TokenKind::Punc('{') => {
                self.next();
                self.object_literal(start)?
            }
            TokenKind::Keyword("function") => {
                self.next();
                let function = self.function_literal(false, start)?;
                Expr::new(
                    ExprKind::Function(Box::new(function)),
                    self.cursor().span_from(start),
                )
            }
            TokenKind::Atom(atom) => {
                self.next();
                Expr::new(ExprKind::Atom(atom), start)
            }
            TokenKind::Num(n) => {
                self.next();
                Expr::new(ExprKind::Num(n), start)
            }
            TokenKind::String(s) => {
                self.next();
                Expr::new(ExprKind::String(s), start)
            }
            TokenKind::Regexp { pattern, flags } => {
                self.next();
                Expr::new(ExprKind::Regexp { pattern, flags }, start)
            }
            TokenKind::Name(name) => {
                self.next();
                Expr::new(ExprKind::Name(name), start)
            }
            _ => return Err(self.unexpected()),
        };
        self.subscripts(atom, allow_calls)
    }

    /// Parses `new Callee(args)` after `new`.
    ///
    /// # Errors
    /// Returns an error if the callee or arguments are malformed.
    fn new_expression(&mut self, start: Span, allow_calls: bool) -> Result<Expr> {
        let callee = self.nested(|p| p.expr_atom(false))?;
        let arguments = if self.token().is_punc('(') {
            self.next();
            self.expr_list(')', false, false)?
                .into_iter()
                .flatten()
                .collect()
        } else {
            Vec::new()
        };
        let expr = Expr::new(
            ExprKind::New {
                callee: Box::new(callee),
                arguments,
            },
            self.cursor().span_from(start),
        );
        self.subscripts(expr, allow_calls)
    }

    /// Parses comma separated expressions up to and including `closing`.
    ///
    /// # Errors
    /// Returns an error if an element is malformed.
    fn expr_list(
        &mut self,
        closing: char,
        allow_trailing_comma: bool,
        allow_empty: bool,
    ) -> Result<Vec<Option<Expr>>> {
        let mut items = Vec::new();
        let mut first = true;
        while !self.token().is_punc(closing) {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            if allow_trailing_comma && self.token().is_punc(closing) {
                break;
            }
            if allow_empty && self.token().is_punc(',') {
                items.push(None);
            } else {
                items.push(Some(self.expression(false, false)?));
            }
        }
        self.next();
        Ok(items)
    }

    /// The original array literal production.
    ///
    /// # Errors
    /// Returns an error if an element is malformed.
    fn script_array_literal(&mut self, open: Span) -> Result<Expr> {
        let trailing = !self.cursor().is_exigent();
        let elements = self.expr_list(']', trailing, true)?;
        Ok(Expr::new(
            ExprKind::Array {
                elements,
                source: None,
            },
            self.cursor().span_from(open),
        ))
    }

    /// Parses an object literal whose `{` (at `open`) was already consumed.
    ///
    /// # Errors
    /// Returns an error if an entry is malformed.
    fn object_literal(&mut self, open: Span) -> Result<Expr> {
        let mut properties = Vec::new();
        let mut first = true;
        while !self.token().is_punc('}') {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            if !self.cursor().is_exigent() && self.token().is_punc('}') {
                break;
            }

            let key_start = self.token().span;
            let was_name = self.token().is_name();
            let key = self.property_name()?;
            if was_name && (key == "get" || key == "set") && !self.token().is_punc(':') {
                let accessor = if key == "get" {
                    AccessorKind::Get
                } else {
                    AccessorKind::Set
                };
                let key = self.property_name()?;
                let function = self.function_literal(false, key_start)?;
                properties.push(ObjectProperty {
                    key,
                    kind: accessor,
                    value: Expr::new(
                        ExprKind::Function(Box::new(function)),
                        self.cursor().span_from(key_start),
                    ),
                });
            } else {
                self.expect_punc(':')?;
                let value = self.expression(false, false)?;
                properties.push(ObjectProperty {
                    key,
                    kind: AccessorKind::Init,
                    value,
                });
            }
        }
        self.next();
        Ok(Expr::new(
            ExprKind::Object(properties),
            self.cursor().span_from(open),
        ))
    }

    /// Parses an object literal key.
    ///
    /// # Errors
    /// Returns an error if the current token cannot be a key.
    fn property_name(&mut self) -> Result<String> {
        match self.token().kind.clone() {
            TokenKind::Num(_) => {
                let source = self.cursor().source();
                let text = self.token().text(source).to_string();
                self.next();
                Ok(text)
            }
            TokenKind::String(s) => {
                self.next();
                Ok(s)
            }
            _ => self.as_name(),
        }
    }

    /// Parses `.name`, `[index]` and (if `allow_calls`) `(args)` after `expr`.
    ///
    /// # Errors
    /// Returns an error if a member access or argument list is malformed.
    fn subscripts(&mut self, expr: Expr, allow_calls: bool) -> Result<Expr> {
        let mut expr = expr;
        loop {
            let start = expr.span;
            let kind = if self.token().is_punc('.') {
                self.next();
                ExprKind::Dot {
                    object: Box::new(expr),
                    property: self.as_name()?,
                }
            } else if self.token().is_punc('[') {
                self.next();
                let index = self.expression(true, false)?;
                self.expect_punc(']')?;
                ExprKind::Sub {
                    object: Box::new(expr),
                    index: Box::new(index),
                }
            } else if allow_calls && self.token().is_punc('(') {
                self.next();
                let arguments = self
                    .expr_list(')', false, false)?
                    .into_iter()
                    .flatten()
                    .collect();
                ExprKind::Call {
                    callee: Box::new(expr),
                    arguments,
                }
            } else {
                return Ok(expr);
            };
            expr = Expr::new(kind, self.cursor().span_from(start));
        }
    }
}

/// Plain script parser with no overridden slots.
pub struct ScriptParser<'src> {
    cursor: Cursor<'src>,
}

impl<'src> ScriptParser<'src> {
    /// Creates a parser for `source`.
    #[must_use]
    pub fn new(source: &'src str, exigent: bool) -> Self {
        Self {
            cursor: Cursor::new(source, exigent),
        }
    }

    /// Parses statements until the end of input.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn parse_program(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.token().is_eof() {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }
}

impl<'src> Grammar<'src> for ScriptParser<'src> {
    fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor<'src> {
        &mut self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(source: &str) -> Vec<Statement> {
        ScriptParser::new(source, false)
            .parse_program()
            .expect("parse failed")
    }

    fn expression(source: &str) -> Expr {
        let mut statements = program(source);
        assert_eq!(statements.len(), 1);
        match statements.remove(0).kind {
            StatementKind::Expression(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn precedence_of_binary_operators() {
        let expr = expression("1 + 2 * 3");
        let ExprKind::Binary { op, right, .. } = expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, "+");
        assert!(matches!(right.kind, ExprKind::Binary { op: "*", .. }));
    }

    #[test]
    fn left_associativity() {
        let expr = expression("a - b - c");
        let ExprKind::Binary { left, .. } = expr.kind else {
            panic!("expected binary");
        };
        assert!(matches!(left.kind, ExprKind::Binary { op: "-", .. }));
    }

    #[test]
    fn binary_span_covers_operands() {
        let source = "x = (a) instanceof B;";
        let expr = expression(source);
        let ExprKind::Assign { value, .. } = expr.kind else {
            panic!("expected assignment");
        };
        assert_eq!(value.span.text(source), "(a) instanceof B");
    }

    #[test]
    fn member_chain_and_calls() {
        let expr = expression("a.b[c](1, 2).d");
        assert!(matches!(expr.kind, ExprKind::Dot { ref property, .. } if property == "d"));
    }

    #[test]
    fn new_with_arguments() {
        let expr = expression("new Date(0).getTime()");
        assert!(matches!(expr.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn conditional_and_assignment() {
        let expr = expression("x += a ? b : c");
        assert!(matches!(expr.kind, ExprKind::Assign { op: "+=", .. }));
    }

    #[test]
    fn invalid_assignment() {
        let err = ScriptParser::new("1 = 2", false).parse_program().unwrap_err();
        assert!(err.message().contains("Invalid assignment"));
    }

    #[test]
    fn array_with_holes_and_trailing_comma() {
        let expr = expression("[1, , 3,]");
        let ExprKind::Array { elements, source } = expr.kind else {
            panic!("expected array");
        };
        assert_eq!(elements.len(), 3);
        assert!(elements[1].is_none());
        assert!(source.is_none());
    }

    #[test]
    fn exigent_mode_rejects_trailing_comma_and_asi() {
        assert!(ScriptParser::new("[1, 2,]", true).parse_program().is_err());
        assert!(ScriptParser::new("a\nb", true).parse_program().is_err());
        assert_eq!(program("a\nb").len(), 2);
    }

    #[test]
    fn object_literal_with_accessors() {
        let expr = expression("({ a: 1, 'b': 2, 3: c, get d() { return 1 }, set d(v) {} })");
        let ExprKind::Object(properties) = expr.kind else {
            panic!("expected object");
        };
        let keys: Vec<&str> = properties.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "3", "d", "d"]);
        assert_eq!(properties[3].kind, AccessorKind::Get);
        assert_eq!(properties[4].kind, AccessorKind::Set);
    }

    #[test]
    fn statements() {
        let source = r"
            var a = 1, b;
            function f(x, y) { if (x) { return y } else return 0 }
            for (var i = 0; i < 10; i++) { continue }
            for (var k in obj) break;
            while (a) a--;
            do { a++ } while (a < 3)
            switch (a) { case 1: b = 2; break; default: b = 3 }
            try { f() } catch (e) { throw e } finally { a = 0 }
            outer: for (;;) { break outer }
        ";
        let statements = program(source);
        assert_eq!(statements.len(), 9);
        assert!(matches!(statements[0].kind, StatementKind::Var { ref declarations, .. } if declarations.len() == 2));
        assert!(matches!(statements[1].kind, StatementKind::Function(ref f) if f.params == ["x", "y"]));
        assert!(matches!(statements[3].kind, StatementKind::ForIn { .. }));
        assert!(matches!(statements[6].kind, StatementKind::Switch { ref cases, .. } if cases.len() == 2));
        assert!(matches!(statements[8].kind, StatementKind::Labeled { .. }));
    }

    #[test]
    fn return_outside_function() {
        let err = ScriptParser::new("return 1", false).parse_program().unwrap_err();
        assert!(err.message().contains("'return' outside of function"));
    }

    #[test]
    fn break_outside_loop() {
        assert!(ScriptParser::new("break;", false).parse_program().is_err());
        assert!(ScriptParser::new("while (1) { break nope }", false).parse_program().is_err());
    }

    #[test]
    fn try_requires_handler() {
        let err = ScriptParser::new("try {}", false).parse_program().unwrap_err();
        assert!(err.message().contains("Missing catch/finally"));
    }

    #[test]
    fn unexpected_token_reports_position() {
        let err = ScriptParser::new("a = ;", false).parse_program().unwrap_err();
        assert_eq!(err.position.line, 1);
        assert_eq!(err.position.column, 5);
        assert_eq!(err.position.offset, 4);
    }

    #[test]
    fn token_and_peek_through_the_trait() {
        let mut parser = ScriptParser::new("a + b", false);
        assert!(Grammar::peek(&mut parser).is_operator("+"));
        let current = Grammar::token(&parser);
        assert!(current.is_name_value("a"));
        assert_eq!(current.span.range(), 0..1);
    }

    #[test]
    fn lexical_error_is_reported() {
        let err = ScriptParser::new("a = 'open", false).parse_program().unwrap_err();
        assert!(err.kind.is_lexical());
    }

    #[test]
    fn regexp_literal_expression() {
        let expr = expression("/a+b/g.test(s)");
        assert!(matches!(expr.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn sequence_expression() {
        let expr = expression("a, b, c");
        assert!(matches!(expr.kind, ExprKind::Sequence(ref items) if items.len() == 3));
    }

    #[test]
    fn postfix_not_across_newline() {
        let statements = program("a\n++b");
        assert_eq!(statements.len(), 2);
    }
}
