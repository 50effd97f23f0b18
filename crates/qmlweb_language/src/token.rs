//! Token types for the script tokenizer.
//!
//! Tokens are the output of the lexer and input to both the script grammar
//! and the declarative grammar core. Declarative words such as `property`,
//! `signal`, `import` or `readonly` are ordinary [`TokenKind::Name`]s; only
//! the grammar decides when they are special.

use crate::span::Span;

/// Reserved words that are tokenized as [`TokenKind::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "const", "continue", "debugger", "default", "do", "else", "finally",
    "for", "function", "if", "return", "switch", "throw", "try", "var", "while", "with",
];

/// Words that are tokenized as [`TokenKind::Operator`].
pub const WORD_OPERATORS: &[&str] = &["in", "instanceof", "typeof", "new", "void", "delete"];

/// Words that are tokenized as [`TokenKind::Atom`].
pub const ATOMS: &[&str] = &["false", "null", "true", "undefined"];

/// Punctuation operators, longest first so the lexer can match greedily.
pub const PUNCTUATION_OPERATORS: &[&str] = &[
    ">>>=", "===", "!==", ">>>", "<<=", ">>=", "++", "--", "==", "!=", "<=", ">=", "&&", "||",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "+", "-", "*", "/", "%", "<",
    ">", "=", "!", "~", "&", "|", "^", "?",
];

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
    /// Whether a line break appeared between the previous token and this one.
    pub newline_before: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token is the punctuation character `c`.
    #[must_use]
    pub fn is_punc(&self, c: char) -> bool {
        self.kind == TokenKind::Punc(c)
    }

    /// Returns true if this token is the operator `op`.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        matches!(self.kind, TokenKind::Operator(o) if o == op)
    }

    /// Returns true if this token is the keyword `kw`.
    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == kw)
    }

    /// Returns true if this token is a name (identifier).
    #[must_use]
    pub const fn is_name(&self) -> bool {
        matches!(self.kind, TokenKind::Name(_))
    }

    /// Returns true if this token is the name `value`.
    #[must_use]
    pub fn is_name_value(&self, value: &str) -> bool {
        matches!(&self.kind, TokenKind::Name(n) if n == value)
    }

    /// Returns true if this token is a string literal.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::String(_))
    }

    /// Returns true if this token is a number literal.
    #[must_use]
    pub const fn is_num(&self) -> bool {
        matches!(self.kind, TokenKind::Num(_))
    }

    /// Returns true if this token marks the end of input.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the name if this token is a name.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Name(n) => Some(n),
            _ => None,
        }
    }
}

/// Token types produced by the lexer.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Identifier like `width` or `Rectangle`
    Name(String),
    /// Reserved word like `function` or `var`
    Keyword(&'static str),
    /// `true`, `false`, `null` or `undefined`
    Atom(&'static str),
    /// Number literal like `42`, `1.5` or `0xff`
    Num(f64),
    /// String literal (value after escape processing)
    String(String),
    /// Regular expression literal like `/ab+c/gi`
    Regexp {
        /// Pattern between the slashes.
        pattern: String,
        /// Trailing flags.
        flags: String,
    },
    /// Operator like `+`, `===` or `instanceof`
    Operator(&'static str),
    /// Punctuation like `{`, `;` or `.`
    Punc(char),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns the parse-js style type name of this token kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Keyword(_) => "keyword",
            Self::Atom(_) => "atom",
            Self::Num(_) => "num",
            Self::String(_) => "string",
            Self::Regexp { .. } => "regexp",
            Self::Operator(_) => "operator",
            Self::Punc(_) => "punc",
            Self::Eof => "eof",
            Self::Error(_) => "error",
        }
    }

    /// Returns a human-readable description for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Name(v) => format!("name {v}"),
            Self::Keyword(v) | Self::Atom(v) | Self::Operator(v) => {
                format!("{} {v}", self.type_name())
            }
            Self::Num(n) => format!("num {n}"),
            Self::String(s) => format!("string {s:?}"),
            Self::Regexp { pattern, flags } => format!("regexp /{pattern}/{flags}"),
            Self::Punc(c) => format!("punc {c}"),
            Self::Eof => "eof".to_string(),
            Self::Error(msg) => format!("error {msg}"),
        }
    }

    /// Classifies a scanned word as keyword, operator, atom or name.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        if let Some(kw) = KEYWORDS.iter().copied().find(|k| *k == word) {
            Self::Keyword(kw)
        } else if let Some(op) = WORD_OPERATORS.iter().copied().find(|o| *o == word) {
            Self::Operator(op)
        } else if let Some(atom) = ATOMS.iter().copied().find(|a| *a == word) {
            Self::Atom(atom)
        } else {
            Self::Name(word.to_string())
        }
    }

    /// Returns true if a regular expression may follow a token of this kind.
    ///
    /// Decides whether a `/` after this token starts a regexp or is division.
    #[must_use]
    pub fn allows_regexp_after(&self) -> bool {
        match self {
            Self::Operator(op) => !matches!(*op, "++" | "--"),
            Self::Keyword(kw) => matches!(*kw, "return" | "throw" | "else" | "case"),
            Self::Punc(c) => matches!(c, '[' | '{' | '}' | '(' | ',' | '.' | ';' | ':'),
            _ => false,
        }
    }
}
