//! Lexer for script and declarative source.
//!
//! The lexer converts source text into a stream of tokens. Comments and
//! whitespace are skipped, but a line break before a token is recorded on the
//! token so the grammar can apply automatic semicolon insertion.

use crate::span::Span;
use crate::token::{PUNCTUATION_OPERATORS, Token, TokenKind};

/// Lexer for script and declarative source code.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Whether a `/` at this point starts a regular expression.
    regexp_allowed: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
            regexp_allowed: true,
        }
    }

    /// Returns the source text being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the next token from the source.
    ///
    /// After the end of input every call returns an [`TokenKind::Eof`] token.
    pub fn next_token(&mut self) -> Token {
        let newline_before = match self.skip_trivia() {
            Ok(newline) => newline,
            Err(message) => {
                let span = Span::new(self.position, self.position, self.line, self.column);
                return Token::new(TokenKind::Error(message), span, false);
            }
        };

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.scan(c),
        };

        if kind != TokenKind::Eof {
            self.regexp_allowed = kind.allows_regexp_after();
        }

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
            newline_before,
        )
    }

    /// Tokenizes all source and returns a vector of tokens ending in `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = matches!(token.kind, TokenKind::Eof | TokenKind::Error(_));
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Dispatches on the first character of a token.
    fn scan(&mut self, c: char) -> TokenKind {
        match c {
            '"' | '\'' => self.scan_string(c),
            '.' if self.peek_char_n(1).is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            '[' | ']' | '{' | '}' | '(' | ')' | ',' | ';' | ':' | '.' => {
                self.advance();
                TokenKind::Punc(c)
            }
            '/' if self.regexp_allowed => self.scan_regexp(),
            c if is_identifier_start(c) => self.scan_word(),
            _ => self.scan_operator(c),
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace and comments, reporting whether a newline was crossed.
    fn skip_trivia(&mut self) -> Result<bool, String> {
        let mut newline = false;
        loop {
            match self.peek_char() {
                Some('\n') => {
                    newline = true;
                    self.advance();
                }
                Some(c) if c.is_whitespace() || c == '\u{feff}' => self.advance(),
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek_char() {
                            Some('*') if self.peek_char_n(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(c) => {
                                newline |= c == '\n';
                                self.advance();
                            }
                            None => return Err("Unterminated multiline comment".into()),
                        }
                    }
                }
                _ => return Ok(newline),
            }
        }
    }

    /// Scans a string literal delimited by `quote`.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    self.advance();
                    return TokenKind::String(text);
                }
                Some('\\') => {
                    self.advance();
                    match self.scan_escape() {
                        Ok(Some(c)) => text.push(c),
                        Ok(None) => {}
                        Err(message) => return TokenKind::Error(message),
                    }
                }
                Some('\n') | None => return TokenKind::Error("Unterminated string constant".into()),
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    /// Scans the character after a backslash. Line continuations yield `None`.
    fn scan_escape(&mut self) -> Result<Option<char>, String> {
        let Some(c) = self.peek_char() else {
            return Err("Unterminated string constant".into());
        };
        self.advance();
        let decoded = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'x' => self.scan_hex_escape(2)?,
            'u' => self.scan_hex_escape(4)?,
            '\n' => return Ok(None),
            other => other,
        };
        Ok(Some(decoded))
    }

    /// Reads `digits` hex digits and returns the encoded character.
    fn scan_hex_escape(&mut self, digits: usize) -> Result<char, String> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .peek_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| "Invalid hex-character pattern in string".to_string())?;
            value = value * 16 + digit;
            self.advance();
        }
        Ok(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Scans a number: decimal with optional fraction and exponent, or hex.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;

        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = &self.source[start + 2..self.position];
            #[allow(clippy::cast_precision_loss)]
            return match u64::from_str_radix(digits, 16) {
                Ok(n) => TokenKind::Num(n as f64),
                Err(_) => TokenKind::Error(format!("Invalid syntax: {}", &self.source[start..self.position])),
            };
        }

        let mut has_dot = false;
        let mut has_exponent = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_dot && !has_exponent {
                has_dot = true;
                self.advance();
            } else if matches!(c, 'e' | 'E') && !has_exponent {
                has_exponent = true;
                self.advance();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
            } else {
                break;
            }
        }

        if self.peek_char().is_some_and(is_identifier_start) {
            self.advance();
            return TokenKind::Error(format!(
                "Invalid syntax: {}",
                &self.source[start..self.position]
            ));
        }

        let text = &self.source[start..self.position];
        match text.parse::<f64>() {
            Ok(n) => TokenKind::Num(n),
            Err(e) => TokenKind::Error(format!("Invalid syntax: {text} ({e})")),
        }
    }

    /// Scans a regular expression literal.
    fn scan_regexp(&mut self) -> TokenKind {
        self.advance(); // opening '/'
        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return TokenKind::Error("Unterminated regular expression".into());
                }
                Some('\\') => {
                    pattern.push('\\');
                    self.advance();
                    match self.peek_char() {
                        Some(c) if c != '\n' => {
                            pattern.push(c);
                            self.advance();
                        }
                        _ => return TokenKind::Error("Unterminated regular expression".into()),
                    }
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    match c {
                        '[' => in_class = true,
                        ']' => in_class = false,
                        _ => {}
                    }
                    pattern.push(c);
                    self.advance();
                }
            }
        }
        let flags = self.scan_word_text();
        TokenKind::Regexp { pattern, flags }
    }

    /// Scans an identifier, keyword, word operator or atom.
    fn scan_word(&mut self) -> TokenKind {
        let word = self.scan_word_text();
        TokenKind::from_word(&word)
    }

    /// Scans identifier characters.
    fn scan_word_text(&mut self) -> String {
        let start = self.position;
        while self.peek_char().is_some_and(is_identifier_char) {
            self.advance();
        }
        self.source[start..self.position].to_string()
    }

    /// Scans the longest punctuation operator at the current position.
    fn scan_operator(&mut self, c: char) -> TokenKind {
        match PUNCTUATION_OPERATORS
            .iter()
            .copied()
            .find(|op| self.rest.starts_with(op))
        {
            Some(op) => {
                for _ in 0..op.len() {
                    self.advance();
                }
                TokenKind::Operator(op)
            }
            None => {
                self.advance();
                TokenKind::Error(format!("Unexpected character '{c}'"))
            }
        }
    }
}

/// Returns true if `c` can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` can appear in an identifier (not at start).
fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || c == '\u{200c}' || c == '\u{200d}'
}
