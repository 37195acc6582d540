// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for Go source text.
// Converts source code into a stream of tokens for parsing.
//
// Supports:
// - The 25 Go keywords, identifiers (including Unicode letters)
// - Integer, float, imaginary, rune, string and raw string literals, kept verbatim
// - Every Go operator, matched longest-first
// - Punctuation: ( ) [ ] { } , ; . :
// - Line and block comments
// - Automatic semicolon insertion at line ends, as the Go grammar requires

use crate::errors::{SourceLocation, SyntaxError};
use std::iter::Peekable;
use std::str::Chars;

const KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

// Longest operators first so that prefix matching picks the longest token.
const OPERATORS: [&str; 38] = [
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=",
    "<=", ">=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<",
    ">>", "&^", "+", "-", "*", "/", "%", "&", "|", "^", "<", ">", "=", "!",
    "~",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Imaginary,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    /// Literal with its verbatim source text
    Literal(LiteralKind, String),
    Keyword(String),
    Operator(String),
    Punctuation(char),
    Eof,
}

impl TokenKind {
    /// Short human-readable form used in syntax error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier `{}`", name),
            TokenKind::Literal(_, text) => format!("literal {}", text),
            TokenKind::Keyword(k) => format!("keyword `{}`", k),
            TokenKind::Operator(op) => format!("`{}`", op),
            TokenKind::Punctuation(';') => "newline or `;`".to_string(),
            TokenKind::Punctuation(c) => format!("`{}`", c),
            TokenKind::Eof => "end of file".to_string(),
        }
    }

    /// Whether a newline directly after this token terminates the statement
    fn ends_statement(&self) -> bool {
        match self {
            TokenKind::Identifier(_) | TokenKind::Literal(..) => true,
            TokenKind::Keyword(k) => {
                matches!(k.as_str(), "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Operator(op) => matches!(op.as_str(), "++" | "--"),
            TokenKind::Punctuation(c) => matches!(c, ')' | ']' | '}'),
            TokenKind::Eof => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenizes Go source code into a vector of tokens.
///
/// Processes the input character by character. Semicolons are inserted
/// where a line ends after a token that may end a statement, so the parser
/// only ever sees explicit `;` separators.
///
/// # Arguments
/// * `source` - The Go source code as a string
///
/// # Returns
/// The tokens, always terminated by an `Eof` token, or the first lexical error
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        col: 1,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.col);
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\n' => {
                    self.insert_semicolon(line, column);
                    self.bump();
                }
                '/' if self.peek_second() == Some('/') => {
                    while let Some(&ch) = self.chars.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                '/' if self.peek_second() == Some('*') => {
                    self.block_comment(line, column)?;
                }
                '"' => {
                    let text = self.quoted('"', line, column)?;
                    self.push(TokenKind::Literal(LiteralKind::String, text), line, column);
                }
                '\'' => {
                    let text = self.quoted('\'', line, column)?;
                    self.push(TokenKind::Literal(LiteralKind::Char, text), line, column);
                }
                '`' => {
                    let text = self.raw_string(line, column)?;
                    self.push(TokenKind::Literal(LiteralKind::String, text), line, column);
                }
                '0'..='9' => {
                    let (kind, text) = self.number();
                    self.push(TokenKind::Literal(kind, text), line, column);
                }
                '.' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                    let (kind, text) = self.number();
                    self.push(TokenKind::Literal(kind, text), line, column);
                }
                c if c == '_' || c.is_alphabetic() => {
                    let mut ident = String::new();
                    while let Some(&ch) = self.chars.peek() {
                        if ch == '_' || ch.is_alphanumeric() {
                            ident.push(ch);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                    let kind = if KEYWORDS.contains(&ident.as_str()) {
                        TokenKind::Keyword(ident)
                    } else {
                        TokenKind::Identifier(ident)
                    };
                    self.push(kind, line, column);
                }
                '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' => {
                    self.bump();
                    self.push(TokenKind::Punctuation(c), line, column);
                }
                '.' | ':' => {
                    if let Some(op) = self.operator() {
                        self.push(TokenKind::Operator(op), line, column);
                    } else {
                        self.bump();
                        self.push(TokenKind::Punctuation(c), line, column);
                    }
                }
                _ => match self.operator() {
                    Some(op) => self.push(TokenKind::Operator(op), line, column),
                    None => {
                        return Err(SyntaxError::new(
                            format!("unexpected character `{}`", c),
                            SourceLocation::new(line, column),
                        ));
                    }
                },
            }
        }

        let (line, column) = (self.line, self.col);
        self.insert_semicolon(line, column);
        self.push(TokenKind::Eof, line, column);
        Ok(())
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    fn insert_semicolon(&mut self, line: usize, column: usize) {
        if self.tokens.last().is_some_and(|t| t.kind.ends_statement()) {
            self.push(TokenKind::Punctuation(';'), line, column);
        }
    }

    fn block_comment(&mut self, line: usize, column: usize) -> Result<(), SyntaxError> {
        self.bump();
        self.bump();
        let mut spans_lines = false;
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    break;
                }
                Some('\n') => spans_lines = true,
                Some(_) => {}
                None => {
                    return Err(SyntaxError::new(
                        "comment not terminated",
                        SourceLocation::new(line, column),
                    ));
                }
            }
        }
        // A multi-line comment acts like a newline
        if spans_lines {
            self.insert_semicolon(line, column);
        }
        Ok(())
    }

    /// Interpreted string or rune literal, returned with quotes and escapes intact
    fn quoted(&mut self, quote: char, line: usize, column: usize) -> Result<String, SyntaxError> {
        let mut text = String::new();
        text.extend(self.bump());
        loop {
            match self.chars.peek().copied() {
                Some(ch) if ch == quote => {
                    text.extend(self.bump());
                    return Ok(text);
                }
                Some('\\') => {
                    text.extend(self.bump());
                    match self.chars.peek() {
                        Some('\n') | None => break,
                        Some(_) => text.extend(self.bump()),
                    }
                }
                Some('\n') | None => break,
                Some(_) => text.extend(self.bump()),
            }
        }
        let what = if quote == '"' { "string literal" } else { "rune literal" };
        Err(SyntaxError::new(
            format!("{} not terminated", what),
            SourceLocation::new(line, column),
        ))
    }

    fn raw_string(&mut self, line: usize, column: usize) -> Result<String, SyntaxError> {
        let mut text = String::new();
        text.extend(self.bump());
        while let Some(ch) = self.bump() {
            text.push(ch);
            if ch == '`' {
                return Ok(text);
            }
        }
        Err(SyntaxError::new(
            "raw string literal not terminated",
            SourceLocation::new(line, column),
        ))
    }

    fn number(&mut self) -> (LiteralKind, String) {
        let mut text = String::new();
        let mut kind = LiteralKind::Int;

        let prefixed = self.chars.peek() == Some(&'0')
            && matches!(self.peek_second(), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'));
        let hex = prefixed && matches!(self.peek_second(), Some('x' | 'X'));
        if prefixed {
            text.extend(self.bump());
            text.extend(self.bump());
        }

        while let Some(&ch) = self.chars.peek() {
            let accepted = match ch {
                '0'..='9' | '_' => true,
                'a'..='f' | 'A'..='F' if hex => true,
                '.' if !prefixed || hex => {
                    kind = LiteralKind::Float;
                    true
                }
                'e' | 'E' if !hex => {
                    kind = LiteralKind::Float;
                    text.extend(self.bump());
                    if matches!(self.chars.peek(), Some('+' | '-')) {
                        text.extend(self.bump());
                    }
                    continue;
                }
                'p' | 'P' if hex => {
                    kind = LiteralKind::Float;
                    text.extend(self.bump());
                    if matches!(self.chars.peek(), Some('+' | '-')) {
                        text.extend(self.bump());
                    }
                    continue;
                }
                _ => false,
            };
            if !accepted {
                break;
            }
            text.extend(self.bump());
        }

        if self.chars.peek() == Some(&'i') {
            text.extend(self.bump());
            kind = LiteralKind::Imaginary;
        }
        (kind, text)
    }

    fn operator(&mut self) -> Option<String> {
        let ahead: String = self.chars.clone().take(3).collect();
        let op = OPERATORS.iter().find(|op| ahead.starts_with(**op))?;
        for _ in 0..op.chars().count() {
            self.bump();
        }
        Some(op.to_string())
    }
}
