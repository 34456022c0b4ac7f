//! Lexer for the Sprig language
//!
//! Tokens are produced lazily: [`Lexer`] scans one token per call and the
//! parser consumes them as it goes. [`lex`] collects the whole stream for
//! tooling and tests.

mod tokens;

pub use tokens::{Token, TokenKind};

use crate::common::Span;
use crate::diagnostics::{CompileError, SourceFile};
use logos::Logos;

/// Tokenize a whole source string, ending with an `Eof` token
pub fn lex(source: &str) -> Result<Vec<Token>, CompileError> {
    let file = SourceFile::anonymous(source);
    Lexer::new(&file).collect()
}

/// Forward-only token scanner over one source file
pub struct Lexer<'src> {
    file: &'src SourceFile,
    inner: logos::Lexer<'src, TokenKind>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(file: &'src SourceFile) -> Self {
        Self {
            file,
            inner: TokenKind::lexer(&file.content),
            finished: false,
        }
    }

    /// Scan the next token. Once the input is exhausted this keeps
    /// returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        let Some(result) = self.inner.next() else {
            let end = self.file.content.len();
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span::point(end),
                text: String::new(),
            });
        };

        let span = Span::from(self.inner.span());
        match result {
            Ok(TokenKind::UnterminatedString) => Err(CompileError::UnterminatedString {
                span: Span::new(span.start, span.start + 1).into(),
                src: self.file.to_named_source(),
            }),
            Ok(kind) => Ok(Token {
                kind,
                span,
                text: self.inner.slice().to_string(),
            }),
            Err(()) => Err(CompileError::UnexpectedChar {
                found: self.inner.slice().to_string(),
                span: span.into(),
                src: self.file.to_named_source(),
            }),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind != TokenKind::Eof => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

/// Decode the body of a quoted string literal, quotes included in `raw`
pub fn unescape(raw: &str) -> String {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
