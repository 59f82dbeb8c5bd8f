// kons-reader - Lexer for Kons
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for Kons source code.
//!
//! Converts a source string into a flat stream of tokens. The lexer does
//! not classify atoms or decode string escapes; both happen in the parser
//! when a token becomes a value.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::parser::{ParseError, ParseErrorKind};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen, // (
    RParen, // )

    // Reader macros
    Quote,         // '
    Backquote,     // `
    Unquote,       // ,
    UnquoteSplice, // ,@

    /// String literal content with escapes still in place
    Str(String),
    /// Any other run of characters: a number, symbol or nil
    Atom(String),

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Quote => write!(f, "'"),
            Token::Backquote => write!(f, "`"),
            Token::Unquote => write!(f, ","),
            Token::UnquoteSplice => write!(f, ",@"),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Atom(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// The lexer converts source code into tokens.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Get the next token from the source.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments();
        self.token_line = self.line;
        self.token_column = self.column;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '(' => {
                self.advance();
                Ok(Token::LParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RParen)
            }
            '\'' => {
                self.advance();
                Ok(Token::Quote)
            }
            '`' => {
                self.advance();
                Ok(Token::Backquote)
            }
            ',' => {
                self.advance();
                if self.peek() == Some('@') {
                    self.advance();
                    Ok(Token::UnquoteSplice)
                } else {
                    Ok(Token::Unquote)
                }
            }
            '"' => self.read_string(),
            _ => Ok(self.read_atom()),
        }
    }

    /// Collect all tokens into a vector.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if matches!(token, Token::Eof) {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get the current line number (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the current column number (1-indexed).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Line and column where the most recent token started.
    pub fn token_position(&self) -> (usize, usize) {
        (self.token_line, self.token_column)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some(';') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_string(&mut self) -> Result<Token, ParseError> {
        self.advance(); // opening quote
        let mut content = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(Token::Str(content)),
                Some('\\') => {
                    content.push('\\');
                    match self.advance() {
                        Some(c) => content.push(c),
                        None => break,
                    }
                }
                Some(c) => content.push(c),
                None => break,
            }
        }
        Err(ParseError::new(
            ParseErrorKind::UnterminatedString,
            self.token_line,
            self.token_column,
        ))
    }

    fn read_atom(&mut self) -> Token {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if ends_atom(c) {
                break;
            }
            s.push(c);
            self.advance();
        }
        Token::Atom(s)
    }
}

fn ends_atom(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '`' | ',' | '"' | ';')
}

// ============================================================================
// Tests
// ============================================================================
