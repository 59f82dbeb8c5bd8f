// kons-reader - Parser for Kons
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Parser for Kons source code.
//!
//! Converts tokens into `KonsVal` forms. Nesting is tracked on an explicit
//! stack of open levels, so deeply nested input does not consume host stack
//! while reading.
//!
//! # Quoting
//!
//! `'x` reads as `(quote x)`. Backquote templates are rewritten into list
//! construction code while they are read:
//!
//! ```text
//! `(a ,b ,@c)   =>   (concat (list (quote a)) (list b) c)
//! ```
//!
//! Only one level of backquote is expanded. An unquote inside a nested
//! backquote is evaluated by the outermost template.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::lexer::{Lexer, Token};
use crate::symbol::{Symbol, SymbolTable};
use crate::value::KonsVal;

/// What went wrong while reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unmatched closing parenthesis")]
    UnmatchedClose,
    #[error("unexpected end of input: unclosed list")]
    Unclosed,
    #[error("quote or unquote is missing the form it applies to")]
    MissingQuoteTarget,
    #[error("unquote outside of a backquote")]
    UnquoteOutsideBackquote,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {line}:{column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        ParseError { kind, line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelKind {
    List,
    Quote,
    Backquote,
    Unquote,
    Splice,
}

/// A form that has been opened but not yet completed.
struct Level {
    kind: LevelKind,
    /// Inside a backquote template and not under an unquote
    quasi: bool,
    items: Vec<KonsVal>,
    line: usize,
    column: usize,
}

/// A completed form on its way up to the enclosing level.
enum Folded {
    Plain(KonsVal),
    Unquoted(KonsVal),
    Spliced(KonsVal),
}

impl Folded {
    fn into_inner(self) -> KonsVal {
        match self {
            Folded::Plain(v) | Folded::Unquoted(v) | Folded::Spliced(v) => v,
        }
    }
}

/// The parser converts tokens into `KonsVal` forms.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    symbols: &'a SymbolTable,
    sym_quote: Symbol,
    sym_list: Symbol,
    sym_concat: Symbol,
}

impl<'a> Parser<'a> {
    /// Create a new parser interning into `symbols`.
    pub fn new(source: &'a str, symbols: &'a SymbolTable) -> Self {
        Parser {
            lexer: Lexer::new(source),
            symbols,
            sym_quote: symbols.intern("quote"),
            sym_list: symbols.intern("list"),
            sym_concat: symbols.intern("concat"),
        }
    }

    /// Parse the next top-level form.
    /// Returns None if at end of input.
    pub fn parse(&mut self) -> Result<Option<KonsVal>, ParseError> {
        let mut stack: Vec<Level> = Vec::new();

        loop {
            let token = self.lexer.next_token()?;
            let (line, column) = self.lexer.token_position();
            let quasi = stack.last().is_some_and(|level| level.quasi);

            let value = match token {
                Token::Eof => match stack.last() {
                    None => return Ok(None),
                    Some(level) if level.kind == LevelKind::List => {
                        return Err(ParseError::new(
                            ParseErrorKind::Unclosed,
                            level.line,
                            level.column,
                        ));
                    }
                    Some(_) => {
                        return Err(ParseError::new(
                            ParseErrorKind::MissingQuoteTarget,
                            line,
                            column,
                        ));
                    }
                },
                Token::LParen => {
                    stack.push(Level::open(LevelKind::List, quasi, line, column));
                    continue;
                }
                Token::Quote => {
                    stack.push(Level::open(LevelKind::Quote, quasi, line, column));
                    continue;
                }
                Token::Backquote => {
                    stack.push(Level::open(LevelKind::Backquote, true, line, column));
                    continue;
                }
                Token::Unquote | Token::UnquoteSplice => {
                    if !quasi {
                        return Err(ParseError::new(
                            ParseErrorKind::UnquoteOutsideBackquote,
                            line,
                            column,
                        ));
                    }
                    let kind = if token == Token::Unquote {
                        LevelKind::Unquote
                    } else {
                        LevelKind::Splice
                    };
                    stack.push(Level::open(kind, false, line, column));
                    continue;
                }
                Token::RParen => match stack.pop() {
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnmatchedClose,
                            line,
                            column,
                        ));
                    }
                    Some(level) if level.kind != LevelKind::List => {
                        return Err(ParseError::new(
                            ParseErrorKind::MissingQuoteTarget,
                            line,
                            column,
                        ));
                    }
                    Some(level) => Folded::Plain(self.close_list(level)),
                },
                Token::Str(raw) => Folded::Plain(self.template_atom(KonsVal::string(unescape(&raw)), quasi)),
                Token::Atom(text) => {
                    let atom = self.atom(&text, line, column)?;
                    Folded::Plain(self.template_atom(atom, quasi))
                }
            };

            if let Some(form) = self.fold(&mut stack, value) {
                return Ok(Some(form));
            }
        }
    }

    /// Parse all forms from the source.
    pub fn parse_all(&mut self) -> Result<Vec<KonsVal>, ParseError> {
        let mut forms = Vec::new();
        while let Some(form) = self.parse()? {
            forms.push(form);
        }
        Ok(forms)
    }

    // ========================================================================
    // Internal parsing methods
    // ========================================================================

    /// Carry a completed value up through finished one-shot levels.
    /// Returns the form once it completes a top-level form.
    fn fold(&self, stack: &mut Vec<Level>, mut value: Folded) -> Option<KonsVal> {
        loop {
            let Some(top) = stack.last_mut() else {
                return Some(value.into_inner());
            };
            if top.kind == LevelKind::List {
                let item = if top.quasi {
                    self.template_element(value)
                } else {
                    value.into_inner()
                };
                top.items.push(item);
                return None;
            }

            let Some(level) = stack.pop() else {
                return Some(value.into_inner());
            };
            value = match level.kind {
                LevelKind::Quote if level.quasi => {
                    // 'x inside a template is the template (quote x)
                    let head = self.list_of(self.quoted(KonsVal::symbol(self.sym_quote.clone())));
                    Folded::Plain(self.call(&self.sym_concat, vec![head, self.template_element(value)]))
                }
                LevelKind::Quote => Folded::Plain(self.quoted(value.into_inner())),
                LevelKind::Backquote => Folded::Plain(value.into_inner()),
                LevelKind::Unquote => Folded::Unquoted(value.into_inner()),
                LevelKind::Splice => Folded::Spliced(value.into_inner()),
                LevelKind::List => unreachable!("list levels are closed by `)`"),
            };
        }
    }

    fn close_list(&self, level: Level) -> KonsVal {
        if level.quasi {
            self.call(&self.sym_concat, level.items)
        } else {
            KonsVal::list(level.items)
        }
    }

    /// The piece of a `concat` call contributed by one template element.
    fn template_element(&self, value: Folded) -> KonsVal {
        match value {
            Folded::Plain(x) | Folded::Unquoted(x) => self.list_of(x),
            Folded::Spliced(x) => x,
        }
    }

    fn template_atom(&self, atom: KonsVal, quasi: bool) -> KonsVal {
        if quasi { self.quoted(atom) } else { atom }
    }

    fn quoted(&self, form: KonsVal) -> KonsVal {
        self.call(&self.sym_quote, vec![form])
    }

    fn list_of(&self, form: KonsVal) -> KonsVal {
        self.call(&self.sym_list, vec![form])
    }

    fn call(&self, op: &Symbol, args: Vec<KonsVal>) -> KonsVal {
        KonsVal::cons(KonsVal::symbol(op.clone()), KonsVal::list(args))
    }

    fn atom(&self, text: &str, line: usize, column: usize) -> Result<KonsVal, ParseError> {
        if text.starts_with(|c: char| c.is_ascii_digit()) {
            return BigDecimal::from_str(text).map(KonsVal::Number).map_err(|_| {
                ParseError::new(ParseErrorKind::InvalidNumber(text.to_string()), line, column)
            });
        }
        match text {
            "nil" | "null" => Ok(KonsVal::Nil),
            _ => Ok(KonsVal::symbol(self.symbols.intern(text))),
        }
    }
}

impl Level {
    fn open(kind: LevelKind, quasi: bool, line: usize, column: usize) -> Self {
        Level {
            kind,
            quasi,
            items: Vec::new(),
            line,
            column,
        }
    }
}

/// Decode the escapes of a raw string token.
fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => {}
        }
    }
    result
}

/// Read every form in `source`.
///
/// # Examples
///
/// ```
/// use kons_reader::{SymbolTable, read};
///
/// let symbols = SymbolTable::new();
/// let forms = read("(+ 1 2) 'x", &symbols).unwrap();
/// assert_eq!(forms.len(), 2);
/// assert_eq!(forms[1].to_string(), "(quote x)");
/// ```
pub fn read(source: &str, symbols: &SymbolTable) -> Result<Vec<KonsVal>, ParseError> {
    Parser::new(source, symbols).parse_all()
}

// ============================================================================
// Tests
// ============================================================================
