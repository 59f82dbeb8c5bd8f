// kons-reader - Data model and reader for the Kons programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # kons-reader
//!
//! Symbols, cons cells and the reader for the Kons programming language.
//! Produces `KonsVal` forms from source code strings.

pub mod cons;
pub mod lexer;
pub mod parser;
pub mod symbol;
pub mod value;

pub use bigdecimal::BigDecimal;
pub use cons::{Cons, ListIter, NotAList, concat};
pub use lexer::{Lexer, Token};
pub use parser::{ParseError, ParseErrorKind, Parser, read};
pub use symbol::{Symbol, SymbolTable};
pub use value::{FnKind, KonsFn, KonsNativeFn, KonsVal};
