// kons-core - Error types for the Kons evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for Kons evaluation.

use std::fmt;

use kons_reader::{ParseError, Symbol};
use thiserror::Error;

/// Result type for Kons evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during reading or evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Symbol not bound in any enclosing scope
    #[error("Unable to resolve symbol: {0}")]
    UnboundSymbol(Symbol),

    /// Wrong number of arguments to a function
    #[error("Wrong number of arguments{}: expected {expected}, got {got}", fn_label(.name))]
    ArityError {
        expected: AritySpec,
        got: usize,
        name: Option<String>,
    },

    /// Type error - wrong type for an operation
    #[error("{}: expected {expected}, got {got}", context_label(.context))]
    TypeError {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },

    /// Attempted to call something that isn't callable
    #[error("Cannot call value: {0}")]
    NotCallable(String),

    #[error("Division by zero")]
    DivisionByZero,

    /// Malformed special form
    #[error("Invalid '{form}' syntax: {message}")]
    InvalidSyntax { form: &'static str, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation nested deeper than the configured limit
    #[error("Maximum evaluation depth ({0}) exceeded")]
    DepthExceeded(usize),

    /// Failure writing to the output sink or reading a source file
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error - invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

fn fn_label(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" to '{}'", name),
        None => String::new(),
    }
}

fn context_label(context: &Option<String>) -> &str {
    context.as_deref().unwrap_or("Type error")
}

/// Specification for expected arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl Error {
    /// Create an arity error for exact arity.
    pub fn arity(expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Exact(expected),
            got,
            name: None,
        }
    }

    /// Create an arity error for exact arity with function name.
    pub fn arity_named(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Exact(expected),
            got,
            name: Some(name.into()),
        }
    }

    /// Create an arity error for minimum arity.
    pub fn arity_at_least(expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::AtLeast(expected),
            got,
            name: None,
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::TypeError {
            expected,
            got,
            context: None,
        }
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::TypeError {
            expected,
            got,
            context: Some(context.into()),
        }
    }

    /// Create an invalid syntax error.
    pub fn syntax(form: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidSyntax {
            form,
            message: message.into(),
        }
    }
}
