// kons-core - Reader integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for reading source text and evaluating what was read.
//!
//! Tests for: atoms, lists, quote, backquote templates, reader errors

mod common;

use common::*;
use kons_reader::{ParseErrorKind, Symbol};

fn read_one(src: &str) -> KonsVal {
    let symbols = SymbolTable::new();
    let mut forms = read(src, &symbols).unwrap();
    assert_eq!(forms.len(), 1, "expected one form in '{}'", src);
    forms.remove(0)
}

fn parse_error_kind(src: &str) -> ParseErrorKind {
    match eval_str(src) {
        Err(Error::Parse(e)) => e.kind,
        other => panic!("expected parse error for '{}', got {:?}", src, other),
    }
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn test_read_prints_back() {
    for src in ["(a b c)", "(1 (2 (3)) \"x\")", "(quote a)", "nil", "foo-bar?"] {
        assert_eq!(read_one(src).to_string(), src);
    }
}

#[test]
fn test_negative_number_prints_as_symbol_text() {
    let printed = eval_str("(- 0 5)").unwrap().to_string();
    assert_eq!(printed, "-5");
    assert!(matches!(read_one(&printed), KonsVal::Symbol(_)));
}

#[test]
fn test_null_reads_as_nil() {
    assert_eq!(read_one("null"), KonsVal::Nil);
    assert_eq!(read_one("()"), KonsVal::Nil);
}

#[test]
fn test_quote_shorthand() {
    assert_eq!(read_one("'x").to_string(), "(quote x)");
    assert_eq!(read_one("'(1 'y)").to_string(), "(quote (1 (quote y)))");
}

#[test]
fn test_symbols_share_one_table() {
    let symbols = SymbolTable::new();
    let forms = read("(a a)", &symbols).unwrap();
    let items = forms[0].to_vec();
    let (Some(a1), Some(a2)) = (items[0].as_symbol(), items[1].as_symbol()) else {
        panic!("expected symbols");
    };
    assert!(Symbol::ptr_eq(a1, a2));
}

// ============================================================================
// Evaluating what was read
// ============================================================================

#[test]
fn test_quote_returns_form_unevaluated() {
    assert_eq!(eval_str("'(+ 1 2)").unwrap().to_string(), "(+ 1 2)");
    assert_eq!(eval_str("(quote undefined)").unwrap().to_string(), "undefined");
}

#[test]
fn test_backquote_splices() {
    let result = eval_str("(def b 1) (def c '(2 3)) `(a ,b ,@c)").unwrap();
    assert_eq!(result.to_string(), "(a 1 2 3)");
}

#[test]
fn test_backquote_without_unquote_is_quote() {
    assert_eq!(eval_str("`(a (b c) \"s\" 1)").unwrap().to_string(), "(a (b c) \"s\" 1)");
    assert_eq!(eval_str("`x").unwrap().to_string(), "x");
}

#[test]
fn test_backquote_nested_lists() {
    let result = eval_str("(def xs '(1 2)) `(outer (inner ,@xs) ,(car xs))").unwrap();
    assert_eq!(result.to_string(), "(outer (inner 1 2) 1)");
}

#[test]
fn test_splice_of_nil_vanishes() {
    assert_eq!(eval_str("`(a ,@nil b)").unwrap().to_string(), "(a b)");
}

#[test]
fn test_splice_of_non_list_is_a_type_error() {
    assert_eval_err!("`(a ,@1 b)", Error::TypeError { .. });
}

#[test]
fn test_quote_inside_backquote() {
    let result = eval_str("(def x 5) `(f ',x)").unwrap();
    assert_eq!(result.to_string(), "(f (quote 5))");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_reader_errors() {
    assert_eq!(parse_error_kind("(a b"), ParseErrorKind::Unclosed);
    assert_eq!(parse_error_kind("1)"), ParseErrorKind::UnmatchedClose);
    assert_eq!(parse_error_kind("'"), ParseErrorKind::MissingQuoteTarget);
    assert_eq!(parse_error_kind("(a ,b)"), ParseErrorKind::UnquoteOutsideBackquote);
    assert_eq!(parse_error_kind("\"abc"), ParseErrorKind::UnterminatedString);
}

#[test]
fn test_forms_before_a_reader_error_are_evaluated() {
    let env = new_env();
    assert!(eval_str_with_env("(def x 1) (", &env).is_err());
    assert_eval_with_env!("x", KonsVal::int(1), &env);
}
