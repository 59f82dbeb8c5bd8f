// kons-core - Special forms integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for Kons special forms.
//!
//! Tests for: quote, def, lambda, defmacro, cond, do

mod common;

use common::*;

// ============================================================================
// quote
// ============================================================================

#[test]
fn test_quote() {
    assert_eval!("(quote 1)", KonsVal::int(1));
    assert_eval!("(quote nil)", KonsVal::Nil);
    assert_eq!(eval_str("(quote (a (b)))").unwrap().to_string(), "(a (b))");
}

#[test]
fn test_quote_arity() {
    assert_eval_err!("(quote a b)", Error::InvalidSyntax { form: "quote", .. });
    assert_eval_err!("(quote)", Error::InvalidSyntax { form: "quote", .. });
}

// ============================================================================
// def
// ============================================================================

#[test]
fn test_def_binds_and_returns() {
    let env = new_env();
    assert_eval_with_env!("(def x (+ 1 2))", KonsVal::int(3), &env);
    assert_eval_with_env!("x", KonsVal::int(3), &env);
    assert_eval_with_env!("(def x 4)", KonsVal::int(4), &env);
    assert_eval_with_env!("x", KonsVal::int(4), &env);
}

#[test]
fn test_def_inside_function_binds_globally() {
    let env = new_env();
    eval_str_with_env("(def f (lambda () ((lambda (y) (def g y)) 7)))", &env).unwrap();
    eval_str_with_env("(f)", &env).unwrap();
    assert_eval_with_env!("g", KonsVal::int(7), &env);
}

#[test]
fn test_def_does_not_touch_local_shadow() {
    let env = new_env();
    let result = eval_str_with_env(
        "(def x 1)
         ((lambda (x) (def x 2) x) 10)",
        &env,
    )
    .unwrap();
    assert_eq!(result, KonsVal::int(10));
    assert_eval_with_env!("x", KonsVal::int(2), &env);
}

#[test]
fn test_def_syntax_errors() {
    assert_eval_err!("(def)", Error::InvalidSyntax { form: "def", .. });
    assert_eval_err!("(def \"x\" 1)", Error::InvalidSyntax { form: "def", .. });
}

// ============================================================================
// lambda
// ============================================================================

#[test]
fn test_lambda_call() {
    assert_eval!("((lambda (a b) (+ a b)) 1 2)", KonsVal::int(3));
    assert_eval!("((lambda () 42))", KonsVal::int(42));
}

#[test]
fn test_lambda_rest_param() {
    assert_eq!(
        eval_str("((lambda (a & rest) rest) 1 2 3)").unwrap().to_string(),
        "(2 3)"
    );
    assert_eval!("((lambda (a & rest) rest) 1)", KonsVal::Nil);
}

#[test]
fn test_lambda_body_is_implicit_do() {
    assert_eval!("((lambda () 1 2 3))", KonsVal::int(3));
}

#[test]
fn test_lambda_is_a_value() {
    assert_eq!(eval_str("(lambda (x) x)").unwrap().to_string(), "#<fn>");
}

// ============================================================================
// defmacro
// ============================================================================

#[test]
fn test_defmacro_quote_like() {
    let result = eval_str("(defmacro m (x) (list 'quote x)) (m (+ 1 2))").unwrap();
    assert_eq!(result.to_string(), "(+ 1 2)");
}

#[test]
fn test_macro_receives_unevaluated_args() {
    assert_eval!(
        "(defmacro ignore (x) nil) (ignore (undefined-function 1))",
        KonsVal::Nil
    );
}

// ============================================================================
// cond
// ============================================================================

#[test]
fn test_cond_flat() {
    let env = new_env();
    eval_str_with_env(
        "(def classify (lambda (x)
           (cond (eq? x 'a) \"foo\"
                 (eq? x 'b) \"bar\"
                 t \"oops\")))",
        &env,
    )
    .unwrap();
    assert_eval_with_env!("(classify 'a)", KonsVal::string("foo"), &env);
    assert_eval_with_env!("(classify 'b)", KonsVal::string("bar"), &env);
    assert_eval_with_env!("(classify \"nop\")", KonsVal::string("oops"), &env);
}

#[test]
fn test_cond_clauses() {
    assert_eval!("(cond ((= 1 2) 'no) ((= 1 1) 3))", KonsVal::int(3));
}

#[test]
fn test_cond_nil_result() {
    assert_eval!("(cond t nil)", KonsVal::Nil);
    assert_eval!("(cond nil 1)", KonsVal::Nil);
}

#[test]
fn test_cond_clause_of_wrong_length_is_an_error() {
    assert_eval_err!("(cond (nil 1) (t 2 3))", Error::InvalidSyntax { form: "cond", .. });
    assert_eval_err!("(cond ((= 1 1)))", Error::InvalidSyntax { form: "cond", .. });
}

#[test]
fn test_cond_reads_list_only_arguments_as_clauses() {
    let env = new_env();
    eval_str_with_env("(def x 5)", &env).unwrap();
    // Clause (car nil): the test is the car function itself, so nil is returned.
    assert_eval_with_env!("(cond (car nil) (car x))", KonsVal::Nil, &env);
    // One atom argument switches to flat pairs.
    assert_eval_with_env!("(cond (= x 4) (car nil) t x)", KonsVal::int(5), &env);
}

#[test]
fn test_cond_without_clauses_is_an_error() {
    assert_eval_err!("(cond)", Error::InvalidSyntax { form: "cond", .. });
}

// ============================================================================
// do
// ============================================================================

#[test]
fn test_do() {
    assert_eval!("(do)", KonsVal::Nil);
    assert_eval!("(do (def a 1) (+ a 1))", KonsVal::int(2));
}
