// kons-core - Macro integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for defmacro, macro expansion and macroexpand.

mod common;

use common::*;

#[test]
fn test_backquote_macro() {
    let result = eval_str(
        "(defmacro unless (test & body) `(cond ,test nil t (do ,@body)))
         (unless nil 1 2 3)",
    )
    .unwrap();
    assert_eq!(result, KonsVal::int(3));
}

#[test]
fn test_macro_expansion_evaluated_in_caller_scope() {
    let result = eval_str(
        "(defmacro get-x () 'x)
         ((lambda (x) (get-x)) 42)",
    )
    .unwrap();
    assert_eq!(result, KonsVal::int(42));
}

#[test]
fn test_macro_defined_inside_function_is_global() {
    let result = eval_str(
        "(def setup (lambda () (defmacro one () 1)))
         (setup)
         (one)",
    )
    .unwrap();
    assert_eq!(result, KonsVal::int(1));
}

#[test]
fn test_macro_arity() {
    assert_eval_err!("(defmacro m (a b) a) (m 1)", Error::ArityError { .. });
}

#[test]
fn test_recursive_macro() {
    let result = eval_str(
        "(defmacro my-and (& xs)
           (cond (= xs nil) t
                 (= (cdr xs) nil) (car xs)
                 t `(cond ,(car xs) (my-and ,@(cdr xs)) t nil)))
         (list (my-and) (my-and 1 2) (my-and 1 nil 3))",
    )
    .unwrap();
    assert_eq!(result.to_string(), "(true 2 nil)");
}

#[test]
fn test_macroexpand_one_step() {
    let env = new_env();
    eval_str_with_env(
        "(defmacro inc (x) `(+ ,x 1))
         (defmacro inc2 (x) `(inc (inc ,x)))",
        &env,
    )
    .unwrap();
    assert_eq!(
        eval_str_with_env("(macroexpand '(inc2 y))", &env).unwrap().to_string(),
        "(inc (inc y))"
    );
    assert_eq!(
        eval_str_with_env("(macroexpand '(inc y))", &env).unwrap().to_string(),
        "(+ y 1)"
    );
}

#[test]
fn test_macroexpand_leaves_other_forms_alone() {
    assert_eq!(eval_str("(macroexpand '(+ 1 2))").unwrap().to_string(), "(+ 1 2)");
    assert_eq!(eval_str("(macroexpand '(quote x))").unwrap().to_string(), "(quote x)");
    assert_eq!(eval_str("(macroexpand 'sym)").unwrap().to_string(), "sym");
    assert_eq!(eval_str("(macroexpand '(unbound 1))").unwrap().to_string(), "(unbound 1)");
}
