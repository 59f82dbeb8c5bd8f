// kons-core - AST-walking evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! AST-walking evaluator for Kons expressions.

pub mod apply;
pub mod special_forms;

pub use apply::{NativeFnImpl, apply, make_native_fn, make_native_fn_with_env};
pub use special_forms::SpecialForm;

use std::cell::Cell;

use kons_reader::{Cons, KonsVal};

use crate::env::Env;
use crate::error::{Error, Result};

use apply::apply_fn;

// ============================================================================
// Stack Overflow Protection
// ============================================================================

/// Maximum recursion depth for eval. Can be configured via `set_max_eval_depth`.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

/// Host stack reserved per level of eval depth, with room for debug builds.
const STACK_BYTES_PER_EVAL: usize = 16 * 1024;

/// Host stack reserved for the caller, the reader and native functions.
const BASE_STACK_BYTES: usize = 8 * 1024 * 1024;

/// Stack size for a thread that evaluates with the given depth limit.
///
/// The depth guard reports `DepthExceeded` only if the host stack outlasts
/// the limit. A default thread stack does not hold [`DEFAULT_MAX_EVAL_DEPTH`]
/// levels, so interpreter threads are spawned with this size.
#[must_use]
pub fn eval_stack_size(max_depth: usize) -> usize {
    max_depth
        .saturating_mul(STACK_BYTES_PER_EVAL)
        .saturating_add(BASE_STACK_BYTES)
}

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_EVAL_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_EVAL_DEPTH) };
}

/// Set the maximum eval recursion depth. Returns the previous value.
#[inline]
pub fn set_max_eval_depth(depth: usize) -> usize {
    MAX_EVAL_DEPTH.with(|d| d.replace(depth))
}

/// Get the current maximum eval recursion depth.
#[inline]
#[must_use]
pub fn get_max_eval_depth() -> usize {
    MAX_EVAL_DEPTH.with(|d| d.get())
}

/// Get the current eval recursion depth.
#[inline]
#[must_use]
pub fn get_eval_depth() -> usize {
    EVAL_DEPTH.with(|d| d.get())
}

/// RAII guard to manage eval depth counter.
struct EvalDepthGuard;

impl EvalDepthGuard {
    fn new() -> Result<Self> {
        let (current, max) = EVAL_DEPTH.with(|d| {
            let current = d.get() + 1;
            d.set(current);
            (current, MAX_EVAL_DEPTH.with(|m| m.get()))
        });
        if current > max {
            EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            Err(Error::DepthExceeded(max))
        } else {
            Ok(EvalDepthGuard)
        }
    }
}

impl Drop for EvalDepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate a Kons expression in the given environment.
///
/// Symbols are looked up, lists are special forms or calls, and every other
/// value evaluates to itself.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kons_core::{create_root_environment, eval};
/// use kons_reader::{KonsVal, SymbolTable, read};
///
/// let symbols = Arc::new(SymbolTable::new());
/// let env = create_root_environment(Arc::clone(&symbols));
///
/// let forms = read("(+ 1 (* 2 3))", &symbols).unwrap();
/// assert_eq!(eval(&forms[0], &env).unwrap(), KonsVal::int(7));
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A symbol cannot be resolved
/// - A function is called with wrong arity
/// - Type mismatches occur during operations
/// - Nesting exceeds the depth limit (configurable via [`set_max_eval_depth`])
#[must_use = "eval returns a value that should be used"]
pub fn eval(expr: &KonsVal, env: &Env) -> Result<KonsVal> {
    let _guard = EvalDepthGuard::new()?;

    match expr {
        KonsVal::Symbol(sym) => env.get(sym),
        KonsVal::Cons(cell) => eval_list(cell, env),
        // Self-evaluating forms
        KonsVal::Nil
        | KonsVal::Bool(_)
        | KonsVal::Number(_)
        | KonsVal::Str(_)
        | KonsVal::Fn(_)
        | KonsVal::NativeFn(_) => Ok(expr.clone()),
    }
}

/// Evaluate a list form (special form, macro call or function call).
fn eval_list(cell: &Cons, env: &Env) -> Result<KonsVal> {
    let head = cell.first();
    let args = cell.rest();

    if let KonsVal::Symbol(sym) = head
        && let Some(form) = env.special_form(sym)
    {
        return special_forms::eval_special(form, &args.to_vec(), env);
    }

    let op = eval(head, env)?;

    match &op {
        KonsVal::Fn(f) if f.is_macro() => {
            // Macro call - pass unevaluated args, then eval the result once
            let expanded = apply_fn(f, &args.to_vec())?;
            tracing::trace!(%expanded, "expanded {}", f);
            eval(&expanded, env)
        }
        KonsVal::Fn(_) | KonsVal::NativeFn(_) => {
            let evaluated = args
                .iter()
                .map(|arg| eval(arg, env))
                .collect::<Result<Vec<_>>>()?;
            apply(&op, &evaluated, env)
        }
        other => Err(Error::NotCallable(format!("{}", other))),
    }
}

/// Expand a macro call by one step without evaluating the result.
///
/// Returns `form` unchanged unless it is a list whose operator is a symbol
/// bound to a macro in `env`. Special forms are never expanded.
pub fn macroexpand_1(form: &KonsVal, env: &Env) -> Result<KonsVal> {
    let KonsVal::Cons(cell) = form else {
        return Ok(form.clone());
    };
    let KonsVal::Symbol(sym) = cell.first() else {
        return Ok(form.clone());
    };
    if env.special_form(sym).is_some() {
        return Ok(form.clone());
    }
    match env.get(sym) {
        Ok(KonsVal::Fn(f)) if f.is_macro() => apply_fn(&f, &cell.rest().to_vec()),
        _ => Ok(form.clone()),
    }
}
