// kons-core - Runtime and evaluator for the Kons language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # kons-core
//!
//! Runtime and evaluator for the Kons language.
//! Provides an AST-walking interpreter for `KonsVal` expressions read by
//! `kons-reader`.

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;

use std::io::Write;
use std::sync::Arc;

pub use builtins::{EnvExt, register_builtins};
pub use env::Env;
pub use error::{AritySpec, Error, Result};
pub use eval::{
    DEFAULT_MAX_EVAL_DEPTH, SpecialForm, apply, eval, eval_stack_size, get_eval_depth,
    get_max_eval_depth, macroexpand_1, make_native_fn, make_native_fn_with_env,
    set_max_eval_depth,
};

// Re-export reader types for convenience
pub use kons_reader::{KonsVal, Symbol, SymbolTable};

/// Embedded prelude source (macros and utility functions).
const CORE_STDLIB: &str = include_str!("../../kons-std/core.lisp");

/// Create a root environment with every primitive registered.
///
/// `prn` writes to standard output.
pub fn create_root_environment(symbols: Arc<SymbolTable>) -> Env {
    let env = Env::new(symbols);
    register_builtins(&env);
    env
}

/// Create a root environment whose `prn` writes to `output`.
pub fn create_root_environment_with_output(
    symbols: Arc<SymbolTable>,
    output: Box<dyn Write>,
) -> Env {
    let env = Env::with_output(symbols, output);
    register_builtins(&env);
    env
}

/// Load the prelude by evaluating it form by form.
///
/// Call this after `register_builtins`.
pub fn init_stdlib(env: &Env) -> Result<()> {
    let mut parser = kons_reader::Parser::new(CORE_STDLIB, env.symbols());
    while let Some(expr) = parser.parse()? {
        let val = eval(&expr, env)?;
        tracing::trace!(%val, "loaded prelude form");
    }
    Ok(())
}

/// Read every form in `source` and evaluate them in order.
///
/// Returns the value of the last form, or `nil` when there are none.
pub fn eval_str(source: &str, env: &Env) -> Result<KonsVal> {
    let mut parser = kons_reader::Parser::new(source, env.symbols());
    let mut result = KonsVal::Nil;
    while let Some(expr) = parser.parse()? {
        result = eval(&expr, env)?;
    }
    Ok(result)
}
