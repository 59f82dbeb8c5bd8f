// kons-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers and utilities for Kons integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`eval_str`] - Evaluate code in a fresh environment with builtins
//! - [`eval_str_with_env`] - Evaluate code in an existing environment
//! - [`eval_str_with_stdlib`] - Evaluate code with the prelude loaded
//! - [`eval_print`] - Evaluate code with the prelude and print the result
//! - [`new_env`] - Create a new environment with builtins registered
//! - [`new_env_with_stdlib`] - Create a new environment with the prelude
//! - [`new_env_with_output`] - Create an environment whose `prn` is captured
//! - [`on_eval_thread`] - Run a closure on a thread sized for the depth limit
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that code produces an error
//! - [`assert_eval_with_env!`] - Assert evaluation with a shared environment

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::thread;

pub use kons_core::env::Env;
pub use kons_core::eval::eval;
pub use kons_core::{Error, create_root_environment, create_root_environment_with_output, init_stdlib};
#[allow(unused_imports)]
pub use kons_reader::{KonsVal, Parser, SymbolTable, read};

/// Evaluate every form of `s` in a fresh environment, returning the last value.
///
/// The environment has the primitives but not the prelude (use
/// [`eval_str_with_stdlib`] for that).
pub fn eval_str(s: &str) -> Result<KonsVal, Error> {
    eval_str_with_env(s, &new_env())
}

/// Evaluate every form of `s` in the given environment.
pub fn eval_str_with_env(s: &str, env: &Env) -> Result<KonsVal, Error> {
    kons_core::eval_str(s, env)
}

/// Evaluate every form of `s` with the prelude loaded.
pub fn eval_str_with_stdlib(s: &str) -> Result<KonsVal, Error> {
    eval_str_with_env(s, &new_env_with_stdlib())
}

/// Evaluate with the prelude and render the result as the REPL would.
///
/// # Panics
///
/// Panics with the error message if evaluation fails.
pub fn eval_print(s: &str) -> String {
    match eval_str_with_stdlib(s) {
        Ok(val) => val.to_string(),
        Err(e) => panic!("Failed to evaluate '{}': {}", s, e),
    }
}

/// Create a new environment with builtins registered.
pub fn new_env() -> Env {
    create_root_environment(Arc::new(SymbolTable::new()))
}

/// Create a new environment with the prelude loaded.
///
/// # Panics
///
/// Panics if the prelude fails to load.
pub fn new_env_with_stdlib() -> Env {
    let env = new_env();
    init_stdlib(&env).expect("Failed to load prelude");
    env
}

/// In-memory output sink that can be read back after evaluation.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Create an environment with the prelude whose `prn` output is captured.
pub fn new_env_with_output() -> (Env, SharedBuf) {
    let buf = SharedBuf::default();
    let env = create_root_environment_with_output(
        Arc::new(SymbolTable::new()),
        Box::new(buf.clone()),
    );
    init_stdlib(&env).expect("Failed to load prelude");
    (env, buf)
}

/// Run `f` on a thread whose stack holds the default eval depth limit.
///
/// The default test thread stack overflows well before the limit.
pub fn on_eval_thread<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name("kons-eval".to_string())
        .stack_size(kons_core::eval_stack_size(kons_core::DEFAULT_MAX_EVAL_DEPTH))
        .spawn(f)
        .expect("failed to spawn eval thread")
        .join()
        .expect("eval thread panicked")
}

/// Assert that evaluating `input` produces the expected value.
///
/// # Example
///
/// ```ignore
/// assert_eval!("(+ 1 2)", KonsVal::int(3));
/// ```
#[macro_export]
macro_rules! assert_eval {
    ($input:expr, $expected:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

/// Assert that evaluating `input` produces an error.
///
/// With a pattern, the error must also match it.
///
/// # Example
///
/// ```ignore
/// assert_eval_err!("(car 1)");
/// assert_eval_err!("(/ 1 0)", Error::DivisionByZero);
/// ```
#[macro_export]
macro_rules! assert_eval_err {
    ($input:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_err(),
            "Expected error for '{}' but got {:?}",
            $input,
            result.ok()
        );
    };
    ($input:expr, $pattern:pat) => {
        let result = $crate::common::eval_str($input);
        assert!(
            matches!(result, Err($pattern)),
            "Expected {} for '{}' but got {:?}",
            stringify!($pattern),
            $input,
            result
        );
    };
}

/// Assert that evaluating `input` in the given environment produces the expected value.
#[macro_export]
macro_rules! assert_eval_with_env {
    ($input:expr, $expected:expr, $env:expr) => {
        let result = $crate::common::eval_str_with_env($input, $env);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}
