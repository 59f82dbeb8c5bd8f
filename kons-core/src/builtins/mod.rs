// kons-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions for Kons.

mod arithmetic;
mod comparison;
mod io;
mod lists;
mod macros;

use kons_reader::KonsVal;

use crate::env::Env;
use crate::error::Result;
use crate::eval::{make_native_fn, make_native_fn_with_env};

use arithmetic::{builtin_add, builtin_div, builtin_mul, builtin_sub};
use comparison::{builtin_eq, builtin_identical_p};
use io::builtin_prn;
use lists::{builtin_car, builtin_cdr, builtin_concat, builtin_cons, builtin_list};
use macros::builtin_macroexpand;

/// Register all built-in functions in the given environment.
pub fn register_builtins(env: &Env) {
    // Lists
    env.define_native("cons", builtin_cons);
    env.define_native("car", builtin_car);
    env.define_native("cdr", builtin_cdr);
    env.define_native("list", builtin_list);
    env.define_native("concat", builtin_concat);

    // Comparison
    env.define_native("eq?", builtin_identical_p);
    env.define_native("=", builtin_eq);

    // Arithmetic
    env.define_native("+", builtin_add);
    env.define_native("-", builtin_sub);
    env.define_native("*", builtin_mul);
    env.define_native("/", builtin_div);

    // I/O and macros
    env.define_native_with_env("prn", builtin_prn);
    env.define_native_with_env("macroexpand", builtin_macroexpand);

    env.set(env.intern("t"), KonsVal::Bool(true));
}

/// Helper trait to define native functions more easily.
pub trait EnvExt {
    fn define_native(&self, name: &'static str, func: fn(&[KonsVal]) -> Result<KonsVal>);
    fn define_native_with_env(
        &self,
        name: &'static str,
        func: fn(&[KonsVal], &Env) -> Result<KonsVal>,
    );
}

impl EnvExt for Env {
    fn define_native(&self, name: &'static str, func: fn(&[KonsVal]) -> Result<KonsVal>) {
        let native = make_native_fn(name, func);
        self.set(self.intern(name), KonsVal::NativeFn(native));
    }

    fn define_native_with_env(
        &self,
        name: &'static str,
        func: fn(&[KonsVal], &Env) -> Result<KonsVal>,
    ) {
        let native = make_native_fn_with_env(name, func);
        self.set(self.intern(name), KonsVal::NativeFn(native));
    }
}
