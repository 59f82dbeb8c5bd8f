// kons-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function application for Kons.

use std::any::Any;
use std::rc::Rc;

use kons_reader::{KonsFn, KonsNativeFn, KonsVal};

use super::eval;
use crate::env::Env;
use crate::error::{AritySpec, Error, Result};

/// Type alias for native function signature.
///
/// Natives receive the caller's environment so that primitives such as
/// `prn` and `macroexpand` can reach the runtime.
pub type NativeFnImpl = dyn Fn(&[KonsVal], &Env) -> Result<KonsVal>;

/// Apply a function to already evaluated arguments.
pub fn apply(func: &KonsVal, args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    match func {
        KonsVal::Fn(f) => apply_fn(f, args),
        KonsVal::NativeFn(f) => apply_native(f, args, env),
        other => Err(Error::NotCallable(format!("{}", other))),
    }
}

/// Apply a user-defined function or macro.
///
/// Binds the parameters in a fresh child of the captured environment and
/// evaluates the body there. Macros go through the same path with their
/// argument forms unevaluated.
pub(crate) fn apply_fn(func: &KonsFn, args: &[KonsVal]) -> Result<KonsVal> {
    if !func.matches(args.len()) {
        let expected = if func.rest_param.is_some() {
            AritySpec::AtLeast(func.min_arity())
        } else {
            AritySpec::Exact(func.min_arity())
        };
        return Err(Error::ArityError {
            expected,
            got: args.len(),
            name: func.name.as_ref().map(|name| name.to_string()),
        });
    }

    // Downcast the environment
    let captured_env = func
        .env
        .downcast_ref::<Env>()
        .ok_or_else(|| Error::Internal("Function environment has invalid type".into()))?;

    let fn_env = captured_env.push();

    for (param, arg) in func.params.iter().zip(args.iter()) {
        fn_env.set(param.clone(), arg.clone());
    }

    if let Some(rest) = &func.rest_param {
        let rest_args: Vec<KonsVal> = args[func.params.len()..].to_vec();
        fn_env.set(rest.clone(), KonsVal::list(rest_args));
    }

    eval(&func.body, &fn_env)
}

/// Apply a native function.
pub(crate) fn apply_native(func: &KonsNativeFn, args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    let f = func
        .func()
        .downcast_ref::<Rc<NativeFnImpl>>()
        .ok_or_else(|| Error::Internal("Native function has invalid type".into()))?;
    f(args, env)
}

/// Create a native function value that does not need the environment.
pub fn make_native_fn(
    name: &'static str,
    func: impl Fn(&[KonsVal]) -> Result<KonsVal> + 'static,
) -> KonsNativeFn {
    make_native_fn_with_env(name, move |args, _env| func(args))
}

/// Create a native function value that receives the caller's environment.
pub fn make_native_fn_with_env(
    name: &'static str,
    func: impl Fn(&[KonsVal], &Env) -> Result<KonsVal> + 'static,
) -> KonsNativeFn {
    let func_rc: Rc<NativeFnImpl> = Rc::new(func);
    let func_any: Rc<dyn Any> = Rc::new(func_rc);
    KonsNativeFn::new(name, func_any)
}
