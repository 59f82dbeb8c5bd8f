// kons-core - Macro built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use kons_reader::KonsVal;

use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::macroexpand_1;

/// (macroexpand form) - expand one macro step of form
pub(crate) fn builtin_macroexpand(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("macroexpand", 1, args.len()));
    }
    macroexpand_1(&args[0], env)
}
