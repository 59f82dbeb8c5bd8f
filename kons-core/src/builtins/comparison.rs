// kons-core - Comparison built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparison operations: =, eq?

use kons_reader::KonsVal;

use crate::error::{Error, Result};

/// (= a b) - structural equality
pub(crate) fn builtin_eq(args: &[KonsVal]) -> Result<KonsVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("=", 2, args.len()));
    }
    Ok(KonsVal::Bool(args[0] == args[1]))
}

/// (eq? a b) - true only for the same interned symbol
pub(crate) fn builtin_identical_p(args: &[KonsVal]) -> Result<KonsVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("eq?", 2, args.len()));
    }
    let same = match (&args[0], &args[1]) {
        (KonsVal::Symbol(a), KonsVal::Symbol(b)) => a.ptr_eq(b),
        _ => false,
    };
    Ok(KonsVal::Bool(same))
}
