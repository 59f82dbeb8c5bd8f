// kons-core - List built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! List operations: cons, car, cdr, list, concat

use kons_reader::{KonsVal, concat};

use crate::error::{Error, Result};

/// (cons x y) - build a pair
pub(crate) fn builtin_cons(args: &[KonsVal]) -> Result<KonsVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("cons", 2, args.len()));
    }
    Ok(KonsVal::cons(args[0].clone(), args[1].clone()))
}

/// (car pair) - head of a pair
pub(crate) fn builtin_car(args: &[KonsVal]) -> Result<KonsVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("car", 1, args.len()));
    }
    match &args[0] {
        KonsVal::Cons(cell) => Ok(cell.first().clone()),
        other => Err(Error::type_error_in("car", "cons", other.type_name())),
    }
}

/// (cdr pair) - tail of a pair
pub(crate) fn builtin_cdr(args: &[KonsVal]) -> Result<KonsVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("cdr", 1, args.len()));
    }
    match &args[0] {
        KonsVal::Cons(cell) => Ok(cell.rest().clone()),
        other => Err(Error::type_error_in("cdr", "cons", other.type_name())),
    }
}

/// (list & items) - a list of the arguments
pub(crate) fn builtin_list(args: &[KonsVal]) -> Result<KonsVal> {
    Ok(KonsVal::list(args.to_vec()))
}

/// (concat & lists) - splice lists; the last argument becomes the tail
pub(crate) fn builtin_concat(args: &[KonsVal]) -> Result<KonsVal> {
    concat(args).map_err(|e| Error::type_error_in("concat", "list", e.got))
}
