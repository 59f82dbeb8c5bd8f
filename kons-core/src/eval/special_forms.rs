// kons-core - Special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The fixed set of special forms.
//!
//! Special forms receive their arguments unevaluated. They are recognised
//! by symbol identity before the operator of a list is evaluated, so they
//! cannot be shadowed by ordinary bindings.

use std::rc::Rc;

use kons_reader::{FnKind, KonsFn, KonsVal, Symbol};

use super::eval;
use crate::env::Env;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    Quote,
    Def,
    Lambda,
    Defmacro,
    Cond,
    Do,
}

impl SpecialForm {
    pub const ALL: [SpecialForm; 6] = [
        SpecialForm::Quote,
        SpecialForm::Def,
        SpecialForm::Lambda,
        SpecialForm::Defmacro,
        SpecialForm::Cond,
        SpecialForm::Do,
    ];

    /// The symbol name that introduces this form.
    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::Def => "def",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Defmacro => "defmacro",
            SpecialForm::Cond => "cond",
            SpecialForm::Do => "do",
        }
    }
}

pub(crate) fn eval_special(form: SpecialForm, args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    match form {
        SpecialForm::Quote => eval_quote(args),
        SpecialForm::Def => eval_def(args, env),
        SpecialForm::Lambda => eval_lambda(args, env),
        SpecialForm::Defmacro => eval_defmacro(args, env),
        SpecialForm::Cond => eval_cond(args, env),
        SpecialForm::Do => eval_do(args, env),
    }
}

/// (quote form) - return form unevaluated
fn eval_quote(args: &[KonsVal]) -> Result<KonsVal> {
    if args.len() != 1 {
        return Err(Error::syntax("quote", "requires exactly 1 argument"));
    }
    Ok(args[0].clone())
}

/// (def name value) - bind value in the root environment
fn eval_def(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    if args.len() != 2 {
        return Err(Error::syntax("def", "requires a name and a value"));
    }
    let sym = require_symbol("def", &args[0])?;
    let val = match eval(&args[1], env)? {
        // Give anonymous functions the name they are defined under
        KonsVal::Fn(f) if f.name.is_none() => {
            KonsVal::function(KonsFn::clone(&f).named(sym.clone()))
        }
        other => other,
    };

    tracing::debug!(symbol = %sym, value = %val, "def");
    env.root().set(sym, val.clone());
    Ok(val)
}

/// (lambda (params...) body...) - create a closure over the current env
fn eval_lambda(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    let f = make_closure("lambda", FnKind::Function, args, env)?;
    Ok(KonsVal::function(f))
}

/// (defmacro name (params...) body...) - define a macro in the root env
fn eval_defmacro(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    let Some((name, rest)) = args.split_first() else {
        return Err(Error::syntax("defmacro", "requires a name and a parameter list"));
    };
    let name = require_symbol("defmacro", name)?;
    let mac = make_closure("defmacro", FnKind::Macro, rest, env)?.named(name.clone());
    let val = KonsVal::function(mac);

    tracing::debug!(symbol = %name, "defmacro");
    env.root().set(name, val.clone());
    Ok(val)
}

/// (cond (test result)...) or (cond test result ...)
///
/// When every argument is a list the form is read as clauses, and each clause
/// must then be a two-element list. A form with at least one atom argument is
/// read as alternating test/result pairs.
fn eval_cond(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    if args.is_empty() {
        return Err(Error::syntax("cond", "requires at least one clause"));
    }

    if args.iter().all(|arg| matches!(arg, KonsVal::Cons(_))) {
        if let Some(bad) = args.iter().find(|clause| clause.proper_len() != Some(2)) {
            return Err(Error::syntax(
                "cond",
                format!("clause must be a (test result) list, got {}", bad),
            ));
        }
        for clause in args {
            let parts = clause.to_vec();
            if eval(&parts[0], env)?.is_truthy() {
                return eval(&parts[1], env);
            }
        }
        return Ok(KonsVal::Nil);
    }

    if !args.len().is_multiple_of(2) {
        return Err(Error::syntax(
            "cond",
            "requires (test result) clauses or an even number of forms",
        ));
    }
    for pair in args.chunks(2) {
        if eval(&pair[0], env)?.is_truthy() {
            return eval(&pair[1], env);
        }
    }
    Ok(KonsVal::Nil)
}

/// (do exprs...) - evaluate in order, return the last
fn eval_do(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    let mut result = KonsVal::Nil;
    for expr in args {
        result = eval(expr, env)?;
    }
    Ok(result)
}

// ============================================================================
// Helpers
// ============================================================================

fn require_symbol(form: &'static str, val: &KonsVal) -> Result<Symbol> {
    match val {
        KonsVal::Symbol(sym) => Ok(sym.clone()),
        other => Err(Error::syntax(
            form,
            format!("name must be a symbol, got {}", other.type_name()),
        )),
    }
}

/// Build a closure from `((params...) body...)`.
fn make_closure(form: &'static str, kind: FnKind, args: &[KonsVal], env: &Env) -> Result<KonsFn> {
    let Some((params, body)) = args.split_first() else {
        return Err(Error::syntax(form, "requires a parameter list"));
    };
    let (params, rest_param) = parse_params(form, params, env)?;

    let mut body_forms = Vec::with_capacity(body.len() + 1);
    body_forms.push(KonsVal::symbol(env.sym_do().clone()));
    body_forms.extend(body.iter().cloned());

    Ok(KonsFn::new(
        kind,
        params,
        rest_param,
        KonsVal::list(body_forms),
        Rc::new(env.clone()),
    ))
}

/// Parse a parameter list like `(a b & rest)`.
///
/// `&` must be second to last and followed by the rest parameter.
fn parse_params(
    form: &'static str,
    params: &KonsVal,
    env: &Env,
) -> Result<(Vec<Symbol>, Option<Symbol>)> {
    if params.proper_len().is_none() {
        return Err(Error::syntax(
            form,
            format!("parameter list must be a list, got {}", params.type_name()),
        ));
    }

    let items = params.to_vec();
    let mut symbols = Vec::with_capacity(items.len());
    for item in &items {
        match item {
            KonsVal::Symbol(sym) => symbols.push(sym.clone()),
            other => {
                return Err(Error::syntax(
                    form,
                    format!("parameters must be symbols, got {}", other.type_name()),
                ));
            }
        }
    }

    let ampersand = env.sym_ampersand();
    match symbols.iter().position(|sym| sym == ampersand) {
        None => Ok((symbols, None)),
        Some(pos) if pos + 2 == symbols.len() && symbols[pos + 1] != *ampersand => {
            let rest = symbols.pop();
            symbols.pop();
            Ok((symbols, rest))
        }
        Some(_) => Err(Error::syntax(
            form,
            "& must be followed by exactly one rest parameter",
        )),
    }
}
