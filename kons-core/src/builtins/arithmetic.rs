// kons-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic operations: +, -, *, /
//!
//! Every operator folds left over its arguments starting from the first
//! one, so `(- 5)` is `5` rather than `-5`. With no arguments `+` and `-`
//! return 0 while `*` and `/` return 1.
//!
//! Division is integral: each step keeps only the integer part of the
//! exact quotient, truncating toward zero.

use bigdecimal::BigDecimal;
use kons_reader::KonsVal;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::error::{Error, Result};

fn to_number<'a>(op: &'static str, val: &'a KonsVal) -> Result<&'a BigDecimal> {
    match val {
        KonsVal::Number(n) => Ok(n),
        other => Err(Error::type_error_in(op, "number", other.type_name())),
    }
}

fn fold(
    op: &'static str,
    args: &[KonsVal],
    identity: i64,
    step: impl Fn(&BigDecimal, &BigDecimal) -> Result<BigDecimal>,
) -> Result<KonsVal> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(KonsVal::int(identity));
    };
    let mut acc = to_number(op, first)?.clone();
    for arg in rest {
        acc = step(&acc, to_number(op, arg)?)?;
    }
    Ok(KonsVal::Number(acc))
}

/// Integer part of `a / b`, truncated toward zero.
fn divide_integral(a: &BigDecimal, b: &BigDecimal) -> Result<BigDecimal> {
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    // Bring both to a common scale so the unscaled integers divide exactly
    let scale = a.fractional_digit_count().max(b.fractional_digit_count());
    let (x, _): (BigInt, i64) = a.with_scale(scale).into_bigint_and_exponent();
    let (y, _): (BigInt, i64) = b.with_scale(scale).into_bigint_and_exponent();
    Ok(BigDecimal::new(x / y, 0))
}

/// (+ & nums)
pub(crate) fn builtin_add(args: &[KonsVal]) -> Result<KonsVal> {
    fold("+", args, 0, |a, b| Ok(a + b))
}

/// (- & nums)
pub(crate) fn builtin_sub(args: &[KonsVal]) -> Result<KonsVal> {
    fold("-", args, 0, |a, b| Ok(a - b))
}

/// (* & nums)
pub(crate) fn builtin_mul(args: &[KonsVal]) -> Result<KonsVal> {
    fold("*", args, 1, |a, b| Ok(a * b))
}

/// (/ & nums)
pub(crate) fn builtin_div(args: &[KonsVal]) -> Result<KonsVal> {
    fold("/", args, 1, divide_integral)
}
