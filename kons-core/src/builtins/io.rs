// kons-core - I/O built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Output: prn

use kons_reader::KonsVal;

use crate::env::Env;
use crate::error::Result;

/// Text of a value as `prn` shows it: strings raw, everything else printed.
pub(crate) fn display_text(val: &KonsVal) -> String {
    match val {
        KonsVal::Str(s) => s.to_string(),
        other => format!("{}", other),
    }
}

/// (prn & args) - write the concatenated args as one line
pub(crate) fn builtin_prn(args: &[KonsVal], env: &Env) -> Result<KonsVal> {
    let line: String = args.iter().map(display_text).collect();
    env.write_line(&line)?;
    Ok(KonsVal::Nil)
}
