// kons-core - Environment for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment for variable bindings with lexical scoping.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use kons_reader::{KonsVal, Symbol, SymbolTable};

use crate::error::{Error, Result};
use crate::eval::special_forms::SpecialForm;

/// A lexical environment for variable bindings.
///
/// Environments form a chain through parent references, enabling
/// lexical scoping. Each environment has its own bindings map
/// and optionally a parent environment for outer scope lookup.
///
/// Every environment in a chain shares one [`Runtime`]: the symbol table,
/// the special form table and the output sink used by `prn`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kons_core::Env;
/// use kons_reader::{KonsVal, SymbolTable};
///
/// let env = Env::new(Arc::new(SymbolTable::new()));
/// let x = env.intern("x");
///
/// env.set(x.clone(), KonsVal::int(42));
/// assert_eq!(env.get(&x).unwrap(), KonsVal::int(42));
///
/// // A child scope sees the parent's bindings and can shadow them
/// let child = env.push();
/// assert_eq!(child.get(&x).unwrap(), KonsVal::int(42));
/// child.set(x.clone(), KonsVal::int(100));
/// assert_eq!(child.get(&x).unwrap(), KonsVal::int(100));
/// assert_eq!(env.get(&x).unwrap(), KonsVal::int(42));
/// ```
#[derive(Clone)]
pub struct Env {
    inner: Rc<RefCell<EnvInner>>,
    runtime: Rc<Runtime>,
}

struct EnvInner {
    bindings: HashMap<Symbol, KonsVal>,
    parent: Option<Env>,
}

impl Drop for EnvInner {
    // Release unshared ancestors one at a time instead of recursively.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(Env { inner, .. }) = next {
            match Rc::try_unwrap(inner) {
                Ok(cell) => next = cell.into_inner().parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// State shared by every scope of one interpreter.
pub struct Runtime {
    symbols: Arc<SymbolTable>,
    special_forms: HashMap<Symbol, SpecialForm>,
    sym_ampersand: Symbol,
    sym_do: Symbol,
    output: RefCell<Box<dyn Write>>,
}

impl Env {
    /// Create a bare root environment writing to stdout.
    ///
    /// No builtins are registered; see [`crate::create_root_environment`].
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self::with_output(symbols, Box::new(io::stdout()))
    }

    /// Create a bare root environment writing `prn` output to `output`.
    pub fn with_output(symbols: Arc<SymbolTable>, output: Box<dyn Write>) -> Self {
        let special_forms = SpecialForm::ALL
            .iter()
            .map(|form| (symbols.intern(form.name()), *form))
            .collect();
        let runtime = Runtime {
            sym_ampersand: symbols.intern("&"),
            sym_do: symbols.intern("do"),
            special_forms,
            symbols,
            output: RefCell::new(output),
        };
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: None,
            })),
            runtime: Rc::new(runtime),
        }
    }

    /// Create a child environment with this environment as parent.
    #[must_use]
    pub fn push(&self) -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            })),
            runtime: Rc::clone(&self.runtime),
        }
    }

    /// Bind a symbol in this environment, shadowing any outer binding.
    pub fn set(&self, sym: Symbol, val: KonsVal) {
        self.inner.borrow_mut().bindings.insert(sym, val);
    }

    /// Look up a symbol in this environment or parent chain.
    /// Uses iterative traversal to avoid stack overflow on deep environments.
    pub fn get(&self, sym: &Symbol) -> Result<KonsVal> {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if let Some(val) = inner.bindings.get(sym) {
                return Ok(val.clone());
            }
            let parent = inner.parent.clone();
            drop(inner);
            match parent {
                Some(p) => current = p,
                None => return Err(Error::UnboundSymbol(sym.clone())),
            }
        }
    }

    /// Check if a symbol is bound in this environment or parent chain.
    #[must_use]
    pub fn is_bound(&self, sym: &Symbol) -> bool {
        self.get(sym).is_ok()
    }

    /// The outermost environment of the chain.
    #[must_use]
    pub fn root(&self) -> Env {
        let mut current = self.clone();
        loop {
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return current,
            }
        }
    }

    /// Check whether two handles refer to the same scope.
    #[must_use]
    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The symbol table shared by the reader and this environment.
    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.runtime.symbols
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.runtime.symbols.intern(name)
    }

    /// The special form named by `sym`, if any.
    pub fn special_form(&self, sym: &Symbol) -> Option<SpecialForm> {
        self.runtime.special_forms.get(sym).copied()
    }

    pub(crate) fn sym_ampersand(&self) -> &Symbol {
        &self.runtime.sym_ampersand
    }

    pub(crate) fn sym_do(&self) -> &Symbol {
        &self.runtime.sym_do
    }

    /// Write one line to the output sink and flush it.
    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut out = self.runtime.output.borrow_mut();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Env")
            .field("bindings", &inner.bindings.len())
            .field("root", &inner.parent.is_none())
            .finish()
    }
}
