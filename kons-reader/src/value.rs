// kons-reader - Core value types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use bigdecimal::BigDecimal;

use crate::cons::{self, Cons, ListIter};
use crate::symbol::Symbol;

/// The core value type for Kons.
///
/// Values are immutable. Lists are chains of shared [`Cons`] cells ending in
/// `Nil`, so `Nil` doubles as the empty list.
#[derive(Clone)]
pub enum KonsVal {
    /// The empty value and the empty list
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// Arbitrary-precision decimal number
    Number(BigDecimal),
    /// Immutable string
    Str(Rc<str>),
    /// Interned symbol
    Symbol(Symbol),
    /// A pair, usually one cell of a list
    Cons(Rc<Cons>),
    /// User-defined function or macro
    Fn(Rc<KonsFn>),
    /// Native (Rust) function
    NativeFn(KonsNativeFn),
}

// ============================================================================
// Function Types
// ============================================================================

/// Whether a closure is called with evaluated arguments or with forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnKind {
    Function,
    Macro,
}

/// A user-defined function or macro.
///
/// The environment is type-erased; the concrete type lives in kons-core.
#[derive(Clone)]
pub struct KonsFn {
    pub kind: FnKind,
    /// Name for rendering and error messages
    pub name: Option<Symbol>,
    /// Required parameters, bound positionally
    pub params: Vec<Symbol>,
    /// Receives surplus arguments as a list
    pub rest_param: Option<Symbol>,
    /// A single form, usually `(do ...)`
    pub body: KonsVal,
    /// Captured defining environment
    pub env: Rc<dyn Any>,
}

impl KonsFn {
    pub fn new(
        kind: FnKind,
        params: Vec<Symbol>,
        rest_param: Option<Symbol>,
        body: KonsVal,
        env: Rc<dyn Any>,
    ) -> Self {
        KonsFn {
            kind,
            name: None,
            params,
            rest_param,
            body,
            env,
        }
    }

    /// Attach a name.
    pub fn named(mut self, name: Symbol) -> Self {
        self.name = Some(name);
        self
    }

    pub fn is_macro(&self) -> bool {
        self.kind == FnKind::Macro
    }

    /// Get the minimum number of arguments accepted.
    pub fn min_arity(&self) -> usize {
        self.params.len()
    }

    /// Check if the closure can accept the given number of arguments.
    pub fn matches(&self, arg_count: usize) -> bool {
        if self.rest_param.is_some() {
            arg_count >= self.params.len()
        } else {
            arg_count == self.params.len()
        }
    }
}

impl fmt::Display for KonsFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            FnKind::Function => "fn",
            FnKind::Macro => "macro",
        };
        match &self.name {
            Some(name) => write!(f, "#<{} {}>", tag, name),
            None => write!(f, "#<{}>", tag),
        }
    }
}

impl fmt::Debug for KonsFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A native (Rust) function.
#[derive(Clone)]
pub struct KonsNativeFn {
    /// Function name for display
    pub name: &'static str,
    /// The actual function (type-erased)
    func: Rc<dyn Any>,
}

impl KonsNativeFn {
    pub fn new(name: &'static str, func: Rc<dyn Any>) -> Self {
        KonsNativeFn { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the inner function reference.
    pub fn func(&self) -> &Rc<dyn Any> {
        &self.func
    }
}

impl fmt::Debug for KonsNativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

impl PartialEq for KonsNativeFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

// ============================================================================
// Constructors and accessors
// ============================================================================

impl KonsVal {
    pub fn bool(b: bool) -> Self {
        KonsVal::Bool(b)
    }

    pub fn number(n: BigDecimal) -> Self {
        KonsVal::Number(n)
    }

    /// Create a number from an integer
    pub fn int(n: i64) -> Self {
        KonsVal::Number(BigDecimal::from(n))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        KonsVal::Str(s.into())
    }

    pub fn symbol(sym: Symbol) -> Self {
        KonsVal::Symbol(sym)
    }

    /// Create a pair
    pub fn cons(first: KonsVal, rest: KonsVal) -> Self {
        KonsVal::Cons(Rc::new(Cons::new(first, rest)))
    }

    /// Create a nil-terminated list from elements
    pub fn list(elements: Vec<KonsVal>) -> Self {
        cons::list_with_tail(elements, KonsVal::Nil)
    }

    pub fn function(f: KonsFn) -> Self {
        KonsVal::Fn(Rc::new(f))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, KonsVal::Nil)
    }

    /// Check if this value is truthy (not nil and not false)
    pub fn is_truthy(&self) -> bool {
        !matches!(self, KonsVal::Nil | KonsVal::Bool(false))
    }

    /// Nil or a pair.
    pub fn is_list(&self) -> bool {
        matches!(self, KonsVal::Nil | KonsVal::Cons(_))
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            KonsVal::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_cons(&self) -> Option<&Cons> {
        match self {
            KonsVal::Cons(cell) => Some(cell),
            _ => None,
        }
    }

    /// Iterate over the elements of a list.
    ///
    /// A non-list value yields itself once, as does an improper tail.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter::new(self)
    }

    /// Copy the elements of a list into a vector.
    pub fn to_vec(&self) -> Vec<KonsVal> {
        self.iter().cloned().collect()
    }

    /// Number of cells in a proper list, or `None` for anything else.
    pub fn proper_len(&self) -> Option<usize> {
        let mut len = 0;
        let mut current = self;
        loop {
            match current {
                KonsVal::Nil => return Some(len),
                KonsVal::Cons(cell) => {
                    len += 1;
                    current = cell.rest();
                }
                _ => return None,
            }
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            KonsVal::Nil => "nil",
            KonsVal::Bool(_) => "boolean",
            KonsVal::Number(_) => "number",
            KonsVal::Str(_) => "string",
            KonsVal::Symbol(_) => "symbol",
            KonsVal::Cons(_) => "cons",
            KonsVal::Fn(f) if f.is_macro() => "macro",
            KonsVal::Fn(_) => "fn",
            KonsVal::NativeFn(_) => "native-fn",
        }
    }
}

impl FromIterator<KonsVal> for KonsVal {
    fn from_iter<I: IntoIterator<Item = KonsVal>>(iter: I) -> Self {
        KonsVal::list(iter.into_iter().collect())
    }
}

impl From<Symbol> for KonsVal {
    fn from(sym: Symbol) -> Self {
        KonsVal::Symbol(sym)
    }
}

impl From<BigDecimal> for KonsVal {
    fn from(n: BigDecimal) -> Self {
        KonsVal::Number(n)
    }
}

impl From<bool> for KonsVal {
    fn from(b: bool) -> Self {
        KonsVal::Bool(b)
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for KonsVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KonsVal::Nil => write!(f, "nil"),
            KonsVal::Bool(b) => write!(f, "{}", b),
            KonsVal::Number(n) => write!(f, "{}", n),
            KonsVal::Str(s) => write!(f, "\"{}\"", escape_string(s)),
            KonsVal::Symbol(sym) => write!(f, "{}", sym),
            KonsVal::Cons(_) => {
                // Open lists are kept on a stack so nesting depth does not
                // turn into recursion.
                let mut open = vec![(self.iter(), true)];
                write!(f, "(")?;
                while let Some((items, first)) = open.last_mut() {
                    let Some(item) = items.next() else {
                        open.pop();
                        write!(f, ")")?;
                        continue;
                    };
                    if !*first {
                        write!(f, " ")?;
                    }
                    *first = false;
                    if let KonsVal::Cons(_) = item {
                        write!(f, "(")?;
                        open.push((item.iter(), true));
                    } else {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            KonsVal::Fn(func) => write!(f, "{}", func),
            KonsVal::NativeFn(func) => write!(f, "{:?}", func),
        }
    }
}

impl fmt::Debug for KonsVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

// ============================================================================
// Equality and hashing
// ============================================================================

impl PartialEq for KonsVal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (KonsVal::Nil, KonsVal::Nil) => true,
            (KonsVal::Bool(a), KonsVal::Bool(b)) => a == b,
            (KonsVal::Number(a), KonsVal::Number(b)) => a == b,
            (KonsVal::Str(a), KonsVal::Str(b)) => a == b,
            (KonsVal::Symbol(a), KonsVal::Symbol(b)) => a == b,
            (KonsVal::Cons(a), KonsVal::Cons(b)) => cons::cons_eq(a, b),
            // Closures are only equal to themselves
            (KonsVal::Fn(a), KonsVal::Fn(b)) => Rc::ptr_eq(a, b),
            (KonsVal::NativeFn(a), KonsVal::NativeFn(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for KonsVal {}

impl Hash for KonsVal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            KonsVal::Nil => {}
            KonsVal::Bool(b) => b.hash(state),
            // BigDecimal hashes the normalized value, matching its Eq
            KonsVal::Number(n) => n.hash(state),
            KonsVal::Str(s) => s.hash(state),
            KonsVal::Symbol(sym) => sym.hash(state),
            KonsVal::Cons(cell) => cons::cons_hash(cell, state),
            KonsVal::Fn(func) => (Rc::as_ptr(func) as *const u8).hash(state),
            KonsVal::NativeFn(func) => (Rc::as_ptr(func.func()) as *const u8).hash(state),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
