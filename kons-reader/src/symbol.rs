// kons-reader - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are interned identifiers.
//!
//! # Interning
//!
//! Every symbol comes from a [`SymbolTable`]. Interning the same name twice in
//! one table returns the same underlying allocation, so:
//!
//! - **O(1) equality**: comparing symbols is a pointer comparison
//! - **O(1) hashing**: the hash is computed from the pointer address
//!
//! Symbols from two different tables are never equal, even when their names
//! match. The runtime shares a single table between the reader and the
//! evaluator; tests create their own to stay isolated.
//!
//! # Memory Behaviour
//!
//! A table never forgets a name. Symbols stay alive at least as long as the
//! table that created them.
//!
//! # Thread Safety
//!
//! The table is protected by a `Mutex`. Lookup-or-insert happens under the
//! lock, so two threads interning the same name concurrently always observe
//! the same symbol. Comparing and hashing symbols is lock-free.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

/// An interned name.
#[derive(Clone)]
pub struct Symbol {
    name: Arc<str>,
}

impl Symbol {
    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether two symbols are the same interned instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        // Due to interning, pointer comparison is sufficient
        self.ptr_eq(other)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Pointer hash; the data pointer of the interned str
        (Arc::as_ptr(&self.name) as *const u8).hash(state);
    }
}

/// A thread-safe, append-only registry of symbols.
///
/// # Examples
///
/// ```
/// use kons_reader::SymbolTable;
///
/// let table = SymbolTable::new();
/// let a = table.intern("foo");
/// let b = table.intern("foo");
/// assert_eq!(a, b);
/// assert_ne!(a, table.intern("bar"));
/// ```
#[derive(Default)]
pub struct SymbolTable {
    symbols: Mutex<HashMap<Arc<str>, Symbol>>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        SymbolTable {
            symbols: Mutex::new(HashMap::new()),
        }
    }

    /// Return the canonical symbol for `name`, registering it on first use.
    pub fn intern(&self, name: &str) -> Symbol {
        // Insertion is a single map operation, so a poisoned lock still
        // guards a consistent map.
        let mut symbols = self.symbols.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = symbols.get(name) {
            return existing.clone();
        }
        let name: Arc<str> = Arc::from(name);
        let sym = Symbol {
            name: Arc::clone(&name),
        };
        symbols.insert(name, sym.clone());
        sym
    }

    /// Number of distinct names interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check whether nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolTable({} symbols)", self.len())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_simple_symbol() {
        let table = SymbolTable::new();
        let sym = table.intern("foo");
        assert_eq!(sym.name(), "foo");
        assert_eq!(format!("{}", sym), "foo");
        assert_eq!(format!("{:?}", sym), "Symbol(foo)");
    }

    #[test]
    fn test_interning() {
        let table = SymbolTable::new();
        let sym1 = table.intern("foo");
        let sym2 = table.intern("foo");
        assert_eq!(sym1, sym2);
        assert!(Arc::ptr_eq(&sym1.name, &sym2.name));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_equality() {
        let table = SymbolTable::new();
        let sym1 = table.intern("foo");
        let sym2 = table.intern("foo");
        let sym3 = table.intern("bar");

        assert_eq!(sym1, sym2);
        assert_ne!(sym1, sym3);
    }

    #[test]
    fn test_separate_tables_are_isolated() {
        let a = SymbolTable::new();
        let b = SymbolTable::new();
        assert_ne!(a.intern("foo"), b.intern("foo"));
    }

    #[test]
    fn test_hash_follows_identity() {
        let table = SymbolTable::new();
        let mut set = HashSet::new();
        set.insert(table.intern("x"));
        set.insert(table.intern("x"));
        set.insert(table.intern("y"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_concurrent_interning() {
        let table = Arc::new(SymbolTable::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    (0..200)
                        .map(|i| table.intern(&format!("sym-{}", i % 50)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<Symbol>> = handles
            .into_iter()
            .map(|h| h.join().expect("interning thread panicked"))
            .collect();

        assert_eq!(table.len(), 50);
        for syms in &results {
            for sym in syms {
                assert!(sym.ptr_eq(&table.intern(sym.name())));
            }
        }
    }
}
