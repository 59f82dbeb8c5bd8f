// kons-reader - Cons cells and list operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Immutable pairs and the list operations built on them.
//!
//! A list is a chain of [`Cons`] cells whose last `rest` is [`KonsVal::Nil`].
//! Cells are shared through `Rc` and never mutated after construction, so
//! quoted data and macro templates can reuse the same cells freely.
//!
//! A chain whose last `rest` is something other than `Nil` is an *improper*
//! list. Everything in this module reads such a tail as one final element
//! instead of failing.

use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use thiserror::Error;

use crate::value::KonsVal;

/// An immutable ordered pair.
#[derive(Clone)]
pub struct Cons {
    first: KonsVal,
    rest: KonsVal,
}

impl Cons {
    pub fn new(first: KonsVal, rest: KonsVal) -> Self {
        Cons { first, rest }
    }

    /// The head of the pair (`car`).
    pub fn first(&self) -> &KonsVal {
        &self.first
    }

    /// The tail of the pair (`cdr`).
    pub fn rest(&self) -> &KonsVal {
        &self.rest
    }
}

impl Drop for Cons {
    // Uniquely owned children are moved onto a work stack and dropped there
    // with empty slots, so neither long nor deeply nested lists recurse.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_unique(&mut self.first, &mut pending);
        take_unique(&mut self.rest, &mut pending);
        while let Some(mut cell) = pending.pop() {
            take_unique(&mut cell.first, &mut pending);
            take_unique(&mut cell.rest, &mut pending);
        }
    }
}

/// Move `slot`'s cell onto `pending` if this is its last owner.
fn take_unique(slot: &mut KonsVal, pending: &mut Vec<Cons>) {
    if !matches!(slot, KonsVal::Cons(_)) {
        return;
    }
    if let KonsVal::Cons(cell) = mem::replace(slot, KonsVal::Nil)
        && let Ok(cell) = Rc::try_unwrap(cell)
    {
        pending.push(cell);
    }
}

/// Error returned when a list operation meets a value that is not a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a list, got {got}")]
pub struct NotAList {
    pub got: &'static str,
}

/// Borrowing iterator over the elements of a list.
///
/// Yields an improper tail as the last element.
pub struct ListIter<'a> {
    current: Option<&'a KonsVal>,
}

impl<'a> ListIter<'a> {
    pub(crate) fn new(list: &'a KonsVal) -> Self {
        ListIter {
            current: Some(list),
        }
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a KonsVal;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current? {
            KonsVal::Nil => {
                self.current = None;
                None
            }
            KonsVal::Cons(cell) => {
                self.current = Some(&cell.rest);
                Some(&cell.first)
            }
            tail => {
                self.current = None;
                Some(tail)
            }
        }
    }
}

/// Build a list from `items` ending in `tail` instead of `Nil`.
pub fn list_with_tail(items: Vec<KonsVal>, tail: KonsVal) -> KonsVal {
    items
        .into_iter()
        .rev()
        .fold(tail, |rest, first| KonsVal::cons(first, rest))
}

/// Splice lists together.
///
/// Elements of every input except the last are copied in order. The last
/// input becomes the tail unchanged, so it may itself be a non-list.
///
/// # Examples
///
/// ```
/// use kons_reader::{KonsVal, cons::concat};
///
/// let a = KonsVal::list(vec![KonsVal::int(1), KonsVal::int(2)]);
/// let b = KonsVal::list(vec![KonsVal::int(3)]);
/// assert_eq!(concat(&[a, b]).unwrap().to_string(), "(1 2 3)");
/// ```
pub fn concat(parts: &[KonsVal]) -> Result<KonsVal, NotAList> {
    let Some((last, init)) = parts.split_last() else {
        return Ok(KonsVal::Nil);
    };

    let mut items = Vec::new();
    for part in init {
        match part {
            KonsVal::Nil => {}
            KonsVal::Cons(_) => items.extend(part.iter().cloned()),
            other => {
                return Err(NotAList {
                    got: other.type_name(),
                });
            }
        }
    }
    Ok(list_with_tail(items, last.clone()))
}

/// Structural equality of two chains.
///
/// Walks both trees with an explicit stack instead of recursing.
pub(crate) fn cons_eq(a: &Rc<Cons>, b: &Rc<Cons>) -> bool {
    let mut pending = vec![(a, b)];
    while let Some((a, b)) = pending.pop() {
        if Rc::ptr_eq(a, b) {
            continue;
        }
        for (x, y) in [(&a.rest, &b.rest), (&a.first, &b.first)] {
            match (x, y) {
                (KonsVal::Cons(x), KonsVal::Cons(y)) => pending.push((x, y)),
                (x, y) if x != y => return false,
                _ => {}
            }
        }
    }
    true
}

/// Hash a tree consistently with [`cons_eq`], in pre-order.
pub(crate) fn cons_hash<H: Hasher>(cell: &Rc<Cons>, state: &mut H) {
    let mut pending = vec![&cell.rest, &cell.first];
    while let Some(val) = pending.pop() {
        match val {
            KonsVal::Cons(cell) => {
                mem::discriminant(val).hash(state);
                pending.push(&cell.rest);
                pending.push(&cell.first);
            }
            atom => atom.hash(state),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
