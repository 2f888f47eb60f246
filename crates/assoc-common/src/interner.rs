//! String interning for identifier and literal deduplication.
//!
//! Interning gives O(1) equality (`Atom` comparison) for key names, class
//! FQNs, and literal values that are compared far more often than they are
//! displayed. The resolver threads a `&Interner` through every call that
//! needs the text back.
//!
//! The interner is single-threaded by design — the whole engine is (see the
//! solver's recursion module for why).

use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// Interned string handle.
///
/// Two `Atom`s are equal iff they were interned from equal strings in the
/// same [`Interner`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// Sentinel for "no string". Interners never hand this value out.
    pub const INVALID: Self = Self(u32::MAX);

    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Single-threaded string interner.
///
/// Uses interior mutability so it can be shared immutably alongside the
/// type graphs that reference it.
#[derive(Default)]
pub struct Interner {
    inner: RefCell<InternerInner>,
}

#[derive(Default)]
struct InternerInner {
    map: FxHashMap<Box<str>, Atom>,
    strings: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its stable handle.
    pub fn intern(&self, text: &str) -> Atom {
        let mut inner = self.inner.borrow_mut();
        if let Some(&atom) = inner.map.get(text) {
            return atom;
        }
        let atom = Atom(inner.strings.len() as u32);
        let boxed: Box<str> = text.into();
        inner.strings.push(boxed.clone());
        inner.map.insert(boxed, atom);
        atom
    }

    /// Resolve a handle back to its text as an owned `String`.
    ///
    /// Returns an empty string for [`Atom::INVALID`] or out-of-range
    /// handles from a foreign interner.
    pub fn resolve(&self, atom: Atom) -> String {
        self.inner
            .borrow()
            .strings
            .get(atom.0 as usize)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Run `f` against the text of `atom` without copying it out.
    pub fn with_text<R>(&self, atom: Atom, f: impl FnOnce(&str) -> R) -> R {
        let inner = self.inner.borrow();
        let text = inner
            .strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("");
        f(text)
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
