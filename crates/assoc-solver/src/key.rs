//! Record entries: `Key`, `KeyType`, `KeyName`.
//!
//! A [`Key`] is one potential record entry — the set of identifying
//! names/indexes it answers to, paired with a lazily resolved value
//! union. Several keys on one shape may overlap (two assignments to the
//! same key in different control-flow branches); a lookup aggregates the
//! value types of every matching entry.

use crate::build::Build;
use crate::lazy::MtCell;
use crate::mt::Mt;
use crate::types::{BriefType, TypeList};
use assoc_common::{Anchor, Atom, Interner};
use smallvec::SmallVec;

// =============================================================================
// KeyName / KeyType
// =============================================================================

/// One identifying alternative of a key entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyName {
    /// A concrete string key.
    Str(Atom),
    /// A concrete integer key.
    Int(i64),
    /// Any integer index — list semantics.
    AnyInt,
    /// Any key at all.
    Any,
}

/// The set of possible identifiers for one key entry.
///
/// Usually a single name; a union when the key expression is not
/// statically a single literal.
#[derive(Clone, Debug)]
pub struct KeyType {
    pub names: SmallVec<[KeyName; 1]>,
    pub anchor: Anchor,
}

fn is_num(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

impl KeyType {
    pub fn new(names: SmallVec<[KeyName; 1]>, anchor: Anchor) -> Self {
        Self { names, anchor }
    }

    fn of(name: KeyName, anchor: Anchor) -> Self {
        let mut names = SmallVec::new();
        names.push(name);
        Self { names, anchor }
    }

    pub fn string(name: Atom, anchor: Anchor) -> Self {
        Self::of(KeyName::Str(name), anchor)
    }

    pub fn int(index: i64, anchor: Anchor) -> Self {
        Self::of(KeyName::Int(index), anchor)
    }

    /// Wildcard integer index — the key of a list entry.
    pub fn integer_wildcard(anchor: Anchor) -> Self {
        Self::of(KeyName::AnyInt, anchor)
    }

    /// Any-key wildcard.
    pub fn any(anchor: Anchor) -> Self {
        Self::of(KeyName::Any, anchor)
    }

    /// Derive the name set from an inferred key-expression union: literal
    /// members contribute concrete names, non-literal members a wildcard
    /// (integer wildcard when the member is known numeric).
    pub fn from_mt(key_mt: &Mt, anchor: Anchor, interner: &Interner) -> Self {
        let mut names: SmallVec<[KeyName; 1]> = SmallVec::new();
        for t in key_mt.types().iter() {
            let name = match t.literal {
                Some(lit) => interner.with_text(lit, |text| {
                    if is_num(text) {
                        text.parse::<i64>().map(KeyName::Int).unwrap_or(KeyName::AnyInt)
                    } else {
                        KeyName::Str(lit)
                    }
                }),
                None if t.brief.is_int() => KeyName::AnyInt,
                None => KeyName::Any,
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            names.push(KeyName::Any);
        }
        Self { names, anchor }
    }

    /// Does a bracket/property access with `lookup` reach this entry?
    ///
    /// `None` means element access: every entry matches. Otherwise the
    /// entry matches on an exact concrete name, on the any-key wildcard,
    /// or on the integer wildcard when the lookup is numeric-looking.
    pub fn matches(&self, lookup: Option<&str>, interner: &Interner) -> bool {
        let Some(lookup) = lookup else {
            return true;
        };
        self.names.iter().any(|name| match name {
            KeyName::Str(atom) => interner.with_text(*atom, |text| text == lookup),
            KeyName::Int(index) => is_num(lookup) && lookup.parse::<i64>() == Ok(*index),
            KeyName::AnyInt => is_num(lookup),
            KeyName::Any => true,
        })
    }

    /// Concrete names for completion-candidate listing; wildcards have no
    /// name to offer.
    pub fn concrete_names(&self, interner: &Interner) -> Vec<String> {
        self.names
            .iter()
            .filter_map(|name| match name {
                KeyName::Str(atom) => Some(interner.resolve(*atom)),
                KeyName::Int(index) => Some(index.to_string()),
                KeyName::AnyInt | KeyName::Any => None,
            })
            .collect()
    }

    /// Materialize the name set as scalar shapes, for lock-step generic
    /// discovery against a declared key position.
    pub fn as_types(&self, interner: &Interner) -> TypeList {
        self.names
            .iter()
            .map(|name| match name {
                KeyName::Str(atom) => Build::new(self.anchor, BriefType::string())
                    .literal(*atom)
                    .exact(false)
                    .get(),
                KeyName::Int(index) => Build::new(self.anchor, BriefType::int())
                    .literal(interner.intern(&index.to_string()))
                    .exact(false)
                    .get(),
                KeyName::AnyInt => Build::new(self.anchor, BriefType::int()).exact(false).get(),
                KeyName::Any => Build::new(self.anchor, BriefType::mixed())
                    .exact(false)
                    .get(),
            })
            .collect()
    }
}

// =============================================================================
// Key
// =============================================================================

/// One record entry: identifying names plus a lazily resolved value.
pub struct Key {
    pub key_type: KeyType,
    pub anchor: Anchor,
    /// Declared coarse type of the value; `MIXED` when nothing cheaper
    /// than forcing the value is known.
    pub brief: BriefType,
    /// Field doc comments, surfaced by completion UI.
    pub comments: Vec<String>,
    value: MtCell,
}

impl Key {
    pub fn new(key_type: KeyType, anchor: Anchor) -> Self {
        Self {
            key_type,
            anchor,
            brief: BriefType::mixed(),
            comments: Vec::new(),
            value: MtCell::ready(Mt::failed()),
        }
    }

    /// Set the value cell. Forced at most once, on first lookup.
    pub fn value(mut self, value: MtCell) -> Self {
        self.value = value;
        self
    }

    pub fn brief(mut self, brief: BriefType) -> Self {
        self.brief = brief;
        self
    }

    pub fn comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Force (or fetch the memoized) value union.
    pub fn value_types(&self) -> Mt {
        self.value.force()
    }

    /// Whether the value has been computed yet.
    pub fn is_value_forced(&self) -> bool {
        self.value.is_forced()
    }
}

#[cfg(test)]
#[path = "../tests/key_tests.rs"]
mod tests;
