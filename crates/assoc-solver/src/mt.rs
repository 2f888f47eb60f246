//! `Mt` — the lazy, memoized, ordered union of shape alternatives.
//!
//! An `Mt` is "all types this expression could have": an ordered sequence
//! of [`DeepType`] alternatives tagged with a [`Reason`]. The member
//! sequence is produced lazily, memoized on first access, and never
//! changes afterwards. This is the primary API surface for key/element
//! lookup, literal extraction, and the coarse interop projection.

use crate::build::Build;
use crate::key::{Key, KeyType};
use crate::lazy::{LazySeq, MtCell};
use crate::types::{BriefType, DeepType, Reason, TypeList};
use assoc_common::{Anchor, Atom, Interner};
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

struct MtInner {
    reason: Reason,
    members: LazySeq,
    /// In-progress marker for `get_key` — the primary cycle-breaker for
    /// self-referential array structures. Instance-local and unsynchronized;
    /// sound only under the engine's single-threaded evaluation contract.
    getting_key: Cell<bool>,
}

/// Lazily evaluated union of all inferred possible types of one
/// expression. Cheap to clone (shared handle).
#[derive(Clone)]
pub struct Mt(Rc<MtInner>);

impl Mt {
    pub fn new(types: TypeList) -> Self {
        Self(Rc::new(MtInner {
            reason: Reason::Ok,
            members: LazySeq::ready(types),
            getting_key: Cell::new(false),
        }))
    }

    /// A union whose member list is computed on first access and cached.
    pub fn lazy(thunk: impl FnOnce() -> TypeList + 'static) -> Self {
        Self(Rc::new(MtInner {
            reason: Reason::Ok,
            members: LazySeq::new(thunk),
            getting_key: Cell::new(false),
        }))
    }

    pub fn single(t: Rc<DeepType>) -> Self {
        Self::new(vec![t])
    }

    /// Terminal empty union tagged with `reason`. Constructed fresh —
    /// sentinels are values, never shared singletons.
    pub fn sentinel(reason: Reason) -> Self {
        Self(Rc::new(MtInner {
            reason,
            members: LazySeq::ready(Vec::new()),
            getting_key: Cell::new(false),
        }))
    }

    /// Cycle detected and broken.
    pub fn circular() -> Self {
        Self::sentinel(Reason::CircularReference)
    }

    /// Resolution attempted but produced nothing.
    pub fn failed() -> Self {
        Self::sentinel(Reason::FailedToResolve)
    }

    /// Depth or visit budget exhausted.
    pub fn depth_limit() -> Self {
        Self::sentinel(Reason::DepthLimit)
    }

    /// Input anchor was structurally unusable.
    pub fn invalid() -> Self {
        Self::sentinel(Reason::InvalidPsi)
    }

    pub fn reason(&self) -> Reason {
        self.0.reason
    }

    /// Force (or fetch) the member sequence.
    pub fn types(&self) -> Rc<TypeList> {
        self.0.members.force()
    }

    /// Forces the members.
    pub fn is_empty(&self) -> bool {
        self.types().is_empty()
    }

    // =========================================================================
    // Key / element lookup
    // =========================================================================

    /// Value types reachable from one member via `lookup`.
    ///
    /// Aggregates every key entry whose `KeyType` matches — overlapping
    /// entries from different control-flow branches all contribute — and
    /// folds in the element classifier of an untyped list.
    fn member_key_types(
        t: &DeepType,
        lookup: Option<&str>,
        interner: &Interner,
        out: &mut TypeList,
        sentinel: &mut Option<Reason>,
    ) {
        for key in &t.keys {
            if key.key_type.matches(lookup, interner) {
                let value = key.value_types();
                if value.reason().is_terminal() && sentinel.is_none() {
                    *sentinel = Some(value.reason());
                }
                out.extend(value.types().iter().cloned());
            }
        }
        if let Some(elem) = &t.brief_elem {
            let elem = elem.filter_mixed();
            if !elem.is_empty() {
                out.push(Build::new(t.anchor, elem).exact(false).get());
            }
        }
    }

    /// Resolve the value type(s) reachable via a bracket/property access
    /// with `lookup`, across every union member. `None` means element
    /// access (no specific key).
    ///
    /// A nested `get_key` on this same instance while one is pending
    /// returns the circular-reference sentinel immediately.
    pub fn get_key(&self, lookup: Option<&str>, interner: &Interner) -> Mt {
        if self.0.getting_key.get() {
            trace!("re-entrant get_key on in-progress union, breaking cycle");
            return Mt::circular();
        }
        self.0.getting_key.set(true);

        let mut out: TypeList = Vec::new();
        let mut sentinel: Option<Reason> = None;
        for t in self.types().iter() {
            Self::member_key_types(t, lookup, interner, &mut out, &mut sentinel);
        }

        self.0.getting_key.set(false);

        if out.is_empty() {
            if let Some(reason) = sentinel {
                return Mt::sentinel(reason);
            }
        }
        Mt::new(out)
    }

    /// Element access — sugar for `get_key(None)`.
    pub fn get_el(&self, interner: &Interner) -> Mt {
        self.get_key(None, interner)
    }

    /// Lookup through an inferred key union: collapses it to a single
    /// literal when all its names agree, element access otherwise.
    pub fn get_key_of(&self, key_type: &KeyType, interner: &Interner) -> Mt {
        let names = key_type.concrete_names(interner);
        let single = match names.split_first() {
            Some((first, rest))
                if rest.iter().all(|n| n == first)
                    && names.len() == key_type.names.len() =>
            {
                Some(first.clone())
            }
            _ => None,
        };
        self.get_key(single.as_deref(), interner)
    }

    /// Aggregate dynamic-property entries matching `name` across members.
    pub fn get_prop(&self, name: Option<&str>, interner: &Interner) -> Mt {
        let mut out: TypeList = Vec::new();
        for t in self.types().iter() {
            for key in t.props.values() {
                if key.key_type.matches(name, interner) {
                    out.extend(key.value_types().types().iter().cloned());
                }
            }
        }
        Mt::new(out)
    }

    // =========================================================================
    // Literal extraction and projections
    // =========================================================================

    /// The single literal shared by every member — exact equality required
    /// across all of them.
    pub fn get_string_value(&self) -> Option<Atom> {
        let mut shared: Option<Atom> = None;
        for (i, t) in self.types().iter().enumerate() {
            let lit = t.literal?;
            if i > 0 && shared != Some(lit) {
                return None;
            }
            shared = Some(lit);
        }
        shared
    }

    /// Each member's literal, where present.
    pub fn get_string_values(&self) -> Vec<Atom> {
        self.types().iter().filter_map(|t| t.literal).collect()
    }

    /// Deduplicated coarse-classifier projection for interop with a
    /// simpler external type system.
    pub fn brief_types(&self) -> Vec<BriefType> {
        let mut out: Vec<BriefType> = Vec::new();
        for t in self.types().iter() {
            let Some(brief) = t.brief.filter_unknown() else {
                continue;
            };
            if !out.contains(&brief) {
                out.push(brief);
            }
        }
        out
    }

    /// Deduplicated concrete key names across members, for
    /// completion-candidate listing.
    pub fn key_names(&self, interner: &Interner) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for t in self.types().iter() {
            for key in &t.keys {
                for name in key.key_type.concrete_names(interner) {
                    if !out.contains(&name) {
                        out.push(name);
                    }
                }
            }
        }
        out
    }

    /// Names of dynamic properties assigned outside a declared shape.
    pub fn assigned_prop_names(&self) -> Vec<Atom> {
        let mut out: Vec<Atom> = Vec::new();
        for t in self.types().iter() {
            for name in t.props.keys() {
                if !out.contains(name) {
                    out.push(*name);
                }
            }
        }
        out
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    pub fn has_number_indexes(&self) -> bool {
        self.types().iter().any(|t| t.has_number_indexes())
    }

    pub fn is_int(&self) -> bool {
        self.types().iter().any(|t| t.is_number())
    }

    // =========================================================================
    // Wrapping
    // =========================================================================

    /// Wrap this union as the element of a synthesized list: T becomes
    /// T[]. The element union is carried lazily.
    pub fn in_array(&self, anchor: Anchor) -> Rc<DeepType> {
        let elem = self.clone();
        let key = Key::new(KeyType::integer_wildcard(anchor), anchor)
            .value(MtCell::new(move || elem));
        Build::new(anchor, BriefType::array()).keys([key]).get()
    }
}

#[cfg(test)]
#[path = "../tests/mt_tests.rs"]
mod tests;
