//! Core type representation: `DeepType`, `BriefType`, `Reason`.
//!
//! A [`DeepType`] is one concrete inferred shape — a scalar or literal, an
//! array-like value with keys, or an object with generic arguments. Unions
//! of alternatives are represented by [`crate::Mt`]; record entries by
//! [`crate::Key`]. `DeepType` is immutable after construction through
//! [`crate::Build`], which is the only construction path.

use crate::key::{Key, KeyName};
use crate::lazy::MtCell;
use crate::mt::Mt;
use assoc_common::{Anchor, Atom};
use bitflags::bitflags;
use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;
use std::rc::Rc;

// =============================================================================
// Reason - sentinel tags for degenerate unions
// =============================================================================

/// Why a union has the members it has.
///
/// `Ok` is the normal case. The other four tag terminal, empty-member
/// unions; downstream code treats all of them uniformly as "no further
/// information available", never as a failure requiring abort.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Reason {
    /// Normal resolution.
    Ok,
    /// A cycle was detected and broken.
    CircularReference,
    /// Resolution was attempted but produced nothing.
    FailedToResolve,
    /// Depth or visit budget exhausted.
    DepthLimit,
    /// The input anchor was structurally unusable.
    InvalidPsi,
}

impl Reason {
    /// `true` for the four terminal sentinel reasons.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ok)
    }
}

// =============================================================================
// BriefType - coarse structural classifier
// =============================================================================

bitflags! {
    /// Scalar-kind component of a [`BriefType`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BriefFlags: u16 {
        const INT      = 1 << 0;
        const FLOAT    = 1 << 1;
        const STRING   = 1 << 2;
        const BOOL     = 1 << 3;
        const NULL     = 1 << 4;
        const ARRAY    = 1 << 5;
        const CALLABLE = 1 << 6;
        /// Unknown/any — filtered out of interop projections.
        const MIXED    = 1 << 7;
    }
}

/// Coarse structural classifier: a set of scalar kinds plus class FQNs.
///
/// This is the "brief type" — the projection handed to simpler external
/// type systems and used for summaries. It deliberately carries no deep
/// structure; keys and generics live on [`DeepType`] itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BriefType {
    pub flags: BriefFlags,
    pub classes: SmallVec<[Atom; 1]>,
}

impl Default for BriefType {
    fn default() -> Self {
        Self {
            flags: BriefFlags::empty(),
            classes: SmallVec::new(),
        }
    }
}

impl BriefType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(flags: BriefFlags) -> Self {
        Self {
            flags,
            classes: SmallVec::new(),
        }
    }

    pub fn int() -> Self {
        Self::of(BriefFlags::INT)
    }

    pub fn float() -> Self {
        Self::of(BriefFlags::FLOAT)
    }

    pub fn string() -> Self {
        Self::of(BriefFlags::STRING)
    }

    pub fn bool() -> Self {
        Self::of(BriefFlags::BOOL)
    }

    pub fn array() -> Self {
        Self::of(BriefFlags::ARRAY)
    }

    pub fn mixed() -> Self {
        Self::of(BriefFlags::MIXED)
    }

    /// Classifier for an instance of the named class.
    pub fn class(fqn: Atom) -> Self {
        let mut classes = SmallVec::new();
        classes.push(fqn);
        Self {
            flags: BriefFlags::empty(),
            classes,
        }
    }

    /// Fold another classifier into this one (set union).
    pub fn add(&mut self, other: &Self) {
        self.flags |= other.flags;
        for &fqn in &other.classes {
            if !self.classes.contains(&fqn) {
                self.classes.push(fqn);
            }
        }
    }

    /// Copy with the MIXED flag stripped (interop projections drop it).
    pub fn filter_mixed(&self) -> Self {
        let mut out = self.clone();
        out.flags.remove(BriefFlags::MIXED);
        out
    }

    /// MIXED-stripped copy, or `None` when nothing informative remains.
    /// Projections use this to drop information-free members entirely.
    pub fn filter_unknown(&self) -> Option<Self> {
        let out = self.filter_mixed();
        if out.is_empty() { None } else { Some(out) }
    }

    pub fn is_int(&self) -> bool {
        self.flags.contains(BriefFlags::INT)
    }

    pub fn is_float(&self) -> bool {
        self.flags.contains(BriefFlags::FLOAT)
    }

    /// Numeric in the loose sense: int or float.
    pub fn is_number(&self) -> bool {
        self.flags.intersects(BriefFlags::INT | BriefFlags::FLOAT)
    }

    pub fn is_string(&self) -> bool {
        self.flags.contains(BriefFlags::STRING)
    }

    pub fn is_bool(&self) -> bool {
        self.flags.contains(BriefFlags::BOOL)
    }

    pub fn is_array(&self) -> bool {
        self.flags.contains(BriefFlags::ARRAY)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.classes.is_empty()
    }
}

// =============================================================================
// DeepType - one concrete inferred shape
// =============================================================================

/// One concrete inferred shape.
///
/// Built exclusively through [`crate::Build`]; immutable afterwards and
/// shared as `Rc<DeepType>`. A shape records where it was inferred
/// (`anchor`), how (`exact`: literally observed vs annotation-declared),
/// its coarse classifier, and whichever structure applies: literal value,
/// record keys, dynamic properties, generic arguments, return union.
pub struct DeepType {
    /// Where this shape was inferred — opaque to the core.
    pub anchor: Anchor,
    /// Coarse structural classifier.
    pub brief: BriefType,
    /// Element classifier of an untyped list (`int[]` knows its elements
    /// are INT without materializing keys).
    pub brief_elem: Option<BriefType>,
    /// Literally observed (true) vs annotation-declared (false).
    pub exact: bool,
    /// Known literal value, stored as its source text (`"5"`, `"ab"`).
    pub literal: Option<Atom>,
    /// Named constant the literal came from, rendered by name.
    pub cst_name: Option<Atom>,
    /// Ordered record fields. Entries may overlap: two assignments to the
    /// same key in different branches both appear; lookups aggregate.
    pub keys: Vec<Key>,
    /// Object properties assigned outside a declared shape.
    pub props: IndexMap<Atom, Key>,
    /// Generic type arguments, position-indexed. Lazily resolved like
    /// key values; forcing one under a spent budget yields the
    /// depth-limit sentinel.
    pub generics: Vec<MtCell>,
    /// Lazily resolved return union, for callable-shaped values.
    pub returns: Option<MtCell>,
    /// Raw source text of the anchor expression, for rendering fallback.
    pub src_text: Option<Atom>,
}

impl DeepType {
    /// Any key entry admits integer indexes.
    pub fn has_number_indexes(&self) -> bool {
        self.keys.iter().any(|k| {
            k.key_type
                .names
                .iter()
                .any(|n| matches!(n, KeyName::Int(_) | KeyName::AnyInt))
        })
    }

    /// Has list semantics: either a typed element classifier or an
    /// integer-wildcard key entry.
    pub fn has_list_elems(&self) -> bool {
        self.brief_elem.as_ref().is_some_and(|b| !b.is_empty())
            || self
                .keys
                .iter()
                .any(|k| k.key_type.names.iter().any(|n| matches!(n, KeyName::AnyInt)))
    }

    pub fn is_number(&self) -> bool {
        self.brief.is_number()
    }

    /// Force (or fetch) the generic argument at position `i`.
    pub fn generic_arg(&self, i: usize) -> Option<Mt> {
        self.generics.get(i).map(MtCell::force)
    }

    /// Return union of a callable-shaped value, if recorded.
    pub fn return_types(&self) -> Mt {
        match &self.returns {
            Some(cell) => cell.force(),
            None => Mt::failed(),
        }
    }
}

/// `DeepType` alternatives are grouped into unions; keep the alias close
/// to the construction sites.
pub type TypeList = Vec<Rc<DeepType>>;

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
