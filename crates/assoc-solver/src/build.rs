//! `Build` — the sole construction path for [`DeepType`].
//!
//! Centralizing construction keeps the invariants (immutability after
//! build, consistent key ordering) in one place. `get()` yields the
//! shared shape; `mt()` wraps it as a one-member union for call-site
//! uniformity.

use crate::key::Key;
use crate::lazy::MtCell;
use crate::mt::Mt;
use crate::types::{BriefType, DeepType};
use assoc_common::{Anchor, Atom};
use indexmap::IndexMap;
use std::rc::Rc;

pub struct Build {
    anchor: Anchor,
    brief: BriefType,
    brief_elem: Option<BriefType>,
    exact: bool,
    literal: Option<Atom>,
    cst_name: Option<Atom>,
    keys: Vec<Key>,
    props: IndexMap<Atom, Key>,
    generics: Vec<MtCell>,
    returns: Option<MtCell>,
    src_text: Option<Atom>,
}

impl Build {
    pub fn new(anchor: Anchor, brief: BriefType) -> Self {
        Self {
            anchor,
            brief,
            brief_elem: None,
            exact: true,
            literal: None,
            cst_name: None,
            keys: Vec::new(),
            props: IndexMap::new(),
            generics: Vec::new(),
            returns: None,
            src_text: None,
        }
    }

    /// Literally observed (true, the default) vs annotation-declared.
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn literal(mut self, literal: Atom) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn cst_name(mut self, cst_name: Atom) -> Self {
        self.cst_name = Some(cst_name);
        self
    }

    /// Ordered record fields; insertion order is preserved.
    pub fn keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn props(mut self, props: impl IntoIterator<Item = (Atom, Key)>) -> Self {
        self.props.extend(props);
        self
    }

    /// Position-indexed generic type arguments, each a lazy cell forced
    /// on first access.
    pub fn generics(mut self, generics: impl IntoIterator<Item = MtCell>) -> Self {
        self.generics.extend(generics);
        self
    }

    /// Element classifier of an untyped list.
    pub fn brief_elem(mut self, brief_elem: BriefType) -> Self {
        self.brief_elem = Some(brief_elem);
        self
    }

    /// Lazily resolved return union for callable-shaped values.
    pub fn returns(mut self, returns: MtCell) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn src_text(mut self, src_text: Atom) -> Self {
        self.src_text = Some(src_text);
        self
    }

    pub fn get(self) -> Rc<DeepType> {
        Rc::new(DeepType {
            anchor: self.anchor,
            brief: self.brief,
            brief_elem: self.brief_elem,
            exact: self.exact,
            literal: self.literal,
            cst_name: self.cst_name,
            keys: self.keys,
            props: self.props,
            generics: self.generics,
            returns: self.returns,
            src_text: self.src_text,
        })
    }

    /// One-member union, for call sites that compose unions.
    pub fn mt(self) -> Mt {
        Mt::single(self.get())
    }
}
