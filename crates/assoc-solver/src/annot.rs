//! Pre-parsed annotation trees and docblock signatures.
//!
//! The upstream documentation parser hands the core these structures; no
//! source text is parsed here. [`AnnotNode`] is a closed sum — adding an
//! annotation kind is a compile-time-checked, exhaustive change across
//! the resolver.

use crate::types::BriefType;
use assoc_common::{Anchor, Atom};
use indexmap::IndexMap;
use std::rc::Rc;

/// One field of a record-shape annotation: `{name: value}`.
pub struct AssocField {
    pub name: Atom,
    pub value: Rc<AnnotNode>,
    /// Doc comment lines attached to the field.
    pub comments: Vec<String>,
}

/// A structured type-annotation node.
pub enum AnnotNode {
    /// Record shape with an explicit field list: `array{a: int, b: string}`.
    Assoc { fields: Vec<AssocField> },
    /// Class reference with generic arguments: `Collection<T>`. The name
    /// may itself be a bound generic parameter.
    Cls {
        fqn: Atom,
        generics: Vec<Rc<AnnotNode>>,
    },
    /// Union of alternatives: `int|string`.
    Multi { alts: Vec<Rc<AnnotNode>> },
    /// Primitive or literal: `int`, `'draft'`, `5`.
    Prim {
        brief: BriefType,
        literal: Option<Atom>,
    },
}

impl AnnotNode {
    pub fn prim(brief: BriefType) -> Rc<Self> {
        Rc::new(Self::Prim {
            brief,
            literal: None,
        })
    }

    pub fn prim_literal(brief: BriefType, literal: Atom) -> Rc<Self> {
        Rc::new(Self::Prim {
            brief,
            literal: Some(literal),
        })
    }

    pub fn cls(fqn: Atom, generics: Vec<Rc<AnnotNode>>) -> Rc<Self> {
        Rc::new(Self::Cls { fqn, generics })
    }

    pub fn assoc(fields: Vec<AssocField>) -> Rc<Self> {
        Rc::new(Self::Assoc { fields })
    }

    pub fn multi(alts: Vec<Rc<AnnotNode>>) -> Rc<Self> {
        Rc::new(Self::Multi { alts })
    }
}

/// A declared generic parameter: `@template T`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenericDef {
    pub name: Atom,
}

/// A documented parameter: `@param array<string> $items`.
pub struct ArgDef {
    /// `None` is the single-parameter shorthand placeholder — it applies
    /// to any parameter.
    pub name: Option<Atom>,
    /// Declared position, for pairing with call-site arguments.
    pub order: Option<usize>,
    pub annot: Option<Rc<AnnotNode>>,
}

/// Parsed signature of one function/method docblock.
pub struct FuncInfo {
    pub anchor: Anchor,
    /// Generics declared on the containing class, bound positionally from
    /// the instance's own generic arguments.
    pub class_generics: Vec<GenericDef>,
    /// Generics declared on the function, bound from call-site arguments.
    pub func_generics: Vec<GenericDef>,
    pub params: Vec<ArgDef>,
    pub return_annot: Option<Rc<AnnotNode>>,
}

impl FuncInfo {
    pub fn new(anchor: Anchor) -> Self {
        Self {
            anchor,
            class_generics: Vec::new(),
            func_generics: Vec::new(),
            params: Vec::new(),
            return_annot: None,
        }
    }
}

/// Parsed class-level docblock: generics plus documented-but-undeclared
/// ("magic") members.
pub struct ClsInfo {
    pub anchor: Anchor,
    pub generics: Vec<GenericDef>,
    pub magic_methods: IndexMap<Atom, FuncInfo>,
    pub magic_props: IndexMap<Atom, ArgDef>,
}

impl ClsInfo {
    pub fn new(anchor: Anchor) -> Self {
        Self {
            anchor,
            generics: Vec::new(),
            magic_methods: IndexMap::new(),
            magic_props: IndexMap::new(),
        }
    }
}
