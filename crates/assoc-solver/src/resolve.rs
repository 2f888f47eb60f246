//! Annotation and generic resolution.
//!
//! This module contains the translation phase of shape inference:
//! - Annotation trees to `DeepType`/`Mt` graphs, with deferred field values
//! - Generic-parameter discovery by lock-step structural matching of
//!   declared annotations against actual inferred types
//! - Binding-context construction (function generics from call-site
//!   arguments, class generics from the containing instance)
//! - The four docblock entry points: return type, magic-method return
//!   type, parameter type, magic-property type

use crate::annot::{AnnotNode, ArgDef, ClsInfo, FuncInfo, GenericDef};
use crate::build::Build;
use crate::key::{Key, KeyType};
use crate::lazy::MtCell;
use crate::mt::Mt;
use crate::recursion::ResolutionBudget;
use crate::types::{BriefType, TypeList};
use assoc_common::{Anchor, Atom, Interner};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;
use tracing::trace;

/// Concrete union discovered for each named generic parameter.
pub type GenericBindings = FxHashMap<Atom, TypeList>;

// =============================================================================
// ExprCtx - the upstream expression-resolver boundary
// =============================================================================

/// What the surrounding call site knows. Supplied by upstream expression
/// resolvers; the core never computes these itself.
pub trait ExprCtx {
    /// Inferred union of the actual argument at `order`, if the call
    /// site supplies one.
    fn arg(&self, order: usize) -> Option<Mt>;

    /// Inferred union of the containing instance, for class-level
    /// generics.
    fn this_type(&self) -> Mt;

    /// Argument-less child context. Upstream resolvers use it when
    /// building the return cell of a callable value passed without a
    /// call site of its own.
    fn sub_empty(&self) -> Rc<dyn ExprCtx> {
        Rc::new(EmptyCtx)
    }
}

/// A call site that knows nothing: no arguments, no receiver.
pub struct EmptyCtx;

impl ExprCtx for EmptyCtx {
    fn arg(&self, _order: usize) -> Option<Mt> {
        None
    }

    fn this_type(&self) -> Mt {
        Mt::new(Vec::new())
    }
}

// =============================================================================
// KnownNames - recognized built-in class names
// =============================================================================

/// Pre-interned names of the array-like and callable-like built-ins that
/// get synthesized key entries or return-position treatment.
pub struct KnownNames {
    array_like: FxHashSet<Atom>,
    callable_like: FxHashSet<Atom>,
    plain_array: FxHashSet<Atom>,
}

const ARRAY_LIKE: &[&str] = &[
    "array",
    "iterable",
    "Traversable",
    "ArrayAccess",
    "IteratorAggregate",
    "Iterator",
    "SeekableIterator",
    "Generator",
    "ArrayObject",
    "ArrayIterator",
    "SplDoublyLinkedList",
    "SplQueue",
    "DOMNodeList",
];

const CALLABLE_LIKE: &[&str] = &["callable", "Closure", "function"];

impl KnownNames {
    pub fn new(interner: &Interner) -> Self {
        let mut array_like = FxHashSet::default();
        for name in ARRAY_LIKE {
            array_like.insert(interner.intern(name));
            array_like.insert(interner.intern(&format!("\\{name}")));
        }
        let mut callable_like = FxHashSet::default();
        for name in CALLABLE_LIKE {
            callable_like.insert(interner.intern(name));
            callable_like.insert(interner.intern(&format!("\\{name}")));
        }
        let mut plain_array = FxHashSet::default();
        plain_array.insert(interner.intern("array"));
        plain_array.insert(interner.intern("\\array"));
        Self {
            array_like,
            callable_like,
            plain_array,
        }
    }

    pub fn is_array_like(&self, fqn: Atom) -> bool {
        self.array_like.contains(&fqn)
    }

    pub fn is_callable_like(&self, fqn: Atom) -> bool {
        self.callable_like.contains(&fqn)
    }

    pub fn is_plain_array(&self, fqn: Atom) -> bool {
        self.plain_array.contains(&fqn)
    }
}

// =============================================================================
// ResolveCtx - resolution state threaded through every step
// =============================================================================

/// Interner, recognized names, and work budget for one top-level
/// resolution. Cloned into every deferred value the resolution creates,
/// so later forcing draws from the same budget.
#[derive(Clone)]
pub struct ResolveCtx {
    pub interner: Rc<Interner>,
    pub known: Rc<KnownNames>,
    pub budget: Rc<ResolutionBudget>,
    depth: u32,
}

impl ResolveCtx {
    pub fn new(interner: Rc<Interner>, budget: Rc<ResolutionBudget>) -> Self {
        let known = Rc::new(KnownNames::new(&interner));
        Self {
            interner,
            known,
            budget,
            depth: 0,
        }
    }

    pub fn deeper(&self) -> Self {
        let mut child = self.clone();
        child.depth += 1;
        child
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

// =============================================================================
// Annotation -> DeepType resolution
// =============================================================================

/// Deferred resolution of `node`, budget-checked at force time: the cell
/// yields the depth-limit sentinel once either budget is spent.
fn deferred_resolve(
    node: Rc<AnnotNode>,
    anchor: Anchor,
    bindings: Rc<GenericBindings>,
    ctx: ResolveCtx,
) -> MtCell {
    MtCell::new(move || {
        if ctx.budget.enter(ctx.depth).is_denied() {
            return Mt::depth_limit();
        }
        Mt::new(resolve_annot(&node, anchor, &bindings, &ctx))
    })
}

/// Synthesized key entries for an array-like class reference: one generic
/// argument gives list semantics, two give map semantics.
fn array_like_keys(
    generics: &[Rc<AnnotNode>],
    anchor: Anchor,
    bindings: &Rc<GenericBindings>,
    ctx: &ResolveCtx,
) -> Vec<Key> {
    match generics {
        [elem] => {
            let key = Key::new(KeyType::integer_wildcard(anchor), anchor).value(deferred_resolve(
                Rc::clone(elem),
                anchor,
                Rc::clone(bindings),
                ctx.deeper(),
            ));
            vec![key]
        }
        [key_annot, val_annot] => {
            let key_types = resolve_annot(key_annot, anchor, bindings, &ctx.deeper());
            let key_type = KeyType::from_mt(&Mt::new(key_types), anchor, &ctx.interner);
            let key = Key::new(key_type, anchor).value(deferred_resolve(
                Rc::clone(val_annot),
                anchor,
                Rc::clone(bindings),
                ctx.deeper(),
            ));
            vec![key]
        }
        _ => Vec::new(),
    }
}

fn resolve_cls(
    fqn: Atom,
    generics: &[Rc<AnnotNode>],
    anchor: Anchor,
    bindings: &Rc<GenericBindings>,
    ctx: &ResolveCtx,
) -> TypeList {
    // A bound generic parameter name is a parameter reference, not a
    // type constructor: substitute the bound union directly.
    if let Some(bound) = bindings.get(&fqn) {
        trace!(?fqn, members = bound.len(), "substituting bound generic");
        return bound.clone();
    }

    let brief = if ctx.known.is_plain_array(fqn) {
        BriefType::array()
    } else {
        BriefType::class(fqn)
    };

    // Generic arguments ride the same budget-checked cells as key
    // values: forcing one under a spent budget yields the depth-limit
    // sentinel, never an empty OK union.
    let generic_cells: Vec<MtCell> = generics
        .iter()
        .map(|g| deferred_resolve(Rc::clone(g), anchor, Rc::clone(bindings), ctx.deeper()))
        .collect();

    let keys = if ctx.known.is_array_like(fqn) {
        array_like_keys(generics, anchor, bindings, ctx)
    } else {
        Vec::new()
    };

    vec![
        Build::new(anchor, brief)
            .exact(false)
            .generics(generic_cells)
            .keys(keys)
            .get(),
    ]
}

/// Translate an annotation node into shape alternatives, resolving
/// generic parameters against `bindings`.
///
/// Malformed or unsupported sub-branches degrade to an empty list without
/// aborting sibling branches.
pub fn resolve_annot(
    node: &AnnotNode,
    anchor: Anchor,
    bindings: &Rc<GenericBindings>,
    ctx: &ResolveCtx,
) -> TypeList {
    match node {
        AnnotNode::Assoc { fields } => {
            let keys = fields.iter().map(|field| {
                Key::new(KeyType::string(field.name, anchor), anchor)
                    .value(deferred_resolve(
                        Rc::clone(&field.value),
                        anchor,
                        Rc::clone(bindings),
                        ctx.deeper(),
                    ))
                    .comments(field.comments.clone())
            });
            vec![
                Build::new(anchor, BriefType::array())
                    .exact(false)
                    .keys(keys)
                    .get(),
            ]
        }
        AnnotNode::Cls { fqn, generics } => resolve_cls(*fqn, generics, anchor, bindings, ctx),
        AnnotNode::Multi { alts } => {
            // One flat union: alternatives concatenate, never nest.
            alts.iter()
                .flat_map(|alt| resolve_annot(alt, anchor, bindings, ctx))
                .collect()
        }
        AnnotNode::Prim { brief, literal } => {
            let mut build = Build::new(anchor, brief.clone()).exact(false);
            if let Some(lit) = literal {
                build = build.literal(*lit);
            }
            vec![build.get()]
        }
    }
}

// =============================================================================
// Generic-parameter discovery
// =============================================================================

fn return_union(actual: &Mt) -> Mt {
    let types: TypeList = actual
        .types()
        .iter()
        .flat_map(|t| t.return_types().types().iter().cloned().collect::<Vec<_>>())
        .collect();
    Mt::new(types)
}

/// Walk declared-annotation structure and actual-inferred-type structure
/// in lock-step to find what concrete union `target` binds to.
///
/// A parameter may be discovered from several positions; all discoveries
/// concatenate into one union — never overwritten.
pub fn discover_generic(
    declared: &AnnotNode,
    actual: &Mt,
    target: Atom,
    ctx: &ResolveCtx,
) -> TypeList {
    if ctx.budget.enter(ctx.depth).is_denied() {
        return Vec::new();
    }
    let AnnotNode::Cls { fqn, generics } = declared else {
        return Vec::new();
    };

    // Direct reference to the parameter itself.
    if *fqn == target {
        return actual.types().iter().cloned().collect();
    }

    if ctx.known.is_array_like(*fqn) {
        return match generics.as_slice() {
            [elem] => discover_generic(elem, &actual.get_el(&ctx.interner), target, &ctx.deeper()),
            [key_annot, val_annot] => {
                let key_types: TypeList = actual
                    .types()
                    .iter()
                    .flat_map(|t| {
                        t.keys
                            .iter()
                            .flat_map(|k| k.key_type.as_types(&ctx.interner))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                let mut out =
                    discover_generic(key_annot, &Mt::new(key_types), target, &ctx.deeper());
                out.extend(discover_generic(
                    val_annot,
                    &actual.get_el(&ctx.interner),
                    target,
                    &ctx.deeper(),
                ));
                out
            }
            _ => Vec::new(),
        };
    }

    if ctx.known.is_callable_like(*fqn) {
        // callable<TArg1, TArg2, TRet> - the last generic argument is the
        // return-type position.
        return generics
            .last()
            .map(|ret| discover_generic(ret, &return_union(actual), target, &ctx.deeper()))
            .unwrap_or_default();
    }

    // Structural recursion: pair each declared generic position with the
    // corresponding position in the actual type's own generics list.
    let mut out = TypeList::new();
    for (i, declared_arg) in generics.iter().enumerate() {
        for t in actual.types().iter() {
            if let Some(actual_arg) = t.generic_arg(i) {
                out.extend(discover_generic(declared_arg, &actual_arg, target, &ctx.deeper()));
            }
        }
    }
    out
}

// =============================================================================
// Binding-context construction
// =============================================================================

/// Class-level generics bind positionally from the containing instance's
/// own recorded generic-argument list.
fn class_bindings(
    generics: &[GenericDef],
    expr: &dyn ExprCtx,
    bindings: &mut GenericBindings,
) {
    let this = expr.this_type();
    for (i, g) in generics.iter().enumerate() {
        let mut discovered = TypeList::new();
        for t in this.types().iter() {
            if let Some(arg) = t.generic_arg(i) {
                discovered.extend(arg.types().iter().cloned());
            }
        }
        bindings.entry(g.name).or_default().extend(discovered);
    }
}

/// Function-level generics bind by matching each declared parameter's
/// annotation against the actual argument at the call site.
fn func_bindings(info: &FuncInfo, expr: &dyn ExprCtx, ctx: &ResolveCtx, bindings: &mut GenericBindings) {
    for g in &info.func_generics {
        let mut discovered = TypeList::new();
        for param in &info.params {
            let (Some(order), Some(annot)) = (param.order, param.annot.as_ref()) else {
                continue;
            };
            let Some(arg_mt) = expr.arg(order) else {
                continue;
            };
            discovered.extend(discover_generic(annot, &arg_mt, g.name, ctx));
        }
        trace!(generic = ?g.name, members = discovered.len(), "discovered function generic");
        bindings.entry(g.name).or_default().extend(discovered);
    }
}

fn bindings_for(info: &FuncInfo, expr: &dyn ExprCtx, ctx: &ResolveCtx) -> GenericBindings {
    let mut bindings = GenericBindings::default();
    func_bindings(info, expr, ctx, &mut bindings);
    class_bindings(&info.class_generics, expr, &mut bindings);
    bindings
}

// =============================================================================
// Entry points
// =============================================================================

fn resolved_or_failed(types: TypeList) -> Mt {
    if types.is_empty() {
        Mt::failed()
    } else {
        Mt::new(types)
    }
}

/// Resolve a function/method's documented return type.
pub fn resolve_return(info: &FuncInfo, expr: &dyn ExprCtx, ctx: &ResolveCtx) -> Mt {
    if !info.anchor.is_valid() {
        return Mt::invalid();
    }
    let Some(node) = &info.return_annot else {
        return Mt::failed();
    };
    let bindings = Rc::new(bindings_for(info, expr, ctx));
    resolved_or_failed(resolve_annot(node, info.anchor, &bindings, ctx))
}

/// Resolve a documented but undeclared ("magic") method's return type.
pub fn resolve_magic_return(
    cls: &ClsInfo,
    method: Atom,
    expr: &dyn ExprCtx,
    ctx: &ResolveCtx,
) -> Mt {
    if !cls.anchor.is_valid() {
        return Mt::invalid();
    }
    match cls.magic_methods.get(&method) {
        Some(info) => resolve_return(info, expr, ctx),
        None => Mt::failed(),
    }
}

/// Resolve a documented parameter's type by name. The empty-name
/// placeholder applies to any parameter (single-parameter shorthand).
pub fn resolve_param(info: &FuncInfo, var_name: Atom, expr: &dyn ExprCtx, ctx: &ResolveCtx) -> Mt {
    if !info.anchor.is_valid() {
        return Mt::invalid();
    }
    let bindings = Rc::new(bindings_for(info, expr, ctx));
    let mut out = TypeList::new();
    for param in &info.params {
        let applies = match param.name {
            Some(name) => name == var_name,
            None => true,
        };
        if !applies {
            continue;
        }
        if let Some(annot) = &param.annot {
            out.extend(resolve_annot(annot, info.anchor, &bindings, ctx));
        }
    }
    resolved_or_failed(out)
}

/// Resolve a documented dynamic property's type by name. Only class-level
/// generics are in scope for property annotations.
pub fn resolve_magic_prop(cls: &ClsInfo, name: Atom, expr: &dyn ExprCtx, ctx: &ResolveCtx) -> Mt {
    if !cls.anchor.is_valid() {
        return Mt::invalid();
    }
    let mut bindings = GenericBindings::default();
    class_bindings(&cls.generics, expr, &mut bindings);
    let bindings = Rc::new(bindings);

    let Some(ArgDef {
        annot: Some(annot), ..
    }) = cls.magic_props.get(&name)
    else {
        return Mt::failed();
    };
    resolved_or_failed(resolve_annot(annot, cls.anchor, &bindings, ctx))
}

#[cfg(test)]
#[path = "../tests/resolve_tests.rs"]
mod tests;
