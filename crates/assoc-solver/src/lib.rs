//! Lazy union-typed shape inference core.
//!
//! This crate computes, for a program expression, the set of runtime shapes
//! it may take — which keys an associative array has, what value type each
//! key maps to, element types of lists — recursively through generic type
//! parameters and documented annotations. It uses:
//!
//! - **Lazy memoized cells**: every key value and every union's member list
//!   is a thunk forced at most once; branches nobody asks for are never
//!   computed
//! - **Value-level sentinels**: cycles, budget exhaustion, and unresolvable
//!   input degrade to empty unions tagged with a [`Reason`], never to
//!   errors or panics
//! - **Cycle detection**: an in-progress marker per union for key lookup,
//!   an identity visited-set for rendering, both owned by the `recursion`
//!   module
//!
//! Parsing and IDE integration live upstream; this crate is handed
//! pre-parsed annotation trees ([`annot::AnnotNode`]) and already-inferred
//! unions ([`Mt`]) and composes, dereferences, and renders them.

pub mod annot;
pub mod build;
pub mod format;
pub mod key;
pub mod lazy;
pub mod logging;
pub mod mt;
pub mod recursion;
pub mod resolve;
pub mod types;

pub use build::Build;
pub use key::{Key, KeyName, KeyType};
pub use lazy::MtCell;
pub use logging::init_tracing;
pub use mt::Mt;
pub use recursion::{EnterResult, RenderGuard, ResolutionBudget};
pub use resolve::{EmptyCtx, ExprCtx, GenericBindings, ResolveCtx};
pub use types::{BriefType, DeepType, Reason};
