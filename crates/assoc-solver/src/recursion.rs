//! Budgets and cycle guards for recursive shape resolution.
//!
//! One module owns every way a recursive computation is stopped early:
//!
//! 1. **Depth budget** — a maximum nesting depth per top-level resolution
//! 2. **Visit budget** — a maximum count of expressions visited, bounding
//!    total work in a universe of reachable expressions that is otherwise
//!    unbounded
//! 3. **In-progress membership** — the cycle-breakers: an instance-local
//!    flag on each union for key lookup, an identity visited-set threaded
//!    through rendering, and re-entrant forcing of a lazy cell
//!
//! All three degrade to a *value* (a sentinel-tagged empty union), never
//! to an error. Budget exhaustion maps to the depth-limit sentinel and is
//! sticky: once either budget is spent the resolution must stop expanding
//! rather than continue or silently truncate data.
//!
//! # Threading contract
//!
//! Evaluation is strictly single-threaded, cooperative, and pull-based.
//! The guards here use `Cell`/`Rc` and are *cycle-breakers, not locks*:
//! they are sound only because no second call stack ever re-enters a
//! resolution in flight.

use crate::types::DeepType;
use assoc_common::limits::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_VISITS};
use rustc_hash::FxHashSet;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

// ---------------------------------------------------------------------------
// EnterResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter one step of a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterResult {
    /// Proceed with the computation.
    Entered,
    /// Maximum nesting depth reached.
    DepthExceeded,
    /// Total visit budget spent.
    VisitsExceeded,
}

impl EnterResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    /// `true` if entry was denied for any reason.
    #[inline]
    pub fn is_denied(self) -> bool {
        !self.is_entered()
    }
}

// ---------------------------------------------------------------------------
// ResolutionBudget
// ---------------------------------------------------------------------------

/// Caller-supplied work bounds for one top-level resolution.
///
/// Shared (`Rc`) by every thunk the resolution creates, so a deep lookup
/// chain forced later still draws from the same budget. Interior
/// mutability via `Cell` — single-threaded, see the module doc.
pub struct ResolutionBudget {
    max_depth: u32,
    max_visits: u32,
    visits: Cell<u32>,
    exhausted: Cell<bool>,
}

impl Default for ResolutionBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_VISITS)
    }
}

impl ResolutionBudget {
    pub fn new(max_depth: u32, max_visits: u32) -> Self {
        Self {
            max_depth,
            max_visits,
            visits: Cell::new(0),
            exhausted: Cell::new(false),
        }
    }

    /// Shared default-budget handle.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Account for one expression visit at the given nesting depth.
    pub fn enter(&self, depth: u32) -> EnterResult {
        let visits = self.visits.get().saturating_add(1);
        self.visits.set(visits);

        if self.exhausted.get() || visits > self.max_visits {
            if !self.exhausted.get() {
                trace!(visits, max = self.max_visits, "visit budget exhausted");
            }
            self.exhausted.set(true);
            return EnterResult::VisitsExceeded;
        }
        if depth >= self.max_depth {
            trace!(depth, max = self.max_depth, "depth budget exhausted");
            return EnterResult::DepthExceeded;
        }
        EnterResult::Entered
    }

    /// Whether the visit budget has been spent.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.get()
    }

    /// Visits spent so far.
    pub fn visits(&self) -> u32 {
        self.visits.get()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

// ---------------------------------------------------------------------------
// RenderGuard
// ---------------------------------------------------------------------------

/// Identity-keyed in-progress set for rendering.
///
/// A union's member set is added for the duration of one rendering call
/// and removed before returning; re-encountering any member mid-render
/// means the value reaches itself and is drawn as a fixed circular
/// marker. Keys are member identities (`Rc` pointers), matching the
/// lifetime of one resolution request.
#[derive(Default)]
pub struct RenderGuard {
    visiting: FxHashSet<*const DeepType>,
}

impl RenderGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any of `types` already being rendered?
    pub fn any_visiting(&self, types: &[Rc<DeepType>]) -> bool {
        types
            .iter()
            .any(|t| self.visiting.contains(&Rc::as_ptr(t)))
    }

    /// Mark `types` as in progress.
    pub fn mark(&mut self, types: &[Rc<DeepType>]) {
        for t in types {
            self.visiting.insert(Rc::as_ptr(t));
        }
    }

    /// Unmark `types` after the rendering call completes.
    pub fn unmark(&mut self, types: &[Rc<DeepType>]) {
        for t in types {
            self.visiting.remove(&Rc::as_ptr(t));
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
