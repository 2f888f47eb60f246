//! Lazy memoized cells backing key values and union member lists.
//!
//! Every deferred value is a cell holding either "not yet evaluated",
//! "being evaluated right now", or "evaluated(result)". Evaluation is
//! triggered on first access and the result cached for the cell's
//! lifetime, so only branches a caller actually inspects are ever
//! computed. A re-entrant force — the thunk transitively forcing its own
//! cell — is a cycle, and degrades to the circular-reference sentinel
//! instead of looping.
//!
//! Single-threaded by construction (`RefCell`); see `recursion` for the
//! engine-wide threading contract.

use crate::mt::Mt;
use crate::types::TypeList;
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// MtCell - lazy memoized union value
// =============================================================================

enum CellState {
    Pending(Box<dyn FnOnce() -> Mt>),
    Forcing,
    Done(Mt),
}

/// A deferred computation yielding an [`Mt`], forced at most once.
///
/// This is the value slot of a [`crate::Key`]: building a shape for a
/// large record must not force every field unless that field is looked
/// up.
pub struct MtCell {
    state: RefCell<CellState>,
}

impl MtCell {
    /// Defer `thunk` until the first [`force`](Self::force).
    pub fn new(thunk: impl FnOnce() -> Mt + 'static) -> Self {
        Self {
            state: RefCell::new(CellState::Pending(Box::new(thunk))),
        }
    }

    /// Wrap an already-computed union.
    pub fn ready(mt: Mt) -> Self {
        Self {
            state: RefCell::new(CellState::Done(mt)),
        }
    }

    /// Run the thunk if it has not run yet and return the cached union.
    ///
    /// A re-entrant call while the thunk is still running returns the
    /// circular-reference sentinel.
    pub fn force(&self) -> Mt {
        {
            let state = self.state.borrow();
            match &*state {
                CellState::Done(mt) => return mt.clone(),
                CellState::Forcing => return Mt::circular(),
                CellState::Pending(_) => {}
            }
        }
        let thunk = match std::mem::replace(&mut *self.state.borrow_mut(), CellState::Forcing) {
            CellState::Pending(thunk) => thunk,
            CellState::Forcing => return Mt::circular(),
            CellState::Done(mt) => {
                *self.state.borrow_mut() = CellState::Done(mt.clone());
                return mt;
            }
        };
        let mt = thunk();
        *self.state.borrow_mut() = CellState::Done(mt.clone());
        mt
    }

    /// Whether the cell has been forced already.
    pub fn is_forced(&self) -> bool {
        matches!(&*self.state.borrow(), CellState::Done(_))
    }
}

// =============================================================================
// LazySeq - memoized member list of a union
// =============================================================================

enum SeqState {
    Pending(Box<dyn FnOnce() -> TypeList>),
    Forcing,
    Done(Rc<TypeList>),
}

/// Lazily produced, memoized member list.
///
/// The backing sequence is computed once even if iterated many times;
/// once computed it never changes. Re-entrant forcing yields an empty
/// list (the cycle surfaces through [`MtCell`] or the `get_key` guard,
/// whichever broke it).
pub struct LazySeq {
    state: RefCell<SeqState>,
}

impl LazySeq {
    pub fn new(thunk: impl FnOnce() -> TypeList + 'static) -> Self {
        Self {
            state: RefCell::new(SeqState::Pending(Box::new(thunk))),
        }
    }

    pub fn ready(types: TypeList) -> Self {
        Self {
            state: RefCell::new(SeqState::Done(Rc::new(types))),
        }
    }

    pub fn force(&self) -> Rc<TypeList> {
        {
            let state = self.state.borrow();
            match &*state {
                SeqState::Done(types) => return Rc::clone(types),
                SeqState::Forcing => return Rc::new(Vec::new()),
                SeqState::Pending(_) => {}
            }
        }
        let thunk = match std::mem::replace(&mut *self.state.borrow_mut(), SeqState::Forcing) {
            SeqState::Pending(thunk) => thunk,
            SeqState::Forcing => return Rc::new(Vec::new()),
            SeqState::Done(types) => {
                let out = Rc::clone(&types);
                *self.state.borrow_mut() = SeqState::Done(types);
                return out;
            }
        };
        let types = Rc::new(thunk());
        *self.state.borrow_mut() = SeqState::Done(Rc::clone(&types));
        types
    }
}

#[cfg(test)]
#[path = "../tests/lazy_tests.rs"]
mod tests;
