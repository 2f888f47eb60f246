//! Centralized limits and budget defaults for the inference engine.
//!
//! These are the caller-facing defaults; each top-level resolution may
//! override them. Centralizing the values here keeps construction sites
//! free of magic numbers and gives every limit one place to be tuned.

/// Default maximum nesting depth for one top-level resolution.
///
/// Each key-value thunk forced beneath another adds one level. At this
/// depth the engine stops expanding and returns the depth-limit sentinel
/// instead of descending further.
pub const DEFAULT_MAX_DEPTH: u32 = 40;

/// Default maximum number of expressions visited per top-level resolution.
///
/// A breadth budget: wide unions with many lazily forced branches can do
/// unbounded work even at shallow depth. Once this many visits have been
/// spent the resolution stops expanding, again yielding the depth-limit
/// sentinel rather than silently truncated data.
pub const DEFAULT_MAX_VISITS: u32 = 7500;

/// Character budget for one nested value inside a tuple rendering.
///
/// `(A, B, C)` renders each position with this budget so a single huge
/// element cannot eat the whole line.
pub const TUPLE_ELEM_RENDER_LEN: usize = 15;

/// Character budget for a raw source-text fragment in the rendering
/// fallback, before truncation.
pub const SRC_TEXT_RENDER_LEN: usize = 40;
