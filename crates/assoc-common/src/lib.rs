//! Common types and utilities for the deep-assoc inference engine.
//!
//! This crate provides foundational types used across the deep-assoc crates:
//! - String interning (`Atom`, `Interner`)
//! - Anchor sites (`Anchor`) — opaque inference locations
//! - Centralized limits and budget defaults

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Anchor - inference site tracking (file id + byte offsets)
pub mod anchor;
pub use anchor::Anchor;

// Centralized limits and thresholds
pub mod limits;
