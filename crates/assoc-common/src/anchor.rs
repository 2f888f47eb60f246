//! Anchor sites — where a type was inferred.
//!
//! An [`Anchor`] identifies the source location a `DeepType` came from so
//! IDE consumers can navigate to it. The inference core never interprets
//! anchors beyond equality and validity: an invalid anchor marks input
//! that was structurally unusable.

use serde::Serialize;

/// Opaque inference-site handle: file id plus byte span.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Anchor {
    pub file_id: u32,
    pub start: u32,
    pub end: u32,
}

impl Anchor {
    /// Sentinel for structurally unusable input.
    pub const INVALID: Self = Self {
        file_id: u32::MAX,
        start: 0,
        end: 0,
    };

    pub const fn new(file_id: u32, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    pub const fn is_valid(self) -> bool {
        self.file_id != u32::MAX
    }
}
