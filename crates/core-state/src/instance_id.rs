//! Per-instance identifiers used to associate labels with their inputs.
//!
//! Each component kind owns a `static InstanceIdCounter`; mounting an
//! instance takes the next value. Ids are never reused, so they stay unique
//! for the lifetime of every instance without any release bookkeeping.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct InstanceIdCounter {
    next: AtomicU64,
}

impl Default for InstanceIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceIdCounter {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    pub fn allocate(&self) -> InstanceId {
        InstanceId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Build the element id `<prefix>-<id>` for an instance.
    pub fn element_id(prefix: &str, id: InstanceId) -> String {
        format!("{prefix}-{id}")
    }
}
