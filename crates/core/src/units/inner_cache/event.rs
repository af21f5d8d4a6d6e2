//! Per-access event records.
//!
//! [`InnerCache::observe`](super::InnerCache::observe) returns an
//! [`AccessEvent`] describing everything the access changed, so a caller can
//! keep its own counters without implementing a [`StatsSink`](crate::stats::StatsSink).

use serde::Serialize;

use crate::common::{PhysAddr, VirtAddr};

/// Whether the observed translation was already resident with the same mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessOutcome {
    /// Resident and matching.
    Hit,
    /// Absent, or resident with a different physical address.
    Miss,
}

/// An entry removed to make room for a new translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Eviction {
    /// Key of the evicted entry.
    pub vaddr: VirtAddr,
    /// Mapping it held.
    pub paddr: PhysAddr,
    /// The victim was pinned and had to be unpinned first.
    pub forced_unpin: bool,
}

/// What a single `observe` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AccessEvent {
    /// Observed virtual address.
    pub vaddr: VirtAddr,
    /// Observed physical address.
    pub paddr: PhysAddr,
    /// Hit or miss.
    pub outcome: AccessOutcome,
    /// A stale mapping for `vaddr` was invalidated first.
    pub invalidated: bool,
    /// Entry evicted to admit `vaddr`, if the store was full.
    pub evicted: Option<Eviction>,
    /// `vaddr` joined the pin set on this access.
    pub pinned: bool,
    /// New pin threshold if this access closed a phase that changed it.
    pub new_threshold: Option<u64>,
}

impl AccessEvent {
    pub(super) const fn new(vaddr: VirtAddr, paddr: PhysAddr, outcome: AccessOutcome) -> Self {
        Self {
            vaddr,
            paddr,
            outcome,
            invalidated: false,
            evicted: None,
            pinned: false,
            new_threshold: None,
        }
    }

    /// Shorthand for `outcome == AccessOutcome::Hit`.
    pub const fn is_hit(&self) -> bool {
        matches!(self.outcome, AccessOutcome::Hit)
    }
}
