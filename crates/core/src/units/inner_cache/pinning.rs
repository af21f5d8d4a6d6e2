//! Pin-set management.
//!
//! An entry is pinned once its access count reaches the current threshold and
//! there is room in the pin set. Pinned entries are skipped by eviction but
//! stay fully subject to invalidation.

use tracing::debug;

use super::InnerCache;
use crate::common::VirtAddr;
use crate::stats::StatsSink;

impl<S: StatsSink> InnerCache<S> {
    /// Increments the access count of a resident entry.
    pub fn increase_count(&mut self, vaddr: VirtAddr) {
        self.store.increase_count(vaddr);
    }

    /// `vaddr` is resident and pinned.
    pub fn is_pinned(&self, vaddr: VirtAddr) -> bool {
        self.store.get(vaddr).is_some_and(|e| e.pinned)
    }

    /// Entries currently pinned.
    pub const fn pinned_len(&self) -> usize {
        self.store.pinned
    }

    /// The pin set has room for another entry.
    pub const fn has_pin_room(&self) -> bool {
        (self.store.pinned as u64) < self.max_pinned
    }

    /// Pins `vaddr` if it qualifies.
    ///
    /// No-op when the entry is absent, already pinned, below the threshold,
    /// or the pin set is full. Returns whether the entry was pinned now.
    pub fn try_pin(&mut self, vaddr: VirtAddr) -> bool {
        if !self.has_pin_room() {
            return false;
        }
        let threshold = self.phase.threshold();
        let qualifies = self
            .store
            .get(vaddr)
            .is_some_and(|e| !e.pinned && e.access_count >= threshold);
        if !qualifies || !self.store.set_pinned(vaddr, true) {
            return false;
        }
        debug!(%vaddr, threshold, pinned = self.store.pinned, "pinned");
        self.stats.record_pin();
        self.phase.record_pin();
        true
    }

    /// Removes `vaddr` from the pin set. The entry stays resident.
    ///
    /// Returns whether the entry was pinned.
    pub fn unpin(&mut self, vaddr: VirtAddr) -> bool {
        if !self.store.set_pinned(vaddr, false) {
            return false;
        }
        debug!(%vaddr, pinned = self.store.pinned, "unpinned");
        self.stats.record_unpin();
        true
    }
}
