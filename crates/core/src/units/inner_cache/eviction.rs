//! Least Recently Used (LRU) victim selection.
//!
//! Evicts the unpinned entry that has not been accessed for the longest time.
//! Sequence stamps are unique, so walking the recency index from the oldest
//! stamp yields a single deterministic victim.
//!
//! If every resident entry is pinned (only possible when `max_pinned` equals
//! `cache_size`), the least recently used pinned entry is chosen instead and
//! must be force-unpinned before removal, so the capacity bound always holds.
//!
//! # Performance
//!
//! - **Time Complexity:** O(P + log N) where P ≤ `max_pinned` pinned entries are skipped.
//! - **Space Complexity:** No state beyond the store's recency index.

use super::entry::Store;
use crate::common::VirtAddr;

/// Entry chosen for eviction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Victim {
    pub(super) vaddr: VirtAddr,
    /// The victim is pinned and has to be unpinned first.
    pub(super) forced: bool,
}

/// Selects the LRU unpinned entry, falling back to the LRU pinned one.
///
/// Returns `None` only for an empty store.
pub(super) fn select_victim(store: &Store) -> Option<Victim> {
    let mut oldest_pinned = None;
    for vaddr in store.lru_keys() {
        match store.get(vaddr) {
            Some(entry) if !entry.is_pinned() => {
                return Some(Victim {
                    vaddr,
                    forced: false,
                });
            }
            Some(_) if oldest_pinned.is_none() => oldest_pinned = Some(vaddr),
            _ => {}
        }
    }
    oldest_pinned.map(|vaddr| Victim {
        vaddr,
        forced: true,
    })
}
