//! Inner cache entry table.
//!
//! One hash table maps each virtual address to a [`CacheEntry`] carrying the
//! physical address and all replacement metadata, so the pin set is simply the
//! entries whose `pinned` flag is set. A second, ordered index maps each
//! entry's last access sequence back to its key and gives the recency order
//! used for eviction.
//!
//! # Performance
//!
//! - Lookup / insert / remove: O(1) expected in the table, O(log n) in the index.
//! - Recency walk: in sequence order, oldest first.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::common::{PhysAddr, VirtAddr};

/// A resident translation and its replacement metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub(super) paddr: PhysAddr,
    pub(super) access_count: u64,
    pub(super) last_access_seq: u64,
    pub(super) pinned: bool,
}

impl CacheEntry {
    /// Physical address this translation resolves to.
    pub const fn paddr(&self) -> PhysAddr {
        self.paddr
    }

    /// Accesses since the entry was created.
    pub const fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Sequence stamp of the most recent access.
    pub const fn last_access_seq(&self) -> u64 {
        self.last_access_seq
    }

    /// Whether the entry is exempt from ordinary eviction.
    pub const fn is_pinned(&self) -> bool {
        self.pinned
    }
}

/// Bounded entry table with a recency index.
#[derive(Debug)]
pub(super) struct Store {
    pub(super) entries: HashMap<VirtAddr, CacheEntry>,
    /// `last_access_seq -> key` for every resident entry.
    pub(super) recency: BTreeMap<u64, VirtAddr>,
    pub(super) capacity: u64,
    /// Last sequence handed out.
    pub(super) seq: u64,
    /// Entries with `pinned == true`.
    pub(super) pinned: usize,
}

impl Store {
    pub(super) fn new(capacity: u64) -> Self {
        // Cap the preallocation; capacity is a model parameter, not a memory budget.
        let prealloc = usize::try_from(capacity.min(4096)).unwrap_or(4096);
        Self {
            entries: HashMap::with_capacity(prealloc),
            recency: BTreeMap::new(),
            capacity,
            seq: 0,
            pinned: 0,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn is_full(&self) -> bool {
        self.entries.len() as u64 >= self.capacity
    }

    pub(super) fn get(&self, vaddr: VirtAddr) -> Option<&CacheEntry> {
        self.entries.get(&vaddr)
    }

    pub(super) fn contains(&self, vaddr: VirtAddr) -> bool {
        self.entries.contains_key(&vaddr)
    }

    /// Resident and mapped to `paddr`.
    pub(super) fn matches(&self, vaddr: VirtAddr, paddr: PhysAddr) -> bool {
        self.entries.get(&vaddr).is_some_and(|e| e.paddr == paddr)
    }

    /// Resident but mapped elsewhere.
    pub(super) fn is_stale(&self, vaddr: VirtAddr, paddr: PhysAddr) -> bool {
        self.entries.get(&vaddr).is_some_and(|e| e.paddr != paddr)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Admits a fresh entry with zero accesses. Refuses when full or when the
    /// key is already resident.
    pub(super) fn insert(&mut self, vaddr: VirtAddr, paddr: PhysAddr) -> bool {
        if self.is_full() || self.contains(vaddr) {
            return false;
        }
        let seq = self.next_seq();
        let _ = self.recency.insert(seq, vaddr);
        let _ = self.entries.insert(
            vaddr,
            CacheEntry {
                paddr,
                access_count: 0,
                last_access_seq: seq,
                pinned: false,
            },
        );
        true
    }

    /// Drops an entry and its recency stamp.
    pub(super) fn remove(&mut self, vaddr: VirtAddr) -> Option<CacheEntry> {
        let entry = self.entries.remove(&vaddr)?;
        let _ = self.recency.remove(&entry.last_access_seq);
        if entry.pinned {
            self.pinned -= 1;
        }
        Some(entry)
    }

    /// Moves a resident entry to the most-recent position.
    pub(super) fn touch(&mut self, vaddr: VirtAddr) {
        if !self.contains(vaddr) {
            return;
        }
        let seq = self.next_seq();
        if let Some(entry) = self.entries.get_mut(&vaddr) {
            let _ = self.recency.remove(&entry.last_access_seq);
            entry.last_access_seq = seq;
            let _ = self.recency.insert(seq, vaddr);
        }
    }

    pub(super) fn increase_count(&mut self, vaddr: VirtAddr) {
        if let Some(entry) = self.entries.get_mut(&vaddr) {
            entry.access_count = entry.access_count.saturating_add(1);
        }
    }

    /// Sets the pinned flag; returns whether it changed.
    pub(super) fn set_pinned(&mut self, vaddr: VirtAddr, pinned: bool) -> bool {
        match self.entries.get_mut(&vaddr) {
            Some(entry) if entry.pinned != pinned => {
                entry.pinned = pinned;
                if pinned {
                    self.pinned += 1;
                } else {
                    self.pinned -= 1;
                }
                true
            }
            _ => false,
        }
    }

    /// Resident keys, least recently used first.
    pub(super) fn lru_keys(&self) -> impl Iterator<Item = VirtAddr> + '_ {
        self.recency.values().copied()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.pinned = 0;
    }
}
