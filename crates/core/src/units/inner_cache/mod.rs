//! Pinned PTE inner cache.
//!
//! A bounded, fully associative cache of virtual→physical translations sitting
//! behind the primary TLB. It is a passive model: the host calls
//! [`InnerCache::observe`] once per completed translation and the cache
//! records whether that translation would have hit. It provides:
//! 1. **Store:** One entry table holding the mapping and all replacement metadata.
//! 2. **Eviction:** Strict LRU over unpinned entries.
//! 3. **Pinning:** Entries reaching the pin threshold are exempted from eviction,
//!    up to `max_pinned` of them.
//! 4. **Phases:** The threshold is re-evaluated periodically by a pluggable policy.
//!
//! Counters are reported through an injected [`StatsSink`]; every call also
//! returns an [`AccessEvent`].

/// Entry table and recency index.
pub mod entry;

/// Per-access event records.
pub mod event;

/// LRU victim selection.
mod eviction;

/// Pin-set management.
mod pinning;

/// Threshold phase control.
pub mod phase;

use tracing::{debug, trace};

pub use entry::CacheEntry;
pub use event::{AccessEvent, AccessOutcome, Eviction};
pub use phase::{PhaseController, PhasePolicy, PhaseWindow};

use self::entry::Store;
use crate::common::{ConfigError, InvariantError, PhysAddr, VirtAddr};
use crate::config::InnerCacheConfig;
use crate::stats::{InnerCacheStats, StatsSink};

/// The inner cache.
///
/// Generic over the statistics sink. Pass an owned sink, or `&mut sink` to
/// keep ownership with the caller.
#[derive(Debug)]
pub struct InnerCache<S: StatsSink = InnerCacheStats> {
    store: Store,
    max_pinned: u64,
    phase: PhaseController,
    stats: S,
}

impl InnerCache<InnerCacheStats> {
    /// Builds a cache that owns a fresh [`InnerCacheStats`].
    ///
    /// # Errors
    ///
    /// Returns the first violated configuration constraint.
    pub fn from_config(config: &InnerCacheConfig) -> Result<Self, ConfigError> {
        Self::new(config, InnerCacheStats::default())
    }
}

impl<S: StatsSink> InnerCache<S> {
    /// Builds a cache with the phase policy selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns the first violated configuration constraint.
    pub fn new(config: &InnerCacheConfig, stats: S) -> Result<Self, ConfigError> {
        Self::with_phase_policy(config, stats, phase::policy_for(&config.phase))
    }

    /// Builds a cache with a caller-supplied phase policy.
    ///
    /// `config.phase.policy` is ignored; length and range still apply.
    ///
    /// # Errors
    ///
    /// Returns the first violated configuration constraint.
    pub fn with_phase_policy(
        config: &InnerCacheConfig,
        stats: S,
        policy: Box<dyn PhasePolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            cache_size = config.cache_size,
            max_pinned = config.max_pinned,
            pin_threshold = config.pin_threshold,
            policy = policy.name(),
            "inner cache created"
        );
        Ok(Self {
            store: Store::new(config.cache_size),
            max_pinned: config.max_pinned,
            phase: PhaseController::new(config, policy),
            stats,
        })
    }

    /// Entry point: simulates the inner cache for one completed translation.
    ///
    /// 1. Resident and matching: hit. Refresh recency, count, try to pin.
    /// 2. Resident with another physical address: invalidate, then miss.
    /// 3. Miss: evict one entry if full, insert, refresh, count, try to pin.
    /// 4. Let the phase controller close the phase if it is complete.
    pub fn observe(&mut self, vaddr: VirtAddr, paddr: PhysAddr) -> AccessEvent {
        self.stats.record_access();

        let hit = self.exists_and_matches(vaddr, paddr);
        let mut event = AccessEvent::new(
            vaddr,
            paddr,
            if hit {
                AccessOutcome::Hit
            } else {
                AccessOutcome::Miss
            },
        );

        let pinned_hit = hit && self.is_pinned(vaddr);
        if hit {
            trace!(%vaddr, %paddr, pinned = pinned_hit, "inner cache hit");
            self.store.touch(vaddr);
        } else {
            if self.exists_but_stale(vaddr, paddr) {
                event.invalidated = self.invalidate(vaddr);
            }
            trace!(%vaddr, %paddr, "inner cache miss");
            self.stats.record_miss();
            if self.store.is_full() {
                event.evicted = self.evict();
            }
            if self.insert(vaddr, paddr) {
                self.store.touch(vaddr);
            }
        }

        if self.store.contains(vaddr) {
            self.increase_count(vaddr);
            event.pinned = self.try_pin(vaddr);
        }

        self.phase.record_access(hit, pinned_hit);
        event.new_threshold = self
            .phase
            .end_access(self.store.pinned as u64, self.max_pinned);
        if let Some(threshold) = event.new_threshold {
            self.stats.record_phase_change(threshold);
        }
        event
    }

    /// `vaddr` is resident and maps to `paddr`.
    pub fn exists_and_matches(&self, vaddr: VirtAddr, paddr: PhysAddr) -> bool {
        self.store.matches(vaddr, paddr)
    }

    /// `vaddr` is resident but maps to a different physical address.
    pub fn exists_but_stale(&self, vaddr: VirtAddr, paddr: PhysAddr) -> bool {
        self.store.is_stale(vaddr, paddr)
    }

    /// Admits a fresh entry with an access count of zero.
    ///
    /// Refuses (returns `false`) when the store is full or `vaddr` is already
    /// resident; a resident mapping is only replaced through [`invalidate`](Self::invalidate).
    pub fn insert(&mut self, vaddr: VirtAddr, paddr: PhysAddr) -> bool {
        self.store.insert(vaddr, paddr)
    }

    /// Removes `vaddr` whatever its pinned state, discarding its access history.
    ///
    /// A pinned entry is unpinned first. Returns whether anything was removed.
    pub fn invalidate(&mut self, vaddr: VirtAddr) -> bool {
        if self.is_pinned(vaddr) {
            let _ = self.unpin(vaddr);
        }
        match self.store.remove(vaddr) {
            Some(old) => {
                debug!(%vaddr, paddr = %old.paddr, accesses = old.access_count, "invalidated");
                self.stats.record_invalidation();
                true
            }
            None => false,
        }
    }

    /// Frees exactly one slot using LRU over unpinned entries.
    ///
    /// Falls back to force-unpinning the LRU pinned entry when nothing else is
    /// resident. Returns `None` only for an empty store.
    pub fn evict(&mut self) -> Option<Eviction> {
        let victim = eviction::select_victim(&self.store)?;
        if victim.forced {
            let _ = self.unpin(victim.vaddr);
        }
        let entry = self.store.remove(victim.vaddr)?;
        debug!(
            vaddr = %victim.vaddr,
            paddr = %entry.paddr,
            forced_unpin = victim.forced,
            "evicted"
        );
        self.stats.record_eviction();
        Some(Eviction {
            vaddr: victim.vaddr,
            paddr: entry.paddr,
            forced_unpin: victim.forced,
        })
    }

    /// Drops every entry, unpinning pinned ones. Counters are not reset.
    pub fn flush(&mut self) {
        let pinned: Vec<VirtAddr> = self
            .store
            .entries
            .iter()
            .filter(|(_, e)| e.pinned)
            .map(|(&v, _)| v)
            .collect();
        for vaddr in pinned {
            let _ = self.unpin(vaddr);
        }
        self.store.clear();
    }

    /// Resident entry for `vaddr`, without touching recency.
    pub fn lookup(&self, vaddr: VirtAddr) -> Option<&CacheEntry> {
        self.store.get(vaddr)
    }

    /// Resident entries, least recently used first.
    pub fn entries(&self) -> impl Iterator<Item = (VirtAddr, &CacheEntry)> + '_ {
        self.store
            .lru_keys()
            .filter_map(|v| self.store.get(v).map(|e| (v, e)))
    }

    /// Resident entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// No entries are resident.
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// The next miss will evict.
    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    /// Configured capacity.
    pub const fn capacity(&self) -> u64 {
        self.store.capacity
    }

    /// Configured pin-set bound.
    pub const fn max_pinned(&self) -> u64 {
        self.max_pinned
    }

    /// Pin threshold in force.
    pub const fn pin_threshold(&self) -> u64 {
        self.phase.threshold()
    }

    /// Phase controller state.
    pub const fn phase(&self) -> &PhaseController {
        &self.phase
    }

    /// The statistics sink.
    pub const fn stats(&self) -> &S {
        &self.stats
    }

    /// The statistics sink, mutably (e.g. to reset counters between runs).
    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    /// Consumes the cache and returns its sink.
    pub fn into_stats(self) -> S {
        self.stats
    }

    /// Verifies the capacity bounds, the pin-set bookkeeping, and that the
    /// recency index describes exactly the resident entries.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.store.len();
        if len as u64 > self.store.capacity {
            return Err(InvariantError::CapacityExceeded {
                len,
                capacity: self.store.capacity,
            });
        }

        let flagged = self.store.entries.values().filter(|e| e.pinned).count();
        if flagged as u64 > self.max_pinned {
            return Err(InvariantError::PinLimitExceeded {
                pinned: flagged,
                max: self.max_pinned,
            });
        }
        if flagged != self.store.pinned {
            return Err(InvariantError::PinCountMismatch {
                tracked: self.store.pinned,
                actual: flagged,
            });
        }

        if self.store.recency.len() != len {
            return Err(InvariantError::RecencyMismatch {
                indexed: self.store.recency.len(),
                resident: len,
            });
        }
        for (&vaddr, entry) in &self.store.entries {
            if self.store.recency.get(&entry.last_access_seq) != Some(&vaddr) {
                return Err(InvariantError::StaleSequence(vaddr));
            }
        }
        Ok(())
    }
}
