//! Translation Lookaside Buffer (TLB).
//!
//! A direct-mapped cache of page translations standing in for the host
//! simulator's TLB. Every completed translation, whether it hit the primary
//! array or was refilled after a (simulated) walk, is handed to the inner
//! cache exactly once. The TLB never walks page tables or raises faults: the
//! caller supplies the resolved physical address.

use crate::common::{AccessType, ConfigError, PhysAddr, VirtAddr};
use crate::config::TlbConfig;
use crate::stats::{PrimaryTlbStats, TlbStats};
use crate::units::inner_cache::{AccessEvent, InnerCache};

/// A single entry in the primary TLB.
#[derive(Clone, Copy, Debug, Default)]
struct TlbEntry {
    /// Virtual Page Number (Tag).
    vpn: u64,
    /// Physical Page Number (Data).
    ppn: u64,
    /// Entry validity flag.
    valid: bool,
}

/// Translation Lookaside Buffer with an attached inner cache.
#[derive(Debug)]
pub struct Tlb {
    /// Vector of TLB entries.
    entries: Vec<TlbEntry>,
    /// Mask used for indexing (size - 1).
    mask: usize,
    stats: PrimaryTlbStats,
    inner_cache: InnerCache,
}

impl Tlb {
    /// Creates a TLB and its inner cache.
    ///
    /// `config.size` is rounded up to the next power of two.
    ///
    /// # Errors
    ///
    /// Returns the first violated configuration constraint.
    pub fn new(config: &TlbConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config
            .size
            .checked_next_power_of_two()
            .ok_or(ConfigError::TlbSizeTooLarge {
                size: config.size,
                max: TlbConfig::MAX_SIZE,
            })?;
        Ok(Self {
            entries: vec![TlbEntry::default(); size],
            mask: size - 1,
            stats: PrimaryTlbStats::default(),
            inner_cache: InnerCache::from_config(&config.inner_cache)?,
        })
    }

    /// Number of primary entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    const fn index(&self, vpn: u64) -> usize {
        (vpn as usize) & self.mask
    }

    /// Looks up a VPN in the primary array.
    ///
    /// Returns the cached PPN on a hit.
    #[inline]
    pub fn lookup(&self, vpn: u64) -> Option<u64> {
        self.entries
            .get(self.index(vpn))
            .filter(|e| e.valid && e.vpn == vpn)
            .map(|e| e.ppn)
    }

    /// Installs a mapping, replacing whatever shared its slot.
    pub fn insert(&mut self, vpn: u64, ppn: u64) {
        let idx = self.index(vpn);
        if let Some(slot) = self.entries.get_mut(idx) {
            *slot = TlbEntry {
                vpn,
                ppn,
                valid: true,
            };
        }
    }

    /// Records one completed translation.
    ///
    /// A primary miss, or a primary hit whose PPN disagrees with `paddr`,
    /// refills the slot. Either way the page-aligned pair is then observed by
    /// the inner cache and its event returned.
    pub fn translate(
        &mut self,
        vaddr: VirtAddr,
        paddr: PhysAddr,
        access: AccessType,
    ) -> AccessEvent {
        let vpn = vaddr.vpn();
        let ppn = paddr.ppn();

        let write = access.is_write();
        if write {
            self.stats.wr_accesses += 1;
        } else {
            self.stats.rd_accesses += 1;
        }

        if self.lookup(vpn) != Some(ppn) {
            if write {
                self.stats.wr_misses += 1;
            } else {
                self.stats.rd_misses += 1;
            }
            self.insert(vpn, ppn);
        }

        self.inner_cache.observe(vaddr.page_base(), paddr.page_base())
    }

    /// Removes the translation for one page from both the primary array and
    /// the inner cache.
    pub fn demap_page(&mut self, vaddr: VirtAddr) {
        let vpn = vaddr.vpn();
        let idx = self.index(vpn);
        if let Some(slot) = self.entries.get_mut(idx) {
            if slot.valid && slot.vpn == vpn {
                slot.valid = false;
            }
        }
        let _ = self.inner_cache.invalidate(vaddr.page_base());
    }

    /// Flushes all entries from the primary array.
    ///
    /// The inner cache is a statistics model of a separate structure and keeps
    /// its contents; use [`flush_all`](Self::flush_all) to drop both.
    pub fn flush(&mut self) {
        for e in &mut self.entries {
            e.valid = false;
        }
    }

    /// Flushes the primary array and the inner cache.
    pub fn flush_all(&mut self) {
        self.flush();
        self.inner_cache.flush();
    }

    /// The attached inner cache.
    pub const fn inner_cache(&self) -> &InnerCache {
        &self.inner_cache
    }

    /// Primary array counters.
    pub const fn primary_stats(&self) -> &PrimaryTlbStats {
        &self.stats
    }

    /// Snapshot of primary and inner cache statistics.
    pub fn stats(&self) -> TlbStats {
        TlbStats {
            primary: self.stats.clone(),
            inner_cache: self.inner_cache.stats().clone(),
            pin_threshold: self.inner_cache.pin_threshold(),
            resident: self.inner_cache.len(),
        }
    }
}
