//! Statistics recording and reporting.
//!
//! This module separates *recording* from *reporting*. It provides:
//! 1. **Recording:** The [`StatsSink`] trait, the only capability the inner cache holds.
//! 2. **Counters:** [`InnerCacheStats`], the default sink (accesses, misses, pinned count, ...).
//! 3. **Host counters:** [`PrimaryTlbStats`] for read/write accesses and misses of the host TLB.
//! 4. **Reporting:** [`TlbStats`], a snapshot of both, printable by section or serializable to JSON.

use std::fmt::{self, Write as _};

use serde::Serialize;

/// Event recorder injected into an [`InnerCache`](crate::units::inner_cache::InnerCache).
///
/// The cache only ever increments through this interface and never reads
/// counters back. `record_pin`/`record_unpin` together maintain the pinned
/// count. The trailing methods default to no-ops so a sink can track only the
/// three primary counters.
pub trait StatsSink {
    /// One translation was observed.
    fn record_access(&mut self);
    /// The observed translation was not resident (or was stale).
    fn record_miss(&mut self);
    /// An entry joined the pin set.
    fn record_pin(&mut self);
    /// An entry left the pin set (unpinned, force-unpinned, or invalidated).
    fn record_unpin(&mut self);
    /// An entry was evicted to make room.
    fn record_eviction(&mut self) {}
    /// A resident entry was dropped because its mapping changed.
    fn record_invalidation(&mut self) {}
    /// The phase controller selected a new pin threshold.
    fn record_phase_change(&mut self, _threshold: u64) {}
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn record_access(&mut self) {
        (**self).record_access();
    }

    fn record_miss(&mut self) {
        (**self).record_miss();
    }

    fn record_pin(&mut self) {
        (**self).record_pin();
    }

    fn record_unpin(&mut self) {
        (**self).record_unpin();
    }

    fn record_eviction(&mut self) {
        (**self).record_eviction();
    }

    fn record_invalidation(&mut self) {
        (**self).record_invalidation();
    }

    fn record_phase_change(&mut self, threshold: u64) {
        (**self).record_phase_change(threshold);
    }
}

/// Default counter set for the inner cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InnerCacheStats {
    /// Translations observed.
    pub accesses: u64,
    /// Observations that were not a resident, matching entry.
    pub misses: u64,
    /// Entries currently pinned.
    pub pinned_count: u64,
    /// Pin operations performed.
    pub pins: u64,
    /// Unpin operations performed (including forced and invalidation unpins).
    pub unpins: u64,
    /// Entries evicted for capacity.
    pub evictions: u64,
    /// Entries invalidated because their mapping changed.
    pub invalidations: u64,
    /// Phases that ended with a new threshold.
    pub phase_changes: u64,
    /// Threshold selected by the most recent phase change, if any.
    pub last_threshold: Option<u64>,
}

impl InnerCacheStats {
    /// Observations that hit.
    pub const fn hits(&self) -> u64 {
        self.accesses.saturating_sub(self.misses)
    }

    /// Hit fraction in `[0, 1]`; zero before any access.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits() as f64 / self.accesses as f64
        }
    }
}

impl StatsSink for InnerCacheStats {
    fn record_access(&mut self) {
        self.accesses += 1;
    }

    fn record_miss(&mut self) {
        self.misses += 1;
    }

    fn record_pin(&mut self) {
        self.pins += 1;
        self.pinned_count += 1;
    }

    fn record_unpin(&mut self) {
        self.unpins += 1;
        self.pinned_count = self.pinned_count.saturating_sub(1);
    }

    fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    fn record_phase_change(&mut self, threshold: u64) {
        self.phase_changes += 1;
        self.last_threshold = Some(threshold);
    }
}

/// Read/write counters of the host TLB's primary array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrimaryTlbStats {
    /// Read (and fetch) translations.
    pub rd_accesses: u64,
    /// Write translations.
    pub wr_accesses: u64,
    /// Read translations that missed the primary TLB.
    pub rd_misses: u64,
    /// Write translations that missed the primary TLB.
    pub wr_misses: u64,
}

impl PrimaryTlbStats {
    /// All translations.
    pub const fn accesses(&self) -> u64 {
        self.rd_accesses + self.wr_accesses
    }

    /// All primary misses.
    pub const fn misses(&self) -> u64 {
        self.rd_misses + self.wr_misses
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to [`TlbStats::render_sections`] to render all sections.
pub const STATS_SECTIONS: &[&str] = &["primary", "inner_cache", "phase"];

/// Snapshot of the host TLB and its inner cache.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TlbStats {
    /// Primary TLB counters.
    pub primary: PrimaryTlbStats,
    /// Inner cache counters.
    pub inner_cache: InnerCacheStats,
    /// Pin threshold in force when the snapshot was taken.
    pub pin_threshold: u64,
    /// Inner cache entries resident when the snapshot was taken.
    pub resident: usize,
}

impl TlbStats {
    /// Renders the requested sections; an empty slice renders all of them.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();
        // Writing into a String is infallible.
        let _ = self.write_sections(&mut out, &want);
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }

    fn write_sections(&self, out: &mut String, want: &dyn Fn(&str) -> bool) -> fmt::Result {
        let pct = |num: u64, den: u64| {
            if den == 0 {
                0.0
            } else {
                (num as f64 / den as f64) * 100.0
            }
        };

        writeln!(out, "==========================================================")?;
        writeln!(out, "PTE INNER CACHE STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("primary") {
            let p = &self.primary;
            writeln!(out, "PRIMARY TLB")?;
            writeln!(out, "  tlb.rd_accesses        {}", p.rd_accesses)?;
            writeln!(out, "  tlb.wr_accesses        {}", p.wr_accesses)?;
            writeln!(
                out,
                "  tlb.rd_misses          {} ({:.2}%)",
                p.rd_misses,
                pct(p.rd_misses, p.rd_accesses)
            )?;
            writeln!(
                out,
                "  tlb.wr_misses          {} ({:.2}%)",
                p.wr_misses,
                pct(p.wr_misses, p.wr_accesses)
            )?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("inner_cache") {
            let s = &self.inner_cache;
            writeln!(out, "INNER CACHE")?;
            writeln!(out, "  inner.accesses         {}", s.accesses)?;
            writeln!(out, "  inner.hits             {}", s.hits())?;
            writeln!(out, "  inner.misses           {}", s.misses)?;
            writeln!(out, "  inner.hit_rate         {:.2}%", s.hit_rate() * 100.0)?;
            writeln!(out, "  inner.resident         {}", self.resident)?;
            writeln!(out, "  inner.pinned_count     {}", s.pinned_count)?;
            writeln!(out, "  inner.pins             {}", s.pins)?;
            writeln!(out, "  inner.unpins           {}", s.unpins)?;
            writeln!(out, "  inner.evictions        {}", s.evictions)?;
            writeln!(out, "  inner.invalidations    {}", s.invalidations)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("phase") {
            writeln!(out, "PINNING PHASE")?;
            writeln!(out, "  phase.threshold        {}", self.pin_threshold)?;
            writeln!(out, "  phase.changes          {}", self.inner_cache.phase_changes)?;
        }
        writeln!(out, "==========================================================")
    }
}
