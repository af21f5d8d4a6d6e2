//! Replay driver.

use tracing::{debug, info};

use super::trace::TraceRecord;
use crate::stats::TlbStats;
use crate::units::mmu::tlb::Tlb;

/// Summary of one replay run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Replay {
    /// Records fed to the TLB.
    pub records: u64,
    /// Observations that pinned their entry.
    pub pins: u64,
    /// Observations that closed a phase with a new threshold.
    pub threshold_changes: u64,
    /// Statistics snapshot after the last record.
    pub stats: TlbStats,
}

/// Feeds `records` through `tlb` in order.
pub fn replay<'a, I>(tlb: &mut Tlb, records: I) -> Replay
where
    I: IntoIterator<Item = &'a TraceRecord>,
{
    let mut summary = Replay::default();
    for rec in records {
        let event = tlb.translate(rec.vaddr, rec.paddr, rec.access);
        summary.records += 1;
        if event.pinned {
            summary.pins += 1;
        }
        if let Some(threshold) = event.new_threshold {
            summary.threshold_changes += 1;
            debug!(record = summary.records, threshold, "threshold changed during replay");
        }
    }
    summary.stats = tlb.stats();
    info!(
        records = summary.records,
        hit_rate = summary.stats.inner_cache.hit_rate(),
        "replay finished"
    );
    summary
}
