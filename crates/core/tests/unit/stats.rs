//! Statistics Tests.
//!
//! Covers counter bookkeeping of the default sink and the text report.

use pretty_assertions::assert_eq;
use ptecache_core::stats::{InnerCacheStats, PrimaryTlbStats, STATS_SECTIONS, StatsSink, TlbStats};

fn sample() -> TlbStats {
    TlbStats {
        primary: PrimaryTlbStats {
            rd_accesses: 6,
            wr_accesses: 4,
            rd_misses: 3,
            wr_misses: 1,
        },
        inner_cache: InnerCacheStats {
            accesses: 10,
            misses: 4,
            pinned_count: 2,
            pins: 3,
            unpins: 1,
            evictions: 2,
            invalidations: 1,
            phase_changes: 1,
            last_threshold: Some(5),
        },
        pin_threshold: 5,
        resident: 6,
    }
}

#[test]
fn pin_and_unpin_track_the_pinned_count() {
    let mut stats = InnerCacheStats::default();
    stats.record_pin();
    stats.record_pin();
    stats.record_unpin();
    assert_eq!(stats.pinned_count, 1);
    assert_eq!(stats.pins, 2);
    assert_eq!(stats.unpins, 1);
}

#[test]
fn hit_rate_is_zero_before_any_access() {
    let stats = InnerCacheStats::default();
    assert_eq!(stats.hits(), 0);
    assert!(stats.hit_rate().abs() < f64::EPSILON);
}

#[test]
fn hits_are_accesses_minus_misses() {
    let stats = sample().inner_cache;
    assert_eq!(stats.hits(), 6);
    assert!((stats.hit_rate() - 0.6).abs() < 1e-9);
}

#[test]
fn primary_totals_sum_both_sides() {
    let p = sample().primary;
    assert_eq!(p.accesses(), 10);
    assert_eq!(p.misses(), 4);
}

#[test]
fn full_report_contains_every_section() {
    let text = sample().render_sections(&[]);
    assert!(text.contains("PTE INNER CACHE STATISTICS"));
    assert!(text.contains("PRIMARY TLB"));
    assert!(text.contains("INNER CACHE"));
    assert!(text.contains("PINNING PHASE"));
    assert!(text.contains("inner.hit_rate         60.00%"));
    assert!(text.contains("tlb.rd_misses          3 (50.00%)"));
}

#[test]
fn section_filter_omits_the_rest() {
    let text = sample().render_sections(&["phase".to_string()]);
    assert!(text.contains("phase.threshold        5"));
    assert!(!text.contains("PRIMARY TLB"));
    assert!(!text.contains("inner.accesses"));
}

#[test]
fn section_names_are_stable() {
    assert_eq!(STATS_SECTIONS, &["primary", "inner_cache", "phase"]);
}

#[test]
fn snapshot_serializes_to_json() {
    let value = serde_json::to_value(sample()).unwrap();
    assert_eq!(value["inner_cache"]["pinned_count"], 2);
    assert_eq!(value["primary"]["wr_accesses"], 4);
    assert_eq!(value["pin_threshold"], 5);
}
