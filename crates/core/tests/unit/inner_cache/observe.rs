//! Observe Tests.
//!
//! Verifies the per-access state machine:
//! - Miss then hit on the same mapping
//! - Stale mapping invalidation
//! - Explicit insert/invalidate/flush
//! - Zero-capacity caches

use pretty_assertions::assert_eq;
use ptecache_core::units::inner_cache::AccessOutcome;

use crate::common::harness::{cache, pa, run, va};

// ══════════════════════════════════════════════════════════
// 1. Basic Operations
// ══════════════════════════════════════════════════════════

#[test]
fn first_access_misses_and_inserts() {
    let mut c = cache(4, 1, 3);
    let event = c.observe(va(0x1000), pa(0x8000));
    assert_eq!(event.outcome, AccessOutcome::Miss);
    assert!(!event.invalidated);
    assert_eq!(event.evicted, None);
    assert_eq!(c.len(), 1);
    let entry = c.lookup(va(0x1000)).unwrap();
    assert_eq!(entry.paddr(), pa(0x8000));
    assert_eq!(entry.access_count(), 1);
    assert!(!entry.is_pinned());
}

#[test]
fn repeated_access_hits_without_growing() {
    let mut c = cache(4, 1, 10);
    let _ = c.observe(va(1), pa(100));
    let event = c.observe(va(1), pa(100));
    assert!(event.is_hit());
    assert_eq!(c.len(), 1);
    assert_eq!(c.lookup(va(1)).unwrap().access_count(), 2);
    assert_eq!(c.stats().accesses, 2);
    assert_eq!(c.stats().misses, 1);
}

#[test]
fn hit_refreshes_recency() {
    let mut c = cache(4, 0, 1);
    run(&mut c, &[(1, 10), (2, 20)]);
    let before = c.lookup(va(1)).unwrap().last_access_seq();
    let _ = c.observe(va(1), pa(10));
    let after = c.lookup(va(1)).unwrap().last_access_seq();
    assert!(after > before);
    assert!(after > c.lookup(va(2)).unwrap().last_access_seq());
}

#[test]
fn exists_queries_distinguish_match_and_stale() {
    let mut c = cache(4, 1, 3);
    let _ = c.observe(va(1), pa(100));
    assert!(c.exists_and_matches(va(1), pa(100)));
    assert!(!c.exists_but_stale(va(1), pa(100)));
    assert!(c.exists_but_stale(va(1), pa(200)));
    assert!(!c.exists_and_matches(va(2), pa(100)));
    assert!(!c.exists_but_stale(va(2), pa(100)));
}

// ══════════════════════════════════════════════════════════
// 2. Stale Mappings
// ══════════════════════════════════════════════════════════

#[test]
fn remapped_address_is_invalidated_and_missed() {
    let mut c = cache(4, 1, 5);
    run(&mut c, &[(1, 100), (1, 100), (1, 100)]);
    let event = c.observe(va(1), pa(200));
    assert_eq!(event.outcome, AccessOutcome::Miss);
    assert!(event.invalidated);
    let entry = c.lookup(va(1)).unwrap();
    assert_eq!(entry.paddr(), pa(200));
    assert_eq!(entry.access_count(), 1, "history restarts after remap");
    assert_eq!(c.stats().misses, 2);
    assert_eq!(c.stats().invalidations, 1);
    assert_eq!(c.len(), 1);
}

#[test]
fn remapping_a_pinned_entry_releases_its_pin() {
    let mut c = cache(4, 1, 2);
    run(&mut c, &[(1, 100), (1, 100)]);
    assert!(c.is_pinned(va(1)));
    let _ = c.observe(va(1), pa(200));
    assert!(!c.is_pinned(va(1)));
    assert_eq!(c.pinned_len(), 0);
    assert_eq!(c.stats().pinned_count, 0);
    assert!(c.check_invariants().is_ok());
}

// ══════════════════════════════════════════════════════════
// 3. Explicit Operations
// ══════════════════════════════════════════════════════════

#[test]
fn insert_refuses_resident_key_and_full_store() {
    let mut c = cache(1, 0, 1);
    assert!(c.insert(va(1), pa(10)));
    assert!(!c.insert(va(1), pa(20)));
    assert!(!c.insert(va(2), pa(20)));
    assert_eq!(c.lookup(va(1)).unwrap().access_count(), 0);
    assert!(c.is_full());
}

#[test]
fn invalidate_reports_whether_anything_was_removed() {
    let mut c = cache(4, 1, 3);
    let _ = c.observe(va(1), pa(100));
    assert!(c.invalidate(va(1)));
    assert!(!c.invalidate(va(1)));
    assert!(c.is_empty());
    assert_eq!(c.stats().invalidations, 1);
}

#[test]
fn flush_empties_but_keeps_counters() {
    let mut c = cache(4, 2, 1);
    run(&mut c, &[(1, 10), (2, 20), (3, 30)]);
    assert_eq!(c.pinned_len(), 2);
    c.flush();
    assert!(c.is_empty());
    assert_eq!(c.pinned_len(), 0);
    assert_eq!(c.stats().pinned_count, 0);
    assert_eq!(c.stats().accesses, 3);
    assert!(c.check_invariants().is_ok());
}

#[test]
fn entries_iterate_least_recent_first() {
    let mut c = cache(4, 0, 1);
    run(&mut c, &[(1, 10), (2, 20), (3, 30), (1, 10)]);
    let order: Vec<u64> = c.entries().map(|(v, _)| v.val()).collect();
    assert_eq!(order, vec![2, 3, 1]);
}

// ══════════════════════════════════════════════════════════
// 4. Zero Capacity
// ══════════════════════════════════════════════════════════

#[test]
fn zero_capacity_always_misses() {
    let mut c = cache(0, 0, 1);
    for _ in 0..3 {
        let event = c.observe(va(1), pa(100));
        assert_eq!(event.outcome, AccessOutcome::Miss);
        assert_eq!(event.evicted, None);
        assert!(!event.pinned);
    }
    assert!(c.is_empty());
    assert_eq!(c.stats().accesses, 3);
    assert_eq!(c.stats().misses, 3);
    assert_eq!(c.stats().evictions, 0);
    assert!(!c.insert(va(1), pa(100)));
    assert!(c.check_invariants().is_ok());
}
