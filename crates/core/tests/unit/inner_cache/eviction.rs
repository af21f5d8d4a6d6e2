//! Eviction Tests.
//!
//! Verifies that replacement is strict LRU over unpinned entries and that a
//! fully pinned store still frees exactly one slot.

use pretty_assertions::assert_eq;
use ptecache_core::units::inner_cache::Eviction;

use crate::common::harness::{cache, pa, run, va};

// ══════════════════════════════════════════════════════════
// 1. LRU Order
// ══════════════════════════════════════════════════════════

#[test]
fn full_store_evicts_least_recently_used() {
    let mut c = cache(3, 0, 1);
    run(&mut c, &[(1, 10), (2, 20), (3, 30), (1, 10)]);
    let event = c.observe(va(4), pa(40));
    assert_eq!(
        event.evicted,
        Some(Eviction {
            vaddr: va(2),
            paddr: pa(20),
            forced_unpin: false
        })
    );
    assert_eq!(c.len(), 3);
    assert!(c.lookup(va(2)).is_none());
    assert_eq!(c.stats().evictions, 1);
}

#[test]
fn evict_on_empty_store_is_none() {
    let mut c = cache(2, 0, 1);
    assert_eq!(c.evict(), None);
}

#[test]
fn explicit_evict_frees_exactly_one_slot() {
    let mut c = cache(3, 0, 1);
    run(&mut c, &[(1, 10), (2, 20), (3, 30)]);
    let evicted = c.evict().unwrap();
    assert_eq!(evicted.vaddr, va(1));
    assert_eq!(c.len(), 2);
}

// ══════════════════════════════════════════════════════════
// 2. Pinned Entries
// ══════════════════════════════════════════════════════════

#[test]
fn pinned_lru_entry_is_skipped() {
    // 1 pins on its second access and is then the oldest entry.
    let mut c = cache(3, 1, 2);
    run(&mut c, &[(1, 10), (1, 10), (2, 20), (3, 30)]);
    assert!(c.is_pinned(va(1)));
    let event = c.observe(va(4), pa(40));
    assert_eq!(event.evicted.map(|e| e.vaddr), Some(va(2)));
    assert!(c.lookup(va(1)).is_some());
}

#[test]
fn all_pinned_store_force_unpins_oldest() {
    let mut c = cache(2, 2, 1);
    run(&mut c, &[(1, 10), (2, 20)]);
    assert_eq!(c.pinned_len(), 2);

    let event = c.observe(va(3), pa(30));
    assert_eq!(
        event.evicted,
        Some(Eviction {
            vaddr: va(1),
            paddr: pa(10),
            forced_unpin: true
        })
    );
    assert_eq!(c.len(), 2);
    assert_eq!(c.stats().unpins, 1);
    // The newcomer qualifies immediately and takes the freed pin slot.
    assert!(event.pinned);
    assert_eq!(c.stats().pinned_count, 2);
    assert!(c.check_invariants().is_ok());
}

#[test]
fn forced_unpin_lowers_pinned_count() {
    let mut c = cache(2, 2, 1);
    run(&mut c, &[(1, 10), (2, 20)]);
    let evicted = c.evict().unwrap();
    assert!(evicted.forced_unpin);
    assert_eq!(c.pinned_len(), 1);
    assert_eq!(c.stats().pinned_count, 1);
}
