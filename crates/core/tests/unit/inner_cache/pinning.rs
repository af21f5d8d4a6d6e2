//! Pinning Tests.
//!
//! Verifies threshold qualification, the pin-set bound, and the reference
//! access sequence.

use pretty_assertions::assert_eq;

use crate::common::harness::{cache, pa, run, va};

// ══════════════════════════════════════════════════════════
// 1. Qualification
// ══════════════════════════════════════════════════════════

#[test]
fn entry_pins_on_the_threshold_access() {
    let mut c = cache(4, 1, 3);
    assert!(!c.observe(va(1), pa(100)).pinned);
    assert!(!c.observe(va(1), pa(100)).pinned);
    assert!(c.observe(va(1), pa(100)).pinned);
    assert!(c.is_pinned(va(1)));
    assert_eq!(c.stats().pins, 1);
    assert_eq!(c.stats().pinned_count, 1);
}

#[test]
fn entry_pins_only_once() {
    let mut c = cache(4, 2, 2);
    run(&mut c, &[(1, 100); 6]);
    assert_eq!(c.stats().pins, 1);
    assert_eq!(c.stats().pinned_count, 1);
    assert_eq!(c.pinned_len(), 1);
}

#[test]
fn try_pin_ignores_absent_and_cold_entries() {
    let mut c = cache(4, 2, 3);
    assert!(!c.try_pin(va(9)));
    let _ = c.observe(va(1), pa(100));
    assert!(!c.try_pin(va(1)));
    c.increase_count(va(1));
    c.increase_count(va(1));
    assert!(c.try_pin(va(1)));
    assert!(!c.try_pin(va(1)));
}

#[test]
fn unpin_keeps_entry_resident() {
    let mut c = cache(4, 1, 1);
    let _ = c.observe(va(1), pa(100));
    assert!(c.unpin(va(1)));
    assert!(!c.unpin(va(1)));
    assert!(c.lookup(va(1)).is_some());
    assert_eq!(c.stats().pinned_count, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Pin-Set Bound
// ══════════════════════════════════════════════════════════

#[test]
fn pin_set_never_exceeds_its_bound() {
    let mut c = cache(8, 2, 1);
    run(&mut c, &[(1, 10), (2, 20), (3, 30), (4, 40)]);
    assert_eq!(c.pinned_len(), 2);
    assert!(!c.has_pin_room());
    assert!(!c.is_pinned(va(3)));
    assert!(c.check_invariants().is_ok());
}

#[test]
fn zero_pin_bound_disables_pinning() {
    let mut c = cache(4, 0, 1);
    run(&mut c, &[(1, 10); 5]);
    assert_eq!(c.pinned_len(), 0);
    assert_eq!(c.stats().pins, 0);
}

// ══════════════════════════════════════════════════════════
// 3. Reference Sequence
// ══════════════════════════════════════════════════════════

#[test]
fn reference_sequence_pins_hot_entry_and_evicts_cold_one() {
    let mut c = cache(2, 1, 3);
    run(&mut c, &[(1, 100), (2, 200), (1, 100), (1, 100), (3, 300)]);

    let stats = c.stats();
    assert_eq!(stats.accesses, 5);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.pinned_count, 1);

    let resident: Vec<(u64, u64, bool)> = {
        let mut v: Vec<_> = c
            .entries()
            .map(|(vaddr, e)| (vaddr.val(), e.paddr().val(), e.is_pinned()))
            .collect();
        v.sort_unstable();
        v
    };
    assert_eq!(resident, vec![(1, 100, true), (3, 300, false)]);
}
