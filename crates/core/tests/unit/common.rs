//! Address and access type tests.

use ptecache_core::common::addr::PAGE_OFFSET_MASK;
use ptecache_core::common::{AccessType, PhysAddr, VirtAddr};

#[test]
fn page_base_clears_offset_only() {
    let v = VirtAddr::new(0xdead_beef);
    assert_eq!(v.page_base().val(), 0xdead_b000);
    assert_eq!(v.page_offset(), 0xeef);
    assert_eq!(v.page_base().val() & PAGE_OFFSET_MASK, 0);
}

#[test]
fn vpn_and_ppn_agree_with_page_shift() {
    assert_eq!(VirtAddr::new(0x5000).vpn(), 5);
    assert_eq!(PhysAddr::new(0x8000_3fff).ppn(), 0x8_0003);
}

#[test]
fn only_writes_count_as_writes() {
    assert!(AccessType::Write.is_write());
    assert!(!AccessType::Read.is_write());
    assert!(!AccessType::Fetch.is_write());
    assert_eq!(AccessType::default(), AccessType::Read);
}
