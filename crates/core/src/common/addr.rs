//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses so the
//! two sides of a translation cannot be swapped by accident. It provides the following:
//! 1. **Type Safety:** Distinguishes virtual keys from physical values at compile time.
//! 2. **Page Arithmetic:** Page number and offset extraction for 4 KiB pages.
//! 3. **Formatting:** Hex display used by logs and reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u64 = 12;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u64 = (1 << PAGE_SHIFT) - 1;

/// A virtual address (or virtual page number) presented by the host TLB.
///
/// Used as the key of the inner cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VirtAddr(pub u64);

/// A physical address (or physical page number) resolved by the host TLB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Extracts the page offset (lower 12 bits).
    pub const fn page_offset(&self) -> u64 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Returns the virtual page number.
    pub const fn vpn(&self) -> u64 {
        self.0 >> PAGE_SHIFT
    }

    /// Returns the address with the page offset cleared.
    pub const fn page_base(&self) -> Self {
        Self(self.0 & !PAGE_OFFSET_MASK)
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the physical page number.
    pub const fn ppn(&self) -> u64 {
        self.0 >> PAGE_SHIFT
    }

    /// Returns the address with the page offset cleared.
    pub const fn page_base(&self) -> Self {
        Self(self.0 & !PAGE_OFFSET_MASK)
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
