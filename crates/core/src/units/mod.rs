//! Translation hardware units.
//!
//! 1. **MMU:** The host TLB that supplies completed translations.
//! 2. **Inner cache:** The pinned PTE cache sitting behind it.

/// Pinned PTE inner cache (store, eviction, pinning, phase control).
pub mod inner_cache;

/// Memory management unit (host TLB).
pub mod mmu;
