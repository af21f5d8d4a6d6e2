//! Pinned PTE inner cache model.
//!
//! This crate models a secondary page-table-entry cache that sits behind a
//! processor's primary TLB and selectively pins hot translations against
//! eviction. It provides the following:
//! 1. **Inner cache:** Bounded store, strict LRU eviction, access-count pinning, and phase control.
//! 2. **Host TLB:** A direct-mapped primary TLB that feeds the inner cache once per translation.
//! 3. **Statistics:** A narrow recording interface and the default counter set.
//! 4. **Simulation:** Trace parsing and replay through the host TLB.
//! 5. **Configuration:** Validated, JSON-deserializable parameters with defaults.

/// Common types (addresses, errors).
pub mod common;
/// Model configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Trace parsing and replay.
pub mod sim;
/// Statistics recording interface and counters.
pub mod stats;
/// Hardware units (host TLB, inner cache, phase control).
pub mod units;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The inner cache; construct with `InnerCache::new`.
pub use crate::units::inner_cache::InnerCache;
/// Host TLB that owns an inner cache.
pub use crate::units::mmu::tlb::Tlb;
