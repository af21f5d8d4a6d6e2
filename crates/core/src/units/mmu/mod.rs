//! Memory Management Unit.
//!
//! Only the translation-caching side of the MMU is modelled: a direct-mapped
//! primary TLB that hands every completed translation to the inner cache.
//! Page walks and faults belong to the enclosing simulator.

/// Translation Lookaside Buffer.
pub mod tlb;
