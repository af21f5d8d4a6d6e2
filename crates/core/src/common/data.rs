//! Memory Access Types.
//!
//! Classifies the translation requests the host TLB receives. The inner cache
//! itself is indifferent to the access type; it is used for:
//! 1. **Statistics Tracking:** Splitting primary TLB accesses and misses into reads and writes.
//! 2. **Trace Parsing:** The optional third column of a replay trace.

use serde::Serialize;

/// Type of memory access that caused a translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AccessType {
    /// Instruction fetch. Counted with reads.
    Fetch,

    /// Data read access.
    #[default]
    Read,

    /// Data write access.
    Write,
}

impl AccessType {
    /// Whether the access is counted on the write side.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}
