//! Common utilities and types shared across the model.
//!
//! This module provides the building blocks used by every unit. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Memory Access:** Read/write classification of translation requests.
//! 3. **Error Handling:** Configuration, invariant, and trace error types.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use data::AccessType;
pub use error::{ConfigError, InvariantError, TraceError};
