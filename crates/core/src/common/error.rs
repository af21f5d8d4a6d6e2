//! Error definitions.
//!
//! The inner cache never fails at run time: every query is total over the
//! current state and absence is a miss, not an error. Errors exist only at the
//! edges of the model:
//! 1. **Configuration:** Rejected parameter combinations, caught at construction.
//! 2. **Invariants:** Reported by `check_invariants` for tests and debug runs.
//! 3. **Traces:** I/O and parse failures while loading a replay trace.

use std::path::PathBuf;

use thiserror::Error;

use super::addr::VirtAddr;

/// Invalid model configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// More entries may be pinned than the cache can hold.
    #[error("max_pinned ({max_pinned}) must not exceed cache_size ({cache_size})")]
    PinnedExceedsCapacity {
        /// Configured pin-set bound.
        max_pinned: u64,
        /// Configured cache capacity.
        cache_size: u64,
    },

    /// A zero pin threshold would pin on the very first access.
    #[error("pin_threshold must be at least 1")]
    ZeroPinThreshold,

    /// The lower clamp of the phase controller is zero.
    #[error("phase.min_threshold must be at least 1")]
    ZeroMinThreshold,

    /// The phase clamp range is empty.
    #[error("phase.min_threshold ({min}) is greater than phase.max_threshold ({max})")]
    InvertedThresholdRange {
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },

    /// The initial threshold lies outside the phase clamp range.
    #[error("pin_threshold ({threshold}) is outside the phase range [{min}, {max}]")]
    ThresholdOutOfRange {
        /// Configured initial threshold.
        threshold: u64,
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },

    /// The feedback policy cannot move the threshold by zero.
    #[error("phase.step must be at least 1 for the feedback policy")]
    ZeroPhaseStep,

    /// The primary TLB has no entries.
    #[error("tlb.size must be at least 1")]
    ZeroTlbSize,

    /// The primary TLB is larger than the model allows.
    #[error("tlb.size ({size}) must not exceed {max}")]
    TlbSizeTooLarge {
        /// Requested entry count.
        size: usize,
        /// Largest accepted entry count.
        max: usize,
    },

    /// A configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A violated internal invariant of the inner cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// More resident entries than the configured capacity.
    #[error("store holds {len} entries but cache_size is {capacity}")]
    CapacityExceeded {
        /// Resident entries.
        len: usize,
        /// Configured capacity.
        capacity: u64,
    },

    /// More pinned entries than allowed.
    #[error("{pinned} entries are pinned but max_pinned is {max}")]
    PinLimitExceeded {
        /// Pinned entries found in the store.
        pinned: usize,
        /// Configured pin-set bound.
        max: u64,
    },

    /// The cached pin count disagrees with the pinned flags in the store.
    #[error("pin count is {tracked} but {actual} entries carry the pinned flag")]
    PinCountMismatch {
        /// Counter maintained by the cache.
        tracked: usize,
        /// Entries actually flagged.
        actual: usize,
    },

    /// The recency index does not describe exactly the resident entries.
    #[error("recency index has {indexed} keys but store has {resident} entries")]
    RecencyMismatch {
        /// Keys in the recency index.
        indexed: usize,
        /// Entries in the store.
        resident: usize,
    },

    /// A resident entry's sequence stamp is missing from the recency index.
    #[error("entry {0} is not indexed under its last access sequence")]
    StaleSequence(VirtAddr),
}

/// Failure while loading a translation trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("failed to read trace {}: {source}", .path.display())]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line does not follow `<vaddr> <paddr> [r|w|x]`.
    #[error("line {line}: {reason}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}
