//! Trace replay.
//!
//! Drives a host [`Tlb`](crate::Tlb) from a recorded translation trace so the
//! inner cache can be studied offline. It provides:
//! 1. **Parsing:** A line-oriented text format, one completed translation per line.
//! 2. **Replay:** Feeds every record through the TLB and returns a statistics snapshot.

/// Trace file format and parser.
pub mod trace;

/// Replay driver.
pub mod replay;

pub use replay::{Replay, replay};
pub use trace::{TraceRecord, load_trace, parse_trace};
