//! Constant-threshold policy.
//!
//! Keeps the configured initial threshold for the whole run. This is the
//! default: it isolates the effect of pinning itself from any adaptation.

use super::{PhasePolicy, PhaseWindow};

/// Never proposes a change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedThreshold;

impl PhasePolicy for FixedThreshold {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn evaluate(&mut self, _window: &PhaseWindow) -> Option<u64> {
        None
    }
}
