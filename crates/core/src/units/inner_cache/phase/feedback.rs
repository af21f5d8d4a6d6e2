//! Hit-rate feedback policy.
//!
//! A simple occupancy/trend controller:
//!
//! - The pin set is saturated and the phase hit rate did not beat the previous
//!   phase: pinning is not paying off, so raise the threshold by `step` and
//!   admit only hotter entries.
//! - The pin set is less than half full: too few entries qualify, so lower the
//!   threshold by `step`.
//! - Otherwise keep the threshold.
//!
//! The first phase has no previous hit rate and never raises the threshold.

use super::{PhasePolicy, PhaseWindow};

/// Steps the threshold from pin-set occupancy and hit-rate trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitRateFeedback {
    step: u64,
}

impl HitRateFeedback {
    /// Creates the policy; a zero step is treated as 1.
    pub fn new(step: u64) -> Self {
        Self { step: step.max(1) }
    }

    /// Threshold change per phase.
    pub const fn step(&self) -> u64 {
        self.step
    }
}

impl Default for HitRateFeedback {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PhasePolicy for HitRateFeedback {
    fn name(&self) -> &'static str {
        "feedback"
    }

    fn evaluate(&mut self, window: &PhaseWindow) -> Option<u64> {
        let improved = window
            .previous_hit_rate
            .is_none_or(|prev| window.hit_rate() > prev);

        if window.pin_set_saturated() && !improved {
            Some(window.threshold.saturating_add(self.step))
        } else if window.pinned_len.saturating_mul(2) < window.max_pinned {
            Some(window.threshold.saturating_sub(self.step))
        } else {
            None
        }
    }
}
