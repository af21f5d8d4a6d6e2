//! Pinning phase control.
//!
//! The pin threshold (accesses an entry needs before it may be pinned) is held
//! constant for a *phase* of `length` observations. When a phase closes, the
//! controller hands a [`PhaseWindow`] summary to its [`PhasePolicy`], clamps
//! the proposed threshold into the configured range, and starts a new window.
//!
//! # Policies
//!
//! - `FixedThreshold`: never changes the threshold.
//! - `HitRateFeedback`: steps the threshold up or down from pin-set occupancy
//!   and the hit-rate trend.

/// Threshold feedback policy.
pub mod feedback;

/// Constant-threshold policy.
pub mod fixed;

use std::fmt;

use tracing::debug;

pub use feedback::HitRateFeedback;
pub use fixed::FixedThreshold;

use crate::config::{InnerCacheConfig, PhaseConfig, PhasePolicyKind};

/// Observations gathered during one phase, handed to a [`PhasePolicy`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseWindow {
    /// Zero-based index of the phase that just closed.
    pub phase: u64,
    /// Observations in this phase.
    pub accesses: u64,
    /// Observations that hit.
    pub hits: u64,
    /// Observations that missed.
    pub misses: u64,
    /// Hits on entries that were pinned at the time.
    pub pinned_hits: u64,
    /// Pin operations performed in this phase.
    pub pins: u64,
    /// Pin-set size when the phase closed.
    pub pinned_len: u64,
    /// Configured pin-set bound.
    pub max_pinned: u64,
    /// Threshold in force during this phase.
    pub threshold: u64,
    /// Hit rate of the previous phase, if there was one.
    pub previous_hit_rate: Option<f64>,
}

impl PhaseWindow {
    /// Hit fraction of this phase; zero for an empty window.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// The pin set is at its bound.
    pub const fn pin_set_saturated(&self) -> bool {
        self.max_pinned > 0 && self.pinned_len >= self.max_pinned
    }
}

/// Strategy deciding the next phase's pin threshold.
///
/// Implementations see only the window summary and never touch cache state,
/// so they can be unit tested in isolation.
pub trait PhasePolicy: fmt::Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Proposes a threshold for the next phase, or `None` to keep the current one.
    ///
    /// The controller clamps the proposal into its configured range.
    fn evaluate(&mut self, window: &PhaseWindow) -> Option<u64>;
}

/// Builds the policy selected in the configuration.
pub fn policy_for(config: &PhaseConfig) -> Box<dyn PhasePolicy> {
    match config.policy {
        PhasePolicyKind::Fixed => Box::new(FixedThreshold),
        PhasePolicyKind::Feedback => Box::new(HitRateFeedback::new(config.step)),
    }
}

/// Current threshold plus the bookkeeping for the open phase.
#[derive(Debug)]
pub struct PhaseController {
    threshold: u64,
    min_threshold: u64,
    max_threshold: u64,
    length: u64,
    phase: u64,
    window: PhaseWindow,
    previous_hit_rate: Option<f64>,
    policy: Box<dyn PhasePolicy>,
}

impl PhaseController {
    /// Creates a controller starting at `config.pin_threshold`.
    ///
    /// Only built from a validated `config`, so the clamp range is never inverted.
    pub(crate) fn new(config: &InnerCacheConfig, policy: Box<dyn PhasePolicy>) -> Self {
        let (min_threshold, max_threshold) = config.threshold_range();
        Self {
            threshold: config.pin_threshold,
            min_threshold,
            max_threshold,
            length: config.phase.length,
            phase: 0,
            window: PhaseWindow::default(),
            previous_hit_rate: None,
            policy,
        }
    }

    /// Threshold in force.
    pub const fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Index of the open phase.
    pub const fn phase(&self) -> u64 {
        self.phase
    }

    /// Observations per phase (0 = never re-evaluate).
    pub const fn length(&self) -> u64 {
        self.length
    }

    /// Inclusive clamp range.
    pub const fn range(&self) -> (u64, u64) {
        (self.min_threshold, self.max_threshold)
    }

    /// Name of the active policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Counts one observation in the open window.
    pub(crate) fn record_access(&mut self, hit: bool, pinned_hit: bool) {
        self.window.accesses += 1;
        if hit {
            self.window.hits += 1;
            if pinned_hit {
                self.window.pinned_hits += 1;
            }
        } else {
            self.window.misses += 1;
        }
    }

    /// Counts one pin operation in the open window.
    pub(crate) fn record_pin(&mut self) {
        self.window.pins += 1;
    }

    /// Closes the phase if it is complete.
    ///
    /// Returns the new threshold when the policy changed it.
    pub(crate) fn end_access(&mut self, pinned_len: u64, max_pinned: u64) -> Option<u64> {
        if self.length == 0 || self.window.accesses < self.length {
            return None;
        }

        let window = PhaseWindow {
            phase: self.phase,
            pinned_len,
            max_pinned,
            threshold: self.threshold,
            previous_hit_rate: self.previous_hit_rate,
            ..self.window
        };
        let proposed = self.policy.evaluate(&window);

        self.previous_hit_rate = Some(window.hit_rate());
        self.window = PhaseWindow::default();
        self.phase += 1;

        let next = proposed?.clamp(self.min_threshold, self.max_threshold);
        if next == self.threshold {
            return None;
        }
        debug!(
            policy = self.policy.name(),
            phase = window.phase,
            hit_rate = window.hit_rate(),
            old = self.threshold,
            new = next,
            "pin threshold changed"
        );
        self.threshold = next;
        Some(next)
    }
}
