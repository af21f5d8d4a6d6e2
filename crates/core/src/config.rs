//! Configuration system for the inner cache model.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the model. It provides:
//! 1. **Defaults:** Baseline sizes for the host TLB, the inner cache and its phase controller.
//! 2. **Structures:** Hierarchical config for the TLB, the inner cache, and phase control.
//! 3. **Validation:** Fail-fast checks run once, before any cache is built.
//!
//! Configuration is supplied as JSON (every field optional) or via `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Default configuration constants for the model.
mod defaults {
    /// Primary TLB entry count.
    pub const TLB_SIZE: usize = 32;

    /// Inner cache capacity in entries.
    pub const INNER_CACHE_SIZE: u64 = 64;

    /// Maximum number of simultaneously pinned entries.
    pub const MAX_PINNED: u64 = 16;

    /// Accesses an entry needs before it qualifies for pinning.
    pub const PIN_THRESHOLD: u64 = 4;

    /// Observations per pinning phase.
    pub const PHASE_LENGTH: u64 = 1024;

    /// Threshold adjustment per phase for the feedback policy.
    pub const PHASE_STEP: u64 = 1;

    /// Lowest threshold the phase controller may select.
    pub const MIN_THRESHOLD: u64 = 1;

    /// Largest primary TLB the model will allocate.
    pub const MAX_TLB_SIZE: usize = 1 << 20;
}

/// Threshold adjustment strategies for the phase controller.
///
/// Selects which [`PhasePolicy`](crate::units::inner_cache::phase::PhasePolicy)
/// the cache is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum PhasePolicyKind {
    /// Keep the initial threshold for the whole run.
    #[default]
    #[serde(alias = "fixed", alias = "FIXED")]
    Fixed,
    /// Raise the threshold while a saturated pin set fails to improve the hit
    /// rate, lower it while the pin set is under half full.
    #[serde(alias = "feedback", alias = "FEEDBACK")]
    Feedback,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use ptecache_core::config::{Config, PhasePolicyKind};
///
/// let json = r#"{
///     "tlb": {
///         "size": 16,
///         "inner_cache": {
///             "cache_size": 128,
///             "max_pinned": 32,
///             "pin_threshold": 8,
///             "phase": { "length": 512, "policy": "Feedback", "step": 2 }
///         }
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.tlb.size, 16);
/// assert_eq!(config.tlb.inner_cache.max_pinned, 32);
/// assert_eq!(config.tlb.inner_cache.phase.policy, PhasePolicyKind::Feedback);
/// assert_eq!(config.tlb.inner_cache.phase.min_threshold, 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Host TLB configuration (includes the inner cache)
    #[serde(default)]
    pub tlb: TlbConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Validates every nested section.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tlb.validate()
    }
}

/// Host TLB configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlbConfig {
    /// Primary TLB entries (rounded up to a power of two)
    #[serde(default = "TlbConfig::default_size")]
    pub size: usize,

    /// Inner cache fed by this TLB
    #[serde(default)]
    pub inner_cache: InnerCacheConfig,
}

impl TlbConfig {
    /// Largest accepted `size`; a power of two, so rounding never exceeds it.
    pub const MAX_SIZE: usize = defaults::MAX_TLB_SIZE;

    /// Returns the default TLB size.
    const fn default_size() -> usize {
        defaults::TLB_SIZE
    }

    /// Validates the TLB and its inner cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTlbSize`], [`ConfigError::TlbSizeTooLarge`]
    /// or any inner cache error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroTlbSize);
        }
        if self.size > Self::MAX_SIZE {
            return Err(ConfigError::TlbSizeTooLarge {
                size: self.size,
                max: Self::MAX_SIZE,
            });
        }
        self.inner_cache.validate()
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            size: defaults::TLB_SIZE,
            inner_cache: InnerCacheConfig::default(),
        }
    }
}

/// Inner cache parameters. Fixed for the lifetime of a cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InnerCacheConfig {
    /// Maximum resident entries
    #[serde(default = "InnerCacheConfig::default_cache_size")]
    pub cache_size: u64,

    /// Maximum simultaneously pinned entries; must not exceed `cache_size`
    #[serde(default = "InnerCacheConfig::default_max_pinned")]
    pub max_pinned: u64,

    /// Initial access count an entry needs to qualify for pinning
    #[serde(default = "InnerCacheConfig::default_pin_threshold")]
    pub pin_threshold: u64,

    /// Phase controller settings
    #[serde(default)]
    pub phase: PhaseConfig,
}

impl InnerCacheConfig {
    /// Creates a configuration with the default phase settings.
    pub fn new(cache_size: u64, max_pinned: u64, pin_threshold: u64) -> Self {
        Self {
            cache_size,
            max_pinned,
            pin_threshold,
            phase: PhaseConfig::default(),
        }
    }

    /// Replaces the phase settings.
    #[must_use]
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phase = phase;
        self
    }

    const fn default_cache_size() -> u64 {
        defaults::INNER_CACHE_SIZE
    }

    const fn default_max_pinned() -> u64 {
        defaults::MAX_PINNED
    }

    const fn default_pin_threshold() -> u64 {
        defaults::PIN_THRESHOLD
    }

    /// Inclusive range the phase controller clamps thresholds into.
    ///
    /// An unset upper bound resolves to `max(cache_size, pin_threshold)`.
    pub fn threshold_range(&self) -> (u64, u64) {
        let max = self
            .phase
            .max_threshold
            .unwrap_or_else(|| self.cache_size.max(self.pin_threshold));
        (self.phase.min_threshold, max)
    }

    /// Checks the parameter combination.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pinned > self.cache_size {
            return Err(ConfigError::PinnedExceedsCapacity {
                max_pinned: self.max_pinned,
                cache_size: self.cache_size,
            });
        }
        if self.pin_threshold == 0 {
            return Err(ConfigError::ZeroPinThreshold);
        }
        if self.phase.min_threshold == 0 {
            return Err(ConfigError::ZeroMinThreshold);
        }
        let (min, max) = self.threshold_range();
        if min > max {
            return Err(ConfigError::InvertedThresholdRange { min, max });
        }
        if !(min..=max).contains(&self.pin_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                threshold: self.pin_threshold,
                min,
                max,
            });
        }
        if self.phase.policy == PhasePolicyKind::Feedback && self.phase.step == 0 {
            return Err(ConfigError::ZeroPhaseStep);
        }
        Ok(())
    }
}

impl Default for InnerCacheConfig {
    fn default() -> Self {
        Self::new(
            defaults::INNER_CACHE_SIZE,
            defaults::MAX_PINNED,
            defaults::PIN_THRESHOLD,
        )
    }
}

/// Phase controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhaseConfig {
    /// Observations per phase; 0 disables re-evaluation
    #[serde(default = "PhaseConfig::default_length")]
    pub length: u64,

    /// Threshold adjustment strategy
    #[serde(default)]
    pub policy: PhasePolicyKind,

    /// Threshold change per phase for the feedback policy
    #[serde(default = "PhaseConfig::default_step")]
    pub step: u64,

    /// Lowest threshold the controller may select
    #[serde(default = "PhaseConfig::default_min_threshold")]
    pub min_threshold: u64,

    /// Highest threshold the controller may select (defaults to `max(cache_size, pin_threshold)`)
    #[serde(default)]
    pub max_threshold: Option<u64>,
}

impl PhaseConfig {
    const fn default_length() -> u64 {
        defaults::PHASE_LENGTH
    }

    const fn default_step() -> u64 {
        defaults::PHASE_STEP
    }

    const fn default_min_threshold() -> u64 {
        defaults::MIN_THRESHOLD
    }

    /// Feedback policy with the given phase length and default step.
    pub fn feedback(length: u64) -> Self {
        Self {
            length,
            policy: PhasePolicyKind::Feedback,
            ..Self::default()
        }
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            length: defaults::PHASE_LENGTH,
            policy: PhasePolicyKind::Fixed,
            step: defaults::PHASE_STEP,
            min_threshold: defaults::MIN_THRESHOLD,
            max_threshold: None,
        }
    }
}
