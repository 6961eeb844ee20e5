//! Randomized pacing policy.
//!
//! Every pause the pipeline takes between browser actions is drawn from a
//! configured uniform range rather than hard-coded, so operators can tune how
//! human the traffic looks and tests can zero the delays out entirely.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A uniform delay distribution over `[min_ms, max_ms]` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayRange {
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds.
    pub max_ms: u64,
}

impl DelayRange {
    /// Create a range from explicit bounds.
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always samples zero. Used by tests.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    /// Draw one delay from the range.
    ///
    /// A degenerate range (`max_ms <= min_ms`) always yields `min_ms`.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::zero()
    }
}

/// Named pauses taken at fixed points in the pipeline.
///
/// Defaults approximate a human reading pace: roughly a second between
/// scroll steps, a short breath before navigating to a profile, a longer one
/// after the page loads so lazy content can render, and a token pause before
/// tearing the session down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each scroll step during collection.
    pub scroll: DelayRange,
    /// Pause before navigating to a profile page.
    pub pre_navigation: DelayRange,
    /// Pause after a profile page load, before evaluation.
    pub post_load: DelayRange,
    /// Pause before closing a worker session.
    pub pre_close: DelayRange,
}

impl PacingConfig {
    /// All pauses zeroed. Used by tests.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            scroll: DelayRange::zero(),
            pre_navigation: DelayRange::zero(),
            post_load: DelayRange::zero(),
            pre_close: DelayRange::zero(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            scroll: DelayRange::new(1000, 1500),
            pre_navigation: DelayRange::new(700, 1500),
            post_load: DelayRange::new(1500, 2500),
            pre_close: DelayRange::new(200, 600),
        }
    }
}
