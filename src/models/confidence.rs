//! Confidence scores attached to insights and counters.

use serde::{Deserialize, Serialize};

/// Upper bound of any confidence score.
pub const MAX_CONFIDENCE: u8 = 100;

/// A 0-100 confidence score.
///
/// Construction always clamps, so a `Confidence` can never leave `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// Create a confidence score, clamping into `[0, 100]`.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, MAX_CONFIDENCE as i64) as u8)
    }

    /// Sample-size scaled confidence: `min(base + samples * per_sample, ceiling)`.
    ///
    /// Non-decreasing in `samples`. The result is rounded and clamped.
    pub fn scaled(base: f64, per_sample: f64, samples: usize, ceiling: f64) -> Self {
        let raw = (base + samples as f64 * per_sample.max(0.0)).min(ceiling);
        if raw.is_finite() {
            Self::new(raw.round() as i64)
        } else {
            Self::new(base as i64)
        }
    }

    /// Get the raw score.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Cap the score at `ceiling`.
    pub fn capped(self, ceiling: u8) -> Self {
        Self(self.0.min(ceiling))
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence(50)
    }
}

impl From<i64> for Confidence {
    fn from(value: i64) -> Self {
        Confidence::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
