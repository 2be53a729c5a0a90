//! Deconfliction policy thresholds.

use serde::{Deserialize, Serialize};

/// Time separation below which traffic is classified red (seconds).
pub const RED_SEPARATION_SECS: f64 = 60.0;
/// Time separation below which traffic is classified yellow (seconds).
pub const YELLOW_SEPARATION_SECS: f64 = 180.0;
/// Largest margin of error accepted on a traffic speed estimate (percent).
pub const MAX_MARGIN_OF_ERROR_PERCENT: f64 = 25.0;

/// Configuration for deconfliction status classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeconflictionPolicy {
    /// Separation under this is red (seconds)
    pub red_separation_secs: f64,
    /// Separation under this is yellow (seconds)
    pub yellow_separation_secs: f64,
    /// Margin-of-error inputs are clamped to `[0, max]` percent
    pub max_margin_of_error_percent: f64,
}

impl Default for DeconflictionPolicy {
    fn default() -> Self {
        Self {
            red_separation_secs: RED_SEPARATION_SECS,
            yellow_separation_secs: YELLOW_SEPARATION_SECS,
            max_margin_of_error_percent: MAX_MARGIN_OF_ERROR_PERCENT,
        }
    }
}

impl DeconflictionPolicy {
    /// Clamp a user-entered margin of error. NaN counts as zero.
    pub fn clamp_margin(&self, margin_percent: f64) -> f64 {
        if margin_percent.is_nan() {
            return 0.0;
        }
        margin_percent.clamp(0.0, self.max_margin_of_error_percent.max(0.0))
    }
}
