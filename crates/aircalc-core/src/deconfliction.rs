//! Air deconfliction timing.
//!
//! Ownship and one traffic aircraft are both converging on a shared point.
//! Only distance and ground speed along each track are known; bearings are
//! not tracked, so closest approach is evaluated at the shared point.

use serde::{Deserialize, Serialize};

use crate::rules::DeconflictionPolicy;
use crate::units::SECONDS_PER_HOUR;

/// Separation status at the shared point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparationStatus {
    /// Separation under the red threshold
    Red,
    /// Separation under the yellow threshold
    Yellow,
    /// Adequate separation
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstToArrive {
    Own,
    Traffic,
}

/// User-entered deconfliction scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeconflictionInput {
    pub own_distance_nm: f64,
    pub own_ground_speed_kt: f64,
    pub traffic_distance_nm: f64,
    pub traffic_ground_speed_kt: f64,
    /// Uncertainty on the traffic ground speed estimate (percent)
    #[serde(default)]
    pub margin_of_error_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeconflictionResult {
    /// Seconds between the two arrivals at the shared point
    pub time_separation: f64,
    pub cpa_distance_nm: f64,
    pub cpa_time_seconds: f64,
    pub first_to_arrive: FirstToArrive,
    pub status: SeparationStatus,
    pub own_eta_seconds: f64,
    pub traffic_eta_seconds: f64,
    /// Traffic ground speed the estimate assumed after applying the margin
    pub assumed_traffic_speed_kt: f64,
}

/// Time to cover `distance_nm` at `ground_speed_kt`, in seconds.
///
/// Returns `None` unless both operands are strictly positive and finite.
pub fn eta_seconds(distance_nm: f64, ground_speed_kt: f64) -> Option<f64> {
    if !is_positive(distance_nm) || !is_positive(ground_speed_kt) {
        return None;
    }
    Some(distance_nm / ground_speed_kt * SECONDS_PER_HOUR)
}

/// Estimate separation using the default policy.
pub fn estimate(input: &DeconflictionInput) -> Option<DeconflictionResult> {
    estimate_with_policy(input, &DeconflictionPolicy::default())
}

/// Estimate separation at the shared point.
///
/// Any non-positive distance or speed yields `None`; the caller shows a
/// placeholder rather than an error.
pub fn estimate_with_policy(
    input: &DeconflictionInput,
    policy: &DeconflictionPolicy,
) -> Option<DeconflictionResult> {
    let own_eta = eta_seconds(input.own_distance_nm, input.own_ground_speed_kt)?;
    // Validates traffic inputs before the margin is applied
    eta_seconds(input.traffic_distance_nm, input.traffic_ground_speed_kt)?;

    let margin = policy.clamp_margin(input.margin_of_error_percent);
    let traffic_speed = worst_case_traffic_speed(
        own_eta,
        input.traffic_distance_nm,
        input.traffic_ground_speed_kt,
        margin,
    );
    let traffic_eta = eta_seconds(input.traffic_distance_nm, traffic_speed)?;

    let time_separation = (own_eta - traffic_eta).abs();
    let (first_to_arrive, later_speed_kt) = if own_eta <= traffic_eta {
        (FirstToArrive::Own, traffic_speed)
    } else {
        (FirstToArrive::Traffic, input.own_ground_speed_kt)
    };

    // When the first aircraft reaches the point, the other is still this far out
    let cpa_distance_nm = later_speed_kt * time_separation / SECONDS_PER_HOUR;

    Some(DeconflictionResult {
        time_separation,
        cpa_distance_nm,
        cpa_time_seconds: own_eta.min(traffic_eta),
        first_to_arrive,
        status: classify(time_separation, policy),
        own_eta_seconds: own_eta,
        traffic_eta_seconds: traffic_eta,
        assumed_traffic_speed_kt: traffic_speed,
    })
}

/// Classify a time separation against the policy thresholds.
pub fn classify(time_separation_secs: f64, policy: &DeconflictionPolicy) -> SeparationStatus {
    if time_separation_secs < policy.red_separation_secs {
        SeparationStatus::Red
    } else if time_separation_secs < policy.yellow_separation_secs {
        SeparationStatus::Yellow
    } else {
        SeparationStatus::Green
    }
}

/// Traffic ground speed within `speed·(1 ± margin)` that brings the traffic
/// ETA closest to ownship's.
///
/// Traffic ETA is monotonic in speed, so the closest achievable ETA is own ETA
/// clamped into the ETA interval the margin allows. That is an interior speed
/// when own ETA falls inside the interval and one of the two perturbed
/// endpoints otherwise. Minimising apparent separation is the conservative
/// reading of an uncertain speed.
fn worst_case_traffic_speed(
    own_eta: f64,
    traffic_distance_nm: f64,
    traffic_speed_kt: f64,
    margin_percent: f64,
) -> f64 {
    if margin_percent <= 0.0 {
        return traffic_speed_kt;
    }

    let fraction = margin_percent / 100.0;
    let fast = traffic_speed_kt * (1.0 + fraction);
    let slow = traffic_speed_kt * (1.0 - fraction);

    let earliest = traffic_distance_nm / fast * SECONDS_PER_HOUR;
    let latest = traffic_distance_nm / slow * SECONDS_PER_HOUR;
    let target_eta = own_eta.clamp(earliest, latest);

    if target_eta <= earliest {
        fast
    } else if target_eta >= latest {
        slow
    } else {
        traffic_distance_nm / target_eta * SECONDS_PER_HOUR
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
