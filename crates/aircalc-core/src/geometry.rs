//! Spherical-earth line-of-sight solver.
//!
//! Converts between ground range, slant range and depression angle for an
//! aircraft looking down at a target. The forward solver is the single source
//! of truth: both inverse forms recover a ground range and then re-derive the
//! rest of the record through [`forward`], so a converted result always
//! matches what the forward path would have produced for that range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::EARTH_RADIUS_FT;

/// Maximum bisection steps for [`from_depression`].
pub const DEPRESSION_MAX_ITERATIONS: usize = 50;
/// Bisection stops once the trial depression is within this many degrees.
pub const DEPRESSION_TOLERANCE_DEG: f64 = 1e-4;

/// Domain violations reported by the solver.
///
/// These are returned inside result records, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Aircraft must be above target")]
    AircraftBelowTarget,
    #[error("Ground range cannot be negative")]
    NegativeGroundRange,
    #[error("Slant range must be positive")]
    NonPositiveSlantRange,
    #[error("Slant range cannot be less than height above target")]
    SlantRangeBelowHeight,
    #[error("Depression angle must be positive")]
    NonPositiveDepression,
    #[error("No valid geometry for given parameters")]
    NoValidGeometry,
}

/// Line-of-sight geometry between an aircraft and a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryResult {
    pub slant_range_ft: f64,
    /// Degrees below local horizontal, in `[0, 90]` when valid.
    pub depression_deg: f64,
    pub height_above_target_ft: f64,
    /// Earth central angle between the two points (radians)
    pub central_angle_rad: f64,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeometryResult {
    fn invalid(height_above_target_ft: f64, err: GeometryError) -> Self {
        Self {
            slant_range_ft: 0.0,
            depression_deg: 0.0,
            height_above_target_ft,
            central_angle_rad: 0.0,
            valid: false,
            error: Some(err.to_string()),
        }
    }

    fn overhead(height_above_target_ft: f64) -> Self {
        Self {
            slant_range_ft: height_above_target_ft,
            depression_deg: 90.0,
            height_above_target_ft,
            central_angle_rad: 0.0,
            valid: true,
            error: None,
        }
    }
}

/// Result of an inverse conversion (slant range or depression to ground range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConversionResult {
    pub ground_range_ft: f64,
    pub slant_range_ft: f64,
    pub depression_deg: f64,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RangeConversionResult {
    fn invalid(err: GeometryError) -> Self {
        Self {
            ground_range_ft: 0.0,
            slant_range_ft: 0.0,
            depression_deg: 0.0,
            valid: false,
            error: Some(err.to_string()),
        }
    }

    /// Re-derive slant range and depression from the forward solver.
    fn from_ground_range(alt_msl_ft: f64, tgt_elev_ft: f64, ground_range_ft: f64) -> Self {
        let geometry = forward(alt_msl_ft, tgt_elev_ft, ground_range_ft);
        Self {
            ground_range_ft,
            slant_range_ft: geometry.slant_range_ft,
            depression_deg: geometry.depression_deg,
            valid: geometry.valid,
            error: geometry.error,
        }
    }
}

/// Solve slant range and depression for a ground range.
///
/// # Arguments
/// * `alt_msl_ft` - Aircraft altitude above mean sea level
/// * `tgt_elev_ft` - Target elevation above mean sea level
/// * `ground_range_ft` - Surface distance from the aircraft's nadir to the target
pub fn forward(alt_msl_ft: f64, tgt_elev_ft: f64, ground_range_ft: f64) -> GeometryResult {
    let height = alt_msl_ft - tgt_elev_ft;
    // Negated comparison also rejects NaN
    if !(height > 0.0) {
        return GeometryResult::invalid(height, GeometryError::AircraftBelowTarget);
    }
    if !(ground_range_ft >= 0.0) {
        return GeometryResult::invalid(height, GeometryError::NegativeGroundRange);
    }
    if ground_range_ft == 0.0 {
        return GeometryResult::overhead(height);
    }

    let r_aircraft = EARTH_RADIUS_FT + alt_msl_ft;
    let r_target = EARTH_RADIUS_FT + tgt_elev_ft;
    let central_angle = ground_range_ft / EARTH_RADIUS_FT;

    // Law of cosines, written as h² + 4·ra·rt·sin²(θ/2) so the two large
    // radii never cancel against each other.
    let half_sin = (central_angle / 2.0).sin();
    let slant_range = (height * height + 4.0 * r_aircraft * r_target * half_sin * half_sin).sqrt();

    let vertical_drop = height + r_target * (1.0 - central_angle.cos());
    let horizontal_dist = r_target * central_angle.sin();
    let depression = vertical_drop
        .atan2(horizontal_dist)
        .to_degrees()
        .clamp(0.0, 90.0);

    GeometryResult {
        slant_range_ft: slant_range,
        depression_deg: depression,
        height_above_target_ft: height,
        central_angle_rad: central_angle,
        valid: true,
        error: None,
    }
}

/// Recover ground range from a measured slant range.
pub fn from_slant_range(
    alt_msl_ft: f64,
    tgt_elev_ft: f64,
    slant_range_ft: f64,
) -> RangeConversionResult {
    let height = alt_msl_ft - tgt_elev_ft;
    if !(height > 0.0) {
        return RangeConversionResult::invalid(GeometryError::AircraftBelowTarget);
    }
    if !(slant_range_ft > 0.0) {
        return RangeConversionResult::invalid(GeometryError::NonPositiveSlantRange);
    }
    if slant_range_ft < height {
        return RangeConversionResult::invalid(GeometryError::SlantRangeBelowHeight);
    }

    let r_aircraft = EARTH_RADIUS_FT + alt_msl_ft;
    let r_target = EARTH_RADIUS_FT + tgt_elev_ft;

    // cos θ = (ra² + rt² − s²) / (2·ra·rt), carried as sin²(θ/2) = (1 − cos θ) / 2
    let half_sin_sq =
        (slant_range_ft * slant_range_ft - height * height) / (4.0 * r_aircraft * r_target);
    let cos_central = 1.0 - 2.0 * half_sin_sq;
    if !(-1.0..=1.0).contains(&cos_central) {
        return RangeConversionResult::invalid(GeometryError::NoValidGeometry);
    }

    let central_angle = 2.0 * half_sin_sq.sqrt().asin();
    let ground_range = central_angle * EARTH_RADIUS_FT;

    RangeConversionResult::from_ground_range(alt_msl_ft, tgt_elev_ft, ground_range)
}

/// Recover ground range from a depression angle.
///
/// There is no closed form once curvature is included, so this bisects on
/// ground range using the fact that forward depression does not increase with
/// range on the visible side of the horizon. The upper bracket is three times
/// the flat-earth estimate, capped at the horizon distance.
///
/// If the search has not met [`DEPRESSION_TOLERANCE_DEG`] after
/// [`DEPRESSION_MAX_ITERATIONS`] steps the midpoint of the final bracket is
/// returned as the best estimate. That is an accepted precision/performance
/// trade-off: fifty halvings already resolve the bracket far below a foot.
pub fn from_depression(
    alt_msl_ft: f64,
    tgt_elev_ft: f64,
    depression_deg: f64,
) -> RangeConversionResult {
    let height = alt_msl_ft - tgt_elev_ft;
    if !(height > 0.0) {
        return RangeConversionResult::invalid(GeometryError::AircraftBelowTarget);
    }
    if !(depression_deg > 0.0) {
        return RangeConversionResult::invalid(GeometryError::NonPositiveDepression);
    }
    if depression_deg >= 90.0 {
        return RangeConversionResult::from_ground_range(alt_msl_ft, tgt_elev_ft, 0.0);
    }

    let flat_estimate = height / depression_deg.to_radians().tan();
    let horizon = (2.0 * EARTH_RADIUS_FT * height).sqrt();
    let mut low = 0.0;
    let mut high = (3.0 * flat_estimate).min(horizon);
    let mut mid = (low + high) / 2.0;
    let mut converged = false;

    for _ in 0..DEPRESSION_MAX_ITERATIONS {
        mid = (low + high) / 2.0;
        let trial = forward(alt_msl_ft, tgt_elev_ft, mid).depression_deg;
        if (trial - depression_deg).abs() < DEPRESSION_TOLERANCE_DEG {
            converged = true;
            break;
        }
        if trial > depression_deg {
            // Looking too steeply: target is further out
            low = mid;
        } else {
            high = mid;
        }
    }

    if !converged {
        tracing::debug!(
            alt_msl_ft,
            tgt_elev_ft,
            depression_deg,
            ground_range_ft = mid,
            "Depression search hit iteration limit, returning best estimate"
        );
    }

    RangeConversionResult::from_ground_range(alt_msl_ft, tgt_elev_ft, mid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::nm_to_ft;

    #[test]
    fn overhead_is_exact() {
        let result = forward(25_000.0, 1_000.0, 0.0);
        assert!(result.valid);
        assert_eq!(result.depression_deg, 90.0);
        assert_eq!(result.slant_range_ft, 24_000.0);
        assert_eq!(result.central_angle_rad, 0.0);
    }

    #[test]
    fn aircraft_below_target_is_invalid() {
        let result = forward(1_000.0, 1_000.0, 0.0);
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some("Aircraft must be above target"));

        let result = forward(500.0, 1_000.0, 20_000.0);
        assert!(!result.valid);
    }

    #[test]
    fn negative_ground_range_is_invalid() {
        let result = forward(10_000.0, 0.0, -1.0);
        assert!(!result.valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Ground range cannot be negative")
        );
    }

    #[test]
    fn short_range_matches_flat_earth() {
        // Over a mile the curvature term is negligible
        let result = forward(10_000.0, 0.0, 5_280.0);
        let flat_slant = (10_000.0_f64.powi(2) + 5_280.0_f64.powi(2)).sqrt();
        let flat_dep = 10_000.0_f64.atan2(5_280.0).to_degrees();
        assert!((result.slant_range_ft - flat_slant).abs() < 1.0);
        assert!((result.depression_deg - flat_dep).abs() < 0.01);
    }

    #[test]
    fn curvature_steepens_depression_at_long_range() {
        let ground = nm_to_ft(60.0);
        let result = forward(30_000.0, 0.0, ground);
        let flat_dep = 30_000.0_f64.atan2(ground).to_degrees();
        assert!(result.valid);
        assert!(result.depression_deg > flat_dep + 0.3);
    }

    #[test]
    fn slant_range_round_trip() {
        let ground = 123_456.0;
        let fwd = forward(20_000.0, 500.0, ground);
        let inv = from_slant_range(20_000.0, 500.0, fwd.slant_range_ft);
        assert!(inv.valid);
        assert!((inv.ground_range_ft - ground).abs() < 0.01);
        assert_eq!(inv.depression_deg, forward(20_000.0, 500.0, inv.ground_range_ft).depression_deg);
    }

    #[test]
    fn slant_range_shorter_than_height_is_rejected() {
        let result = from_slant_range(10_000.0, 0.0, 9_000.0);
        assert!(!result.valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Slant range cannot be less than height above target")
        );
        assert!(!from_slant_range(10_000.0, 0.0, 0.0).valid);
        assert!(!from_slant_range(0.0, 10.0, 5_000.0).valid);
    }

    #[test]
    fn slant_range_past_antipode_has_no_geometry() {
        let result = from_slant_range(10_000.0, 0.0, 3.0 * EARTH_RADIUS_FT);
        assert!(!result.valid);
        assert_eq!(
            result.error.as_deref(),
            Some("No valid geometry for given parameters")
        );
    }

    #[test]
    fn depression_round_trip() {
        let fwd = forward(15_000.0, 0.0, 40_000.0);
        let inv = from_depression(15_000.0, 0.0, fwd.depression_deg);
        assert!(inv.valid);
        assert!((inv.depression_deg - fwd.depression_deg).abs() < DEPRESSION_TOLERANCE_DEG);
        assert!((inv.ground_range_ft - 40_000.0).abs() < 10.0);
    }

    #[test]
    fn steep_depression_is_overhead() {
        let result = from_depression(8_000.0, 0.0, 95.0);
        assert!(result.valid);
        assert_eq!(result.ground_range_ft, 0.0);
        assert_eq!(result.slant_range_ft, 8_000.0);
        assert_eq!(result.depression_deg, 90.0);
    }

    #[test]
    fn non_positive_depression_is_rejected() {
        let result = from_depression(8_000.0, 0.0, 0.0);
        assert!(!result.valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Depression angle must be positive")
        );
    }

    #[test]
    fn depression_below_horizon_dip_settles_on_horizon() {
        // Dip at 1000 ft is about 0.56°, so 0.1° has no visible solution
        let result = from_depression(1_000.0, 0.0, 0.1);
        assert!(result.valid);
        let horizon = (2.0 * EARTH_RADIUS_FT * 1_000.0).sqrt();
        assert!((result.ground_range_ft - horizon).abs() < 1.0);
    }

    #[test]
    fn invalid_result_serializes_error() {
        let json = serde_json::to_value(forward(0.0, 10.0, 0.0)).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "Aircraft must be above target");
    }
}
