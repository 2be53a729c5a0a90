//! Sensor field-of-view footprint projection.
//!
//! Projects the four edges of a rectangular field of view onto the ground
//! around a boresight depression and azimuth. Edges that graze or clear the
//! horizon are clamped to a fixed maximum range, with a blend band just above
//! the clamp so the far edge does not jump as it crosses it.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, GeometryResult};
use crate::horizon::is_beyond_horizon;
use crate::models::Point2D;
use crate::sensor::FieldOfView;
use crate::units::nm_to_ft;

/// Hard cap on projected ranges (nm).
pub const MAX_FOOTPRINT_RANGE_NM: f64 = 100.0;
/// Edges shallower than this are treated as reaching the range cap.
const MIN_EDGE_DEPRESSION_DEG: f64 = 1.0;
/// Upper bound of the far-edge blend band.
const BLEND_TOP_DEG: f64 = 5.0;
/// Fields of view at or above 180° have no finite footprint.
const MAX_FOV_DEG: f64 = 179.0;

/// Ground footprint of a sensor view.
///
/// Corners are ordered near-left, near-right, far-right, far-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    pub corners: [Point2D; 4],
    pub near_width: f64,
    pub far_width: f64,
    pub near_ground: f64,
    pub far_ground: f64,
    pub near_range: f64,
    pub far_range: f64,
    pub center_ground: f64,
    pub center_width: f64,
    pub far_edge_at_horizon: bool,
    pub far_edge_depression: f64,
}

/// Footprint of a sensor pointed at a specific target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFootprint {
    pub geometry: GeometryResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<FootprintResult>,
    /// The boresight ground point lies past the visual horizon
    pub center_beyond_horizon: bool,
}

/// Project a field of view onto the ground.
///
/// All angles are in degrees, `height_above_target_ft` in feet. Output is
/// finite for any depression in `(0, 90]` and positive height. Fields of view
/// outside `[0, 179]` are clamped into that range. The far-range
/// blend smooths the transition into the range cap but does not make the
/// derivative of `far_range` continuous.
pub fn calculate_footprint(
    depression_deg: f64,
    azimuth_deg: f64,
    hfov_deg: f64,
    vfov_deg: f64,
    height_above_target_ft: f64,
) -> FootprintResult {
    let hfov = hfov_deg.clamp(0.0, MAX_FOV_DEG);
    let vfov = vfov_deg.clamp(0.0, MAX_FOV_DEG);
    let height = height_above_target_ft;
    let max_range = nm_to_ft(MAX_FOOTPRINT_RANGE_NM);

    let dep_near = depression_deg + vfov / 2.0;
    let dep_far = depression_deg - vfov / 2.0;

    let near_range = slant_to_edge(height, dep_near.max(MIN_EDGE_DEPRESSION_DEG)).min(max_range);
    let far_range = far_edge_range(height, dep_far, max_range);

    let near_ground = ground_to_edge(height, dep_near, max_range);
    let far_ground = ground_to_edge(height, dep_far, max_range);

    let half_width_factor = (hfov / 2.0).to_radians().tan();
    let near_width = 2.0 * near_range * half_width_factor;
    let far_width = 2.0 * far_range * half_width_factor;

    let corners = [
        Point2D::from_track_offset(near_ground, -near_width / 2.0, azimuth_deg),
        Point2D::from_track_offset(near_ground, near_width / 2.0, azimuth_deg),
        Point2D::from_track_offset(far_ground, far_width / 2.0, azimuth_deg),
        Point2D::from_track_offset(far_ground, -far_width / 2.0, azimuth_deg),
    ];

    FootprintResult {
        corners,
        near_width,
        far_width,
        near_ground,
        far_ground,
        near_range,
        far_range,
        center_ground: (near_ground + far_ground) / 2.0,
        center_width: (near_width + far_width) / 2.0,
        far_edge_at_horizon: dep_far <= 0.0,
        far_edge_depression: dep_far,
    }
}

/// Point a sensor at a target and project its footprint.
///
/// The boresight depression comes from the forward geometry solver. When the
/// geometry is invalid no footprint is produced.
pub fn footprint_for_target(
    alt_msl_ft: f64,
    tgt_elev_ft: f64,
    ground_range_ft: f64,
    azimuth_deg: f64,
    fov: FieldOfView,
) -> TargetFootprint {
    let geometry = geometry::forward(alt_msl_ft, tgt_elev_ft, ground_range_ft);
    if !geometry.valid || geometry.depression_deg <= 0.0 {
        return TargetFootprint {
            geometry,
            footprint: None,
            center_beyond_horizon: false,
        };
    }

    let footprint = calculate_footprint(
        geometry.depression_deg,
        azimuth_deg,
        fov.hfov_deg,
        fov.vfov_deg,
        geometry.height_above_target_ft,
    );
    let center_beyond_horizon =
        is_beyond_horizon(ground_range_ft, geometry.height_above_target_ft);

    TargetFootprint {
        geometry,
        footprint: Some(footprint),
        center_beyond_horizon,
    }
}

fn slant_to_edge(height: f64, dep_deg: f64) -> f64 {
    height / dep_deg.to_radians().sin()
}

fn ground_to_edge(height: f64, dep_deg: f64, max_range: f64) -> f64 {
    (height / dep_deg.max(MIN_EDGE_DEPRESSION_DEG).to_radians().tan()).min(max_range)
}

/// Far-edge slant range with the three-zone horizon policy.
fn far_edge_range(height: f64, dep_far: f64, max_range: f64) -> f64 {
    if dep_far <= MIN_EDGE_DEPRESSION_DEG {
        return max_range;
    }

    let candidate = slant_to_edge(height, dep_far);
    if dep_far <= BLEND_TOP_DEG {
        let blend = ((dep_far - MIN_EDGE_DEPRESSION_DEG)
            / (BLEND_TOP_DEG - MIN_EDGE_DEPRESSION_DEG))
            .clamp(0.0, 1.0);
        let blended = max_range + (candidate - max_range) * blend * 0.5;
        return candidate.min(blended).min(max_range);
    }

    candidate.min(max_range)
}
