//! Visual horizon on a spherical earth.

use crate::units::EARTH_RADIUS_FT;

/// Surface distance (ft) to the visual horizon for an observer `altitude_ft`
/// above the surface it is looking at.
///
/// Uses the small-angle approximation `sqrt(2·R·h)`. Non-positive altitudes
/// have no horizon and return 0.
pub fn horizon_distance(altitude_ft: f64) -> f64 {
    if altitude_ft <= 0.0 {
        return 0.0;
    }
    (2.0 * EARTH_RADIUS_FT * altitude_ft).sqrt()
}

/// True when a point `ground_range_ft` away lies past the visual horizon.
pub fn is_beyond_horizon(ground_range_ft: f64, altitude_ft: f64) -> bool {
    ground_range_ft > horizon_distance(altitude_ft)
}

/// Depression angle (deg) of the horizon itself, the dip below local level.
pub fn horizon_dip_deg(altitude_ft: f64) -> f64 {
    if altitude_ft <= 0.0 {
        return 0.0;
    }
    (EARTH_RADIUS_FT / (EARTH_RADIUS_FT + altitude_ft))
        .acos()
        .to_degrees()
}
