//! Scalar unit conversions used throughout the engine.
//!
//! Everything internal is carried in feet, seconds and degrees; these helpers
//! translate at the edges.

pub const FEET_PER_NM: f64 = 6076.115_49;
pub const FEET_PER_METER: f64 = 3.280_839_895;
pub const FEET_PER_KM: f64 = FEET_PER_METER * 1000.0;
pub const FEET_PER_YARD: f64 = 3.0;
pub const KM_PER_NM: f64 = 1.852;
/// Feet per second in one knot.
pub const FPS_PER_KNOT: f64 = FEET_PER_NM / 3600.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Mean earth radius used by the spherical model (ft).
pub const EARTH_RADIUS_FT: f64 = 20_902_231.0;

/// Standard gravity in ft/s².
pub const GRAVITY_FPS2: f64 = 32.174_05;

/// Tropopause altitude in the International Standard Atmosphere (ft).
pub const TROPOPAUSE_FT: f64 = 36_089.24;

pub fn ft_to_nm(ft: f64) -> f64 {
    ft / FEET_PER_NM
}

pub fn nm_to_ft(nm: f64) -> f64 {
    nm * FEET_PER_NM
}

pub fn ft_to_km(ft: f64) -> f64 {
    ft / FEET_PER_KM
}

pub fn km_to_ft(km: f64) -> f64 {
    km * FEET_PER_KM
}

pub fn ft_to_m(ft: f64) -> f64 {
    ft / FEET_PER_METER
}

pub fn m_to_ft(m: f64) -> f64 {
    m * FEET_PER_METER
}

pub fn ft_to_yd(ft: f64) -> f64 {
    ft / FEET_PER_YARD
}

pub fn yd_to_ft(yd: f64) -> f64 {
    yd * FEET_PER_YARD
}

pub fn nm_to_km(nm: f64) -> f64 {
    nm * KM_PER_NM
}

pub fn km_to_nm(km: f64) -> f64 {
    km / KM_PER_NM
}

/// Altitude entry fields are in thousands of feet.
pub fn kft_to_ft(kft: f64) -> f64 {
    kft * 1000.0
}

pub fn knots_to_fps(kt: f64) -> f64 {
    kt * FPS_PER_KNOT
}

/// ISA density ratio (sigma) at a pressure altitude in feet.
///
/// Uses the tropospheric lapse-rate model below the tropopause and the
/// isothermal exponential decay above it. Negative altitudes are evaluated
/// as sea level.
pub fn density_ratio(altitude_ft: f64) -> f64 {
    let h = altitude_ft.max(0.0);
    if h <= TROPOPAUSE_FT {
        (1.0 - 6.875_59e-6 * h).powf(4.255_876)
    } else {
        let sigma_tropopause = (1.0 - 6.875_59e-6 * TROPOPAUSE_FT).powf(4.255_876);
        sigma_tropopause * (-(h - TROPOPAUSE_FT) / 20_805.8).exp()
    }
}

/// Convert knots equivalent airspeed to knots true airspeed.
pub fn keas_to_ktas(keas: f64, altitude_ft: f64) -> f64 {
    keas / density_ratio(altitude_ft).sqrt()
}

/// Convert knots true airspeed back to knots equivalent airspeed.
pub fn ktas_to_keas(ktas: f64, altitude_ft: f64) -> f64 {
    ktas * density_ratio(altitude_ft).sqrt()
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
