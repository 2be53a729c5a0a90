//! Coordinated-turn ground track under wind.
//!
//! Integrates heading and position with a fixed time step while bank ramps
//! toward its target at the roll rate. The result is a finite point list
//! regenerated from scratch on every call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Point2D;
use crate::units::{knots_to_fps, normalize_deg, GRAVITY_FPS2};

/// Upper bound on integration steps for a single path.
pub const MAX_TURN_STEPS: usize = 100_000;
/// Bank angles at or beyond this are not a coordinated turn.
const MAX_BANK_DEG: f64 = 89.0;
/// Standard-rate turn (deg/s).
const STANDARD_RATE_DEG_PER_SEC: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("True airspeed must be positive")]
    NonPositiveAirspeed,
    #[error("Time step must be positive")]
    NonPositiveTimeStep,
    #[error("Duration cannot be negative")]
    NegativeDuration,
    #[error("Roll rate must be positive")]
    NonPositiveRollRate,
    #[error("Bank angle must be less than 89 degrees")]
    ExcessiveBank,
    #[error("Simulation would take {steps} steps, limit is {limit}")]
    TooManySteps { steps: usize, limit: usize },
}

/// Turn simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnParams {
    pub true_airspeed_kt: f64,
    /// Signed: positive is a right turn
    pub bank_angle_deg: f64,
    /// How fast bank can change (deg/s)
    pub roll_rate_deg_per_sec: f64,
    pub initial_heading_deg: f64,
    /// Direction the wind blows from
    #[serde(default)]
    pub wind_direction_deg: f64,
    #[serde(default)]
    pub wind_speed_kt: f64,
    pub duration_secs: f64,
    pub time_step_secs: f64,
}

/// Ground track produced by [`simulate_turn`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPath {
    /// Positions in feet from the starting point, first entry is the origin
    pub points: Vec<Point2D>,
    pub final_heading_deg: f64,
}

impl TurnParams {
    fn validate(&self) -> Result<usize, TurnError> {
        let fields = [
            ("True airspeed", self.true_airspeed_kt),
            ("Bank angle", self.bank_angle_deg),
            ("Roll rate", self.roll_rate_deg_per_sec),
            ("Initial heading", self.initial_heading_deg),
            ("Wind direction", self.wind_direction_deg),
            ("Wind speed", self.wind_speed_kt),
            ("Duration", self.duration_secs),
            ("Time step", self.time_step_secs),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(TurnError::NotFinite(*name));
        }
        if self.true_airspeed_kt <= 0.0 {
            return Err(TurnError::NonPositiveAirspeed);
        }
        if self.time_step_secs <= 0.0 {
            return Err(TurnError::NonPositiveTimeStep);
        }
        if self.duration_secs < 0.0 {
            return Err(TurnError::NegativeDuration);
        }
        if self.roll_rate_deg_per_sec <= 0.0 {
            return Err(TurnError::NonPositiveRollRate);
        }
        if self.bank_angle_deg.abs() >= MAX_BANK_DEG {
            return Err(TurnError::ExcessiveBank);
        }

        let steps = (self.duration_secs / self.time_step_secs).ceil();
        if steps > MAX_TURN_STEPS as f64 {
            return Err(TurnError::TooManySteps {
                steps: steps as usize,
                limit: MAX_TURN_STEPS,
            });
        }
        Ok(steps as usize)
    }
}

/// Rate of turn (deg/s) for a coordinated turn at `bank_deg`.
///
/// Negative bank gives a negative (left) rate.
pub fn turn_rate_deg_per_sec(true_airspeed_kt: f64, bank_deg: f64) -> f64 {
    let speed_fps = knots_to_fps(true_airspeed_kt);
    if speed_fps <= 0.0 {
        return 0.0;
    }
    (GRAVITY_FPS2 * bank_deg.to_radians().tan() / speed_fps).to_degrees()
}

/// Still-air turn radius (ft) at `bank_deg`. Wings level gives infinity.
pub fn turn_radius_ft(true_airspeed_kt: f64, bank_deg: f64) -> f64 {
    let speed_fps = knots_to_fps(true_airspeed_kt);
    speed_fps * speed_fps / (GRAVITY_FPS2 * bank_deg.to_radians().tan().abs())
}

/// Bank angle (deg) that produces a standard-rate turn at this airspeed.
pub fn standard_rate_bank_deg(true_airspeed_kt: f64) -> f64 {
    let speed_fps = knots_to_fps(true_airspeed_kt);
    (STANDARD_RATE_DEG_PER_SEC.to_radians() * speed_fps / GRAVITY_FPS2)
        .atan()
        .to_degrees()
}

/// Integrate a wind-corrected turn.
///
/// Heading is measured clockwise from north; the wind vector points away
/// from `wind_direction_deg`. The last step is shortened so the path ends
/// exactly at `duration_secs`.
pub fn simulate_turn(params: &TurnParams) -> Result<TurnPath, TurnError> {
    let steps = params.validate()?;

    let airspeed_fps = knots_to_fps(params.true_airspeed_kt);
    let wind_fps = knots_to_fps(params.wind_speed_kt);
    let (wind_sin, wind_cos) = params.wind_direction_deg.to_radians().sin_cos();
    let wind_x = -wind_fps * wind_sin;
    let wind_y = -wind_fps * wind_cos;

    let target_bank = params.bank_angle_deg;
    let mut heading = params.initial_heading_deg;
    let mut position = Point2D::ORIGIN;
    let mut elapsed = 0.0;

    let mut points = Vec::with_capacity(steps + 1);
    points.push(position);

    for _ in 0..steps {
        let dt = params.time_step_secs.min(params.duration_secs - elapsed);
        if dt <= 0.0 {
            break;
        }

        let bank_magnitude = (params.roll_rate_deg_per_sec * elapsed).min(target_bank.abs());
        let bank = bank_magnitude.copysign(target_bank);
        heading += turn_rate_deg_per_sec(params.true_airspeed_kt, bank) * dt;

        let (heading_sin, heading_cos) = heading.to_radians().sin_cos();
        let ground_vx = airspeed_fps * heading_sin + wind_x;
        let ground_vy = airspeed_fps * heading_cos + wind_y;

        position.x += ground_vx * dt;
        position.y += ground_vy * dt;
        points.push(position);
        elapsed += dt;
    }

    Ok(TurnPath {
        points,
        final_heading_deg: normalize_deg(heading),
    })
}
