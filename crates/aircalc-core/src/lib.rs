//! Line-of-sight, sensor footprint, deconfliction and turn kinematics math
//! for aviation planning calculators.
//!
//! Everything here is a pure function over plain value records. Nothing is
//! cached or shared between calls.

pub mod deconfliction;
pub mod footprint;
pub mod geometry;
pub mod horizon;
pub mod models;
pub mod rules;
pub mod sensor;
pub mod turn;
pub mod units;

pub use deconfliction::{
    estimate, estimate_with_policy, DeconflictionInput, DeconflictionResult, FirstToArrive,
    SeparationStatus,
};
pub use footprint::{calculate_footprint, footprint_for_target, FootprintResult, TargetFootprint};
pub use geometry::{
    forward, from_depression, from_slant_range, GeometryError, GeometryResult,
    RangeConversionResult,
};
pub use horizon::{horizon_distance, is_beyond_horizon};
pub use models::Point2D;
pub use rules::DeconflictionPolicy;
pub use sensor::{CatalogError, FieldOfView, SensorCatalog, SensorSpec};
pub use turn::{simulate_turn, TurnError, TurnParams, TurnPath};
