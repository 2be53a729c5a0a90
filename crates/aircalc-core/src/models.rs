//! Shared value types.

use serde::{Deserialize, Serialize};

/// Local east/north offset in feet from the observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// East (ft)
    pub x: f64,
    /// North (ft)
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Place an along-track/cross-track offset in the ENU frame.
    ///
    /// `azimuth_deg` is measured clockwise from north; positive `cross_ft`
    /// is to the right of the track.
    pub fn from_track_offset(along_ft: f64, cross_ft: f64, azimuth_deg: f64) -> Self {
        let (sin_az, cos_az) = azimuth_deg.to_radians().sin_cos();
        Self {
            x: along_ft * sin_az + cross_ft * cos_az,
            y: along_ft * cos_az - cross_ft * sin_az,
        }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
