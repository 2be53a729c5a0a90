//! Sensor and lens specifications.
//!
//! The catalog is plain read-only data handed to the engine by the caller.
//! It is never read from a global and never mutated here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read sensor catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse sensor catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown sensor '{0}'")]
    UnknownSensor(String),
    #[error("sensor '{sensor}' does not support {zoom}x zoom")]
    UnsupportedZoom { sensor: String, zoom: f64 },
    #[error("sensor '{0}' has an invalid field of view")]
    InvalidSpec(String),
}

/// Horizontal and vertical field of view in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub hfov_deg: f64,
    pub vfov_deg: f64,
}

impl FieldOfView {
    /// Narrow both axes by a digital zoom factor.
    ///
    /// Zoom scales the tangent of the half-angle, not the angle itself.
    pub fn zoomed(self, zoom: f64) -> Self {
        Self {
            hfov_deg: zoom_angle(self.hfov_deg, zoom),
            vfov_deg: zoom_angle(self.vfov_deg, zoom),
        }
    }
}

fn zoom_angle(fov_deg: f64, zoom: f64) -> f64 {
    let half = (fov_deg / 2.0).to_radians();
    2.0 * (half.tan() / zoom).atan().to_degrees()
}

/// A sensor/lens combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub name: String,
    pub hfov_deg: f64,
    pub vfov_deg: f64,
    /// Supported digital zoom factors
    #[serde(default = "default_zoom_levels")]
    pub zoom_levels: Vec<f64>,
    /// Accept any zoom factor of at least 1, not just the listed ones
    #[serde(default)]
    pub allow_unlisted_zoom: bool,
}

fn default_zoom_levels() -> Vec<f64> {
    vec![1.0]
}

impl SensorSpec {
    pub fn new(name: impl Into<String>, hfov_deg: f64, vfov_deg: f64) -> Self {
        Self {
            name: name.into(),
            hfov_deg,
            vfov_deg,
            zoom_levels: default_zoom_levels(),
            allow_unlisted_zoom: false,
        }
    }

    pub fn with_zoom_levels(mut self, zoom_levels: Vec<f64>) -> Self {
        self.zoom_levels = zoom_levels;
        self
    }

    pub fn with_unlisted_zoom(mut self) -> Self {
        self.allow_unlisted_zoom = true;
        self
    }

    /// Effective field of view at a supported zoom level.
    pub fn field_of_view(&self, zoom: f64) -> Result<FieldOfView, CatalogError> {
        let listed = self
            .zoom_levels
            .iter()
            .any(|level| (level - zoom).abs() < 1e-9);
        let supported = listed || (self.allow_unlisted_zoom && zoom.is_finite() && zoom >= 1.0);
        if !supported {
            return Err(CatalogError::UnsupportedZoom {
                sensor: self.name.clone(),
                zoom,
            });
        }

        let base = FieldOfView {
            hfov_deg: self.hfov_deg,
            vfov_deg: self.vfov_deg,
        };
        Ok(base.zoomed(zoom))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let fov_ok = |fov: f64| fov > 0.0 && fov < 180.0;
        let zoom_ok = !self.zoom_levels.is_empty() && self.zoom_levels.iter().all(|z| *z >= 1.0);
        if fov_ok(self.hfov_deg) && fov_ok(self.vfov_deg) && zoom_ok {
            Ok(())
        } else {
            Err(CatalogError::InvalidSpec(self.name.clone()))
        }
    }
}

/// Read-only list of available sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorCatalog {
    pub sensors: Vec<SensorSpec>,
}

impl Default for SensorCatalog {
    fn default() -> Self {
        Self {
            sensors: vec![
                SensorSpec::new("wide", 30.0, 22.5).with_zoom_levels(vec![1.0, 2.0, 4.0]),
                SensorSpec::new("medium", 10.0, 7.5).with_zoom_levels(vec![1.0, 2.0]),
                SensorSpec::new("narrow", 2.5, 1.9).with_zoom_levels(vec![1.0, 2.0, 4.0, 8.0]),
            ],
        }
    }
}

impl SensorCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: SensorCatalog = serde_json::from_str(json)?;
        for sensor in &catalog.sensors {
            sensor.validate()?;
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn get(&self, name: &str) -> Result<&SensorSpec, CatalogError> {
        self.sensors
            .iter()
            .find(|sensor| sensor.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownSensor(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sensors.iter().map(|sensor| sensor.name.as_str())
    }
}
