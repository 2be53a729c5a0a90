//! Calculator subcommands.
//!
//! Each command converts user-facing units into the engine's feet/seconds
//! inputs, calls the engine, and returns the result record as JSON.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use aircalc_core::deconfliction::{self, DeconflictionInput};
use aircalc_core::footprint::footprint_for_target;
use aircalc_core::geometry;
use aircalc_core::horizon::{horizon_dip_deg, horizon_distance};
use aircalc_core::sensor::SensorCatalog;
use aircalc_core::turn::{standard_rate_bank_deg, turn_radius_ft, turn_rate_deg_per_sec, TurnParams};
use aircalc_core::units::{ft_to_nm, keas_to_ktas, kft_to_ft, nm_to_ft};
use aircalc_worker::{TurnClient, TurnOutcome, WorkerConfig};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Slant range and depression for a ground range
    Forward {
        #[command(flatten)]
        position: Position,
        #[arg(long)]
        ground_range_nm: f64,
    },
    /// Ground range and depression from a slant range
    Slant {
        #[command(flatten)]
        position: Position,
        #[arg(long)]
        slant_range_nm: f64,
    },
    /// Ground and slant range from a depression angle
    Depression {
        #[command(flatten)]
        position: Position,
        #[arg(long)]
        depression_deg: f64,
    },
    /// Visual horizon distance and dip
    Horizon {
        #[arg(long)]
        altitude_kft: f64,
    },
    /// Sensor ground footprint around a target
    Footprint {
        #[command(flatten)]
        position: Position,
        #[arg(long)]
        ground_range_nm: f64,
        #[arg(long, default_value_t = 0.0)]
        azimuth_deg: f64,
        /// Sensor name from the catalog
        #[arg(long, default_value = "wide")]
        sensor: String,
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
    },
    /// Time separation with traffic converging on the same point
    Deconflict {
        #[arg(long)]
        own_distance_nm: f64,
        #[arg(long)]
        own_gs_kt: f64,
        #[arg(long)]
        traffic_distance_nm: f64,
        #[arg(long)]
        traffic_gs_kt: f64,
        /// Margin of error on traffic ground speed (percent, capped at 25)
        #[arg(long, default_value_t = 0.0)]
        moe: f64,
    },
    /// Wind-corrected turn path
    Turn(TurnArgs),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct Position {
    /// Aircraft altitude MSL in thousands of feet
    #[arg(long)]
    pub altitude_kft: f64,
    #[arg(long, default_value_t = 0.0)]
    pub target_elev_ft: f64,
}

#[derive(Debug, Clone, Args)]
pub struct TurnArgs {
    #[arg(long)]
    pub airspeed_kt: f64,
    /// Treat airspeed as KEAS and convert to KTAS at --altitude-kft
    #[arg(long)]
    pub equivalent: bool,
    #[arg(long, default_value_t = 0.0)]
    pub altitude_kft: f64,
    /// Signed bank angle, positive for a right turn
    #[arg(long, allow_hyphen_values = true)]
    pub bank_deg: f64,
    #[arg(long, default_value_t = 10.0)]
    pub roll_rate_deg_s: f64,
    #[arg(long, default_value_t = 0.0)]
    pub heading_deg: f64,
    #[arg(long, default_value_t = 0.0)]
    pub wind_from_deg: f64,
    #[arg(long, default_value_t = 0.0)]
    pub wind_kt: f64,
    #[arg(long, default_value_t = 60.0)]
    pub duration_s: f64,
    #[arg(long, default_value_t = 0.5)]
    pub step_s: f64,
}

impl TurnArgs {
    fn params(&self) -> TurnParams {
        let true_airspeed_kt = if self.equivalent {
            keas_to_ktas(self.airspeed_kt, kft_to_ft(self.altitude_kft))
        } else {
            self.airspeed_kt
        };
        TurnParams {
            true_airspeed_kt,
            bank_angle_deg: self.bank_deg,
            roll_rate_deg_per_sec: self.roll_rate_deg_s,
            initial_heading_deg: self.heading_deg,
            wind_direction_deg: self.wind_from_deg,
            wind_speed_kt: self.wind_kt,
            duration_secs: self.duration_s,
            time_step_secs: self.step_s,
        }
    }
}

/// Run a calculator command and return its JSON report.
pub async fn run(command: Command, catalog: &SensorCatalog, worker: &WorkerConfig) -> Result<Value> {
    match command {
        Command::Forward {
            position,
            ground_range_nm,
        } => {
            let result = geometry::forward(
                kft_to_ft(position.altitude_kft),
                position.target_elev_ft,
                nm_to_ft(ground_range_nm),
            );
            Ok(serde_json::to_value(result)?)
        }
        Command::Slant {
            position,
            slant_range_nm,
        } => {
            let result = geometry::from_slant_range(
                kft_to_ft(position.altitude_kft),
                position.target_elev_ft,
                nm_to_ft(slant_range_nm),
            );
            Ok(serde_json::to_value(result)?)
        }
        Command::Depression {
            position,
            depression_deg,
        } => {
            let result = geometry::from_depression(
                kft_to_ft(position.altitude_kft),
                position.target_elev_ft,
                depression_deg,
            );
            Ok(serde_json::to_value(result)?)
        }
        Command::Horizon { altitude_kft } => {
            let altitude_ft = kft_to_ft(altitude_kft);
            let distance_ft = horizon_distance(altitude_ft);
            Ok(json!({
                "horizon_distance_ft": distance_ft,
                "horizon_distance_nm": ft_to_nm(distance_ft),
                "dip_deg": horizon_dip_deg(altitude_ft),
            }))
        }
        Command::Footprint {
            position,
            ground_range_nm,
            azimuth_deg,
            sensor,
            zoom,
        } => {
            let fov = catalog
                .get(&sensor)?
                .field_of_view(zoom)
                .with_context(|| format!("cannot use sensor '{sensor}'"))?;
            let view = footprint_for_target(
                kft_to_ft(position.altitude_kft),
                position.target_elev_ft,
                nm_to_ft(ground_range_nm),
                azimuth_deg,
                fov,
            );
            if view.center_beyond_horizon {
                tracing::info!("Target is beyond the visual horizon");
            }
            Ok(json!({ "field_of_view": fov, "view": view }))
        }
        Command::Deconflict {
            own_distance_nm,
            own_gs_kt,
            traffic_distance_nm,
            traffic_gs_kt,
            moe,
        } => {
            let input = DeconflictionInput {
                own_distance_nm,
                own_ground_speed_kt: own_gs_kt,
                traffic_distance_nm,
                traffic_ground_speed_kt: traffic_gs_kt,
                margin_of_error_percent: moe,
            };
            let result = deconfliction::estimate(&input);
            if result.is_none() {
                tracing::info!("Distances and ground speeds must all be positive");
            }
            Ok(serde_json::to_value(result)?)
        }
        Command::Turn(args) => run_turn(&args, worker).await,
    }
}

async fn run_turn(args: &TurnArgs, worker: &WorkerConfig) -> Result<Value> {
    let params = args.params();
    let (mut client, handle) = TurnClient::spawn(worker);
    let outcome = client.compute(params).await;
    client.shutdown();
    handle.await.context("turn worker task failed")?;

    match outcome? {
        TurnOutcome::Success(path) => Ok(json!({
            "true_airspeed_kt": params.true_airspeed_kt,
            "turn_rate_deg_s": turn_rate_deg_per_sec(params.true_airspeed_kt, params.bank_angle_deg),
            "still_air_radius_ft": finite_or_null(turn_radius_ft(params.true_airspeed_kt, params.bank_angle_deg)),
            "standard_rate_bank_deg": standard_rate_bank_deg(params.true_airspeed_kt),
            "path": path,
        })),
        TurnOutcome::Failure(error) => bail!("invalid turn parameters: {error}"),
    }
}

fn finite_or_null(value: f64) -> Value {
    if value.is_finite() {
        json!(value)
    } else {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(altitude_kft: f64) -> Position {
        Position {
            altitude_kft,
            target_elev_ft: 0.0,
        }
    }

    #[tokio::test]
    async fn forward_reports_geometry() {
        let report = run(
            Command::Forward {
                position: position(10.0),
                ground_range_nm: 0.0,
            },
            &SensorCatalog::default(),
            &WorkerConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(report["valid"], true);
        assert_eq!(report["depression_deg"], 90.0);
        assert_eq!(report["slant_range_ft"], 10_000.0);
    }

    #[tokio::test]
    async fn deconflict_without_inputs_is_null() {
        let report = run(
            Command::Deconflict {
                own_distance_nm: 0.0,
                own_gs_kt: 300.0,
                traffic_distance_nm: 10.0,
                traffic_gs_kt: 300.0,
                moe: 0.0,
            },
            &SensorCatalog::default(),
            &WorkerConfig::default(),
        )
        .await
        .unwrap();
        assert!(report.is_null());
    }

    #[tokio::test]
    async fn footprint_rejects_unknown_sensor() {
        let err = run(
            Command::Footprint {
                position: position(10.0),
                ground_range_nm: 3.0,
                azimuth_deg: 0.0,
                sensor: "thermal".to_string(),
                zoom: 1.0,
            },
            &SensorCatalog::default(),
            &WorkerConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("unknown sensor"));
    }

    #[tokio::test]
    async fn turn_runs_through_worker() {
        let args = TurnArgs {
            airspeed_kt: 120.0,
            equivalent: false,
            altitude_kft: 0.0,
            bank_deg: -20.0,
            roll_rate_deg_s: 10.0,
            heading_deg: 180.0,
            wind_from_deg: 0.0,
            wind_kt: 0.0,
            duration_s: 10.0,
            step_s: 1.0,
        };
        let report = run(
            Command::Turn(args),
            &SensorCatalog::default(),
            &WorkerConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(report["path"]["points"].as_array().unwrap().len(), 11);
        assert!(report["turn_rate_deg_s"].as_f64().unwrap() < 0.0);
    }

    #[tokio::test]
    async fn turn_with_bad_step_is_an_error() {
        let args = TurnArgs {
            airspeed_kt: 120.0,
            equivalent: true,
            altitude_kft: 10.0,
            bank_deg: 20.0,
            roll_rate_deg_s: 10.0,
            heading_deg: 0.0,
            wind_from_deg: 0.0,
            wind_kt: 0.0,
            duration_s: 10.0,
            step_s: 0.0,
        };
        let err = run(
            Command::Turn(args),
            &SensorCatalog::default(),
            &WorkerConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Time step must be positive"));
    }
}
