//! Off-thread turn integration.
//!
//! The turn kinematics integrator is the one calculation slow enough to keep
//! off an interactive thread. Callers post a [`TurnRequest`] through a
//! [`TurnClient`] and read back the reply for their latest request; anything
//! older is discarded.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod worker;

pub use client::{TurnClient, TurnOutcome};
pub use config::WorkerConfig;
pub use error::WorkerError;
pub use protocol::{ResponseBody, TurnRequest, TurnResponse};
