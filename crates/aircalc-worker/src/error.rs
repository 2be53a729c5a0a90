//! Transport errors between a caller and the turn worker.
//!
//! These never describe bad turn parameters; those come back as
//! [`crate::TurnOutcome::Failure`].

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("turn worker is not running")]
    Disconnected,
    #[error("no reply to request {request_id} within {timeout:?}")]
    Timeout { request_id: u64, timeout: Duration },
    #[error("turn worker crashed handling request {request_id}: {reason}")]
    Crashed { request_id: u64, reason: String },
    #[error("no request is in progress")]
    NothingPending,
}
