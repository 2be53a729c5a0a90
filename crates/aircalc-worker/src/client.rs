//! Caller side of the turn worker.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use aircalc_core::turn::{TurnParams, TurnPath};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::protocol::{ResponseBody, TurnRequest, TurnResponse};
use crate::worker::run_turn_worker;

/// Domain result of a turn request.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Success(TurnPath),
    /// The integrator rejected the parameters
    Failure(String),
}

/// Handle for posting turn requests and reading the latest reply.
///
/// Only the most recent request matters. Replies to older requests are
/// dropped when they arrive, and a reply that does not come back within the
/// configured timeout clears the in-progress state.
pub struct TurnClient {
    requests: mpsc::Sender<TurnRequest>,
    responses: mpsc::Receiver<TurnResponse>,
    shutdown: broadcast::Sender<()>,
    timeout: Duration,
    next_request_id: u64,
    pending_request_id: Option<u64>,
}

impl TurnClient {
    /// Spawn a worker task on the current tokio runtime and connect to it.
    pub fn spawn(config: &WorkerConfig) -> (Self, JoinHandle<()>) {
        let capacity = config.queue_capacity.max(1);
        let (req_tx, req_rx) = mpsc::channel(capacity);
        let (resp_tx, resp_rx) = mpsc::channel(capacity);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(run_turn_worker(req_rx, resp_tx, shutdown_rx));
        let client = Self::from_channels(req_tx, resp_rx, shutdown_tx, config.request_timeout);
        (client, handle)
    }

    fn from_channels(
        requests: mpsc::Sender<TurnRequest>,
        responses: mpsc::Receiver<TurnResponse>,
        shutdown: broadcast::Sender<()>,
        timeout: Duration,
    ) -> Self {
        Self {
            requests,
            responses,
            shutdown,
            timeout,
            next_request_id: 1,
            pending_request_id: None,
        }
    }

    /// Post a request and return its id. Supersedes any request in flight.
    pub async fn submit(&mut self, params: TurnParams) -> Result<u64, WorkerError> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        // Anything already delivered answers an older request
        while let Ok(stale) = self.responses.try_recv() {
            tracing::debug!(stale = stale.request_id, "Dropping superseded turn response");
        }

        self.requests
            .send(TurnRequest { request_id, params })
            .await
            .map_err(|_| WorkerError::Disconnected)?;

        self.pending_request_id = Some(request_id);
        Ok(request_id)
    }

    /// True while the latest request has neither replied nor timed out.
    pub fn in_progress(&self) -> bool {
        self.pending_request_id.is_some()
    }

    /// Wait for the reply to the latest request, discarding stale replies.
    pub async fn recv_latest(&mut self) -> Result<TurnOutcome, WorkerError> {
        let wanted = self
            .pending_request_id
            .ok_or(WorkerError::NothingPending)?;
        let deadline = Instant::now() + self.timeout;

        loop {
            let response = match tokio::time::timeout_at(deadline, self.responses.recv()).await {
                Ok(Some(response)) => response,
                Ok(None) => {
                    self.pending_request_id = None;
                    return Err(WorkerError::Disconnected);
                }
                Err(_) => {
                    tracing::warn!(
                        request_id = wanted,
                        "Turn request timed out after {:?}",
                        self.timeout
                    );
                    self.pending_request_id = None;
                    return Err(WorkerError::Timeout {
                        request_id: wanted,
                        timeout: self.timeout,
                    });
                }
            };

            if response.request_id < wanted {
                tracing::debug!(
                    stale = response.request_id,
                    wanted,
                    "Discarding stale turn response"
                );
                continue;
            }

            self.pending_request_id = None;
            return match response.body {
                ResponseBody::Success { path } => Ok(TurnOutcome::Success(path)),
                ResponseBody::Failure { error } => Ok(TurnOutcome::Failure(error)),
                ResponseBody::Crashed { reason } => Err(WorkerError::Crashed {
                    request_id: response.request_id,
                    reason,
                }),
            };
        }
    }

    /// Submit and wait in one call.
    pub async fn compute(&mut self, params: TurnParams) -> Result<TurnOutcome, WorkerError> {
        self.submit(params).await?;
        self.recv_latest().await
    }

    /// Ask the worker to stop. Safe to call more than once.
    pub fn shutdown(&self) {
        // No receivers means the worker is already gone
        let _ = self.shutdown.send(());
    }
}
