//! Turn integration loop.
//!
//! Pulls requests off a bounded channel, runs the integrator on the blocking
//! pool, and posts one response per request. Requests are handled strictly in
//! arrival order; there is no cancellation of work already started.

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};

use aircalc_core::turn::simulate_turn;

use crate::protocol::{ResponseBody, TurnRequest, TurnResponse};

/// Run the worker until shutdown or until either channel closes.
pub async fn run_turn_worker(
    mut requests: mpsc::Receiver<TurnRequest>,
    responses: mpsc::Sender<TurnResponse>,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::info!("Turn worker started");

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Turn worker shutting down");
                break;
            }
            maybe_request = requests.recv() => {
                let Some(request) = maybe_request else {
                    tracing::info!("Turn request channel closed");
                    break;
                };

                let response = handle_request(request).await;
                if responses.send(response).await.is_err() {
                    tracing::info!("Turn response channel closed");
                    break;
                }
            }
        }
    }
}

async fn handle_request(request: TurnRequest) -> TurnResponse {
    let request_id = request.request_id;
    let params = request.params;
    tracing::debug!(request_id, "Integrating turn");

    let body = match tokio::task::spawn_blocking(move || simulate_turn(&params)).await {
        Ok(Ok(path)) => ResponseBody::Success { path },
        Ok(Err(err)) => ResponseBody::Failure {
            error: err.to_string(),
        },
        Err(join_err) => {
            tracing::warn!(request_id, "Turn integration task failed: {}", join_err);
            ResponseBody::Crashed {
                reason: join_err.to_string(),
            }
        }
    };

    TurnResponse {
        request_id,
        completed_at: Utc::now(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircalc_core::turn::TurnParams;

    fn params(time_step_secs: f64) -> TurnParams {
        TurnParams {
            true_airspeed_kt: 150.0,
            bank_angle_deg: 20.0,
            roll_rate_deg_per_sec: 5.0,
            initial_heading_deg: 90.0,
            wind_direction_deg: 0.0,
            wind_speed_kt: 0.0,
            duration_secs: 30.0,
            time_step_secs,
        }
    }

    #[tokio::test]
    async fn replies_in_order_until_requests_close() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let worker = tokio::spawn(run_turn_worker(req_rx, resp_tx, shutdown_rx));

        req_tx
            .send(TurnRequest { request_id: 1, params: params(1.0) })
            .await
            .unwrap();
        req_tx
            .send(TurnRequest { request_id: 2, params: params(0.0) })
            .await
            .unwrap();
        drop(req_tx);

        let first = resp_rx.recv().await.unwrap();
        assert_eq!(first.request_id, 1);
        assert!(matches!(first.body, ResponseBody::Success { ref path } if path.points.len() == 31));

        let second = resp_rx.recv().await.unwrap();
        assert_eq!(second.request_id, 2);
        assert_eq!(
            second.body,
            ResponseBody::Failure {
                error: "Time step must be positive".to_string()
            }
        );

        worker.await.unwrap();
        assert!(resp_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let (_req_tx, req_rx) = mpsc::channel::<TurnRequest>(1);
        let (resp_tx, _resp_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let worker = tokio::spawn(run_turn_worker(req_rx, resp_tx, shutdown_rx));

        shutdown_tx.send(()).unwrap();
        worker.await.unwrap();
    }
}
