//! End-to-end tests against a spawned turn worker.

use std::time::Duration;

use aircalc_core::turn::{simulate_turn, TurnParams};
use aircalc_worker::{TurnClient, TurnOutcome, WorkerConfig, WorkerError};

fn params(bank_angle_deg: f64) -> TurnParams {
    TurnParams {
        true_airspeed_kt: 140.0,
        bank_angle_deg,
        roll_rate_deg_per_sec: 8.0,
        initial_heading_deg: 45.0,
        wind_direction_deg: 200.0,
        wind_speed_kt: 15.0,
        duration_secs: 90.0,
        time_step_secs: 0.25,
    }
}

fn config() -> WorkerConfig {
    WorkerConfig::default().with_timeout(Duration::from_secs(10))
}

#[tokio::test]
async fn worker_matches_direct_integration() {
    let (mut client, handle) = TurnClient::spawn(&config());

    let outcome = client.compute(params(25.0)).await.unwrap();
    let expected = simulate_turn(&params(25.0)).unwrap();
    assert_eq!(outcome, TurnOutcome::Success(expected));
    assert!(!client.in_progress());

    client.shutdown();
    handle.await.unwrap();
}

#[tokio::test]
async fn rejected_parameters_are_a_domain_failure() {
    let (mut client, handle) = TurnClient::spawn(&config());

    let outcome = client
        .compute(TurnParams {
            true_airspeed_kt: -5.0,
            ..params(25.0)
        })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Failure("True airspeed must be positive".to_string())
    );

    client.shutdown();
    handle.await.unwrap();
}

#[tokio::test]
async fn only_latest_request_is_delivered() {
    let (mut client, handle) = TurnClient::spawn(&config());

    for bank in [10.0, 20.0, 30.0] {
        client.submit(params(bank)).await.unwrap();
    }
    let outcome = client.recv_latest().await.unwrap();
    let expected = simulate_turn(&params(30.0)).unwrap();
    assert_eq!(outcome, TurnOutcome::Success(expected));

    client.shutdown();
    handle.await.unwrap();
}

#[tokio::test]
async fn submit_after_shutdown_is_disconnected() {
    let (mut client, handle) = TurnClient::spawn(&config());
    client.shutdown();
    handle.await.unwrap();

    assert_eq!(
        client.submit(params(10.0)).await.unwrap_err(),
        WorkerError::Disconnected
    );
}
