//! Load Testing Suite
//!
//! Runs many simulated users against the in-process sink:
//! - 200 concurrent users at the default 50-100 ms pacing
//! - No failures expected from a healthy sink
//! - Observed action mix should follow the 100:2:1 weights

use goose::config::GooseConfiguration;
use goose::prelude::*;
use std::time::Duration;

use metrics_loadgen::simulation::{self, RunOptions, UserProfile};
use metrics_loadgen::sink::{self, SinkState};

/// Test: 200 users for 10 seconds against the sink
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Ignore by default as this is a slow test
async fn test_two_hundred_users_against_sink() {
    let state = SinkState::new(50);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = sink::router(state.clone(), Duration::from_secs(5));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let options = RunOptions {
        host: format!("http://{addr}"),
        users: 200,
        hatch_rate: 100.0,
        run_time: Some(Duration::from_secs(10)),
        request_timeout: Duration::from_secs(5),
        seed: Some(2024),
    };
    let attack = GooseAttack::initialize_with_config(GooseConfiguration::default()).unwrap();
    let metrics = simulation::run(attack, &options, &UserProfile::default())
        .await
        .unwrap();

    let total: usize = metrics
        .requests
        .values()
        .map(|r| r.success_count + r.fail_count)
        .sum();
    let failures: usize = metrics.requests.values().map(|r| r.fail_count).sum();
    let submit: usize = metrics
        .requests
        .values()
        .filter(|r| r.path == "/metrics")
        .map(|r| r.success_count + r.fail_count)
        .sum();

    let stored = state.analytics.snapshot().total_metrics;
    println!("requests: {total}, failures: {failures}, stored: {stored}");

    assert_eq!(failures, 0);
    let share = submit as f64 / total as f64;
    assert!(
        (share - 100.0 / 103.0).abs() < 0.01,
        "submit share {share:.4} drifted from 100/103"
    );
}
