//! Reference ingestion service used as a local load target.
//!
//! Serves `POST /metrics`, `GET /analytics` and `GET /health` with the same
//! response shapes the production service uses, minus persistence. With the
//! `metrics` feature, request counts and latencies are exported at
//! `GET /metrics/prometheus`.

pub mod analytics;
pub mod error;
pub mod handlers;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use analytics::{Analytics, AnalyticsSnapshot};

#[derive(Clone)]
pub struct SinkState {
    pub analytics: Arc<Analytics>,
}

impl SinkState {
    pub fn new(window_size: usize) -> Self {
        Self {
            analytics: Arc::new(Analytics::new(window_size)),
        }
    }
}

pub fn router(state: SinkState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/metrics", post(handlers::ingest_metric))
        .route("/analytics", get(handlers::get_analytics))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(middleware::from_fn(handlers::log_slow_requests))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Path the Prometheus exposition is served on
pub const PROMETHEUS_PATH: &str = "/metrics/prometheus";

/// Record request counts and durations by method, path and status, and serve
/// them at [`PROMETHEUS_PATH`]. Installs the global metrics recorder, so call
/// it at most once per process.
#[cfg(feature = "metrics")]
pub fn with_metrics(app: Router) -> Router {
    use axum_prometheus::PrometheusMetricLayer;
    let (layer, handle) = PrometheusMetricLayer::pair();

    let metrics_router = Router::new().route(
        PROMETHEUS_PATH,
        get(move || async move { handle.render() }),
    );

    app.layer(layer).merge(metrics_router)
}
