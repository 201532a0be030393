use axum::{
    extract::{rejection::JsonRejection, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::{error::SinkError, SinkState};
use crate::sink::analytics::AnalyticsSnapshot;

const SLOW_REQUEST: Duration = Duration::from_millis(100);

/// Body accepted by `POST /metrics`. Missing fields fall back to zero / now.
#[derive(Debug, Deserialize)]
pub struct IncomingMetric {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub rps: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessedResponse {
    pub status: String,
    pub rps: f64,
    pub cpu: f64,
    pub avg_rps: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// POST /metrics
pub async fn ingest_metric(
    State(state): State<SinkState>,
    payload: Result<Json<IncomingMetric>, JsonRejection>,
) -> Result<Json<ProcessedResponse>, SinkError> {
    let Json(metric) = payload.map_err(|e| SinkError::InvalidPayload(e.body_text()))?;
    let timestamp = metric.timestamp.unwrap_or_else(Utc::now);

    tracing::debug!(rps = metric.rps, cpu = metric.cpu, "received metric");
    let avg_rps = state.analytics.add(metric.rps);

    Ok(Json(ProcessedResponse {
        status: "processed".to_string(),
        rps: metric.rps,
        cpu: metric.cpu,
        avg_rps,
        timestamp,
    }))
}

/// GET /analytics
pub async fn get_analytics(State(state): State<SinkState>) -> Json<AnalyticsSnapshot> {
    Json(state.analytics.snapshot())
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Logs requests slower than 100 ms.
pub async fn log_slow_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    if elapsed > SLOW_REQUEST {
        tracing::warn!(
            %method,
            path,
            status = response.status().as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "slow request"
        );
    }
    response
}
