//! Synthetic load profile for an HTTP metrics-ingestion service.
//!
//! Each simulated user repeatedly runs one of three weighted actions
//! (submit a metric, read analytics, check health) and pauses briefly before
//! the next one. The goose engine drives the users; this crate supplies the
//! payloads, the success rule and a reference sink to aim them at.

pub mod config;
pub mod domain;
pub mod simulation;
pub mod sink;
pub mod telemetry;
