//! # Load Simulation
//!
//! Runs the metrics load profile on the goose load-testing engine.
//!
//! ## Components
//!
//! - **Scenario**: the `MetricsUser` goose scenario with its start/stop hooks
//!   and the three weighted transactions
//! - **Session**: per-user RNG and submission counter kept as goose session data
//!
//! ## Usage
//!
//! ```no_run
//! use goose::prelude::*;
//! use metrics_loadgen::simulation::{self, RunOptions, UserProfile};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let attack = GooseAttack::initialize()?;
//! let metrics = simulation::run(attack, &RunOptions::default(), &UserProfile::default()).await?;
//! simulation::log_summary(&metrics);
//! # Ok(())
//! # }
//! ```

pub mod scenario;
pub mod session;

pub use scenario::{log_summary, metrics_user, run, RunOptions, UserProfile, SCENARIO_NAME};
pub use session::{SessionSettings, UserSession};
