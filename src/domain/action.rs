use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("action table is empty")]
    EmptyTable,
    #[error("action weights sum to zero")]
    ZeroTotalWeight,
    #[error("action listed twice: {0}")]
    DuplicateAction(Action),
    #[error("wait bounds inverted: min {min:?} > max {max:?}")]
    InvertedWait { min: Duration, max: Duration },
}

/// The actions a simulated user can take against the target service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SubmitMetric,
    ReadAnalytics,
    HealthCheck,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::SubmitMetric, Action::ReadAnalytics, Action::HealthCheck];

    pub fn path(&self) -> &'static str {
        match self {
            Action::SubmitMetric => "/metrics",
            Action::ReadAnalytics => "/analytics",
            Action::HealthCheck => "/health",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::SubmitMetric => "submit_metric",
            Action::ReadAnalytics => "read_analytics",
            Action::HealthCheck => "health_check",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Relative action weights, stored as a cumulative table so one uniform
/// draw in `[0, total)` selects an action.
#[derive(Debug, Clone)]
pub struct WeightedActions {
    /// `(action, exclusive upper bound)`, ascending
    cumulative: Vec<(Action, u64)>,
    total: u64,
}

impl WeightedActions {
    /// Build the table. Zero-weight actions are kept out of the table and never drawn.
    pub fn new<I>(weights: I) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = (Action, u32)>,
    {
        let mut cumulative = Vec::new();
        let mut seen = Vec::new();
        let mut total = 0u64;

        for (action, weight) in weights {
            if seen.contains(&action) {
                return Err(ProfileError::DuplicateAction(action));
            }
            seen.push(action);
            if weight == 0 {
                continue;
            }
            total += u64::from(weight);
            cumulative.push((action, total));
        }

        if seen.is_empty() {
            return Err(ProfileError::EmptyTable);
        }
        if total == 0 {
            return Err(ProfileError::ZeroTotalWeight);
        }
        Ok(Self { cumulative, total })
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    pub fn weight_of(&self, action: Action) -> u32 {
        let mut lower = 0u64;
        for (a, upper) in &self.cumulative {
            if *a == action {
                return (upper - lower) as u32;
            }
            lower = *upper;
        }
        0
    }

    /// Map a draw in `[0, total)` to its action. Out-of-range draws land on the last entry.
    pub fn pick(&self, draw: u64) -> Action {
        let idx = self
            .cumulative
            .partition_point(|(_, upper)| *upper <= draw)
            .min(self.cumulative.len() - 1);
        self.cumulative[idx].0
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        self.pick(rng.gen_range(0..self.total))
    }
}

impl Default for WeightedActions {
    fn default() -> Self {
        Self {
            cumulative: vec![
                (Action::SubmitMetric, 100),
                (Action::ReadAnalytics, 102),
                (Action::HealthCheck, 103),
            ],
            total: 103,
        }
    }
}

/// Bounds of the uniform pause between two actions of the same user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    pub fn between(min: Duration, max: Duration) -> Result<Self, ProfileError> {
        if min > max {
            return Err(ProfileError::InvertedWait { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(50),
            max: Duration::from_millis(100),
        }
    }
}
