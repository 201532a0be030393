//! # Metrics User Scenario
//!
//! The load profile as a goose scenario. Goose owns user spawning, weighted
//! transaction scheduling, pacing and metric aggregation; this module only
//! supplies the transactions and maps the loaded settings onto goose
//! defaults, so command-line flags still override them.

use goose::goose::TransactionFunction;
use goose::metrics::GooseMetrics;
use goose::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::session::{SessionSettings, UserSession};
use crate::domain::{classify_submission, Action, Outcome, SampleShape, WaitTime, WeightedActions};

pub const SCENARIO_NAME: &str = "MetricsUser";

/// Everything a user needs besides its seed
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub actions: WeightedActions,
    pub wait: WaitTime,
    pub shape: SampleShape,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub host: String,
    pub users: usize,
    /// Users started per second
    pub hatch_rate: f64,
    /// `None` runs until Ctrl+C
    pub run_time: Option<Duration>,
    pub request_timeout: Duration,
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            host: "http://localhost:8080".to_string(),
            users: 10,
            hatch_rate: 10.0,
            run_time: Some(Duration::from_secs(60)),
            request_timeout: Duration::from_secs(10),
            seed: None,
        }
    }
}

/// Build the `MetricsUser` scenario. Zero-weight actions are not registered.
pub fn metrics_user(profile: &UserProfile, seed: Option<u64>) -> Result<Scenario, GooseError> {
    let settings = SessionSettings {
        shape: profile.shape,
        seed,
    };

    let mut scenario = scenario!(SCENARIO_NAME)
        .set_wait_time(profile.wait.min(), profile.wait.max())?
        .register_transaction(on_start(settings).set_name("on_start").set_on_start())
        .register_transaction(transaction!(on_stop).set_name("on_stop").set_on_stop());

    for action in Action::ALL {
        let weight = profile.actions.weight_of(action);
        if weight == 0 {
            continue;
        }
        let transaction = match action {
            Action::SubmitMetric => submit_metric(settings),
            Action::ReadAnalytics => transaction!(read_analytics),
            Action::HealthCheck => transaction!(health_check),
        };
        let transaction = transaction
            .set_name(action.name())
            .set_weight(weight as usize)?;
        scenario = scenario.register_transaction(transaction);
    }
    Ok(scenario)
}

/// Register the scenario on `attack`, apply the defaults and run to completion.
pub async fn run(
    attack: GooseAttack,
    options: &RunOptions,
    profile: &UserProfile,
) -> Result<GooseMetrics, GooseError> {
    let hatch_rate = options.hatch_rate.to_string();
    let timeout = options.request_timeout.as_secs().max(1).to_string();
    // goose treats a run time of 0 as "until stopped"
    let run_time = options
        .run_time
        .map_or(0, |limit| limit.as_secs().max(1) as usize);

    attack
        .register_scenario(metrics_user(profile, options.seed)?)
        .set_scheduler(GooseScheduler::Random)
        .set_default(GooseDefault::Host, options.host.as_str())?
        .set_default(GooseDefault::Users, options.users)?
        .set_default(GooseDefault::HatchRate, hatch_rate.as_str())?
        .set_default(GooseDefault::RunTime, run_time)?
        .set_default(GooseDefault::Timeout, timeout.as_str())?
        .set_default(GooseDefault::NoResetMetrics, true)?
        .execute()
        .await
}

pub fn log_summary(metrics: &GooseMetrics) {
    for request in metrics.requests.values() {
        info!(
            method = ?request.method,
            path = %request.path,
            successes = request.success_count,
            failures = request.fail_count,
            "request summary"
        );
    }
}

fn on_start(settings: SessionSettings) -> Transaction {
    let func: TransactionFunction = Arc::new(move |user| Box::pin(start_session(user, settings)));
    Transaction::new(func)
}

fn submit_metric(settings: SessionSettings) -> Transaction {
    let func: TransactionFunction = Arc::new(move |user| Box::pin(send_metric(user, settings)));
    Transaction::new(func)
}

async fn start_session(user: &mut GooseUser, settings: SessionSettings) -> TransactionResult {
    user.set_session_data(settings.start(user.weighted_users_index));
    debug!(user = user.weighted_users_index, "user started");
    Ok(())
}

fn session<'a>(user: &'a mut GooseUser, settings: &SessionSettings) -> &'a mut UserSession {
    if user.get_session_data::<UserSession>().is_none() {
        let session = settings.start(user.weighted_users_index);
        user.set_session_data(session);
    }
    user.get_session_data_unchecked_mut::<UserSession>()
}

async fn send_metric(user: &mut GooseUser, settings: SessionSettings) -> TransactionResult {
    let sample = session(user, &settings).next_sample();
    let response = user.post_json(Action::SubmitMetric.path(), &sample).await;
    session(user, &settings).record_submission();

    let mut goose = response?;
    match classify_submission(goose.request.status_code) {
        Outcome::Success => user.set_success(&mut goose.request),
        Outcome::Failure { reason } => user.set_failure(&reason, &mut goose.request, None, None),
    }
}

async fn read_analytics(user: &mut GooseUser) -> TransactionResult {
    user.get(Action::ReadAnalytics.path()).await?;
    Ok(())
}

async fn health_check(user: &mut GooseUser) -> TransactionResult {
    user.get(Action::HealthCheck.path()).await?;
    Ok(())
}

async fn on_stop(user: &mut GooseUser) -> TransactionResult {
    if let Some(session) = user.get_session_data::<UserSession>() {
        info!(
            user = user.weighted_users_index,
            total_requests = session.total_requests(),
            "user stopped"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_registers_weighted_and_hook_transactions() {
        let scenario = metrics_user(&UserProfile::default(), Some(1)).unwrap();

        assert_eq!(scenario.name, SCENARIO_NAME);
        let names: Vec<&str> = scenario.transactions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["on_start", "on_stop", "submit_metric", "read_analytics", "health_check"]
        );

        let weights: Vec<usize> = scenario.transactions[2..].iter().map(|t| t.weight).collect();
        assert_eq!(weights, [100, 2, 1]);
        assert!(scenario.transactions[0].on_start);
        assert!(scenario.transactions[1].on_stop);
        assert_eq!(
            scenario.transaction_wait,
            Some((Duration::from_millis(50), Duration::from_millis(100)))
        );
    }

    #[test]
    fn test_zero_weight_actions_are_skipped() {
        let profile = UserProfile {
            actions: WeightedActions::new([
                (Action::SubmitMetric, 5),
                (Action::ReadAnalytics, 0),
                (Action::HealthCheck, 1),
            ])
            .unwrap(),
            ..Default::default()
        };
        let scenario = metrics_user(&profile, None).unwrap();
        let names: Vec<&str> = scenario.transactions.iter().map(|t| t.name.as_str()).collect();
        assert!(!names.contains(&"read_analytics"));
        assert!(names.contains(&"submit_metric"));
        assert!(names.contains(&"health_check"));
    }
}
