use anyhow::{Context, Result};
use goose::prelude::GooseAttack;
use metrics_loadgen::{config, simulation, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    let profile = cfg.user_profile()?;
    let options = cfg.run_options();

    if options.run_time.is_none() {
        warn!("no run time configured, running until Ctrl+C");
    }

    info!(
        base_url = %options.host,
        users = options.users,
        spawn_rate = options.hatch_rate,
        run_time_secs = options.run_time.map(|d| d.as_secs()),
        "starting metrics load generator"
    );

    // goose reads its own command-line flags, which override the loaded config
    let attack = GooseAttack::initialize().context("parsing load test options")?;
    let metrics = simulation::run(attack, &options, &profile)
        .await
        .context("running load test")?;
    simulation::log_summary(&metrics);

    info!(duration_secs = metrics.duration, "load test finished");
    Ok(())
}
