use anyhow::Result;
use metrics_loadgen::{config::Config, sink, telemetry};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let addr = cfg.sink.socket_addr()?;

    if cfg.sink.host == "0.0.0.0" {
        warn!("sink binding to 0.0.0.0 - reachable from the network");
    }

    let state = sink::SinkState::new(cfg.sink.window_size);
    let mut app = sink::router(state, Duration::from_secs(cfg.sink.request_timeout_secs.max(1)));

    #[cfg(feature = "metrics")]
    {
        app = sink::with_metrics(app);
        info!(path = sink::PROMETHEUS_PATH, "prometheus metrics enabled");
    }

    info!(%addr, window_size = cfg.sink.window_size, "starting metrics sink");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
