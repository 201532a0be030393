use anyhow::{ensure, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};

use crate::domain::{Action, ProfileError, SampleShape, WaitTime, WeightedActions};
use crate::simulation::{RunOptions, UserProfile};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    pub load: LoadConfig,
    pub profile: ProfileConfig,
    pub sample: SampleShape,
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl TargetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub users: usize,
    /// Users started per second
    pub spawn_rate: f64,
    /// 0 runs until Ctrl+C / SIGTERM
    pub run_time_seconds: u64,
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            users: 10,
            spawn_rate: 10.0,
            run_time_seconds: 60,
            random_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub submit_metric_weight: u32,
    pub read_analytics_weight: u32,
    pub health_check_weight: u32,
    pub min_wait_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            submit_metric_weight: 100,
            read_analytics_weight: 2,
            health_check_weight: 1,
            min_wait_ms: 50,
            max_wait_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub host: String,
    pub port: u16,
    pub window_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            window_size: 50,
            request_timeout_secs: 10,
        }
    }
}

impl SinkConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    /// Defaults, then the TOML file if it exists, then `LOADGEN__*` env vars.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("LOADGEN__").split("__"));
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.load.users > 0, "load.users must be at least 1");
        ensure!(
            self.load.spawn_rate.is_finite() && self.load.spawn_rate > 0.0,
            "load.spawn_rate must be a positive number, got {}",
            self.load.spawn_rate
        );
        ensure!(
            Duration::try_from_secs_f64(1.0 / self.load.spawn_rate).is_ok(),
            "load.spawn_rate {} is too small to space user starts",
            self.load.spawn_rate
        );
        ensure!(
            self.profile.min_wait_ms <= self.profile.max_wait_ms,
            "profile.min_wait_ms ({}) exceeds profile.max_wait_ms ({})",
            self.profile.min_wait_ms,
            self.profile.max_wait_ms
        );
        let sample = &self.sample;
        for (name, noise) in [("cpu_noise", sample.cpu_noise), ("rps_noise", sample.rps_noise)] {
            // the draw spans [-noise, noise], so its width must be finite too
            ensure!(
                noise >= 0.0 && (2.0 * noise).is_finite(),
                "sample.{name} must be a finite, non-negative amplitude, got {noise}"
            );
        }
        ensure!(
            [sample.base_cpu, sample.cpu_floor, sample.base_rps, sample.rps_floor]
                .iter()
                .all(|v| v.is_finite()),
            "sample baselines and floors must be finite"
        );
        self.user_profile()?;
        Ok(())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            host: self.target.base_url.clone(),
            users: self.load.users,
            hatch_rate: self.load.spawn_rate,
            run_time: match self.load.run_time_seconds {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            request_timeout: self.target.timeout(),
            seed: self.load.random_seed,
        }
    }

    pub fn user_profile(&self) -> Result<UserProfile, ProfileError> {
        let actions = WeightedActions::new([
            (Action::SubmitMetric, self.profile.submit_metric_weight),
            (Action::ReadAnalytics, self.profile.read_analytics_weight),
            (Action::HealthCheck, self.profile.health_check_weight),
        ])?;
        let wait = WaitTime::between(
            Duration::from_millis(self.profile.min_wait_ms),
            Duration::from_millis(self.profile.max_wait_ms),
        )?;
        Ok(UserProfile {
            actions,
            wait,
            shape: self.sample,
        })
    }
}
