use crate::domain::dataset::DEFAULT_DATASET_SUFFIX;
use crate::domain::sensor::DEFAULT_SENSOR_POLL_MS;
use crate::domain::series::DEFAULT_WINDOW_SIZE;
use crate::domain::system::DEFAULT_HISTORY_LEN;
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "SCALE_DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub feed: FeedSettings,
    pub monitor: MonitorSettings,
    pub recording: RecordingSettings,
    pub sensor: SensorSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl BackendSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    pub window_size: usize,
    pub dataset_suffix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorSettings {
    pub poll_interval_ms: u64,
    pub history_len: usize,
}

impl MonitorSettings {
    /// Never zero; tokio intervals reject a zero period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecordingSettings {
    pub tick_interval_ms: u64,
    pub rollover_delay_ms: u64,
}

impl RecordingSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn rollover_delay(&self) -> Duration {
        Duration::from_millis(self.rollover_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorSettings {
    pub poll_interval_ms: u64,
}

impl SensorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Load `config/dashboard.{toml,yaml,json}` if present, then
/// `SCALE_DASHBOARD__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("server.bind", "0.0.0.0:8081")?
        .set_default("backend.base_url", "http://localhost:8080")?
        .set_default("feed.window_size", DEFAULT_WINDOW_SIZE as i64)?
        .set_default("feed.dataset_suffix", DEFAULT_DATASET_SUFFIX)?
        .set_default("monitor.poll_interval_ms", 1000_i64)?
        .set_default("monitor.history_len", DEFAULT_HISTORY_LEN as i64)?
        .set_default("recording.tick_interval_ms", 1000_i64)?
        .set_default("recording.rollover_delay_ms", 1000_i64)?
        .set_default("sensor.poll_interval_ms", DEFAULT_SENSOR_POLL_MS as i64)?)
}
