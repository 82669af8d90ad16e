use crate::domain::chart::TimelinePolicy;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub monitoring: MonitoringSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// No timeout unless set
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitoringSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub timeline: TimelinePolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeline: TimelinePolicy::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl MonitoringSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Load `config/dashboard.{toml,...}` if present, overlaid by `DASHBOARD__*` variables
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    if config.monitoring.poll_interval_ms == 0 {
        anyhow::bail!("monitoring.poll_interval_ms must be greater than zero");
    }
    Ok(config)
}
