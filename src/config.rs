//! Configuration types for paddock

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::schedule::ScheduleConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Backend service connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the local backend service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Adaptive refresh bands, in file-friendly units
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSettings {
    /// Below this many minutes to the off, poll at the imminent cadence
    #[serde(default = "default_imminent_threshold")]
    pub imminent_threshold_minutes: f64,

    #[serde(default = "default_soon_threshold")]
    pub soon_threshold_minutes: f64,

    #[serde(default = "default_near_threshold")]
    pub near_threshold_minutes: f64,

    #[serde(default = "default_imminent_secs")]
    pub imminent_interval_secs: u64,

    #[serde(default = "default_soon_secs")]
    pub soon_interval_secs: u64,

    #[serde(default = "default_near_secs")]
    pub near_interval_secs: u64,

    #[serde(default = "default_far_secs")]
    pub far_interval_secs: u64,

    /// Used when no race is still to start
    #[serde(default = "default_idle_secs")]
    pub idle_interval_secs: u64,
}

fn default_imminent_threshold() -> f64 {
    2.0
}
fn default_soon_threshold() -> f64 {
    5.0
}
fn default_near_threshold() -> f64 {
    10.0
}
fn default_imminent_secs() -> u64 {
    10
}
fn default_soon_secs() -> u64 {
    30
}
fn default_near_secs() -> u64 {
    60
}
fn default_far_secs() -> u64 {
    120
}
fn default_idle_secs() -> u64 {
    300
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            imminent_threshold_minutes: 2.0,
            soon_threshold_minutes: 5.0,
            near_threshold_minutes: 10.0,
            imminent_interval_secs: 10,
            soon_interval_secs: 30,
            near_interval_secs: 60,
            far_interval_secs: 120,
            idle_interval_secs: 300,
        }
    }
}

impl ScheduleSettings {
    /// Convert to the scheduler's band configuration.
    pub fn to_schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            imminent_threshold_minutes: self.imminent_threshold_minutes,
            soon_threshold_minutes: self.soon_threshold_minutes,
            near_threshold_minutes: self.near_threshold_minutes,
            imminent_interval: Duration::from_secs(self.imminent_interval_secs),
            soon_interval: Duration::from_secs(self.soon_interval_secs),
            near_interval: Duration::from_secs(self.near_interval_secs),
            far_interval: Duration::from_secs(self.far_interval_secs),
            idle_interval: Duration::from_secs(self.idle_interval_secs),
        }
    }
}

/// Saved-credentials storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    /// Where the remembered login state lives
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.toml")
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
