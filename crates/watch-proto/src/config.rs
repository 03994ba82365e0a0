use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the backend functions live and how to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; each endpoint is `POST {functions_url}/{name}`.
    #[serde(default = "default_functions_url")]
    pub functions_url: String,
    /// Public anon key, sent as bearer token and `apikey` header.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_scheduler_interval")]
    pub scheduler_interval_secs: u64,
    #[serde(default = "default_fixtures_interval")]
    pub fixtures_interval_secs: u64,
    #[serde(default = "default_ticker_interval")]
    pub ticker_interval_secs: u64,
}

/// Local read-only status API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            functions_url: default_functions_url(),
            anon_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            scheduler_interval_secs: default_scheduler_interval(),
            fixtures_interval_secs: default_fixtures_interval(),
            ticker_interval_secs: default_ticker_interval(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_functions_url() -> String {
    "https://localhost:54321/functions/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_scheduler_interval() -> u64 {
    45
}

fn default_fixtures_interval() -> u64 {
    20
}

fn default_ticker_interval() -> u64 {
    120
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

impl PollingConfig {
    // Zero would make tokio's interval panic
    fn secs(v: u64) -> Duration {
        Duration::from_secs(v.max(1))
    }

    pub fn scheduler_interval(&self) -> Duration {
        Self::secs(self.scheduler_interval_secs)
    }

    pub fn fixtures_interval(&self) -> Duration {
        Self::secs(self.fixtures_interval_secs)
    }

    pub fn ticker_interval(&self) -> Duration {
        Self::secs(self.ticker_interval_secs)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, writing a default config there first if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
