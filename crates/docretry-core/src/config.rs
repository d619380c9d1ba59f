//! Connection policy and retry options, loaded from TOML under the XDG config dir.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry option values for throttled (429) requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Maximum number of retries (not counting the first attempt) on a 429.
    pub max_retry_attempts_on_throttled_requests: u32,
    /// Upper bound on the total time spent waiting between throttled retries.
    pub max_retry_wait_time_in_seconds: u64,
    /// Base delay for exponential backoff when the server sends no retry-after hint.
    pub throttle_backoff_base_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retry_attempts_on_throttled_requests: 9,
            max_retry_wait_time_in_seconds: 30,
            throttle_backoff_base_ms: 100,
        }
    }
}

impl RetryOptions {
    pub fn max_retry_wait_time(&self) -> Duration {
        Duration::from_secs(self.max_retry_wait_time_in_seconds)
    }

    pub fn throttle_backoff_base(&self) -> Duration {
        Duration::from_millis(self.throttle_backoff_base_ms)
    }
}

/// Client connection settings consumed by the retry policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPolicy {
    /// When false, a 403/WriteForbidden is never retried.
    #[serde(default = "default_enable_endpoint_discovery")]
    pub enable_endpoint_discovery: bool,
    #[serde(default)]
    pub retry_options: RetryOptions,
}

fn default_enable_endpoint_discovery() -> bool {
    true
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            enable_endpoint_discovery: true,
            retry_options: RetryOptions::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docretry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load a connection policy from the given TOML file.
pub fn load_from_path(path: &Path) -> Result<ConnectionPolicy> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ConnectionPolicy =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ConnectionPolicy> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`], at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ConnectionPolicy> {
    if !path.exists() {
        let default_cfg = ConnectionPolicy::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(path)
}
