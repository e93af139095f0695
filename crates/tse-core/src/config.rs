//! Configuration parsing for the TSE option data system.
//!
//! All sources read their endpoints and timeouts from a single JSON file.
//! Every field has a production default, so an empty object `{}` is a valid
//! config and a missing section falls back to the defaults below.
//!
//! # Example config
//!
//! ```json
//! {
//!   "logging": { "module_name": "tse-runner", "log_path": "/tmp/log", "level": "info", "json": false },
//!   "mercantile": { "poll_timeout_secs": 20 },
//!   "tsetmc": { "request_timeout_secs": 10 },
//!   "tadbir": { "batch_size": 500 }
//! }
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TseError};

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub mercantile: MercantileConfig,

    #[serde(default)]
    pub tsetmc: TsetmcConfig,

    #[serde(default)]
    pub tadbir: TadbirConfig,
}

/// Logging metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Used as the log file prefix.
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Directory for daily-rotating log files. Console only when absent.
    #[serde(default)]
    pub log_path: Option<String>,

    /// Default level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON lines in the log file instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { module_name: default_module_name(), log_path: None, level: default_log_level(), json: false }
    }
}

/// Mercantile exchange long-polling endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MercantileConfig {
    /// Base URL; the action name (`negotiate`, `poll`, ...) is appended verbatim.
    #[serde(default = "default_mercantile_url")]
    pub base_url: String,

    /// How long the server may hold a poll open, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl MercantileConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

impl Default for MercantileConfig {
    fn default() -> Self {
        Self { base_url: default_mercantile_url(), poll_timeout_secs: default_poll_timeout() }
    }
}

/// TSETMC snapshot endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TsetmcConfig {
    #[serde(default = "default_tsetmc_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// `User-Agent` values, rotated per request. The CDN rejects empty agents.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl TsetmcConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for TsetmcConfig {
    fn default() -> Self {
        Self {
            base_url: default_tsetmc_url(),
            request_timeout_secs: default_request_timeout(),
            user_agents: default_user_agents(),
        }
    }
}

/// Tadbir quote endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TadbirConfig {
    #[serde(default = "default_tadbir_url")]
    pub base_url: String,

    /// Maximum number of instrument codes per bulk request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for TadbirConfig {
    fn default() -> Self {
        Self { base_url: default_tadbir_url(), batch_size: default_batch_size() }
    }
}

impl AppConfig {
    /// Reject values that would only fail later at request time.
    pub fn validate(&self) -> Result<()> {
        if self.tadbir.batch_size == 0 {
            return Err(TseError::InvalidParameter("tadbir.batch_size must be positive".into()));
        }
        if self.tsetmc.user_agents.iter().all(|a| a.trim().is_empty()) {
            return Err(TseError::InvalidParameter("tsetmc.user_agents needs a non-empty agent".into()));
        }
        if self.mercantile.poll_timeout_secs == 0 {
            return Err(TseError::InvalidParameter("mercantile.poll_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_module_name() -> String {
    "tse-runner".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_mercantile_url() -> String {
    "https://cdn.ime.co.ir/realTimeServer/".into()
}

fn default_poll_timeout() -> u64 {
    20
}

fn default_tsetmc_url() -> String {
    "https://cdn.tsetmc.com/api".into()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36 Edg/124.0",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_tadbir_url() -> String {
    "https://core.tadbirrlc.com//".into()
}

fn default_batch_size() -> usize {
    500
}

/// Load, parse and validate a JSON config file.
pub fn load_config(path: &std::path::Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TseError::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: AppConfig =
        serde_json::from_str(&content).map_err(|e| TseError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
