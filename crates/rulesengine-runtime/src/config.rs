//! Cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration
///
/// Loaded from `config/rulesengine.{toml,yaml,json}` and `RULESENGINE_*`
/// environment variables, falling back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Age after which an entry is rechecked against its source (milliseconds)
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Interval between background sweeps (milliseconds)
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Upper bound on a single configuration fetch (milliseconds)
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl CacheConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = as_millis(ttl);
        self
    }

    /// Set the sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_ms = as_millis(interval);
        self
    }

    /// Set the fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = as_millis(timeout);
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Reject values the cache cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::Config(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(CacheError::Config(
                "fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables and `config/rulesengine`
    pub fn load() -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();
        Self::load_from("config/rulesengine")
    }

    /// Load configuration from the file stem `path` and the environment
    ///
    /// The file is optional; missing keys take their default values.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("RULESENGINE").try_parsing(true))
            .build()
            .map_err(|e| CacheError::Config(format!("Failed to read config: {}", e)))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| CacheError::Config(format!("Failed to deserialize config: {}", e)))?;

        config.validate()?;
        tracing::debug!(?config, "loaded cache configuration");
        Ok(config)
    }
}

fn default_ttl_ms() -> u64 {
    300_000
}

fn default_sweep_interval_ms() -> u64 {
    300_000
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
