use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::delivery::DeliveryPolicy;
use crate::error::ConfigError;
use crate::transport::TransportOptions;

/// Environment variable overriding `host`.
pub const ENV_HOST: &str = "HOSTREPORT_HOST";
/// Environment variable overriding `api_key`.
pub const ENV_API_KEY: &str = "HOSTREPORT_API_KEY";

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per report (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds; 429 backs off `base * 2^n`, transport failures `base * 2`.
    pub base_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> DeliveryPolicy {
        // Too large for a Duration saturates; negative or NaN means no delay.
        let base = if self.base_delay_secs > 0.0 {
            Duration::try_from_secs_f64(self.base_delay_secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        DeliveryPolicy::new(self.max_attempts, base)
    }
}

/// Per-attempt timeouts (optional `[transport]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let d = TransportOptions::default();
        Self {
            connect_timeout_secs: d.connect_timeout.as_secs(),
            timeout_secs: d.timeout.as_secs(),
        }
    }
}

impl TransportConfig {
    pub fn to_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Configuration loaded from `~/.config/hostreport/config.toml`.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Collector base URL, e.g. `https://collector.example.com`.
    #[serde(default)]
    pub host: Option<String>,
    /// Value sent in the `X-API-KEY` header.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional transport timeouts; if missing, built-in defaults are used.
    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("retry", &self.retry)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Validated report destination.
#[derive(Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub api_key: String,
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ReporterConfig {
    /// Replace `host`/`api_key` with non-empty values from the environment.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            self.host = Some(host);
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    pub fn policy(&self) -> DeliveryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn transport_options(&self) -> TransportOptions {
        self.transport.clone().unwrap_or_default().to_options()
    }

    /// Host and API key, validated. The host must be an http(s) URL.
    pub fn target(&self) -> Result<Target, ConfigError> {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?;
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let parsed = url::Url::parse(host).map_err(|e| ConfigError::InvalidHost {
            host: host.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidHost {
                host: host.to_string(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        Ok(Target {
            host: host.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hostreport")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReporterConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ReporterConfig> {
    if !path.exists() {
        let default_cfg = ReporterConfig {
            retry: Some(RetryConfig::default()),
            transport: Some(TransportConfig::default()),
            ..ReporterConfig::default()
        };
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: ReporterConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}
