//! Error types for host snapshot collection and configuration.
//!
//! Delivery failures are not errors: the controller reports them as an
//! `Abandoned` result (see [`crate::delivery`]).

use thiserror::Error;

/// The payload could not be built. Fatal for the current cycle; never retried.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// A probe command could not be spawned or exited unsuccessfully.
    #[error("command `{command}` failed: {detail}")]
    Command { command: String, detail: String },

    /// Total memory could not be determined.
    #[error("total memory not reported by the host")]
    Memory,

    /// System clock is before the UNIX epoch.
    #[error("system clock is before the UNIX epoch")]
    Clock,
}

/// The configuration does not describe a usable report target.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no collector host configured (set `host` in config.toml, HOSTREPORT_HOST or --host)")]
    MissingHost,

    #[error("no API key configured (set `api_key` in config.toml, HOSTREPORT_API_KEY or --api-key)")]
    MissingApiKey,

    #[error("invalid collector host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },
}
