//! Single-attempt report transport.
//!
//! A [`Transport`] performs exactly one `POST {host}/report` and classifies
//! what happened into an [`Outcome`]. Retrying is the delivery controller's
//! job; nothing here sleeps or loops.

mod classify;
mod client;

use std::fmt;
use std::time::Duration;

pub use self::classify::{classify_curl_error, classify_http_status};
pub use self::client::CurlTransport;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Endpoint answered 2xx.
    Delivered,
    /// Endpoint answered non-2xx. Only 429 is retryable.
    Rejected { status: u16, retryable: bool },
    /// No response: connect failure, DNS failure, timeout.
    TransportFailure { kind: FailureKind, detail: String },
}

/// Why no response arrived. Informational; all kinds retry the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connect or read timed out.
    Timeout,
    /// Connection refused/reset, DNS failure, nothing received.
    Connect,
    /// Any other client-side failure (TLS, local setup).
    Other,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Delivered => write!(f, "delivered"),
            Outcome::Rejected { status, .. } => write!(f, "HTTP {}", status),
            Outcome::TransportFailure { kind, detail } => {
                write!(f, "transport failure ({:?}): {}", kind, detail)
            }
        }
    }
}

/// One authenticated POST of an already-serialized payload.
pub trait Transport {
    fn send(&mut self, body: &[u8]) -> Outcome;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, body: &[u8]) -> Outcome {
        (**self).send(body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, body: &[u8]) -> Outcome {
        (**self).send(body)
    }
}

/// Timeouts for a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

/// `{host}/report`, tolerating one trailing slash on `host`.
pub fn report_url(host: &str) -> String {
    format!("{}/report", host.strip_suffix('/').unwrap_or(host))
}
