use std::fmt;
use std::time::Duration;

use crate::transport::Outcome;

/// Why a delivery sequence ended without success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbandonReason {
    /// Still rate limited (429) on the last allowed attempt.
    RateLimitExhausted,
    /// No response on the last allowed attempt.
    TransportExhausted,
    /// Non-retryable HTTP status.
    Rejected(u16),
    /// Payload could not be encoded; nothing was sent.
    Unserializable(String),
    /// The async driver lost its attempt task (runtime shutting down).
    Interrupted,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbandonReason::RateLimitExhausted => write!(f, "rate-limit exhausted"),
            AbandonReason::TransportExhausted => write!(f, "transport failures exhausted"),
            AbandonReason::Rejected(status) => write!(f, "rejected: status {}", status),
            AbandonReason::Unserializable(e) => write!(f, "payload not serializable: {}", e),
            AbandonReason::Interrupted => write!(f, "interrupted before completion"),
        }
    }
}

/// What the controller does after an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Delivered; stop.
    Done,
    /// Sleep, then make the next attempt.
    RetryAfter(Duration),
    /// Stop without delivering.
    Abandon(AbandonReason),
}

/// Bounded retry with two backoff shapes.
///
/// Rate limiting (429) backs off exponentially: `base_delay * 2^n` after
/// attempt `n` (0-based). Transport failures wait a flat `base_delay * 2`.
/// Any other rejection stops immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Maximum number of attempts, including the first. 0 behaves as 1.
    pub max_attempts: u32,
    /// Base delay both backoff shapes scale from.
    pub base_delay: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl DeliveryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Effective attempt budget; a publish always makes at least one attempt.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after a 429 on attempt `attempt` (0-based): `base_delay * 2^attempt`, saturating.
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Delay after a transport failure: always `base_delay * 2`.
    pub fn transport_delay(&self) -> Duration {
        self.base_delay.saturating_mul(2)
    }

    /// Decide the next step after attempt `attempt` (0-based) produced `outcome`.
    pub fn decide(&self, attempt: u32, outcome: &Outcome) -> Step {
        let has_next = attempt.saturating_add(1) < self.attempts();
        match outcome {
            Outcome::Delivered => Step::Done,
            Outcome::Rejected {
                retryable: true, ..
            } => {
                if has_next {
                    Step::RetryAfter(self.rate_limit_delay(attempt))
                } else {
                    Step::Abandon(AbandonReason::RateLimitExhausted)
                }
            }
            Outcome::Rejected {
                status,
                retryable: false,
            } => Step::Abandon(AbandonReason::Rejected(*status)),
            Outcome::TransportFailure { .. } => {
                if has_next {
                    Step::RetryAfter(self.transport_delay())
                } else {
                    Step::Abandon(AbandonReason::TransportExhausted)
                }
            }
        }
    }
}
