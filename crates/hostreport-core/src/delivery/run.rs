//! Delivery drivers: run attempts until the policy says stop.

use std::sync::Arc;
use std::time::Duration;

use crate::payload::Payload;
use crate::transport::{CurlTransport, Outcome, Transport, TransportOptions};

use super::policy::{AbandonReason, DeliveryPolicy, Step};
use super::sleep::{Sleeper, ThreadSleeper};

/// Terminal result of one publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered,
    Abandoned(AbandonReason),
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryResult::Delivered)
    }
}

/// Per-call attempt bookkeeping; dropped when the call returns.
#[derive(Debug, Default)]
struct AttemptState {
    /// 0-based index of the attempt in flight.
    attempt: u32,
    /// Total time spent in backoff so far.
    backoff: Duration,
}

impl AttemptState {
    fn advance(&mut self, delay: Duration) {
        self.backoff = self.backoff.saturating_add(delay);
        self.attempt += 1;
    }

    fn finish(self, payload: &Payload, result: DeliveryResult) -> DeliveryResult {
        let attempts = self.attempt + 1;
        match &result {
            DeliveryResult::Delivered => tracing::info!(
                attempts,
                backoff = ?self.backoff,
                "report for {} delivered",
                payload.captured_at()
            ),
            DeliveryResult::Abandoned(reason) => tracing::warn!(
                attempts,
                backoff = ?self.backoff,
                %reason,
                "report for {} abandoned",
                payload.captured_at()
            ),
        }
        result
    }
}

fn encode(payload: &Payload) -> Result<Vec<u8>, DeliveryResult> {
    serde_json::to_vec(payload).map_err(|e| {
        let reason = AbandonReason::Unserializable(e.to_string());
        tracing::error!(%reason, "cannot encode report");
        DeliveryResult::Abandoned(reason)
    })
}

fn log_step(attempt: u32, budget: u32, outcome: &Outcome, step: &Step) {
    let n = attempt + 1;
    match step {
        Step::Done => tracing::debug!(attempt = n, budget, "report accepted"),
        Step::RetryAfter(delay) => match outcome {
            Outcome::Rejected { .. } => {
                tracing::warn!(attempt = n, budget, ?delay, "rate limited; backing off")
            }
            _ => tracing::warn!(attempt = n, budget, ?delay, "host unreachable ({}); retrying", outcome),
        },
        Step::Abandon(AbandonReason::Rejected(401)) => tracing::error!(
            attempt = n,
            "collector refused the API key (HTTP 401); check api_key / HOSTREPORT_API_KEY"
        ),
        Step::Abandon(AbandonReason::Rejected(status)) => {
            tracing::error!(attempt = n, status, "report rejected; not retrying")
        }
        Step::Abandon(AbandonReason::RateLimitExhausted) => {
            tracing::error!(attempt = n, budget, "still rate limited on the last attempt")
        }
        Step::Abandon(reason) => {
            tracing::error!(attempt = n, budget, %reason, "giving up ({})", outcome)
        }
    }
}

/// Publish `payload` to `{host}/report`, blocking the current thread through backoff.
///
/// Uses default transport timeouts. Never fails: the outcome is reported in
/// the returned [`DeliveryResult`].
pub fn publish(
    payload: &Payload,
    host: &str,
    api_key: &str,
    policy: &DeliveryPolicy,
) -> DeliveryResult {
    let transport = CurlTransport::new(host, api_key, TransportOptions::default());
    publish_with(payload, transport, policy, ThreadSleeper)
}

/// Run one attempt sequence through `transport`, suspending with `sleeper`.
///
/// `transport` is owned for the whole sequence and dropped on return.
pub fn publish_with<T, S>(
    payload: &Payload,
    mut transport: T,
    policy: &DeliveryPolicy,
    mut sleeper: S,
) -> DeliveryResult
where
    T: Transport,
    S: Sleeper,
{
    let body = match encode(payload) {
        Ok(body) => body,
        Err(result) => return result,
    };
    let budget = policy.attempts();
    let mut state = AttemptState::default();
    loop {
        let outcome = transport.send(&body);
        let step = policy.decide(state.attempt, &outcome);
        log_step(state.attempt, budget, &outcome, &step);
        match step {
            Step::Done => return state.finish(payload, DeliveryResult::Delivered),
            Step::Abandon(reason) => {
                return state.finish(payload, DeliveryResult::Abandoned(reason))
            }
            Step::RetryAfter(delay) => {
                sleeper.sleep(delay);
                state.advance(delay);
            }
        }
    }
}

/// Async variant of [`publish`] for tokio callers.
pub async fn publish_async(
    payload: &Payload,
    host: &str,
    api_key: &str,
    policy: &DeliveryPolicy,
) -> DeliveryResult {
    let transport = CurlTransport::new(host, api_key, TransportOptions::default());
    publish_with_async(payload, transport, policy).await
}

/// Async driver: each attempt runs on the blocking pool, backoff is a tokio sleep.
///
/// Dropping the returned future while it is backing off cancels the sequence
/// and drops `transport` with it.
pub async fn publish_with_async<T>(
    payload: &Payload,
    transport: T,
    policy: &DeliveryPolicy,
) -> DeliveryResult
where
    T: Transport + Send + 'static,
{
    let body: Arc<[u8]> = match encode(payload) {
        Ok(body) => body.into(),
        Err(result) => return result,
    };
    let policy = *policy;
    let budget = policy.attempts();
    let mut state = AttemptState::default();
    let mut transport = transport;
    loop {
        let attempt_body = Arc::clone(&body);
        let joined = tokio::task::spawn_blocking(move || {
            let outcome = transport.send(&attempt_body);
            (transport, outcome)
        })
        .await;
        let outcome = match joined {
            Ok((t, outcome)) => {
                transport = t;
                outcome
            }
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!("attempt task cancelled: {}", e);
                return state.finish(
                    payload,
                    DeliveryResult::Abandoned(AbandonReason::Interrupted),
                );
            }
        };
        let step = policy.decide(state.attempt, &outcome);
        log_step(state.attempt, budget, &outcome, &step);
        match step {
            Step::Done => return state.finish(payload, DeliveryResult::Delivered),
            Step::Abandon(reason) => {
                return state.finish(payload, DeliveryResult::Abandoned(reason))
            }
            Step::RetryAfter(delay) => {
                tokio::time::sleep(delay).await;
                state.advance(delay);
            }
        }
    }
}
