//! Delivery controller: bounded retry with outcome-specific backoff.
//!
//! One `publish` call runs one attempt sequence for one payload and always
//! returns a [`DeliveryResult`]; nothing is remembered between calls. The
//! transition table lives in [`DeliveryPolicy::decide`], the loops that
//! drive it (blocking and tokio) in `run`.

mod policy;
mod run;
mod sleep;

pub use policy::{AbandonReason, DeliveryPolicy, Step};
pub use run::{publish, publish_async, publish_with, publish_with_async, DeliveryResult};
pub use sleep::{Sleeper, ThreadSleeper};
