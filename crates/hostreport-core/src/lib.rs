pub mod config;
pub mod logging;

pub mod collect;
pub mod delivery;
pub mod error;
pub mod payload;
pub mod transport;

pub use collect::{HostCollector, PayloadSource};
pub use delivery::{publish, publish_async, AbandonReason, DeliveryPolicy, DeliveryResult};
pub use error::{CollectionError, ConfigError};
pub use payload::Payload;
