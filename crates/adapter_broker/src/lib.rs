//! # adapter_broker: Transport Seam for the Tickflow Pipeline
//!
//! The broker itself is an external collaborator consumed as a black box:
//! the pipeline only assumes an at-least-once delivery channel keyed by a
//! partition key, exposing `publish(key, payload)` and `poll(timeout)`
//! with per-record partition/offset/timestamp metadata.
//!
//! ## Modules
//!
//! - [`transport`]: the `PublishSink` / `SubscribeSource` traits and the
//!   delivery metadata types exchanged through them
//! - [`channel_broker`]: in-process broker implementation backed by bounded
//!   async channels, used by the demo pipeline and the test suites
//! - [`retry`]: startup-phase connection retry with exponential backoff

pub mod channel_broker;
pub mod retry;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::channel_broker::{ChannelBroker, ChannelSink, ChannelSource};
    pub use crate::retry::{connect_with_retry, RetryPolicy};
    pub use crate::transport::{
        BrokerError, DeliveredRecord, DeliveryReceipt, PublishSink, SubscribeSource,
    };
}
