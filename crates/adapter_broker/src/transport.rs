//! Publish/subscribe transport traits and delivery metadata.
//!
//! These traits are the only surface the generation and processing layers
//! see; any broker client (networked or in-process) plugs in behind them.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Broker endpoint could not be reached or refused the connection
    #[error("connection error: {0}")]
    Connection(String),

    /// Publish or poll did not complete within its bounded wait
    #[error("transport timeout after {0:?}")]
    Timeout(Duration),

    /// Broker rejected or lost the request in flight
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection attempts exhausted during startup
    #[error("gave up connecting after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Attempts made before giving up
        attempts: u32,
        /// Error from the final attempt
        last_error: String,
    },

    /// Sink or source already closed
    #[error("transport closed")]
    Closed,
}

impl BrokerError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a generic transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Position the broker assigned to a published record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Partition the record landed on
    pub partition: i32,
    /// Offset within that partition
    pub offset: i64,
}

/// One record handed back by a poll, with its transport metadata.
#[derive(Debug, Clone)]
pub struct DeliveredRecord {
    /// Partition the record was read from
    pub partition: i32,
    /// Offset within that partition
    pub offset: i64,
    /// Broker-assigned append time in epoch milliseconds, when known
    pub timestamp_ms: Option<i64>,
    /// Partition key the record was published under
    pub key: Option<String>,
    /// Raw record payload
    pub payload: Vec<u8>,
}

impl DeliveredRecord {
    /// Locator string for logs and display, `P<partition>:O<offset>`.
    pub fn locator(&self) -> String {
        format!("P{}:O{}", self.partition, self.offset)
    }
}

/// Blocking-style publish endpoint.
///
/// `publish` waits for the broker acknowledgement (bounded); callers treat
/// timeouts and transport errors as logged, non-fatal, per-record failures.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Publish one payload under a partition key.
    async fn publish(&self, key: &str, payload: Vec<u8>) -> Result<DeliveryReceipt, BrokerError>;

    /// Flush any pending publishes.
    async fn flush(&self) -> Result<(), BrokerError>;

    /// Release transport resources. Further publishes fail with `Closed`.
    async fn close(&self) -> Result<(), BrokerError>;
}

/// Bounded-timeout poll endpoint.
///
/// A poll may return an empty batch; records within a batch are ordered per
/// partition. Transport errors are non-fatal — the caller logs and polls
/// again.
#[async_trait]
pub trait SubscribeSource: Send {
    /// Poll for the next batch of records, waiting at most `timeout`.
    async fn poll(&mut self, timeout: Duration) -> Result<Vec<DeliveredRecord>, BrokerError>;

    /// Release transport resources.
    async fn close(&mut self) -> Result<(), BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_format() {
        let record = DeliveredRecord {
            partition: 2,
            offset: 41,
            timestamp_ms: None,
            key: None,
            payload: Vec::new(),
        };
        assert_eq!(record.locator(), "P2:O41");
    }

    #[test]
    fn test_error_display() {
        let err = BrokerError::RetriesExhausted {
            attempts: 5,
            last_error: "refused".to_string(),
        };
        assert!(err.to_string().contains("5 attempts"));
    }
}
