//! Error types for the tickflow service.

use thiserror::Error;

/// Service-level error type.
///
/// Only startup-phase and top-level unexpected failures reach this type;
/// per-record and per-iteration errors are handled (logged and swallowed)
/// where they occur.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Transport error during startup
    #[error("broker error: {0}")]
    Broker(#[from] adapter_broker::transport::BrokerError),

    /// Tick generation error
    #[error("simulation error: {0}")]
    Sim(#[from] tick_sim::simulator::SimError),

    /// Record serialisation error
    #[error("serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    /// Background task failed to join
    #[error("task error: {0}")]
    Task(String),
}

impl ServiceError {
    /// Create a task error
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
