//! # service_tickflow: Tickflow Service Orchestration
//!
//! Entry-point layer of the workspace: environment configuration, tracing
//! setup, signal handling and wiring of the producer/consumer loops through
//! the broker seam.
//!
//! ## Modules
//!
//! - [`config`]: environment-driven configuration with validation
//! - [`error`]: service-level error type
//! - [`runner`]: pipeline orchestration and CLI command bodies

pub mod config;
pub mod error;
pub mod runner;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, StreamConfig};
    pub use crate::error::ServiceError;
    pub use crate::runner::{run_pipeline, RunSummary};
}
