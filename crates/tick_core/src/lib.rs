//! # tick_core: Foundation for the Tickflow Streaming Pipeline
//!
//! ## Layer Role
//!
//! tick_core is the bottom layer of the workspace, providing:
//! - The wire-level tick record type (`record::TickRecord`)
//! - The fixed symbol universe (`universe`)
//! - Structural record validation (`validate`)
//! - The cooperative shutdown flag shared by both loops (`shutdown`)
//!
//! ## Zero Dependency Principle
//!
//! tick_core has no dependencies on other tickflow crates, with minimal
//! external dependencies:
//! - chrono: timestamp type and RFC 3339 formatting
//! - serde / serde_json: wire serialisation
//! - thiserror: structured validation errors

pub mod record;
pub mod shutdown;
pub mod universe;
pub mod validate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::record::TickRecord;
    pub use crate::shutdown::ShutdownFlag;
    pub use crate::universe::{default_universe, SymbolSpec};
    pub use crate::validate::{validate, ValidationError};
}
