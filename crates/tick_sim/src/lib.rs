//! # tick_sim: Synthetic Tick Generation
//!
//! Simulates per-symbol trade ticks with realistic price movements and
//! volume coupling, and drives them into a publish sink.
//!
//! ## Modules
//!
//! - [`simulator`]: per-symbol biased random walk with volume coupling
//! - [`producer`]: the cooperative publish loop

pub mod producer;
pub mod simulator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::producer::{run_producer, ProducerSummary};
    pub use crate::simulator::{PriceSimulator, SimError};
}
