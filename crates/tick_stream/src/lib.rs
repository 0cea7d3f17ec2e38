//! # tick_stream: Stateful Stream Processing
//!
//! Consumer-side pipeline: every delivered record flows through
//! Validation → Aggregation → Presentation, with bounded memory and
//! graceful degradation on malformed input.
//!
//! ## Modules
//!
//! - [`aggregator`]: running per-symbol statistics
//! - [`display`]: trend derivation and tabular row rendering
//! - [`reporter`]: time-windowed statistics snapshots
//! - [`consumer`]: the cooperative poll/process loop

pub mod aggregator;
pub mod consumer;
pub mod display;
pub mod reporter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregator::{SymbolAggregator, SymbolStats};
    pub use crate::consumer::{run_consumer, TickProcessor};
    pub use crate::display::{TickRow, Trend};
    pub use crate::reporter::{StatsReporter, StreamCounters};
}
