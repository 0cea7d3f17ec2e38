//! Wire-level tick record type.
//!
//! One `TickRecord` is one simulated trade event. On the wire it is a UTF-8
//! JSON object with exactly four fields: `symbol`, `price`, `timestamp`,
//! `volume`. The publish key is the symbol string, which drives partition
//! assignment upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One simulated trade event for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Instrument identifier, drawn from the fixed universe
    pub symbol: String,
    /// Simulated trade price, rounded to two decimals on the wire
    pub price: f64,
    /// Generation time (RFC 3339 on the wire)
    pub timestamp: DateTime<Utc>,
    /// Simulated trade size
    pub volume: u64,
}

impl TickRecord {
    /// Create a record stamped with the current time.
    pub fn new(symbol: impl Into<String>, price: f64, volume: u64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp: Utc::now(),
            volume,
        }
    }

    /// Serialise to the wire format.
    pub fn to_wire(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
