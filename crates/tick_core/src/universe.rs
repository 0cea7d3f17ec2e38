//! Fixed symbol universe.
//!
//! The simulator tracks a small, fixed set of instruments; each carries an
//! initial price plus the volatility and drift coefficients that shape its
//! random walk. The set is created once at startup and never changes during
//! the process lifetime.

/// Specification for one simulated instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSpec {
    /// Ticker symbol
    pub symbol: &'static str,
    /// Starting price
    pub initial_price: f64,
    /// Per-tick standard-deviation coefficient
    pub volatility: f64,
    /// Per-tick drift coefficient
    pub trend: f64,
}

/// The default instrument set.
pub fn default_universe() -> Vec<SymbolSpec> {
    vec![
        SymbolSpec {
            symbol: "AAPL",
            initial_price: 150.00,
            volatility: 0.02,
            trend: 0.0001,
        },
        SymbolSpec {
            symbol: "GOOGL",
            initial_price: 2800.00,
            volatility: 0.025,
            trend: 0.0002,
        },
        SymbolSpec {
            symbol: "MSFT",
            initial_price: 380.00,
            volatility: 0.018,
            trend: 0.0001,
        },
        SymbolSpec {
            symbol: "TSLA",
            initial_price: 250.00,
            volatility: 0.04,
            trend: -0.0001,
        },
        SymbolSpec {
            symbol: "AMZN",
            initial_price: 3200.00,
            volatility: 0.022,
            trend: 0.0001,
        },
    ]
}
