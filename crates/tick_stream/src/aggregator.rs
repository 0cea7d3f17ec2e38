//! Running per-symbol statistics.
//!
//! Statistics are created lazily on the first valid record for a symbol and
//! persist for the lifetime of the process. There is no eviction: the
//! symbol universe is fixed and small, so cardinality is bounded by it.
//! A single logical thread of control owns and mutates the aggregator;
//! reporting reads it through the shared views.

use std::collections::BTreeMap;
use tick_core::record::TickRecord;

/// Running statistics for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStats {
    /// Valid ticks observed
    pub count: u64,
    /// Running volume sum; average volume is derived, never stored
    pub total_volume: u64,
    /// Most recent price
    pub last_price: f64,
    /// Running minimum
    pub min_price: f64,
    /// Running maximum
    pub max_price: f64,
}

impl SymbolStats {
    /// State before the first update is applied.
    fn empty() -> Self {
        Self {
            count: 0,
            total_volume: 0,
            last_price: 0.0,
            min_price: f64::INFINITY,
            max_price: 0.0,
        }
    }

    /// Derived average volume.
    pub fn avg_volume(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_volume as f64 / self.count as f64
        }
    }
}

/// Per-symbol statistics over the whole stream.
///
/// Backed by a `BTreeMap` so iteration order is stable within one snapshot.
#[derive(Debug, Default)]
pub struct SymbolAggregator {
    stats: BTreeMap<String, SymbolStats>,
}

impl SymbolAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one validated record into its symbol's statistics.
    ///
    /// Assumes validated input; there is no failure path. Value ranges were
    /// not checked upstream, so a structurally valid negative price flows
    /// into the extrema unchallenged.
    pub fn update(&mut self, record: &TickRecord) {
        let stats = self
            .stats
            .entry(record.symbol.clone())
            .or_insert_with(SymbolStats::empty);

        stats.count += 1;
        stats.total_volume += record.volume;
        stats.last_price = record.price;
        stats.min_price = stats.min_price.min(record.price);
        stats.max_price = stats.max_price.max(record.price);
    }

    /// Statistics for one symbol, if it has been seen.
    pub fn get(&self, symbol: &str) -> Option<&SymbolStats> {
        self.stats.get(symbol)
    }

    /// Last observed price for a symbol, if it has been seen.
    ///
    /// Callers deriving a trend must snapshot this *before* calling
    /// [`update`](Self::update), which overwrites it.
    pub fn last_price(&self, symbol: &str) -> Option<f64> {
        self.stats.get(symbol).map(|s| s.last_price)
    }

    /// Iterate symbols and their statistics in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolStats)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct symbols seen.
    pub fn symbol_count(&self) -> usize {
        self.stats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tick(symbol: &str, price: f64, volume: u64) -> TickRecord {
        TickRecord::new(symbol, price, volume)
    }

    #[test]
    fn test_first_tick_initialises_then_updates() {
        let mut agg = SymbolAggregator::new();
        agg.update(&tick("AAPL", 150.0, 500));

        let stats = agg.get("AAPL").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_volume, 500);
        assert_eq!(stats.last_price, 150.0);
        assert_eq!(stats.min_price, 150.0);
        assert_eq!(stats.max_price, 150.0);
    }

    #[test]
    fn test_n_updates_exact_arithmetic() {
        let mut agg = SymbolAggregator::new();
        let prices = [150.0, 151.0, 149.5, 150.25];
        let volumes = [500u64, 600, 400, 1_000];

        for (p, v) in prices.iter().zip(volumes) {
            agg.update(&tick("AAPL", *p, v));
        }

        let stats = agg.get("AAPL").unwrap();
        assert_eq!(stats.count, prices.len() as u64);
        assert_eq!(stats.total_volume, volumes.iter().sum::<u64>());
        assert_eq!(stats.last_price, 150.25);
        assert_eq!(stats.min_price, 149.5);
        assert_eq!(stats.max_price, 151.0);
        assert!(stats.min_price <= stats.last_price && stats.last_price <= stats.max_price);
        assert_relative_eq!(stats.avg_volume(), 625.0);
    }

    #[test]
    fn test_symbols_are_independent() {
        let mut agg = SymbolAggregator::new();
        agg.update(&tick("AAPL", 150.0, 500));
        agg.update(&tick("TSLA", 250.0, 300));

        assert_eq!(agg.symbol_count(), 2);
        assert_eq!(agg.get("AAPL").unwrap().total_volume, 500);
        assert_eq!(agg.get("TSLA").unwrap().total_volume, 300);
    }

    #[test]
    fn test_negative_price_flows_through() {
        // Known upstream gap: structurally valid out-of-range values are
        // aggregated as-is.
        let mut agg = SymbolAggregator::new();
        agg.update(&tick("AAPL", 150.0, 100));
        agg.update(&tick("AAPL", -5.0, 100));

        let stats = agg.get("AAPL").unwrap();
        assert_eq!(stats.min_price, -5.0);
        assert_eq!(stats.last_price, -5.0);
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let mut agg = SymbolAggregator::new();
        for symbol in ["MSFT", "AAPL", "TSLA"] {
            agg.update(&tick(symbol, 1.0, 1));
        }
        let first: Vec<_> = agg.iter().map(|(s, _)| s.to_string()).collect();
        let second: Vec<_> = agg.iter().map(|(s, _)| s.to_string()).collect();
        assert_eq!(first, second);
    }
}
