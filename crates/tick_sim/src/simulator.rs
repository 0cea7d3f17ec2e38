//! Per-symbol price/volume simulation.
//!
//! Each symbol evolves as a biased random walk: one standard normal draw
//! per tick, scaled by the symbol's volatility and drift coefficients.
//! Volume couples to the relative price move, so larger moves produce
//! proportionally larger simulated trade sizes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use thiserror::Error;
use tick_core::record::TickRecord;
use tick_core::universe::SymbolSpec;

/// Price floor. The walk never goes to zero or negative.
pub const PRICE_FLOOR: f64 = 0.01;

const BASE_VOLUME_RANGE: std::ops::RangeInclusive<u64> = 100..=2000;

/// Simulation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// Symbol not in the fixed universe. The universe never changes after
    /// startup, so hitting this is a programmer error.
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
}

/// Mutable per-symbol walk state.
#[derive(Debug, Clone)]
struct SymbolState {
    symbol: &'static str,
    /// Current price, carried forward tick-to-tick unrounded
    price: f64,
    volatility: f64,
    trend: f64,
}

/// Stochastic tick generator over a fixed symbol universe.
pub struct PriceSimulator {
    states: Vec<SymbolState>,
    normal: Normal<f64>,
    rng: StdRng,
}

impl PriceSimulator {
    /// Create a simulator seeded from OS entropy.
    pub fn new(universe: &[SymbolSpec]) -> Self {
        Self::with_rng(universe, StdRng::from_entropy())
    }

    /// Create a simulator with a fixed seed, for reproducible runs.
    pub fn with_seed(universe: &[SymbolSpec], seed: u64) -> Self {
        Self::with_rng(universe, StdRng::seed_from_u64(seed))
    }

    fn with_rng(universe: &[SymbolSpec], rng: StdRng) -> Self {
        let states = universe
            .iter()
            .map(|spec| SymbolState {
                symbol: spec.symbol,
                price: spec.initial_price,
                volatility: spec.volatility,
                trend: spec.trend,
            })
            .collect();

        Self {
            states,
            normal: Normal::new(0.0, 1.0).expect("unit normal is well-formed"),
            rng,
        }
    }

    /// Symbols this simulator tracks.
    pub fn symbols(&self) -> Vec<&'static str> {
        self.states.iter().map(|s| s.symbol).collect()
    }

    /// Current (unrounded) walk price for a symbol.
    pub fn current_price(&self, symbol: &str) -> Option<f64> {
        self.states
            .iter()
            .find(|s| s.symbol == symbol)
            .map(|s| s.price)
    }

    /// Generate one tick for `symbol`, advancing its walk state.
    pub fn generate(&mut self, symbol: &str) -> Result<TickRecord, SimError> {
        let idx = self
            .states
            .iter()
            .position(|s| s.symbol == symbol)
            .ok_or_else(|| SimError::UnknownSymbol(symbol.to_string()))?;
        Ok(self.generate_at(idx))
    }

    /// Generate one tick for a symbol picked uniformly at random.
    pub fn next_tick(&mut self) -> TickRecord {
        let idx = self.rng.gen_range(0..self.states.len());
        self.generate_at(idx)
    }

    fn generate_at(&mut self, idx: usize) -> TickRecord {
        let z: f64 = self.normal.sample(&mut self.rng);
        let state = &mut self.states[idx];

        // Drift component plus volatility-scaled diffusion.
        let price_change = state.trend * state.price + state.volatility * state.price * z;
        state.price = (state.price + price_change).max(PRICE_FLOOR);

        // Larger relative moves imply proportionally larger volume.
        let base_volume = self.rng.gen_range(BASE_VOLUME_RANGE);
        let volume_multiplier = 1.0 + (price_change / state.price).abs() * 10.0;
        let volume = (base_volume as f64 * volume_multiplier) as u64;

        TickRecord::new(state.symbol, round_2dp(state.price), volume)
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
