//! Time-windowed statistics snapshots.
//!
//! The reporter is a two-state machine: Idle until a full interval has
//! elapsed since the last emission, then one snapshot is emitted and the
//! window restarts. At most one snapshot per window. The final cumulative
//! report at shutdown bypasses the window check.

use crate::aggregator::SymbolAggregator;
use crate::display::format_thousands;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Stream-level counters, owned by the processor and mutated by exactly
/// one logical thread of control. Exposed read-only for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCounters {
    /// Valid records processed
    pub processed: u64,
    /// Records dropped (malformed or incomplete)
    pub errors: u64,
}

impl StreamCounters {
    /// Derived success rate in percent.
    pub fn success_rate(&self) -> f64 {
        (self.processed.saturating_sub(self.errors)) as f64 / self.processed.max(1) as f64 * 100.0
    }
}

/// Periodic snapshot emitter.
#[derive(Debug)]
pub struct StatsReporter {
    interval: Duration,
    last_report: Instant,
}

impl StatsReporter {
    /// Create a reporter whose first window starts now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: Instant::now(),
        }
    }

    /// Emit a snapshot if the current window has elapsed at `now`.
    ///
    /// On emission the window restarts from `now`.
    pub fn maybe_report(
        &mut self,
        now: Instant,
        counters: &StreamCounters,
        aggregator: &SymbolAggregator,
    ) -> Option<String> {
        let elapsed = now.duration_since(self.last_report);
        if elapsed < self.interval {
            return None;
        }
        self.last_report = now;
        Some(render_snapshot(
            &format!("CONSUMPTION STATISTICS (Last {:.1}s)", elapsed.as_secs_f64()),
            counters,
            aggregator,
        ))
    }

    /// When the current window started.
    pub fn last_report(&self) -> Instant {
        self.last_report
    }
}

/// Render the final cumulative report, regardless of the window.
pub fn final_report(counters: &StreamCounters, aggregator: &SymbolAggregator) -> String {
    render_snapshot("FINAL CONSUMPTION STATISTICS", counters, aggregator)
}

fn render_snapshot(
    title: &str,
    counters: &StreamCounters,
    aggregator: &SymbolAggregator,
) -> String {
    let rule = "=".repeat(80);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Messages: {}", counters.processed);
    let _ = writeln!(out, "Error Count: {}", counters.errors);
    let _ = writeln!(out, "Success Rate: {:.1}%", counters.success_rate());

    if aggregator.symbol_count() > 0 {
        let _ = writeln!(out, "\nSymbol Statistics:");
        let _ = writeln!(
            out,
            "{:<8} {:>7} {:>12} {:>12} {:>12} {:>12}",
            "Symbol", "Count", "Last Price", "Min Price", "Max Price", "Avg Volume"
        );
        for (symbol, stats) in aggregator.iter() {
            let _ = writeln!(
                out,
                "{:<8} {:>7} {:>12} {:>12} {:>12} {:>12}",
                symbol,
                stats.count,
                format!("${:.2}", stats.last_price),
                format!("${:.2}", stats.min_price),
                format!("${:.2}", stats.max_price),
                format_thousands(stats.avg_volume().round() as u64),
            );
        }
    }

    let _ = write!(out, "{rule}");
    out
}
