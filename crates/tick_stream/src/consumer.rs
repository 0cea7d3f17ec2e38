//! The consumer loop.
//!
//! Blocks on a bounded-timeout poll, processes every record from that poll
//! sequentially, gives the reporter a chance to emit, then polls again.
//! The shutdown flag is checked once per loop iteration and once per record
//! within a batch, so a batch can abort mid-iteration; records already
//! handed over before the flag is observed are processed.

use crate::aggregator::SymbolAggregator;
use crate::display::{TickRow, Trend};
use crate::reporter::{final_report, StatsReporter, StreamCounters};
use adapter_broker::transport::{DeliveredRecord, SubscribeSource};
use std::time::{Duration, Instant};
use tick_core::shutdown::ShutdownFlag;
use tick_core::validate::{validate, ValidationError};
use tracing::{error, info, warn};

/// Consumer-side state: counters, per-symbol statistics and the reporter.
///
/// Owned by the loop that runs it; nothing here is shared across threads.
pub struct TickProcessor {
    aggregator: SymbolAggregator,
    counters: StreamCounters,
    reporter: StatsReporter,
}

impl TickProcessor {
    /// Create a processor emitting statistics every `stats_interval`.
    pub fn new(stats_interval: Duration) -> Self {
        Self {
            aggregator: SymbolAggregator::new(),
            counters: StreamCounters::default(),
            reporter: StatsReporter::new(stats_interval),
        }
    }

    /// Process one delivered record end to end.
    ///
    /// Rejections are independent per-record decisions: the record is
    /// dropped, the error counter bumped, and processing continues.
    pub fn process_record(&mut self, record: &DeliveredRecord) {
        let tick = match validate(&record.payload) {
            Ok(tick) => tick,
            Err(ValidationError::MissingFields { missing, received }) => {
                self.counters.errors += 1;
                error!(
                    ?missing,
                    ?received,
                    partition = record.partition,
                    offset = record.offset,
                    "invalid record format, missing required fields"
                );
                return;
            }
            Err(ValidationError::Malformed(reason)) => {
                self.counters.errors += 1;
                error!(
                    reason = %reason,
                    partition = record.partition,
                    offset = record.offset,
                    "undecodable record payload"
                );
                return;
            }
        };

        // Trend must come from the pre-update last price; the aggregator
        // overwrites it below.
        let prior = self.aggregator.last_price(&tick.symbol);
        self.aggregator.update(&tick);
        let trend = Trend::from_prior(tick.price, prior);

        let row = TickRow::new(&tick, trend, record.timestamp_ms, record.locator());
        println!("{}", row.render());

        self.counters.processed += 1;
        info!(
            symbol = %tick.symbol,
            price = tick.price,
            volume = tick.volume,
            partition = record.partition,
            offset = record.offset,
            message_count = self.counters.processed,
            "tick processed"
        );
    }

    /// Process a poll batch, aborting if shutdown is requested mid-batch.
    ///
    /// Returns the number of records processed or rejected before the flag
    /// was observed.
    pub fn process_batch(&mut self, batch: &[DeliveredRecord], shutdown: &ShutdownFlag) -> usize {
        let mut handled = 0;
        for record in batch {
            if shutdown.is_triggered() {
                break;
            }
            self.process_record(record);
            handled += 1;
        }
        handled
    }

    /// Forward to the periodic reporter.
    pub fn maybe_report(&mut self, now: Instant) -> Option<String> {
        self.reporter
            .maybe_report(now, &self.counters, &self.aggregator)
    }

    /// Render the final cumulative statistics.
    pub fn final_report(&self) -> String {
        final_report(&self.counters, &self.aggregator)
    }

    /// Stream-level counters, read-only.
    pub fn counters(&self) -> StreamCounters {
        self.counters
    }

    /// Per-symbol statistics, read-only.
    pub fn aggregator(&self) -> &SymbolAggregator {
        &self.aggregator
    }
}

/// Run the poll/process loop until `shutdown` is triggered.
///
/// Poll errors are transient from this loop's point of view: logged, then
/// the next poll attempt is made. On exit the source is closed (cleanup
/// failure logged, shutdown proceeds) and the final report is printed.
pub async fn run_consumer<S: SubscribeSource>(
    source: &mut S,
    processor: &mut TickProcessor,
    poll_timeout: Duration,
    shutdown: &ShutdownFlag,
) {
    info!(poll_timeout_ms = poll_timeout.as_millis() as u64, "consumer loop starting");

    while !shutdown.is_triggered() {
        match source.poll(poll_timeout).await {
            Ok(batch) => {
                processor.process_batch(&batch, shutdown);
            }
            Err(e) => {
                warn!(error = %e, "poll failed, continuing");
                continue;
            }
        }

        if let Some(report) = processor.maybe_report(Instant::now()) {
            println!("\n{report}\n");
        }
    }

    if let Err(e) = source.close().await {
        warn!(error = %e, "failed to close subscribe source cleanly");
    }

    println!("\n{}\n", processor.final_report());
    info!(
        total_messages_processed = processor.counters().processed,
        total_errors = processor.counters().errors,
        "consumer shutdown complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tick_core::record::TickRecord;

    fn delivered(payload: &[u8], offset: i64) -> DeliveredRecord {
        DeliveredRecord {
            partition: 0,
            offset,
            timestamp_ms: Some(1_705_311_000_000),
            key: None,
            payload: payload.to_vec(),
        }
    }

    fn wire(symbol: &str, price: f64, volume: u64) -> Vec<u8> {
        TickRecord::new(symbol, price, volume).to_wire().unwrap()
    }

    #[test]
    fn test_valid_record_updates_stats_and_counters() {
        let mut processor = TickProcessor::new(Duration::from_secs(30));
        processor.process_record(&delivered(&wire("AAPL", 150.0, 500), 0));

        assert_eq!(processor.counters().processed, 1);
        assert_eq!(processor.counters().errors, 0);
        assert_eq!(processor.aggregator().get("AAPL").unwrap().count, 1);
    }

    #[test]
    fn test_malformed_record_counted_and_skipped() {
        let mut processor = TickProcessor::new(Duration::from_secs(30));
        processor.process_record(&delivered(b"{\"symbol\":\"AAPL\"}", 0));
        processor.process_record(&delivered(b"garbage", 1));
        processor.process_record(&delivered(&wire("AAPL", 150.0, 500), 2));

        assert_eq!(processor.counters().errors, 2);
        assert_eq!(processor.counters().processed, 1);
    }

    #[test]
    fn test_batch_aborts_at_shutdown_observation() {
        let mut processor = TickProcessor::new(Duration::from_secs(30));
        let shutdown = ShutdownFlag::new();
        shutdown.trigger();

        let batch = vec![
            delivered(&wire("AAPL", 150.0, 500), 0),
            delivered(&wire("AAPL", 151.0, 600), 1),
        ];
        let handled = processor.process_batch(&batch, &shutdown);

        assert_eq!(handled, 0);
        assert_eq!(processor.counters().processed, 0);
    }

    #[test]
    fn test_batch_processes_all_when_running() {
        let mut processor = TickProcessor::new(Duration::from_secs(30));
        let shutdown = ShutdownFlag::new();

        let batch = vec![
            delivered(&wire("AAPL", 150.0, 500), 0),
            delivered(&wire("TSLA", 250.0, 300), 1),
        ];
        let handled = processor.process_batch(&batch, &shutdown);

        assert_eq!(handled, 2);
        assert_eq!(processor.counters().processed, 2);
    }

    #[test]
    fn test_trend_uses_pre_update_last_price() {
        // Indirect check through the aggregator: after two ticks the stats
        // hold the newest price while the trend for the second tick was
        // derived from the first. Exercised directly in display tests; here
        // we confirm the ordering does not corrupt the stats.
        let mut processor = TickProcessor::new(Duration::from_secs(30));
        processor.process_record(&delivered(&wire("AAPL", 150.0, 500), 0));
        processor.process_record(&delivered(&wire("AAPL", 151.0, 600), 1));

        let stats = processor.aggregator().get("AAPL").unwrap();
        assert_eq!(stats.last_price, 151.0);
        assert_eq!(stats.count, 2);
    }
}
