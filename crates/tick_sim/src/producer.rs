//! The producer loop.
//!
//! Single-threaded cooperative loop: generate one tick for a random symbol,
//! publish it keyed by symbol, sleep the configured interval, repeat until
//! shutdown is requested. Publish failures are logged per-tick and never
//! halt the loop.

use crate::simulator::PriceSimulator;
use adapter_broker::transport::{BrokerError, PublishSink};
use std::time::Duration;
use tick_core::shutdown::ShutdownFlag;
use tracing::{error, info, warn};

/// Cumulative outcome of one producer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerSummary {
    /// Ticks acknowledged by the broker
    pub published: u64,
    /// Ticks dropped on publish failure
    pub publish_failures: u64,
}

/// Run the publish loop until `shutdown` is triggered.
///
/// Each iteration publishes exactly one tick. Serialisation of our own
/// records cannot fail in practice, but a failure there is treated like
/// any other per-tick error. On exit the sink is flushed and closed;
/// cleanup failures are logged and shutdown proceeds regardless.
pub async fn run_producer<S: PublishSink>(
    simulator: &mut PriceSimulator,
    sink: &S,
    interval: Duration,
    shutdown: &ShutdownFlag,
) -> ProducerSummary {
    info!(interval_ms = interval.as_millis() as u64, "producer loop starting");
    let mut summary = ProducerSummary::default();

    while !shutdown.is_triggered() {
        let tick = simulator.next_tick();

        match tick.to_wire() {
            Ok(payload) => match sink.publish(&tick.symbol, payload).await {
                Ok(receipt) => {
                    summary.published += 1;
                    info!(
                        symbol = %tick.symbol,
                        price = tick.price,
                        volume = tick.volume,
                        partition = receipt.partition,
                        offset = receipt.offset,
                        message_count = summary.published,
                        "tick published"
                    );
                }
                Err(BrokerError::Timeout(t)) => {
                    summary.publish_failures += 1;
                    error!(symbol = %tick.symbol, timeout = ?t, "timeout publishing tick");
                }
                Err(e) => {
                    summary.publish_failures += 1;
                    error!(symbol = %tick.symbol, error = %e, "failed to publish tick");
                }
            },
            Err(e) => {
                summary.publish_failures += 1;
                error!(symbol = %tick.symbol, error = %e, "failed to serialise tick");
            }
        }

        tokio::time::sleep(interval).await;
    }

    if let Err(e) = sink.flush().await {
        warn!(error = %e, "failed to flush pending publishes");
    }
    if let Err(e) = sink.close().await {
        warn!(error = %e, "failed to close publish sink cleanly");
    }

    info!(
        total_published = summary.published,
        publish_failures = summary.publish_failures,
        "producer shutdown complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_broker::transport::{DeliveryReceipt, PublishSink};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use tick_core::universe::default_universe;

    /// Sink that records publishes and can fail every other call.
    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<(String, Vec<u8>)>>,
        calls: AtomicU64,
        fail_odd_calls: bool,
    }

    #[async_trait]
    impl PublishSink for RecordingSink {
        async fn publish(
            &self,
            key: &str,
            payload: Vec<u8>,
        ) -> Result<DeliveryReceipt, BrokerError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_odd_calls && call % 2 == 1 {
                return Err(BrokerError::transport("injected failure"));
            }
            self.published.lock().unwrap().push((key.to_string(), payload));
            Ok(DeliveryReceipt {
                partition: 0,
                offset: call as i64,
            })
        }

        async fn flush(&self) -> Result<(), BrokerError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), BrokerError> {
            Ok(())
        }
    }

    fn shutdown_after(flag: &ShutdownFlag, ticks: u64, sink: &RecordingSink) {
        // Helper for tests that stop the loop once enough calls went through.
        while sink.calls.load(Ordering::SeqCst) < ticks {
            std::thread::yield_now();
        }
        flag.trigger();
    }

    #[tokio::test]
    async fn test_producer_stops_on_shutdown() {
        let mut sim = PriceSimulator::with_seed(&default_universe(), 1);
        let sink = RecordingSink::default();
        let shutdown = ShutdownFlag::new();
        shutdown.trigger();

        let summary = run_producer(&mut sim, &sink, Duration::from_millis(1), &shutdown).await;
        assert_eq!(summary.published, 0);
        assert!(sink.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_producer_publishes_wire_records() {
        let mut sim = PriceSimulator::with_seed(&default_universe(), 2);
        let sink = std::sync::Arc::new(RecordingSink::default());
        let shutdown = ShutdownFlag::new();

        let stopper = {
            let flag = shutdown.clone();
            let sink = sink.clone();
            std::thread::spawn(move || shutdown_after(&flag, 3, &sink))
        };

        let summary = run_producer(&mut sim, sink.as_ref(), Duration::from_millis(1), &shutdown).await;
        stopper.join().unwrap();

        assert!(summary.published >= 3);
        for (key, payload) in sink.published.lock().unwrap().iter() {
            let record = tick_core::validate::validate(payload).unwrap();
            assert_eq!(&record.symbol, key, "publish key is the symbol");
        }
    }

    #[tokio::test]
    async fn test_publish_failures_do_not_halt_the_loop() {
        let mut sim = PriceSimulator::with_seed(&default_universe(), 3);
        let sink = std::sync::Arc::new(RecordingSink {
            fail_odd_calls: true,
            ..Default::default()
        });
        let shutdown = ShutdownFlag::new();

        let stopper = {
            let flag = shutdown.clone();
            let sink = sink.clone();
            std::thread::spawn(move || shutdown_after(&flag, 4, &sink))
        };

        let summary = run_producer(&mut sim, sink.as_ref(), Duration::from_millis(1), &shutdown).await;
        stopper.join().unwrap();

        assert!(summary.published >= 2);
        assert!(summary.publish_failures >= 1);
    }
}
