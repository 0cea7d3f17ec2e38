//! Pipeline orchestration.
//!
//! Wires the producer and consumer loops through the broker seam. The two
//! loops run as independent tasks with no direct communication: everything
//! they exchange goes through the publish sink and the subscribe source.
//! Both watch the same shutdown flag, set from the signal task.

use crate::config::StreamConfig;
use crate::error::ServiceError;
use adapter_broker::channel_broker::ChannelBroker;
use adapter_broker::retry::{connect_with_retry, RetryPolicy};
use adapter_broker::transport::PublishSink;
use std::time::Duration;
use tick_core::shutdown::ShutdownFlag;
use tick_core::universe::default_universe;
use tick_sim::producer::run_producer;
use tick_sim::simulator::PriceSimulator;
use tick_stream::consumer::{run_consumer, TickProcessor};
use tracing::info;

const TOPIC_PARTITIONS: usize = 3;
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Outcome of a completed pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Ticks acknowledged by the broker
    pub published: u64,
    /// Valid ticks processed by the consumer
    pub processed: u64,
    /// Records the consumer rejected
    pub errors: u64,
}

/// Run the full pipeline until `shutdown` is triggered.
///
/// Connecting to the broker is the only retried step; exhausting the retry
/// ceiling or an invalid configuration is fatal and propagates to the exit
/// code. Once the loops are running, their errors are per-iteration and
/// handled inside the loops.
pub async fn run_pipeline(
    config: &StreamConfig,
    shutdown: ShutdownFlag,
) -> Result<RunSummary, ServiceError> {
    info!(
        broker_addrs = %config.broker_addrs,
        topic = %config.topic,
        group_id = %config.group_id,
        producer_interval_ms = config.producer_interval.as_millis() as u64,
        stats_interval_s = config.stats_interval.as_secs(),
        "configuration loaded"
    );

    let broker = connect_with_retry(
        |_| async {
            ChannelBroker::open(&config.broker_addrs, config.topic.clone(), TOPIC_PARTITIONS)
        },
        RetryPolicy::default(),
    )
    .await?;

    let sink = broker.sink();
    let mut source = broker.subscribe(&config.group_id);

    let producer_shutdown = shutdown.clone();
    let producer_interval = config.producer_interval;
    let producer = tokio::spawn(async move {
        let mut simulator = PriceSimulator::new(&default_universe());
        run_producer(&mut simulator, &sink, producer_interval, &producer_shutdown).await
    });

    let consumer_shutdown = shutdown.clone();
    let stats_interval = config.stats_interval;
    let consumer = tokio::spawn(async move {
        let mut processor = TickProcessor::new(stats_interval);
        run_consumer(&mut source, &mut processor, POLL_TIMEOUT, &consumer_shutdown).await;
        processor
    });

    let producer_summary = producer
        .await
        .map_err(|e| ServiceError::task(format!("producer task: {e}")))?;
    let processor = consumer
        .await
        .map_err(|e| ServiceError::task(format!("consumer task: {e}")))?;

    let counters = processor.counters();
    Ok(RunSummary {
        published: producer_summary.published,
        processed: counters.processed,
        errors: counters.errors,
    })
}

/// Generate `count` ticks straight to stdout as JSON lines.
///
/// Smoke-test path: exercises the simulator and the wire format without a
/// broker in the way.
pub fn run_generate(count: u64, seed: Option<u64>) -> Result<(), ServiceError> {
    let universe = default_universe();
    let mut simulator = match seed {
        Some(seed) => PriceSimulator::with_seed(&universe, seed),
        None => PriceSimulator::new(&universe),
    };

    for _ in 0..count {
        let tick = simulator.next_tick();
        let line = serde_json::to_string(&tick)?;
        println!("{line}");
    }
    Ok(())
}

/// Print the configured symbol universe.
pub fn run_symbols() {
    println!("{:<8} {:>14} {:>12} {:>10}", "Symbol", "Initial Price", "Volatility", "Trend");
    for spec in default_universe() {
        println!(
            "{:<8} {:>14} {:>12} {:>10}",
            spec.symbol,
            format!("${:.2}", spec.initial_price),
            format!("{:.3}", spec.volatility),
            format!("{:+.4}", spec.trend),
        );
    }
}

/// Drive the sink directly, bypassing the simulator. Test hook used by the
/// integration suite to feed known prices through the pipeline.
pub async fn publish_ticks<S: PublishSink>(
    sink: &S,
    ticks: &[tick_core::record::TickRecord],
) -> Result<(), ServiceError> {
    for tick in ticks {
        let payload = tick.to_wire()?;
        sink.publish(&tick.symbol, payload).await?;
    }
    Ok(())
}
