//! In-process broker backed by bounded async channels.
//!
//! Implements the transport traits with at-least-once, key-partitioned
//! delivery semantics: each key hashes to a fixed partition, offsets are
//! monotonic per partition, and every subscriber created from the same
//! broker competes for records the way members of one consumer group do.
//! A networked broker client would implement the same two traits; nothing
//! above this crate can tell the difference.

use crate::transport::{
    BrokerError, DeliveredRecord, DeliveryReceipt, PublishSink, SubscribeSource,
};
use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const PARTITION_CAPACITY: usize = 1024;
const PUBLISH_ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Wait between empty sweeps while a poll timeout is still running.
const POLL_IDLE_SLEEP: Duration = Duration::from_millis(10);

struct Partition {
    tx: Sender<DeliveredRecord>,
    rx: Receiver<DeliveredRecord>,
    next_offset: AtomicI64,
}

/// In-process partitioned broker.
pub struct ChannelBroker {
    topic: String,
    partitions: Arc<Vec<Partition>>,
}

impl ChannelBroker {
    /// Open a broker for `topic` with `partition_count` partitions.
    ///
    /// The address list is not dialled (there is no network here) but an
    /// empty one is still rejected, mirroring a real client's handshake.
    pub fn open(
        addrs: &str,
        topic: impl Into<String>,
        partition_count: usize,
    ) -> Result<Self, BrokerError> {
        if addrs.trim().is_empty() {
            return Err(BrokerError::connection("empty broker address list"));
        }
        if partition_count == 0 {
            return Err(BrokerError::connection("topic needs at least one partition"));
        }

        let partitions = (0..partition_count)
            .map(|_| {
                let (tx, rx) = async_channel::bounded(PARTITION_CAPACITY);
                Partition {
                    tx,
                    rx,
                    next_offset: AtomicI64::new(0),
                }
            })
            .collect();

        let topic = topic.into();
        info!(topic = %topic, partitions = partition_count, "channel broker opened");
        Ok(Self {
            topic,
            partitions: Arc::new(partitions),
        })
    }

    /// Topic this broker carries.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Create a publish endpoint.
    pub fn sink(&self) -> ChannelSink {
        ChannelSink {
            partitions: self.partitions.clone(),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Join `group_id` and create a poll endpoint over every partition.
    ///
    /// Subscribers compete for records: each record is delivered to exactly
    /// one member of the group.
    pub fn subscribe(&self, group_id: &str) -> ChannelSource {
        debug!(topic = %self.topic, group_id, "subscriber joined");
        ChannelSource {
            receivers: self.partitions.iter().map(|p| p.rx.clone()).collect(),
        }
    }
}

/// Publish endpoint for a [`ChannelBroker`].
pub struct ChannelSink {
    partitions: Arc<Vec<Partition>>,
    closed: Arc<AtomicBool>,
}

fn partition_for(key: &str, partition_count: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() as usize) % partition_count
}

#[async_trait]
impl PublishSink for ChannelSink {
    async fn publish(&self, key: &str, payload: Vec<u8>) -> Result<DeliveryReceipt, BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }

        let idx = partition_for(key, self.partitions.len());
        let partition = &self.partitions[idx];
        let offset = partition.next_offset.fetch_add(1, Ordering::SeqCst);

        let record = DeliveredRecord {
            partition: idx as i32,
            offset,
            timestamp_ms: Some(Utc::now().timestamp_millis()),
            key: Some(key.to_string()),
            payload,
        };

        // Bounded acknowledgement wait: a full partition queue behaves like
        // a slow broker and eventually times the publish out.
        match tokio::time::timeout(PUBLISH_ACK_TIMEOUT, partition.tx.send(record)).await {
            Ok(Ok(())) => Ok(DeliveryReceipt {
                partition: idx as i32,
                offset,
            }),
            Ok(Err(_)) => Err(BrokerError::Closed),
            Err(_) => Err(BrokerError::Timeout(PUBLISH_ACK_TIMEOUT)),
        }
    }

    async fn flush(&self) -> Result<(), BrokerError> {
        // Publishes are acknowledged synchronously; nothing is buffered here.
        Ok(())
    }

    async fn close(&self) -> Result<(), BrokerError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Poll endpoint for a [`ChannelBroker`].
pub struct ChannelSource {
    receivers: Vec<Receiver<DeliveredRecord>>,
}

#[async_trait]
impl SubscribeSource for ChannelSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Vec<DeliveredRecord>, BrokerError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut batch = Vec::new();

        loop {
            for rx in &self.receivers {
                while let Ok(record) = rx.try_recv() {
                    batch.push(record);
                }
            }

            if !batch.is_empty() || tokio::time::Instant::now() >= deadline {
                return Ok(batch);
            }
            tokio::time::sleep(POLL_IDLE_SLEEP).await;
        }
    }

    async fn close(&mut self) -> Result<(), BrokerError> {
        self.receivers.clear();
        Ok(())
    }
}
