//! Cooperative shutdown flag.
//!
//! Both loops check this flag at well-defined boundaries (top of loop, top
//! of each record within a batch). The flag is set from a signal task; the
//! loops themselves never block on it, so in-flight work completes up to
//! the next check point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation token for the producer and consumer loops.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    triggered: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Create a flag in the "running" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    /// True once shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}
