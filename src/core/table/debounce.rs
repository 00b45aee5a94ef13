//! Debounced unit-weight writes.
//!
//! Weight edits arrive per keystroke; each row coalesces them behind a
//! fixed delay before the persist call fires, and a new keystroke within
//! the window replaces the queued value and restarts that row's timer.
//! Rows debounce independently. Dropping the writer aborts every pending
//! timer so no stale write fires after the owning screen is torn down.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::warn;

use crate::core::error::ApiError;

/// Delay between the last keystroke and the persist call.
pub const WRITE_DELAY: Duration = Duration::from_millis(1000);

/// Destination of a debounced weight write, keyed by item code.
pub trait WeightSink: Send + Sync {
    fn write(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Per-row-key debounced writer with a depth-one queue: at any moment each
/// key has at most one scheduled write, holding the latest value.
pub struct DebouncedWriter<S> {
    sink: Arc<S>,
    delay: Duration,
    pending: HashMap<String, JoinHandle<()>>,
}

impl<S: WeightSink + 'static> DebouncedWriter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_delay(sink, WRITE_DELAY)
    }

    pub fn with_delay(sink: S, delay: Duration) -> Self {
        DebouncedWriter {
            sink: Arc::new(sink),
            delay,
            pending: HashMap::new(),
        }
    }

    /// Schedule a write for this key, replacing any write still waiting in
    /// its window. The latest value wins.
    pub fn submit(&mut self, key: &str, value: impl Into<String>) {
        if let Some(previous) = self.pending.remove(key) {
            previous.abort();
        }
        let sink = self.sink.clone();
        let owned_key = key.to_string();
        let value = value.into();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            if let Err(err) = sink.write(&owned_key, value).await {
                warn!(key = %owned_key, error = %err, "debounced weight write failed");
            }
        });
        self.pending.insert(key.to_string(), handle);
    }

    /// Number of keys with a write still scheduled or in flight.
    pub fn pending_count(&mut self) -> usize {
        self.pending.retain(|_, handle| !handle.is_finished());
        self.pending.len()
    }

    /// Abort every pending write. Called on screen teardown; also runs on
    /// drop.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl<S> Drop for DebouncedWriter<S> {
    fn drop(&mut self) {
        for handle in self.pending.values() {
            handle.abort();
        }
    }
}
