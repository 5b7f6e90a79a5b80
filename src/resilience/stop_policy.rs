//! # Stop Policy
//!
//! Error-threshold tracking with atomic state, in the shape of a circuit
//! breaker's failure counter. Tracks how many errors a component has
//! recorded and whether that count has crossed its configured threshold.
//!
//! The inventory plugin constructs one of these per instance. None of the
//! collection stages consult it yet; wiring it into the invocation guard or
//! the upload coordinator is a separate decision, and no retry or backoff
//! behavior is implied here.

use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

#[derive(Debug)]
pub struct StopPolicy {
    /// Component name for logging.
    name: String,

    /// Error count at which the component should be considered unhealthy.
    /// A threshold of zero disables the check.
    error_threshold: u32,

    /// Errors recorded since construction or the last reset.
    error_count: AtomicU32,
}

impl StopPolicy {
    pub fn new(name: impl Into<String>, error_threshold: u32) -> Self {
        Self {
            name: name.into(),
            error_threshold,
            error_count: AtomicU32::new(0),
        }
    }

    /// Record one error and return the updated count.
    pub fn record_error(&self) -> u32 {
        let count = self.error_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            component = %self.name,
            error_count = count,
            error_threshold = self.error_threshold,
            "Stop policy recorded an error"
        );
        count
    }

    /// Clear the recorded error count.
    pub fn reset(&self) {
        self.error_count.store(0, Ordering::SeqCst);
    }

    /// Whether the recorded error count is still under the threshold.
    pub fn is_healthy(&self) -> bool {
        self.error_threshold == 0 || self.error_count.load(Ordering::SeqCst) < self.error_threshold
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
