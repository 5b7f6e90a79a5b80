//! # Structured Logging Module
//!
//! Environment-aware structured logging for the inventory core, built on
//! `tracing-subscriber`. Initialization is idempotent so the hosting agent
//! process can install its own subscriber first.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with an env-controlled filter.
///
/// The filter comes from `INVENTORY_LOG` (falling back to `RUST_LOG`, then
/// `info`). If a global subscriber is already installed this is a no-op.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let log_level = std::env::var("INVENTORY_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(EnvFilter::new(log_level)),
        );

        if subscriber.try_init().is_err() {
            // The hosting agent already installed a global subscriber.
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }
    });
}
