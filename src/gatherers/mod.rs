//! # Inventory Gatherers
//!
//! The pluggable collector contract and the registry that holds collector
//! instances. A gatherer produces zero or more inventory items for one
//! category of host data; any concrete collector must satisfy [`Gatherer`]
//! to be registrable.
//!
//! Concrete OS-specific collectors live with the platform layers of the
//! agent; this crate ships only the platform-independent application
//! gatherer in [`application`].

pub mod application;
pub mod registry;

pub use registry::{GathererRegistry, LookupOutcome};

use crate::error::Result;
use crate::types::{GathererConfig, InventoryItem, StopType};
use async_trait::async_trait;

/// Operations every inventory gatherer supports.
#[async_trait]
pub trait Gatherer: Send + Sync + std::fmt::Debug {
    /// Unique name of the gatherer, e.g. `HOST:Application`.
    fn name(&self) -> &str;

    /// Run the gatherer with the given configuration. Returns an array of
    /// items because some gatherers collect multiple inventory types at a
    /// time.
    async fn run(&self, config: &GathererConfig) -> Result<Vec<InventoryItem>>;

    /// Ask a running gatherer to stop.
    fn request_stop(&self, stop_type: StopType) -> Result<()>;
}
