//! # Execution Pipeline
//!
//! Runs the validated gatherer selection sequentially and accumulates the
//! produced items under the configured size ceilings.
//!
//! Gatherers run strictly one after another; parallel execution hinges on
//! the plugin becoming long-running and is deliberately not implemented
//! here. The first gatherer error or ceiling breach aborts the whole batch
//! and discards everything collected so far - partial inventory data is
//! never surfaced.

use crate::config::InventoryConfig;
use crate::constants::BYTES_PER_KIB;
use crate::error::{InventoryError, Result};
use crate::types::InventoryItem;
use crate::validation::ConfiguredGatherers;
use std::time::Instant;
use tracing::{debug, info};

/// Serialized-size ceilings on collected data, in KiB.
#[derive(Debug, Clone, Copy)]
pub struct SizeLimits {
    pub per_item_kb: usize,
    pub total_kb: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            per_item_kb: crate::constants::SIZE_LIMIT_KB_PER_INVENTORY_TYPE,
            total_kb: crate::constants::TOTAL_SIZE_LIMIT_KB,
        }
    }
}

impl From<&InventoryConfig> for SizeLimits {
    fn from(config: &InventoryConfig) -> Self {
        Self {
            per_item_kb: config.per_item_size_limit_kb,
            total_kb: config.total_size_limit_kb,
        }
    }
}

/// Size-bounded sequential executor over a validated gatherer selection.
pub struct ExecutionPipeline {
    limits: SizeLimits,
}

impl ExecutionPipeline {
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    /// Run every selected gatherer and return the full accumulated item
    /// list, or the first failure with nothing collected.
    ///
    /// The aggregate ceiling is enforced against a running total of item
    /// sizes rather than by re-serializing the whole list per item; the
    /// observable abort behavior is the same.
    pub async fn run(&self, selected: ConfiguredGatherers) -> Result<Vec<InventoryItem>> {
        let mut items: Vec<InventoryItem> = Vec::new();
        let mut aggregate_bytes: usize = 0;

        for (gatherer, config) in selected {
            let name = gatherer.name().to_string();
            info!(gatherer = %name, "Invoking gatherer");
            let start = Instant::now();

            let produced = gatherer.run(&config).await.map_err(|err| {
                InventoryError::GathererFailed {
                    gatherer: name.clone(),
                    reason: err.to_string(),
                }
            })?;

            debug!(
                gatherer = %name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                produced = produced.len(),
                "Gatherer finished"
            );

            for item in produced {
                let item_bytes = serialized_size(&item)?;
                debug!(item = %item.name, size_bytes = item_bytes, "Collected inventory item");

                if item_bytes > self.limits.per_item_kb * BYTES_PER_KIB {
                    return Err(InventoryError::ItemTooLarge {
                        item: item.name,
                        size_bytes: item_bytes,
                        limit_bytes: self.limits.per_item_kb * BYTES_PER_KIB,
                    });
                }

                aggregate_bytes += item_bytes;
                if aggregate_bytes > self.limits.total_kb * BYTES_PER_KIB {
                    return Err(InventoryError::AggregateTooLarge {
                        size_bytes: aggregate_bytes,
                        limit_bytes: self.limits.total_kb * BYTES_PER_KIB,
                    });
                }

                items.push(item);
            }
        }

        Ok(items)
    }
}

fn serialized_size(item: &InventoryItem) -> Result<usize> {
    serde_json::to_vec(item)
        .map(|bytes| bytes.len())
        .map_err(|err| InventoryError::Serialization {
            reason: err.to_string(),
        })
}
