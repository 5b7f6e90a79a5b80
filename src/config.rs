//! # Inventory Core Configuration
//!
//! Environment-overridable configuration for the collection core: size
//! ceilings on collected data and the location of the agent's durable
//! document store.

use crate::constants;
use crate::error::{InventoryError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Root of the agent's durable data store. Document-state records live
    /// under `<root>/<machine-id>/document/state/current/`.
    pub data_store_root: PathBuf,

    /// Per-inventory-type ceiling on one item's serialized size, in KiB.
    pub per_item_size_limit_kb: usize,

    /// Ceiling on the serialized size of the accumulated item list, in KiB.
    pub total_size_limit_kb: usize,

    /// Error threshold handed to the plugin's stop policy.
    pub stop_policy_error_threshold: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_store_root: PathBuf::from(constants::DEFAULT_DATA_STORE_ROOT),
            per_item_size_limit_kb: constants::SIZE_LIMIT_KB_PER_INVENTORY_TYPE,
            total_size_limit_kb: constants::TOTAL_SIZE_LIMIT_KB,
            stop_policy_error_threshold: constants::ERROR_THRESHOLD,
        }
    }
}

impl InventoryConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("INVENTORY_DATA_STORE_ROOT") {
            config.data_store_root = PathBuf::from(root);
        }

        if let Ok(limit) = std::env::var("INVENTORY_PER_ITEM_SIZE_LIMIT_KB") {
            config.per_item_size_limit_kb = limit.parse().map_err(|e| {
                InventoryError::configuration(format!("Invalid per_item_size_limit_kb: {e}"))
            })?;
        }

        if let Ok(limit) = std::env::var("INVENTORY_TOTAL_SIZE_LIMIT_KB") {
            config.total_size_limit_kb = limit.parse().map_err(|e| {
                InventoryError::configuration(format!("Invalid total_size_limit_kb: {e}"))
            })?;
        }

        if let Ok(threshold) = std::env::var("INVENTORY_STOP_POLICY_ERROR_THRESHOLD") {
            config.stop_policy_error_threshold = threshold.parse().map_err(|e| {
                InventoryError::configuration(format!("Invalid stop_policy_error_threshold: {e}"))
            })?;
        }

        Ok(config)
    }
}
