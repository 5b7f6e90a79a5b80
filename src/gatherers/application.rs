//! # Application Gatherer
//!
//! Platform-independent gatherer for the installed-applications category.
//! Package enumeration itself is delegated to the platform layer; without
//! one wired in, the gatherer reports an empty application list with the
//! correct item shape and capture time.

use super::Gatherer;
use crate::constants::gatherer_names;
use crate::error::Result;
use crate::types::{GathererConfig, InventoryItem, StopType};
use async_trait::async_trait;
use tracing::debug;

/// Schema version of the application content payload.
pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Default)]
pub struct ApplicationGatherer;

impl ApplicationGatherer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Gatherer for ApplicationGatherer {
    fn name(&self) -> &str {
        gatherer_names::APPLICATION
    }

    async fn run(&self, _config: &GathererConfig) -> Result<Vec<InventoryItem>> {
        let item = InventoryItem {
            name: self.name().to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            content: collect_application_data(),
            capture_time: InventoryItem::capture_time_now(),
        };

        Ok(vec![item])
    }

    fn request_stop(&self, _stop_type: StopType) -> Result<()> {
        Ok(())
    }
}

fn collect_application_data() -> serde_json::Value {
    debug!("collecting application inventory data");
    serde_json::json!([])
}
