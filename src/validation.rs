//! # Inventory Input Validation
//!
//! Maps the flat declarative policy record into the set of gatherers to run
//! with their normalized configurations, consulting the registry for
//! capability.
//!
//! If a named gatherer is installed but not supported by the current
//! platform it is skipped silently. If it is not installed at all, the whole
//! validation aborts and nothing is returned - partial inventory data is
//! never collected for one inventory policy.
//!
//! The order in which categories are processed is an implementation detail:
//! callers must treat the selection as unordered and must not rely on which
//! invalid name surfaces first.

use crate::constants::{gatherer_names, ENABLED};
use crate::error::Result;
use crate::gatherers::{Gatherer, GathererRegistry, LookupOutcome};
use crate::types::{GathererConfig, PolicyInput};
use std::sync::Arc;
use tracing::{debug, error};

/// Validated selection: each runnable gatherer paired with its normalized
/// run configuration.
pub type ConfiguredGatherers = Vec<(Arc<dyn Gatherer>, GathererConfig)>;

/// Validates a policy record against the gatherer registry.
pub struct InputValidator<'a> {
    registry: &'a GathererRegistry,
}

impl<'a> InputValidator<'a> {
    pub fn new(registry: &'a GathererRegistry) -> Self {
        Self { registry }
    }

    /// Validate the whole policy record. Returns the configured gatherer
    /// set, or the first validation error with no partial result.
    pub fn validate(&self, input: &PolicyInput) -> Result<ConfiguredGatherers> {
        debug!(input = ?input, "Validating gatherers from inventory input");

        let mut configured: ConfiguredGatherers = Vec::new();

        let flag_categories = [
            (gatherer_names::APPLICATION, input.applications.as_str()),
            (
                gatherer_names::PLATFORM_COMPONENT,
                input.platform_components.as_str(),
            ),
            (gatherer_names::ROLE, input.roles.as_str()),
            (gatherer_names::SERVICE, input.services.as_str()),
            (gatherer_names::NETWORK, input.network_config.as_str()),
            (gatherer_names::OS_UPDATE, input.os_updates.as_str()),
            (
                gatherer_names::INSTANCE_DETAILED_INFORMATION,
                input.instance_detailed_information.as_str(),
            ),
        ];

        for (name, flag) in flag_categories {
            if let Some(pair) = self.validate_flag_category(name, flag)? {
                configured.push(pair);
            }
        }

        let filter_categories = [
            (gatherer_names::FILE, input.files.as_str()),
            (gatherer_names::REGISTRY_KEY, input.registry_keys.as_str()),
        ];

        for (name, filters) in filter_categories {
            if let Some(pair) = self.validate_filter_category(name, filters)? {
                configured.push(pair);
            }
        }

        if let Some(pair) =
            self.validate_custom_category(&input.custom_inventory, &input.custom_inventory_directory)?
        {
            configured.push(pair);
        }

        Ok(configured)
    }

    /// A single-flag category participates only when its flag is `Enabled`.
    fn validate_flag_category(
        &self,
        name: &str,
        flag: &str,
    ) -> Result<Option<(Arc<dyn Gatherer>, GathererConfig)>> {
        if flag != ENABLED {
            return Ok(None);
        }

        match self.lookup(name)? {
            LookupOutcome::Runnable(gatherer) => Ok(Some((gatherer, GathererConfig::enabled()))),
            LookupOutcome::NotSupported => Ok(None),
        }
    }

    /// A filter-driven category participates whenever its filter string is
    /// non-empty.
    fn validate_filter_category(
        &self,
        name: &str,
        filters: &str,
    ) -> Result<Option<(Arc<dyn Gatherer>, GathererConfig)>> {
        if filters.is_empty() {
            return Ok(None);
        }

        match self.lookup(name)? {
            LookupOutcome::Runnable(gatherer) => {
                Ok(Some((gatherer, GathererConfig::with_filters(filters))))
            }
            LookupOutcome::NotSupported => Ok(None),
        }
    }

    /// The custom category participates when enabled, carrying the
    /// directory to read custom inventory documents from.
    fn validate_custom_category(
        &self,
        flag: &str,
        location: &str,
    ) -> Result<Option<(Arc<dyn Gatherer>, GathererConfig)>> {
        if flag != ENABLED {
            return Ok(None);
        }

        match self.lookup(gatherer_names::CUSTOM_INVENTORY)? {
            LookupOutcome::Runnable(gatherer) => {
                Ok(Some((gatherer, GathererConfig::with_location(location))))
            }
            LookupOutcome::NotSupported => Ok(None),
        }
    }

    fn lookup(&self, name: &str) -> Result<LookupOutcome> {
        self.registry.lookup(name).map_err(|err| {
            error!(gatherer = %name, error = %err, "Error while validating gatherer");
            err
        })
    }
}
