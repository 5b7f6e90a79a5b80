//! # Gatherer Registry
//!
//! Immutable name-to-instance mapping over the gatherer set, partitioned
//! into platform-supported and platform-installed instances. Built once at
//! plugin construction; read-only afterwards, so it is safe to share across
//! concurrent invocations without locking.

use super::application::ApplicationGatherer;
use super::Gatherer;
use crate::error::{InventoryError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a capability lookup against the registry.
#[derive(Debug)]
pub enum LookupOutcome {
    /// The gatherer is supported on this platform and may run.
    Runnable(Arc<dyn Gatherer>),

    /// The gatherer is installed but cannot run on this platform; the
    /// caller skips it silently.
    NotSupported,
}

/// Registry of gatherer instances keyed by unique name.
pub struct GathererRegistry {
    /// Gatherers that can run on the current OS.
    supported: HashMap<String, Arc<dyn Gatherer>>,

    /// Gatherers registered regardless of OS.
    installed: HashMap<String, Arc<dyn Gatherer>>,
}

impl GathererRegistry {
    /// Build a registry from explicit supported and installed sets.
    /// Gatherer names must be unique within each set.
    pub fn new(
        supported: Vec<Arc<dyn Gatherer>>,
        installed: Vec<Arc<dyn Gatherer>>,
    ) -> Result<Self> {
        Ok(Self {
            supported: Self::index_by_name(supported)?,
            installed: Self::index_by_name(installed)?,
        })
    }

    /// Build the registry of gatherers shipped with this crate.
    pub fn builtin() -> Self {
        info!("Loading available inventory gatherers");

        let application: Arc<dyn Gatherer> = Arc::new(ApplicationGatherer::new());

        let mut supported: HashMap<String, Arc<dyn Gatherer>> = HashMap::new();
        let mut installed: HashMap<String, Arc<dyn Gatherer>> = HashMap::new();

        supported.insert(application.name().to_string(), Arc::clone(&application));
        installed.insert(application.name().to_string(), application);

        info!(
            gatherers = ?supported.keys().collect::<Vec<_>>(),
            "Supported inventory gatherers loaded"
        );

        Self {
            supported,
            installed,
        }
    }

    /// Look up a gatherer by name.
    ///
    /// Unknown to both sets is an error; installed but unsupported on this
    /// platform is reported without error so the caller can skip it.
    pub fn lookup(&self, name: &str) -> Result<LookupOutcome> {
        if let Some(gatherer) = self.supported.get(name) {
            debug!(gatherer = %name, "gatherer is supported on this platform");
            Ok(LookupOutcome::Runnable(Arc::clone(gatherer)))
        } else if self.installed.contains_key(name) {
            info!(
                gatherer = %name,
                "gatherer is installed but not supported on this platform"
            );
            Ok(LookupOutcome::NotSupported)
        } else {
            Err(InventoryError::unrecognized_gatherer(name))
        }
    }

    /// Names of all gatherers runnable on this platform.
    pub fn supported_names(&self) -> Vec<&str> {
        self.supported.keys().map(String::as_str).collect()
    }

    fn index_by_name(
        gatherers: Vec<Arc<dyn Gatherer>>,
    ) -> Result<HashMap<String, Arc<dyn Gatherer>>> {
        let mut map: HashMap<String, Arc<dyn Gatherer>> = HashMap::new();

        for gatherer in gatherers {
            let name = gatherer.name().to_string();
            if map.insert(name.clone(), gatherer).is_some() {
                return Err(InventoryError::configuration(format!(
                    "duplicate gatherer registration for {name}"
                )));
            }
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GathererConfig, InventoryItem, StopType};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FakeGatherer {
        name: &'static str,
    }

    #[async_trait]
    impl Gatherer for FakeGatherer {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, _config: &GathererConfig) -> Result<Vec<InventoryItem>> {
            Ok(vec![])
        }

        fn request_stop(&self, _stop_type: StopType) -> Result<()> {
            Ok(())
        }
    }

    fn fake(name: &'static str) -> Arc<dyn Gatherer> {
        Arc::new(FakeGatherer { name })
    }

    #[test]
    fn supported_gatherer_is_runnable() {
        let registry =
            GathererRegistry::new(vec![fake("HOST:Application")], vec![fake("HOST:Application")])
                .unwrap();

        match registry.lookup("HOST:Application").unwrap() {
            LookupOutcome::Runnable(g) => assert_eq!(g.name(), "HOST:Application"),
            LookupOutcome::NotSupported => panic!("expected runnable"),
        }
    }

    #[test]
    fn installed_but_unsupported_is_skippable_without_error() {
        let registry = GathererRegistry::new(vec![], vec![fake("HOST:RegistryKey")]).unwrap();

        match registry.lookup("HOST:RegistryKey").unwrap() {
            LookupOutcome::NotSupported => {}
            LookupOutcome::Runnable(_) => panic!("expected not supported"),
        }
    }

    #[test]
    fn unknown_gatherer_is_an_error() {
        let registry = GathererRegistry::new(vec![], vec![]).unwrap();

        let err = registry.lookup("HOST:Nonexistent").unwrap_err();
        assert!(matches!(
            err,
            InventoryError::UnrecognizedGatherer { ref name } if name == "HOST:Nonexistent"
        ));
    }

    #[test]
    fn duplicate_names_are_rejected_at_construction() {
        let result = GathererRegistry::new(
            vec![fake("HOST:Application"), fake("HOST:Application")],
            vec![],
        );
        assert!(matches!(
            result,
            Err(InventoryError::Configuration { .. })
        ));
    }

    #[test]
    fn builtin_registry_supports_application_gatherer() {
        let registry = GathererRegistry::builtin();
        assert!(registry
            .supported_names()
            .contains(&crate::constants::gatherer_names::APPLICATION));
    }
}
