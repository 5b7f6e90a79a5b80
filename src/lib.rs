//! # Inventory Core
//!
//! Orchestration core of the fleet-inventory-collection subsystem inside the
//! host-management agent. It selects which pluggable data collectors
//! ("gatherers") run on a managed host, enforces a size budget on what they
//! produce, and drives a two-tier upload protocol to the central inventory
//! service.
//!
//! ## Control flow
//!
//! One invocation runs strictly in sequence: invocation guard, policy-input
//! validation, gatherer execution, upload. Each stage either proceeds to
//! the next or terminates the invocation with a single reported failure;
//! no stage produces partial externally-visible output.
//!
//! ## Module Organization
//!
//! - [`types`] - Inventory item model, policy record, and result surface
//! - [`gatherers`] - Collector contract and the gatherer registry
//! - [`validation`] - Policy record to gatherer-selection mapping
//! - [`pipeline`] - Size-bounded sequential gatherer execution
//! - [`upload`] - Optimized/fallback upload coordination
//! - [`guard`] - Association-only and single-association preconditions
//! - [`plugin`] - End-to-end invocation orchestration
//! - [`resilience`] - Stop-policy scaffolding
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inventory_core::config::InventoryConfig;
//! use inventory_core::gatherers::GathererRegistry;
//! use std::sync::Arc;
//!
//! let config = InventoryConfig::from_env().expect("invalid configuration");
//! let registry = Arc::new(GathererRegistry::builtin());
//! println!(
//!     "inventory core ready with gatherers: {:?}",
//!     registry.supported_names()
//! );
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod gatherers;
pub mod guard;
pub mod logging;
pub mod pipeline;
pub mod plugin;
pub mod resilience;
pub mod types;
pub mod upload;
pub mod validation;

pub use config::InventoryConfig;
pub use error::{InventoryError, Result, UploadErrorKind};
pub use gatherers::{Gatherer, GathererRegistry, LookupOutcome};
pub use plugin::InventoryPlugin;
pub use types::{
    CollectionPolicy, GathererConfig, InvocationContext, InventoryItem, PluginOutput, PolicyInput,
    ResultStatus, StopType, UploadPayload,
};
pub use upload::{InventoryClient, PayloadConverter, UploadCoordinator, UploadFailure};
