//! # Inventory Data Model
//!
//! Core data types shared across the collection pipeline: the inventory item
//! shape accepted by the remote service, per-gatherer run configuration, the
//! flat policy record, invocation metadata, and the plugin result surface.
//!
//! Wire-facing types carry `PascalCase` serde renames because the remote
//! service and the on-disk document store both use that field casing.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One gatherer's result: an opaque structured payload plus identity and
/// capture metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryItem {
    /// Inventory type name, e.g. `HOST:Application`.
    pub name: String,

    /// Schema version of the content payload.
    pub schema_version: String,

    /// Opaque structured payload produced by the gatherer.
    pub content: serde_json::Value,

    /// RFC3339 UTC timestamp; the remote side rejects anything else.
    pub capture_time: String,
}

impl InventoryItem {
    /// Current time formatted the way the remote service requires,
    /// e.g. `2016-07-30T18:15:37Z`.
    pub fn capture_time_now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Whether a gatherer category is switched on by the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionPolicy {
    Enabled,
    #[default]
    Disabled,
}

/// Normalized per-gatherer run parameters produced by input validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GathererConfig {
    pub collection: CollectionPolicy,

    /// Category-specific filter string for filter-driven gatherers.
    pub filters: Option<String>,

    /// Directory to read from, for the custom inventory gatherer.
    pub location: Option<String>,
}

impl GathererConfig {
    /// Config for a plain enabled category.
    pub fn enabled() -> Self {
        Self {
            collection: CollectionPolicy::Enabled,
            ..Self::default()
        }
    }

    /// Config for a filter-driven category. Filter gatherers are driven by
    /// the filter string rather than the enablement flag.
    pub fn with_filters(filters: impl Into<String>) -> Self {
        Self {
            filters: Some(filters.into()),
            ..Self::default()
        }
    }

    /// Config for the custom inventory category.
    pub fn with_location(location: impl Into<String>) -> Self {
        Self {
            collection: CollectionPolicy::Enabled,
            location: Some(location.into()),
            ..Self::default()
        }
    }
}

/// Flat declarative policy record, one string field per gatherer category.
///
/// Each value is either empty, an enablement flag (`Enabled` / `Disabled`),
/// or a category-specific filter/path string. Unknown fields in the caller's
/// properties map are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PolicyInput {
    pub applications: String,
    pub platform_components: String,
    pub network_config: String,
    pub files: String,
    pub roles: String,
    pub services: String,
    pub registry_keys: String,
    pub os_updates: String,
    pub instance_detailed_information: String,
    pub custom_inventory: String,
    pub custom_inventory_directory: String,
}

/// Invocation metadata supplied by the document-execution framework.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Bookkeeping identifier for this invocation. For association
    /// invocations the format is `AssociationID.RunID`.
    pub bookkeeping_file_name: String,

    /// Association IDs currently active against this host for this plugin.
    pub current_association_ids: Vec<String>,
}

impl InvocationContext {
    /// The association ID is the substring of the bookkeeping name before
    /// its first separator.
    pub fn association_id(&self) -> &str {
        self.bookkeeping_file_name
            .split('.')
            .next()
            .unwrap_or(self.bookkeeping_file_name.as_str())
    }
}

/// Persisted record describing how the current invocation was triggered,
/// read from the agent's durable document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentStateRecord {
    pub document_type: String,
}

impl DocumentStateRecord {
    /// Whether the invoking document is a scheduled association.
    pub fn is_association(&self) -> bool {
        self.document_type == "Association"
    }
}

/// The two payload shapes the remote upload accepts: a diff against a remote
/// baseline, and a self-contained full item list. Construction of both is
/// delegated to the external payload converter.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadPayload {
    OptimizedDelta(Vec<InventoryItem>),
    FullSnapshot(Vec<InventoryItem>),
}

impl UploadPayload {
    pub fn items(&self) -> &[InventoryItem] {
        match self {
            Self::OptimizedDelta(items) | Self::FullSnapshot(items) => items,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::OptimizedDelta(_) => "optimized_delta",
            Self::FullSnapshot(_) => "full_snapshot",
        }
    }
}

/// How a gatherer is asked to stop. Accepted by every gatherer; the core
/// currently never issues a stop mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopType {
    SoftStop,
    HardStop,
}

/// Terminal status of one plugin invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Failed,
}

/// Result surface of one invocation: exit code, status, and a small number
/// of human-readable message lines. No structured error payload crosses the
/// plugin boundary.
#[derive(Debug, Clone)]
pub struct PluginOutput {
    exit_code: i32,
    status: ResultStatus,
    info: Vec<String>,
    errors: Vec<String>,
}

impl PluginOutput {
    pub fn new() -> Self {
        Self {
            exit_code: 0,
            status: ResultStatus::Success,
            info: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn set_exit_code(&mut self, exit_code: i32) {
        self.exit_code = exit_code;
    }

    pub fn set_status(&mut self, status: ResultStatus) {
        self.status = status;
    }

    pub fn append_info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    pub fn append_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn stdout(&self) -> &[String] {
        &self.info
    }

    pub fn stderr(&self) -> &[String] {
        &self.errors
    }
}

impl Default for PluginOutput {
    fn default() -> Self {
        Self::new()
    }
}
