//! # Inventory Plugin Constants
//!
//! Operational boundaries and fixed identifiers for the inventory collection
//! core: the plugin name, gatherer category names, size ceilings placed on
//! collected data, and the fixed layout of the on-disk document store.

/// Name under which this plugin is registered with the agent framework.
pub const PLUGIN_NAME: &str = "host:softwareInventory";

/// Policy flag value that turns a gatherer category on.
pub const ENABLED: &str = "Enabled";

/// Policy flag value that turns a gatherer category off.
pub const DISABLED: &str = "Disabled";

/// Per-inventory-type ceiling on one item's serialized size, in KiB.
pub const SIZE_LIMIT_KB_PER_INVENTORY_TYPE: usize = 200;

/// Ceiling on the serialized size of the whole accumulated item list, in KiB.
pub const TOTAL_SIZE_LIMIT_KB: usize = 1024;

/// KiB to bytes conversion factor.
pub const BYTES_PER_KIB: usize = 1024;

/// Error threshold handed to the plugin's stop policy.
pub const ERROR_THRESHOLD: u32 = 10;

/// Default root of the agent's durable data store.
pub const DEFAULT_DATA_STORE_ROOT: &str = "/var/lib/host-agent";

/// Fixed subpath segments between the machine-identity directory and the
/// document-state records of in-flight invocations.
pub mod document_store {
    pub const DOCUMENT_ROOT_DIR: &str = "document";
    pub const STATE_DIR: &str = "state";
    pub const CURRENT_DIR: &str = "current";
}

/// Canonical gatherer names, one per inventory category.
pub mod gatherer_names {
    pub const APPLICATION: &str = "HOST:Application";
    pub const PLATFORM_COMPONENT: &str = "HOST:PlatformComponent";
    pub const NETWORK: &str = "HOST:Network";
    pub const FILE: &str = "HOST:File";
    pub const ROLE: &str = "HOST:Role";
    pub const SERVICE: &str = "HOST:Service";
    pub const REGISTRY_KEY: &str = "HOST:RegistryKey";
    pub const OS_UPDATE: &str = "HOST:OsUpdate";
    pub const INSTANCE_DETAILED_INFORMATION: &str = "HOST:InstanceDetailedInformation";
    pub const CUSTOM_INVENTORY: &str = "Custom:Inventory";
}

/// Human-readable result lines surfaced at the plugin boundary.
pub mod messages {
    pub const SUCCESS: &str =
        "Inventory policy has been successfully applied and collected inventory data has been uploaded";
    pub const NO_DATA: &str =
        "Inventory policy has been successfully applied but there is no inventory data to upload";
}
