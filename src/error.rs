//! # Inventory Error Types
//!
//! Structured error handling for the inventory core using thiserror
//! for typed failure variants instead of `Box<dyn Error>` patterns.
//!
//! Every variant here is terminal for the invocation that produced it. The only
//! re-attempt anywhere in the crate is the upload coordinator's single
//! full-snapshot fallback, and that is gated purely on [`UploadErrorKind`].

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Classification code surfaced by the remote inventory service when it
/// rejects an upload.
///
/// The remote reports the exception name of the rejection; only two of those
/// names mean "the optimized delta assumed a stale or invalid baseline" and
/// therefore warrant one full-snapshot re-send. Everything else is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadErrorKind {
    /// Remote baseline does not match what the delta assumed.
    ContentMismatch,
    /// Remote considers the delta content invalid against its baseline.
    InvalidContent,
    /// Any other rejection, including transport and auth failures.
    Other(String),
}

impl UploadErrorKind {
    /// Map the remote's exception name onto a classification.
    pub fn classify(code: &str) -> Self {
        match code {
            "ItemContentMismatchException" => Self::ContentMismatch,
            "InvalidItemContentException" => Self::InvalidContent,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this rejection warrants the one-time full-snapshot fallback.
    pub fn warrants_full_snapshot(&self) -> bool {
        matches!(self, Self::ContentMismatch | Self::InvalidContent)
    }
}

impl std::fmt::Display for UploadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentMismatch => write!(f, "ItemContentMismatchException"),
            Self::InvalidContent => write!(f, "InvalidItemContentException"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

/// Inventory core error taxonomy.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A policy named a gatherer that is neither supported nor installed.
    #[error("Unrecognized inventory gatherer - {name}")]
    UnrecognizedGatherer { name: String },

    /// The caller-supplied policy record could not be interpreted.
    #[error("Unrecognized input for inventory plugin: {reason}")]
    InvalidPolicyInput { reason: String },

    /// The plugin was invoked outside a scheduled association.
    #[error("{plugin} can only be invoked via a scheduled association")]
    NotAnAssociationInvocation { plugin: String },

    /// The plugin could not determine how it was invoked. Distinct from
    /// [`InventoryError::NotAnAssociationInvocation`]: here nothing is known
    /// either way.
    #[error("Unable to detect how the inventory plugin was invoked: {reason}")]
    InvocationContextUndetermined { reason: String },

    /// More than one inventory association is active on this host.
    #[error("Multiple inventory configurations are associated to this host. You can't associate multiple inventory configurations to a host. The association IDs are: {current} and {conflicting}")]
    MultipleAssociationsPresent { current: String, conflicting: String },

    /// A gatherer returned an error; the whole batch is discarded.
    #[error("Encountered error while executing gatherer {gatherer}: {reason}")]
    GathererFailed { gatherer: String, reason: String },

    /// One item's serialized size breached the per-type ceiling.
    #[error("Size limit exceeded for collected inventory data: item {item} is {size_bytes} bytes, limit is {limit_bytes} bytes per inventory type")]
    ItemTooLarge {
        item: String,
        size_bytes: usize,
        limit_bytes: usize,
    },

    /// The accumulated item list breached the total ceiling.
    #[error("Size limit exceeded for collected inventory data: aggregate is {size_bytes} bytes, limit is {limit_bytes} bytes")]
    AggregateTooLarge { size_bytes: usize, limit_bytes: usize },

    /// The payload converter failed; no upload is attempted.
    #[error("Unable to construct inventory upload payloads: {reason}")]
    ConversionFailed { reason: String },

    /// The remote inventory service rejected the upload.
    #[error("Unable to upload inventory data ({kind}): {message}")]
    UploadRejected {
        kind: UploadErrorKind,
        message: String,
    },

    /// An inventory item could not be serialized for size accounting or upload.
    #[error("Unable to serialize inventory data: {reason}")]
    Serialization { reason: String },

    /// Invalid crate configuration.
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// The host's machine identity could not be resolved.
    #[error("Unable to detect machine ID: {reason} - this will hamper execution of the inventory plugin")]
    MachineIdUnavailable { reason: String },
}

impl InventoryError {
    /// Create an unrecognized-gatherer error.
    pub fn unrecognized_gatherer(name: impl Into<String>) -> Self {
        Self::UnrecognizedGatherer { name: name.into() }
    }

    /// Create an invalid-policy-input error.
    pub fn invalid_policy_input(reason: impl Into<String>) -> Self {
        Self::InvalidPolicyInput {
            reason: reason.into(),
        }
    }

    /// Create an invocation-context-undetermined error.
    pub fn context_undetermined(reason: impl Into<String>) -> Self {
        Self::InvocationContextUndetermined {
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
