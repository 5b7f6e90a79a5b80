//! # Invocation Guard
//!
//! Enforces the two invocation preconditions before any gatherer runs:
//! the plugin may execute only as part of a scheduled association, and at
//! most one inventory association may be active against a host at a time.
//!
//! Association detection reads the document-state record that the
//! document-execution framework persists for the in-flight invocation,
//! located under the agent's data store keyed by machine identity and the
//! invocation's bookkeeping filename.

use crate::config::InventoryConfig;
use crate::constants::{document_store, PLUGIN_NAME};
use crate::error::{InventoryError, Result};
use crate::types::{DocumentStateRecord, InvocationContext};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Injected machine-identity lookup, swappable for tests.
pub type MachineIdProvider = Box<dyn Fn() -> Result<String> + Send + Sync>;

/// Machine-identity provider backed by the host's machine-id file.
pub fn system_machine_id() -> Result<String> {
    fs::read_to_string("/etc/machine-id")
        .map(|id| id.trim().to_string())
        .map_err(|err| InventoryError::MachineIdUnavailable {
            reason: err.to_string(),
        })
}

/// Precondition guard for one plugin instance.
pub struct InvocationGuard {
    data_store_root: PathBuf,
    machine_id: String,
}

impl InvocationGuard {
    pub fn new(config: &InventoryConfig, machine_id: String) -> Self {
        Self {
            data_store_root: config.data_store_root.clone(),
            machine_id,
        }
    }

    /// Run both preconditions in order. Either failure short-circuits with
    /// no data collected.
    pub fn check(&self, ctx: &InvocationContext) -> Result<()> {
        self.ensure_association_invocation(ctx)?;
        self.ensure_single_association(ctx)
    }

    /// Association-only precondition: the persisted document-state record
    /// for this invocation must exist, parse, and carry the association
    /// flag.
    ///
    /// A missing record means the invocation context cannot be determined
    /// at all, which is distinct from a record that says "not an
    /// association".
    pub fn ensure_association_invocation(&self, ctx: &InvocationContext) -> Result<()> {
        let path = self.document_state_path(&ctx.bookkeeping_file_name);

        if !path.exists() {
            return Err(InventoryError::context_undetermined(format!(
                "can't locate the execution document which invoked the plugin; it should have been at {}",
                path.display()
            )));
        }

        debug!(
            path = %path.display(),
            "Found the document that is executing the inventory plugin"
        );

        let record = read_document_state(&path)?;

        if record.is_association() {
            Ok(())
        } else {
            Err(InventoryError::NotAnAssociationInvocation {
                plugin: PLUGIN_NAME.to_string(),
            })
        }
    }

    /// Exclusivity precondition: every currently active association ID must
    /// equal the one this invocation runs under.
    pub fn ensure_single_association(&self, ctx: &InvocationContext) -> Result<()> {
        let current = ctx.association_id();

        for active in &ctx.current_association_ids {
            if active != current {
                return Err(InventoryError::MultipleAssociationsPresent {
                    current: current.to_string(),
                    conflicting: active.clone(),
                });
            }
        }

        Ok(())
    }

    /// In-flight documents live in the `current` state directory of the
    /// store.
    fn document_state_path(&self, bookkeeping_file_name: &str) -> PathBuf {
        self.data_store_root
            .join(&self.machine_id)
            .join(document_store::DOCUMENT_ROOT_DIR)
            .join(document_store::STATE_DIR)
            .join(document_store::CURRENT_DIR)
            .join(bookkeeping_file_name)
    }
}

fn read_document_state(path: &Path) -> Result<DocumentStateRecord> {
    let content = fs::read_to_string(path).map_err(|err| {
        InventoryError::context_undetermined(format!(
            "unable to read document state record at {}: {err}",
            path.display()
        ))
    })?;

    serde_json::from_str(&content).map_err(|err| {
        InventoryError::context_undetermined(format!(
            "malformed document state record at {}: {err}",
            path.display()
        ))
    })
}
