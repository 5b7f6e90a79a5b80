//! # Upload Coordinator
//!
//! Drives the two-tier upload protocol against the remote inventory
//! service. Payload construction and the wire call are delegated to
//! external collaborators behind [`PayloadConverter`] and
//! [`InventoryClient`].
//!
//! Protocol: send the optimized delta first. If the remote rejects it with
//! a classification that means its assumed baseline is stale or invalid,
//! re-send once as a self-contained full snapshot. Any other rejection is
//! terminal immediately. This is a bounded fallback gated purely on error
//! classification - never a time- or attempt-count-based retry loop.

use crate::error::{InventoryError, Result, UploadErrorKind};
use crate::types::{InventoryItem, UploadPayload};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Failure surfaced by the remote inventory service, carrying the
/// classification the coordinator inspects.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct UploadFailure {
    pub kind: UploadErrorKind,
    pub message: String,
}

impl UploadFailure {
    pub fn new(kind: UploadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Builds the optimized-delta and full-snapshot payload pair from the
/// collected item list. The diff against the remote baseline lives behind
/// this trait.
#[async_trait]
pub trait PayloadConverter: Send + Sync {
    async fn convert(&self, items: &[InventoryItem]) -> Result<(UploadPayload, UploadPayload)>;
}

/// Transport to the remote inventory service.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    async fn put_inventory(&self, payload: &UploadPayload)
        -> std::result::Result<(), UploadFailure>;
}

/// Coordinates payload conversion and the optimized/fallback upload.
pub struct UploadCoordinator {
    converter: Arc<dyn PayloadConverter>,
    client: Arc<dyn InventoryClient>,
}

impl UploadCoordinator {
    pub fn new(converter: Arc<dyn PayloadConverter>, client: Arc<dyn InventoryClient>) -> Self {
        Self { converter, client }
    }

    /// Upload the collected items. Exactly zero or one fallback attempt is
    /// made, depending on how the remote classified the first rejection.
    pub async fn upload(&self, items: &[InventoryItem]) -> Result<()> {
        let (optimized, full) = self
            .converter
            .convert(items)
            .await
            .map_err(|err| InventoryError::ConversionFailed {
                reason: err.to_string(),
            })?;

        debug!(
            optimized_items = optimized.items().len(),
            full_items = full.items().len(),
            "Constructed inventory upload payloads"
        );

        match self.client.put_inventory(&optimized).await {
            Ok(()) => {
                info!("Uploaded optimized inventory payload");
                Ok(())
            }
            Err(failure) if failure.kind.warrants_full_snapshot() => {
                debug!(
                    classification = %failure.kind,
                    "Remote rejected optimized payload - sending full snapshot once"
                );

                match self.client.put_inventory(&full).await {
                    Ok(()) => {
                        info!("Uploaded full inventory snapshot after optimized payload was rejected");
                        Ok(())
                    }
                    Err(retry_failure) => Err(InventoryError::UploadRejected {
                        kind: retry_failure.kind,
                        message: retry_failure.message,
                    }),
                }
            }
            Err(failure) => {
                debug!(
                    classification = %failure.kind,
                    "Unexpected upload failure - no point sending data again"
                );
                Err(InventoryError::UploadRejected {
                    kind: failure.kind,
                    message: failure.message,
                })
            }
        }
    }
}
