//! # Inventory Plugin
//!
//! Orchestrates one inventory invocation end to end: precondition guard,
//! policy-input validation, size-bounded gatherer execution, and the
//! optimized/fallback upload. Each stage either proceeds to the next or
//! terminates the invocation with a single reported failure; no stage
//! produces partial externally-visible output.

use crate::config::InventoryConfig;
use crate::constants::{messages, PLUGIN_NAME};
use crate::error::{InventoryError, Result};
use crate::gatherers::GathererRegistry;
use crate::guard::{InvocationGuard, MachineIdProvider};
use crate::pipeline::{ExecutionPipeline, SizeLimits};
use crate::resilience::StopPolicy;
use crate::types::{InvocationContext, PluginOutput, PolicyInput, ResultStatus};
use crate::upload::{InventoryClient, PayloadConverter, UploadCoordinator};
use crate::validation::InputValidator;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// The inventory plugin: one instance per hosting agent, shareable across
/// sequential invocations.
pub struct InventoryPlugin {
    config: InventoryConfig,
    registry: Arc<GathererRegistry>,
    guard: InvocationGuard,
    coordinator: UploadCoordinator,
    /// Constructed with the plugin; the collection flow does not consult it
    /// yet.
    #[allow(dead_code)]
    stop_policy: StopPolicy,
}

impl InventoryPlugin {
    /// Name under which this plugin is registered with the agent framework.
    pub fn name() -> &'static str {
        PLUGIN_NAME
    }

    /// Create a new inventory plugin. Resolves the machine identity once
    /// through the injected provider; a provider failure hampers every
    /// invocation and is therefore a construction error.
    pub fn new(
        config: InventoryConfig,
        registry: Arc<GathererRegistry>,
        converter: Arc<dyn PayloadConverter>,
        client: Arc<dyn InventoryClient>,
        machine_id_provider: MachineIdProvider,
    ) -> Result<Self> {
        let machine_id = machine_id_provider()?;
        debug!(machine_id = %machine_id, "Resolved machine identity for inventory plugin");

        let guard = InvocationGuard::new(&config, machine_id);
        let stop_policy = StopPolicy::new(PLUGIN_NAME, config.stop_policy_error_threshold);
        let coordinator = UploadCoordinator::new(converter, client);

        Ok(Self {
            config,
            registry,
            guard,
            coordinator,
            stop_policy,
        })
    }

    /// Run one inventory invocation.
    ///
    /// The cancellation receiver is accepted for interface compatibility
    /// but not consulted; honoring it belongs to a future long-running
    /// execution mode.
    pub async fn execute(
        &self,
        ctx: &InvocationContext,
        properties: &serde_json::Value,
        _cancel: watch::Receiver<bool>,
    ) -> PluginOutput {
        let mut output = PluginOutput::new();

        debug!(
            bookkeeping_file = %ctx.bookkeeping_file_name,
            "Starting inventory plugin invocation"
        );

        if let Err(err) = self.guard.check(ctx) {
            fail(&mut output, &err);
            return output;
        }

        debug!("Inventory plugin is being invoked via association - proceeding with execution");

        let input: PolicyInput = match serde_json::from_value(properties.clone()) {
            Ok(input) => input,
            Err(err) => {
                fail(
                    &mut output,
                    &InventoryError::invalid_policy_input(err.to_string()),
                );
                return output;
            }
        };

        self.apply_inventory_policy(&input, &mut output).await;
        output
    }

    /// Apply the inventory policy: select gatherers, run them under the
    /// size ceilings, and upload whatever was collected.
    async fn apply_inventory_policy(&self, input: &PolicyInput, output: &mut PluginOutput) {
        let validator = InputValidator::new(&self.registry);
        let selected = match validator.validate(input) {
            Ok(selected) => selected,
            Err(err) => {
                fail(output, &err);
                return;
            }
        };

        let pipeline = ExecutionPipeline::new(SizeLimits::from(&self.config));
        let items = match pipeline.run(selected).await {
            Ok(items) => items,
            Err(err) => {
                fail(output, &err);
                return;
            }
        };

        if items.is_empty() {
            // Nothing to send; the policy still applied successfully.
            info!("{}", messages::NO_DATA);
            output.set_exit_code(0);
            output.set_status(ResultStatus::Success);
            output.append_info(messages::NO_DATA);
            return;
        }

        match self.coordinator.upload(&items).await {
            Ok(()) => {
                info!(items = items.len(), "Uploaded inventory data");
                output.set_exit_code(0);
                output.set_status(ResultStatus::Success);
                output.append_info(messages::SUCCESS);
            }
            Err(err) => fail(output, &err),
        }
    }
}

fn fail(output: &mut PluginOutput, err: &InventoryError) {
    error!(error = %err, "Inventory invocation failed");
    output.set_exit_code(1);
    output.set_status(ResultStatus::Failed);
    output.append_error(err.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadErrorKind;
    use crate::types::{InventoryItem, UploadPayload};
    use crate::upload::UploadFailure;
    use async_trait::async_trait;

    struct PassthroughConverter;

    #[async_trait]
    impl PayloadConverter for PassthroughConverter {
        async fn convert(
            &self,
            items: &[InventoryItem],
        ) -> Result<(UploadPayload, UploadPayload)> {
            Ok((
                UploadPayload::OptimizedDelta(items.to_vec()),
                UploadPayload::FullSnapshot(items.to_vec()),
            ))
        }
    }

    struct RejectingClient;

    #[async_trait]
    impl InventoryClient for RejectingClient {
        async fn put_inventory(
            &self,
            _payload: &UploadPayload,
        ) -> std::result::Result<(), UploadFailure> {
            Err(UploadFailure::new(
                UploadErrorKind::Other("AccessDeniedException".to_string()),
                "no credentials",
            ))
        }
    }

    fn plugin_with_store(root: std::path::PathBuf) -> InventoryPlugin {
        let config = InventoryConfig {
            data_store_root: root,
            ..InventoryConfig::default()
        };
        InventoryPlugin::new(
            config,
            Arc::new(GathererRegistry::builtin()),
            Arc::new(PassthroughConverter),
            Arc::new(RejectingClient),
            Box::new(|| Ok("machine-0001".to_string())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn guard_failure_short_circuits_with_failed_output() {
        let store = tempfile::tempdir().unwrap();
        let plugin = plugin_with_store(store.path().to_path_buf());

        let ctx = InvocationContext {
            bookkeeping_file_name: "assoc-123.run-1".to_string(),
            current_association_ids: vec!["assoc-123".to_string()],
        };
        let (_tx, cancel) = watch::channel(false);

        // No document-state record exists, so the guard cannot determine
        // the invocation type.
        let output = plugin
            .execute(&ctx, &serde_json::json!({}), cancel)
            .await;

        assert_eq!(output.exit_code(), 1);
        assert_eq!(output.status(), ResultStatus::Failed);
        assert_eq!(output.stderr().len(), 1);
    }

    #[tokio::test]
    async fn machine_id_provider_failure_is_a_construction_error() {
        let result = InventoryPlugin::new(
            InventoryConfig::default(),
            Arc::new(GathererRegistry::builtin()),
            Arc::new(PassthroughConverter),
            Arc::new(RejectingClient),
            Box::new(|| {
                Err(InventoryError::MachineIdUnavailable {
                    reason: "no machine-id file".to_string(),
                })
            }),
        );

        assert!(matches!(
            result,
            Err(InventoryError::MachineIdUnavailable { .. })
        ));
    }
}
