//! End-to-end invocation flow tests for the inventory plugin.
//!
//! These drive the full guard -> validate -> execute -> upload sequence with
//! mock gatherers and a scripted remote client, against a document store
//! laid out in a temporary directory.

use async_trait::async_trait;
use inventory_core::config::InventoryConfig;
use inventory_core::constants::{document_store, gatherer_names};
use inventory_core::error::{Result, UploadErrorKind};
use inventory_core::gatherers::{Gatherer, GathererRegistry};
use inventory_core::plugin::InventoryPlugin;
use inventory_core::types::{
    GathererConfig, InvocationContext, InventoryItem, ResultStatus, StopType, UploadPayload,
};
use inventory_core::upload::{InventoryClient, PayloadConverter, UploadFailure};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

const MACHINE_ID: &str = "machine-0001";

#[derive(Debug)]
struct CountingGatherer {
    name: &'static str,
    content: serde_json::Value,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Gatherer for CountingGatherer {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, _config: &GathererConfig) -> Result<Vec<InventoryItem>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(vec![InventoryItem {
            name: self.name.to_string(),
            schema_version: "1.0".to_string(),
            content: self.content.clone(),
            capture_time: InventoryItem::capture_time_now(),
        }])
    }

    fn request_stop(&self, _stop_type: StopType) -> Result<()> {
        Ok(())
    }
}

struct PassthroughConverter;

#[async_trait]
impl PayloadConverter for PassthroughConverter {
    async fn convert(&self, items: &[InventoryItem]) -> Result<(UploadPayload, UploadPayload)> {
        Ok((
            UploadPayload::OptimizedDelta(items.to_vec()),
            UploadPayload::FullSnapshot(items.to_vec()),
        ))
    }
}

/// Remote client that plays back scripted outcomes and records the payload
/// variants it was handed.
struct ScriptedClient {
    outcomes: Mutex<Vec<std::result::Result<(), UploadFailure>>>,
    seen: Mutex<Vec<&'static str>>,
}

impl ScriptedClient {
    fn new(outcomes: Vec<std::result::Result<(), UploadFailure>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<&'static str> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryClient for ScriptedClient {
    async fn put_inventory(
        &self,
        payload: &UploadPayload,
    ) -> std::result::Result<(), UploadFailure> {
        self.seen.lock().unwrap().push(payload.variant_name());
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            Ok(())
        } else {
            outcomes.remove(0)
        }
    }
}

fn write_association_document(root: &Path, file_name: &str) {
    write_document(root, file_name, r#"{"DocumentType":"Association"}"#);
}

fn write_document(root: &Path, file_name: &str, content: &str) {
    let dir = root
        .join(MACHINE_ID)
        .join(document_store::DOCUMENT_ROOT_DIR)
        .join(document_store::STATE_DIR)
        .join(document_store::CURRENT_DIR);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(file_name), content).unwrap();
}

struct Harness {
    plugin: InventoryPlugin,
    client: Arc<ScriptedClient>,
    gatherer_runs: Arc<AtomicUsize>,
    _store: tempfile::TempDir,
}

fn harness(
    store: tempfile::TempDir,
    content: serde_json::Value,
    outcomes: Vec<std::result::Result<(), UploadFailure>>,
) -> Harness {
    let runs = Arc::new(AtomicUsize::new(0));
    let gatherer: Arc<dyn Gatherer> = Arc::new(CountingGatherer {
        name: gatherer_names::APPLICATION,
        content,
        runs: Arc::clone(&runs),
    });
    let registry =
        GathererRegistry::new(vec![Arc::clone(&gatherer)], vec![gatherer]).unwrap();

    let client = ScriptedClient::new(outcomes);

    let config = InventoryConfig {
        data_store_root: store.path().to_path_buf(),
        ..InventoryConfig::default()
    };

    let plugin = InventoryPlugin::new(
        config,
        Arc::new(registry),
        Arc::new(PassthroughConverter),
        Arc::clone(&client) as Arc<dyn InventoryClient>,
        Box::new(|| Ok(MACHINE_ID.to_string())),
    )
    .unwrap();

    Harness {
        plugin,
        client,
        gatherer_runs: runs,
        _store: store,
    }
}

fn association_ctx(active: &[&str]) -> InvocationContext {
    InvocationContext {
        bookkeeping_file_name: "assoc-123.run-1".to_string(),
        current_association_ids: active.iter().map(|s| s.to_string()).collect(),
    }
}

fn enabled_applications() -> serde_json::Value {
    serde_json::json!({ "Applications": "Enabled" })
}

fn cancel_receiver() -> watch::Receiver<bool> {
    let (_tx, rx) = watch::channel(false);
    rx
}

#[tokio::test]
async fn successful_invocation_uploads_optimized_payload() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(store, serde_json::json!([]), vec![Ok(())]);

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 0);
    assert_eq!(output.status(), ResultStatus::Success);
    assert_eq!(h.gatherer_runs.load(Ordering::SeqCst), 1);
    assert_eq!(h.client.calls(), vec!["optimized_delta"]);
}

#[tokio::test]
async fn stale_baseline_rejection_falls_back_to_full_snapshot() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(
        store,
        serde_json::json!([]),
        vec![
            Err(UploadFailure::new(
                UploadErrorKind::ContentMismatch,
                "baseline is stale",
            )),
            Ok(()),
        ],
    );

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 0);
    assert_eq!(output.status(), ResultStatus::Success);
    assert_eq!(h.client.calls(), vec!["optimized_delta", "full_snapshot"]);
}

#[tokio::test]
async fn non_retryable_rejection_fails_without_second_attempt() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(
        store,
        serde_json::json!([]),
        vec![Err(UploadFailure::new(
            UploadErrorKind::Other("AccessDeniedException".to_string()),
            "no credentials",
        ))],
    );

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert_eq!(output.status(), ResultStatus::Failed);
    assert_eq!(h.client.calls(), vec!["optimized_delta"]);
}

#[tokio::test]
async fn conflicting_association_blocks_before_any_gatherer_runs() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(store, serde_json::json!([]), vec![]);

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123", "assoc-999"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert_eq!(output.status(), ResultStatus::Failed);
    assert!(output.stderr()[0].contains("assoc-999"));
    assert_eq!(h.gatherer_runs.load(Ordering::SeqCst), 0);
    assert!(h.client.calls().is_empty());
}

#[tokio::test]
async fn missing_document_state_is_reported_as_undetermined() {
    let store = tempfile::tempdir().unwrap();
    // No document written: the guard cannot determine the invocation type.
    let h = harness(store, serde_json::json!([]), vec![]);

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert!(output.stderr()[0].contains("Unable to detect"));
    assert_eq!(h.gatherer_runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_association_document_fails_the_invocation() {
    let store = tempfile::tempdir().unwrap();
    write_document(
        store.path(),
        "assoc-123.run-1",
        r#"{"DocumentType":"SendCommand"}"#,
    );
    let h = harness(store, serde_json::json!([]), vec![]);

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert!(output.stderr()[0].contains("scheduled association"));
    assert_eq!(h.gatherer_runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_policy_succeeds_with_nothing_to_upload() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(store, serde_json::json!([]), vec![]);

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &serde_json::json!({}),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 0);
    assert_eq!(output.status(), ResultStatus::Success);
    assert!(output.stdout()[0].contains("no inventory data"));
    assert!(h.client.calls().is_empty());
}

#[tokio::test]
async fn oversized_item_aborts_before_any_upload() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");

    // Content larger than the 200 KiB per-type ceiling.
    let oversized = "x".repeat(201 * 1024);
    let h = harness(store, serde_json::json!(oversized), vec![]);

    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &enabled_applications(),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert_eq!(output.status(), ResultStatus::Failed);
    assert!(output.stderr()[0].contains("Size limit exceeded"));
    assert!(h.client.calls().is_empty());
}

#[tokio::test]
async fn unrecognized_gatherer_fails_validation_with_no_gatherer_runs() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(store, serde_json::json!([]), vec![]);

    // Services is not registered in the harness registry.
    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &serde_json::json!({ "Applications": "Enabled", "Services": "Enabled" }),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert!(output.stderr()[0].contains("Unrecognized inventory gatherer"));
    assert!(h.client.calls().is_empty());
}

#[tokio::test]
async fn malformed_properties_fail_as_invalid_policy_input() {
    let store = tempfile::tempdir().unwrap();
    write_association_document(store.path(), "assoc-123.run-1");
    let h = harness(store, serde_json::json!([]), vec![]);

    // Properties must be a map of string fields.
    let output = h
        .plugin
        .execute(
            &association_ctx(&["assoc-123"]),
            &serde_json::json!({ "Applications": 42 }),
            cancel_receiver(),
        )
        .await;

    assert_eq!(output.exit_code(), 1);
    assert!(output.stderr()[0].contains("Unrecognized input"));
    assert_eq!(h.gatherer_runs.load(Ordering::SeqCst), 0);
}
