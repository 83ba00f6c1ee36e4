//! Tool Dispatch Integration Tests
//!
//! JSON requests through `dispatch_json`, the tool registry, and config
//! files feeding the dispatch layer.

use serde_json::json;
use tempfile::TempDir;

use memory_bank::commands::{build_registry, dispatch_json};
use memory_bank::models::settings::{SyncConfig, SyncConfigUpdate};
use memory_bank::storage::ConfigService;
use memory_bank_core::{instructions_path, memory_bank_dir};

use super::common::{read_instructions, write_instructions};

async fn call(tool: &str, arguments: serde_json::Value, config: &SyncConfig) -> serde_json::Value {
    let payload = json!({ "tool": tool, "arguments": arguments }).to_string();
    let response = dispatch_json(&payload, config).await;
    assert!(response.success, "{} failed: {:?}", tool, response.error);
    response.data.unwrap()
}

#[tokio::test]
async fn test_generate_validate_resolve_over_json() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("Cargo.toml"),
        "[package]\nname = \"ledger\"\nversion = \"0.2.0\"\n\n[dependencies]\naxum = \"0.7\"\n",
    )
    .unwrap();
    let config = SyncConfig::default();

    let generated =
        call("generate_memory_bank", json!({ "projectRoot": temp.path() }), &config).await;
    assert_eq!(generated["analysis"]["projectName"], "ledger");
    assert_eq!(generated["instructionsUpdated"], true);

    let validated = call(
        "validate_memory_bank",
        json!({ "projectRoot": temp.path(), "syncValidation": true }),
        &config,
    )
    .await;
    assert_eq!(validated["isValid"], true);
    assert_eq!(validated["copilotSync"]["isInSync"], true);

    let resolved = call(
        "resolve_sync_conflicts",
        json!({ "projectRoot": temp.path() }),
        &config,
    )
    .await;
    assert_eq!(resolved["status"], "already_in_sync");
    assert_eq!(resolved["actionsPerformed"], json!([]));
}

#[tokio::test]
async fn test_interactive_validation_repairs_missing_instructions() {
    let temp = TempDir::new().unwrap();
    let config = SyncConfig::default();
    call(
        "generate_memory_bank",
        json!({ "projectRoot": temp.path(), "semanticOrganization": false }),
        &config,
    )
    .await;
    std::fs::remove_file(instructions_path(temp.path())).unwrap();

    let report = call(
        "validate_memory_bank",
        json!({
            "memoryBankPath": memory_bank_dir(temp.path()),
            "syncValidation": true,
            "interactiveMode": true
        }),
        &config,
    )
    .await;

    assert_eq!(report["copilotSync"]["instructionsFound"], false);
    assert!(report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["type"] == "instructions_missing"));
    assert_eq!(report["resolution"]["resolved"], true);
    assert!(read_instructions(temp.path()).contains("After every memory reset"));
}

#[tokio::test]
async fn test_scripted_decisions_over_json() {
    let temp = TempDir::new().unwrap();
    let config = SyncConfig::default();
    call("generate_memory_bank", json!({ "projectRoot": temp.path() }), &config).await;
    let original =
        "# Notes\n\nAfter every memory reset, I begin completely fresh.\n\n- `gone.md`\n";
    write_instructions(temp.path(), original);

    let result = call(
        "resolve_sync_conflicts",
        json!({
            "projectRoot": temp.path(),
            "decisions": ["Resolve interactively, file by file", "Stop"]
        }),
        &config,
    )
    .await;

    assert_eq!(result["status"], "unresolved");
    assert_eq!(result["resolved"], false);
    assert_eq!(result["userChoices"].as_array().unwrap().len(), 2);
    assert_eq!(read_instructions(temp.path()), original);
}

#[tokio::test]
async fn test_rejected_requests_never_reach_the_filesystem() {
    let temp = TempDir::new().unwrap();
    let config = SyncConfig::default();

    let cases = [
        json!({ "tool": "generate_memory_bank", "arguments": { "projectRoot": "" } }).to_string(),
        json!({
            "tool": "generate_memory_bank",
            "arguments": { "projectRoot": temp.path(), "analysisDepth": 42 }
        })
        .to_string(),
        json!({
            "tool": "validate_memory_bank",
            "arguments": { "projectRoot": temp.path(), "interactiveMode": true }
        })
        .to_string(),
        json!({ "tool": "resolve_sync_conflicts", "arguments": { "root": temp.path() } })
            .to_string(),
        json!({ "tool": "drop_tables", "arguments": {} }).to_string(),
        "[]".to_string(),
    ];

    for payload in cases {
        let response = dispatch_json(&payload, &config).await;
        assert!(!response.success, "accepted: {}", payload);
        assert!(response.data.is_none());
    }
    assert!(!temp.path().join(".github").exists());
}

#[tokio::test]
async fn test_registry_matches_dispatch() {
    let temp = TempDir::new().unwrap();
    let registry = build_registry(&SyncConfig::default());

    let defs = registry.definitions();
    assert_eq!(defs.len(), 3);
    assert!(defs.iter().all(|d| d["inputSchema"]["type"] == "object"));

    let out = registry
        .execute(
            "generate_memory_bank",
            json!({ "projectRoot": temp.path(), "semanticOrganization": false }),
        )
        .await
        .unwrap();
    assert_eq!(out["createdFiles"].as_array().unwrap().len(), 6);
    assert!(registry.execute("unknown_tool", json!({})).await.is_err());
}

#[tokio::test]
async fn test_config_file_drives_generation_defaults() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("app");
    std::fs::create_dir_all(&project).unwrap();

    let mut service = ConfigService::from_path(temp.path().join("config.json")).unwrap();
    service
        .update_config(SyncConfigUpdate {
            semantic_organization: Some(false),
            ..Default::default()
        })
        .unwrap();
    service.save().unwrap();

    let reloaded = ConfigService::from_path(temp.path().join("config.json")).unwrap();
    assert!(!reloaded.get_config().semantic_organization);

    let generated = call(
        "generate_memory_bank",
        json!({ "projectRoot": project }),
        reloaded.get_config(),
    )
    .await;
    let created = generated["createdFiles"].as_array().unwrap();
    assert_eq!(created.len(), 6);
    assert!(created.iter().all(|f| !f.as_str().unwrap().contains('/')));
}
