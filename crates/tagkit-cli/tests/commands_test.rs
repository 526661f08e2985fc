//! Command execution against the in-memory store.

use std::sync::Arc;

use tagkit_cli::{execute, Commands, LogNotifier};
use tagkit_core::{OperationMode, SchemaNames};
use tagkit_engine::mock::MemoryStore;
use tagkit_engine::TagServices;

fn services(store: &Arc<MemoryStore>) -> TagServices {
    TagServices::from_store(store.clone(), SchemaNames::default())
}

#[tokio::test]
async fn test_tags_lists_catalog_lines() {
    let store = Arc::new(MemoryStore::new().with_tags(["Billing", " Urgent ", "", "Billing"]));

    let output = execute(Commands::Tags, &services(&store), &SchemaNames::default())
        .await
        .unwrap();

    assert_eq!(output, "Billing\nUrgent");
}

#[tokio::test]
async fn test_policy_reports_label() {
    let store = Arc::new(MemoryStore::new().with_policy(0, false));
    let schema = SchemaNames::default();

    let account = execute(
        Commands::Policy {
            entity: "account".to_string(),
        },
        &services(&store),
        &schema,
    )
    .await
    .unwrap();
    let unmapped = execute(
        Commands::Policy {
            entity: "lead".to_string(),
        },
        &services(&store),
        &schema,
    )
    .await
    .unwrap();

    assert_eq!(account, "denied");
    assert_eq!(unmapped, "allowed");
}

#[tokio::test]
async fn test_bulk_prints_report_json() {
    let store = Arc::new(
        MemoryStore::new()
            .with_tags(["Billing"])
            .with_record("evergrn_case", "c1", "Vip")
            .with_record("evergrn_case", "c2", "Vip"),
    );

    let output = execute(
        Commands::Bulk {
            entity: None,
            mode: OperationMode::Add,
            ids: vec!["c1".to_string(), "c2".to_string()],
            tags: Some("billing".to_string()),
        },
        &services(&store),
        &SchemaNames::default(),
    )
    .await
    .unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["mode"], "add");
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 2);
    assert_eq!(
        store.tag_field("evergrn_case", "c1").as_deref(),
        Some("Billing,Vip")
    );
}

#[tokio::test]
async fn test_launch_payload_runs_clear() {
    let store = Arc::new(
        MemoryStore::new()
            .with_record("account", "a1", "Vip")
            .with_record("account", "a2", "Billing"),
    );
    let store_services = TagServices::new(store.clone(), Arc::new(LogNotifier), SchemaNames::default());

    execute(
        Commands::Launch {
            payload: r#"{"selectedIds":["a1","a2"],"mode":"clear","entityLogicalName":"account"}"#
                .to_string(),
            tags: None,
        },
        &store_services,
        &SchemaNames::default(),
    )
    .await
    .unwrap();

    assert_eq!(store.tag_field("account", "a1").as_deref(), Some(""));
    assert_eq!(store.tag_field("account", "a2").as_deref(), Some(""));
    assert!(store.refreshes().is_empty());
}

#[tokio::test]
async fn test_launch_rejects_malformed_payload() {
    let store = Arc::new(MemoryStore::new());

    let result = execute(
        Commands::Launch {
            payload: "not json".to_string(),
            tags: None,
        },
        &services(&store),
        &SchemaNames::default(),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_pick_commits_into_value() {
    let store = Arc::new(MemoryStore::new().with_tags(["Billing"]));

    let output = execute(
        Commands::Pick {
            entity: None,
            value: "Vip".to_string(),
            query: "billing".to_string(),
        },
        &services(&store),
        &SchemaNames::default(),
    )
    .await
    .unwrap();

    assert_eq!(output, "Billing,Vip");
}

#[tokio::test]
async fn test_pick_short_query_keeps_value() {
    let store = Arc::new(MemoryStore::new());

    let output = execute(
        Commands::Pick {
            entity: None,
            value: "vip".to_string(),
            query: "x".to_string(),
        },
        &services(&store),
        &SchemaNames::default(),
    )
    .await
    .unwrap();

    assert_eq!(output, "Vip");
    assert_eq!(store.create_call_count(), 0);
}
