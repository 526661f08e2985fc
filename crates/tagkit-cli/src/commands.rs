//! Command execution against wired tag services.

use tagkit_core::{LaunchConfig, Result, SchemaNames, TagPolicy};
use tagkit_engine::{BatchReport, BulkTagSession, CommitOutcome, TagServices};
use tracing::info;

use crate::cli::Commands;

/// Run one command and return the text to print on stdout.
pub async fn execute(command: Commands, services: &TagServices, schema: &SchemaNames) -> Result<String> {
    match command {
        Commands::Tags => {
            let tags = services.catalog.fetch_all_tags().await;
            Ok(tags.join("\n"))
        }
        Commands::Policy { entity } => {
            let policy = services.policy.resolve(&entity).await;
            Ok(policy_label(policy).to_string())
        }
        Commands::Bulk {
            entity,
            mode,
            ids,
            tags,
        } => {
            let entity = entity.unwrap_or_else(|| schema.default_entity());
            let launch = LaunchConfig::new(ids, mode, entity);
            let report = run_batch(launch, tags.as_deref(), services).await?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Commands::Launch { payload, tags } => {
            let launch = LaunchConfig::from_json(&payload, schema)?;
            let report = run_batch(launch, tags.as_deref(), services).await?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Commands::Pick {
            entity,
            value,
            query,
        } => {
            let entity = entity.unwrap_or_else(|| schema.default_entity());
            let mut picker = services.picker(&value, &entity).await;
            let outcome = picker.commit(&query).await;
            if !matches!(outcome, CommitOutcome::Added(_)) {
                info!(subsystem = "cli", outcome = ?outcome, "Query not committed");
            }
            Ok(picker.value())
        }
    }
}

/// Drive one popup session from open to submit.
pub async fn run_batch(
    launch: LaunchConfig,
    tags: Option<&str>,
    services: &TagServices,
) -> Result<BatchReport> {
    let mut session = BulkTagSession::new(launch, services.clone());
    session.open().await?;
    if let Some(input) = tags {
        session.set_input(input).await?;
    }
    session.submit().await
}

fn policy_label(policy: TagPolicy) -> &'static str {
    match policy {
        TagPolicy::Allowed => "allowed",
        TagPolicy::Denied => "denied",
        TagPolicy::Unresolved => "unresolved",
    }
}
