//! tagkit: bulk tag management for Dataverse records.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use tagkit_cli::{execute, logging, Cli, LogNotifier};
use tagkit_dataverse::DataverseClient;
use tagkit_engine::TagServices;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init();

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let client = DataverseClient::from_env().context("Invalid Dataverse configuration")?;
    let schema = client.schema().clone();
    info!(
        subsystem = "cli",
        api_root = %client.config().api_root(),
        "Connected store configured"
    );

    let services = TagServices::new(Arc::new(client), Arc::new(LogNotifier), schema.clone());
    let output = execute(cli.command, &services, &schema).await?;
    Ok(output)
}
