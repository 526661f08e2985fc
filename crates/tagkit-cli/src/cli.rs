//! Command-line arguments.

use clap::{Parser, Subcommand};
use tagkit_core::OperationMode;

#[derive(Debug, Parser)]
#[command(name = "tagkit")]
#[command(author, version, about = "Bulk tag management for Dataverse records")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the tag catalog
    Tags,

    /// Show whether new tags may be created on an entity
    Policy {
        /// Entity logical name, e.g. `account` or `evergrn_case`
        entity: String,
    },

    /// Apply tags to a batch of records
    Bulk {
        /// Entity logical name (default: the schema's case entity)
        #[arg(short, long)]
        entity: Option<String>,

        /// How tags are applied: add, remove or clear
        #[arg(short, long, default_value = "add")]
        mode: OperationMode,

        /// Record ids (comma-separated or repeated)
        #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
        ids: Vec<String>,

        /// Free-text tag input, e.g. "billing, urgent"
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Run a batch from a list-view launch payload
    Launch {
        /// JSON payload: {"selectedIds": [...], "mode": "...", "entityLogicalName": "..."}
        payload: String,

        /// Free-text tag input
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Commit a query into a tag field value, as the field control does
    Pick {
        /// Entity logical name that owns the field
        #[arg(short, long)]
        entity: Option<String>,

        /// Current tag field value
        #[arg(short, long, default_value = "")]
        value: String,

        /// Text typed into the control
        query: String,
    },
}
