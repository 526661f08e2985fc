//! Listing refresh for a headless host.

use async_trait::async_trait;
use tagkit_core::{ListingNotifier, Result};
use tracing::info;

/// Emits the refresh request as a log event.
///
/// A terminal has no grid to reload; whoever launched the batch reads the
/// `refresh_pivot` of the printed report instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl ListingNotifier for LogNotifier {
    async fn refresh_listing(&self, entity: &str, pivot_id: &str) -> Result<()> {
        info!(
            subsystem = "cli",
            entity = entity,
            record_id = pivot_id,
            "Listing refresh requested"
        );
        Ok(())
    }
}
