//! Tag catalog fetch.

use std::sync::Arc;

use tracing::{debug, error};

use tagkit_core::tags::dedup_exact;
use tagkit_core::TagDefinitionRepository;

/// Fetches the known tag vocabulary.
#[derive(Clone)]
pub struct TagCatalogService {
    repo: Arc<dyn TagDefinitionRepository>,
}

impl TagCatalogService {
    pub fn new(repo: Arc<dyn TagDefinitionRepository>) -> Self {
        Self { repo }
    }

    /// Distinct, trimmed, non-empty tag names in store order.
    ///
    /// A failed fetch is logged and yields an empty catalog.
    pub async fn fetch_all_tags(&self) -> Vec<String> {
        match self.repo.list_tag_definitions().await {
            Ok(names) => {
                let tags = dedup_exact(
                    names
                        .iter()
                        .map(|n| n.trim())
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
                debug!(
                    subsystem = "engine",
                    component = "catalog",
                    result_count = tags.len(),
                    "Fetched tag catalog"
                );
                tags
            }
            Err(e) => {
                error!(
                    subsystem = "engine",
                    component = "catalog",
                    error = %e,
                    "Failed to fetch tag definitions"
                );
                Vec::new()
            }
        }
    }
}
