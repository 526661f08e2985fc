//! Look-up-or-create of a single tag name.
//!
//! The store has no unique constraint on tag names and this check-then-create
//! holds no lock, so two sessions creating the same new name at the same time
//! can both insert it. Callers that need stronger guarantees must enforce
//! uniqueness in the store itself.

use std::sync::Arc;

use tracing::{debug, error, info};

use tagkit_core::{Result, TagDefinitionRepository};

/// Resolves a candidate to its stored spelling, creating it when absent.
#[derive(Clone)]
pub struct TagCreationService {
    repo: Arc<dyn TagDefinitionRepository>,
}

impl TagCreationService {
    pub fn new(repo: Arc<dyn TagDefinitionRepository>) -> Self {
        Self { repo }
    }

    /// Return the canonical stored name for `name`, creating it if needed.
    ///
    /// Returns `None` when any remote call fails; the failure is logged here.
    pub async fn create_new_tag(&self, name: &str) -> Option<String> {
        match self.lookup_or_create(name).await {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                error!(
                    subsystem = "engine",
                    component = "creation",
                    tag = %name.trim(),
                    error = %e,
                    "Failed to create new tag"
                );
                None
            }
        }
    }

    async fn lookup_or_create(&self, name: &str) -> Result<String> {
        let trimmed = name.trim();
        let wanted = trimmed.to_lowercase();

        let similar = self.repo.find_tag_definitions(trimmed).await?;
        if let Some(existing) = similar
            .iter()
            .map(|s| s.trim())
            .find(|s| s.to_lowercase() == wanted)
        {
            debug!(
                subsystem = "engine",
                component = "creation",
                tag = %existing,
                "Tag already defined"
            );
            return Ok(existing.to_string());
        }

        let id = self.repo.create_tag_definition(trimmed).await?;
        info!(
            subsystem = "engine",
            component = "creation",
            tag = %trimmed,
            tag_definition_id = %id,
            "Created tag definition"
        );
        Ok(trimmed.to_string())
    }
}
