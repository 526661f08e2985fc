//! Tag creation policy resolution.
//!
//! Resolution never blocks tagging: an unmapped entity, a missing policy row
//! and a failed lookup all resolve to "allowed".

use std::sync::Arc;

use tracing::{debug, error, warn};

use tagkit_core::{policy_key, SchemaNames, TagPolicy, TagPolicyRepository};

/// Answers whether new tags may be created for an entity type.
#[derive(Clone)]
pub struct TagPolicyService {
    repo: Arc<dyn TagPolicyRepository>,
    schema: SchemaNames,
}

impl TagPolicyService {
    pub fn new(repo: Arc<dyn TagPolicyRepository>, schema: SchemaNames) -> Self {
        Self { repo, schema }
    }

    pub async fn is_tag_creation_allowed(&self, entity: &str) -> bool {
        let Some(key) = policy_key(&self.schema, entity) else {
            warn!(
                subsystem = "engine",
                component = "policy",
                entity = %entity,
                "Entity not mapped to a policy key, allowing tag creation"
            );
            return true;
        };

        match self.repo.list_tag_policies(key).await {
            Ok(rows) => {
                let allowed = rows.first().map_or(true, |row| row.allow_tag_creation);
                debug!(
                    subsystem = "engine",
                    component = "policy",
                    entity = %entity,
                    policy_key = %key,
                    result_count = rows.len(),
                    allowed,
                    "Resolved tag creation policy"
                );
                allowed
            }
            Err(e) => {
                error!(
                    subsystem = "engine",
                    component = "policy",
                    entity = %entity,
                    policy_key = %key,
                    error = %e,
                    "Error checking tag creation setting, allowing tag creation"
                );
                true
            }
        }
    }

    /// Resolve straight into the in-memory policy state.
    pub async fn resolve(&self, entity: &str) -> TagPolicy {
        TagPolicy::from_allowed(self.is_tag_creation_allowed(entity).await)
    }
}
