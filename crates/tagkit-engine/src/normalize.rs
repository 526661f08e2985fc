//! Tag normalization: raw user input to a canonical Tag Set.
//!
//! ## Resolution Order
//!
//! For each comma-separated candidate the normalizer:
//! 1. Trims it and uppercases the first character
//! 2. Matches it case-insensitively against the catalog (stored spelling wins)
//! 3. Consults the creation policy when unmatched
//! 4. Creates the tag remotely when allowed and appends it to the catalog
//!
//! The result is deduplicated ignoring case and sorted.

use tracing::{debug, warn};

use tagkit_core::tags::{canonical_set, find_tag, format_tag, split_candidates};
use tagkit_core::TagPolicy;

use crate::creation::TagCreationService;

/// Why a candidate did not resolve to a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Policy lookup has not settled yet.
    PolicyUnresolved,
    /// Policy forbids creating new tags for this entity.
    PolicyDenied,
    /// The remote create failed (already logged by the creation service).
    CreationFailed,
}

/// Normalizes input against an in-memory catalog that grows as tags are
/// created.
pub struct TagNormalizer {
    catalog: Vec<String>,
    policy: TagPolicy,
    creation: TagCreationService,
}

impl TagNormalizer {
    /// Create a normalizer with an empty catalog and an unresolved policy.
    pub fn new(creation: TagCreationService) -> Self {
        Self {
            catalog: Vec::new(),
            policy: TagPolicy::Unresolved,
            creation,
        }
    }

    /// Replace the catalog. Names are stored formatted.
    pub fn set_catalog(&mut self, tags: Vec<String>) {
        self.catalog = tags.iter().map(|t| format_tag(t)).collect();
    }

    pub fn set_policy(&mut self, policy: TagPolicy) {
        self.policy = policy;
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn policy(&self) -> TagPolicy {
        self.policy
    }

    /// Resolve one trimmed candidate to a canonical tag.
    pub async fn resolve(&mut self, candidate: &str) -> Result<String, Rejection> {
        let formatted = format_tag(candidate.trim());

        if let Some(existing) = find_tag(&self.catalog, &formatted) {
            debug!(
                subsystem = "engine",
                component = "normalizer",
                tag = %existing,
                "Matched catalog tag"
            );
            return Ok(existing.clone());
        }

        match self.policy {
            TagPolicy::Unresolved => {
                warn!(
                    subsystem = "engine",
                    component = "normalizer",
                    tag = %formatted,
                    "Tag creation: still loading tag setting"
                );
                return Err(Rejection::PolicyUnresolved);
            }
            TagPolicy::Denied => {
                warn!(
                    subsystem = "engine",
                    component = "normalizer",
                    tag = %formatted,
                    "Tag creation: not allowed for this entity"
                );
                return Err(Rejection::PolicyDenied);
            }
            TagPolicy::Allowed => {}
        }

        let created = self
            .creation
            .create_new_tag(&formatted)
            .await
            .ok_or(Rejection::CreationFailed)?;
        self.catalog.push(created.clone());
        Ok(created)
    }

    /// Normalize raw (possibly comma-separated) input into a Tag Set.
    ///
    /// Rejected candidates are dropped; empty input is an empty set.
    pub async fn normalize(&mut self, input: &str) -> Vec<String> {
        let mut resolved = Vec::new();
        for candidate in split_candidates(input) {
            if let Ok(tag) = self.resolve(&candidate).await {
                resolved.push(tag);
            }
        }
        canonical_set(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryStore;
    use std::sync::Arc;

    fn normalizer(store: &Arc<MemoryStore>, policy: TagPolicy) -> TagNormalizer {
        let mut n = TagNormalizer::new(TagCreationService::new(store.clone()));
        n.set_policy(policy);
        n
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_input_is_empty_set() {
        let store = Arc::new(MemoryStore::new());
        let mut n = normalizer(&store, TagPolicy::Allowed);
        assert!(n.normalize("").await.is_empty());
        assert!(n.normalize(" , ,").await.is_empty());
        assert_eq!(store.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_catalog_spelling_wins() {
        let store = Arc::new(MemoryStore::new());
        let mut n = normalizer(&store, TagPolicy::Denied);
        n.set_catalog(strings(&["VIP", "billing"]));
        assert_eq!(n.catalog(), strings(&["VIP", "Billing"]).as_slice());
        assert_eq!(n.normalize("vip, BILLING").await, strings(&["Billing", "VIP"]));
    }

    #[tokio::test]
    async fn test_case_variants_collapse_to_one_tag() {
        let store = Arc::new(MemoryStore::new());
        let mut n = normalizer(&store, TagPolicy::Allowed);
        assert_eq!(n.normalize("bug, Bug,  BUG ").await, strings(&["Bug"]));
        assert_eq!(store.create_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unresolved_policy_rejects_without_side_effect() {
        let store = Arc::new(MemoryStore::new());
        let mut n = TagNormalizer::new(TagCreationService::new(store.clone()));
        assert_eq!(n.resolve("Foo").await, Err(Rejection::PolicyUnresolved));
        assert_eq!(store.find_call_count(), 0);
        assert_eq!(store.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_created_tag_joins_catalog() {
        let store = Arc::new(MemoryStore::new());
        let mut n = normalizer(&store, TagPolicy::Allowed);
        assert_eq!(n.resolve("roadmap").await, Ok("Roadmap".to_string()));
        assert_eq!(n.catalog(), strings(&["Roadmap"]).as_slice());
    }

    #[tokio::test]
    async fn test_creation_failure_drops_candidate() {
        let store = Arc::new(MemoryStore::new().failing_creates());
        let mut n = normalizer(&store, TagPolicy::Allowed);
        assert_eq!(n.resolve("Fresh").await, Err(Rejection::CreationFailed));
        assert!(n.normalize("fresh").await.is_empty());
        assert!(n.catalog().is_empty());
    }
}
