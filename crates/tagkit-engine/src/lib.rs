//! # tagkit-engine
//!
//! Tag normalization and batch sync engine.
//!
//! This crate provides:
//! - Catalog fetch, look-up-or-create and creation policy services
//! - Normalization of free-text input into a canonical Tag Set
//! - Sequential, failure-isolated batch apply (add/remove/clear)
//! - The bulk tag popup session state machine
//! - Headless state for the tag picker field control
//!
//! All remote I/O goes through the collaborator traits of `tagkit-core`.
//!
//! # Feature Flags
//!
//! - `mock`: Enable the in-memory store ([`mock::MemoryStore`])

pub mod catalog;
pub mod creation;
pub mod normalize;
pub mod picker;
pub mod policy;
pub mod session;
pub mod sync;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use std::sync::Arc;

use tagkit_core::{
    ListingNotifier, RecordTagRepository, SchemaNames, TagDefinitionRepository,
    TagPolicyRepository,
};

pub use catalog::TagCatalogService;
pub use creation::TagCreationService;
pub use normalize::{Rejection, TagNormalizer};
pub use picker::{CommitOutcome, TagPicker};
pub use policy::TagPolicyService;
pub use session::{BulkTagSession, SessionState};
pub use sync::{merge_tags, BatchReport, BatchSync, RecordOutcome};

/// The services a session or picker needs, wired to one remote store.
#[derive(Clone)]
pub struct TagServices {
    pub catalog: TagCatalogService,
    pub creation: TagCreationService,
    pub policy: TagPolicyService,
    pub sync: BatchSync,
}

impl TagServices {
    /// Wire a record store to a separate listing notifier.
    pub fn new<S>(store: Arc<S>, notifier: Arc<dyn ListingNotifier>, schema: SchemaNames) -> Self
    where
        S: TagDefinitionRepository + TagPolicyRepository + RecordTagRepository + 'static,
    {
        Self {
            catalog: TagCatalogService::new(store.clone()),
            creation: TagCreationService::new(store.clone()),
            policy: TagPolicyService::new(store.clone(), schema),
            sync: BatchSync::new(store, notifier),
        }
    }

    /// Wire every service to a store implementing all collaborator traits.
    pub fn from_store<S>(store: Arc<S>, schema: SchemaNames) -> Self
    where
        S: TagDefinitionRepository
            + TagPolicyRepository
            + RecordTagRepository
            + ListingNotifier
            + 'static,
    {
        Self {
            catalog: TagCatalogService::new(store.clone()),
            creation: TagCreationService::new(store.clone()),
            policy: TagPolicyService::new(store.clone(), schema),
            sync: BatchSync::new(store.clone(), store),
        }
    }

    /// Build a picker bound to `value`, loading catalog and policy for
    /// `entity`.
    pub async fn picker(&self, value: &str, entity: &str) -> TagPicker {
        let mut picker = TagPicker::new(value, self.creation.clone());
        picker.set_catalog(self.catalog.fetch_all_tags().await);
        picker.set_policy(self.policy.resolve(entity).await);
        picker
    }
}
