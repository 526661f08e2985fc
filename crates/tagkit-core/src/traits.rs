//! Collaborator traits for the remote record store.
//!
//! The engine never talks to a transport directly. Each concern the remote
//! store serves is a trait here, implemented by the Dataverse client and by
//! the in-memory store used in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{PolicyRow, RecordRef};
use crate::policy_keys::PolicyKey;

// =============================================================================
// TAG VOCABULARY
// =============================================================================

/// Read and extend the remote tag vocabulary.
#[async_trait]
pub trait TagDefinitionRepository: Send + Sync {
    /// Every tag name in the vocabulary, unfiltered, as stored.
    async fn list_tag_definitions(&self) -> Result<Vec<String>>;

    /// Names that start with, end with, or equal `candidate`.
    ///
    /// This is a superset query; callers filter for the exact match.
    async fn find_tag_definitions(&self, candidate: &str) -> Result<Vec<String>>;

    /// Create a vocabulary entry and return its id.
    ///
    /// The store does not enforce uniqueness.
    async fn create_tag_definition(&self, name: &str) -> Result<String>;
}

// =============================================================================
// TAG POLICY
// =============================================================================

/// Read the per-entity tag creation policy.
#[async_trait]
pub trait TagPolicyRepository: Send + Sync {
    /// Policy rows whose entity classification equals `key`.
    async fn list_tag_policies(&self, key: PolicyKey) -> Result<Vec<PolicyRow>>;
}

// =============================================================================
// TAGGED RECORDS
// =============================================================================

/// Read and write the Tag Field Value of a record.
#[async_trait]
pub trait RecordTagRepository: Send + Sync {
    /// Current Tag Field Value; `None` when the field is null.
    ///
    /// A deleted record is `Err(Error::NotFound)`.
    async fn get_tag_field(&self, record: &RecordRef) -> Result<Option<String>>;

    /// Overwrite the Tag Field Value.
    async fn update_tag_field(&self, record: &RecordRef, value: &str) -> Result<()>;
}

// =============================================================================
// HOST NOTIFICATIONS
// =============================================================================

/// Signals back to the list view that launched a batch.
#[async_trait]
pub trait ListingNotifier: Send + Sync {
    /// Ask the hosting listing to refresh, pivoting on one record.
    async fn refresh_listing(&self, entity: &str, pivot_id: &str) -> Result<()>;
}
