//! In-memory remote store for deterministic testing.
//!
//! Implements every collaborator trait over plain collections, records each
//! call for assertions, and can be told to fail specific operations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagkit_engine::mock::MemoryStore;
//! use tagkit_engine::TagServices;
//!
//! let store = Arc::new(
//!     MemoryStore::new()
//!         .with_tags(["Billing", "Urgent"])
//!         .with_record("account", "a1", "Billing"),
//! );
//! let services = TagServices::from_store(store.clone(), Default::default());
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tagkit_core::{
    Error, ListingNotifier, PolicyKey, PolicyRow, RecordRef, RecordTagRepository, Result,
    TagDefinitionRepository, TagPolicyRepository,
};

/// A call made against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListTags,
    FindTags(String),
    CreateTag(String),
    ListPolicies(PolicyKey),
    GetRecord(RecordRef),
    UpdateRecord(RecordRef, String),
    Refresh { entity: String, pivot_id: String },
}

#[derive(Debug, Default)]
struct StoreState {
    tags: Vec<String>,
    policies: Vec<PolicyRow>,
    records: HashMap<RecordRef, Option<String>>,
    next_id: u64,
}

#[derive(Debug, Default, Clone)]
struct Failures {
    catalog: bool,
    creates: bool,
    policies: bool,
    reads: HashSet<String>,
    writes: HashSet<String>,
}

/// In-memory implementation of the remote store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    failures: Arc<Failures>,
    call_log: Arc<Mutex<Vec<StoreCall>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tag vocabulary.
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .tags
            .extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add tags to the vocabulary of an existing store, as another session
    /// creating them remotely would.
    pub fn add_tags<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .tags
            .extend(tags.into_iter().map(Into::into));
    }

    /// Seed a policy row.
    pub fn with_policy(self, key: u32, allow_tag_creation: bool) -> Self {
        self.state.lock().unwrap().policies.push(PolicyRow {
            entity_key: key,
            allow_tag_creation,
        });
        self
    }

    /// Seed a record with a Tag Field Value.
    pub fn with_record(self, entity: &str, id: &str, tags: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(RecordRef::new(entity, id), Some(tags.to_string()));
        self
    }

    /// Seed a record whose Tag Field Value is null.
    pub fn with_empty_record(self, entity: &str, id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(RecordRef::new(entity, id), None);
        self
    }

    pub fn failing_catalog(mut self) -> Self {
        Arc::make_mut(&mut self.failures).catalog = true;
        self
    }

    pub fn failing_creates(mut self) -> Self {
        Arc::make_mut(&mut self.failures).creates = true;
        self
    }

    pub fn failing_policies(mut self) -> Self {
        Arc::make_mut(&mut self.failures).policies = true;
        self
    }

    /// Make reads of the record with this id fail.
    pub fn failing_read(mut self, id: &str) -> Self {
        Arc::make_mut(&mut self.failures).reads.insert(id.to_string());
        self
    }

    /// Make writes to the record with this id fail.
    pub fn failing_write(mut self, id: &str) -> Self {
        Arc::make_mut(&mut self.failures).writes.insert(id.to_string());
        self
    }

    /// Current Tag Field Value of a record (`None` if absent or null).
    pub fn tag_field(&self, entity: &str, id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(&RecordRef::new(entity, id))
            .cloned()
            .flatten()
    }

    /// Current vocabulary, including created tags.
    pub fn tags(&self) -> Vec<String> {
        self.state.lock().unwrap().tags.clone()
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn count(&self, pred: impl Fn(&StoreCall) -> bool) -> usize {
        self.call_log.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn find_call_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::FindTags(_)))
    }

    pub fn create_call_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::CreateTag(_)))
    }

    pub fn policy_call_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::ListPolicies(_)))
    }

    pub fn read_call_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::GetRecord(_)))
    }

    pub fn write_call_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::UpdateRecord(..)))
    }

    /// Refresh signals as `(entity, pivot_id)` pairs.
    pub fn refreshes(&self) -> Vec<(String, String)> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                StoreCall::Refresh { entity, pivot_id } => Some((entity.clone(), pivot_id.clone())),
                _ => None,
            })
            .collect()
    }

    fn log(&self, call: StoreCall) {
        self.call_log.lock().unwrap().push(call);
    }

    fn unavailable(what: &str) -> Error {
        Error::Remote {
            status: 503,
            message: format!("simulated {} failure", what),
        }
    }
}

#[async_trait]
impl TagDefinitionRepository for MemoryStore {
    async fn list_tag_definitions(&self) -> Result<Vec<String>> {
        self.log(StoreCall::ListTags);
        if self.failures.catalog {
            return Err(Self::unavailable("catalog"));
        }
        Ok(self.tags())
    }

    async fn find_tag_definitions(&self, candidate: &str) -> Result<Vec<String>> {
        self.log(StoreCall::FindTags(candidate.to_string()));
        if self.failures.creates {
            return Err(Self::unavailable("lookup"));
        }
        // Dataverse string operators compare case-insensitively.
        let wanted = candidate.to_lowercase();
        Ok(self
            .tags()
            .into_iter()
            .filter(|t| {
                let t = t.to_lowercase();
                t.starts_with(&wanted) || t.ends_with(&wanted) || t == wanted
            })
            .collect())
    }

    async fn create_tag_definition(&self, name: &str) -> Result<String> {
        self.log(StoreCall::CreateTag(name.to_string()));
        if self.failures.creates {
            return Err(Self::unavailable("create"));
        }
        let mut state = self.state.lock().unwrap();
        state.tags.push(name.to_string());
        state.next_id += 1;
        Ok(format!("tagdef-{}", state.next_id))
    }
}

#[async_trait]
impl TagPolicyRepository for MemoryStore {
    async fn list_tag_policies(&self, key: PolicyKey) -> Result<Vec<PolicyRow>> {
        self.log(StoreCall::ListPolicies(key));
        if self.failures.policies {
            return Err(Self::unavailable("policy"));
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .policies
            .iter()
            .filter(|row| row.entity_key == key.0)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordTagRepository for MemoryStore {
    async fn get_tag_field(&self, record: &RecordRef) -> Result<Option<String>> {
        self.log(StoreCall::GetRecord(record.clone()));
        if self.failures.reads.contains(&record.id) {
            return Err(Self::unavailable("read"));
        }
        self.state
            .lock()
            .unwrap()
            .records
            .get(record)
            .cloned()
            .ok_or_else(|| Error::NotFound(record.to_string()))
    }

    async fn update_tag_field(&self, record: &RecordRef, value: &str) -> Result<()> {
        self.log(StoreCall::UpdateRecord(record.clone(), value.to_string()));
        if self.failures.writes.contains(&record.id) {
            return Err(Self::unavailable("write"));
        }
        let mut state = self.state.lock().unwrap();
        match state.records.get_mut(record) {
            Some(field) => {
                *field = Some(value.to_string());
                Ok(())
            }
            None => Err(Error::NotFound(record.to_string())),
        }
    }
}

#[async_trait]
impl ListingNotifier for MemoryStore {
    async fn refresh_listing(&self, entity: &str, pivot_id: &str) -> Result<()> {
        self.log(StoreCall::Refresh {
            entity: entity.to_string(),
            pivot_id: pivot_id.to_string(),
        });
        Ok(())
    }
}
