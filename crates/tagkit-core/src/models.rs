//! Data model shared by the engine and the remote store adapters.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// SCHEMA NAMING
// =============================================================================

/// Entity and field names derived from one schema prefix.
///
/// Deployments differ only by publisher prefix (`evergrn_tags` vs
/// `new_tags`), so every name is computed from the prefix instead of being
/// hard-coded per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNames {
    prefix: String,
}

impl Default for SchemaNames {
    fn default() -> Self {
        Self::new(defaults::SCHEMA_PREFIX)
    }
}

impl SchemaNames {
    /// Create schema names for the given prefix. A trailing underscore is
    /// accepted and stripped.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim().trim_end_matches('_').to_string();
        Self { prefix }
    }

    /// Check that the prefix is usable as a Dataverse publisher prefix.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::Config("schema prefix cannot be empty".to_string()));
        }
        if !self
            .prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(Error::Config(format!(
                "schema prefix must be lowercase alphanumeric, got: {}",
                self.prefix
            )));
        }
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix a custom name: `case` becomes `evergrn_case`.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }

    /// Strip this prefix from a logical name, if present.
    pub fn strip<'a>(&self, logical_name: &'a str) -> Option<&'a str> {
        logical_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
    }

    /// Tag vocabulary entity.
    pub fn tag_definition_entity(&self) -> String {
        self.qualify("tagdefinition")
    }

    /// Primary key column of the tag vocabulary entity.
    pub fn tag_definition_id_field(&self) -> String {
        self.qualify("tagdefinitionid")
    }

    /// Name column of the tag vocabulary entity.
    pub fn tag_name_field(&self) -> String {
        self.qualify("name")
    }

    /// Tag policy entity.
    pub fn tag_settings_entity(&self) -> String {
        self.qualify("tagsettings")
    }

    /// Policy column holding the entity classification key.
    pub fn policy_entity_field(&self) -> String {
        self.qualify("entityname")
    }

    /// Policy column holding the allow-creation flag.
    pub fn policy_allow_field(&self) -> String {
        self.qualify("allowtagcreation")
    }

    /// Tag Field Value column on tagged records.
    pub fn tags_field(&self) -> String {
        self.qualify("tags")
    }

    /// Entity the popup targets when the launcher does not name one.
    pub fn default_entity(&self) -> String {
        self.qualify(defaults::DEFAULT_ENTITY_SUFFIX)
    }
}

// =============================================================================
// RECORDS AND MODES
// =============================================================================

/// Identifies a record whose Tag Field Value is read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub entity: String,
    pub id: String,
}

impl RecordRef {
    pub fn new(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.entity, self.id)
    }
}

/// How the selected tags are applied to each target record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Add,
    Remove,
    Clear,
}

impl OperationMode {
    /// Parse a launcher-supplied mode. Anything other than `remove` or
    /// `clear` (case-insensitive) is treated as `add`.
    pub fn from_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Whether this mode needs the tag catalog (and a tag selection) at all.
    pub fn needs_catalog(&self) -> bool {
        !matches!(self, Self::Clear)
    }

    /// Prompt shown above the picker.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Add => "Select or enter tags to add:",
            Self::Remove => "Select tags to remove:",
            Self::Clear => "Are you sure you want to clear all tags from the selected records? This action cannot be undone.",
        }
    }

    /// Label of the submit action.
    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Clear => "Clear",
        }
    }
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

impl std::str::FromStr for OperationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "clear" => Ok(Self::Clear),
            _ => Err(Error::InvalidInput(format!("Invalid operation mode: {}", s))),
        }
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// In-memory state of the tag creation policy for the active entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagPolicy {
    /// Lookup still in flight; creation is refused until it settles.
    #[default]
    Unresolved,
    Allowed,
    Denied,
}

impl TagPolicy {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Self::Allowed
        } else {
            Self::Denied
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// One row of the remote tag policy store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRow {
    /// Entity classification key the row applies to.
    pub entity_key: u32,
    /// Whether ad-hoc tag creation is allowed.
    pub allow_tag_creation: bool,
}

// =============================================================================
// LAUNCH CONFIGURATION
// =============================================================================

/// Parameters handed to a bulk tag session at launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub selected_ids: Vec<String>,
    pub mode: OperationMode,
    pub entity_name: String,
}

/// Wire shape of the list-view launcher payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchPayload {
    #[serde(default)]
    selected_ids: Vec<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    entity_logical_name: Option<String>,
}

impl LaunchConfig {
    pub fn new(
        selected_ids: Vec<String>,
        mode: OperationMode,
        entity_name: impl Into<String>,
    ) -> Self {
        Self {
            selected_ids,
            mode,
            entity_name: entity_name.into(),
        }
    }

    /// Parse the launcher payload
    /// (`{"selectedIds": [...], "mode": "add", "entityLogicalName": "account"}`).
    ///
    /// A missing or unknown mode means `add`; a missing or blank entity
    /// means the schema's default entity.
    pub fn from_json(payload: &str, schema: &SchemaNames) -> Result<Self> {
        let raw: LaunchPayload = serde_json::from_str(payload)?;
        let mode = raw
            .mode
            .as_deref()
            .map(OperationMode::from_lenient)
            .unwrap_or_default();
        let entity_name = raw
            .entity_logical_name
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| schema.default_entity());

        Ok(Self {
            selected_ids: raw.selected_ids,
            mode,
            entity_name,
        })
    }

    /// Target record references in launch order.
    pub fn targets(&self) -> Vec<RecordRef> {
        self.selected_ids
            .iter()
            .map(|id| RecordRef::new(self.entity_name.clone(), id.clone()))
            .collect()
    }
}
