//! Centralized default constants for tagkit.
//!
//! Crates reference these constants instead of repeating literals.

// =============================================================================
// TAG TEXT
// =============================================================================

/// Separator used inside a Tag Field Value.
pub const TAG_SEPARATOR: char = ',';

/// Minimum length of a keyed (Enter) commit in the field control.
pub const MIN_COMMIT_LEN: usize = 2;

/// Option value the picker dropdown uses for its "No matches found" row.
pub const NO_MATCHES_OPTION: &str = "no-matches";

// =============================================================================
// SCHEMA
// =============================================================================

/// Default schema (publisher) prefix for custom entities and fields.
pub const SCHEMA_PREFIX: &str = "evergrn";

/// Entity name used by the popup when the launcher omits one (without prefix).
pub const DEFAULT_ENTITY_SUFFIX: &str = "case";

// =============================================================================
// DATAVERSE
// =============================================================================

/// Default Web API version segment.
pub const API_VERSION: &str = "v9.2";

/// Default HTTP timeout for Web API requests (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;
