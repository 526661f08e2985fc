//! Structured logging field name constants for tagkit.
//!
//! All crates use these constants so log queries can filter on the same
//! field names regardless of which subsystem emitted the event.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Remote call failed and a safe default was substituted |
//! | WARN  | Candidate rejected, record skipped, permissive fallback applied |
//! | INFO  | Batch lifecycle (start, completion), session transitions |
//! | DEBUG | Decision points (catalog hit, policy result, per-record value) |
//! | TRACE | Per-item iteration (option filtering, raw responses) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one batch submission.
/// Format: UUIDv7 (time-ordered).
pub const BATCH_ID: &str = "batch_id";

/// Subsystem originating the log event.
/// Values: "engine", "dataverse", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "normalizer", "batch_sync", "policy", "catalog"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "normalize", "create_tag", "apply", "refresh"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Entity logical name (e.g. "account").
pub const ENTITY: &str = "entity";

/// Record id being read or written.
pub const RECORD_ID: &str = "record_id";

/// Tag candidate or canonical tag name.
pub const TAG: &str = "tag";

/// Operation mode ("add", "remove", "clear").
pub const MODE: &str = "mode";

/// Policy classification key resolved for an entity.
pub const POLICY_KEY: &str = "policy_key";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of records targeted by a batch.
pub const RECORD_COUNT: &str = "record_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
