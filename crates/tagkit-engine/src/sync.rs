//! Batch apply: write a tag selection to many records.
//!
//! Records are processed strictly one at a time. A failure on one record is
//! logged and recorded in the report; the loop moves on to the next record.
//! The batch itself always completes.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tagkit_core::tags::{dedup_exact, join_tags, parse_field_value, sort_tags};
use tagkit_core::{
    ListingNotifier, OperationMode, RecordRef, RecordTagRepository, Result,
};

/// Compute the new Tag Field Value of one record.
///
/// `add` is a case-sensitive union and `remove` drops exact matches; the
/// selection is expected to hold canonical tags already.
pub fn merge_tags(mode: OperationMode, current: Option<&str>, selected: &[String]) -> String {
    let mut tags = match mode {
        OperationMode::Clear => return String::new(),
        OperationMode::Add => {
            let mut all = parse_field_value(current);
            all.extend(selected.iter().cloned());
            dedup_exact(all)
        }
        OperationMode::Remove => parse_field_value(current)
            .into_iter()
            .filter(|t| !selected.contains(t))
            .collect(),
    };
    sort_tags(&mut tags);
    join_tags(&tags)
}

/// Outcome of one record in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Updated { record: RecordRef, value: String },
    Skipped { record: RecordRef, error: String },
}

impl RecordOutcome {
    pub fn record(&self) -> &RecordRef {
        match self {
            Self::Updated { record, .. } | Self::Skipped { record, .. } => record,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub mode: OperationMode,
    pub outcomes: Vec<RecordOutcome>,
    /// Record the listing refresh pivoted on, if one was sent.
    pub refresh_pivot: Option<RecordRef>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn updated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_updated()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.updated_count()
    }
}

/// Applies add/remove/clear to a list of target records.
#[derive(Clone)]
pub struct BatchSync {
    records: Arc<dyn RecordTagRepository>,
    notifier: Arc<dyn ListingNotifier>,
}

impl BatchSync {
    pub fn new(records: Arc<dyn RecordTagRepository>, notifier: Arc<dyn ListingNotifier>) -> Self {
        Self { records, notifier }
    }

    async fn apply_one(
        &self,
        record: &RecordRef,
        mode: OperationMode,
        selected: &[String],
    ) -> Result<String> {
        let value = match mode {
            OperationMode::Clear => String::new(),
            _ => {
                let current = self.records.get_tag_field(record).await?;
                merge_tags(mode, current.as_deref(), selected)
            }
        };
        self.records.update_tag_field(record, &value).await?;
        Ok(value)
    }

    /// Apply `mode` with `selected` to every target, in order.
    pub async fn apply(
        &self,
        targets: &[RecordRef],
        mode: OperationMode,
        selected: &[String],
    ) -> BatchReport {
        let batch_id = Uuid::now_v7();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            subsystem = "engine",
            component = "batch_sync",
            batch_id = %batch_id,
            mode = %mode,
            record_count = targets.len(),
            tag_count = selected.len(),
            "Starting batch apply"
        );

        let mut outcomes = Vec::with_capacity(targets.len());
        for record in targets {
            match self.apply_one(record, mode, selected).await {
                Ok(value) => {
                    debug!(
                        batch_id = %batch_id,
                        entity = %record.entity,
                        record_id = %record.id,
                        value = %value,
                        "Updated record tags"
                    );
                    outcomes.push(RecordOutcome::Updated {
                        record: record.clone(),
                        value,
                    });
                }
                Err(e) => {
                    warn!(
                        batch_id = %batch_id,
                        entity = %record.entity,
                        record_id = %record.id,
                        error = %e,
                        "Skipped record"
                    );
                    outcomes.push(RecordOutcome::Skipped {
                        record: record.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let refresh_pivot = match targets.first() {
            Some(pivot) => {
                if let Err(e) = self.notifier.refresh_listing(&pivot.entity, &pivot.id).await {
                    warn!(
                        batch_id = %batch_id,
                        entity = %pivot.entity,
                        record_id = %pivot.id,
                        error = %e,
                        "Listing refresh failed"
                    );
                }
                Some(pivot.clone())
            }
            None => None,
        };

        let report = BatchReport {
            batch_id,
            mode,
            outcomes,
            refresh_pivot,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            subsystem = "engine",
            component = "batch_sync",
            batch_id = %batch_id,
            updated = report.updated_count(),
            skipped = report.skipped_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch apply complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_clear() {
        assert_eq!(merge_tags(OperationMode::Clear, Some("A,B"), &strings(&["A"])), "");
    }

    #[test]
    fn test_merge_add_union_sorted() {
        assert_eq!(
            merge_tags(OperationMode::Add, Some("Urgent,Billing"), &strings(&["Vip", "Billing"])),
            "Billing,Urgent,Vip"
        );
    }

    #[test]
    fn test_merge_add_to_empty_field() {
        assert_eq!(merge_tags(OperationMode::Add, None, &strings(&["Vip"])), "Vip");
    }

    #[test]
    fn test_merge_add_subset_is_idempotent() {
        let value = merge_tags(OperationMode::Add, Some("Billing,Urgent"), &strings(&["Urgent"]));
        assert_eq!(value, "Billing,Urgent");
        assert_eq!(
            merge_tags(OperationMode::Add, Some(&value), &strings(&["Urgent"])),
            value
        );
    }

    #[test]
    fn test_merge_add_is_case_sensitive_union() {
        assert_eq!(
            merge_tags(OperationMode::Add, Some("bug"), &strings(&["Bug"])),
            "bug,Bug"
        );
    }

    #[test]
    fn test_merge_remove() {
        assert_eq!(
            merge_tags(OperationMode::Remove, Some("Billing,Urgent,Vip"), &strings(&["Urgent"])),
            "Billing,Vip"
        );
    }

    #[test]
    fn test_merge_remove_absent_tag_only_resorts() {
        assert_eq!(
            merge_tags(OperationMode::Remove, Some(" Vip , Billing"), &strings(&["Urgent"])),
            "Billing,Vip"
        );
    }

    #[test]
    fn test_record_outcome_accessors() {
        let record = RecordRef::new("account", "1");
        let outcome = RecordOutcome::Skipped {
            record: record.clone(),
            error: "boom".to_string(),
        };
        assert_eq!(outcome.record(), &record);
        assert!(!outcome.is_updated());
    }
}
