//! Headless state of the tag picker field control.
//!
//! The control is bound to one record's Tag Field Value. It offers catalog
//! options filtered by the typed query, lets the user pick options from the
//! dropdown, and commits free text on Enter (creating the tag when the policy
//! allows it). Rendering is left to the host.

use tracing::{debug, trace, warn};

use tagkit_core::defaults::{MIN_COMMIT_LEN, NO_MATCHES_OPTION, TAG_SEPARATOR};
use tagkit_core::tags::{find_tag, format_tag, join_tags, sort_tags, split_candidates};
use tagkit_core::TagPolicy;

use crate::creation::TagCreationService;

/// Result of a keyed (Enter) commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The tag was added to the selection.
    Added(String),
    /// The tag is already selected; the query is cleared and nothing changes.
    AlreadySelected,
    /// The query was blank.
    Empty,
    /// The query is shorter than the minimum commit length.
    TooShort,
    /// The query contains the tag separator; a tag never holds a comma.
    ContainsSeparator,
    /// The control is disabled.
    Disabled,
    /// Creation refused: the policy lookup has not settled.
    PolicyUnresolved,
    /// Creation refused by policy.
    PolicyDenied,
    /// The remote create failed.
    CreationFailed,
}

impl CommitOutcome {
    /// Whether the input box should be cleared after this commit.
    pub fn clears_query(&self) -> bool {
        matches!(self, Self::Added(_) | Self::AlreadySelected)
    }
}

pub struct TagPicker {
    selected: Vec<String>,
    options: Vec<String>,
    policy: TagPolicy,
    disabled: bool,
    creation: TagCreationService,
}

impl TagPicker {
    /// Create a picker from the bound Tag Field Value.
    ///
    /// The value is normalized on load: pieces are trimmed, empty pieces
    /// dropped and each tag gets its first letter uppercased, so a value
    /// written by hand (`"billing, urgent"`) reads back as canonical tags.
    /// Dropdown selections are formatted the same way.
    pub fn new(value: &str, creation: TagCreationService) -> Self {
        Self {
            selected: split_candidates(value).iter().map(|t| format_tag(t)).collect(),
            options: Vec::new(),
            policy: TagPolicy::Unresolved,
            disabled: false,
            creation,
        }
    }

    pub fn set_catalog(&mut self, tags: Vec<String>) {
        self.options = tags.iter().map(|t| format_tag(t)).collect();
    }

    pub fn set_policy(&mut self, policy: TagPolicy) {
        self.policy = policy;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The bound output: selected tags joined with commas.
    pub fn value(&self) -> String {
        join_tags(&self.selected)
    }

    /// Catalog options to show for `query`: not yet selected, containing the
    /// query ignoring case.
    pub fn filter_options(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        let mut matches: Vec<String> = self
            .options
            .iter()
            .filter(|o| !self.selected.contains(o) && o.to_lowercase().contains(&query))
            .cloned()
            .collect();
        sort_tags(&mut matches);
        trace!(
            component = "picker",
            result_count = matches.len(),
            "Filtered options"
        );
        matches
    }

    /// Replace the selection from a dropdown pick.
    ///
    /// `clicked` is the option the user activated; the "no matches"
    /// placeholder is ignored. Returns `true` when the selection changed.
    pub fn select_options(&mut self, clicked: &str, selected: Vec<String>) -> bool {
        if self.disabled || clicked == NO_MATCHES_OPTION {
            return false;
        }
        self.selected = selected.iter().map(|t| format_tag(t)).collect();
        true
    }

    /// Commit the typed query as a tag.
    pub async fn commit(&mut self, query: &str) -> CommitOutcome {
        if self.disabled {
            return CommitOutcome::Disabled;
        }
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return CommitOutcome::Empty;
        }
        if trimmed.contains(TAG_SEPARATOR) {
            warn!(component = "picker", tag = %trimmed, "Tag contains separator");
            return CommitOutcome::ContainsSeparator;
        }
        if trimmed.chars().count() < MIN_COMMIT_LEN {
            warn!(component = "picker", tag = %trimmed, "Tag too short");
            return CommitOutcome::TooShort;
        }

        let formatted = format_tag(trimmed);
        if find_tag(&self.selected, &formatted).is_some() {
            debug!(component = "picker", tag = %formatted, "Tag already selected");
            return CommitOutcome::AlreadySelected;
        }

        if let Some(existing) = find_tag(&self.options, &formatted).cloned() {
            return self.add(existing);
        }

        match self.policy {
            TagPolicy::Unresolved => {
                warn!(component = "picker", tag = %formatted, "Tag creation: still loading tag setting");
                return CommitOutcome::PolicyUnresolved;
            }
            TagPolicy::Denied => {
                warn!(component = "picker", tag = %formatted, "Tag creation: not allowed");
                return CommitOutcome::PolicyDenied;
            }
            TagPolicy::Allowed => {}
        }

        match self.creation.create_new_tag(&formatted).await {
            Some(created) => {
                self.options.push(created.clone());
                self.add(created)
            }
            None => CommitOutcome::CreationFailed,
        }
    }

    fn add(&mut self, tag: String) -> CommitOutcome {
        self.selected.push(tag.clone());
        sort_tags(&mut self.selected);
        CommitOutcome::Added(tag)
    }
}
