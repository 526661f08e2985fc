//! Bulk tag popup session.
//!
//! ## States
//!
//! `Idle -> LoadingCatalog -> Ready -> Submitting -> Closed`
//!
//! `LoadingCatalog` is skipped in `clear` mode. Submitting always ends in
//! `Closed`, whatever happened to individual records. Cancelling from any
//! state before submit also closes the session without writing.

use serde::Serialize;
use tracing::{debug, info};

use tagkit_core::{Error, LaunchConfig, OperationMode, Result};

use crate::normalize::TagNormalizer;
use crate::sync::BatchReport;
use crate::TagServices;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    LoadingCatalog,
    Ready,
    Submitting,
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::LoadingCatalog => write!(f, "loading_catalog"),
            Self::Ready => write!(f, "ready"),
            Self::Submitting => write!(f, "submitting"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// One bulk tagging interaction over a launcher's selection.
pub struct BulkTagSession {
    launch: LaunchConfig,
    services: TagServices,
    normalizer: TagNormalizer,
    selected: Vec<String>,
    state: SessionState,
}

impl BulkTagSession {
    pub fn new(launch: LaunchConfig, services: TagServices) -> Self {
        let normalizer = TagNormalizer::new(services.creation.clone());
        Self {
            launch,
            services,
            normalizer,
            selected: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn launch(&self) -> &LaunchConfig {
        &self.launch
    }

    pub fn mode(&self) -> OperationMode {
        self.launch.mode
    }

    /// Catalog tags offered by the picker (formatted).
    pub fn available_tags(&self) -> &[String] {
        self.normalizer.catalog()
    }

    /// Current normalized selection.
    pub fn selected_tags(&self) -> &[String] {
        &self.selected
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            component = "session",
            from = %self.state,
            to = %next,
            "Session transition"
        );
        self.state = next;
    }

    fn expect_state(&self, expected: SessionState, op: &str) -> Result<()> {
        if self.state != expected {
            return Err(Error::InvalidInput(format!(
                "cannot {} while session is {}",
                op, self.state
            )));
        }
        Ok(())
    }

    /// Load the catalog and creation policy (skipped in `clear` mode).
    pub async fn open(&mut self) -> Result<()> {
        self.expect_state(SessionState::Idle, "open")?;

        if self.launch.mode.needs_catalog() {
            self.transition(SessionState::LoadingCatalog);
            let tags = self.services.catalog.fetch_all_tags().await;
            self.normalizer.set_catalog(tags);
            let policy = self.services.policy.resolve(&self.launch.entity_name).await;
            self.normalizer.set_policy(policy);
        }

        self.transition(SessionState::Ready);
        info!(
            component = "session",
            entity = %self.launch.entity_name,
            mode = %self.launch.mode,
            record_count = self.launch.selected_ids.len(),
            "Bulk tag session ready"
        );
        Ok(())
    }

    /// Replace the selection with the normalization of `input`.
    ///
    /// `input` is the picker's full comma-separated value.
    pub async fn set_input(&mut self, input: &str) -> Result<&[String]> {
        self.expect_state(SessionState::Ready, "edit tags")?;
        if self.launch.mode.needs_catalog() {
            self.selected = self.normalizer.normalize(input).await;
        }
        Ok(&self.selected)
    }

    /// Apply the selection to every launched record and close.
    pub async fn submit(&mut self) -> Result<BatchReport> {
        self.expect_state(SessionState::Ready, "submit")?;
        self.transition(SessionState::Submitting);

        let targets = self.launch.targets();
        let report = self
            .services
            .sync
            .apply(&targets, self.launch.mode, &self.selected)
            .await;

        self.transition(SessionState::Closed);
        Ok(report)
    }

    /// Close without writing anything.
    pub fn cancel(&mut self) {
        if self.state != SessionState::Submitting {
            self.transition(SessionState::Closed);
        }
    }
}
