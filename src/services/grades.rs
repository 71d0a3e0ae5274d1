// src/services/grades.rs

//! Grade service: the polling entry points.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::auth;
use super::portal::{PageSource, PortalClient};
use super::walker::SemesterWalker;
use crate::error::Result;
use crate::models::{ChangeEvent, Config, Credentials, Semester};
use crate::pipeline::diff::{DiffResult, calculate_diff};

/// Result of one student's update check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Changes against the previous snapshot
    pub diff: DiffResult,
    /// Freshly walked semesters, to be stored as the next snapshot
    pub semesters: Vec<Semester>,
    pub checked_at: DateTime<Utc>,
}

impl UpdateOutcome {
    /// Split into the change events and the new snapshot.
    pub fn into_parts(self) -> (Vec<ChangeEvent>, Vec<Semester>) {
        (self.diff.changes, self.semesters)
    }
}

/// Service for checking students' grades against the portal.
///
/// Holds no per-student state: every call logs in on its own session, so one
/// service can be shared by concurrent polls.
pub struct GradeService<S: PageSource = PortalClient> {
    config: Arc<Config>,
    source: S,
}

impl GradeService<PortalClient> {
    /// Create a service talking to the live portal.
    pub fn new(config: Arc<Config>) -> Self {
        let source = PortalClient::new(Arc::new(config.portal.clone()));
        Self::with_source(config, source)
    }
}

impl<S: PageSource> GradeService<S> {
    /// Create a service over a custom page source.
    pub fn with_source(config: Arc<Config>, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the credentials log in. Never fails.
    pub async fn check_password(&self, credentials: &Credentials) -> bool {
        auth::check_password(&self.source, &self.config.portal, credentials).await
    }

    /// Every currently published semester, from the first upward.
    pub async fn fetch_all_semesters(&self, credentials: &Credentials) -> Vec<Semester> {
        SemesterWalker::new(&self.source, &self.config.portal)
            .fetch_all(credentials)
            .await
    }

    /// Walk the portal and diff the result against `previous`.
    ///
    /// Fails when no semester could be read at all.
    pub async fn check_for_updates(
        &self,
        credentials: &Credentials,
        previous: &[Semester],
    ) -> Result<UpdateOutcome> {
        let semesters = self.fetch_all_semesters(credentials).await;
        let diff = calculate_diff(&credentials.login, previous, &semesters)?;

        log::info!(
            "Checked {}: {} semesters, {} changes",
            credentials.login,
            semesters.len(),
            diff.change_count()
        );

        Ok(UpdateOutcome {
            diff,
            semesters,
            checked_at: Utc::now(),
        })
    }
}
