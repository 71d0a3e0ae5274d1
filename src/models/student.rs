//! A polled student: credentials plus last-known snapshot.

use serde::{Deserialize, Serialize};

use super::{Credentials, Semester};

/// Input unit of a batch poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Snapshot as of the last successful poll
    #[serde(default)]
    pub semesters: Vec<Semester>,
}

impl Student {
    pub fn login(&self) -> &str {
        &self.credentials.login
    }
}
