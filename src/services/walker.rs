// src/services/walker.rs

//! Sequential term walk.
//!
//! Terms are opened by the institution in order, so the first term that is
//! empty or cannot be read marks the end of published data. The walk returns
//! the prefix of terms collected before that point.

use super::portal::PageSource;
use super::table::parse_semester;
use crate::error::Result;
use crate::models::{Credentials, PortalConfig, Semester, Subject};

/// Walks a student's terms from 1 upward.
pub struct SemesterWalker<'a, S: PageSource + ?Sized> {
    source: &'a S,
    config: &'a PortalConfig,
}

impl<'a, S: PageSource + ?Sized> SemesterWalker<'a, S> {
    pub fn new(source: &'a S, config: &'a PortalConfig) -> Self {
        Self { source, config }
    }

    /// Collect every published term, stopping at the first empty or failing
    /// one. Term N+1 is never requested before term N has been parsed.
    pub async fn fetch_all(&self, credentials: &Credentials) -> Vec<Semester> {
        let mut semesters = Vec::new();

        for number in 1..=self.config.max_semesters {
            match self.fetch_semester(credentials, number).await {
                Ok(subjects) if subjects.is_empty() => {
                    log::debug!(
                        "Semester {} for {} has no subjects, stopping",
                        number,
                        credentials.login
                    );
                    break;
                }
                Ok(subjects) => semesters.push(Semester::new(number, subjects)),
                Err(error) => {
                    log::info!(
                        "Parsing semesters for {} stopped at {}: {}",
                        credentials.login,
                        number,
                        error
                    );
                    break;
                }
            }
        }

        semesters
    }

    /// Fetch and parse a single term.
    pub async fn fetch_semester(&self, credentials: &Credentials, number: u32) -> Result<Vec<Subject>> {
        let url = self.config.semester_url(number)?;
        let markup = self.source.fetch_markup(credentials, &url).await?;
        parse_semester(&markup, number)
    }
}
