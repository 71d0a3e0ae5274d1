// src/pipeline/poll.rs

//! Batch polling pipeline.
//!
//! Checks many students concurrently. Each student's check is independent:
//! it runs on its own portal sessions and its failure is recorded, never
//! propagated to the rest of the batch.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{ChangeEvent, Student};
use crate::services::{GradeService, PageSource, UpdateOutcome};

/// Result of polling one student.
#[derive(Debug)]
pub struct StudentPoll {
    pub login: String,
    pub result: Result<UpdateOutcome>,
}

/// Summary of a batch poll.
#[derive(Debug)]
pub struct PollOutcome {
    /// Per-student results, in completion order
    pub polls: Vec<StudentPoll>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl PollOutcome {
    /// All change events of successful polls.
    pub fn changes(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.polls
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .flat_map(|outcome| outcome.diff.changes.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.polls.iter().filter(|p| p.result.is_err()).count()
    }
}

/// Check every student for updates, at most `poll.max_concurrent` at once.
pub async fn run_poll<S: PageSource>(service: &GradeService<S>, students: &[Student]) -> PollOutcome {
    let start_time = Utc::now();
    let delay = Duration::from_millis(service.config().poll.request_delay_ms);
    let concurrency = service.config().poll.max_concurrent.max(1);

    log::info!(
        "Polling {} students ({} at a time)",
        students.len(),
        concurrency
    );

    let mut poll_stream = stream::iter(students)
        .map(|student| async move {
            let result = service
                .check_for_updates(&student.credentials, &student.semesters)
                .await;
            // Pause inside the worker; the stream keeps driving the others.
            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
            StudentPoll {
                login: student.login().to_string(),
                result,
            }
        })
        .buffer_unordered(concurrency);

    let mut polls = Vec::with_capacity(students.len());
    while let Some(poll) = poll_stream.next().await {
        if let Err(error) = &poll.result {
            log::warn!("Failed to check updates for {}: {}", poll.login, error);
        }
        polls.push(poll);
    }

    let outcome = PollOutcome {
        polls,
        start_time,
        end_time: Utc::now(),
    };

    log::info!(
        "Poll complete: {} students, {} failures, {} changes",
        students.len(),
        outcome.failure_count(),
        outcome.changes().count()
    );

    outcome
}
