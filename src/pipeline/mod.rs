//! Pipeline stages for grade polling.
//!
//! - `calculate_diff`: Compare a fresh walk against a stored snapshot
//! - `run_poll`: Check a batch of students concurrently

pub mod diff;
pub mod poll;

pub use diff::{DiffResult, NewSubject, calculate_diff};
pub use poll::{PollOutcome, StudentPoll, run_poll};
