// src/lib.rs

//! Grade watcher library
//!
//! Logs in to the RITM grading portal as a student, walks the published
//! terms and reports field-level grade changes against a stored snapshot.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
pub use models::{ChangeEvent, Credentials, FieldKind, Semester, Student, Subject};
pub use services::{GradeService, UpdateOutcome};
