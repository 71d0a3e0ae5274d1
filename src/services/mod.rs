//! Service layer for the grade watcher.
//!
//! This module contains the business logic for:
//! - Page fetching over per-call portal sessions (`PortalClient`)
//! - Grades table parsing (`table`)
//! - Credential checks (`auth`)
//! - Sequential term walks (`SemesterWalker`)
//! - The polling entry points (`GradeService`)

pub mod auth;
mod grades;
mod portal;
pub mod table;
mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use grades::{GradeService, UpdateOutcome};
pub use portal::{PageSource, PortalClient, PortalSession};
pub use walker::SemesterWalker;
