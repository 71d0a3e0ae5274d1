// src/models/mod.rs

//! Domain models for the grade watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod change;
mod config;
mod credentials;
mod grades;
mod student;

// Re-export all public types
pub use change::{ChangeEvent, FieldKind};
pub use config::{Config, NotifyConfig, PollConfig, PortalConfig};
pub use credentials::Credentials;
pub use grades::{Semester, Subject};
pub use student::Student;
