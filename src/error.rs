// src/error.rs

//! Unified error handling for the grade watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for grade watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Grades table cell count is not a whole number of rows
    #[error("Malformed grades table: {cells} cells is not a multiple of {width}")]
    MalformedTable { cells: usize, width: usize },

    /// The semester walk produced nothing to compare against
    #[error("Parsed zero semesters")]
    NoSemesters,

    /// Portal interaction failed
    #[error("Portal error for {context}: {message}")]
    Portal { context: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a portal error with context.
    pub fn portal(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Portal {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
