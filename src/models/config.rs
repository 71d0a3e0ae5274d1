//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::join_url;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Portal addresses and HTTP behavior
    #[serde(default)]
    pub portal: PortalConfig,

    /// Batch polling settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Change notification rendering
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.portal.login_url()?;
        self.portal.grades_url()?;
        if self.portal.user_agent.trim().is_empty() {
            return Err(AppError::validation("portal.user_agent is empty"));
        }
        if self.portal.login_page_title.trim().is_empty() {
            return Err(AppError::validation("portal.login_page_title is empty"));
        }
        if self.portal.timeout_secs == 0 {
            return Err(AppError::validation("portal.timeout_secs must be > 0"));
        }
        if self.portal.max_semesters == 0 {
            return Err(AppError::validation("portal.max_semesters must be > 0"));
        }
        if self.poll.max_concurrent == 0 {
            return Err(AppError::validation("poll.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

/// Portal addresses and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal root, e.g. `http://ritm.ispu.ru`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Login form target, relative to `base_url`
    #[serde(default = "defaults::login_path")]
    pub login_path: String,

    /// Grades page, relative to `base_url`
    #[serde(default = "defaults::grades_path")]
    pub grades_path: String,

    /// Title of the page the portal serves to unauthenticated sessions
    #[serde(default = "defaults::login_page_title")]
    pub login_page_title: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Upper bound on the number of terms walked
    #[serde(default = "defaults::max_semesters")]
    pub max_semesters: u32,
}

impl PortalConfig {
    /// Portal configuration rooted at another address.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn login_url(&self) -> Result<Url> {
        join_url(&self.base_url, &self.login_path)
    }

    pub fn grades_url(&self) -> Result<Url> {
        join_url(&self.base_url, &self.grades_path)
    }

    /// Grades page for a single term.
    pub fn semester_url(&self, semester: u32) -> Result<Url> {
        let mut url = self.grades_url()?;
        url.query_pairs_mut()
            .append_pair("semester", &semester.to_string());
        Ok(url)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            login_path: defaults::login_path(),
            grades_path: defaults::grades_path(),
            login_page_title: defaults::login_page_title(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_semesters: defaults::max_semesters(),
        }
    }
}

/// Batch polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum students polled at once
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Pause a worker holds after each student, in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: 0,
        }
    }
}

/// Change notification rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Template passed to `ChangeEvent::format`
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            template: defaults::template(),
        }
    }
}

mod defaults {
    // Portal defaults
    pub fn base_url() -> String {
        "http://ritm.ispu.ru".into()
    }
    pub fn login_path() -> String {
        "/login".into()
    }
    pub fn grades_path() -> String {
        "/profile/grades".into()
    }
    pub fn login_page_title() -> String {
        "Вход в систему / РИТМ.Рейтинг".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; grades/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_semesters() -> u32 {
        12
    }

    // Poll defaults
    pub fn max_concurrent() -> usize {
        5
    }

    // Notify defaults
    pub fn template() -> String {
        "[{student}] Semester {semester}, {subject}: {field} {previous} -> {value}".into()
    }
}
