// src/services/portal.rs

//! Portal page fetching.
//!
//! Every fetch logs in on a fresh cookie jar and reads the target page within
//! that session. Sessions are never shared, so fetches for different students
//! can run concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::cookie::Jar;
use url::Url;

use crate::error::Result;
use crate::models::{Credentials, PortalConfig};
use crate::utils::http::{create_session_client, fetch_text};

/// Login form field names expected by the portal.
const USERNAME_FIELD: &str = "LoginForm[username]";
const PASSWORD_FIELD: &str = "LoginForm[password]";
const REMEMBER_ME_FIELD: &str = "LoginForm[rememberMe]";
const SUBMIT_FIELD: &str = "yt0";

/// Source of authenticated portal pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the markup of `url` as seen by the given student.
    async fn fetch_markup(&self, credentials: &Credentials, url: &Url) -> Result<String>;
}

/// One logged-in portal session with its own cookie jar.
pub struct PortalSession {
    client: Client,
    login_url: Url,
}

impl PortalSession {
    /// Open an empty session. Nothing is sent until `login`.
    pub fn open(config: &PortalConfig) -> Result<Self> {
        let client = create_session_client(config, Arc::new(Jar::default()))?;
        Ok(Self {
            client,
            login_url: config.login_url()?,
        })
    }

    /// Submit the login form. The response body is discarded; only the
    /// session cookie it sets matters.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let form = [
            (USERNAME_FIELD, credentials.login.as_str()),
            (PASSWORD_FIELD, credentials.password.as_str()),
            (REMEMBER_ME_FIELD, "0"),
            (SUBMIT_FIELD, ""),
        ];

        let response = self
            .client
            .post(self.login_url.clone())
            .form(&form)
            .send()
            .await?;

        log::info!(
            "Login request for {} completed, status = {}",
            credentials.login,
            response.status()
        );
        Ok(())
    }

    /// Read a page body within this session.
    pub async fn get_markup(&self, url: &Url) -> Result<String> {
        fetch_text(&self.client, url.as_str()).await
    }
}

/// Page fetcher backed by the live portal.
#[derive(Debug, Clone)]
pub struct PortalClient {
    config: Arc<PortalConfig>,
}

impl PortalClient {
    pub fn new(config: Arc<PortalConfig>) -> Self {
        Self { config }
    }

    /// Log in on a fresh session.
    pub async fn session(&self, credentials: &Credentials) -> Result<PortalSession> {
        let session = PortalSession::open(&self.config)?;
        session.login(credentials).await?;
        Ok(session)
    }
}

#[async_trait]
impl PageSource for PortalClient {
    async fn fetch_markup(&self, credentials: &Credentials, url: &Url) -> Result<String> {
        let session = self.session(credentials).await?;
        let markup = session.get_markup(url).await?;
        log::debug!("Fetched {} for {} ({} bytes)", url, credentials.login, markup.len());
        Ok(markup)
    }
}
