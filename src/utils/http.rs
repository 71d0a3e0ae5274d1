// src/utils/http.rs

//! HTTP client utilities.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::{AppError, Result};
use crate::models::PortalConfig;

/// Create an HTTP client bound to the given cookie jar.
pub fn create_session_client(config: &PortalConfig, jar: Arc<Jar>) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .cookie_provider(jar)
        .build()?;
    Ok(client)
}

/// Fetch a page body as text, failing on a non-success status.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::portal(url, format!("unexpected status {status}")));
    }
    Ok(response.text().await?)
}

