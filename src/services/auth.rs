// src/services/auth.rs

//! Credential check.
//!
//! The portal does not reject bad credentials with an error status; it
//! silently serves the login page instead of the requested one. A session is
//! therefore authenticated unless the grades page comes back titled as the
//! login page.

use scraper::Html;

use super::portal::PageSource;
use super::table::page_title;
use crate::error::Result;
use crate::models::{Credentials, PortalConfig};

/// Check whether the credentials log in. Never fails: any fetch or parse
/// error is logged and reported as `false`.
pub async fn check_password<S>(source: &S, config: &PortalConfig, credentials: &Credentials) -> bool
where
    S: PageSource + ?Sized,
{
    match probe(source, config, credentials).await {
        Ok(authenticated) => authenticated,
        Err(error) => {
            log::error!(
                "Couldn't check credentials for {}: {}",
                credentials.login,
                error
            );
            false
        }
    }
}

async fn probe<S>(source: &S, config: &PortalConfig, credentials: &Credentials) -> Result<bool>
where
    S: PageSource + ?Sized,
{
    let url = config.grades_url()?;
    let markup = source.fetch_markup(credentials, &url).await?;
    is_authenticated(&markup, &config.login_page_title)
}

/// Whether a page is anything other than the login page.
pub fn is_authenticated(markup: &str, login_page_title: &str) -> Result<bool> {
    let document = Html::parse_document(markup);
    let title = page_title(&document)?;
    Ok(title.as_deref() != Some(login_page_title))
}
