//! In-memory page source for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use super::portal::PageSource;
use super::table::CELLS_PER_ROW;
use crate::error::{AppError, Result};
use crate::models::Credentials;

/// Serves canned pages per student; unknown pages fail like a dropped
/// connection.
#[derive(Default)]
pub struct FakePortal {
    pages: HashMap<(String, String), String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` to `login` at `target` (path plus query).
    pub fn page(mut self, login: &str, target: &str, markup: impl Into<String>) -> Self {
        self.pages
            .insert((login.to_string(), target.to_string()), markup.into());
        self
    }

    /// Serve a term's grades table built from `cells`.
    pub fn semester(self, login: &str, semester: u32, cells: &[&str]) -> Self {
        let target = format!("/profile/grades?semester={semester}");
        self.page(login, &target, grades_page(cells))
    }

    /// Targets requested so far for `login`, in order.
    pub fn requests(&self, login: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == login)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl PageSource for FakePortal {
    async fn fetch_markup(&self, credentials: &Credentials, url: &Url) -> Result<String> {
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.requests
            .lock()
            .unwrap()
            .push((credentials.login.clone(), target.clone()));

        self.pages
            .get(&(credentials.login.clone(), target))
            .cloned()
            .ok_or_else(|| AppError::portal(url.as_str(), "connection refused"))
    }
}

/// A grades page whose table holds `cells`, one `<tr>` per row.
pub fn grades_page(cells: &[&str]) -> String {
    let mut rows = String::new();
    for row in cells.chunks(CELLS_PER_ROW) {
        rows.push_str("<tr>");
        for cell in row {
            rows.push_str(&format!("<td>{cell}</td>"));
        }
        rows.push_str("</tr>");
    }
    format!(
        "<html><head><title>Успеваемость / РИТМ.Рейтинг</title></head>\
         <body><table><tbody>{rows}</tbody></table></body></html>"
    )
}

/// One subject row: name followed by the seven scored cells.
pub fn row<'a>(name: &'a str, scores: [&'a str; 7]) -> Vec<&'a str> {
    let mut cells = vec![name];
    cells.extend(scores);
    cells
}
