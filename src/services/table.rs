// src/services/table.rs

//! Grades table parsing.
//!
//! The portal renders one `<tr>` per subject with a fixed column layout:
//! name, four tests, rating, exam, final grade. Cells are read in document
//! order and grouped into rows of [`CELLS_PER_ROW`].

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::Subject;

/// Number of cells in one subject row.
pub const CELLS_PER_ROW: usize = 8;

/// Parse a term page into its subjects.
pub fn parse_semester(markup: &str, semester: u32) -> Result<Vec<Subject>> {
    let document = Html::parse_document(markup);
    parse_subjects(&document, semester)
}

/// Group the document's table cells into subjects.
///
/// Fails without producing any subject when the cell count is not a whole
/// number of rows.
pub fn parse_subjects(document: &Html, semester: u32) -> Result<Vec<Subject>> {
    let cells = table_cells(document)?;
    if cells.len() % CELLS_PER_ROW != 0 {
        return Err(AppError::MalformedTable {
            cells: cells.len(),
            width: CELLS_PER_ROW,
        });
    }

    let (rows, _) = cells.as_chunks::<CELLS_PER_ROW>();
    Ok(rows
        .iter()
        .map(|row| Subject::from_row(semester, row))
        .collect())
}

/// Text of every `td` element, in document order.
pub fn table_cells(document: &Html) -> Result<Vec<String>> {
    let cell_sel = parse_selector("td")?;
    Ok(document
        .select(&cell_sel)
        .map(|cell| cell.text().collect())
        .collect())
}

/// Trimmed text of the document's first `title` element.
pub fn page_title(document: &Html) -> Result<Option<String>> {
    let title_sel = parse_selector("title")?;
    Ok(document
        .select(&title_sel)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string()))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
