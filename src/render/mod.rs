//! Page rendering for wgsldoc.
//!
//! `PageRenderer` is the seam between the pipeline and whatever produces
//! page text. The shipped implementation is `HtmlRenderer`.

mod assets;
mod html;
mod search;

pub use assets::{write_assets, SEARCH_SCRIPT, STYLESHEET};
pub use html::{escape_html, render_comment, HtmlRenderer};
pub use search::{build_search_index, write_search_index, SearchEntry, SearchKind};

use serde::Serialize;

use crate::error::Result;
use crate::types::ParsedFile;

/// One line of the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Page path relative to the versioned output directory.
    pub doc_path: String,
    pub filename: String,
    pub import_path: Option<String>,
}

impl IndexEntry {
    pub fn from_file(file: &ParsedFile) -> Self {
        Self {
            doc_path: file.meta.doc_path.clone(),
            filename: file.meta.filename.clone(),
            import_path: file.import_path.clone(),
        }
    }
}

/// Produces page text from the documentation model.
///
/// Implementations are shared across worker threads during rendering.
pub trait PageRenderer: Sync {
    /// Page for one resolved file.
    fn render_file(&self, file: &ParsedFile) -> Result<String>;

    /// Listing of every generated page.
    fn render_index(&self, entries: &[IndexEntry]) -> Result<String>;

    /// Static "not found" page.
    fn render_not_found(&self) -> Result<String>;
}
