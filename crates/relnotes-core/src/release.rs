//! The release record produced by the parser and consumed by the renderer.

use chrono::NaiveDate;
use serde::Serialize;

/// One release entry of a changelog.
///
/// Created when a heading line is recognized and filled with bullet items until
/// the next heading. `date` is `None` when the heading's date text could not be
/// understood; the text itself is kept in `date_text` for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    /// Version token as captured from the heading (e.g. `0.6.0.3`).
    pub version: String,
    /// Calendar date of the release, if the heading's date text parsed.
    pub date: Option<NaiveDate>,
    /// Cleaned date text (ordinal suffixes removed, trimmed).
    pub date_text: String,
    /// Bullet descriptions in input order, already XML-escaped and trimmed.
    pub items: Vec<String>,
}

impl Release {
    /// Create a release with no items yet.
    pub fn new(
        version: impl Into<String>,
        date_text: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            version: version.into(),
            date,
            date_text: date_text.into(),
            items: Vec::new(),
        }
    }

    /// Whether the heading's date text parsed into a calendar date.
    pub const fn has_valid_date(&self) -> bool {
        self.date.is_some()
    }
}
