//! XML rendering of parsed releases.
//!
//! Produces the `<releases>` block of an AppStream metainfo file, one element
//! per line. Version and item text are written verbatim: the parser already
//! escaped item text, and versions only contain digits and dots.

use std::fmt::Display;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::RenderError;
use crate::release::Release;

/// Date written for a release whose heading date could not be parsed.
pub const SENTINEL_DATE: &str = "0000-00-00";

/// What to do with a release that has no valid date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDatePolicy {
    /// Write [`SENTINEL_DATE`] in the `date` attribute.
    #[default]
    Sentinel,
    /// Refuse to render the document.
    Error,
}

/// Layout options for [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Nesting level of the root `<releases>` element.
    ///
    /// Defaults to `0`, so the root starts at column 0. `1` indents the whole
    /// block one level, the classic appdata layout for pasting inside
    /// `<component>`.
    pub base_level: usize,
    /// Handling of undated releases.
    pub invalid_date: InvalidDatePolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            base_level: 0,
            invalid_date: InvalidDatePolicy::default(),
        }
    }
}

/// Writes lines prefixed with the indentation of their nesting level.
struct IndentedWriter<'a, W> {
    out: &'a mut W,
    options: &'a RenderOptions,
}

impl<W: Write> IndentedWriter<'_, W> {
    fn line(&mut self, depth: usize, content: impl Display) -> io::Result<()> {
        let width = (self.options.base_level + depth) * self.options.indent_width;
        writeln!(self.out, "{:width$}{content}", "")
    }
}

/// Write the releases as an XML document to `out`.
///
/// An empty slice still produces the `<releases>` element pair, and a release
/// without items still gets its `<ul>` pair.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the sink fails, and
/// [`RenderError::InvalidDate`] if a release is undated while
/// [`InvalidDatePolicy::Error`] is selected. In the latter case nothing is
/// written.
#[instrument(skip_all, fields(releases = releases.len()))]
pub fn render<W: Write>(
    releases: &[Release],
    options: &RenderOptions,
    out: &mut W,
) -> Result<(), RenderError> {
    if options.invalid_date == InvalidDatePolicy::Error
        && let Some(undated) = releases.iter().find(|release| release.date.is_none())
    {
        return Err(RenderError::InvalidDate {
            version: undated.version.clone(),
            text: undated.date_text.clone(),
        });
    }

    let mut xml = IndentedWriter { out, options };
    xml.line(0, "<releases>")?;
    for release in releases {
        let date = release.date.map_or_else(
            || SENTINEL_DATE.to_string(),
            |date| date.format("%Y-%m-%d").to_string(),
        );
        xml.line(
            1,
            format_args!(
                r#"<release version="{}" date="{date}">"#,
                release.version
            ),
        )?;
        xml.line(2, "<description>")?;
        xml.line(3, "<ul>")?;
        for item in &release.items {
            xml.line(4, format_args!("<li>{item}</li>"))?;
        }
        xml.line(3, "</ul>")?;
        xml.line(2, "</description>")?;
        xml.line(1, "</release>")?;
    }
    xml.line(0, "</releases>")?;
    xml.out.flush()?;

    debug!("releases rendered");
    Ok(())
}

/// Render into a `String`.
///
/// # Errors
///
/// Only [`RenderError::InvalidDate`]; writing to memory cannot fail.
pub fn render_to_string(
    releases: &[Release],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut buffer = Vec::new();
    render(releases, options, &mut buffer)?;
    // Every fragment written above is valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
