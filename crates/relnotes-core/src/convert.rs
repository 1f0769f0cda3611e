//! The one-shot conversion: read the whole changelog, then write the XML.

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{ConvertError, ConvertResult};
use crate::parser;
use crate::release::Release;
use crate::render::{self, RenderOptions};

/// Counts reported after a successful conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    /// Number of release headings found.
    pub releases: usize,
    /// Total bullet items across all releases.
    pub items: usize,
    /// Releases whose date could not be parsed.
    pub undated: usize,
}

impl ConvertSummary {
    /// Tally a parsed release sequence.
    pub fn of(releases: &[Release]) -> Self {
        Self {
            releases: releases.len(),
            items: releases.iter().map(|release| release.items.len()).sum(),
            undated: releases.iter().filter(|release| !release.has_valid_date()).count(),
        }
    }
}

/// Read the changelog from `input` to the end, then render it into `output`.
///
/// Nothing is written until the input is exhausted.
///
/// # Errors
///
/// [`ConvertError::Read`] if the input cannot be read, or
/// [`ConvertError::Render`] if writing fails or an undated release is
/// rejected by `options`.
///
/// # Example
///
/// ```
/// use relnotes_core::convert::convert;
/// use relnotes_core::render::RenderOptions;
///
/// let changelog = "1.0.0 - January 5th, 2021\n* Initial release\n";
/// let mut xml = Vec::new();
/// let summary = convert(changelog.as_bytes(), &mut xml, &RenderOptions::default()).unwrap();
///
/// assert_eq!(summary.releases, 1);
/// assert!(String::from_utf8(xml).unwrap().contains(r#"date="2021-01-05""#));
/// ```
#[instrument(skip_all)]
pub fn convert<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    options: &RenderOptions,
) -> ConvertResult<ConvertSummary> {
    let releases = parser::parse_reader(input).map_err(ConvertError::Read)?;
    render::render(&releases, options, output)?;

    let summary = ConvertSummary::of(&releases);
    info!(
        releases = summary.releases,
        items = summary.items,
        undated = summary.undated,
        "changelog converted"
    );
    Ok(summary)
}
