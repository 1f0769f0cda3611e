//! Changelog parsing.
//!
//! A changelog is read one line at a time. Each line is first classified
//! ([`classify`]) as a release heading, a bullet item, or anything else, and
//! the classified line is then applied to a [`ChangelogParser`], which owns
//! the releases collected so far and knows which one is current.
//!
//! ```
//! use relnotes_core::parser;
//!
//! let releases = parser::parse_str(
//!     "0.6.0 - August 25th, 2021\n* New level editor\n* Fixed <blink> & friends\n",
//! );
//! assert_eq!(releases.len(), 1);
//! assert_eq!(releases[0].version, "0.6.0");
//! assert_eq!(releases[0].items[1], "Fixed &lt;blink&gt; &amp; friends");
//! ```

pub mod date;

use std::borrow::Cow;
use std::io::{self, BufRead};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::release::Release;

/// Digit, dot, digit, then a four-digit year at the end of the line.
///
/// A line ending in a year-first date such as `2021-01-05` is not a heading,
/// so bullets that mention one stay bullets.
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\.\d.*\d{4}\s*$").expect("Invalid regex"));

/// First version token on the line and the text after its trailing punctuation.
///
/// Components are `\d+`, not single digits: `10.2.3` stays `10.2.3` rather
/// than losing its leading digit.
static HEADING_PARTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<version>\d+\.\d+(?:\.\d+(?:\.\d+)?)?)\W*(?P<date>.*)$")
        .expect("Invalid regex")
});

/// An asterisk after optional indentation, then at least one whitespace.
static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*\s+(?P<text>.*)$").expect("Invalid regex"));

/// A single changelog line, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// A release heading such as `0.6.0.3 - March 3rd, 2022`.
    Heading {
        /// The captured version token.
        version: &'a str,
        /// Raw date text following the version, ordinals not yet stripped.
        date_text: &'a str,
    },
    /// A `* item` line; holds the text after the asterisk, unescaped.
    Bullet(&'a str),
    /// Anything else: prose, blank lines, section titles.
    Other,
}

/// Classify one line. Headings win over bullets.
pub fn classify(line: &str) -> Line<'_> {
    if HEADING_REGEX.is_match(line)
        && let Some(caps) = HEADING_PARTS_REGEX.captures(line)
    {
        let version = caps.name("version").map_or("", |m| m.as_str());
        let date_text = caps.name("date").map_or("", |m| m.as_str());
        return Line::Heading { version, date_text };
    }

    if let Some(caps) = BULLET_REGEX.captures(line) {
        return Line::Bullet(caps.name("text").map_or("", |m| m.as_str()));
    }

    Line::Other
}

/// Escape the three XML metacharacters that can break element content.
///
/// Only `&`, `<` and `>` are replaced; quotes are left alone because item
/// text is only ever written between tags.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(text)
}

/// Accumulates releases while lines are fed in order.
#[derive(Debug, Default)]
pub struct ChangelogParser {
    releases: Vec<Release>,
    current: Option<usize>,
    dropped_bullets: usize,
}

impl ChangelogParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a raw line and apply it.
    pub fn push_line(&mut self, line: &str) {
        self.feed(classify(line));
    }

    /// Apply an already classified line.
    pub fn feed(&mut self, line: Line<'_>) {
        match line {
            Line::Heading { version, date_text } => self.open_release(version, date_text),
            Line::Bullet(text) => self.push_item(text),
            Line::Other => {}
        }
    }

    fn open_release(&mut self, version: &str, raw_date: &str) {
        let date_text = date::strip_ordinals(raw_date);
        let date = date::parse_date(&date_text);
        match date {
            Some(date) => debug!(version, %date, "release heading"),
            None => warn!(version, date_text = %date_text, "unparseable release date"),
        }

        self.releases.push(Release::new(version, date_text, date));
        self.current = Some(self.releases.len() - 1);
    }

    fn push_item(&mut self, text: &str) {
        match self.current.and_then(|index| self.releases.get_mut(index)) {
            Some(release) => release.items.push(escape_xml(text).trim().to_string()),
            None => {
                self.dropped_bullets += 1;
                trace!(text, "bullet before first release heading dropped");
            }
        }
    }

    /// Releases collected so far, in heading order.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// The release that bullet lines currently attach to.
    pub fn current(&self) -> Option<&Release> {
        self.current.and_then(|index| self.releases.get(index))
    }

    /// Finish parsing and hand over the releases.
    pub fn finish(self) -> Vec<Release> {
        debug!(
            releases = self.releases.len(),
            dropped_bullets = self.dropped_bullets,
            "changelog parsed"
        );
        self.releases
    }
}

/// Parse a complete changelog held in memory.
pub fn parse_str(input: &str) -> Vec<Release> {
    let mut parser = ChangelogParser::new();
    for line in input.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

/// Parse a changelog from a buffered reader, consuming it to the end.
///
/// # Errors
///
/// Returns the first I/O error raised by the reader, including invalid UTF-8.
pub fn parse_reader<R: BufRead>(reader: R) -> io::Result<Vec<Release>> {
    let mut parser = ChangelogParser::new();
    for line in reader.lines() {
        parser.push_line(&line?);
    }
    Ok(parser.finish())
}
