//! Free-form release date parsing.
//!
//! Changelog headings carry dates written by hand: `January 5th, 2021`,
//! `2021-01-05`, `5 Jan 2021`, `Tue, Jan 5, 2021`. The text is normalized
//! (ordinals, commas, weekday names and abbreviation dots removed) and then
//! tried against a fixed list of `chrono` formats. No time zone is applied.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// A digit followed by an English ordinal suffix (`1st`, `22nd`, `3RD`, `4th`).
static ORDINAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d)(?:st|nd|rd|th)").expect("Invalid regex"));

/// Numeric layouts, tried before month names.
const NUMERIC_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Month-name layouts. `%B` also accepts the three-letter abbreviation.
const NAMED_FORMATS: &[&str] = &["%B %d %Y", "%d %B %Y", "%Y %B %d"];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Remove ordinal suffixes from day numbers and trim the result.
///
/// `"January 1st, 2021 "` becomes `"January 1, 2021"`.
pub fn strip_ordinals(text: &str) -> String {
    ORDINAL_REGEX.replace_all(text, "${1}").trim().to_string()
}

/// Parse a cleaned date text into a calendar date.
///
/// Returns `None` when the text does not look like any supported layout.
/// A month without a day resolves to the first of the month, and a bare year
/// to January 1st.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let tokens = tokenize(text);
    let joined = tokens.join(" ");

    // chrono lets a format space match zero input characters, so each layout
    // is only tried against text with the same number of tokens.
    match tokens.len() {
        1 => NUMERIC_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&joined, format).ok())
            .or_else(|| year_only(&joined)),
        2 => NaiveDate::parse_from_str(&format!("1 {joined}"), "%d %B %Y").ok(),
        3 => NAMED_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&joined, format).ok()),
        _ => None,
    }
}

/// Split on commas and whitespace, dropping abbreviation dots and a leading weekday.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| match token.strip_suffix('.') {
            Some(word) if !word.is_empty() && word.chars().all(char::is_alphabetic) => word,
            _ => token,
        })
        .collect();

    if tokens.first().is_some_and(|first| is_weekday(first)) {
        tokens.remove(0);
    }
    tokens
}

fn is_weekday(token: &str) -> bool {
    let token = token.to_lowercase();
    token.len() >= 3 && WEEKDAYS.iter().any(|day| day.starts_with(&token))
}

fn year_only(text: &str) -> Option<NaiveDate> {
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    #[test]
    fn strips_every_ordinal_suffix() {
        assert_eq!(strip_ordinals("January 1st, 2021"), "January 1, 2021");
        assert_eq!(strip_ordinals("March 22nd, 2020"), "March 22, 2020");
        assert_eq!(strip_ordinals("May 3RD 2019"), "May 3 2019");
        assert_eq!(strip_ordinals("  August 25th, 2021\t"), "August 25, 2021");
    }

    #[test]
    fn ordinal_stripping_leaves_words_alone() {
        assert_eq!(strip_ordinals("Thursday, August 2021"), "Thursday, August 2021");
    }

    #[test]
    fn ordinal_and_plain_dates_agree() {
        let with_ordinal = parse_date(&strip_ordinals("January 1st, 2021"));
        let plain = parse_date(&strip_ordinals("January 1, 2021"));
        assert_eq!(with_ordinal, ymd(2021, 1, 1));
        assert_eq!(with_ordinal, plain);
    }

    #[test]
    fn parses_iso_and_numeric_dates() {
        assert_eq!(parse_date("2021-01-05"), ymd(2021, 1, 5));
        assert_eq!(parse_date("2021/1/5"), ymd(2021, 1, 5));
        assert_eq!(parse_date("2021.12.31"), ymd(2021, 12, 31));
        assert_eq!(parse_date("01/05/2021"), ymd(2021, 1, 5));
    }

    #[test]
    fn parses_month_names() {
        assert_eq!(parse_date("January 5, 2021"), ymd(2021, 1, 5));
        assert_eq!(parse_date("Jan 5 2021"), ymd(2021, 1, 5));
        assert_eq!(parse_date("Sep. 14, 2019"), ymd(2019, 9, 14));
        assert_eq!(parse_date("5 January 2021"), ymd(2021, 1, 5));
        assert_eq!(parse_date("december 24, 2022"), ymd(2022, 12, 24));
    }

    #[test]
    fn ignores_leading_weekday() {
        assert_eq!(parse_date("Tuesday, January 5, 2021"), ymd(2021, 1, 5));
        assert_eq!(parse_date("Fri, Jan 8, 2021"), ymd(2021, 1, 8));
    }

    #[test]
    fn month_and_year_resolve_to_first_day() {
        assert_eq!(parse_date("March 2022"), ymd(2022, 3, 1));
        assert_eq!(parse_date("2022"), ymd(2022, 1, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("someday in 2021"), None);
        assert_eq!(parse_date("Smarch 5, 2021"), None);
        assert_eq!(parse_date("February 30, 2021"), None);
        assert_eq!(parse_date("5 of January 2021"), None);
    }
}
