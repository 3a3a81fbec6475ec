//! Date normalization for date-of-birth handling
//!
//! Loose date text (ISO `YYYY-MM-DD`, localized `DD.MM.YYYY`, and a few
//! generic shapes) is parsed into a calendar date, formatted back as
//! `DD.MM.YYYY`, and used for exact calendar-year age arithmetic.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Canonical outbound date format
pub const CANONICAL_FORMAT: &str = "%d.%m.%Y";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("iso date regex is valid"));

static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("dotted date regex is valid"));

/// Naive datetime shapes tried by the fallback parser
const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Plain date shapes tried by the fallback parser
const FALLBACK_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%B %d, %Y", "%d %B %Y"];

/// Parse loose date text into a calendar date.
///
/// Returns `None` for anything that is not a real calendar day. Day 31 of a
/// short month is rejected, never rolled into the next month.
pub fn parse(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if ISO_DATE.is_match(raw) {
        let mut parts = raw.split('-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let day = parts.next()?.parse().ok()?;
        return build(year, month, day);
    }

    if DOTTED_DATE.is_match(raw) {
        let mut parts = raw.split('.');
        let day = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let year = parts.next()?.parse().ok()?;
        return build(year, month, day);
    }

    parse_fallback(raw)
}

/// Build a date and check it maps back to the same components
fn build(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .filter(|d| d.year() == year && d.month() == month && d.day() == day)
}

fn parse_fallback(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    let from_datetime = FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date());

    from_datetime.or_else(|| {
        FALLBACK_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    })
}

/// Format a date as `DD.MM.YYYY`
pub fn format(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Exact age in whole calendar years at `today`
pub fn age(date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - date.year();
    if (today.month(), today.day()) < (date.month(), date.day()) {
        years -= 1;
    }
    years
}

/// Source of "today" for age and future-date checks
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
