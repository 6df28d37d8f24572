//! Free-form date parsing for disaster record dates.
//!
//! Source spreadsheets mix ISO dates, date-times, and numeric local
//! formats. Everything is reduced to a [`NaiveDate`]; the time of day is
//! discarded.
//!
//! Numeric `a/b/YYYY` and `a-b-YYYY` dates are read month-first, falling
//! back to day-first when the month-first reading is impossible (so
//! `01/13/2020` is 13 January and `05/01/2020` is 1 May).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Canonical output format for normalized dates (ISO 8601 calendar date).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &[
    ISO_DATE_FORMAT,
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a record date from free-form text.
///
/// Returns `None` for empty or unrecognized input.
#[must_use]
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Formats a date the way the extracted CSV stores it.
#[must_use]
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_record_date("2021-03-01"), Some(ymd(2021, 3, 1)));
    }

    #[test]
    fn parses_iso_date_time_variants() {
        assert_eq!(
            parse_record_date("2021-03-01 00:00:00"),
            Some(ymd(2021, 3, 1))
        );
        assert_eq!(
            parse_record_date("2021-03-01T14:30:00.000"),
            Some(ymd(2021, 3, 1))
        );
        assert_eq!(
            parse_record_date("2021-03-01T23:59:59+07:00"),
            Some(ymd(2021, 3, 1))
        );
    }

    #[test]
    fn parses_numeric_dates_month_first() {
        assert_eq!(parse_record_date("05/01/2020"), Some(ymd(2020, 5, 1)));
        assert_eq!(parse_record_date("05-01-2020"), Some(ymd(2020, 5, 1)));
    }

    #[test]
    fn falls_back_to_day_first() {
        assert_eq!(parse_record_date("01/13/2020"), Some(ymd(2020, 1, 13)));
        assert_eq!(parse_record_date("13-01-2020"), Some(ymd(2020, 1, 13)));
        assert!(parse_record_date("13/13/2020").is_none());
    }

    #[test]
    fn parses_month_names() {
        assert_eq!(parse_record_date("5 January 2020"), Some(ymd(2020, 1, 5)));
        assert_eq!(parse_record_date("5 Jan 2020"), Some(ymd(2020, 1, 5)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_record_date("  2019-05-05 "), Some(ymd(2019, 5, 5)));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(parse_record_date("").is_none());
        assert!(parse_record_date("   ").is_none());
        assert!(parse_record_date("kemarin sore").is_none());
        assert!(parse_record_date("2021-13-45").is_none());
    }

    #[test]
    fn formats_as_iso() {
        assert_eq!(format_iso_date(ymd(2019, 5, 5)), "2019-05-05");
    }
}
