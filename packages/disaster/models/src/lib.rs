#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Disaster record types shared by the extractor and the dashboard.
//!
//! Defines the named columns of the disaster spreadsheet, how they are
//! located in a header row, the typed [`DisasterRecord`] the dashboard
//! works with, and the case-insensitive keyword filter that decides which
//! rows the extractor keeps.

pub mod date;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Default disaster-type keyword ("flood").
pub const DEFAULT_DISASTER_TYPE_KEYWORD: &str = "BANJIR";

/// Default province keyword.
pub const DEFAULT_PROVINCE_KEYWORD: &str = "JAWA BARAT";

/// A column of the disaster dataset that the pipeline interprets.
///
/// Any other column is carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    /// Event date.
    Date,
    /// Province name.
    Province,
    /// Disaster category label.
    DisasterType,
    /// City or regency name.
    City,
    /// Contributing cause.
    Cause,
    /// Death toll.
    Death,
    /// Number of damaged houses.
    DamagedHouse,
}

impl Column {
    /// Columns every dataset must provide.
    pub const REQUIRED: &[Self] = &[Self::DisasterType, Self::Province, Self::Date, Self::City];
}

/// Error returned when a header row lacks a required [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingColumnError {
    /// The column that could not be found.
    pub column: Column,
}

impl std::fmt::Display for MissingColumnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required column '{}'", self.column)
    }
}

impl std::error::Error for MissingColumnError {}

/// Positions of the interpreted columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    /// Position of [`Column::Date`].
    pub date: usize,
    /// Position of [`Column::Province`].
    pub province: usize,
    /// Position of [`Column::DisasterType`].
    pub disaster_type: usize,
    /// Position of [`Column::City`].
    pub city: usize,
    /// Position of [`Column::Cause`], if present.
    pub cause: Option<usize>,
    /// Position of [`Column::Death`], if present.
    pub death: Option<usize>,
    /// Position of [`Column::DamagedHouse`], if present.
    pub damaged_house: Option<usize>,
}

impl ColumnIndex {
    /// Locates the interpreted columns in `headers`. Header names are
    /// compared after trimming and ASCII lowercasing.
    ///
    /// # Errors
    ///
    /// Returns [`MissingColumnError`] naming the first required column
    /// that is absent.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, MissingColumnError> {
        let find = |column: Column| {
            headers
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(column.as_ref()))
        };
        let require = |column: Column| find(column).ok_or(MissingColumnError { column });

        Ok(Self {
            disaster_type: require(Column::DisasterType)?,
            province: require(Column::Province)?,
            date: require(Column::Date)?,
            city: require(Column::City)?,
            cause: find(Column::Cause),
            death: find(Column::Death),
            damaged_house: find(Column::DamagedHouse),
        })
    }
}

/// Case-insensitive keyword pair deciding which rows are flood records for
/// the province of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterKeywords {
    /// Substring the `disaster_type` field must contain.
    pub disaster_type: String,
    /// Substring the `province` field must contain.
    pub province: String,
}

impl Default for FilterKeywords {
    fn default() -> Self {
        Self {
            disaster_type: DEFAULT_DISASTER_TYPE_KEYWORD.to_string(),
            province: DEFAULT_PROVINCE_KEYWORD.to_string(),
        }
    }
}

impl FilterKeywords {
    /// Creates a keyword pair.
    #[must_use]
    pub fn new(disaster_type: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            disaster_type: disaster_type.into(),
            province: province.into(),
        }
    }

    /// Returns `true` when both fields are present and contain their
    /// keyword, ignoring case. A missing field never matches.
    #[must_use]
    pub fn matches(&self, disaster_type: Option<&str>, province: Option<&str>) -> bool {
        disaster_type.is_some_and(|v| contains_ignore_case(v, &self.disaster_type))
            && province.is_some_and(|v| contains_ignore_case(v, &self.province))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One extracted disaster record, as loaded by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterRecord {
    /// Event date.
    pub date: NaiveDate,
    /// Province name.
    pub province: String,
    /// Disaster category label.
    pub disaster_type: String,
    /// City or regency name (uppercase by convention).
    pub city: String,
    /// Contributing cause, if recorded.
    pub cause: Option<String>,
    /// Death toll. Blank or non-numeric cells count as zero.
    pub death: u64,
    /// Damaged houses. Blank or non-numeric cells count as zero.
    pub damaged_house: u64,
    /// Uninterpreted columns as `(header, value)` pairs, in file order.
    pub extra: Vec<(String, String)>,
}

/// Error building a [`DisasterRecord`] from a raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The row's date cell could not be parsed.
    InvalidDate {
        /// The raw cell text.
        value: String,
    },
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { value } => write!(f, "unparseable date '{value}'"),
        }
    }
}

impl std::error::Error for RecordError {}

impl DisasterRecord {
    /// Builds a record from one row of fields laid out per `index`.
    ///
    /// Missing trailing fields are treated as blank.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidDate`] if the date cell is not a
    /// recognizable date.
    pub fn from_fields<S: AsRef<str>>(
        index: &ColumnIndex,
        headers: &[S],
        fields: &[S],
    ) -> Result<Self, RecordError> {
        let field = |i: usize| fields.get(i).map_or("", |f| f.as_ref().trim());
        let optional = |i: Option<usize>| {
            i.map(field)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };
        let count = |i: Option<usize>| i.map_or(0, |i| parse_count(field(i)));

        let raw_date = field(index.date);
        let date = date::parse_record_date(raw_date).ok_or_else(|| RecordError::InvalidDate {
            value: raw_date.to_string(),
        })?;

        let interpreted = [
            Some(index.date),
            Some(index.province),
            Some(index.disaster_type),
            Some(index.city),
            index.cause,
            index.death,
            index.damaged_house,
        ];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !interpreted.contains(&Some(*i)))
            .map(|(i, h)| (h.as_ref().to_string(), field(i).to_string()))
            .collect();

        Ok(Self {
            date,
            province: field(index.province).to_string(),
            disaster_type: field(index.disaster_type).to_string(),
            city: field(index.city).to_string(),
            cause: optional(index.cause),
            death: count(index.death),
            damaged_house: count(index.damaged_house),
            extra,
        })
    }

    /// Calendar year of the event.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month of the event, `1..=12`.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Parses a non-negative count, accepting integral floats such as `"3.0"`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(s: &str) -> u64 {
    if let Ok(n) = s.parse::<u64>() {
        return n;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => f as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: &[&str] = &[
        "id",
        "date",
        "province",
        "city",
        "disaster_type",
        "cause",
        "death",
        "damaged_house",
    ];

    #[test]
    fn resolves_columns_case_insensitively() {
        let headers = ["Date", " PROVINCE ", "City", "disaster_type"];
        let index = ColumnIndex::resolve(&headers).unwrap();
        assert_eq!(index.date, 0);
        assert_eq!(index.province, 1);
        assert_eq!(index.city, 2);
        assert_eq!(index.disaster_type, 3);
        assert!(index.cause.is_none());
        assert!(index.death.is_none());
    }

    #[test]
    fn reports_missing_required_column() {
        let headers = ["date", "province", "disaster_type"];
        let err = ColumnIndex::resolve(&headers).unwrap_err();
        assert_eq!(err.column, Column::City);
        assert_eq!(err.to_string(), "missing required column 'city'");
    }

    #[test]
    fn keywords_match_ignoring_case() {
        let keywords = FilterKeywords::default();
        assert!(keywords.matches(Some("Banjir Bandang"), Some("jawa barat")));
        assert!(keywords.matches(Some("BANJIR"), Some("Prov. Jawa Barat")));
        assert!(!keywords.matches(Some("TANAH LONGSOR"), Some("JAWA BARAT")));
        assert!(!keywords.matches(Some("BANJIR"), Some("JAWA TIMUR")));
    }

    #[test]
    fn missing_fields_never_match() {
        let keywords = FilterKeywords::default();
        assert!(!keywords.matches(None, Some("JAWA BARAT")));
        assert!(!keywords.matches(Some("BANJIR"), None));
        assert!(!keywords.matches(None, None));
    }

    #[test]
    fn custom_keywords() {
        let keywords = FilterKeywords::new("longsor", "jawa tengah");
        assert!(keywords.matches(Some("TANAH LONGSOR"), Some("JAWA TENGAH")));
        assert!(!keywords.matches(Some("BANJIR"), Some("JAWA TENGAH")));
    }

    #[test]
    fn builds_record_from_fields() {
        let index = ColumnIndex::resolve(HEADERS).unwrap();
        let fields = [
            "17",
            "2021-03-01",
            "JAWA BARAT",
            "BANDUNG",
            "BANJIR BANDANG",
            "Hujan deras",
            "2",
            "14.0",
        ];
        let record = DisasterRecord::from_fields(&index, HEADERS, &fields).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(record.city, "BANDUNG");
        assert_eq!(record.cause.as_deref(), Some("Hujan deras"));
        assert_eq!(record.death, 2);
        assert_eq!(record.damaged_house, 14);
        assert_eq!(record.extra, vec![("id".to_string(), "17".to_string())]);
        assert_eq!(record.year(), 2021);
        assert_eq!(record.month(), 3);
    }

    #[test]
    fn blank_counts_and_cause_default() {
        let index = ColumnIndex::resolve(HEADERS).unwrap();
        let fields = ["1", "2020-01-01", "JAWA BARAT", "BOGOR", "BANJIR", "", "n/a"];
        let record = DisasterRecord::from_fields(&index, HEADERS, &fields).unwrap();
        assert!(record.cause.is_none());
        assert_eq!(record.death, 0);
        assert_eq!(record.damaged_house, 0);
    }

    #[test]
    fn rejects_bad_date() {
        let index = ColumnIndex::resolve(HEADERS).unwrap();
        let fields = ["1", "someday", "JAWA BARAT", "BOGOR", "BANJIR", "", "", ""];
        let err = DisasterRecord::from_fields(&index, HEADERS, &fields).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidDate {
                value: "someday".to_string()
            }
        );
    }
}
