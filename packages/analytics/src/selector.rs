//! Year and city selection over the loaded records.
//!
//! A [`Selection`] is a pair of independent equality predicates. Applying
//! it always starts from the full record set, so the order in which the
//! two choices were made never matters.

use std::collections::BTreeSet;

use flood_map_disaster_models::DisasterRecord;

use crate::AnalyticsError;

/// Labels accepted as "no restriction" when parsing a selection.
const ALL_LABELS: &[&str] = &["", "all", "semua"];

/// Year choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearSelection {
    /// Every year.
    #[default]
    All,
    /// Only this calendar year.
    Year(i32),
}

/// City choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CitySelection {
    /// Every city.
    #[default]
    All,
    /// Only this city, matched exactly.
    City(String),
}

/// The dashboard's filter state. Defaults to all years and all cities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Year predicate.
    pub year: YearSelection,
    /// City predicate.
    pub city: CitySelection,
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.year {
            YearSelection::All => write!(f, "all years")?,
            YearSelection::Year(year) => write!(f, "{year}")?,
        }
        match &self.city {
            CitySelection::All => write!(f, ", all cities"),
            CitySelection::City(city) => write!(f, ", {city}"),
        }
    }
}

fn is_all(value: &str) -> bool {
    ALL_LABELS
        .iter()
        .any(|label| value.trim().eq_ignore_ascii_case(label))
}

impl Selection {
    /// Creates a selection from its two parts.
    #[must_use]
    pub const fn new(year: YearSelection, city: CitySelection) -> Self {
        Self { year, city }
    }

    /// Parses optional query values. Missing, blank, `all` and `semua`
    /// mean no restriction.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidYear`] if the year is not an
    /// integer.
    pub fn parse(year: Option<&str>, city: Option<&str>) -> Result<Self, AnalyticsError> {
        let year = match year {
            Some(y) if !is_all(y) => {
                YearSelection::Year(y.trim().parse().map_err(|_| AnalyticsError::InvalidYear {
                    value: y.to_string(),
                })?)
            }
            _ => YearSelection::All,
        };
        let city = match city {
            Some(c) if !is_all(c) => CitySelection::City(c.trim().to_string()),
            _ => CitySelection::All,
        };
        Ok(Self { year, city })
    }

    /// Checks that each chosen value occurs in `records`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnknownYear`] or
    /// [`AnalyticsError::UnknownCity`] for a value absent from the data.
    pub fn validate(&self, records: &[DisasterRecord]) -> Result<(), AnalyticsError> {
        if let YearSelection::Year(year) = self.year
            && !records.iter().any(|r| r.year() == year)
        {
            return Err(AnalyticsError::UnknownYear { year });
        }
        if let CitySelection::City(city) = &self.city
            && !records.iter().any(|r| &r.city == city)
        {
            return Err(AnalyticsError::UnknownCity { city: city.clone() });
        }
        Ok(())
    }

    /// Whether `record` satisfies both predicates.
    #[must_use]
    pub fn matches(&self, record: &DisasterRecord) -> bool {
        let year_ok = match self.year {
            YearSelection::All => true,
            YearSelection::Year(year) => record.year() == year,
        };
        let city_ok = match &self.city {
            CitySelection::All => true,
            CitySelection::City(city) => &record.city == city,
        };
        year_ok && city_ok
    }

    /// Derives the view of `records` matching this selection.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [DisasterRecord]) -> FilteredView<'a> {
        let view = FilteredView {
            records: records.iter().filter(|r| self.matches(r)).collect(),
        };
        log::debug!("Selection ({self}) keeps {} of {}", view.len(), records.len());
        view
    }
}

/// Records matching a [`Selection`], in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView<'a> {
    records: Vec<&'a DisasterRecord>,
}

impl<'a> FilteredView<'a> {
    /// The matching records.
    #[must_use]
    pub fn records(&self) -> &[&'a DisasterRecord] {
        &self.records
    }

    /// Iterates the matching records.
    pub fn iter(&self) -> impl Iterator<Item = &'a DisasterRecord> + '_ {
        self.records.iter().copied()
    }

    /// Number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, 'b> IntoIterator for &'b FilteredView<'a> {
    type Item = &'a DisasterRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'b, &'a DisasterRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}

/// Distinct years in first-appearance order.
#[must_use]
pub fn year_options(records: &[DisasterRecord]) -> Vec<i32> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .map(DisasterRecord::year)
        .filter(|year| seen.insert(*year))
        .collect()
}

/// Distinct non-blank cities in first-appearance order.
#[must_use]
pub fn city_options(records: &[DisasterRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .map(|r| r.city.as_str())
        .filter(|city| !city.is_empty() && seen.insert(*city))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;

    pub fn record(date: &str, city: &str, cause: Option<&str>) -> DisasterRecord {
        DisasterRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            province: "JAWA BARAT".to_string(),
            disaster_type: "BANJIR".to_string(),
            city: city.to_string(),
            cause: cause.map(ToString::to_string),
            death: 0,
            damaged_house: 0,
            extra: Vec::new(),
        }
    }

    fn sample() -> Vec<DisasterRecord> {
        vec![
            record("2021-01-10", "BANDUNG", Some("Hujan")),
            record("2022-02-01", "BEKASI", Some("Hujan")),
            record("2022-03-15", "BANDUNG", None),
            record("2020-12-31", "BOGOR", Some("Tanggul")),
            record("2022-11-20", "BANDUNG", Some("Hujan")),
        ]
    }

    #[test]
    fn default_selection_keeps_everything() {
        let records = sample();
        let view = Selection::default().apply(&records);
        assert_eq!(view.len(), records.len());
    }

    #[test]
    fn filters_by_year_and_city() {
        let records = sample();
        let selection = Selection::new(
            YearSelection::Year(2022),
            CitySelection::City("BANDUNG".to_string()),
        );
        let view = selection.apply(&records);
        let dates: Vec<_> = view.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2022-03-15", "2022-11-20"]);
    }

    #[test]
    fn selections_are_independent_of_order() {
        let records = sample();
        let direct = Selection::new(
            YearSelection::Year(2022),
            CitySelection::City("BANDUNG".to_string()),
        )
        .apply(&records);

        let mut state = Selection::default();
        state.year = YearSelection::Year(2022);
        assert!(state.apply(&records).len() >= direct.len());
        state.city = CitySelection::City("BANDUNG".to_string());
        let stepwise = state.apply(&records);

        let mut reverse = Selection::default();
        reverse.city = CitySelection::City("BANDUNG".to_string());
        assert!(reverse.apply(&records).len() >= direct.len());
        reverse.year = YearSelection::Year(2022);

        assert_eq!(direct, stepwise);
        assert_eq!(direct, reverse.apply(&records));
    }

    #[test]
    fn options_follow_first_appearance() {
        let records = sample();
        assert_eq!(year_options(&records), vec![2021, 2022, 2020]);
        assert_eq!(city_options(&records), vec!["BANDUNG", "BEKASI", "BOGOR"]);
    }

    #[test]
    fn parses_query_values() {
        assert_eq!(Selection::parse(None, None).unwrap(), Selection::default());
        assert_eq!(
            Selection::parse(Some("Semua"), Some("all")).unwrap(),
            Selection::default()
        );
        assert_eq!(
            Selection::parse(Some(" 2022 "), Some("BANDUNG")).unwrap(),
            Selection::new(
                YearSelection::Year(2022),
                CitySelection::City("BANDUNG".to_string())
            )
        );
        assert_eq!(
            Selection::parse(Some("twenty"), None).unwrap_err(),
            AnalyticsError::InvalidYear {
                value: "twenty".to_string()
            }
        );
    }

    #[test]
    fn validate_rejects_absent_values() {
        let records = sample();
        assert!(Selection::default().validate(&records).is_ok());
        assert_eq!(
            Selection::new(YearSelection::Year(1999), CitySelection::All)
                .validate(&records)
                .unwrap_err(),
            AnalyticsError::UnknownYear { year: 1999 }
        );
        assert_eq!(
            Selection::new(YearSelection::All, CitySelection::City("DEPOK".to_string()))
                .validate(&records)
                .unwrap_err(),
            AnalyticsError::UnknownCity {
                city: "DEPOK".to_string()
            }
        );
    }

    #[test]
    fn displays_selection() {
        assert_eq!(Selection::default().to_string(), "all years, all cities");
        assert_eq!(
            Selection::new(YearSelection::Year(2022), CitySelection::City("BOGOR".into()))
                .to_string(),
            "2022, BOGOR"
        );
    }
}
