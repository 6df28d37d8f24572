//! Pure aggregations feeding the dashboard's charts, metrics and map.
//!
//! Functions take any iterator of records, so they work on the full
//! record set (`&[DisasterRecord]`) and on a
//! [`FilteredView`](crate::FilteredView) alike. An empty input yields an
//! empty series.

use std::collections::{BTreeMap, BTreeSet};

use flood_map_analytics_models::{GeoPoint, MonthCount, NameCount, Summary, YearCount};
use flood_map_disaster_models::DisasterRecord;
use flood_map_geography::CoordinateTable;

/// Rows in the preview table.
pub const PREVIEW_ROWS: usize = 10;

/// Bars in the per-city chart.
pub const TOP_CITIES: usize = 10;

/// Slices in the cause chart.
pub const TOP_CAUSES: usize = 5;

/// Rows in the map's coordinate table.
pub const COORDINATE_ROWS: usize = 10;

/// Incidents per calendar year, ascending by year.
pub fn count_by_year<'a>(records: impl IntoIterator<Item = &'a DisasterRecord>) -> Vec<YearCount> {
    let mut counts = BTreeMap::<i32, u64>::new();
    for record in records {
        *counts.entry(record.year()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Incidents per month of the year across all years, in month order.
/// Months without incidents are omitted.
pub fn count_by_month<'a>(
    records: impl IntoIterator<Item = &'a DisasterRecord>,
) -> Vec<MonthCount> {
    let mut counts = BTreeMap::<u32, u64>::new();
    for record in records {
        *counts.entry(record.month()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}

/// Counts labels, then orders by count descending. Equal counts keep the
/// order in which the labels were first seen.
fn ranked<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<NameCount> {
    let mut position = BTreeMap::<&str, usize>::new();
    let mut counts: Vec<NameCount> = Vec::new();

    for label in labels {
        if label.is_empty() {
            continue;
        }
        if let Some(&i) = position.get(label) {
            counts[i].count += 1;
        } else {
            position.insert(label, counts.len());
            counts.push(NameCount {
                name: label.to_string(),
                count: 1,
            });
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The `n` cities with the most incidents.
pub fn top_cities<'a>(
    view: impl IntoIterator<Item = &'a DisasterRecord>,
    n: usize,
) -> Vec<NameCount> {
    let mut cities = ranked(view.into_iter().map(|r| r.city.as_str()));
    cities.truncate(n);
    cities
}

/// The `n` most frequent causes. Records without a cause are skipped.
pub fn top_causes<'a>(
    view: impl IntoIterator<Item = &'a DisasterRecord>,
    n: usize,
) -> Vec<NameCount> {
    let mut causes = ranked(view.into_iter().filter_map(|r| r.cause.as_deref()));
    causes.truncate(n);
    causes
}

/// Marker radius for a city with `count` incidents.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn marker_radius(count: u64) -> f64 {
    count as f64 / 10.0
}

fn locate(table: &CoordinateTable, city: NameCount) -> Option<GeoPoint> {
    table.get(&city.name).map(|c| GeoPoint {
        latitude: c.latitude,
        longitude: c.longitude,
        radius: marker_radius(city.count),
        count: city.count,
        city: city.name,
    })
}

/// Per-city incident counts placed on the map, ordered like
/// [`top_cities`]. Cities missing from `table` are dropped.
pub fn geo_join<'a>(
    view: impl IntoIterator<Item = &'a DisasterRecord>,
    table: &CoordinateTable,
) -> Vec<GeoPoint> {
    ranked(view.into_iter().map(|r| r.city.as_str()))
        .into_iter()
        .filter_map(|city| locate(table, city))
        .collect()
}

/// The map's companion table: the first `n` cities in alphabetical order,
/// then only those with coordinates. May hold fewer than `n` rows.
pub fn coordinate_rows<'a>(
    view: impl IntoIterator<Item = &'a DisasterRecord>,
    table: &CoordinateTable,
    n: usize,
) -> Vec<GeoPoint> {
    let mut counts = BTreeMap::<&str, u64>::new();
    for record in view {
        if !record.city.is_empty() {
            *counts.entry(record.city.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .take(n)
        .filter_map(|(name, count)| {
            locate(
                table,
                NameCount {
                    name: name.to_string(),
                    count,
                },
            )
        })
        .collect()
}

/// The first `n` records of the view.
pub fn preview<'a>(
    view: impl IntoIterator<Item = &'a DisasterRecord>,
    n: usize,
) -> Vec<&'a DisasterRecord> {
    view.into_iter().take(n).collect()
}

/// Headline metrics for `view`, with dataset-wide context from `records`.
pub fn summarize<'a>(
    view: impl IntoIterator<Item = &'a DisasterRecord>,
    records: &[DisasterRecord],
) -> Summary {
    let (mut incidents, mut deaths, mut damaged_houses) = (0_u64, 0_u64, 0_u64);
    for record in view {
        incidents += 1;
        deaths = deaths.saturating_add(record.death);
        damaged_houses = damaged_houses.saturating_add(record.damaged_house);
    }

    let distinct_cities = records
        .iter()
        .map(|r| r.city.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .len();

    Summary {
        incidents,
        deaths,
        damaged_houses,
        dataset_size: records.len() as u64,
        first_date: records.iter().map(|r| r.date).min(),
        last_date: records.iter().map(|r| r.date).max(),
        distinct_cities: distinct_cities as u64,
    }
}
