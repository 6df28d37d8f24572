//! Plain-text rendering of a computed dashboard.
//!
//! Charts become horizontal text bars scaled to the largest value in each
//! series; the cause chart shows each cause's share of the listed causes.

use std::fmt;

use console::style;
use flood_map_analytics_models::{GeoPoint, NameCount};
use flood_map_dashboard_models::{ApiDashboard, ApiRecord, ApiSelection};

/// Width of the longest bar, in characters.
const BAR_WIDTH: usize = 40;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Renders every panel of `dashboard` as text.
#[must_use]
pub fn render(dashboard: &ApiDashboard) -> String {
    Report(dashboard).to_string()
}

/// Text form of an [`ApiDashboard`].
struct Report<'a>(&'a ApiDashboard);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = self.0;

        heading(f, "West Java Flood Dashboard")?;
        writeln!(f, "Selection: {}", describe(&dashboard.selection))?;

        write_summary(f, dashboard)?;
        write_preview(f, &dashboard.preview)?;

        heading(f, "Incidents per city (top 10)")?;
        write_bars(
            f,
            dashboard
                .charts
                .top_cities
                .iter()
                .map(|c| (c.name.clone(), c.count)),
        )?;

        heading(f, "Trend per year")?;
        write_bars(
            f,
            dashboard
                .charts
                .per_year
                .iter()
                .map(|y| (y.year.to_string(), y.count)),
        )?;

        heading(f, "Incidents per month")?;
        write_bars(
            f,
            dashboard.charts.per_month.iter().map(|m| {
                let label = usize::try_from(m.month)
                    .ok()
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| MONTHS.get(i))
                    .map_or_else(|| m.month.to_string(), |name| (*name).to_string());
                (label, m.count)
            }),
        )?;

        heading(f, "Top causes")?;
        write_shares(f, &dashboard.charts.top_causes)?;

        heading(f, "Map markers")?;
        write_markers(f, &dashboard.map.coordinate_rows)
    }
}

fn heading(f: &mut impl fmt::Write, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", style(title).bold())
}

fn describe(selection: &ApiSelection) -> String {
    let year = selection
        .year
        .map_or_else(|| "all years".to_string(), |y| y.to_string());
    let city = selection.city.as_deref().unwrap_or("all cities");
    format!("{year}, {city}")
}

fn write_summary(f: &mut impl fmt::Write, dashboard: &ApiDashboard) -> fmt::Result {
    let summary = &dashboard.summary;
    heading(f, "Summary")?;
    writeln!(f, "  Incidents       {}", summary.incidents)?;
    writeln!(f, "  Deaths          {}", summary.deaths)?;
    writeln!(f, "  Damaged houses  {}", summary.damaged_houses)?;
    writeln!(f, "  Dataset size    {} records", summary.dataset_size)?;
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => writeln!(f, "  Period          {first} to {last}")?,
        _ => writeln!(f, "  Period          -")?,
    }
    writeln!(f, "  Cities          {}", summary.distinct_cities)
}

fn write_preview(f: &mut impl fmt::Write, rows: &[ApiRecord]) -> fmt::Result {
    heading(f, "Sample data")?;
    if rows.is_empty() {
        return writeln!(f, "  (no records)");
    }

    let city_width = column_width("city", rows.iter().map(|r| r.city.as_str()));
    let type_width = column_width(
        "disaster_type",
        rows.iter().map(|r| r.disaster_type.as_str()),
    );
    writeln!(
        f,
        "  {:<10}  {:<city_width$}  {:<type_width$}  {:>5}  {:>6}  cause",
        "date", "city", "disaster_type", "death", "houses"
    )?;
    for row in rows {
        let date = row.date.to_string();
        writeln!(
            f,
            "  {date:<10}  {:<city_width$}  {:<type_width$}  {:>5}  {:>6}  {}",
            row.city,
            row.disaster_type,
            row.death,
            row.damaged_house,
            row.cause.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

/// Scales `count` against `max` to at most [`BAR_WIDTH`] characters. Any
/// non-zero count gets at least one character.
fn bar(count: u64, max: u64) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = u64::try_from(BAR_WIDTH).unwrap_or(u64::MAX);
    let len = (count.saturating_mul(width) / max).max(1);
    "#".repeat(usize::try_from(len).unwrap_or(BAR_WIDTH))
}

fn write_bars(
    f: &mut impl fmt::Write,
    series: impl Iterator<Item = (String, u64)>,
) -> fmt::Result {
    let series: Vec<_> = series.collect();
    if series.is_empty() {
        return writeln!(f, "  (no data)");
    }

    let label_width = column_width("", series.iter().map(|(label, _)| label.as_str()));
    let max = series.iter().map(|(_, count)| *count).max().unwrap_or(0);
    for (label, count) in &series {
        writeln!(f, "  {label:<label_width$}  {} {count}", bar(*count, max))?;
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn write_shares(f: &mut impl fmt::Write, causes: &[NameCount]) -> fmt::Result {
    let total: u64 = causes.iter().map(|c| c.count).sum();
    if total == 0 {
        return writeln!(f, "  (no data)");
    }

    let label_width = column_width("", causes.iter().map(|c| c.name.as_str()));
    for cause in causes {
        let share = cause.count as f64 * 100.0 / total as f64;
        writeln!(
            f,
            "  {:<label_width$}  {share:>5.1}%  ({})",
            cause.name, cause.count
        )?;
    }
    Ok(())
}

fn write_markers(f: &mut impl fmt::Write, rows: &[GeoPoint]) -> fmt::Result {
    if rows.is_empty() {
        return writeln!(f, "  (no mapped cities)");
    }

    let city_width = column_width("city", rows.iter().map(|r| r.city.as_str()));
    writeln!(
        f,
        "  {:<city_width$}  {:>9}  {:>9}  {:>5}",
        "city", "latitude", "longitude", "count"
    )?;
    for row in rows {
        writeln!(
            f,
            "  {:<city_width$}  {:>9.4}  {:>9.4}  {:>5}",
            row.city, row.latitude, row.longitude, row.count
        )?;
    }
    Ok(())
}
