#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood record extraction pipeline.
//!
//! Reads the national disaster spreadsheet, keeps the rows whose disaster
//! type and province match the configured keywords, rewrites their dates as
//! ISO calendar dates, orders them by date, and writes the result as CSV.
//! The same crate also loads that CSV back as a typed [`dataset::Dataset`]
//! for the dashboard.

pub mod dataset;
pub mod interactive;
pub mod paths;
pub mod table;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flood_map_cli_utils::ProgressCallback;
use flood_map_disaster_models::{
    ColumnIndex, FilterKeywords, MissingColumnError,
    date::{format_iso_date, parse_record_date},
};

use crate::table::{Row, Table};

/// Number of rows shown in the post-extraction preview.
pub const PREVIEW_ROWS: usize = 5;

/// Errors that can occur during extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// I/O error reading the input or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decode or encode error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook decode error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook has no worksheets.
    #[error("Workbook {} has no worksheets", path.display())]
    EmptyWorkbook {
        /// Path of the workbook.
        path: PathBuf,
    },

    /// The input file extension is not a known format.
    #[error("Unsupported input format: {}", path.display())]
    UnsupportedFormat {
        /// Path of the input.
        path: PathBuf,
    },

    /// A required column is absent from the header row.
    #[error(transparent)]
    MissingColumn(#[from] MissingColumnError),

    /// A retained row's date could not be parsed.
    #[error("Row {row}: unparseable date '{value}'")]
    DataFormat {
        /// 1-based line number in the source, counting the header as line 1.
        row: usize,
        /// The raw date cell.
        value: String,
    },
}

/// Inputs for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Source spreadsheet or CSV.
    pub input: PathBuf,
    /// Destination CSV.
    pub output: PathBuf,
    /// Keywords selecting the retained rows.
    pub keywords: FilterKeywords,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input: paths::default_input_path(),
            output: paths::default_output_path(),
            keywords: FilterKeywords::default(),
        }
    }
}

/// One line of the post-extraction preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    /// ISO date.
    pub date: String,
    /// City cell, empty if blank.
    pub city: String,
    /// Disaster type cell.
    pub disaster_type: String,
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Data rows read from the input.
    pub rows_read: usize,
    /// Rows written to the output.
    pub retained: usize,
    /// First [`PREVIEW_ROWS`] written rows.
    pub preview: Vec<PreviewRow>,
}

impl ExtractSummary {
    /// Renders the preview as a fixed-width text table.
    #[must_use]
    pub fn preview_table(&self) -> String {
        let city_width = self
            .preview
            .iter()
            .map(|r| r.city.chars().count())
            .chain(std::iter::once(4))
            .max()
            .unwrap_or(4);

        let mut out = format!("{:<10}  {:<city_width$}  disaster_type\n", "date", "city");
        for row in &self.preview {
            out.push_str(&format!(
                "{:<10}  {:<city_width$}  {}\n",
                row.date, row.city, row.disaster_type
            ));
        }
        out
    }
}

/// A retained row with its parsed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRow {
    /// Parsed event date.
    pub date: NaiveDate,
    /// All cells of the row, date cell already rewritten as ISO text.
    pub cells: Row,
}

/// A retained row before date normalization, tagged with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRow {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    /// All cells of the row.
    pub cells: Row,
}

/// Keeps the rows whose disaster type and province contain the keywords.
///
/// Blank cells never match. Reports one progress tick per input row.
#[must_use]
pub fn filter_rows(
    table: Table,
    index: &ColumnIndex,
    keywords: &FilterKeywords,
    progress: &dyn ProgressCallback,
) -> Vec<MatchedRow> {
    progress.set_total(table.rows.len() as u64);
    progress.set_message("Filtering rows".to_string());

    let mut matched = Vec::new();
    for (i, cells) in table.rows.into_iter().enumerate() {
        let cell = |col: usize| cells.get(col).and_then(Option::as_deref);
        if keywords.matches(cell(index.disaster_type), cell(index.province)) {
            matched.push(MatchedRow {
                line: i + 2,
                cells,
            });
        }
        progress.inc(1);
    }

    progress.finish(format!("{} rows matched", matched.len()));
    matched
}

/// Parses every retained row's date and rewrites the cell as ISO text.
///
/// # Errors
///
/// Returns [`ExtractError::DataFormat`] for the first row whose date is
/// blank or unrecognized.
pub fn normalize_dates(
    rows: Vec<MatchedRow>,
    index: &ColumnIndex,
) -> Result<Vec<DatedRow>, ExtractError> {
    rows.into_iter()
        .map(|MatchedRow { line, mut cells }| {
            let raw = cells.get(index.date).cloned().flatten().unwrap_or_default();
            let date = parse_record_date(&raw).ok_or(ExtractError::DataFormat {
                row: line,
                value: raw,
            })?;
            if let Some(cell) = cells.get_mut(index.date) {
                *cell = Some(format_iso_date(date));
            }
            Ok(DatedRow { date, cells })
        })
        .collect()
}

/// Orders rows by date, keeping source order among equal dates.
pub fn sort_by_date(rows: &mut [DatedRow]) {
    rows.sort_by_key(|row| row.date);
}

/// Writes `headers` and `rows` to `path` as CSV.
///
/// The file is staged next to `path` and renamed into place, so a failed
/// write never leaves a partial file behind. Missing parent directories
/// are created.
///
/// # Errors
///
/// Returns [`ExtractError`] if the directory cannot be created or the file
/// cannot be written or renamed.
pub fn export_csv(path: &Path, headers: &[String], rows: &[DatedRow]) -> Result<(), ExtractError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let tmp = tempfile::NamedTempFile::new_in(&dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row.cells.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Runs the full read, filter, normalize, sort and export pipeline.
///
/// # Errors
///
/// Returns [`ExtractError`] if the input cannot be read, lacks a required
/// column, holds an unparseable retained date, or the output cannot be
/// written. Nothing is written on error.
pub fn run_extraction(
    options: &ExtractOptions,
    progress: &dyn ProgressCallback,
) -> Result<ExtractSummary, ExtractError> {
    let table = table::read_table(&options.input)?;
    let index = ColumnIndex::resolve(&table.headers)?;
    let headers = table.headers.clone();
    let rows_read = table.rows.len();

    log::info!(
        "Filtering {rows_read} rows for disaster type '{}' in province '{}'",
        options.keywords.disaster_type,
        options.keywords.province
    );
    let matched = filter_rows(table, &index, &options.keywords, progress);

    let mut rows = normalize_dates(matched, &index)?;
    sort_by_date(&mut rows);

    export_csv(&options.output, &headers, &rows)?;

    let text = |row: &DatedRow, col: usize| {
        row.cells
            .get(col)
            .cloned()
            .flatten()
            .unwrap_or_default()
    };
    let preview = rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| PreviewRow {
            date: format_iso_date(row.date),
            city: text(row, index.city),
            disaster_type: text(row, index.disaster_type),
        })
        .collect();

    log::info!("Retained {} of {rows_read} rows", rows.len());

    Ok(ExtractSummary {
        rows_read,
        retained: rows.len(),
        preview,
    })
}

#[cfg(test)]
mod tests {
    use flood_map_cli_utils::NullProgress;

    use super::*;

    const HEADERS: &str = "id,date,province,city,disaster_type,cause,death,damaged_house";

    fn write_input(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("input.csv");
        std::fs::write(&path, format!("{HEADERS}\n{body}")).unwrap();
        path
    }

    fn options(dir: &Path, input: PathBuf) -> ExtractOptions {
        ExtractOptions {
            input,
            output: dir.join("out").join("flood.csv"),
            keywords: FilterKeywords::default(),
        }
    }

    fn table(rows: &[[&str; 8]]) -> Table {
        Table {
            headers: HEADERS.split(',').map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|c| (!c.is_empty()).then(|| (*c).to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    #[test]
    fn extracts_west_java_floods_in_date_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "1,2021-03-01,JAWA BARAT,BANDUNG,BANJIR,Hujan,0,10\n\
             2,2020-01-01,JAWA TIMUR,SURABAYA,BANJIR,Hujan,1,3\n\
             3,2019-05-05,Jawa Barat,BEKASI,banjir bandang,Tanggul jebol,2,40\n",
        );
        let opts = options(dir.path(), input);

        let summary = run_extraction(&opts, &NullProgress).unwrap();

        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.retained, 2);
        assert_eq!(
            summary.preview,
            vec![
                PreviewRow {
                    date: "2019-05-05".to_string(),
                    city: "BEKASI".to_string(),
                    disaster_type: "banjir bandang".to_string(),
                },
                PreviewRow {
                    date: "2021-03-01".to_string(),
                    city: "BANDUNG".to_string(),
                    disaster_type: "BANJIR".to_string(),
                },
            ]
        );

        let table = summary.preview_table();
        assert!(table.starts_with("date        city     disaster_type\n"));
        assert!(table.contains("2019-05-05  BEKASI   banjir bandang\n"));

        let written = std::fs::read_to_string(&opts.output).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some(HEADERS));
        assert_eq!(
            lines.next(),
            Some("3,2019-05-05,Jawa Barat,BEKASI,banjir bandang,Tanggul jebol,2,40")
        );
        assert_eq!(
            lines.next(),
            Some("1,2021-03-01,JAWA BARAT,BANDUNG,BANJIR,Hujan,0,10")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn filter_keeps_rows_iff_both_keywords_match() {
        let t = table(&[
            ["1", "2020-01-01", "JAWA BARAT", "BOGOR", "BANJIR", "", "", ""],
            ["2", "2020-01-01", "JAWA BARAT", "BOGOR", "LONGSOR", "", "", ""],
            ["3", "2020-01-01", "BANTEN", "SERANG", "BANJIR", "", "", ""],
            ["4", "2020-01-01", "", "BOGOR", "BANJIR", "", "", ""],
            ["5", "2020-01-01", "JAWA BARAT", "BOGOR", "", "", "", ""],
            ["6", "2020-01-01", "prov jawa barat", "DEPOK", "Banjir Rob", "", "", ""],
        ]);
        let index = ColumnIndex::resolve(&t.headers).unwrap();

        let matched = filter_rows(t, &index, &FilterKeywords::default(), &NullProgress);

        let ids: Vec<_> = matched
            .iter()
            .map(|r| r.cells[0].as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "6"]);
        assert_eq!(matched[0].line, 2);
        assert_eq!(matched[1].line, 7);
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let t = table(&[
            ["a", "2020-02-01", "JAWA BARAT", "BOGOR", "BANJIR", "", "", ""],
            ["b", "2020-01-01", "JAWA BARAT", "BOGOR", "BANJIR", "", "", ""],
            ["c", "2020-02-01 08:00:00", "JAWA BARAT", "DEPOK", "BANJIR", "", "", ""],
            ["d", "01/01/2020", "JAWA BARAT", "DEPOK", "BANJIR", "", "", ""],
        ]);
        let index = ColumnIndex::resolve(&t.headers).unwrap();
        let matched = filter_rows(t, &index, &FilterKeywords::default(), &NullProgress);
        let mut rows = normalize_dates(matched, &index).unwrap();

        sort_by_date(&mut rows);

        let ids: Vec<_> = rows
            .iter()
            .map(|r| r.cells[0].as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
        assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(rows[1].cells[1].as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn exported_dates_reparse_to_the_same_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "1,05/03/2021,JAWA BARAT,GARUT,BANJIR,,,\n\
             2,2019-12-31T10:00:00,JAWA BARAT,BOGOR,BANJIR,,,\n\
             3,1 Jan 2020,JAWA BARAT,DEPOK,BANJIR,,,\n",
        );
        let opts = options(dir.path(), input);
        run_extraction(&opts, &NullProgress).unwrap();

        let reread = table::read_table(&opts.output).unwrap();
        let index = ColumnIndex::resolve(&reread.headers).unwrap();
        let dates: Vec<_> = reread
            .rows
            .iter()
            .map(|r| parse_record_date(r[index.date].as_deref().unwrap()).unwrap())
            .collect();
        let mut resorted = dates.clone();
        resorted.sort();
        assert_eq!(dates, resorted);
        assert_eq!(
            reread
                .rows
                .iter()
                .map(|r| r[index.date].clone().unwrap())
                .collect::<Vec<_>>(),
            vec!["2019-12-31", "2020-01-01", "2021-05-03"]
        );
    }

    #[test]
    fn extracts_from_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), table::tests::fixture("sample.xlsx"));

        let summary = run_extraction(&opts, &NullProgress).unwrap();

        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.retained, 2);
        assert_eq!(
            summary.preview,
            vec![
                PreviewRow {
                    date: "2019-05-05".to_string(),
                    city: "BEKASI".to_string(),
                    disaster_type: "Banjir".to_string(),
                },
                PreviewRow {
                    date: "2021-03-01".to_string(),
                    city: "BANDUNG".to_string(),
                    disaster_type: "BANJIR".to_string(),
                },
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&opts.output).unwrap(),
            format!(
                "{HEADERS}\n\
                 3,2019-05-05,Jawa Barat,BEKASI,Banjir,,2,40\n\
                 1,2021-03-01,JAWA BARAT,BANDUNG,BANJIR,Hujan deras,0,10\n"
            )
        );
    }

    #[test]
    fn unparseable_retained_date_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "1,2021-03-01,JAWA BARAT,BANDUNG,BANJIR,,,\n\
             2,kemarin,JAWA BARAT,BOGOR,BANJIR,,,\n",
        );
        let opts = options(dir.path(), input);

        let err = run_extraction(&opts, &NullProgress).unwrap_err();

        match err {
            ExtractError::DataFormat { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "kemarin");
            }
            other => panic!("expected data format error, got {other:?}"),
        }
        assert!(!opts.output.exists());
    }

    #[test]
    fn unparseable_date_in_dropped_row_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "1,2021-03-01,JAWA BARAT,BANDUNG,BANJIR,,,\n\
             2,kemarin,JAWA TENGAH,SEMARANG,BANJIR,,,\n",
        );
        let opts = options(dir.path(), input);

        let summary = run_extraction(&opts, &NullProgress).unwrap();

        assert_eq!(summary.retained, 1);
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "date,province,disaster_type\n2021-03-01,JAWA BARAT,BANJIR\n")
            .unwrap();
        let opts = options(dir.path(), path);

        let err = run_extraction(&opts, &NullProgress).unwrap_err();

        assert!(matches!(err, ExtractError::MissingColumn(_)));
        assert_eq!(err.to_string(), "missing required column 'city'");
    }

    #[test]
    fn export_replaces_existing_file_whole() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("flood.csv");
        std::fs::write(&out, "stale contents that are longer than the new file\n").unwrap();

        export_csv(&out, &["date".to_string()], &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "date\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn empty_match_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "1,2020-01-01,BANTEN,SERANG,BANJIR,,,\n");
        let opts = options(dir.path(), input);

        let summary = run_extraction(&opts, &NullProgress).unwrap();

        assert_eq!(summary.retained, 0);
        assert!(summary.preview.is_empty());
        assert_eq!(
            std::fs::read_to_string(&opts.output).unwrap(),
            format!("{HEADERS}\n")
        );
    }
}
