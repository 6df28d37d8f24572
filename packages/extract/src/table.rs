//! Raw tabular input: spreadsheets via `calamine`, CSV via `csv`.
//!
//! Every cell is reduced to optional text. Blank cells become `None`, which
//! is what the keyword filter treats as a missing value.

use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader as _, open_workbook_auto};
use flood_map_disaster_models::date::format_iso_date;

use crate::ExtractError;

/// One row of cells, aligned with [`Table::headers`].
pub type Row = Vec<Option<String>>;

/// A header row plus data rows, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names, in file order.
    pub headers: Vec<String>,
    /// Data rows, each padded or truncated to `headers.len()`.
    pub rows: Vec<Row>,
}

/// Input formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Excel / `OpenDocument` workbook (first worksheet is used).
    Spreadsheet,
    /// Comma-separated values with a header row.
    Csv,
}

impl InputFormat {
    /// Picks a format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnsupportedFormat`] for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Spreadsheet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(ExtractError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads `path` into a [`Table`], choosing the decoder by extension.
///
/// # Errors
///
/// Returns [`ExtractError`] if the file is missing, unreadable, or in an
/// unsupported format.
pub fn read_table(path: &Path) -> Result<Table, ExtractError> {
    log::info!("Reading {}", path.display());
    let table = match InputFormat::from_path(path)? {
        InputFormat::Spreadsheet => read_spreadsheet(path)?,
        InputFormat::Csv => read_csv(std::fs::File::open(path)?)?,
    };
    log::info!(
        "Read {} rows x {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Reads the first worksheet of a workbook. The first row is the header.
///
/// # Errors
///
/// Returns [`ExtractError`] if the workbook cannot be opened or has no
/// worksheets.
pub fn read_spreadsheet(path: &Path) -> Result<Table, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractError::EmptyWorkbook {
            path: PathBuf::from(path),
        })??;

    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Ok(Table::default());
    };

    let headers = header_names(header_cells.iter().map(cell_text));
    let width = headers.len();
    let rows = rows
        .map(|cells| align(cells.iter().map(cell_text).collect(), width))
        .collect();

    Ok(Table { headers, rows })
}

/// Reads CSV with a header row from any reader. Ragged rows are allowed.
///
/// # Errors
///
/// Returns [`ExtractError::Csv`] on malformed input.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, ExtractError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = header_names(rdr.headers()?.iter().map(non_blank));
    let width = headers.len();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(align(record.iter().map(non_blank).collect(), width));
    }

    Ok(Table { headers, rows })
}

/// Names header cells, substituting `Unnamed: N` for blanks.
fn header_names(cells: impl Iterator<Item = Option<String>>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(i, cell)| cell.unwrap_or_else(|| format!("Unnamed: {i}")))
        .collect()
}

fn align(mut row: Row, width: usize) -> Row {
    row.resize(width, None);
    row
}

fn non_blank(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Renders a spreadsheet cell as text. Date cells become ISO dates in the
/// workbook's own epoch (1900 or 1904); duration cells keep their raw
/// value, so they never pass as dates. Integral floats lose their
/// trailing `.0`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => non_blank(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => Some(format_float(dt.as_f64())),
        Data::DateTime(dt) => dt.as_datetime().map(|d| format_iso_date(d.date())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => non_blank(s),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}
