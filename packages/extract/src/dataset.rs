//! Typed view of an extracted flood CSV.

use std::io::Read;
use std::path::Path;

use flood_map_disaster_models::{ColumnIndex, DisasterRecord, RecordError};

use crate::ExtractError;
use crate::table::{self, Table};

/// Every record of an extracted CSV, in file order. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Header row of the source file.
    pub headers: Vec<String>,
    /// Parsed records.
    pub records: Vec<DisasterRecord>,
}

impl Dataset {
    /// Loads an extracted CSV from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file is missing or unreadable,
    /// [`ExtractError::MissingColumn`] if a required column is absent, and
    /// [`ExtractError::DataFormat`] for a row with an unparseable date.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        log::debug!("Loading dataset from {}", path.display());
        let dataset = Self::from_reader(std::fs::File::open(path)?)?;
        log::info!(
            "Loaded {} records from {}",
            dataset.records.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses an extracted CSV from any reader.
    ///
    /// # Errors
    ///
    /// See [`Dataset::load`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ExtractError> {
        Self::from_table(table::read_csv(reader)?)
    }

    /// Types every row of `table`.
    ///
    /// # Errors
    ///
    /// See [`Dataset::load`].
    pub fn from_table(table: Table) -> Result<Self, ExtractError> {
        let index = ColumnIndex::resolve(&table.headers)?;

        let records = table
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let fields: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
                DisasterRecord::from_fields(&index, &table.headers, &fields).map_err(
                    |RecordError::InvalidDate { value }| ExtractError::DataFormat {
                        row: i + 2,
                        value,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            headers: table.headers,
            records,
        })
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
