//! Default file locations under the workspace `data/` directory.

use std::path::{Path, PathBuf};

/// File name of the source disaster spreadsheet.
pub const INPUT_FILE_NAME: &str = "data_bencana.xlsx";

/// File name of the extracted flood CSV.
pub const OUTPUT_FILE_NAME: &str = "data_banjir_jawa_barat.csv";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Default extractor input.
#[must_use]
pub fn default_input_path() -> PathBuf {
    data_dir().join(INPUT_FILE_NAME)
}

/// Default extractor output, which is also the dashboard's input.
#[must_use]
pub fn default_output_path() -> PathBuf {
    data_dir().join(OUTPUT_FILE_NAME)
}
