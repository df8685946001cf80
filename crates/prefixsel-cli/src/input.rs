//! Input discovery and `;`-delimited table reading.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_MATRIX_FILE: &str = "NFMOLE.csv";
pub const DEFAULT_WEIGHTS_FILE: &str = "weights.csv";
const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum InputError {
    #[error("[INPUT_NOT_FOUND] {name} not found in {}", root.display())]
    NotFound { name: String, root: PathBuf },
    #[error("[INPUT_UNREADABLE] {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("[CONFIG_UNREADABLE] {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("[CONFIG_INVALID] {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Locate `name` directly inside `root`. Subdirectories are not searched.
pub fn find_input(root: &Path, name: &str) -> Result<PathBuf, InputError> {
    let candidate = root.join(name);
    if candidate.is_file() {
        debug!(
            component = "cli",
            operation = "find_input",
            status = "success",
            path = %candidate.display(),
            "Found input file"
        );
        Ok(candidate)
    } else {
        Err(InputError::NotFound {
            name: name.to_string(),
            root: root.to_path_buf(),
        })
    }
}

/// Read a headerless `;`-delimited file into rows of trimmed fields.
///
/// Rows may differ in length; shape checks happen after sampling.
pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>, InputError> {
    let csv_error = |source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(
        component = "cli",
        operation = "read_table",
        status = "success",
        path = %path.display(),
        rows = rows.len() as u64,
        "Read delimited table"
    );
    Ok(rows)
}
