//! # CSV Combination Format
//!
//! Reads a combination table from comma-separated text with a header row:
//!
//! ```text
//! child,parent1,parent2
//! Direhowl,Lamball,Cattiva
//! ```
//!
//! - Columns are matched by header name, so their order may vary
//! - Extra columns are ignored
//! - Fields are trimmed
//! - Records that cannot be decoded are skipped and counted, never fatal
//!
//! Only a missing file, an unreadable stream, or a header without the three
//! required columns is an error.

use crate::primitives::{CHILD_COLUMN, PARENT1_COLUMN, PARENT2_COLUMN};
use crate::table::CombinationTable;
use crate::types::{Combination, PalBreedError};
use std::io::Read;
use std::path::Path;

/// Maximum size of a combination file (64 MB).
///
/// The full game table is well under a megabyte; anything larger is not a
/// combination table.
pub const MAX_DATA_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Load a combination table from a CSV file.
///
/// Returns `PalBreedError::DataSourceMissing` if `path` does not exist.
pub fn load_table(path: &Path) -> Result<CombinationTable, PalBreedError> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| PalBreedError::DataSourceMissing(path.display().to_string()))?;

    if !metadata.is_file() {
        return Err(PalBreedError::DataSourceMissing(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    if metadata.len() > MAX_DATA_FILE_SIZE {
        return Err(PalBreedError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_DATA_FILE_SIZE
        )));
    }

    let file = std::fs::File::open(path)
        .map_err(|e| PalBreedError::Io(format!("Open {}: {}", path.display(), e)))?;

    read_table(file)
}

/// Read a combination table from any CSV source.
pub fn read_table<R: Read>(source: R) -> Result<CombinationTable, PalBreedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| PalBreedError::Csv(e.to_string()))?;

    let missing: Vec<&str> = [CHILD_COLUMN, PARENT1_COLUMN, PARENT2_COLUMN]
        .into_iter()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if !missing.is_empty() {
        return Err(PalBreedError::Csv(format!(
            "Missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut table = CombinationTable::new();
    for record in reader.deserialize::<Combination>() {
        match record {
            Ok(row) => {
                table.insert(&row);
            }
            Err(e) if e.is_io_error() => return Err(PalBreedError::Io(e.to_string())),
            Err(_) => table.record_skipped(),
        }
    }

    Ok(table)
}

// =============================================================================
// TESTS
// =============================================================================
