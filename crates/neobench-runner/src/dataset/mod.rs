//! Dataset loader: CSV file -> ordered `Vec<Record>`.
//!
//! All-or-nothing. A missing file or a single row that cannot be coerced into
//! the record schema fails the whole load; there is no skip-bad-row policy.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use neobench_core::error::{NeoBenchError, Result};
use neobench_core::Record;

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        NeoBenchError::Dataset(format!("open {} failed: {e}", path.display()))
    })?;
    let records = load_from_reader(file)?;
    tracing::info!(path = %path.display(), records = records.len(), "dataset loaded");
    Ok(records)
}

pub fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<Record>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = row.map_err(|e| NeoBenchError::Dataset(format!("row {}: {e}", i + 2)))?;
        records.push(row);
    }
    Ok(records)
}

/// Batch sizes for a dataset of `total` records: 33%, 66%, and 100%.
pub fn batch_sizes(total: usize) -> [usize; 3] {
    let third = total / 3;
    [third, third * 2, total]
}
