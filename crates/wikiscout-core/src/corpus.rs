//! Line-delimited JSON corpus files
//!
//! The whole pipeline moves data through `.jsonl` files: one article or
//! chunk record per line. Reads tolerate malformed lines (skip, warn,
//! count); writes go through a temporary sibling file and a rename so a
//! failed run never leaves a truncated file at the destination.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of reading a `.jsonl` file
#[derive(Debug)]
pub struct ReadOutcome<T> {
    /// Successfully parsed records, in file order
    pub records: Vec<T>,
    /// Number of malformed lines that were skipped
    pub skipped: usize,
}

/// Read a `.jsonl` file, one JSON value per line.
///
/// Malformed lines are skipped with a warning and counted in the outcome.
/// A missing file is an error; nothing is returned and nothing is written.
pub fn read_jsonl<T, P>(path: P) -> Result<ReadOutcome<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::InputNotFound(path.display().to_string()));
    }

    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str(trimmed) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    "Skipping malformed line {} in {}: {}",
                    line_no + 1,
                    path.display(),
                    e
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            "{}: skipped {} malformed line(s), kept {}",
            path.display(),
            skipped,
            records.len()
        );
    }
    debug!("Read {} records from {}", records.len(), path.display());

    Ok(ReadOutcome { records, skipped })
}

/// Write records as line-delimited JSON.
///
/// The data lands in a `.tmp` sibling first and is renamed into place only
/// after every record has been flushed.
pub fn write_jsonl<T, P>(path: P, records: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("jsonl.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        for record in records {
            let line = serde_json::to_string(record)?;
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
        }
        file.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
