//! Traffic record loading
//!
//! Record files are either a single JSON array of records or
//! newline-delimited JSON (one record per line, blank lines skipped). The
//! format is picked from the first non-whitespace character.

use std::fs;
use std::path::Path;

use crate::domain::TrafficRecord;
use crate::errors::{Error, Result};

/// Read traffic records from a file
pub fn load_records(path: &Path) -> Result<Vec<TrafficRecord>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_context(format!("Failed to read {}", path.display())))?;
    parse_records(&contents)
}

/// Parse traffic records from a JSON array or NDJSON document
pub fn parse_records(contents: &str) -> Result<Vec<TrafficRecord>> {
    if contents.trim_start().starts_with('[') {
        return serde_json::from_str(contents)
            .map_err(|e| Error::input_at_line(e.to_string(), e.line()));
    }

    let mut records = Vec::new();
    for (n, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<TrafficRecord>(line)
            .map_err(|e| Error::input_at_line(e.to_string(), n + 1))?;
        records.push(record);
    }
    Ok(records)
}
