//! CSV uploads.
//!
//! The first non-empty row is the header. Cells are trimmed, empty cells
//! become [`RawValue::Missing`], and rows with no content are skipped. Short
//! rows are padded and cells past the last header column are ignored, so a
//! ragged row is still validated on its own. A file that cannot be read as a
//! header plus rows is a batch-level failure.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use mrf_model::{MrfError, RawRecord, RawValue, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> RawValue {
    let value = raw.trim().trim_matches('\u{feff}');
    if value.is_empty() {
        RawValue::Missing
    } else {
        RawValue::Text(value.to_string())
    }
}

fn parse_error(error: &csv::Error) -> MrfError {
    match error.position() {
        Some(position) => MrfError::BatchParse(format!("line {}: {error}", position.line())),
        None => MrfError::BatchParse(error.to_string()),
    }
}

/// Read CSV records from any reader.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| parse_error(&e))?;
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let Some(names) = headers.as_ref() else {
            headers = Some(parse_headers(&row)?);
            continue;
        };
        if row.len() > names.len() {
            warn!(
                line = row.position().map_or(0, csv::Position::line),
                extra = row.len() - names.len(),
                "ignoring cells past the last header column"
            );
        }
        let mut record = RawRecord::new();
        for (idx, name) in names.iter().enumerate() {
            let value = row.get(idx).map_or(RawValue::Missing, normalize_cell);
            record.insert(name.clone(), value);
        }
        records.push(record);
    }

    if headers.is_none() {
        return Err(MrfError::BatchParse("input has no header row".to_string()));
    }
    debug!(record_count = records.len(), "read csv records");
    Ok(records)
}

fn parse_headers(row: &csv::StringRecord) -> Result<Vec<String>> {
    let names: Vec<String> = row.iter().map(normalize_header).collect();
    let mut seen = BTreeSet::new();
    for name in &names {
        if name.is_empty() {
            return Err(MrfError::BatchParse(
                "header row contains an empty column name".to_string(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(MrfError::BatchParse(format!(
                "header row repeats column {name}"
            )));
        }
    }
    Ok(names)
}

pub fn read_csv_str(content: &str) -> Result<Vec<RawRecord>> {
    read_csv_records(content.as_bytes())
}

pub fn read_csv_path(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)?;
    read_csv_records(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_normalized() {
        assert_eq!(normalize_header("\u{feff} provider   Name "), "provider Name");
    }

    #[test]
    fn empty_cells_are_missing() {
        let records = read_csv_str("tin,description\n12-3456789,\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("description"), Some(&RawValue::Missing));
        assert_eq!(records[0].get("tin"), Some(&RawValue::text("12-3456789")));
    }

    #[test]
    fn short_rows_are_padded() {
        let records = read_csv_str("a,b,c\n1\n").unwrap();
        assert_eq!(records[0].get("c"), Some(&RawValue::Missing));
    }

    #[test]
    fn long_rows_drop_extra_cells() {
        let records = read_csv_str("tin,npi\n1,2\n3,4,5\n6,7\n").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].len(), 2);
        assert_eq!(records[1].get("npi"), Some(&RawValue::text("4")));
        assert_eq!(records[2].get("tin"), Some(&RawValue::text("6")));
    }

    #[test]
    fn missing_header_fails_the_batch() {
        let err = read_csv_str("\n  \n").unwrap_err();
        assert!(matches!(err, MrfError::BatchParse(_)));
    }
}
