use std::path::Path;

use mrf_model::{MrfError, RawRecord, Result};

use crate::csv_records::read_csv_path;
use crate::json_records::read_json_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick the reader from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

/// Read an upload of either supported format.
pub fn read_records_path(path: &Path) -> Result<Vec<RawRecord>> {
    match InputFormat::from_path(path) {
        Some(InputFormat::Csv) => read_csv_path(path),
        Some(InputFormat::Json) => read_json_path(path),
        None => Err(MrfError::BatchParse(format!(
            "unsupported input file type: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("claims.CSV")),
            Some(InputFormat::Csv)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("a/b/claims.json")),
            Some(InputFormat::Json)
        );
        assert_eq!(InputFormat::from_path(Path::new("claims.xlsx")), None);
        assert_eq!(InputFormat::from_path(Path::new("claims")), None);
    }
}
