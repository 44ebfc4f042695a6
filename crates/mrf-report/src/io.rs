use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use mrf_model::{MrfDocument, MrfError, Result};

use crate::check::check_document;

pub fn to_json_pretty(document: &MrfDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write the document as pretty-printed JSON, replacing any existing file.
pub fn write_document(path: &Path, document: &MrfDocument) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), "wrote MRF document");
    Ok(())
}

/// Parse JSON as an MRF document and run the structural checks.
///
/// Unknown keys, wrong enum values and malformed dates are schema errors.
pub fn parse_document(json: &str) -> Result<MrfDocument> {
    let document: MrfDocument =
        serde_json::from_str(json).map_err(|e| MrfError::Schema(e.to_string()))?;
    check_document(&document)?;
    Ok(document)
}

pub fn read_document(path: &Path) -> Result<MrfDocument> {
    let content = std::fs::read_to_string(path)?;
    parse_document(&content)
}
