//! JSON claim payloads: either `{"claims": [...]}` or a bare array.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use mrf_model::{MrfError, RawRecord, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Bare(Vec<Value>),
    Wrapped { claims: Vec<Value> },
}

pub fn read_json_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let payload: Payload = serde_json::from_reader(reader).map_err(|e| {
        MrfError::BatchParse(format!("expected a claims array or {{\"claims\": [...]}}: {e}"))
    })?;
    let values = match payload {
        Payload::Bare(values) => values,
        Payload::Wrapped { claims } => claims,
    };

    let mut records = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        // A non-object entry still occupies its position; as an empty record
        // it fails validation on its own.
        if !value.is_object() {
            warn!(position = idx, "claim entry is not an object");
            records.push(RawRecord::new());
            continue;
        }
        let record: RawRecord = serde_json::from_value(value).map_err(|e| {
            MrfError::BatchParse(format!("claim at position {idx} could not be read: {e}"))
        })?;
        records.push(record);
    }
    debug!(record_count = records.len(), "read json records");
    Ok(records)
}

pub fn read_json_str(content: &str) -> Result<Vec<RawRecord>> {
    read_json_records(content.as_bytes())
}

pub fn read_json_path(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)?;
    read_json_records(BufReader::new(file))
}
