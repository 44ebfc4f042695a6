use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The upload could not be read as a collection of records at all.
    #[error("failed to parse claims batch: {0}")]
    BatchParse(String),
    /// No valid claims reached aggregation.
    #[error("no valid claims to build an MRF document from")]
    EmptyInput,
    #[error("record index {index} is out of range (working set has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },
    /// Summing amounts left the representable decimal range.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A document failed a structural check against the output schema.
    #[error("document does not match the MRF schema: {0}")]
    Schema(String),
}

impl From<toml::de::Error> for MrfError {
    fn from(error: toml::de::Error) -> Self {
        MrfError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MrfError>;
