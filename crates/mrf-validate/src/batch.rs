use tracing::{debug, info, info_span};

use mrf_model::{BatchValidationResult, RawRecord, ValidationErrorMap};

use crate::field::{format_errors, validate_record};
use crate::schema::FieldSchema;

/// Validate every record of a batch.
///
/// Never stops at the first bad row: valid claims keep their relative order
/// and failing rows are reported under their original index.
pub fn validate_all(records: &[RawRecord], schema: &FieldSchema) -> BatchValidationResult {
    let span = info_span!("validate_batch", record_count = records.len());
    let _guard = span.enter();

    let mut valid = Vec::with_capacity(records.len());
    let mut errors = ValidationErrorMap::new();
    for (index, record) in records.iter().enumerate() {
        match validate_record(record, schema) {
            Ok(claim) => valid.push(claim),
            Err(field_errors) => {
                debug!(
                    index,
                    error_count = field_errors.len(),
                    fields = ?field_errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                    "record rejected"
                );
                errors.insert(index, format_errors(&field_errors));
            }
        }
    }

    info!(
        valid = valid.len(),
        invalid = errors.len(),
        "batch validated"
    );
    BatchValidationResult {
        valid,
        errors,
        total: records.len(),
    }
}
