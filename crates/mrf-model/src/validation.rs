use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::claim::ValidatedClaim;

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Row index to `"field: reason"` messages, in field-declaration order.
pub type ValidationErrorMap = BTreeMap<usize, Vec<String>>;

/// Outcome of validating one uploaded batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidationResult {
    /// Valid claims, in input order with failing rows compacted out.
    #[serde(rename = "validRecords")]
    pub valid: Vec<ValidatedClaim>,
    /// Failing rows keyed by their original input index.
    #[serde(rename = "errorsByIndex")]
    pub errors: ValidationErrorMap,
    /// Number of input records seen.
    pub total: usize,
}

impl BatchValidationResult {
    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every input record is accounted for exactly once.
    pub fn is_complete(&self) -> bool {
        self.valid.len() + self.errors.len() == self.total
    }
}
