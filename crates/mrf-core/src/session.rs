//! The editable claims working set.
//!
//! A [`ClaimsSession`] owns the claims from the latest upload together with
//! the row error map. Each caller holds its own session; nothing here is
//! shared or global.

use std::collections::BTreeMap;

use tracing::{debug, info};

use mrf_model::{
    BatchValidationResult, MrfError, RawRecord, Result, ValidatedClaim, ValidationErrorMap,
};
use mrf_validate::{FieldSchema, format_errors, validate_all, validate_record};

/// Result of [`ClaimsSession::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The merged record validated and replaced the stored claim.
    Applied,
    /// The merged record failed; the stored claim is unchanged and the edit
    /// is kept as the row's draft.
    Rejected { errors: Vec<String> },
}

/// Counts reported after an upload replaces the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ClaimsSession {
    schema: FieldSchema,
    claims: Vec<ValidatedClaim>,
    errors: ValidationErrorMap,
    drafts: BTreeMap<usize, RawRecord>,
}

impl ClaimsSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: FieldSchema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Validate `records` and replace the whole working set with the result.
    pub fn upload(&mut self, records: &[RawRecord]) -> UploadSummary {
        let result = validate_all(records, &self.schema);
        self.load(result)
    }

    /// Replace the working set with an already validated batch.
    pub fn load(&mut self, result: BatchValidationResult) -> UploadSummary {
        let summary = UploadSummary {
            total: result.total,
            valid: result.valid.len(),
            invalid: result.errors.len(),
        };
        self.claims = result.valid;
        self.errors = result.errors;
        self.drafts.clear();
        info!(
            valid = summary.valid,
            invalid = summary.invalid,
            "working set replaced"
        );
        summary
    }

    pub fn claims(&self) -> &[ValidatedClaim] {
        &self.claims
    }

    pub fn errors(&self) -> &ValidationErrorMap {
        &self.errors
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.claims.len() {
            Ok(())
        } else {
            Err(MrfError::IndexOutOfRange {
                index,
                len: self.claims.len(),
            })
        }
    }

    /// Merge `patch` into the claim at `index` and re-validate.
    ///
    /// On success the stored claim is replaced and the row's error entry
    /// and draft are cleared. On failure only the error entry changes; the
    /// merged edit becomes the row's draft so it can still be shown.
    ///
    /// `index` is a position in [`claims`](Self::claims), which holds only
    /// the valid rows. Error-map keys from an upload are indices into the
    /// uploaded batch, so after a partial failure the two numberings differ:
    /// a successful update at `k` also clears the upload error keyed `k`,
    /// even though that report belonged to a rejected input row.
    pub fn update(&mut self, index: usize, patch: &RawRecord) -> Result<UpdateOutcome> {
        self.check_index(index)?;
        let mut merged = self.claims[index].to_raw();
        merged.merge(patch);

        match validate_record(&merged, &self.schema) {
            Ok(claim) => {
                self.claims[index] = claim;
                self.errors.remove(&index);
                self.drafts.remove(&index);
                debug!(index, "claim updated");
                Ok(UpdateOutcome::Applied)
            }
            Err(field_errors) => {
                let errors = format_errors(&field_errors);
                self.errors.insert(index, errors.clone());
                self.drafts.insert(index, merged);
                debug!(index, error_count = errors.len(), "claim update rejected");
                Ok(UpdateOutcome::Rejected { errors })
            }
        }
    }

    /// What a caller should display for a row: the pending draft when the
    /// last edit was rejected, otherwise the stored claim.
    pub fn display_row(&self, index: usize) -> Result<RawRecord> {
        self.check_index(index)?;
        Ok(self
            .drafts
            .get(&index)
            .cloned()
            .unwrap_or_else(|| self.claims[index].to_raw()))
    }

    pub fn draft(&self, index: usize) -> Option<&RawRecord> {
        self.drafts.get(&index)
    }

    /// Remove the claim at `index` and shift later row errors down by one.
    pub fn delete(&mut self, index: usize) -> Result<ValidatedClaim> {
        self.check_index(index)?;
        let removed = self.claims.remove(index);
        self.errors = renumber_after_delete(std::mem::take(&mut self.errors), index);
        self.drafts = renumber_after_delete(std::mem::take(&mut self.drafts), index);
        debug!(index, remaining = self.claims.len(), "claim deleted");
        Ok(removed)
    }

    /// Empty the working set. Calling it again is a no-op.
    pub fn clear(&mut self) {
        self.claims.clear();
        self.errors.clear();
        self.drafts.clear();
    }
}

/// Drop the entry at `index`, keep lower keys, decrement higher keys.
pub fn renumber_after_delete<T>(map: BTreeMap<usize, T>, index: usize) -> BTreeMap<usize, T> {
    map.into_iter()
        .filter_map(|(key, value)| match key.cmp(&index) {
            std::cmp::Ordering::Less => Some((key, value)),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some((key - 1, value)),
        })
        .collect()
}
