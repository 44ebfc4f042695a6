//! Grouping, aggregation, and the claims working set.

pub mod aggregate;
pub mod grouping;
pub mod session;

pub use aggregate::{aggregate, aggregate_all, mean, round_cents};
pub use grouping::{Buckets, group_claims, group_key};
pub use session::{ClaimsSession, UpdateOutcome, UploadSummary, renumber_after_delete};

use mrf_model::{AggregatedEntry, ReportingConfig, Result, ValidatedClaim};

/// Group `claims` by the configured key and aggregate every bucket.
pub fn summarize(claims: &[ValidatedClaim], config: &ReportingConfig) -> Result<Vec<AggregatedEntry>> {
    let buckets = group_claims(claims, &config.grouping_fields);
    aggregate_all(&buckets, &config.grouping_fields, config.rate_field)
}
