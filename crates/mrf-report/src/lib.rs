//! MRF document assembly and output.

mod assemble;
mod check;
mod io;

pub use assemble::{assemble, assemble_on};
pub use check::check_document;
pub use io::{parse_document, read_document, to_json_pretty, write_document};

use chrono::NaiveDate;

use mrf_model::{MrfDocument, ReportingConfig, Result, ValidatedClaim};

/// Group, aggregate and assemble `claims` into a document dated today.
pub fn build_document(claims: &[ValidatedClaim], config: &ReportingConfig) -> Result<MrfDocument> {
    let entries = mrf_core::summarize(claims, config)?;
    assemble(&entries, config)
}

/// Like [`build_document`] with an explicit as-of date.
pub fn build_document_on(
    claims: &[ValidatedClaim],
    config: &ReportingConfig,
    as_of: NaiveDate,
) -> Result<MrfDocument> {
    let entries = mrf_core::summarize(claims, config)?;
    assemble_on(&entries, config, as_of)
}
