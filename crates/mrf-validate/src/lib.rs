//! Claim validation.
//!
//! [`validate_record`] checks one raw record against a [`FieldSchema`];
//! [`validate_all`] runs it over an upload and partitions the rows into
//! valid claims and an index → messages error map.

mod batch;
pub mod dates;
mod field;
mod schema;

pub use batch::validate_all;
pub use dates::parse_claim_date;
pub use field::{format_errors, parse_amount, validate_record};
pub use schema::{FieldKind, FieldSchema, FieldSpec};
