use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::claim::ClaimField;
use crate::enums::{BillingClass, BillingCodeType};

/// Joins grouping field values. Not expected in any code or identifier.
pub const GROUP_KEY_SEPARATOR: char = '\u{1f}';

/// Deterministic composite key for a bucket of claims.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Build a key from field values in the configured order.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for (idx, part) in parts.into_iter().enumerate() {
            if idx > 0 {
                key.push(GROUP_KEY_SEPARATOR);
            }
            key.push_str(part.as_ref());
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.split(GROUP_KEY_SEPARATOR)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.parts().collect();
        f.write_str(&parts.join("|"))
    }
}

/// A provider seen in a bucket, deduplicated by NPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub npi: String,
    pub name: String,
    pub tin: String,
    /// Mean billed charge for this provider within the bucket.
    #[serde(with = "rust_decimal::serde::float")]
    pub billed_charge: Decimal,
}

/// One bucket reduced to a single summary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    pub key: GroupKey,
    /// The grouping fields and the values this bucket shares.
    pub group_values: Vec<(ClaimField, String)>,
    pub billing_code: String,
    pub billing_code_type: BillingCodeType,
    pub description: Option<String>,
    pub service_code: Option<String>,
    pub billing_class: BillingClass,
    pub expiration_date: NaiveDate,
    pub plan_name: Option<String>,
    /// Mean of the rate field, rounded half away from zero to cents.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub claim_count: usize,
    pub providers: Vec<ProviderIdentity>,
}
