//! Partition claims into buckets under a composite key.

use indexmap::IndexMap;

use mrf_model::{ClaimField, GroupKey, ValidatedClaim};

/// Buckets in first-seen key order; claims keep their input order.
pub type Buckets<'a> = IndexMap<GroupKey, Vec<&'a ValidatedClaim>>;

/// Key for one claim: the string form of each field, in `key_fields` order.
pub fn group_key(claim: &ValidatedClaim, key_fields: &[ClaimField]) -> GroupKey {
    GroupKey::from_parts(key_fields.iter().map(|field| claim.field_value(*field)))
}

/// Group claims by exact (case-sensitive) equality of the key fields.
pub fn group_claims<'a>(claims: &'a [ValidatedClaim], key_fields: &[ClaimField]) -> Buckets<'a> {
    let mut buckets: Buckets<'a> = IndexMap::new();
    for claim in claims {
        buckets
            .entry(group_key(claim, key_fields))
            .or_default()
            .push(claim);
    }
    tracing::debug!(
        claim_count = claims.len(),
        bucket_count = buckets.len(),
        "grouped claims"
    );
    buckets
}
