//! Reduce a bucket of claims to one [`AggregatedEntry`].
//!
//! Amounts are summed and divided in exact decimal arithmetic and only the
//! final mean is rounded, half away from zero, to cents.

use indexmap::IndexMap;
use indexmap::map::Entry;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use mrf_model::{
    AggregatedEntry, ClaimField, GroupKey, MrfError, ProviderIdentity, Result, ValidatedClaim,
};

use crate::grouping::Buckets;

/// Round to two decimal places, half away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unrounded arithmetic mean; `Ok(None)` for no values.
///
/// Fails with [`MrfError::AmountOverflow`] when the running sum leaves the
/// decimal range.
pub fn mean<I>(values: I) -> Result<Option<Decimal>>
where
    I: IntoIterator<Item = Decimal>,
{
    let mut sum = Decimal::ZERO;
    let mut count = 0u64;
    for value in values {
        sum = sum.checked_add(value).ok_or_else(|| {
            MrfError::AmountOverflow("sum of amounts exceeds the decimal range".to_string())
        })?;
        count += 1;
    }
    if count == 0 {
        return Ok(None);
    }
    sum.checked_div(Decimal::from(count))
        .map(Some)
        .ok_or_else(|| MrfError::AmountOverflow(format!("mean of {count} amounts")))
}

#[derive(Debug)]
struct ProviderTally<'a> {
    name: &'a str,
    tin: &'a str,
    rates: Vec<Decimal>,
    billed: Vec<Decimal>,
}

/// Aggregate one bucket.
///
/// Descriptive fields come from the first claim. Providers are deduplicated
/// by NPI and the first claim seen for an NPI supplies its name and TIN.
pub fn aggregate(
    key: &GroupKey,
    bucket: &[&ValidatedClaim],
    key_fields: &[ClaimField],
    rate_field: ClaimField,
) -> Result<AggregatedEntry> {
    let Some(first) = bucket.first() else {
        return Err(MrfError::EmptyInput);
    };

    let rate = mean(bucket.iter().filter_map(|claim| claim.amount(rate_field)))
        .map_err(|_| bucket_overflow(key, rate_field.name()))?
        .map(round_cents)
        .unwrap_or(Decimal::ZERO);

    let mut tallies: IndexMap<&str, ProviderTally<'_>> = IndexMap::new();
    for claim in bucket {
        match tallies.entry(claim.npi.as_str()) {
            Entry::Occupied(mut slot) => {
                let tally = slot.get_mut();
                if tally.name != claim.provider_name || tally.tin != claim.tin {
                    warn!(
                        key = %key,
                        npi = %claim.npi,
                        "provider name or TIN disagrees within bucket; keeping first"
                    );
                }
                tally.rates.push(claim.negotiated_rate);
                tally.billed.extend(claim.billed_charge);
            }
            Entry::Vacant(slot) => {
                slot.insert(ProviderTally {
                    name: &claim.provider_name,
                    tin: &claim.tin,
                    rates: vec![claim.negotiated_rate],
                    billed: claim.billed_charge.into_iter().collect(),
                });
            }
        }
    }

    let mut providers = Vec::with_capacity(tallies.len());
    for (npi, tally) in tallies {
        let billed = match mean(tally.billed.iter().copied()) {
            Ok(None) => mean(tally.rates.iter().copied()),
            other => other,
        }
        .map_err(|_| bucket_overflow(key, "billedCharge"))?;
        providers.push(ProviderIdentity {
            npi: npi.to_string(),
            name: tally.name.to_string(),
            tin: tally.tin.to_string(),
            billed_charge: billed.map(round_cents).unwrap_or(Decimal::ZERO),
        });
    }

    Ok(AggregatedEntry {
        key: key.clone(),
        group_values: key_fields
            .iter()
            .map(|field| (*field, first.field_value(*field).into_owned()))
            .collect(),
        billing_code: first.procedure_code.clone(),
        billing_code_type: first.billing_code_type,
        description: first.description.clone(),
        service_code: first.service_code.clone(),
        billing_class: first.billing_class,
        expiration_date: first.expiration_date,
        plan_name: first.plan_name.clone(),
        rate,
        claim_count: bucket.len(),
        providers,
    })
}

fn bucket_overflow(key: &GroupKey, field: &str) -> MrfError {
    MrfError::AmountOverflow(format!("mean {field} of bucket {key} exceeds the decimal range"))
}

/// Aggregate every bucket, preserving bucket order.
pub fn aggregate_all(
    buckets: &Buckets<'_>,
    key_fields: &[ClaimField],
    rate_field: ClaimField,
) -> Result<Vec<AggregatedEntry>> {
    buckets
        .iter()
        .map(|(key, bucket)| aggregate(key, bucket, key_fields, rate_field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_cents(dec!(10.005)), dec!(10.01));
        assert_eq!(round_cents(dec!(10.015)), dec!(10.02));
        assert_eq!(round_cents(dec!(10.0049)), dec!(10.00));
        assert_eq!(round_cents(dec!(0.005)), dec!(0.01));
        assert_eq!(round_cents(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn mean_is_exact_before_rounding() {
        assert_eq!(mean([dec!(10.005), dec!(10.015)]).unwrap(), Some(dec!(10.01)));
        assert_eq!(
            mean([dec!(10.004), dec!(10.006)]).unwrap().map(round_cents),
            Some(dec!(10.01))
        );
        assert_eq!(
            mean([dec!(0.01), dec!(0.02), dec!(0.02)]).unwrap().map(round_cents),
            Some(dec!(0.02))
        );
        assert_eq!(mean(std::iter::empty()).unwrap(), None);
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        assert!(matches!(mean([huge, huge]), Err(MrfError::AmountOverflow(_))));
        assert_eq!(mean([huge]).unwrap(), Some(huge));
    }
}
