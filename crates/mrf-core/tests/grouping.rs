use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::dec;

use mrf_core::{group_claims, group_key, summarize};
use mrf_model::{BillingClass, BillingCodeType, ClaimField, ReportingConfig, ValidatedClaim};

fn claim(code: &str, npi: &str, rate: Decimal) -> ValidatedClaim {
    ValidatedClaim {
        tin: "12-3456789".to_string(),
        provider_name: format!("Provider {npi}"),
        npi: npi.to_string(),
        procedure_code: code.to_string(),
        billing_code_type: BillingCodeType::Cpt,
        negotiated_rate: rate,
        billed_charge: None,
        effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        expiration_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        service_code: Some("11".to_string()),
        description: Some("Office visit".to_string()),
        billing_class: BillingClass::Professional,
        plan_name: None,
    }
}

const KEY: [ClaimField; 3] = [
    ClaimField::ProcedureCode,
    ClaimField::BillingCodeType,
    ClaimField::ServiceCode,
];

#[test]
fn ungrouped_fields_do_not_split_buckets() {
    let a = claim("99213", "1234567890", dec!(100));
    let mut b = claim("99213", "1234567891", dec!(110));
    b.description = Some("Something else".to_string());

    assert_eq!(group_key(&a, &KEY), group_key(&b, &KEY));
    let claims = [a, b];
    assert_eq!(group_claims(&claims, &KEY).len(), 1);
}

#[test]
fn any_grouped_field_splits_buckets() {
    let base = claim("99213", "1234567890", dec!(100));
    let mut other_type = base.clone();
    other_type.billing_code_type = BillingCodeType::Hcpcs;
    let mut other_service = base.clone();
    other_service.service_code = None;
    let mut other_case = base.clone();
    other_case.procedure_code = "G0439".to_string();
    let mut lower_case = other_case.clone();
    lower_case.procedure_code = "g0439".to_string();

    let claims = [base, other_type, other_service, other_case, lower_case];
    assert_eq!(group_claims(&claims, &KEY).len(), 5);
}

#[test]
fn bucket_order_is_first_seen_and_stable() {
    let claims = [
        claim("99214", "1234567890", dec!(1)),
        claim("99213", "1234567890", dec!(2)),
        claim("99214", "1234567891", dec!(3)),
    ];
    let buckets = group_claims(&claims, &[ClaimField::ProcedureCode]);
    let keys: Vec<&str> = buckets.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["99214", "99213"]);
    let rates: Vec<Decimal> = buckets[0].iter().map(|c| c.negotiated_rate).collect();
    assert_eq!(rates, vec![dec!(1), dec!(3)]);

    let again = group_claims(&claims, &[ClaimField::ProcedureCode]);
    assert_eq!(
        buckets.keys().collect::<Vec<_>>(),
        again.keys().collect::<Vec<_>>()
    );
}

#[test]
fn end_to_end_aggregation_scenario() {
    let claims = [
        claim("99213", "1234567890", dec!(100.00)),
        claim("99213", "1234567891", dec!(110.00)),
        claim("99213", "1234567890", dec!(105.00)),
        claim("99214", "1234567890", dec!(150.00)),
    ];
    let entries = summarize(&claims, &ReportingConfig::default()).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].billing_code, "99213");
    assert_eq!(entries[0].rate, dec!(105.00));
    assert_eq!(entries[0].claim_count, 3);
    assert_eq!(entries[0].providers.len(), 2);
    assert_eq!(entries[1].billing_code, "99214");
    assert_eq!(entries[1].rate, dec!(150.00));
    assert_eq!(entries[1].providers.len(), 1);
}
