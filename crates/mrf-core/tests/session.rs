use mrf_core::{ClaimsSession, UpdateOutcome};
use mrf_model::{MrfError, RawRecord, RawValue};

fn row(npi: &str, rate: &str) -> RawRecord {
    RawRecord::new()
        .with("tin", "12-3456789")
        .with("providerName", "Acme Clinic")
        .with("npi", npi)
        .with("procedureCode", "99213")
        .with("billingCodeType", "CPT")
        .with("negotiatedRate", rate)
        .with("effectiveDate", "2024-01-01")
        .with("expirationDate", "2024-12-31")
}

fn session_with(rows: &[RawRecord]) -> ClaimsSession {
    let mut session = ClaimsSession::new();
    session.upload(rows);
    session
}

#[test]
fn upload_replaces_working_set() {
    let mut session = session_with(&[row("1234567890", "100"), row("bad", "100")]);
    assert_eq!(session.len(), 1);
    assert_eq!(session.errors().keys().copied().collect::<Vec<_>>(), vec![1]);

    let summary = session.upload(&[row("1234567891", "1"), row("1234567892", "2")]);
    assert_eq!((summary.total, summary.valid, summary.invalid), (2, 2, 0));
    assert_eq!(session.len(), 2);
    assert!(session.errors().is_empty());
}

#[test]
fn valid_update_replaces_claim_and_clears_errors() {
    let mut session = session_with(&[row("1234567890", "100")]);
    let bad = RawRecord::new().with("negotiatedRate", "x");
    assert!(matches!(
        session.update(0, &bad).unwrap(),
        UpdateOutcome::Rejected { .. }
    ));
    assert!(session.errors().contains_key(&0));

    let good = RawRecord::new().with("negotiatedRate", "120.5");
    assert_eq!(session.update(0, &good).unwrap(), UpdateOutcome::Applied);
    assert_eq!(session.claims()[0].negotiated_rate.to_string(), "120.5");
    assert!(session.errors().is_empty());
    assert!(session.draft(0).is_none());
}

#[test]
fn rejected_update_keeps_stored_claim_and_shows_edit() {
    let mut session = session_with(&[row("1234567890", "100")]);
    let patch = RawRecord::new()
        .with("providerName", "Renamed Clinic")
        .with("npi", "12");

    let outcome = session.update(0, &patch).unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::Rejected {
            errors: vec!["npi: NPI must be a 10-digit number".to_string()]
        }
    );
    assert_eq!(
        session.errors()[&0],
        vec!["npi: NPI must be a 10-digit number".to_string()]
    );
    // stored claim untouched
    assert_eq!(session.claims()[0].provider_name, "Acme Clinic");
    assert_eq!(session.claims()[0].npi, "1234567890");
    // displayed row reflects the rejected edit, other fields as edited
    let shown = session.display_row(0).unwrap();
    assert_eq!(shown.get("providerName"), Some(&RawValue::text("Renamed Clinic")));
    assert_eq!(shown.get("npi"), Some(&RawValue::text("12")));
    assert_eq!(shown.get("tin"), Some(&RawValue::text("12-3456789")));
}

#[test]
fn delete_renumbers_error_map() {
    let rows: Vec<RawRecord> = (0..4)
        .map(|i| row(&format!("123456789{i}"), "100"))
        .collect();
    let mut session = session_with(&rows);
    let bad = RawRecord::new().with("negotiatedRate", "-1");
    session.update(1, &bad).unwrap();
    session.update(3, &bad).unwrap();
    let before_one = session.errors()[&1].clone();
    let before_three = session.errors()[&3].clone();

    let removed = session.delete(2).unwrap();

    assert_eq!(removed.npi, "1234567892");
    assert_eq!(session.len(), 3);
    assert_eq!(session.errors().keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(session.errors()[&1], before_one);
    assert_eq!(session.errors()[&2], before_three);
    assert!(session.draft(2).is_some());
    assert!(session.draft(3).is_none());
}

#[test]
fn delete_drops_entry_at_index() {
    let rows: Vec<RawRecord> = (0..3)
        .map(|i| row(&format!("123456789{i}"), "100"))
        .collect();
    let mut session = session_with(&rows);
    session.update(1, &RawRecord::new().with("npi", "1")).unwrap();

    session.delete(1).unwrap();

    assert!(session.errors().is_empty());
    assert_eq!(session.claims()[1].npi, "1234567892");
}

#[test]
fn out_of_range_operations_fail() {
    let mut session = session_with(&[row("1234567890", "100")]);
    let err = session.update(1, &RawRecord::new()).unwrap_err();
    assert!(matches!(err, MrfError::IndexOutOfRange { index: 1, len: 1 }));
    assert!(matches!(
        session.delete(5),
        Err(MrfError::IndexOutOfRange { index: 5, len: 1 })
    ));
    assert_eq!(session.len(), 1);
}

#[test]
fn clear_is_idempotent() {
    let mut session = session_with(&[row("1234567890", "100"), row("x", "1")]);
    session.clear();
    assert!(session.is_empty());
    assert!(session.errors().is_empty());
    session.clear();
    assert!(session.is_empty());
}

#[test]
fn update_index_addresses_valid_claims_not_upload_rows() {
    let mut session = session_with(&[
        row("1234567890", "100"),
        row("bad", "100"),
        row("1234567892", "120"),
    ]);
    assert_eq!(session.errors().keys().copied().collect::<Vec<_>>(), vec![1]);

    let patch = RawRecord::new().with("negotiatedRate", "125");
    assert_eq!(session.update(1, &patch).unwrap(), UpdateOutcome::Applied);

    assert_eq!(session.claims()[1].npi, "1234567892");
    assert_eq!(session.claims()[1].negotiated_rate.to_string(), "125");
    assert!(session.errors().is_empty());
}
