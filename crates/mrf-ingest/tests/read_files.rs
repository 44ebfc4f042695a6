use std::fs;

use mrf_ingest::{read_records_path, read_csv_path};
use mrf_model::{MrfError, RawValue};

#[test]
fn reads_csv_upload_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("claims.csv");
    fs::write(
        &path,
        "tin,providerName,npi,procedureCode\n\
         12-3456789,Acme Clinic,1234567890,99213\n\
         \n\
         98-7654321, Bay Medical ,0987654321,99214\n",
    )
    .expect("write csv");

    let records = read_csv_path(&path).expect("read csv");
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[1].get("providerName"),
        Some(&RawValue::text("Bay Medical"))
    );
}

#[test]
fn dispatches_on_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("claims.json");
    fs::write(&path, r#"{"claims": [{"npi": "1234567890"}, {"npi": null}]}"#).expect("write");

    let records = read_records_path(&path).expect("read json");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("npi"), Some(&RawValue::Missing));
}

#[test]
fn empty_file_is_a_batch_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("claims.csv");
    fs::write(&path, "\n\n").expect("write");

    let err = read_records_path(&path).unwrap_err();
    assert!(matches!(err, MrfError::BatchParse(_)));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("claims.txt");
    fs::write(&path, "a,b\n").expect("write");

    assert!(matches!(
        read_records_path(&path),
        Err(MrfError::BatchParse(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_csv_path(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, MrfError::Io(_)));
}
