//! Stages behind the `mrf` subcommands: load, validate, build, write.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, info_span, trace};

use mrf_core::{ClaimsSession, UploadSummary};
use mrf_ingest::read_records_path;
use mrf_model::{MrfDocument, RawRecord, ReportingConfig, ValidationErrorMap};

use crate::logging::redact_value;

/// Prefix shared by every generated file name.
pub const OUTPUT_FILE_PREFIX: &str = "mrf-out-of-network-";

#[derive(Debug)]
pub struct ValidateRun {
    pub input: PathBuf,
    pub summary: UploadSummary,
    pub errors: ValidationErrorMap,
}

#[derive(Debug)]
pub struct GenerateRun {
    pub input: PathBuf,
    /// `None` when the document went to stdout.
    pub output: Option<PathBuf>,
    pub summary: UploadSummary,
    pub errors: ValidationErrorMap,
    pub document: MrfDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Load the reporting configuration, falling back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ReportingConfig> {
    let Some(path) = path else {
        return Ok(ReportingConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config = ReportingConfig::from_toml_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    info!(path = %path.display(), "loaded reporting config");
    Ok(config)
}

/// Read and validate an upload into a fresh working set.
pub fn load_session(input: &Path) -> Result<ClaimsSession> {
    let span = info_span!("ingest", input = %input.display());
    let _guard = span.enter();
    let records = read_records_path(input)
        .with_context(|| format!("read claims from {}", input.display()))?;
    let mut session = ClaimsSession::new();
    let summary = session.upload(&records);
    trace_rejected_rows(&records, session.errors());
    info!(
        total = summary.total,
        valid = summary.valid,
        invalid = summary.invalid,
        "claims loaded"
    );
    Ok(session)
}

fn trace_rejected_rows(records: &[RawRecord], errors: &ValidationErrorMap) {
    for index in errors.keys() {
        let Some(record) = records.get(*index) else {
            continue;
        };
        for (field, value) in record.iter() {
            let text = value.as_text().unwrap_or_default();
            trace!(row = index, field = %field, value = %redact_value(&text), "rejected row value");
        }
    }
}

fn session_summary(session: &ClaimsSession) -> UploadSummary {
    UploadSummary {
        total: session.len() + session.errors().len(),
        valid: session.len(),
        invalid: session.errors().len(),
    }
}

pub fn run_validate(input: &Path) -> Result<ValidateRun> {
    let session = load_session(input)?;
    Ok(ValidateRun {
        input: input.to_path_buf(),
        summary: session_summary(&session),
        errors: session.errors().clone(),
    })
}

/// Options for [`run_generate`].
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub to_stdout: bool,
    /// Overrides today's date; used for reproducible output.
    pub as_of: Option<NaiveDate>,
}

/// Validate `input`, build the MRF from the valid rows, and write it unless
/// `to_stdout` is set.
pub fn run_generate(input: &Path, options: &GenerateOptions) -> Result<GenerateRun> {
    let config = load_config(options.config.as_deref())?;
    let session = load_session(input)?;
    if session.is_empty() {
        bail!(
            "no valid claims in {} ({} rows rejected)",
            input.display(),
            session.errors().len()
        );
    }

    let span = info_span!("generate", claims = session.len());
    let _guard = span.enter();
    let document = match options.as_of {
        Some(as_of) => mrf_report::build_document_on(session.claims(), &config, as_of),
        None => mrf_report::build_document(session.claims(), &config),
    }
    .context("build MRF document")?;

    let output = if options.to_stdout {
        None
    } else {
        let path = options
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_output_name(Utc::now())));
        mrf_report::write_document(&path, &document)
            .with_context(|| format!("write {}", path.display()))?;
        Some(path)
    };

    Ok(GenerateRun {
        input: input.to_path_buf(),
        output,
        summary: session_summary(&session),
        errors: session.errors().clone(),
        document,
    })
}

pub fn run_check(path: &Path) -> Result<MrfDocument> {
    mrf_report::read_document(path).with_context(|| format!("check {}", path.display()))
}

/// `mrf-out-of-network-<ISO timestamp>.json`, with `:` and `.` replaced by
/// `-` so the name is valid on every filesystem.
pub fn default_output_name(now: DateTime<Utc>) -> String {
    format!(
        "{OUTPUT_FILE_PREFIX}{}.json",
        now.format("%Y-%m-%dT%H-%M-%S-%3fZ")
    )
}

/// Generated MRF files in `dir`, newest first.
pub fn list_generated(dir: &Path) -> Result<Vec<GeneratedFile>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(OUTPUT_FILE_PREFIX) || !name.ends_with(".json") {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        files.push(GeneratedFile {
            path: entry.path(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }
    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));
    Ok(files)
}
