use anyhow::Result;

use mrf_cli::pipeline::{self, GenerateOptions};
use mrf_report::to_json_pretty;

use crate::cli::{CheckArgs, GenerateArgs, ListArgs, ValidateArgs};
use crate::summary::{print_check, print_errors, print_generate, print_listing, print_upload};

/// Exit code 1 when any row was rejected.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let run = pipeline::run_validate(&args.input)?;
    print_upload(&run.input, &run.summary);
    print_errors(&run.errors);
    Ok(if run.errors.is_empty() { 0 } else { 1 })
}

/// Rejected rows are reported but do not fail the command; only an input
/// with no valid rows does.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let options = GenerateOptions {
        config: args.config.clone(),
        output: args.output.clone(),
        to_stdout: args.stdout,
        as_of: None,
    };
    let run = pipeline::run_generate(&args.input, &options)?;
    if run.output.is_none() {
        println!("{}", to_json_pretty(&run.document)?);
        if !run.errors.is_empty() {
            eprintln!("{} rows rejected; run `mrf validate` for details", run.errors.len());
        }
        return Ok(0);
    }
    print_generate(&run);
    print_errors(&run.errors);
    Ok(0)
}

pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let document = pipeline::run_check(&args.path)?;
    print_check(&args.path, &document);
    Ok(0)
}

pub fn run_list(args: &ListArgs) -> Result<u8> {
    let files = pipeline::list_generated(&args.dir)?;
    print_listing(&files);
    Ok(0)
}
