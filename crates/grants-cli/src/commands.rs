use anyhow::{Context, Result};

use grants_io::tables;
use grants_model::fields;

use grants_cli::pipeline::{RunOptions, run};
use grants_cli::types::RunOutcome;

use crate::cli::RunArgs;

pub fn run_normalize(args: &RunArgs) -> Result<RunOutcome> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.join("output"));
    let options = RunOptions {
        input_dir: args.input_dir.clone(),
        output_dir,
        remote: args.remote,
        raw_table: args.raw_table.clone().unwrap_or_else(|| tables::RAW.to_string()),
        dry_run: args.dry_run,
    };
    run(&options)
}

pub fn print_json(outcome: &RunOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serializing run report")?;
    println!("{json}");
    Ok(())
}

pub fn run_fields() {
    println!("Raw table ({}):", tables::RAW);
    for field in fields::RAW_FIELDS {
        println!("  {field}");
    }
    println!("\n{}:", tables::GRANTS);
    for field in fields::GRANT_FIELDS {
        println!("  {field}");
    }
    println!("\n{}:", tables::PROGRESS_REPORTS);
    for field in fields::REPORT_FIELDS {
        println!("  {field}");
    }
    println!("\n{}:", tables::SITE_VISITS);
    for field in fields::VISIT_FIELDS {
        println!("  {field}");
    }
}
