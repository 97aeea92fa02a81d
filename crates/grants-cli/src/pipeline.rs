//! The Source → Engine → Sink pipeline, strictly sequential.
//!
//! Stages:
//! 1. **Fetch**: materialize the full raw row set from the source
//! 2. **Normalize**: derive the three tables and the run report
//! 3. **Persist**: write each derived table through the sink
//!
//! The engine stage is pure; everything fallible about I/O stays in the
//! fetch and persist stages.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use grants_engine::{Normalization, normalize};
use grants_io::{
    ApiClient, ApiConfig, CsvSink, CsvSource, RecordSink, RecordSource, tables,
};
use grants_model::Record;

use crate::types::{RunOutcome, TableWrite};

/// Explicit settings for one pipeline run; nothing is read from globals
/// beyond the environment lookup for remote credentials.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub remote: bool,
    pub raw_table: String,
    pub dry_run: bool,
}

pub fn run(options: &RunOptions) -> Result<RunOutcome> {
    let (rows, mut sink, destination) = fetch_stage(options)?;
    info!(rows = rows.len(), table = %options.raw_table, "fetched raw rows");

    let normalization = normalize(&rows).context("normalization failed")?;
    if normalization.report.validation.has_warnings() {
        warn!(
            warnings = normalization.report.validation.warning_count(),
            "derived with warnings; review before trusting the output"
        );
    }

    let written = if options.dry_run {
        info!("dry run; skipping write-back");
        Vec::new()
    } else {
        persist_stage(sink.as_mut(), &normalization)?
    };

    Ok(RunOutcome {
        report: normalization.report,
        written,
        dry_run: options.dry_run,
        destination,
    })
}

/// Build the source and sink for the chosen mode and fetch every raw row.
fn fetch_stage(options: &RunOptions) -> Result<(Vec<Record>, Box<dyn RecordSink>, String)> {
    if options.remote {
        let config = ApiConfig::from_env()?;
        let destination = format!(
            "{}/{} (remote)",
            config.base_url.trim_end_matches('/'),
            config.base_id
        );
        let source = ApiClient::new(config.clone())?;
        let rows = source
            .fetch_all(&options.raw_table)
            .with_context(|| format!("fetching {}", options.raw_table))?;
        let sink = ApiClient::new(config)?;
        Ok((rows, Box::new(sink), destination))
    } else {
        let source = CsvSource::new(&options.input_dir);
        let rows = source
            .fetch_all(&options.raw_table)
            .with_context(|| format!("fetching {}", options.raw_table))?;
        let sink = CsvSink::new(&options.output_dir);
        Ok((rows, Box::new(sink), options.output_dir.display().to_string()))
    }
}

/// Write the three derived tables in parent-first order.
fn persist_stage(
    sink: &mut dyn RecordSink,
    normalization: &Normalization,
) -> Result<Vec<TableWrite>> {
    let mut written = Vec::new();

    let grants: Vec<Record> = normalization.grants.iter().map(|g| g.to_record()).collect();
    written.push(persist_table(sink, tables::GRANTS, &grants)?);

    let reports: Vec<Record> = normalization.reports.iter().map(|r| r.to_record()).collect();
    written.push(persist_table(sink, tables::PROGRESS_REPORTS, &reports)?);

    let visits: Vec<Record> = normalization.visits.iter().map(|v| v.to_record()).collect();
    written.push(persist_table(sink, tables::SITE_VISITS, &visits)?);

    Ok(written)
}

fn persist_table(
    sink: &mut dyn RecordSink,
    table: &str,
    records: &[Record],
) -> Result<TableWrite> {
    let rows = sink
        .persist(table, records)
        .with_context(|| format!("writing {table}"))?;
    info!(table, rows, "persisted table");
    Ok(TableWrite {
        table: table.to_string(),
        rows,
    })
}
