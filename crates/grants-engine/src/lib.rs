//! The normalization engine.
//!
//! Consumes the full raw row set and produces three derived tables plus a
//! structured [`RunReport`]. The engine takes no configuration beyond the
//! rows it is given; Sources and Sinks are the caller's concern.

pub mod derive;
pub mod error;
pub mod report;

pub use derive::{derive_grants, derive_progress_reports, derive_site_visits};
pub use error::{EngineError, Result};
pub use report::RunReport;

use tracing::info;

use grants_model::{Grant, ProgressReport, Record, SiteVisit};
use grants_validate::validate_tables;

/// The full output of one engine run.
#[derive(Debug, Clone)]
pub struct Normalization {
    pub grants: Vec<Grant>,
    pub reports: Vec<ProgressReport>,
    pub visits: Vec<SiteVisit>,
    pub report: RunReport,
}

/// Run all three derivations, then validate.
///
/// Orphaned foreign keys and completeness gaps are warnings inside the run
/// report; a primary-key uniqueness failure is an engine bug and fails the
/// run.
pub fn normalize(rows: &[Record]) -> Result<Normalization> {
    let grants = derive_grants(rows)?;
    let reports = derive_progress_reports(rows)?;
    let visits = derive_site_visits(rows)?;

    let validation = validate_tables(&grants, &reports, &visits);
    if let Some(violation) = validation.key_violation() {
        return Err(EngineError::InvariantViolation {
            table: violation.table.clone(),
            detail: format!(
                "{} distinct keys across {} rows after synthesis",
                violation.distinct, violation.total
            ),
        });
    }

    let report = RunReport::new(
        rows.len(),
        grants.len(),
        reports.len(),
        visits.len(),
        validation,
    );
    info!(
        raw = report.raw_rows,
        grants = report.grants,
        reports = report.progress_reports,
        visits = report.site_visits,
        redundancy_percent = report.redundancy_percent,
        "normalization complete"
    );
    Ok(Normalization {
        grants,
        reports,
        visits,
        report,
    })
}
