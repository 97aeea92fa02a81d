use serde::Serialize;

use grants_validate::ValidationReport;

/// Structured per-run facts, exposed so callers (CLI, tests) can assert on
/// them rather than scrape log text.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub raw_rows: usize,
    pub grants: usize,
    pub progress_reports: usize,
    pub site_visits: usize,
    /// `1 - |Grants| / |rows|`, as a percentage: the share of raw rows that
    /// only repeated grant-level information.
    pub redundancy_percent: f64,
    pub validation: ValidationReport,
}

impl RunReport {
    pub fn new(
        raw_rows: usize,
        grants: usize,
        progress_reports: usize,
        site_visits: usize,
        validation: ValidationReport,
    ) -> Self {
        let redundancy_percent = if raw_rows == 0 {
            0.0
        } else {
            (1.0 - grants as f64 / raw_rows as f64) * 100.0
        };
        Self {
            raw_rows,
            grants,
            progress_reports,
            site_visits,
            redundancy_percent,
            validation,
        }
    }
}
