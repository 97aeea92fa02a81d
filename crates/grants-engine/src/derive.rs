//! Table derivation: filter, project, deduplicate, sort, key-assign.
//!
//! Every operation here is a pure function of the full raw row set. The
//! stages are deliberately explicit so each one can be tested without
//! touching a Source or Sink.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use grants_model::{
    EntityKey, Grant, GrantId, KeyPrefix, ProgressReport, ProgressReportFields, Record, SiteVisit,
    SiteVisitFields,
};

use crate::error::{EngineError, Result};

fn ensure_rows(rows: &[Record]) -> Result<()> {
    if rows.is_empty() {
        return Err(EngineError::EmptySource);
    }
    Ok(())
}

/// Compare ISO dates chronologically, falling back to plain string order
/// when either side does not parse.
fn cmp_dates(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Project grant attributes from every row, deduplicate by full-row
/// equality, and sort ascending by `Grant_ID`.
///
/// Deduplication is NOT by `Grant_ID` alone: two rows sharing an id but
/// disagreeing on an attribute both survive, as a visible signal of
/// upstream inconsistency.
pub fn derive_grants(rows: &[Record]) -> Result<Vec<Grant>> {
    ensure_rows(rows)?;
    let mut grants: Vec<Grant> = Vec::new();
    for row in rows {
        let grant = Grant::from_record(row)?;
        if !grants.contains(&grant) {
            grants.push(grant);
        }
    }
    grants.sort_by(|a, b| a.grant_id.cmp(&b.grant_id));
    debug!(raw = rows.len(), grants = grants.len(), "derived grants");
    Ok(grants)
}

/// Keep rows with a report date, project, dedup, then assign `Report_ID`
/// ordinals by ascending report date within each grant's group.
pub fn derive_progress_reports(rows: &[Record]) -> Result<Vec<ProgressReport>> {
    ensure_rows(rows)?;
    let mut deduped: Vec<ProgressReportFields> = Vec::new();
    for row in rows {
        if let Some(fields) = ProgressReportFields::from_record(row)? {
            if !deduped.contains(&fields) {
                deduped.push(fields);
            }
        }
    }
    let mut groups: BTreeMap<GrantId, Vec<ProgressReportFields>> = BTreeMap::new();
    for fields in deduped {
        groups.entry(fields.grant_id.clone()).or_default().push(fields);
    }
    let mut reports = Vec::new();
    for (grant_id, mut group) in groups {
        group.sort_by(|a, b| cmp_dates(&a.report_date, &b.report_date));
        for (index, fields) in group.into_iter().enumerate() {
            let report_id = EntityKey::new(KeyPrefix::Report, &grant_id, index as u32 + 1)?;
            reports.push(ProgressReport { report_id, fields });
        }
    }
    debug!(raw = rows.len(), reports = reports.len(), "derived progress reports");
    Ok(reports)
}

/// Keep rows with a visit date, project, dedup, then assign `Visit_ID`
/// ordinals by ascending visit date within each grant's group.
pub fn derive_site_visits(rows: &[Record]) -> Result<Vec<SiteVisit>> {
    ensure_rows(rows)?;
    let mut deduped: Vec<SiteVisitFields> = Vec::new();
    for row in rows {
        if let Some(fields) = SiteVisitFields::from_record(row)? {
            if !deduped.contains(&fields) {
                deduped.push(fields);
            }
        }
    }
    let mut groups: BTreeMap<GrantId, Vec<SiteVisitFields>> = BTreeMap::new();
    for fields in deduped {
        groups.entry(fields.grant_id.clone()).or_default().push(fields);
    }
    let mut visits = Vec::new();
    for (grant_id, mut group) in groups {
        group.sort_by(|a, b| cmp_dates(&a.visit_date, &b.visit_date));
        for (index, fields) in group.into_iter().enumerate() {
            let visit_id = EntityKey::new(KeyPrefix::Visit, &grant_id, index as u32 + 1)?;
            visits.push(SiteVisit { visit_id, fields });
        }
    }
    debug!(raw = rows.len(), visits = visits.len(), "derived site visits");
    Ok(visits)
}
