//! Referential and quality validation for the derived tables.
//!
//! Validation is one stateless pass producing a [`ValidationReport`]. It
//! never blocks write-back: orphaned foreign keys and low completeness are
//! warnings for the caller to weigh. The one exception is primary-key
//! uniqueness, which the key-synthesis rules guarantee; a mismatch there is
//! an engine bug and the engine treats it as fatal.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use grants_model::{Grant, GrantId, ProgressReport, SiteVisit, fields};

/// Distinct-vs-total key counts for one table.
#[derive(Debug, Clone, Serialize)]
pub struct KeyCheck {
    pub table: String,
    pub distinct: usize,
    pub total: usize,
}

impl KeyCheck {
    pub fn is_violated(&self) -> bool {
        self.distinct != self.total
    }
}

/// Share of rows with a field populated, per table and field.
#[derive(Debug, Clone, Serialize)]
pub struct Completeness {
    pub table: String,
    pub field: String,
    pub present: usize,
    pub total: usize,
    pub percent: f64,
}

/// Everything validation learned about one run's derived tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Grant ids referenced by progress reports but absent from Grants.
    pub orphaned_report_grants: BTreeSet<String>,
    /// Grant ids referenced by site visits but absent from Grants.
    pub orphaned_visit_grants: BTreeSet<String>,
    pub key_checks: Vec<KeyCheck>,
    pub completeness: Vec<Completeness>,
}

impl ValidationReport {
    pub fn warning_count(&self) -> usize {
        self.orphaned_report_grants.len() + self.orphaned_visit_grants.len()
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// First violated key check, if any. Fatal when present.
    pub fn key_violation(&self) -> Option<&KeyCheck> {
        self.key_checks.iter().find(|check| check.is_violated())
    }
}

/// Child `Grant_ID`s with no matching parent, sorted.
pub fn check_orphans<'a>(
    children: impl IntoIterator<Item = &'a GrantId>,
    parents: &BTreeSet<&str>,
) -> BTreeSet<String> {
    children
        .into_iter()
        .filter(|id| !parents.contains(id.as_str()))
        .map(|id| id.as_str().to_string())
        .collect()
}

/// Distinct-key count against row count for a table.
pub fn check_key_uniqueness(
    table: &str,
    keys: impl IntoIterator<Item = String>,
) -> KeyCheck {
    let mut distinct = BTreeSet::new();
    let mut total = 0usize;
    for key in keys {
        distinct.insert(key);
        total += 1;
    }
    KeyCheck {
        table: table.to_string(),
        distinct: distinct.len(),
        total,
    }
}

/// Percentage of rows where `field` is populated. Purely informational.
pub fn check_completeness(table: &str, field: &str, present: usize, total: usize) -> Completeness {
    let percent = if total == 0 {
        100.0
    } else {
        present as f64 / total as f64 * 100.0
    };
    Completeness {
        table: table.to_string(),
        field: field.to_string(),
        present,
        total,
        percent,
    }
}

/// Run every check over the three derived tables.
pub fn validate_tables(
    grants: &[Grant],
    reports: &[ProgressReport],
    visits: &[SiteVisit],
) -> ValidationReport {
    let parent_ids: BTreeSet<&str> = grants.iter().map(|g| g.grant_id.as_str()).collect();

    let orphaned_report_grants =
        check_orphans(reports.iter().map(|r| &r.fields.grant_id), &parent_ids);
    let orphaned_visit_grants =
        check_orphans(visits.iter().map(|v| &v.fields.grant_id), &parent_ids);
    for id in &orphaned_report_grants {
        warn!(grant_id = %id, "progress report references a grant that was never derived");
    }
    for id in &orphaned_visit_grants {
        warn!(grant_id = %id, "site visit references a grant that was never derived");
    }

    let key_checks = vec![
        check_key_uniqueness(
            "Grants",
            grants.iter().map(|g| g.grant_id.as_str().to_string()),
        ),
        check_key_uniqueness("Progress_Reports", reports.iter().map(|r| r.report_id.to_string())),
        check_key_uniqueness("Site_Visits", visits.iter().map(|v| v.visit_id.to_string())),
    ];

    let completeness = completeness_lines(grants, reports, visits);
    debug!(
        orphans = orphaned_report_grants.len() + orphaned_visit_grants.len(),
        completeness_lines = completeness.len(),
        "validation pass complete"
    );

    ValidationReport {
        orphaned_report_grants,
        orphaned_visit_grants,
        key_checks,
        completeness,
    }
}

fn completeness_lines(
    grants: &[Grant],
    reports: &[ProgressReport],
    visits: &[SiteVisit],
) -> Vec<Completeness> {
    let mut lines = Vec::new();

    let grant_total = grants.len();
    let grant_fields: &[(&str, fn(&Grant) -> bool)] = &[
        (fields::ORGANIZATION_NAME, |g| g.organization_name.is_some()),
        (fields::GRANT_AMOUNT, |g| g.grant_amount.is_some()),
        (fields::START_DATE, |g| g.start_date.is_some()),
        (fields::END_DATE, |g| g.end_date.is_some()),
        (fields::PROGRAM_OFFICER, |g| g.program_officer.is_some()),
        (fields::FOCUS_AREA, |g| g.focus_area.is_some()),
        (fields::STATUS, |g| g.status.is_some()),
    ];
    for (field, present) in grant_fields {
        let count = grants.iter().filter(|g| present(g)).count();
        lines.push(check_completeness("Grants", field, count, grant_total));
    }

    let report_total = reports.len();
    let report_fields: &[(&str, fn(&ProgressReport) -> bool)] = &[
        (fields::REPORTING_PERIOD, |r| r.fields.reporting_period.is_some()),
        (fields::REPORT_TYPE, |r| r.fields.report_type.is_some()),
        (fields::CLIENTS_SERVED, |r| r.fields.clients_served.is_some()),
        (fields::ACTIVITIES, |r| r.fields.activities.is_some()),
        (fields::CHALLENGES, |r| r.fields.challenges.is_some()),
        (fields::BUDGET_STATUS, |r| r.fields.budget_status.is_some()),
    ];
    for (field, present) in report_fields {
        let count = reports.iter().filter(|r| present(r)).count();
        lines.push(check_completeness("Progress_Reports", field, count, report_total));
    }

    let visit_total = visits.len();
    let visit_fields: &[(&str, fn(&SiteVisit) -> bool)] = &[
        (fields::VISIT_TYPE, |v| v.fields.visit_type.is_some()),
        (fields::VISITOR_NAME, |v| v.fields.visitor_name.is_some()),
        (fields::PURPOSE, |v| v.fields.purpose.is_some()),
        (fields::OBSERVATIONS, |v| v.fields.observations.is_some()),
        (fields::FOLLOW_UP_REQUIRED, |v| v.fields.follow_up_required.is_some()),
        (fields::FOLLOW_UP_NOTES, |v| v.fields.follow_up_notes.is_some()),
    ];
    for (field, present) in visit_fields {
        let count = visits.iter().filter(|v| present(v)).count();
        lines.push(check_completeness("Site_Visits", field, count, visit_total));
    }

    lines
}
