//! Unit tests for the validation pass.

use std::collections::BTreeSet;

use grants_model::{
    EntityKey, Grant, GrantId, KeyPrefix, ProgressReport, ProgressReportFields, SiteVisit,
    SiteVisitFields,
};
use grants_validate::{check_completeness, check_key_uniqueness, check_orphans, validate_tables};

fn grant(id: &str) -> Grant {
    Grant {
        grant_id: GrantId::new(id).unwrap(),
        organization_name: Some("Helping Hands".into()),
        grant_amount: Some(50000.0),
        start_date: None,
        end_date: None,
        program_officer: None,
        focus_area: None,
        status: Some("Active".into()),
    }
}

fn report(id: &str, ordinal: u32, date: &str) -> ProgressReport {
    let grant_id = GrantId::new(id).unwrap();
    ProgressReport {
        report_id: EntityKey::new(KeyPrefix::Report, &grant_id, ordinal).unwrap(),
        fields: ProgressReportFields {
            grant_id,
            report_date: date.to_string(),
            reporting_period: None,
            report_type: Some("Quarterly".into()),
            clients_served: Some(40),
            activities: None,
            challenges: None,
            budget_status: None,
        },
    }
}

fn visit(id: &str, ordinal: u32, date: &str) -> SiteVisit {
    let grant_id = GrantId::new(id).unwrap();
    SiteVisit {
        visit_id: EntityKey::new(KeyPrefix::Visit, &grant_id, ordinal).unwrap(),
        fields: SiteVisitFields {
            grant_id,
            visit_date: date.to_string(),
            visit_type: Some("Annual".into()),
            visitor_name: None,
            purpose: None,
            observations: None,
            follow_up_required: Some(false),
            follow_up_notes: None,
        },
    }
}

#[test]
fn orphans_are_the_set_difference() {
    let known = GrantId::new("GR-2023-0001").unwrap();
    let missing = GrantId::new("GR-2023-0099").unwrap();
    let parents: BTreeSet<&str> = BTreeSet::from(["GR-2023-0001"]);
    let orphans = check_orphans([&known, &missing, &missing], &parents);
    assert_eq!(orphans.len(), 1);
    assert!(orphans.contains("GR-2023-0099"));
}

#[test]
fn key_uniqueness_counts_distinct_against_total() {
    let check = check_key_uniqueness(
        "Grants",
        ["a", "b", "b"].into_iter().map(String::from),
    );
    assert_eq!(check.distinct, 2);
    assert_eq!(check.total, 3);
    assert!(check.is_violated());

    let clean = check_key_uniqueness("Grants", ["a", "b"].into_iter().map(String::from));
    assert!(!clean.is_violated());
}

#[test]
fn completeness_of_empty_table_is_full() {
    let line = check_completeness("Grants", "Status", 0, 0);
    assert_eq!(line.percent, 100.0);
    let line = check_completeness("Grants", "Status", 1, 4);
    assert_eq!(line.percent, 25.0);
}

#[test]
fn clean_tables_produce_no_warnings() {
    let grants = vec![grant("GR-2023-0001"), grant("GR-2023-0002")];
    let reports = vec![
        report("GR-2023-0001", 1, "2023-04-01"),
        report("GR-2023-0002", 1, "2023-05-01"),
    ];
    let visits = vec![visit("GR-2023-0001", 1, "2023-06-15")];

    let validation = validate_tables(&grants, &reports, &visits);
    assert!(!validation.has_warnings());
    assert!(validation.key_violation().is_none());
    assert!(validation.orphaned_report_grants.is_empty());
    assert!(validation.orphaned_visit_grants.is_empty());
}

#[test]
fn orphaned_children_surface_as_warnings_per_table() {
    let grants = vec![grant("GR-2023-0001")];
    let reports = vec![report("GR-2023-0404", 1, "2023-04-01")];
    let visits = vec![visit("GR-2023-0001", 1, "2023-06-15")];

    let validation = validate_tables(&grants, &reports, &visits);
    assert_eq!(validation.warning_count(), 1);
    assert!(validation.orphaned_report_grants.contains("GR-2023-0404"));
    assert!(validation.orphaned_visit_grants.is_empty());
    // Orphans are a data-quality warning, never a key violation.
    assert!(validation.key_violation().is_none());
}

#[test]
fn duplicate_synthesized_keys_are_a_violation() {
    let grants = vec![grant("GR-2023-0001")];
    let reports = vec![
        report("GR-2023-0001", 1, "2023-04-01"),
        report("GR-2023-0001", 1, "2023-07-01"),
    ];

    let validation = validate_tables(&grants, &reports, &[]);
    let violation = validation.key_violation().expect("duplicate key detected");
    assert_eq!(violation.table, "Progress_Reports");
    assert_eq!(violation.distinct, 1);
    assert_eq!(violation.total, 2);
}

#[test]
fn completeness_lines_cover_every_attribute() {
    let grants = vec![grant("GR-2023-0001")];
    let reports = vec![report("GR-2023-0001", 1, "2023-04-01")];
    let visits = vec![visit("GR-2023-0001", 1, "2023-06-15")];

    let validation = validate_tables(&grants, &reports, &visits);
    // 7 grant + 6 report + 6 visit attribute lines.
    assert_eq!(validation.completeness.len(), 19);
    let status = validation
        .completeness
        .iter()
        .find(|line| line.table == "Grants" && line.field == "Status")
        .expect("status line present");
    assert_eq!(status.percent, 100.0);
    let officer = validation
        .completeness
        .iter()
        .find(|line| line.table == "Grants" && line.field == "Program_Officer")
        .expect("officer line present");
    assert_eq!(officer.percent, 0.0);
}
