//! The fixed field schema shared by the raw table and the derived tables.
//!
//! Every raw record carries all 22 fields (absent ones read as missing).
//! The per-table slices below define both the projection the engine applies
//! and the column order the CSV sink writes.

pub const GRANT_ID: &str = "Grant_ID";

pub const ORGANIZATION_NAME: &str = "Organization_Name";
pub const GRANT_AMOUNT: &str = "Grant_Amount";
pub const START_DATE: &str = "Start_Date";
pub const END_DATE: &str = "End_Date";
pub const PROGRAM_OFFICER: &str = "Program_Officer";
pub const FOCUS_AREA: &str = "Focus_Area";
pub const STATUS: &str = "Status";

pub const REPORT_ID: &str = "Report_ID";
pub const REPORT_DATE: &str = "Report_Date";
pub const REPORTING_PERIOD: &str = "Reporting_Period";
pub const REPORT_TYPE: &str = "Report_Type";
pub const CLIENTS_SERVED: &str = "Clients_Served";
pub const ACTIVITIES: &str = "Activities";
pub const CHALLENGES: &str = "Challenges";
pub const BUDGET_STATUS: &str = "Budget_Status";

pub const VISIT_ID: &str = "Visit_ID";
pub const VISIT_DATE: &str = "Visit_Date";
pub const VISIT_TYPE: &str = "Visit_Type";
pub const VISITOR_NAME: &str = "Visitor_Name";
pub const PURPOSE: &str = "Purpose";
pub const OBSERVATIONS: &str = "Observations";
pub const FOLLOW_UP_REQUIRED: &str = "Follow_Up_Required";
pub const FOLLOW_UP_NOTES: &str = "Follow_Up_Notes";

/// Grant-attribute projection (8 columns).
pub const GRANT_FIELDS: &[&str] = &[
    GRANT_ID,
    ORGANIZATION_NAME,
    GRANT_AMOUNT,
    START_DATE,
    END_DATE,
    PROGRAM_OFFICER,
    FOCUS_AREA,
    STATUS,
];

/// Progress-report output columns, synthesized key first.
pub const REPORT_FIELDS: &[&str] = &[
    REPORT_ID,
    GRANT_ID,
    REPORT_DATE,
    REPORTING_PERIOD,
    REPORT_TYPE,
    CLIENTS_SERVED,
    ACTIVITIES,
    CHALLENGES,
    BUDGET_STATUS,
];

/// Site-visit output columns, synthesized key first.
pub const VISIT_FIELDS: &[&str] = &[
    VISIT_ID,
    GRANT_ID,
    VISIT_DATE,
    VISIT_TYPE,
    VISITOR_NAME,
    PURPOSE,
    OBSERVATIONS,
    FOLLOW_UP_REQUIRED,
    FOLLOW_UP_NOTES,
];

/// Every field a raw record may carry.
pub const RAW_FIELDS: &[&str] = &[
    GRANT_ID,
    ORGANIZATION_NAME,
    GRANT_AMOUNT,
    START_DATE,
    END_DATE,
    PROGRAM_OFFICER,
    FOCUS_AREA,
    STATUS,
    REPORT_DATE,
    REPORTING_PERIOD,
    REPORT_TYPE,
    CLIENTS_SERVED,
    ACTIVITIES,
    CHALLENGES,
    BUDGET_STATUS,
    VISIT_DATE,
    VISIT_TYPE,
    VISITOR_NAME,
    PURPOSE,
    OBSERVATIONS,
    FOLLOW_UP_REQUIRED,
    FOLLOW_UP_NOTES,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_schema_covers_all_projections() {
        for field in GRANT_FIELDS {
            assert!(RAW_FIELDS.contains(field), "missing {field}");
        }
        for field in REPORT_FIELDS.iter().filter(|&&f| f != REPORT_ID) {
            assert!(RAW_FIELDS.contains(field), "missing {field}");
        }
        for field in VISIT_FIELDS.iter().filter(|&&f| f != VISIT_ID) {
            assert!(RAW_FIELDS.contains(field), "missing {field}");
        }
        assert_eq!(RAW_FIELDS.len(), 22);
    }
}
