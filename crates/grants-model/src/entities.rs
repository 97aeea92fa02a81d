//! Typed entities for the three derived tables.
//!
//! Each entity projects its attribute group out of a raw [`Record`] and
//! converts back to a [`Record`] at the sink boundary. Child entities keep
//! the synthesized key separate from the projected fields so deduplication
//! can compare fields alone.

use crate::error::ModelError;
use crate::fields;
use crate::ids::{EntityKey, GrantId};
use crate::record::{
    CellValue, Record, field_bool, field_f64, field_i64, field_missing, field_text,
};

/// A funding award, the parent entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub grant_id: GrantId,
    pub organization_name: Option<String>,
    pub grant_amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub program_officer: Option<String>,
    pub focus_area: Option<String>,
    pub status: Option<String>,
}

impl Grant {
    pub fn from_record(record: &Record) -> Result<Self, ModelError> {
        let raw_id = field_text(record, fields::GRANT_ID).ok_or(ModelError::EmptyGrantId)?;
        Ok(Self {
            grant_id: GrantId::new(raw_id)?,
            organization_name: field_text(record, fields::ORGANIZATION_NAME),
            grant_amount: field_f64(record, fields::GRANT_AMOUNT),
            start_date: field_text(record, fields::START_DATE),
            end_date: field_text(record, fields::END_DATE),
            program_officer: field_text(record, fields::PROGRAM_OFFICER),
            focus_area: field_text(record, fields::FOCUS_AREA),
            status: field_text(record, fields::STATUS),
        })
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(
            fields::GRANT_ID.into(),
            CellValue::Text(self.grant_id.as_str().to_string()),
        );
        record.insert(
            fields::ORGANIZATION_NAME.into(),
            self.organization_name.clone().into(),
        );
        record.insert(
            fields::GRANT_AMOUNT.into(),
            match self.grant_amount {
                Some(amount) => CellValue::Number(amount),
                None => CellValue::Missing,
            },
        );
        record.insert(fields::START_DATE.into(), self.start_date.clone().into());
        record.insert(fields::END_DATE.into(), self.end_date.clone().into());
        record.insert(
            fields::PROGRAM_OFFICER.into(),
            self.program_officer.clone().into(),
        );
        record.insert(fields::FOCUS_AREA.into(), self.focus_area.clone().into());
        record.insert(fields::STATUS.into(), self.status.clone().into());
        record
    }
}

/// Progress-report attributes, before key synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReportFields {
    pub grant_id: GrantId,
    pub report_date: String,
    pub reporting_period: Option<String>,
    pub report_type: Option<String>,
    pub clients_served: Option<i64>,
    pub activities: Option<String>,
    pub challenges: Option<String>,
    pub budget_status: Option<String>,
}

impl ProgressReportFields {
    /// None when the row carries no report date (it is a site-visit row).
    pub fn from_record(record: &Record) -> Result<Option<Self>, ModelError> {
        if field_missing(record, fields::REPORT_DATE) {
            return Ok(None);
        }
        let raw_id = field_text(record, fields::GRANT_ID).ok_or(ModelError::EmptyGrantId)?;
        Ok(Some(Self {
            grant_id: GrantId::new(raw_id)?,
            report_date: field_text(record, fields::REPORT_DATE)
                .unwrap_or_default(),
            reporting_period: field_text(record, fields::REPORTING_PERIOD),
            report_type: field_text(record, fields::REPORT_TYPE),
            clients_served: field_i64(record, fields::CLIENTS_SERVED),
            activities: field_text(record, fields::ACTIVITIES),
            challenges: field_text(record, fields::CHALLENGES),
            budget_status: field_text(record, fields::BUDGET_STATUS),
        }))
    }
}

/// One progress report, child of a [`Grant`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub report_id: EntityKey,
    pub fields: ProgressReportFields,
}

impl ProgressReport {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(
            fields::REPORT_ID.into(),
            CellValue::Text(self.report_id.to_string()),
        );
        record.insert(
            fields::GRANT_ID.into(),
            CellValue::Text(self.fields.grant_id.as_str().to_string()),
        );
        record.insert(
            fields::REPORT_DATE.into(),
            CellValue::Text(self.fields.report_date.clone()),
        );
        record.insert(
            fields::REPORTING_PERIOD.into(),
            self.fields.reporting_period.clone().into(),
        );
        record.insert(
            fields::REPORT_TYPE.into(),
            self.fields.report_type.clone().into(),
        );
        record.insert(
            fields::CLIENTS_SERVED.into(),
            match self.fields.clients_served {
                Some(count) => CellValue::Number(count as f64),
                None => CellValue::Missing,
            },
        );
        record.insert(
            fields::ACTIVITIES.into(),
            self.fields.activities.clone().into(),
        );
        record.insert(
            fields::CHALLENGES.into(),
            self.fields.challenges.clone().into(),
        );
        record.insert(
            fields::BUDGET_STATUS.into(),
            self.fields.budget_status.clone().into(),
        );
        record
    }
}

/// Site-visit attributes, before key synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteVisitFields {
    pub grant_id: GrantId,
    pub visit_date: String,
    pub visit_type: Option<String>,
    pub visitor_name: Option<String>,
    pub purpose: Option<String>,
    pub observations: Option<String>,
    pub follow_up_required: Option<bool>,
    pub follow_up_notes: Option<String>,
}

impl SiteVisitFields {
    /// None when the row carries no visit date (it is a progress-report row).
    pub fn from_record(record: &Record) -> Result<Option<Self>, ModelError> {
        if field_missing(record, fields::VISIT_DATE) {
            return Ok(None);
        }
        let raw_id = field_text(record, fields::GRANT_ID).ok_or(ModelError::EmptyGrantId)?;
        Ok(Some(Self {
            grant_id: GrantId::new(raw_id)?,
            visit_date: field_text(record, fields::VISIT_DATE).unwrap_or_default(),
            visit_type: field_text(record, fields::VISIT_TYPE),
            visitor_name: field_text(record, fields::VISITOR_NAME),
            purpose: field_text(record, fields::PURPOSE),
            observations: field_text(record, fields::OBSERVATIONS),
            follow_up_required: field_bool(record, fields::FOLLOW_UP_REQUIRED),
            follow_up_notes: field_text(record, fields::FOLLOW_UP_NOTES),
        }))
    }
}

/// One site visit, child of a [`Grant`].
#[derive(Debug, Clone, PartialEq)]
pub struct SiteVisit {
    pub visit_id: EntityKey,
    pub fields: SiteVisitFields,
}

impl SiteVisit {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(
            fields::VISIT_ID.into(),
            CellValue::Text(self.visit_id.to_string()),
        );
        record.insert(
            fields::GRANT_ID.into(),
            CellValue::Text(self.fields.grant_id.as_str().to_string()),
        );
        record.insert(
            fields::VISIT_DATE.into(),
            CellValue::Text(self.fields.visit_date.clone()),
        );
        record.insert(
            fields::VISIT_TYPE.into(),
            self.fields.visit_type.clone().into(),
        );
        record.insert(
            fields::VISITOR_NAME.into(),
            self.fields.visitor_name.clone().into(),
        );
        record.insert(fields::PURPOSE.into(), self.fields.purpose.clone().into());
        record.insert(
            fields::OBSERVATIONS.into(),
            self.fields.observations.clone().into(),
        );
        record.insert(
            fields::FOLLOW_UP_REQUIRED.into(),
            match self.fields.follow_up_required {
                Some(flag) => CellValue::Bool(flag),
                None => CellValue::Missing,
            },
        );
        record.insert(
            fields::FOLLOW_UP_NOTES.into(),
            self.fields.follow_up_notes.clone().into(),
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, CellValue)]) -> Record {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn grant_projects_typed_attributes() {
        let record = raw(&[
            (fields::GRANT_ID, CellValue::Text("GR-2023-0001".into())),
            (fields::ORGANIZATION_NAME, CellValue::Text(" Helping Hands ".into())),
            (fields::GRANT_AMOUNT, CellValue::Text("50000".into())),
            (fields::STATUS, CellValue::Text("Active".into())),
        ]);
        let grant = Grant::from_record(&record).unwrap();
        assert_eq!(grant.grant_id.as_str(), "GR-2023-0001");
        assert_eq!(grant.organization_name.as_deref(), Some("Helping Hands"));
        assert_eq!(grant.grant_amount, Some(50000.0));
        assert_eq!(grant.start_date, None);
    }

    #[test]
    fn grant_requires_an_id() {
        let record = raw(&[(fields::ORGANIZATION_NAME, CellValue::Text("X".into()))]);
        assert_eq!(Grant::from_record(&record), Err(ModelError::EmptyGrantId));
    }

    #[test]
    fn report_fields_skip_rows_without_date() {
        let record = raw(&[
            (fields::GRANT_ID, CellValue::Text("GR-2023-0001".into())),
            (fields::VISIT_DATE, CellValue::Text("2023-06-01".into())),
        ]);
        assert_eq!(ProgressReportFields::from_record(&record).unwrap(), None);
        assert!(SiteVisitFields::from_record(&record).unwrap().is_some());
    }

    #[test]
    fn report_round_trips_through_record() {
        let record = raw(&[
            (fields::GRANT_ID, CellValue::Text("GR-2023-0001".into())),
            (fields::REPORT_DATE, CellValue::Text("2023-04-01".into())),
            (fields::CLIENTS_SERVED, CellValue::Number(120.0)),
        ]);
        let fields_in = ProgressReportFields::from_record(&record).unwrap().unwrap();
        assert_eq!(fields_in.clients_served, Some(120));
        let report = ProgressReport {
            report_id: EntityKey::new(
                crate::ids::KeyPrefix::Report,
                &fields_in.grant_id,
                1,
            )
            .unwrap(),
            fields: fields_in,
        };
        let out = report.to_record();
        assert_eq!(
            out.get(fields::REPORT_ID).and_then(CellValue::as_text),
            Some("RPT-2023-0001-0001")
        );
        assert_eq!(out.get(fields::CLIENTS_SERVED).and_then(CellValue::as_i64), Some(120));
    }
}
