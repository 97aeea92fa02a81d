pub mod entities;
pub mod error;
pub mod fields;
pub mod ids;
pub mod record;

pub use entities::{Grant, ProgressReport, ProgressReportFields, SiteVisit, SiteVisitFields};
pub use error::{ModelError, Result};
pub use ids::{EntityKey, GrantId, KeyPrefix};
pub use record::{CellValue, Record};
