//! I/O adapters around the normalization engine.
//!
//! Sources produce a finite, fully materialized row set; sinks persist one
//! derived table at a time. Neither side makes decisions about the data —
//! retries, pagination, and batching live here, never in the engine.
//! I/O failures propagate as opaque `anyhow` errors with request context.

pub mod config;
pub mod csv_files;
pub mod remote;

pub use config::ApiConfig;
pub use csv_files::{CsvSink, CsvSource};
pub use remote::ApiClient;

use anyhow::Result;

use grants_model::Record;

/// Raw table names and derived table names used by both adapters.
pub mod tables {
    pub const RAW: &str = "Grants_Raw";
    pub const GRANTS: &str = "Grants";
    pub const PROGRESS_REPORTS: &str = "Progress_Reports";
    pub const SITE_VISITS: &str = "Site_Visits";
}

/// Produces the raw row set the engine consumes.
pub trait RecordSource {
    /// Fetch every row of `table`. Finite, fully materialized.
    fn fetch_all(&self, table: &str) -> Result<Vec<Record>>;
}

/// Persists one derived table.
///
/// Not idempotent: repeated calls append. That mirrors the hosted API's
/// behavior and is preserved deliberately — callers that want a clean slate
/// clear the destination first.
pub trait RecordSink {
    /// Write `records` to `table`, returning the number of rows written.
    fn persist(&mut self, table: &str, records: &[Record]) -> Result<usize>;
}
