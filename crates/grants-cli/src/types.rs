use grants_engine::RunReport;

/// Rows written to one destination table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TableWrite {
    pub table: String,
    pub rows: usize,
}

/// Everything one `run` invocation produced.
#[derive(Debug, serde::Serialize)]
pub struct RunOutcome {
    pub report: RunReport,
    pub written: Vec<TableWrite>,
    pub dry_run: bool,
    /// Where the derived tables went, for display only.
    pub destination: String,
}
