//! Local CSV adapters, used when API credentials are absent.
//!
//! Each table maps to `<dir>/<table>.csv`. The reader treats every cell as
//! text (blank cells read as missing); the writer emits the fixed column
//! order from the shared schema, with any unexpected extra fields appended
//! in sorted order.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use grants_model::{CellValue, Record, fields};

use crate::tables;
use crate::{RecordSink, RecordSource};

/// Reads raw rows from CSV files in a directory.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

impl RecordSource for CsvSource {
    fn fetch_all(&self, table: &str) -> Result<Vec<Record>> {
        let path = self.table_path(table);
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("reading headers of {}", path.display()))?
            .iter()
            .map(|h| h.trim().trim_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.with_context(|| {
                format!("reading row {} of {}", index + 2, path.display())
            })?;
            let mut record = Record::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                let value = if cell.trim().is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(cell.to_string())
                };
                record.insert(header.clone(), value);
            }
            records.push(record);
        }
        debug!(table, rows = records.len(), path = %path.display(), "read csv table");
        Ok(records)
    }
}

/// Writes derived tables to CSV files in a directory.
///
/// Appends when the file already exists, matching the hosted API's
/// append-on-repeat behavior.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// The canonical column order for a known derived table.
fn column_order(table: &str, records: &[Record]) -> Vec<String> {
    let known: Option<&[&str]> = match table {
        tables::GRANTS => Some(fields::GRANT_FIELDS),
        tables::PROGRESS_REPORTS => Some(fields::REPORT_FIELDS),
        tables::SITE_VISITS => Some(fields::VISIT_FIELDS),
        tables::RAW => Some(fields::RAW_FIELDS),
        _ => None,
    };
    let mut columns: Vec<String> = known
        .map(|names| names.iter().map(|n| (*n).to_string()).collect())
        .unwrap_or_default();
    let mut extras: BTreeSet<String> = BTreeSet::new();
    for record in records {
        for name in record.keys() {
            if !columns.iter().any(|c| c == name) {
                extras.insert(name.clone());
            }
        }
    }
    columns.extend(extras);
    columns
}

impl RecordSink for CsvSink {
    fn persist(&mut self, table: &str, records: &[Record]) -> Result<usize> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.dir.join(format!("{table}.csv"));
        let append = path.exists();
        let columns = column_order(table, records);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if !append {
            writer
                .write_record(&columns)
                .with_context(|| format!("writing header of {}", path.display()))?;
        }
        for record in records {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| {
                    record
                        .get(column)
                        .map(CellValue::render)
                        .unwrap_or_default()
                })
                .collect();
            writer
                .write_record(&cells)
                .with_context(|| format!("writing row to {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing {}", path.display()))?;
        debug!(table, rows = records.len(), path = %path.display(), "wrote csv table");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::column_order;
    use grants_model::{CellValue, Record};

    #[test]
    fn unknown_extra_fields_sort_after_schema_columns() {
        let mut record = Record::new();
        record.insert("Zed".into(), CellValue::Text("x".into()));
        record.insert("Alpha".into(), CellValue::Text("y".into()));
        let columns = column_order(crate::tables::GRANTS, std::slice::from_ref(&record));
        assert_eq!(columns[0], "Grant_ID");
        assert_eq!(&columns[columns.len() - 2..], ["Alpha", "Zed"]);
    }
}
