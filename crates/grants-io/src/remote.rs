//! Blocking client for the hosted tabular-data API.
//!
//! Reads paginate with `pageSize=100` and the `offset` cursor the API
//! returns; writes go out in batches of 10 records per request, the API's
//! maximum. A fixed pause between requests stays under the 5 req/s limit.
//! Failures carry request context and propagate unchanged — the engine
//! neither retries nor interprets them.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use reqwest::blocking::Client;
use serde_json::{Map, Value, json};
use tracing::debug;

use grants_model::{CellValue, Record};

use crate::config::ApiConfig;
use crate::{RecordSink, RecordSource};

const PAGE_SIZE: usize = 100;
const WRITE_BATCH_SIZE: usize = 10;
const REQUEST_PAUSE: Duration = Duration::from_millis(250);

/// One client serves as both [`RecordSource`] and [`RecordSink`].
#[derive(Debug)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self { config, http })
    }

    fn pause() {
        thread::sleep(REQUEST_PAUSE);
    }
}

fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Missing,
        Value::Bool(flag) => CellValue::Bool(*flag),
        Value::Number(number) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Missing),
        Value::String(text) if text.trim().is_empty() => CellValue::Missing,
        Value::String(text) => CellValue::Text(text.clone()),
        // Attachments and linked-record arrays are out of schema; keep the
        // raw JSON so nothing is silently lost.
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Text(text) => Value::String(text.clone()),
        CellValue::Number(number) => json!(number),
        CellValue::Bool(flag) => Value::Bool(*flag),
        CellValue::Missing => Value::Null,
    }
}

fn record_to_fields(record: &Record) -> Value {
    let mut fields = Map::new();
    for (name, cell) in record {
        if !cell.is_missing() {
            fields.insert(name.clone(), cell_to_json(cell));
        }
    }
    Value::Object(fields)
}

impl RecordSource for ApiClient {
    fn fetch_all(&self, table: &str) -> Result<Vec<Record>> {
        let url = self.config.table_url(table);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut page = 0usize;
        loop {
            if page > 0 {
                Self::pause();
            }
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&self.config.token)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }
            let body: Value = request
                .send()
                .with_context(|| format!("GET {url}"))?
                .error_for_status()
                .with_context(|| format!("GET {url}"))?
                .json()
                .with_context(|| format!("decoding response from {url}"))?;

            let batch = body
                .get("records")
                .and_then(Value::as_array)
                .with_context(|| format!("response from {url} has no records array"))?;
            for entry in batch {
                let fields = entry
                    .get("fields")
                    .and_then(Value::as_object)
                    .with_context(|| format!("record from {url} has no fields object"))?;
                let record: Record = fields
                    .iter()
                    .map(|(name, value)| (name.clone(), json_to_cell(value)))
                    .collect();
                records.push(record);
            }
            page += 1;
            debug!(table, page, total = records.len(), "fetched page");

            offset = body
                .get("offset")
                .and_then(Value::as_str)
                .map(str::to_string);
            if offset.is_none() {
                break;
            }
        }
        Ok(records)
    }
}

impl RecordSink for ApiClient {
    fn persist(&mut self, table: &str, records: &[Record]) -> Result<usize> {
        let url = self.config.table_url(table);
        let mut written = 0usize;
        for (index, batch) in records.chunks(WRITE_BATCH_SIZE).enumerate() {
            if index > 0 {
                Self::pause();
            }
            let payload = json!({
                "records": batch
                    .iter()
                    .map(|record| json!({ "fields": record_to_fields(record) }))
                    .collect::<Vec<Value>>(),
            });
            let body: Value = self
                .http
                .post(&url)
                .bearer_auth(&self.config.token)
                .json(&payload)
                .send()
                .with_context(|| format!("POST {url}"))?
                .error_for_status()
                .with_context(|| format!("POST {url}"))?
                .json()
                .with_context(|| format!("decoding response from {url}"))?;
            let created = body
                .get("records")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            ensure!(
                created == batch.len(),
                "POST {url} created {created} of {} records",
                batch.len()
            );
            written += created;
            debug!(table, batch = index + 1, written, "persisted batch");
        }
        Ok(written)
    }
}
