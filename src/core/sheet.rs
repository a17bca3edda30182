//! Sheet loading - fetches spreadsheet tabs and parses the visualization-query payload.
//!
//! The endpoint wraps its JSON in a JavaScript callback
//! (`/*O_o*/\ngoogle.visualization.Query.setResponse({...});`). The payload is
//! located by its brace delimiters instead of fixed offsets.

use crate::errors::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, future::Future, time::Duration};
use tracing::{debug, instrument};

/// One row of a sheet, keyed by column label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRecord {
    fields: BTreeMap<String, String>,
}

impl SheetRecord {
    /// Returns the value of a field, or `""` when the column is absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map_or("", String::as_str)
    }

    /// Sets a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SheetRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A read-only source of sheet rows.
///
/// Implemented over HTTP by [`GvizClient`]; tests provide in-memory sources.
pub trait SheetSource {
    /// Fetches every row of the named sheet, in sheet order.
    fn fetch(&self, sheet_name: &str) -> impl Future<Output = Result<Vec<SheetRecord>>> + Send;
}

/// Builds the visualization-query URL for one sheet.
#[must_use]
pub fn sheet_url(base_url: &str, spreadsheet_id: &str, sheet_name: &str) -> String {
    format!(
        "{}/d/{}/gviz/tq?tqx=out:json&sheet={}",
        base_url.trim_end_matches('/'),
        spreadsheet_id,
        urlencoding::encode(sheet_name)
    )
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizError>,
    #[serde(default)]
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    id: String,
    #[serde(default)]
    label: String,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

/// Slices the JSON object out of the callback wrapper.
fn extract_payload(text: &str) -> Result<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(Error::DataLoad {
            message: "response does not contain a JSON payload".to_string(),
        }),
    }
}

/// Renders a cell value the way it is displayed in the sheet.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                // Sheets send whole numbers (ids, phones) as floats.
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    #[allow(clippy::cast_possible_truncation)]
                    let whole = f as i64;
                    whole.to_string()
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        other => other.to_string(),
    }
}

/// Parses a visualization-query response body into records.
///
/// # Errors
/// Returns `Error::DataLoad` when no payload can be found, the service reports
/// an error status, or the table is missing; `Error::Json` when the payload is
/// malformed.
pub fn parse_gviz(text: &str) -> Result<Vec<SheetRecord>> {
    let payload = extract_payload(text)?;
    let response: GvizResponse = serde_json::from_str(payload)?;

    if response.status.as_deref() == Some("error") {
        let message = response
            .errors
            .first()
            .and_then(|e| e.detailed_message.clone().or_else(|| e.message.clone()))
            .unwrap_or_else(|| "query returned an error status".to_string());
        return Err(Error::DataLoad { message });
    }

    let table = response.table.ok_or_else(|| Error::DataLoad {
        message: "response has no table".to_string(),
    })?;

    let labels: Vec<&str> = table
        .cols
        .iter()
        .map(|col| {
            if col.label.trim().is_empty() {
                col.id.as_str()
            } else {
                col.label.as_str()
            }
        })
        .collect();

    let records: Vec<SheetRecord> = table
        .rows
        .iter()
        .map(|row| {
            labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let text = row
                        .c
                        .get(i)
                        .and_then(Option::as_ref)
                        .map(|cell| cell_text(&cell.v))
                        .unwrap_or_default();
                    (*label, text)
                })
                .collect::<SheetRecord>()
        })
        .collect();

    Ok(records)
}

/// HTTP client for the spreadsheet visualization-query endpoint.
#[derive(Debug, Clone)]
pub struct GvizClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
}

impl GvizClient {
    /// Creates a client for one spreadsheet.
    pub fn new(base_url: &str, spreadsheet_id: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }
}

impl SheetSource for GvizClient {
    #[instrument(skip(self))]
    async fn fetch(&self, sheet_name: &str) -> Result<Vec<SheetRecord>> {
        let url = sheet_url(&self.base_url, &self.spreadsheet_id, sheet_name);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::DataLoad {
                message: format!("sheet '{sheet_name}' returned HTTP {status}"),
            });
        }

        let body = response.text().await?;
        let records = parse_gviz(&body)?;
        debug!(sheet = sheet_name, rows = records.len(), "Sheet fetched");
        Ok(records)
    }
}
