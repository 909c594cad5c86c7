//! Raw wire structs and boundary normalization.
//!
//! The backend's JSON payload is deserialized into `Raw*` structs that
//! mirror the wire shape exactly, then normalized into the domain model in
//! one explicit pass: table names classify into kinds later, column type
//! strings must parse into the closed [`ColumnType`] vocabulary, and any
//! malformed piece fails here rather than at decode time.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::frame::{ColumnDescriptor, ColumnType};
use crate::response::{ErrorDetail, ErrorInfo, LogsResponse, Table};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    #[serde(default)]
    tables: Vec<RawTable>,
    #[serde(default)]
    continuation_token: Option<String>,
    #[serde(default)]
    error: Option<RawErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    name: String,
    #[serde(default)]
    columns: Vec<RawColumn>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    #[serde(rename = "type")]
    column_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawErrorInfo {
    code: String,
    message: String,
    #[serde(default)]
    details: Vec<RawErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawErrorDetail {
    code: String,
    message: String,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Parse a response body into the normalized domain model.
pub fn parse_response(body: &str) -> Result<LogsResponse> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|err| Error::SchemaMismatch(format!("malformed response payload: {err}")))?;

    let tables = raw
        .tables
        .into_iter()
        .map(normalize_table)
        .collect::<Result<Vec<Table>>>()?;

    Ok(LogsResponse {
        tables,
        continuation_token: raw.continuation_token,
        error: raw.error.map(normalize_error),
    })
}

fn normalize_table(raw: RawTable) -> Result<Table> {
    let columns = raw
        .columns
        .into_iter()
        .map(|column| {
            let column_type = ColumnType::parse(&column.column_type).ok_or_else(|| {
                Error::SchemaMismatch(format!(
                    "unknown column type '{}' for column '{}' in table '{}'",
                    column.column_type, column.name, raw.name
                ))
            })?;
            Ok(ColumnDescriptor::new(column.name, column_type))
        })
        .collect::<Result<Vec<ColumnDescriptor>>>()?;

    Ok(Table {
        name: raw.name,
        columns,
        rows: raw.rows,
    })
}

fn normalize_error(raw: RawErrorInfo) -> ErrorInfo {
    ErrorInfo {
        code: raw.code,
        message: raw.message,
        details: raw
            .details
            .into_iter()
            .map(|d| ErrorDetail {
                code: d.code,
                message: d.message,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
