//! Normalized query responses, the chunk/page merger, and the frame adapter.
//!
//! A [`LogsResponse`] is one backend payload after wire normalization: a set
//! of named tables, an optional continuation token, and an optional embedded
//! partial-error report (the backend can answer 200 with per-row errors).
//! [`LogsResponse::merge`] folds many payloads — the pages of one query, or
//! the per-chunk payloads of an orchestrated run — into one logical response
//! by appending primary-table rows in payload order.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::frame::{ColumnDescriptor, DataFrame};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Well-known result kinds, derived from the backend's table names.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// The designated main result table.
    PrimaryResult,
    /// Query metadata (render hints, visualization info).
    QueryProperties,
    /// Per-row diagnostics and warnings.
    QueryStatus,
    Other,
}

impl TableKind {
    /// Classify a table by its backend-assigned name.
    pub fn classify(name: &str) -> Self {
        match name {
            "PrimaryResult" => Self::PrimaryResult,
            "QueryProperties" => Self::QueryProperties,
            "QueryStatus" => Self::QueryStatus,
            _ => Self::Other,
        }
    }
}

/// One named result table: declared schema plus raw row tuples.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// The well-known kind of this table.
    pub fn kind(&self) -> TableKind {
        TableKind::classify(&self.name)
    }

    /// Decode this table into a typed columnar frame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        DataFrame::decode(&self.columns, &self.rows)
    }
}

// ---------------------------------------------------------------------------
// Embedded errors
// ---------------------------------------------------------------------------

/// Partial-error report embedded in an otherwise successful response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub details: Vec<ErrorDetail>,
}

/// One embedded error entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// LogsResponse
// ---------------------------------------------------------------------------

/// One normalized backend payload, or the merged accumulation of several.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogsResponse {
    pub tables: Vec<Table>,
    /// Set when the backend has more pages for this query. Always `None` on
    /// a merged response.
    pub continuation_token: Option<String>,
    pub error: Option<ErrorInfo>,
}

impl LogsResponse {
    /// The designated primary result table, if present.
    pub fn primary_table(&self) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.kind() == TableKind::PrimaryResult)
    }

    /// Decode the primary result table into a frame.
    pub fn primary_frame(&self) -> Result<DataFrame> {
        self.primary_table()
            .ok_or_else(|| Error::SchemaMismatch("response has no primary result table".into()))?
            .to_frame()
    }

    /// Decode every primary-kind table into a frame, in table order.
    pub fn frames(&self) -> Result<Vec<DataFrame>> {
        self.tables
            .iter()
            .filter(|t| t.kind() == TableKind::PrimaryResult)
            .map(Table::to_frame)
            .collect()
    }

    /// Number of backend-reported embedded errors. A report with no detail
    /// entries still counts as one error.
    pub fn errors_count(&self) -> usize {
        match &self.error {
            Some(info) => info.details.len().max(1),
            None => 0,
        }
    }

    /// Fold payloads into one logical response.
    ///
    /// The first payload is the base and supplies the schema; every later
    /// payload's primary-table rows are appended in order. Later payloads
    /// whose primary schema diverges from the base are rejected with
    /// [`Error::SchemaMismatch`] rather than producing a misaligned frame.
    /// Embedded error reports are accumulated so [`Self::errors_count`] on
    /// the merged response equals the sum over the inputs.
    pub fn merge(payloads: Vec<LogsResponse>) -> Result<LogsResponse> {
        let mut payloads = payloads.into_iter();
        let mut base = payloads
            .next()
            .ok_or_else(|| Error::InvalidArgument("no payloads to merge".into()))?;
        base.continuation_token = None;

        let rest: Vec<LogsResponse> = payloads.collect();
        if rest.is_empty() {
            return Ok(base);
        }
        let mut details = error_details(&base.error);

        let base_primary = base
            .tables
            .iter()
            .position(|t| t.kind() == TableKind::PrimaryResult)
            .ok_or_else(|| Error::SchemaMismatch("payload has no primary result table".into()))?;

        for payload in rest {
            let primary = payload
                .primary_table()
                .ok_or_else(|| Error::SchemaMismatch("payload has no primary result table".into()))?;
            if primary.columns != base.tables[base_primary].columns {
                return Err(Error::SchemaMismatch(
                    "primary table schema diverges across payloads".into(),
                ));
            }
            base.tables[base_primary]
                .rows
                .extend(primary.rows.iter().cloned());
            details.extend(error_details(&payload.error));
        }

        base.error = if details.is_empty() {
            None
        } else {
            Some(ErrorInfo {
                code: "PartialError".into(),
                message: "partial errors reported by one or more payloads".into(),
                details,
            })
        };
        Ok(base)
    }
}

/// Flatten an embedded report into countable detail entries, synthesizing
/// one from the summary when the backend sent no details.
fn error_details(error: &Option<ErrorInfo>) -> Vec<ErrorDetail> {
    match error {
        None => Vec::new(),
        Some(info) if info.details.is_empty() => vec![ErrorDetail {
            code: info.code.clone(),
            message: info.message.clone(),
        }],
        Some(info) => info.details.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
