//! Typed columnar frames decoded from Kusto result tables.
//!
//! The backend declares one scalar type per column; [`DataFrame::decode`]
//! applies a fixed type-to-container mapping and transposes raw row tuples
//! into per-column vectors, preserving row order (it may reflect backend
//! ordering such as time bins).

use serde_json::Value;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Column types
// ---------------------------------------------------------------------------

/// The backend's scalar type vocabulary. Closed set; unknown type strings
/// are rejected at the wire boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int,
    Long,
    Real,
    Decimal,
    String,
    Guid,
    Datetime,
    Timespan,
    Dynamic,
}

impl ColumnType {
    /// Parse the backend's type name, or `None` if it is not a known scalar.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "real" => Some(Self::Real),
            "decimal" => Some(Self::Decimal),
            "string" => Some(Self::String),
            "guid" => Some(Self::Guid),
            "datetime" => Some(Self::Datetime),
            "timespan" => Some(Self::Timespan),
            "dynamic" => Some(Self::Dynamic),
            _ => None,
        }
    }

    /// The backend's name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Real => "real",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Guid => "guid",
            Self::Datetime => "datetime",
            Self::Timespan => "timespan",
            Self::Dynamic => "dynamic",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output column: its name and the backend's declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// A typed columnar container. The variant is selected by the fixed mapping
/// from [`ColumnType`]: bool→Bool, int/long→Long, real/decimal→Real,
/// string/guid/datetime/timespan→Text, dynamic→Dynamic.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Bool(Vec<Option<bool>>),
    Long(Vec<Option<i64>>),
    Real(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Dynamic(Vec<Value>),
}

impl Column {
    /// Row count of this column.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Dynamic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// DataFrame
// ---------------------------------------------------------------------------

/// A decoded result table: descriptors plus one typed container per column,
/// all of equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    columns: Vec<ColumnDescriptor>,
    data: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Decode raw row tuples into typed columns.
    ///
    /// Every row must have exactly one value per descriptor; a short or long
    /// row, or a cell whose JSON kind does not match the declared column
    /// type, fails with [`Error::SchemaMismatch`]. `dynamic` cells that are
    /// textual get an opportunistic JSON parse; unparseable text is kept
    /// verbatim and never raises.
    pub fn decode(columns: &[ColumnDescriptor], rows: &[Vec<Value>]) -> Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::SchemaMismatch(format!(
                    "row {index} has {} value(s), expected {}",
                    row.len(),
                    columns.len()
                )));
            }
        }

        let data = columns
            .iter()
            .enumerate()
            .map(|(index, descriptor)| decode_column(descriptor, index, rows))
            .collect::<Result<Vec<Column>>>()?;

        Ok(Self {
            columns: columns.to_vec(),
            data,
            row_count: rows.len(),
        })
    }

    /// Column descriptors in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Typed column data, positionally aligned with [`Self::columns`].
    pub fn data(&self) -> &[Column] {
        &self.data
    }

    /// Number of decoded rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(|index| &self.data[index])
    }
}

fn decode_column(
    descriptor: &ColumnDescriptor,
    index: usize,
    rows: &[Vec<Value>],
) -> Result<Column> {
    let cells = rows.iter().map(|row| &row[index]);
    let name = descriptor.name.as_str();
    match descriptor.column_type {
        ColumnType::Bool => cells
            .map(|cell| match cell {
                Value::Null => Ok(None),
                Value::Bool(b) => Ok(Some(*b)),
                other => Err(cell_error(name, "bool", other)),
            })
            .collect::<Result<_>>()
            .map(Column::Bool),
        ColumnType::Int | ColumnType::Long => cells
            .map(|cell| match cell {
                Value::Null => Ok(None),
                Value::Number(n) => n
                    .as_i64()
                    .map(Some)
                    .ok_or_else(|| cell_error(name, "integer", cell)),
                other => Err(cell_error(name, "integer", other)),
            })
            .collect::<Result<_>>()
            .map(Column::Long),
        ColumnType::Real | ColumnType::Decimal => cells
            .map(|cell| match cell {
                Value::Null => Ok(None),
                Value::Number(n) => n
                    .as_f64()
                    .map(Some)
                    .ok_or_else(|| cell_error(name, "real", cell)),
                other => Err(cell_error(name, "real", other)),
            })
            .collect::<Result<_>>()
            .map(Column::Real),
        ColumnType::String | ColumnType::Guid | ColumnType::Datetime | ColumnType::Timespan => {
            cells
                .map(|cell| match cell {
                    Value::Null => Ok(None),
                    Value::String(s) => Ok(Some(s.clone())),
                    other => Err(cell_error(name, "string", other)),
                })
                .collect::<Result<_>>()
                .map(Column::Text)
        }
        ColumnType::Dynamic => Ok(Column::Dynamic(
            cells.map(parse_dynamic_cell).collect::<Vec<Value>>(),
        )),
    }
}

/// Dynamic cells arrive either as structured JSON or as JSON-encoded text.
/// Textual cells get one parse attempt; failures keep the text as-is.
fn parse_dynamic_cell(cell: &Value) -> Value {
    match cell {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| cell.clone()),
        other => other.clone(),
    }
}

fn cell_error(column: &str, expected: &str, found: &Value) -> Error {
    Error::SchemaMismatch(format!(
        "column '{column}' expected a {expected} cell, found {found}"
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
