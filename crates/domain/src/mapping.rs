//! Spreadsheet row mapping.
//!
//! The dashboard lets users upload tabular data for a handful of endpoints
//! whose bodies differ only in column names and output shape. Instead of
//! one handler per endpoint, a single configurable [`RowMapping`] turns a
//! [`Sheet`] into the JSON body the endpoint expects; the per-endpoint
//! configurations are data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Tabular input: a header row plus string cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows; short rows are treated as padded with blanks.
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Creates a sheet from headers and rows.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    fn column_index(&self, name: &str) -> DomainResult<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| DomainError::UnknownColumn(name.to_string()))
    }

    fn cell<'a>(&self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map_or("", |s| s.trim())
    }
}

/// One column-to-field assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Source column header.
    pub column: String,
    /// Output JSON field name.
    pub field: String,
}

impl Assignment {
    /// Creates an assignment from a column header to a field name.
    #[must_use]
    pub fn new(column: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            field: field.into(),
        }
    }
}

/// How rows become a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RowMapping {
    /// One JSON object per row, collected into an array.
    Rows {
        /// Column-to-field assignments applied per row.
        assignments: Vec<Assignment>,
    },
    /// Rows grouped by a key column; each group becomes an object holding
    /// the key and the deduplicated list of values from another column.
    Grouped {
        /// Column whose value identifies the group.
        key_column: String,
        /// Output field carrying the group key.
        key_field: String,
        /// Column whose values are collected per group.
        value_column: String,
        /// Output field carrying the collected list.
        list_field: String,
    },
}

impl RowMapping {
    /// Applies the mapping, producing a JSON array.
    ///
    /// Rows whose mapped cells are all blank are skipped. In grouped mode,
    /// groups keep first-seen order and values are deduplicated within
    /// each group.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownColumn`] when a referenced column is
    /// missing from the sheet.
    pub fn apply(&self, sheet: &Sheet) -> DomainResult<Value> {
        match self {
            Self::Rows { assignments } => {
                let indices: Vec<(usize, &str)> = assignments
                    .iter()
                    .map(|a| Ok((sheet.column_index(&a.column)?, a.field.as_str())))
                    .collect::<DomainResult<_>>()?;

                let mut out = Vec::new();
                for row in &sheet.rows {
                    let mut object = Map::new();
                    let mut blank = true;
                    for (index, field) in &indices {
                        let cell = sheet.cell(row, *index);
                        if !cell.is_empty() {
                            blank = false;
                        }
                        object.insert((*field).to_string(), Value::String(cell.to_string()));
                    }
                    if !blank {
                        out.push(Value::Object(object));
                    }
                }
                Ok(Value::Array(out))
            }

            Self::Grouped {
                key_column,
                key_field,
                value_column,
                list_field,
            } => {
                let key_index = sheet.column_index(key_column)?;
                let value_index = sheet.column_index(value_column)?;

                // First-seen group order, deduplicated values per group.
                let mut order: Vec<String> = Vec::new();
                let mut groups: std::collections::BTreeMap<String, Vec<String>> =
                    std::collections::BTreeMap::new();
                for row in &sheet.rows {
                    let key = sheet.cell(row, key_index);
                    let value = sheet.cell(row, value_index);
                    if key.is_empty() || value.is_empty() {
                        continue;
                    }
                    let values = groups.entry(key.to_string()).or_insert_with(|| {
                        order.push(key.to_string());
                        Vec::new()
                    });
                    if !values.iter().any(|v| v == value) {
                        values.push(value.to_string());
                    }
                }

                let out = order
                    .into_iter()
                    .filter_map(|key| {
                        let values = groups.get(&key)?;
                        let mut object = Map::new();
                        object.insert(key_field.clone(), Value::String(key));
                        object.insert(
                            list_field.clone(),
                            Value::Array(
                                values.iter().cloned().map(Value::String).collect(),
                            ),
                        );
                        Some(Value::Object(object))
                    })
                    .collect();
                Ok(Value::Array(out))
            }
        }
    }
}
