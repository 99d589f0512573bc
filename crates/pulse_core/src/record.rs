//! Survey records
//!
//! A [`Dataset`] is loaded once and never mutated afterwards. Cloning it only bumps
//! reference counts, so every view can hold its own handle to the same rows.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{PulseError, Result};

static MISSING: Value = Value::Missing;

/// A single survey cell
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Empty cell, or a field the dataset does not have
    Missing,
}

impl Value {
    /// Infer a typed value from raw cell text.
    ///
    /// Empty cells become [`Value::Missing`], `true`/`false` become booleans and anything
    /// that parses as a number becomes a number. Everything else stays text.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Value::Missing;
        }
        match raw {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "NaN" => return Value::Number(f64::NAN),
            _ => {}
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Category label used when grouping by this value.
    ///
    /// Missing values map to the empty label so they form their own bucket.
    pub fn category(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Missing => Ok(()),
        }
    }
}

/// Resolved column handle.
///
/// Resolving a column name once and reusing the handle avoids a hash lookup per row.
/// A handle for a column the dataset lacks reads as [`Value::Missing`] everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field(Option<usize>);

impl Field {
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

/// One survey respondent
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: Field) -> &Value {
        field
            .0
            .and_then(|i| self.values.get(i))
            .unwrap_or(&MISSING)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Immutable collection of survey records sharing one header
#[derive(Clone, Debug)]
pub struct Dataset {
    columns: Arc<[String]>,
    index: Arc<FxHashMap<String, usize>>,
    records: Arc<[Record]>,
}

impl Dataset {
    /// Assemble a dataset, checking that every record matches the header width.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        if columns.is_empty() {
            return Err(PulseError::NoColumns);
        }

        let mut index = FxHashMap::default();
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(PulseError::DuplicateColumn(name.clone()));
            }
        }

        for (row, record) in records.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(PulseError::RowWidth {
                    row,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
        }

        Ok(Self {
            columns: columns.into(),
            index: Arc::new(index),
            records: records.into(),
        })
    }

    /// Build a dataset of raw text cells, mostly useful for fixtures.
    pub fn from_text_rows(columns: &[&str], rows: &[&[&str]]) -> Result<Self> {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        let records = rows
            .iter()
            .map(|row| Record::new(row.iter().map(|v| Value::Text(v.to_string())).collect()))
            .collect();
        Self::new(columns, records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve a column name to a reusable handle.
    pub fn field(&self, name: &str) -> Field {
        Field(self.index.get(name).copied())
    }
}
