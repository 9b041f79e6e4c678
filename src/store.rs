//! The abstract row-store collaborator.
//!
//! The counter core does not talk to a database directly; it consumes a
//! minimal CRUD surface, [`RowStore`], whose four operations all report
//! affected-row counts, so the core can distinguish "not found" from
//! "exactly one" from "unexpected multiple" outcomes.
//!
//! Any backend that can answer key-equality CRUD can implement the trait:
//! a SQL table, a key-value namespace, or the bundled [`MemoryStore`] used
//! by tests and by embedders that do not need durability.
//!
//! # Isolation
//!
//! The trait makes no isolation promise. The counter operations built on
//! top of it are read-modify-write sequences; if concurrent writers to the
//! same ID are expected, serializing them (row locks, transactions, CAS
//! retries) is the implementor's or a wrapping layer's responsibility.

use std::collections::HashMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod memory;

pub use memory::MemoryStore;

/// A single cell value: counter columns are integers, the serialized
/// bucket series is text, and record IDs may be either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A non-negative integer cell.
    Integer(u64),
    /// A text cell.
    Text(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// One row of a select result, as a column-name → value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: HashMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell, returning `self` for chaining.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Returns the cell for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Returns the cell for `column` as an integer.
    ///
    /// Text cells holding a decimal integer are accepted, since some
    /// backends return every column as text.
    pub fn get_u64(&self, column: &str) -> Option<u64> {
        match self.cells.get(column)? {
            Value::Integer(v) => Some(*v),
            Value::Text(t) => t.parse().ok(),
        }
    }

    /// Returns the cell for `column` as text.
    pub fn get_text(&self, column: &str) -> Option<&str> {
        match self.cells.get(column)? {
            Value::Text(t) => Some(t),
            Value::Integer(_) => None,
        }
    }
}

impl From<HashMap<String, Value>> for Row {
    fn from(cells: HashMap<String, Value>) -> Self {
        Self { cells }
    }
}

/// Outcome of an insert: the generated key (if the backend produces one)
/// and the number of rows the statement affected.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    /// Key generated or echoed by the backend, if any.
    pub generated_id: Option<Value>,
    /// Number of rows the insert affected.
    pub rows_affected: u64,
}

/// Error raised by a [`RowStore`] implementation.
///
/// The counter core never surfaces this directly; it is wrapped as
/// [`crate::Error::StoreUnavailable`] with this value in the source chain.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    /// Creates a store error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Minimal CRUD interface over a keyed table.
///
/// All four operations report affected-row counts; selects return the
/// matching rows so callers can count them. Filtering is key-equality
/// only, which is exactly what the counter operations need.
pub trait RowStore {
    /// Inserts one row with the given columns and values.
    ///
    /// `columns` and `values` are parallel; a duplicate on a unique key
    /// must be reported as zero rows affected or as a [`StoreError`].
    fn insert(
        &self,
        table: &str,
        columns: &[&str],
        values: Vec<Value>,
    ) -> Result<InsertOutcome, StoreError>;

    /// Returns all rows whose `key_column` equals `key`, projected to
    /// `columns` (`None` selects every column).
    fn select(
        &self,
        table: &str,
        columns: Option<&[&str]>,
        key_column: &str,
        key: &Value,
    ) -> Result<Vec<Row>, StoreError>;

    /// Applies `assignments` to every row whose `key_column` equals `key`;
    /// returns the number of rows affected.
    fn update(
        &self,
        table: &str,
        assignments: Vec<(String, Value)>,
        key_column: &str,
        key: &Value,
    ) -> Result<u64, StoreError>;

    /// Deletes every row whose `key_column` equals `key`; returns the
    /// number of rows deleted.
    fn delete(&self, table: &str, key_column: &str, key: &Value) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(7u64), Value::Integer(7));
        assert_eq!(Value::from("x"), Value::Text("x".to_string()));
        assert_eq!(Value::from("x".to_string()), Value::Text("x".to_string()));
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::new().set("lifetime", 24u64).set("data", "1,1,1");
        assert_eq!(row.get_u64("lifetime"), Some(24));
        assert_eq!(row.get_text("data"), Some("1,1,1"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_row_integer_from_text_cell() {
        // Some backends hand every column back as text.
        let row = Row::new().set("period", "17");
        assert_eq!(row.get_u64("period"), Some(17));
        assert_eq!(row.get_text("period"), Some("17"));
    }

    #[test]
    fn test_row_integer_cell_is_not_text() {
        let row = Row::new().set("period", 17u64);
        assert_eq!(row.get_text("period"), None);
    }
}
