//! In-memory row store for tests and embedders without a database.
//!
//! Tables are created lazily on first insert; selects, updates, and
//! deletes against a table that was never written see no rows rather than
//! failing. A table may declare a unique-key column via
//! [`MemoryStore::with_table`], in which case duplicate inserts are
//! rejected (zero rows affected) the way a primary key would reject them.
//!
//! The store is a cloneable handle over shared state, so a test can keep
//! one handle for inspection after giving another to a counter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{InsertOutcome, Row, RowStore, StoreError, Value};

#[derive(Debug, Default)]
struct Table {
    key_column: Option<String>,
    rows: Vec<HashMap<String, Value>>,
}

/// A mutex-guarded, `HashMap`-backed [`RowStore`].
///
/// # Examples
///
/// ```rust
/// use viewstats::{MemoryStore, RowStore, Value};
///
/// let store = MemoryStore::new().with_table("statistics", "id");
/// let outcome = store.insert(
///     "statistics",
///     &["id", "lifetime"],
///     vec![Value::Integer(1), Value::Integer(0)],
/// )?;
/// assert_eq!(outcome.rows_affected, 1);
///
/// // The declared key rejects duplicates.
/// let outcome = store.insert(
///     "statistics",
///     &["id", "lifetime"],
///     vec![Value::Integer(1), Value::Integer(9)],
/// )?;
/// assert_eq!(outcome.rows_affected, 0);
/// # Ok::<(), viewstats::StoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Table>>>,
}

impl MemoryStore {
    /// Creates an empty store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table with a unique-key column, returning `self` for
    /// chaining. Inserts carrying a duplicate value in that column are
    /// rejected with zero rows affected.
    pub fn with_table(self, name: impl Into<String>, key_column: impl Into<String>) -> Self {
        {
            let mut tables = match self.tables.lock() {
                Ok(tables) => tables,
                Err(poisoned) => poisoned.into_inner(),
            };
            tables.insert(
                name.into(),
                Table {
                    key_column: Some(key_column.into()),
                    rows: Vec::new(),
                },
            );
        }
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Table>>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::new("memory store lock poisoned"))
    }
}

impl RowStore for MemoryStore {
    fn insert(
        &self,
        table: &str,
        columns: &[&str],
        values: Vec<Value>,
    ) -> Result<InsertOutcome, StoreError> {
        if columns.len() != values.len() {
            return Err(StoreError::new(format!(
                "insert into `{table}`: {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }

        let mut tables = self.lock()?;
        let entry = tables.entry(table.to_string()).or_default();

        let row: HashMap<String, Value> = columns
            .iter()
            .map(|c| (*c).to_string())
            .zip(values)
            .collect();

        let mut generated_id = None;
        if let Some(key_column) = &entry.key_column {
            if let Some(key) = row.get(key_column) {
                if entry.rows.iter().any(|r| r.get(key_column) == Some(key)) {
                    return Ok(InsertOutcome {
                        generated_id: None,
                        rows_affected: 0,
                    });
                }
                generated_id = Some(key.clone());
            }
        }

        entry.rows.push(row);
        Ok(InsertOutcome {
            generated_id,
            rows_affected: 1,
        })
    }

    fn select(
        &self,
        table: &str,
        columns: Option<&[&str]>,
        key_column: &str,
        key: &Value,
    ) -> Result<Vec<Row>, StoreError> {
        let tables = self.lock()?;
        let Some(entry) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        for row in entry.rows.iter().filter(|r| r.get(key_column) == Some(key)) {
            let projected = match columns {
                None => row.clone(),
                Some(wanted) => {
                    let mut cells = HashMap::with_capacity(wanted.len());
                    for column in wanted {
                        let value = row.get(*column).ok_or_else(|| {
                            StoreError::new(format!("unknown column `{column}` in `{table}`"))
                        })?;
                        cells.insert((*column).to_string(), value.clone());
                    }
                    cells
                }
            };
            result.push(Row::from(projected));
        }
        Ok(result)
    }

    fn update(
        &self,
        table: &str,
        assignments: Vec<(String, Value)>,
        key_column: &str,
        key: &Value,
    ) -> Result<u64, StoreError> {
        let mut tables = self.lock()?;
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };

        let mut affected = 0;
        for row in entry
            .rows
            .iter_mut()
            .filter(|r| r.get(key_column) == Some(key))
        {
            for (column, value) in &assignments {
                let _ = row.insert(column.clone(), value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    fn delete(&self, table: &str, key_column: &str, key: &Value) -> Result<u64, StoreError> {
        let mut tables = self.lock()?;
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = entry.rows.len();
        entry.rows.retain(|r| r.get(key_column) != Some(key));
        Ok((before - entry.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: u64) -> Value {
        Value::Integer(id)
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new().with_table("stats", "id");
        store
            .insert(
                "stats",
                &["id", "lifetime", "data"],
                vec![key(1), Value::Integer(50), Value::from("0,0,1,2,3,4,0")],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_insert_and_select() {
        let store = seeded();
        let rows = store.select("stats", None, "id", &key(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_u64("lifetime"), Some(50));
        assert_eq!(rows[0].get_text("data"), Some("0,0,1,2,3,4,0"));
    }

    #[test]
    fn test_insert_reports_generated_id() {
        let store = MemoryStore::new().with_table("stats", "id");
        let outcome = store
            .insert("stats", &["id"], vec![key(9)])
            .unwrap();
        assert_eq!(outcome.generated_id, Some(key(9)));
        assert_eq!(outcome.rows_affected, 1);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let store = seeded();
        let outcome = store
            .insert("stats", &["id", "lifetime"], vec![key(1), Value::Integer(0)])
            .unwrap();
        assert_eq!(outcome.rows_affected, 0);
        assert_eq!(store.select("stats", None, "id", &key(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_undeclared_table_allows_duplicates() {
        let store = MemoryStore::new();
        store.insert("t", &["id"], vec![key(1)]).unwrap();
        store.insert("t", &["id"], vec![key(1)]).unwrap();
        assert_eq!(store.select("t", None, "id", &key(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_select_projection() {
        let store = seeded();
        let rows = store
            .select("stats", Some(&["lifetime"]), "id", &key(1))
            .unwrap();
        assert_eq!(rows[0].get_u64("lifetime"), Some(50));
        assert_eq!(rows[0].get("data"), None);
    }

    #[test]
    fn test_select_unknown_column_fails() {
        let store = seeded();
        let result = store.select("stats", Some(&["nope"]), "id", &key(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_select_missing_table_sees_no_rows() {
        let store = MemoryStore::new();
        assert!(store.select("nope", None, "id", &key(1)).unwrap().is_empty());
    }

    #[test]
    fn test_update() {
        let store = seeded();
        let affected = store
            .update(
                "stats",
                vec![("lifetime".to_string(), Value::Integer(51))],
                "id",
                &key(1),
            )
            .unwrap();
        assert_eq!(affected, 1);
        let rows = store.select("stats", None, "id", &key(1)).unwrap();
        assert_eq!(rows[0].get_u64("lifetime"), Some(51));
    }

    #[test]
    fn test_update_no_match() {
        let store = seeded();
        let affected = store
            .update(
                "stats",
                vec![("lifetime".to_string(), Value::Integer(0))],
                "id",
                &key(13),
            )
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[test]
    fn test_delete() {
        let store = seeded();
        assert_eq!(store.delete("stats", "id", &key(1)).unwrap(), 1);
        assert_eq!(store.delete("stats", "id", &key(1)).unwrap(), 0);
        assert_eq!(store.delete("missing", "id", &key(1)).unwrap(), 0);
    }

    #[test]
    fn test_mismatched_insert_fails() {
        let store = MemoryStore::new();
        assert!(store.insert("t", &["id", "x"], vec![key(1)]).is_err());
    }

    #[test]
    fn test_clone_shares_state() {
        let store = seeded();
        let handle = store.clone();
        handle
            .insert("stats", &["id"], vec![key(2)])
            .unwrap();
        assert_eq!(store.select("stats", None, "id", &key(2)).unwrap().len(), 1);
    }
}
