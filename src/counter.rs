//! Per-entity counter operations over the row store.
//!
//! A [`CounterStore`] binds a group configuration, a row store, and
//! (usually) a record ID, and exposes the counter contract: `create`,
//! `get_lifetime_count`, `get_period_count`, `increment`, `reset_period`,
//! and `delete`. Every operation is a blocking sequence of at most one
//! read followed by at most one write; no state is cached between calls.
//!
//! # Isolation
//!
//! `increment` and `reset_period` are read-modify-write sequences with no
//! isolation guarantee from this crate. Concurrent writers to the same ID
//! can lose updates unless the row store (or a wrapping layer) serializes
//! them with row-level locking, transactions, or compare-and-swap
//! retries.
//! This crate performs the logical sequence correctly for a single
//! in-flight operation per ID.

use serde::Serialize;
use tracing::{debug, error};

use crate::config::{ConfigSource, GroupConfig};
use crate::error::{Error, Result};
use crate::series::BucketSeries;
use crate::store::{Row, RowStore, StoreError, Value};

/// A fully parsed counter record: one row of the backing table.
///
/// Between operations `period == series.sum()` and the series holds
/// exactly the configured number of buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterRecord {
    /// The record's unique key.
    pub id: Value,
    /// Cumulative all-time view count.
    pub lifetime: u64,
    /// View count within the current rolling window.
    pub period: u64,
    /// Per-bucket counts composing the window, oldest-first.
    pub series: BucketSeries,
}

/// Per-entity view counter with a rolling fixed-length window.
///
/// Constructed from an explicit [`GroupConfig`] ([`CounterStore::new`]) or
/// a named group in a [`ConfigSource`] ([`CounterStore::from_source`]);
/// either way the configuration is validated once, before any store
/// access. Operations act on the bound record ID and fail with
/// [`Error::NoId`] if none is bound.
///
/// Mutating operations return `Ok(&Self)` so calls can be chained:
///
/// ```rust
/// use viewstats::{CounterStore, GroupConfig, MemoryStore};
///
/// let store = MemoryStore::new().with_table("statistics", "id");
/// let counter = CounterStore::new(GroupConfig::default(), store)?.with_id(7u64);
///
/// counter.create()?.increment()?.increment()?;
/// assert_eq!(counter.get_lifetime_count()?, 2);
/// assert_eq!(counter.get_period_count()?, 2);
/// # Ok::<(), viewstats::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CounterStore<S> {
    config: GroupConfig,
    store: S,
    id: Option<Value>,
}

impl<S: RowStore> CounterStore<S> {
    /// Creates a counter over `store` with an explicit, validated group
    /// configuration. No ID is bound yet.
    pub fn new(config: GroupConfig, store: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            id: None,
        })
    }

    /// Creates a counter from the named group in `source`.
    pub fn from_source(source: &ConfigSource, group: &str, store: S) -> Result<Self> {
        Self::new(source.group(group)?, store)
    }

    /// Binds a record ID, returning `self` for chaining.
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Re-binds the counter to another record ID.
    pub fn bind(&mut self, id: impl Into<Value>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    /// The currently bound record ID, if any.
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// The group configuration this counter operates under.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Creates a new zeroed record for the bound ID: `lifetime = 0`,
    /// `period = 0`, and a series of `length` zero buckets.
    ///
    /// Fails with [`Error::CreateFailed`] if the insert does not affect
    /// exactly one row, e.g. when the ID already exists.
    pub fn create(&self) -> Result<&Self> {
        let id = self.bound_id()?;
        debug!(id = %id, table = %self.config.table, "creating counter record");

        let cols = &self.config.columns;
        let series = BucketSeries::zeroed(self.config.length);
        let outcome = self
            .store
            .insert(
                &self.config.table,
                &[
                    cols.id.as_str(),
                    cols.lifetime.as_str(),
                    cols.period.as_str(),
                    cols.data.as_str(),
                ],
                vec![
                    id.clone(),
                    Value::Integer(0),
                    Value::Integer(0),
                    Value::Text(series.to_string()),
                ],
            )
            .map_err(|e| self.store_failure("create", e))?;

        if outcome.rows_affected != 1 {
            return Err(Error::CreateFailed);
        }
        Ok(self)
    }

    /// Returns the lifetime view count for the bound ID.
    pub fn get_lifetime_count(&self) -> Result<u64> {
        debug!(id = ?self.id, "reading lifetime count");
        self.read_count(&self.config.columns.lifetime)
    }

    /// Returns the view count for the current period.
    pub fn get_period_count(&self) -> Result<u64> {
        debug!(id = ?self.id, "reading period count");
        self.read_count(&self.config.columns.period)
    }

    /// Fetches and parses the full record for the bound ID.
    pub fn record(&self) -> Result<CounterRecord> {
        debug!(id = ?self.id, "reading counter record");
        self.fetch_record()
    }

    /// Adds one view: `lifetime`, `period`, and today's bucket each grow
    /// by one, and all three columns are written back.
    ///
    /// Not idempotent: calling this twice records two views.
    ///
    /// Fails with [`Error::IncrementFailed`] if the write-back does not
    /// affect exactly one row. See the module docs for the isolation
    /// caveat on this read-modify-write sequence.
    pub fn increment(&self) -> Result<&Self> {
        debug!(id = ?self.id, "incrementing counter record");

        let mut record = self.fetch_record()?;
        record.lifetime += 1;
        record.period += 1;
        record.series.increment_today();

        let cols = &self.config.columns;
        let affected = self
            .store
            .update(
                &self.config.table,
                vec![
                    (cols.lifetime.clone(), Value::Integer(record.lifetime)),
                    (cols.period.clone(), Value::Integer(record.period)),
                    (cols.data.clone(), Value::Text(record.series.to_string())),
                ],
                &cols.id,
                self.bound_id()?,
            )
            .map_err(|e| self.store_failure("increment", e))?;

        if affected != 1 {
            return Err(Error::IncrementFailed);
        }
        Ok(self)
    }

    /// Advances the window to a new bucket: drops the oldest count,
    /// starts today at zero, and recomputes `period` as the sum of the
    /// shifted series. `lifetime` is untouched; only the period and data
    /// columns are written back.
    ///
    /// When a period boundary occurs is the caller's decision, typically
    /// once per day for a 7-bucket window.
    ///
    /// Fails with [`Error::ResetFailed`] if the write-back does not
    /// affect exactly one row. Same isolation caveat as [`increment`].
    ///
    /// [`increment`]: CounterStore::increment
    pub fn reset_period(&self) -> Result<&Self> {
        debug!(id = ?self.id, "resetting counter period");

        let mut record = self.fetch_record()?;
        record.series.shift();
        record.period = record.series.sum();

        let cols = &self.config.columns;
        let affected = self
            .store
            .update(
                &self.config.table,
                vec![
                    (cols.period.clone(), Value::Integer(record.period)),
                    (cols.data.clone(), Value::Text(record.series.to_string())),
                ],
                &cols.id,
                self.bound_id()?,
            )
            .map_err(|e| self.store_failure("reset_period", e))?;

        if affected != 1 {
            return Err(Error::ResetFailed);
        }
        Ok(self)
    }

    /// Deletes the record for the bound ID.
    ///
    /// Returns `Ok(true)` iff exactly one row was deleted; `Ok(false)`
    /// when no row matched; deleting a nonexistent record is a valid
    /// no-op, not an error.
    pub fn delete(&self) -> Result<bool> {
        let id = self.bound_id()?;
        debug!(id = %id, "deleting counter record");

        let affected = self
            .store
            .delete(&self.config.table, &self.config.columns.id, id)
            .map_err(|e| self.store_failure("delete", e))?;
        Ok(affected == 1)
    }

    fn bound_id(&self) -> Result<&Value> {
        self.id.as_ref().ok_or(Error::NoId)
    }

    fn store_failure(&self, operation: &str, source: StoreError) -> Error {
        error!(operation, error = %source, "row store failure");
        Error::StoreUnavailable(source)
    }

    fn select_one(&self, columns: Option<&[&str]>) -> Result<Row> {
        let id = self.bound_id()?;
        let rows = self
            .store
            .select(&self.config.table, columns, &self.config.columns.id, id)
            .map_err(|e| self.store_failure("select", e))?;
        if rows.len() != 1 {
            return Err(Error::RecordNotFound);
        }
        rows.into_iter().next().ok_or(Error::RecordNotFound)
    }

    fn read_count(&self, column: &str) -> Result<u64> {
        let row = self.select_one(Some(&[column]))?;
        row.get_u64(column)
            .ok_or_else(|| self.malformed_result(column))
    }

    fn fetch_record(&self) -> Result<CounterRecord> {
        let row = self.select_one(None)?;
        let cols = &self.config.columns;
        let lifetime = row
            .get_u64(&cols.lifetime)
            .ok_or_else(|| self.malformed_result(&cols.lifetime))?;
        let period = row
            .get_u64(&cols.period)
            .ok_or_else(|| self.malformed_result(&cols.period))?;
        let data = row
            .get_text(&cols.data)
            .ok_or_else(|| self.malformed_result(&cols.data))?;
        let series = BucketSeries::parse(data, self.config.length)?;
        Ok(CounterRecord {
            id: self.bound_id()?.clone(),
            lifetime,
            period,
            series,
        })
    }

    /// The store returned a row missing (or mistyping) a configured
    /// column: a contract violation on its side.
    fn malformed_result(&self, column: &str) -> Error {
        let source = StoreError::new(format!(
            "column `{column}` missing or mistyped in `{}` result",
            self.config.table
        ));
        error!(error = %source, "row store returned a malformed row");
        Error::StoreUnavailable(source)
    }
}
