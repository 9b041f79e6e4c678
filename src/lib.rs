//! # Viewstats - Page-View Counters with a Rolling Window
//!
//! A library for tracking per-entity page-view statistics in a relational
//! row store. For each tracked entity (a page, a post, anything with an
//! ID) it maintains three things in a single row:
//!
//! - a **lifetime count**: the cumulative all-time view total,
//! - a **period count**: the view total within the current rolling window,
//! - a **bucket series**: the per-time-slot counts composing that window,
//!   oldest-first, with the last bucket being "today".
//!
//! ## The Problem
//!
//! Keeping a rolling "views this week" number in a plain table is fiddly:
//! the datastore offers only read and update primitives, there is no
//! atomic increment-with-shift, and the window total must stay consistent
//! with the buckets it is derived from. The interesting logic is small
//! and specific: add a view to today's bucket, and periodically slide
//! the window forward, dropping the oldest bucket and recomputing the
//! period sum. But the invariants have to hold across every mutation.
//!
//! ## The Solution
//!
//! [`CounterStore`] implements exactly that contract over an abstract
//! [`RowStore`] collaborator. Every operation is a blocking read-then-
//! write keyed by the record ID, with exactly-one-row checks on both
//! sides, and between operations two invariants always hold:
//!
//! 1. `period == series.sum()`
//! 2. the series has exactly the configured number of buckets
//!
//! The series is persisted as comma-separated decimal text
//! (`"0,0,1,2,3,4,0"` for a 7-day window), so the rows stay readable and
//! byte-compatible with existing tables.
//!
//! ## Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CounterStore`] | The counter operations: create, read, increment, reset, delete |
//! | [`CounterRecord`] | One parsed row: ID, lifetime, period, series |
//! | [`BucketSeries`] | The fixed-length rolling window and its text form |
//! | [`GroupConfig`] / [`ConfigSource`] | Table, column names, and window length, per named group |
//! | [`RowStore`] / [`MemoryStore`] | The CRUD collaborator and its in-process implementation |
//! | [`Error`] | One variant per failure kind |
//!
//! ## Quick Start
//!
//! ```rust
//! use viewstats::{CounterStore, GroupConfig, MemoryStore};
//!
//! let store = MemoryStore::new().with_table("statistics", "id");
//! let page = CounterStore::new(GroupConfig::default(), store)?.with_id(42u64);
//!
//! // A record is created explicitly, zeroed.
//! page.create()?;
//!
//! // Each view bumps lifetime, period, and today's bucket.
//! page.increment()?.increment()?;
//! assert_eq!(page.get_lifetime_count()?, 2);
//!
//! // At a period boundary (say, midnight) the caller slides the window.
//! page.reset_period()?;
//! let record = page.record()?;
//! assert_eq!(record.series.to_string(), "0,0,0,0,0,2,0");
//! assert_eq!(record.period, record.series.sum());
//! # Ok::<(), viewstats::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Operations are single-threaded and synchronous, and `increment` /
//! `reset_period` are read-modify-write sequences with **no isolation
//! guarantee** from this crate: concurrent writers to the same ID can
//! lose updates. If multiple concurrent writers per ID are expected, the
//! row store or a wrapping layer must serialize them (row locks,
//! transactions, or CAS retries). See the [`counter`] module docs.
//!
//! ## Observability
//!
//! Every operation emits [`tracing`] events: `debug` on entry, `error`
//! when the row store fails. Install whatever subscriber your application
//! uses; the crate never configures one.

pub mod config;
pub mod counter;
pub mod error;
pub mod series;
pub mod store;

pub use config::{Columns, ConfigSource, GroupConfig, DEFAULT_GROUP};
pub use counter::{CounterRecord, CounterStore};
pub use error::{Error, Result};
pub use series::BucketSeries;
pub use store::{InsertOutcome, MemoryStore, Row, RowStore, StoreError, Value};
