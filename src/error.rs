//! Unified error type for all counter operations.
//!
//! Every failing branch in this crate maps to exactly one named variant of
//! [`Error`], so callers can pattern-match on the failure kind instead of
//! inspecting message strings.
//!
//! Row-store failures are wrapped as [`Error::StoreUnavailable`]: the
//! collaborator's error stays reachable through the `source` chain for
//! debugging, but the display text is purely domain-level.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for all counter operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or incomplete configuration, detected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation was invoked without a bound record ID.
    #[error("no record ID bound")]
    NoId,

    /// A read expected exactly one row and got zero or more than one.
    ///
    /// More than one row for a single ID indicates a store integrity
    /// violation; both cases surface identically since the ID is expected
    /// to be a unique key.
    #[error("counter record not found")]
    RecordNotFound,

    /// The insert for a new record did not affect exactly one row,
    /// e.g. the ID already exists.
    #[error("counter record was not created")]
    CreateFailed,

    /// The increment write-back did not affect exactly one row.
    #[error("counter record was not incremented")]
    IncrementFailed,

    /// The period-reset write-back did not affect exactly one row.
    #[error("counter period was not reset")]
    ResetFailed,

    /// A persisted bucket series did not parse into the configured number
    /// of non-negative integers.
    #[error("stored bucket series is corrupt: expected {expected} buckets")]
    CorruptSeries {
        /// The configured window length.
        expected: usize,
    },

    /// The row store itself failed (connection or query error).
    #[error("row store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

/// Result type for counter operations.
pub type Result<T> = std::result::Result<T, Error>;
