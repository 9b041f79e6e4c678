//! The rolling bucket window and its persisted text form.
//!
//! A [`BucketSeries`] holds one count per time bucket, oldest-first; the
//! last bucket is "today". The series has a fixed length set by the group
//! configuration and keeps that length through every operation: sliding the
//! window forward drops the oldest bucket and appends a fresh zero.
//!
//! # Persisted form
//!
//! The series is stored as comma-separated decimal ASCII integers with no
//! leading or trailing delimiter, e.g. `"0,0,1,2,3,4,0"` for a 7-bucket
//! window. Parsing is strict: exactly the configured number of fields, each
//! a plain non-negative integer. Anything else is treated as a
//! data-integrity error ([`Error::CorruptSeries`]).

use std::fmt::{self, Display, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A fixed-length window of per-bucket counts, oldest-first.
///
/// The last bucket (`length - 1`) is the current one. Between operations
/// the containing record's period count equals [`BucketSeries::sum`].
///
/// # Examples
///
/// ```rust
/// use viewstats::BucketSeries;
///
/// let mut series = BucketSeries::parse("4,2,1,5,0,3,2", 7)?;
/// assert_eq!(series.sum(), 17);
///
/// // Slide the window: drop the oldest bucket, start a fresh one.
/// series.shift();
/// assert_eq!(series.to_string(), "2,1,5,0,3,2,0");
/// assert_eq!(series.sum(), 13);
/// # Ok::<(), viewstats::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketSeries {
    buckets: Vec<u64>,
}

impl BucketSeries {
    /// Creates a series of `length` zeroed buckets.
    pub fn zeroed(length: usize) -> Self {
        Self {
            buckets: vec![0; length],
        }
    }

    /// Parses the persisted comma-separated form.
    ///
    /// Fails with [`Error::CorruptSeries`] unless the text contains exactly
    /// `length` decimal non-negative integers.
    pub fn parse(text: &str, length: usize) -> Result<Self> {
        let corrupt = || Error::CorruptSeries { expected: length };
        let mut buckets = Vec::with_capacity(length);
        for field in text.split(',') {
            buckets.push(field.parse::<u64>().map_err(|_| corrupt())?);
            if buckets.len() > length {
                return Err(corrupt());
            }
        }
        if buckets.len() != length {
            return Err(corrupt());
        }
        Ok(Self { buckets })
    }

    /// Number of buckets in the window. Constant for the series' lifetime.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if the window has no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The buckets, oldest-first.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// The current ("today") bucket's count.
    pub fn today(&self) -> u64 {
        self.buckets.last().copied().unwrap_or(0)
    }

    /// Sum of all buckets: the period count the containing record must
    /// carry between operations.
    pub fn sum(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// Adds one view to the current bucket.
    pub fn increment_today(&mut self) {
        if let Some(today) = self.buckets.last_mut() {
            *today += 1;
        }
    }

    /// Slides the window forward by one bucket: drops the oldest count and
    /// appends a fresh zero. The length is unchanged.
    pub fn shift(&mut self) {
        if !self.buckets.is_empty() {
            self.buckets.remove(0);
            self.buckets.push(0);
        }
    }
}

impl Display for BucketSeries {
    /// Renders the persisted comma-separated form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.buckets.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{bucket}")?;
        }
        Ok(())
    }
}
