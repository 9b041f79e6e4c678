//! Group configuration and the named-group configuration source.
//!
//! A [`GroupConfig`] names the backing table, the four counter columns,
//! and the window length. Configuration is validated once, at counter
//! construction, before any store access.
//!
//! Groups can also live in a TOML document under a `[statistics]` table,
//! one sub-table per named group; [`ConfigSource`] resolves the dotted
//! path `statistics.<group>`:
//!
//! ```toml
//! [statistics.default]
//! length = 7
//! table = "statistics"
//!
//! [statistics.default.columns]
//! id = "id"
//! lifetime = "lifetime"
//! period = "period"
//! data = "data"
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the group used when none is specified.
pub const DEFAULT_GROUP: &str = "default";

/// Column names for the four counter fields.
///
/// All four are required; a group definition missing any of them is
/// rejected as invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    /// Unique-key column holding the record ID.
    pub id: String,
    /// Column holding the lifetime view count.
    pub lifetime: String,
    /// Column holding the rolling-window view count.
    pub period: String,
    /// Column holding the serialized bucket series.
    pub data: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            lifetime: "lifetime".to_string(),
            period: "period".to_string(),
            data: "data".to_string(),
        }
    }
}

/// Configuration for one statistics group: where records live and how
/// long the rolling window is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Number of buckets in the rolling window. Must be positive.
    pub length: usize,
    /// Name of the backing table.
    pub table: String,
    /// Column names for the four counter fields.
    pub columns: Columns,
}

impl Default for GroupConfig {
    /// The stock `default` group: a 7-bucket window over a `statistics`
    /// table with the conventional column names.
    fn default() -> Self {
        Self {
            length: 7,
            table: "statistics".to_string(),
            columns: Columns::default(),
        }
    }
}

impl GroupConfig {
    /// Checks that the group is usable: a positive window length and
    /// non-empty table and column names.
    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(Error::InvalidConfig(
                "window length must be positive".to_string(),
            ));
        }
        if self.table.is_empty() {
            return Err(Error::InvalidConfig("table name is empty".to_string()));
        }
        let columns = [
            ("id", &self.columns.id),
            ("lifetime", &self.columns.lifetime),
            ("period", &self.columns.period),
            ("data", &self.columns.data),
        ];
        for (key, name) in columns {
            if name.is_empty() {
                return Err(Error::InvalidConfig(format!("column name `{key}` is empty")));
            }
        }
        Ok(())
    }
}

/// A parsed TOML document holding named statistics groups.
///
/// # Examples
///
/// ```rust
/// use viewstats::{ConfigSource, DEFAULT_GROUP};
///
/// let source: ConfigSource = r#"
///     [statistics.default]
///     length = 7
///     table = "statistics"
///     columns = { id = "id", lifetime = "lifetime", period = "period", data = "data" }
/// "#.parse()?;
///
/// let group = source.group(DEFAULT_GROUP)?;
/// assert_eq!(group.length, 7);
/// # Ok::<(), viewstats::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSource {
    document: toml::Table,
}

impl ConfigSource {
    /// Loads a configuration document from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        text.parse()
    }

    /// Resolves the dotted path `statistics.<name>` to a validated
    /// [`GroupConfig`].
    pub fn group(&self, name: &str) -> Result<GroupConfig> {
        let groups = self
            .document
            .get("statistics")
            .and_then(toml::Value::as_table)
            .ok_or_else(|| Error::InvalidConfig("missing [statistics] table".to_string()))?;
        let value = groups
            .get(name)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown statistics group `{name}`")))?;
        let config: GroupConfig = value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| {
                Error::InvalidConfig(format!("statistics group `{name}`: {}", e.message()))
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl FromStr for ConfigSource {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let document = text
            .parse::<toml::Table>()
            .map_err(|e| Error::InvalidConfig(e.message().to_string()))?;
        Ok(Self { document })
    }
}
