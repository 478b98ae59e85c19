//! Builder configuration

use serde::{Deserialize, Serialize};

use crate::{Dialect, Result};

/// Page size used by `paginate` when the caller passes a non-positive one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Settings shared by every builder handed out by a [`crate::Database`]
///
/// # Examples
/// ```
/// use chainql_core::{Dialect, QueryConfig};
///
/// let config = QueryConfig::from_json(r#"{ "dialect": "mysql" }"#).unwrap();
/// assert_eq!(config.dialect, Dialect::MySql);
/// assert_eq!(config.default_page_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Dialect used to render upsert conflict clauses
    pub dialect: Dialect,
    /// Fallback page size for `paginate`
    pub default_page_size: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the fallback page size; zero keeps the built-in default
    pub fn default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        self
    }

    /// Parse configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: QueryConfig = serde_json::from_str(json)?;
        let size = config.default_page_size;
        Ok(config.default_page_size(size))
    }
}
