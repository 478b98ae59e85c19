//! Conflict-resolution syntax for upserts.
//!
//! | Dialect  | Clause                                   |
//! |----------|------------------------------------------|
//! | SQLite   | `ON CONFLICT (k) DO UPDATE SET c = excluded.c` |
//! | Postgres | `ON CONFLICT (k) DO UPDATE SET c = EXCLUDED.c` |
//! | MySQL    | `ON DUPLICATE KEY UPDATE c = VALUES(c)`  |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Renders the clause appended to `INSERT INTO t (...) VALUES (...)` that turns
/// it into an upsert.
///
/// The returned text is written into the statement unparameterized; custom
/// strategies are trusted the same way join conditions are.
pub trait UpsertStrategy: Send + Sync + fmt::Debug {
    /// `conflict_columns` identify the row, `update_columns` are every other
    /// inserted column, in insert order.
    fn conflict_clause(&self, conflict_columns: &[String], update_columns: &[String])
        -> Result<String>;
}

/// Built-in SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    Postgres,
    #[serde(alias = "mariadb")]
    MySql,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }

    fn on_conflict(
        conflict_columns: &[String],
        update_columns: &[String],
        excluded: &str,
    ) -> Result<String> {
        if conflict_columns.is_empty() {
            return Err(Error::invalid_query(
                "ON CONFLICT upsert requires at least one conflict column",
            ));
        }

        let target = conflict_columns.join(", ");
        if update_columns.is_empty() {
            return Ok(format!("ON CONFLICT ({}) DO NOTHING", target));
        }

        let assignments: Vec<String> = update_columns
            .iter()
            .map(|c| format!("{} = {}.{}", c, excluded, c))
            .collect();
        Ok(format!(
            "ON CONFLICT ({}) DO UPDATE SET {}",
            target,
            assignments.join(", ")
        ))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl UpsertStrategy for Dialect {
    fn conflict_clause(
        &self,
        conflict_columns: &[String],
        update_columns: &[String],
    ) -> Result<String> {
        match self {
            Dialect::Sqlite => Self::on_conflict(conflict_columns, update_columns, "excluded"),
            Dialect::Postgres => Self::on_conflict(conflict_columns, update_columns, "EXCLUDED"),
            Dialect::MySql => {
                // MySQL has no DO NOTHING; a self-assignment keeps the row untouched
                let assignments: Vec<String> = if update_columns.is_empty() {
                    let key = conflict_columns.first().ok_or_else(|| {
                        Error::invalid_query("upsert requires at least one column to update")
                    })?;
                    vec![format!("{} = {}", key, key)]
                } else {
                    update_columns
                        .iter()
                        .map(|c| format!("{} = VALUES({})", c, c))
                        .collect()
                };
                Ok(format!("ON DUPLICATE KEY UPDATE {}", assignments.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mysql_clause() {
        let clause = Dialect::MySql
            .conflict_clause(&cols(&["email"]), &cols(&["name", "age"]))
            .unwrap();
        assert_eq!(
            clause,
            "ON DUPLICATE KEY UPDATE name = VALUES(name), age = VALUES(age)"
        );
    }

    #[test]
    fn test_postgres_clause() {
        let clause = Dialect::Postgres
            .conflict_clause(&cols(&["email"]), &cols(&["name"]))
            .unwrap();
        assert_eq!(clause, "ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name");
    }

    #[test]
    fn test_sqlite_clause_without_updates() {
        let clause = Dialect::Sqlite
            .conflict_clause(&cols(&["id", "tenant"]), &[])
            .unwrap();
        assert_eq!(clause, "ON CONFLICT (id, tenant) DO NOTHING");
    }

    #[test]
    fn test_on_conflict_requires_target() {
        let err = Dialect::Postgres
            .conflict_clause(&[], &cols(&["name"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_dialect_deserialize() {
        let dialect: Dialect = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(dialect, Dialect::Postgres);
        let dialect: Dialect = serde_json::from_str("\"mariadb\"").unwrap();
        assert_eq!(dialect, Dialect::MySql);
    }
}
