//! chainql core - a fluent, parameterized SQL statement builder
//!
//! Chained calls build up a [`QuerySpec`]; terminal operations on a
//! [`QueryBuilder`] compose it into SQL text with `?` placeholders plus the
//! matching parameter list, and run it on a [`ConnectionPool`] or inside a
//! transaction. Caller-supplied values never end up in the SQL text.
//!
//! ```ignore
//! use chainql_core::{op, Database};
//! use chainql_core::executor::sqlite::SqlitePool;
//!
//! let db = Database::new(SqlitePool::in_memory().await?);
//! let adults = db
//!     .table("users")
//!     .select(("id", "name"))
//!     .where_(("age", op::GTE, 18))
//!     .order_by("name", "asc")
//!     .paginate(1, 20)
//!     .to_list()
//!     .await?;
//! ```

pub mod error;
pub mod operator;
pub mod value;
pub mod dialect;
pub mod config;
pub mod builder;
pub mod debug;
pub mod executor;
pub mod transaction;
pub mod database;

// Re-export main types
pub use builder::{
    AggregateFunction, IntoColumns, IntoCondition, IntoRecord, JoinType, QueryBuilder, QuerySpec,
    Record, SortDirection, Statement, UncheckedSql,
};
pub use config::QueryConfig;
pub use database::Database;
pub use debug::render_debug_sql;
pub use dialect::{Dialect, UpsertStrategy};
pub use error::{Error, Result};
pub use executor::{ConnectionPool, ExecResult, Row, RowSet, Transaction, TransactionalPool};
pub use operator::{op, IntoOperator, Operator};
pub use value::Value;

/// Create a pure query spec for the given table
pub fn from(table: &str) -> QuerySpec {
    QuerySpec::new(table)
}

/// Mark a SQL fragment as trusted raw text, for join conditions.
///
/// The fragment is written into the statement verbatim; never build it from
/// user input.
pub fn unchecked(sql: impl Into<String>) -> UncheckedSql {
    UncheckedSql::new(sql)
}
