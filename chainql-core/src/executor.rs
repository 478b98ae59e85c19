//! Statement execution interface
//!
//! The builder never talks to a driver directly. It hands `(sql, params)` to
//! a [`ConnectionPool`], or to the active [`Transaction`] when one is open,
//! and adapts the generic [`RowSet`] it gets back.

use std::future::Future;

use indexmap::IndexMap;

use crate::{Result, Value};

/// A result row keyed by column name, in select order
pub type Row = IndexMap<String, Value>;

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Driver-reported id of the last inserted row, where the driver has one
    pub last_insert_id: Option<i64>,
}

/// Rows returned by a query, column names stored once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row, for scalar queries
    pub fn first_value(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// Materialize every row as a column-name map. When a column name
    /// repeats, the later cell wins.
    pub fn into_records(self) -> Vec<Row> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|cells| columns.iter().cloned().zip(cells).collect())
            .collect()
    }
}

/// Trait for database connection pools
pub trait ConnectionPool: Send + Sync {
    /// Execute a query that returns rows
    fn fetch_rows(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<RowSet>> + Send;

    /// Execute a query that returns no rows (INSERT, UPDATE, DELETE)
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<ExecResult>> + Send;
}

/// Trait for database transactions
pub trait Transaction: Send {
    /// Execute a query that returns rows
    fn fetch_rows(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<RowSet>> + Send;

    /// Execute a query that returns no rows
    fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<ExecResult>> + Send;

    /// Commit the transaction
    fn commit(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;

    /// Rollback the transaction
    fn rollback(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

/// Extension trait for connection pools to support transactions
pub trait TransactionalPool: ConnectionPool {
    type Transaction: Transaction;

    /// Start a new transaction
    fn begin_transaction(&self) -> impl Future<Output = Result<Self::Transaction>> + Send;
}

/// SQLite pool backed by sqlx
#[cfg(feature = "sqlite")]
pub mod sqlite {
    use super::*;
    use crate::value::TIMESTAMP_FORMAT;
    use futures::TryStreamExt;
    use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow};
    use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};

    type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

    /// SQLite connection pool wrapper
    #[derive(Debug, Clone)]
    pub struct SqlitePool {
        inner: sqlx::SqlitePool,
    }

    impl SqlitePool {
        /// Create a new pool from a connection string
        pub async fn new(database_url: &str) -> Result<Self> {
            let pool = sqlx::SqlitePool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// Private in-memory database. One connection, so every statement
        /// sees the same database.
        pub async fn in_memory() -> Result<Self> {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing sqlx pool
        pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
            Self { inner: pool }
        }

        pub fn inner(&self) -> &sqlx::SqlitePool {
            &self.inner
        }
    }

    impl ConnectionPool for SqlitePool {
        async fn fetch_rows(&self, sql: &str, params: &[Value]) -> Result<RowSet> {
            let mut stream = bind_values(sqlx::query(sql), params).fetch(&self.inner);
            let mut rows = RowCollector::default();
            while let Some(row) = stream.try_next().await? {
                rows.push(&row)?;
            }
            Ok(rows.finish())
        }

        async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult> {
            let result = bind_values(sqlx::query(sql), params)
                .execute(&self.inner)
                .await?;
            Ok(ExecResult {
                rows_affected: result.rows_affected(),
                last_insert_id: Some(result.last_insert_rowid()),
            })
        }
    }

    /// SQLite transaction wrapper
    pub struct SqliteTransaction {
        inner: sqlx::Transaction<'static, Sqlite>,
    }

    impl Transaction for SqliteTransaction {
        async fn fetch_rows(&mut self, sql: &str, params: &[Value]) -> Result<RowSet> {
            let mut stream = bind_values(sqlx::query(sql), params).fetch(&mut *self.inner);
            let mut rows = RowCollector::default();
            while let Some(row) = stream.try_next().await? {
                rows.push(&row)?;
            }
            Ok(rows.finish())
        }

        async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecResult> {
            let result = bind_values(sqlx::query(sql), params)
                .execute(&mut *self.inner)
                .await?;
            Ok(ExecResult {
                rows_affected: result.rows_affected(),
                last_insert_id: Some(result.last_insert_rowid()),
            })
        }

        async fn commit(self) -> Result<()> {
            self.inner.commit().await?;
            Ok(())
        }

        async fn rollback(self) -> Result<()> {
            self.inner.rollback().await?;
            Ok(())
        }
    }

    impl TransactionalPool for SqlitePool {
        type Transaction = SqliteTransaction;

        async fn begin_transaction(&self) -> Result<Self::Transaction> {
            let tx = self.inner.begin().await?;
            Ok(SqliteTransaction { inner: tx })
        }
    }

    fn bind_values<'q>(mut query: SqliteQuery<'q>, params: &'q [Value]) -> SqliteQuery<'q> {
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<i64>),
                Value::Bool(b) => query.bind(*b),
                Value::Int(i) => query.bind(*i),
                Value::Float(f) => query.bind(*f),
                Value::Text(s) => query.bind(s.as_str()),
                Value::Bytes(b) => query.bind(b.as_slice()),
                Value::Timestamp(ts) => query.bind(ts.format(TIMESTAMP_FORMAT).to_string()),
            };
        }
        query
    }

    #[derive(Default)]
    struct RowCollector {
        columns: Option<Vec<String>>,
        rows: Vec<Vec<Value>>,
    }

    impl RowCollector {
        fn push(&mut self, row: &SqliteRow) -> Result<()> {
            if self.columns.is_none() {
                self.columns = Some(row.columns().iter().map(|c| c.name().to_string()).collect());
            }
            self.rows.push(decode_row(row)?);
            Ok(())
        }

        fn finish(self) -> RowSet {
            RowSet::new(self.columns.unwrap_or_default(), self.rows)
        }
    }

    /// Accepts both the bound form and ISO 8601 with fractional seconds
    const DATETIME_PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    /// Decode each cell by its declared column type when that type carries
    /// more than SQLite stores (BOOLEAN, DATETIME), otherwise by the cell's
    /// storage class. Expressions such as `COUNT(*)` have no declared type.
    fn decode_row(row: &SqliteRow) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(row.len());
        for (index, column) in row.columns().iter().enumerate() {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                values.push(Value::Null);
                continue;
            }
            let storage = raw.type_info().name().to_ascii_uppercase();
            let declared = column.type_info().name().to_ascii_uppercase();
            let value = match (declared.as_str(), storage.as_str()) {
                ("BOOLEAN", "INTEGER") => Value::Bool(row.try_get_unchecked::<i64, _>(index)? != 0),
                ("DATETIME" | "TIMESTAMP", "TEXT") => {
                    let text = row.try_get_unchecked::<String, _>(index)?;
                    parse_datetime(&text).map_or(Value::Text(text), Value::Timestamp)
                }
                (_, "INTEGER") => Value::Int(row.try_get_unchecked::<i64, _>(index)?),
                (_, "REAL") => Value::Float(row.try_get_unchecked::<f64, _>(index)?),
                (_, "BLOB") => Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => Value::Text(row.try_get_unchecked::<String, _>(index)?),
            };
            values.push(value);
        }
        Ok(values)
    }

    fn parse_datetime(text: &str) -> Option<chrono::NaiveDateTime> {
        DATETIME_PARSE_FORMATS
            .iter()
            .find_map(|format| chrono::NaiveDateTime::parse_from_str(text, format).ok())
    }

}
