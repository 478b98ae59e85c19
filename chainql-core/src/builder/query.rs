//! Executing query builder

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use super::common::{IntoColumns, IntoCondition, IntoRecord, Record, SortDirection, UncheckedSql};
use super::select::AggregateFunction;
use super::spec::QuerySpec;
use super::statement::Statement;
use crate::config::QueryConfig;
use crate::dialect::UpsertStrategy;
use crate::executor::{ExecResult, Row, RowSet, Transaction, TransactionalPool};
use crate::{Error, Result, Value};

/// Transaction slot shared by a builder and its clones. `None` once the
/// transaction has been committed or rolled back.
pub(crate) type SharedTransaction<T> = Arc<Mutex<Option<T>>>;

/// Fluent query builder bound to a connection pool.
///
/// Configuration methods consume and return the builder. Terminal
/// operations borrow it, so the same configuration can be executed more than
/// once, and `clone()` gives an independent copy of the query state.
///
/// While a transaction is active every statement runs inside it; clones made
/// during that time share the transaction.
pub struct QueryBuilder<'c, C: TransactionalPool> {
    pool: &'c C,
    pub(crate) transaction: Option<SharedTransaction<C::Transaction>>,
    upsert_strategy: Arc<dyn UpsertStrategy>,
    default_page_size: u64,
    spec: QuerySpec,
}

impl<'c, C: TransactionalPool> Clone for QueryBuilder<'c, C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool,
            transaction: self.transaction.clone(),
            upsert_strategy: Arc::clone(&self.upsert_strategy),
            default_page_size: self.default_page_size,
            spec: self.spec.clone(),
        }
    }
}

impl<'c, C: TransactionalPool> fmt::Debug for QueryBuilder<'c, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("spec", &self.spec)
            .field("upsert_strategy", &self.upsert_strategy)
            .field("in_transaction", &self.transaction.is_some())
            .finish()
    }
}

impl<'c, C: TransactionalPool> QueryBuilder<'c, C> {
    /// Builder with the default configuration
    pub fn new(pool: &'c C) -> Self {
        Self::with_config(pool, &QueryConfig::default())
    }

    pub fn with_config(pool: &'c C, config: &QueryConfig) -> Self {
        Self {
            pool,
            transaction: None,
            upsert_strategy: Arc::new(config.dialect),
            default_page_size: config.default_page_size,
            spec: QuerySpec::default(),
        }
    }

    fn map_spec(mut self, f: impl FnOnce(QuerySpec) -> QuerySpec) -> Self {
        self.spec = f(std::mem::take(&mut self.spec));
        self
    }

    pub fn table(self, table: &str) -> Self {
        self.map_spec(|s| s.table(table))
    }

    pub fn select<T: IntoColumns>(self, columns: T) -> Self {
        self.map_spec(|s| s.select(columns))
    }

    pub fn select_all(self) -> Self {
        self.map_spec(QuerySpec::select_all)
    }

    /// Add a WHERE condition, joined with AND
    ///
    /// # Examples
    /// ```ignore
    /// db.table("users").where_(("age", op::GT, 18)).where_(("status", "active"));
    /// ```
    pub fn where_<T: IntoCondition>(self, condition: T) -> Self {
        self.map_spec(|s| s.where_(condition))
    }

    pub fn and_where<T: IntoCondition>(self, condition: T) -> Self {
        self.map_spec(|s| s.and_where(condition))
    }

    pub fn or_where<T: IntoCondition>(self, condition: T) -> Self {
        self.map_spec(|s| s.or_where(condition))
    }

    /// `column IN (...)`; an empty list is ignored
    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map_spec(|s| s.where_in(column, values))
    }

    /// `column NOT IN (...)`; an empty list is ignored
    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.map_spec(|s| s.where_not_in(column, values))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.map_spec(|s| s.where_null(column))
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.map_spec(|s| s.where_not_null(column))
    }

    pub fn inner_join(self, table: &str, on: UncheckedSql) -> Self {
        self.map_spec(|s| s.inner_join(table, on))
    }

    pub fn left_join(self, table: &str, on: UncheckedSql) -> Self {
        self.map_spec(|s| s.left_join(table, on))
    }

    pub fn right_join(self, table: &str, on: UncheckedSql) -> Self {
        self.map_spec(|s| s.right_join(table, on))
    }

    pub fn order_by<D: Into<SortDirection>>(self, column: &str, direction: D) -> Self {
        self.map_spec(|s| s.order_by(column, direction))
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.map_spec(|s| s.order_by_asc(column))
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.map_spec(|s| s.order_by_desc(column))
    }

    pub fn group_by<T: IntoColumns>(self, columns: T) -> Self {
        self.map_spec(|s| s.group_by(columns))
    }

    pub fn having<T: IntoCondition>(self, condition: T) -> Self {
        self.map_spec(|s| s.having(condition))
    }

    pub fn limit(self, limit: u64) -> Self {
        self.map_spec(|s| s.limit(limit))
    }

    pub fn offset(self, offset: u64) -> Self {
        self.map_spec(|s| s.offset(offset))
    }

    /// LIMIT/OFFSET for a 1-based page. Non-positive values fall back to the
    /// first page and the configured page size.
    pub fn paginate(self, page: i64, per_page: i64) -> Self {
        let fallback = self.default_page_size;
        self.map_spec(|s| s.paginate_or(page, per_page, fallback))
    }

    /// Replace the dialect-derived conflict clause renderer used by `upsert`
    pub fn upsert_strategy<S>(mut self, strategy: S) -> Self
    where
        S: UpsertStrategy + 'static,
    {
        self.upsert_strategy = Arc::new(strategy);
        self
    }

    /// Current query state
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn pool(&self) -> &'c C {
        self.pool
    }

    /// Whether statements currently run inside a transaction
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// The SELECT this builder would run
    pub fn to_select(&self) -> Result<Statement> {
        self.spec.to_select()
    }

    pub fn to_insert<R: IntoRecord>(&self, data: R) -> Result<Statement> {
        self.spec.to_insert(&data.into_record())
    }

    pub fn to_update<R: IntoRecord>(&self, data: R) -> Result<Statement> {
        self.spec.to_update(&data.into_record())
    }

    pub fn to_delete(&self) -> Result<Statement> {
        self.spec.to_delete()
    }

    /// The SELECT with parameters inlined, for logging only
    pub fn to_debug_sql(&self) -> Result<String> {
        Ok(self.spec.to_select()?.to_debug_sql())
    }

    /// Run the SELECT and return the raw rows
    pub async fn fetch(&self) -> Result<RowSet> {
        let statement = self.spec.to_select()?;
        self.run_fetch(&statement).await
    }

    /// First row, or `None` when nothing matches. Adds `LIMIT 1`.
    pub async fn fetch_one(&self) -> Result<Option<Row>> {
        let statement = self.spec.to_first()?;
        let rows = self.run_fetch(&statement).await?;
        Ok(rows.into_records().into_iter().next())
    }

    /// Every row as a column-name map
    pub async fn to_list(&self) -> Result<Vec<Row>> {
        Ok(self.fetch().await?.into_records())
    }

    /// Every row deserialized into `T` through its JSON form
    pub async fn to_list_as<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.to_list()
            .await?
            .into_iter()
            .map(|row| -> Result<T> {
                let object: serde_json::Map<String, serde_json::Value> =
                    row.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                Ok(serde_json::from_value(serde_json::Value::Object(object))?)
            })
            .collect()
    }

    /// Number of matching rows. The projection is not changed.
    pub async fn count(&self) -> Result<i64> {
        let statement = self.spec.to_count()?;
        let rows = self.run_fetch(&statement).await?;
        match rows.first_value() {
            None | Some(Value::Null) => Ok(0),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| Error::decode(format!("COUNT returned {}", value.type_name()))),
        }
    }

    /// SUM of `column`; 0 when no row matches
    pub async fn sum(&self, column: &str) -> Result<f64> {
        self.float_aggregate(AggregateFunction::Sum, column).await
    }

    /// AVG of `column`; 0 when no row matches
    pub async fn avg(&self, column: &str) -> Result<f64> {
        self.float_aggregate(AggregateFunction::Avg, column).await
    }

    /// MIN of `column` as returned by the database
    pub async fn min(&self, column: &str) -> Result<Value> {
        self.raw_aggregate(AggregateFunction::Min, column).await
    }

    /// MAX of `column` as returned by the database
    pub async fn max(&self, column: &str) -> Result<Value> {
        self.raw_aggregate(AggregateFunction::Max, column).await
    }

    async fn float_aggregate(&self, function: AggregateFunction, column: &str) -> Result<f64> {
        match self.raw_aggregate(function, column).await? {
            Value::Null => Ok(0.0),
            value => value.as_f64().ok_or_else(|| {
                Error::decode(format!("{}({}) returned {}", function, column, value.type_name()))
            }),
        }
    }

    async fn raw_aggregate(&self, function: AggregateFunction, column: &str) -> Result<Value> {
        let statement = self.spec.to_aggregate(function, column)?;
        let rows = self.run_fetch(&statement).await?;
        Ok(rows.first_value().cloned().unwrap_or(Value::Null))
    }

    /// Insert one row
    pub async fn insert<R: IntoRecord>(&self, data: R) -> Result<ExecResult> {
        let statement = self.spec.to_insert(&data.into_record())?;
        self.run_execute(&statement).await
    }

    /// Insert many rows with one statement. No statement is issued for an
    /// empty input.
    pub async fn insert_many<I, R>(&self, rows: I) -> Result<ExecResult>
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        let rows: Vec<Record> = rows.into_iter().map(IntoRecord::into_record).collect();
        match self.spec.to_bulk_insert(&rows)? {
            Some(statement) => self.run_execute(&statement).await,
            None => {
                debug!(table = %self.spec.table_name(), "skipping bulk insert with no rows");
                Ok(ExecResult::default())
            }
        }
    }

    /// Update matching rows. Without predicates the whole table is updated.
    pub async fn update<R: IntoRecord>(&self, data: R) -> Result<ExecResult> {
        let statement = self.spec.to_update(&data.into_record())?;
        self.run_execute(&statement).await
    }

    /// Write per-row values to many rows identified by `key_column`, with
    /// one statement
    pub async fn update_many<I, R>(&self, rows: I, key_column: &str) -> Result<ExecResult>
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        let rows: Vec<Record> = rows.into_iter().map(IntoRecord::into_record).collect();
        match self.spec.to_bulk_update(&rows, key_column)? {
            Some(statement) => self.run_execute(&statement).await,
            None => {
                debug!(table = %self.spec.table_name(), "skipping bulk update with no rows");
                Ok(ExecResult::default())
            }
        }
    }

    /// Delete matching rows. Without predicates the whole table is cleared.
    pub async fn delete(&self) -> Result<ExecResult> {
        let statement = self.spec.to_delete()?;
        self.run_execute(&statement).await
    }

    /// Insert a row, or update its non-key columns when `conflict_columns`
    /// collide with an existing row
    pub async fn upsert<R, K>(&self, data: R, conflict_columns: K) -> Result<ExecResult>
    where
        R: IntoRecord,
        K: IntoColumns,
    {
        let conflict_columns = conflict_columns.into_columns();
        let statement = self.spec.to_upsert(
            &data.into_record(),
            &conflict_columns,
            self.upsert_strategy.as_ref(),
        )?;
        self.run_execute(&statement).await
    }

    async fn run_fetch(&self, statement: &Statement) -> Result<RowSet> {
        debug!(
            sql = statement.sql(),
            params = statement.parameters().len(),
            in_transaction = self.in_transaction(),
            "fetch"
        );
        match &self.transaction {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let tx = guard.as_mut().ok_or_else(finished_transaction)?;
                tx.fetch_rows(statement.sql(), statement.parameters()).await
            }
            None => {
                self.pool
                    .fetch_rows(statement.sql(), statement.parameters())
                    .await
            }
        }
    }

    async fn run_execute(&self, statement: &Statement) -> Result<ExecResult> {
        debug!(
            sql = statement.sql(),
            params = statement.parameters().len(),
            in_transaction = self.in_transaction(),
            "execute"
        );
        match &self.transaction {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let tx = guard.as_mut().ok_or_else(finished_transaction)?;
                tx.execute(statement.sql(), statement.parameters()).await
            }
            None => {
                self.pool
                    .execute(statement.sql(), statement.parameters())
                    .await
            }
        }
    }
}

pub(crate) fn finished_transaction() -> Error {
    Error::transaction_state("transaction already finished")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::executor::mock::MockPool;
    use crate::operator::op;
    use crate::unchecked;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i64,
        name: String,
        email: Option<String>,
    }

    #[tokio::test]
    async fn test_fetch_sends_composed_statement() {
        let pool = MockPool::new();
        pool.push_rows(&["a", "b"], vec![vec![Value::Int(1), Value::from("x")]]);

        let rows = QueryBuilder::new(&pool)
            .table("t")
            .select(("a", "b"))
            .where_(("x", op::GT, 5))
            .order_by("a", "asc")
            .limit(10)
            .fetch()
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let calls = pool.calls();
        assert_eq!(
            calls[0].sql,
            "SELECT a, b FROM t WHERE x > ? ORDER BY a ASC LIMIT ?"
        );
        assert_eq!(calls[0].params, vec![Value::Int(5), Value::Int(10)]);
        assert!(!calls[0].in_transaction);
    }

    #[tokio::test]
    async fn test_builder_reuse_and_clone() {
        let pool = MockPool::new();
        let base = QueryBuilder::new(&pool)
            .table("users")
            .where_(("active", true));
        let admins = base.clone().where_(("role", "admin"));

        base.fetch().await.unwrap();
        admins.fetch().await.unwrap();
        base.fetch().await.unwrap();

        assert_eq!(
            pool.statements(),
            vec![
                "SELECT * FROM users WHERE active = ?",
                "SELECT * FROM users WHERE active = ? AND role = ?",
                "SELECT * FROM users WHERE active = ?",
            ]
        );
    }

    #[tokio::test]
    async fn test_count_does_not_touch_projection() {
        let pool = MockPool::new();
        pool.push_rows(&["count"], vec![vec![Value::Int(42)]]);

        let query = QueryBuilder::new(&pool)
            .table("users")
            .select(("id", "name"))
            .where_(("age", op::GTE, 21));

        assert_eq!(query.count().await.unwrap(), 42);
        query.fetch().await.unwrap();

        assert_eq!(
            pool.statements(),
            vec![
                "SELECT COUNT(*) AS count FROM users WHERE age >= ?",
                "SELECT id, name FROM users WHERE age >= ?",
            ]
        );
        assert_eq!(query.spec().columns(), &["id", "name"]);
    }

    #[tokio::test]
    async fn test_count_without_rows_is_zero() {
        let pool = MockPool::new();
        assert_eq!(QueryBuilder::new(&pool).table("users").count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_aggregates() {
        let pool = MockPool::new();
        pool.push_rows(&["sum"], vec![vec![Value::Int(30)]]);
        pool.push_rows(&["avg"], vec![vec![Value::Null]]);
        pool.push_rows(&["min"], vec![vec![Value::from("2024-01-01")]]);

        let query = QueryBuilder::new(&pool).table("orders");
        assert_eq!(query.sum("total").await.unwrap(), 30.0);
        assert_eq!(query.avg("total").await.unwrap(), 0.0);
        assert_eq!(query.min("created").await.unwrap(), Value::from("2024-01-01"));
        assert_eq!(query.max("created").await.unwrap(), Value::Null);

        assert_eq!(
            pool.statements(),
            vec![
                "SELECT SUM(total) AS sum FROM orders",
                "SELECT AVG(total) AS avg FROM orders",
                "SELECT MIN(created) AS min FROM orders",
                "SELECT MAX(created) AS max FROM orders",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_one() {
        let pool = MockPool::new();
        pool.push_rows(&["id", "name"], vec![vec![Value::Int(9), Value::from("Ann")]]);

        let query = QueryBuilder::new(&pool).table("users").order_by_desc("id");
        let row = query.fetch_one().await.unwrap().unwrap();
        assert_eq!(row["name"], Value::from("Ann"));
        assert!(query.fetch_one().await.unwrap().is_none());

        let calls = pool.calls();
        assert_eq!(calls[0].sql, "SELECT * FROM users ORDER BY id DESC LIMIT ?");
        assert_eq!(calls[0].params, vec![Value::Int(1)]);
        assert_eq!(query.spec().limit_value(), 0);
    }

    #[tokio::test]
    async fn test_to_list_and_to_list_as() {
        let pool = MockPool::new();
        let rows = vec![
            vec![Value::Int(1), Value::from("Ann"), Value::from("ann@x.io")],
            vec![Value::Int(2), Value::from("Bob"), Value::Null],
        ];
        pool.push_rows(&["id", "name", "email"], rows.clone());
        pool.push_rows(&["id", "name", "email"], rows);

        let query = QueryBuilder::new(&pool).table("users");
        let list = query.to_list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1]["email"], Value::Null);

        let users: Vec<User> = query.to_list_as().await.unwrap();
        assert_eq!(
            users,
            vec![
                User {
                    id: 1,
                    name: "Ann".into(),
                    email: Some("ann@x.io".into()),
                },
                User {
                    id: 2,
                    name: "Bob".into(),
                    email: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_to_list_as_reads_timestamps() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Event {
            id: i64,
            at: chrono::NaiveDateTime,
        }

        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        let pool = MockPool::new();
        pool.push_rows(&["id", "at"], vec![vec![Value::Int(1), Value::Timestamp(at)]]);

        let events: Vec<Event> = QueryBuilder::new(&pool)
            .table("events")
            .to_list_as()
            .await
            .unwrap();
        assert_eq!(events, vec![Event { id: 1, at }]);
    }

    #[tokio::test]
    async fn test_empty_result_lists() {
        let pool = MockPool::new();
        let query = QueryBuilder::new(&pool).table("users");
        assert!(query.to_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paginate_uses_configured_page_size() {
        let pool = MockPool::new();
        let config = QueryConfig::new().default_page_size(25);

        QueryBuilder::with_config(&pool, &config)
            .table("users")
            .paginate(2, 0)
            .fetch()
            .await
            .unwrap();

        let calls = pool.calls();
        assert_eq!(calls[0].sql, "SELECT * FROM users LIMIT ? OFFSET ?");
        assert_eq!(calls[0].params, vec![Value::Int(25), Value::Int(25)]);
    }

    #[tokio::test]
    async fn test_writes() {
        let pool = MockPool::new();
        let users = QueryBuilder::new(&pool).table("users");

        let result = users
            .insert([("name", Value::from("Ann")), ("age", Value::from(30))])
            .await
            .unwrap();
        assert_eq!(result.last_insert_id, Some(1));

        users
            .clone()
            .where_(("id", 1))
            .update([("age", 31)])
            .await
            .unwrap();
        users.clone().where_in("id", [1, 2]).delete().await.unwrap();

        let calls = pool.calls();
        assert_eq!(calls[0].sql, "INSERT INTO users (name, age) VALUES (?, ?)");
        assert_eq!(calls[1].sql, "UPDATE users SET age = ? WHERE id = ?");
        assert_eq!(calls[1].params, vec![Value::Int(31), Value::Int(1)]);
        assert_eq!(calls[2].sql, "DELETE FROM users WHERE id IN (?,?)");
    }

    #[tokio::test]
    async fn test_insert_many_empty_issues_nothing() {
        let pool = MockPool::new();
        let result = QueryBuilder::new(&pool)
            .table("users")
            .insert_many(Vec::<Record>::new())
            .await
            .unwrap();
        assert_eq!(result, ExecResult::default());
        assert!(pool.calls().is_empty());
    }

    #[tokio::test]
    async fn test_insert_many_and_update_many() {
        let pool = MockPool::new();
        let employees = QueryBuilder::new(&pool).table("employees");

        employees
            .insert_many(vec![
                [("id", 1), ("salary", 90)],
                [("id", 2), ("salary", 180)],
            ])
            .await
            .unwrap();
        employees
            .update_many(
                vec![[("id", 1), ("salary", 100)], [("id", 2), ("salary", 200)]],
                "id",
            )
            .await
            .unwrap();

        let calls = pool.calls();
        assert_eq!(
            calls[0].sql,
            "INSERT INTO employees (id, salary) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(
            calls[1].sql,
            "UPDATE employees SET salary = CASE id WHEN ? THEN ? WHEN ? THEN ? ELSE salary END WHERE id IN (?,?)"
        );
        let expected: Vec<Value> = [1, 100, 2, 200, 1, 2].into_iter().map(Value::from).collect();
        assert_eq!(calls[1].params, expected);
    }

    #[tokio::test]
    async fn test_upsert_follows_dialect() {
        let pool = MockPool::new();
        let config = QueryConfig::new().dialect(Dialect::MySql);

        QueryBuilder::with_config(&pool, &config)
            .table("users")
            .upsert([("email", "a@x.io"), ("name", "Ann")], "email")
            .await
            .unwrap();

        assert_eq!(
            pool.statements(),
            vec!["INSERT INTO users (email, name) VALUES (?, ?) ON DUPLICATE KEY UPDATE name = VALUES(name)"]
        );
    }

    #[tokio::test]
    async fn test_custom_upsert_strategy() {
        #[derive(Debug)]
        struct IgnoreConflicts;

        impl UpsertStrategy for IgnoreConflicts {
            fn conflict_clause(&self, _conflict: &[String], _update: &[String]) -> Result<String> {
                Ok("ON CONFLICT DO NOTHING".to_string())
            }
        }

        let pool = MockPool::new();
        QueryBuilder::new(&pool)
            .table("tags")
            .upsert_strategy(IgnoreConflicts)
            .upsert([("name", "rust")], "name")
            .await
            .unwrap();

        assert_eq!(
            pool.statements(),
            vec!["INSERT INTO tags (name) VALUES (?) ON CONFLICT DO NOTHING"]
        );
    }

    #[tokio::test]
    async fn test_composition_errors_issue_nothing() {
        let pool = MockPool::new();
        let err = QueryBuilder::new(&pool).fetch().await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));

        let err = QueryBuilder::new(&pool)
            .table("users")
            .update(Record::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert!(pool.calls().is_empty());
    }

    #[tokio::test]
    async fn test_execution_errors_propagate() {
        let pool = MockPool::new();
        pool.fail_next("disk I/O error");

        let err = QueryBuilder::new(&pool)
            .table("users")
            .delete()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Execution error: disk I/O error");
    }

    #[test]
    fn test_debug_sql() {
        let pool = MockPool::new();
        let rendered = QueryBuilder::new(&pool)
            .table("users")
            .inner_join("teams", unchecked("teams.id = users.team_id"))
            .where_(("name", "O'Brien"))
            .limit(5)
            .to_debug_sql()
            .unwrap();
        assert_eq!(
            rendered,
            "SELECT * FROM users INNER JOIN teams ON teams.id = users.team_id WHERE name = 'O''Brien' LIMIT 5"
        );
        assert!(pool.calls().is_empty());
    }
}
