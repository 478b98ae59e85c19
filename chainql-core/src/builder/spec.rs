//! Query state shared by every statement kind

use tracing::warn;

use super::common::{
    IntoColumns, IntoCondition, JoinClause, JoinType, OrderByClause, SortDirection, UncheckedSql,
    WhereCondition, WhereConnector,
};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::{Error, Result, Value};

/// Table, projection, predicates, joins, grouping, ordering and paging of a
/// pending query.
///
/// Every method consumes and returns the `QuerySpec`, so a configuration can be
/// branched with `clone()` and each branch mutated independently.
///
/// # Examples
/// ```
/// use chainql_core::{op, QuerySpec, Value};
///
/// let statement = QuerySpec::new("t")
///     .select(("a", "b"))
///     .where_(("x", op::GT, 5))
///     .order_by("a", "asc")
///     .limit(10)
///     .to_select()
///     .unwrap();
///
/// assert_eq!(statement.sql(), "SELECT a, b FROM t WHERE x > ? ORDER BY a ASC LIMIT ?");
/// assert_eq!(statement.parameters(), &[Value::Int(5), Value::Int(10)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub(crate) table_name: String,
    pub(crate) selected_columns: Vec<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) join_clauses: Vec<JoinClause>,
    pub(crate) order_by_clauses: Vec<OrderByClause>,
    pub(crate) group_by_columns: Vec<String>,
    pub(crate) having_conditions: Vec<WhereCondition>,
    pub(crate) limit_value: u64,
    pub(crate) offset_value: u64,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            selected_columns: vec!["*".to_string()],
            where_conditions: Vec::new(),
            join_clauses: Vec::new(),
            order_by_clauses: Vec::new(),
            group_by_columns: Vec::new(),
            having_conditions: Vec::new(),
            limit_value: 0,
            offset_value: 0,
        }
    }
}

impl QuerySpec {
    /// Create a spec targeting `table`
    pub fn new(table: &str) -> Self {
        Self::default().table(table)
    }

    /// Set the target table
    pub fn table(mut self, table: &str) -> Self {
        self.table_name = table.to_string();
        self
    }

    /// Replace the projection; an empty list selects all columns
    pub fn select<T>(mut self, columns: T) -> Self
    where
        T: IntoColumns,
    {
        let columns = columns.into_columns();
        self.selected_columns = if columns.is_empty() {
            vec!["*".to_string()]
        } else {
            columns
        };
        self
    }

    /// Select all columns (equivalent to SELECT *)
    pub fn select_all(mut self) -> Self {
        self.selected_columns = vec!["*".to_string()];
        self
    }

    /// Add a WHERE condition
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.where_conditions
            .push(WhereCondition::new(column, operator, value, WhereConnector::And));
        self
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    /// Add an OR WHERE condition
    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.where_conditions
            .push(WhereCondition::new(column, operator, value, WhereConnector::Or));
        self
    }

    /// Add `column IN (?,...)`. An empty list adds no condition at all.
    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_membership(column, values, false)
    }

    /// Add `column NOT IN (?,...)`. An empty list adds no condition at all.
    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_membership(column, values, true)
    }

    fn push_membership<I, V>(mut self, column: &str, values: I, negated: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            warn!(column, negated, "ignoring membership filter with no values");
            return self;
        }
        self.where_conditions.push(WhereCondition::membership(
            column,
            values,
            negated,
            WhereConnector::And,
        ));
        self
    }

    /// Add `column IS NULL`
    pub fn where_null(mut self, column: &str) -> Self {
        self.where_conditions
            .push(WhereCondition::null_check(column, false, WhereConnector::And));
        self
    }

    /// Add `column IS NOT NULL`
    pub fn where_not_null(mut self, column: &str) -> Self {
        self.where_conditions
            .push(WhereCondition::null_check(column, true, WhereConnector::And));
        self
    }

    /// Add a join; `on` is written into the statement verbatim
    pub fn join(mut self, join_type: JoinType, table: &str, on: UncheckedSql) -> Self {
        self.join_clauses.push(JoinClause {
            join_type,
            table: table.to_string(),
            on,
        });
        self
    }

    /// Add a LEFT JOIN clause
    pub fn left_join(self, table: &str, on: UncheckedSql) -> Self {
        self.join(JoinType::Left, table, on)
    }

    /// Add a RIGHT JOIN clause
    pub fn right_join(self, table: &str, on: UncheckedSql) -> Self {
        self.join(JoinType::Right, table, on)
    }

    /// Add an INNER JOIN clause
    pub fn inner_join(self, table: &str, on: UncheckedSql) -> Self {
        self.join(JoinType::Inner, table, on)
    }

    /// Add an ORDER BY term. String directions other than `desc` sort ascending.
    pub fn order_by<D>(mut self, column: &str, direction: D) -> Self
    where
        D: Into<SortDirection>,
    {
        self.order_by_clauses.push(OrderByClause {
            column: column.to_string(),
            direction: direction.into(),
        });
        self
    }

    /// Add an ORDER BY ASC clause (convenience method)
    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    /// Add an ORDER BY DESC clause (convenience method)
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    /// Append GROUP BY columns
    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.group_by_columns.extend(columns.into_columns());
        self
    }

    /// Add a HAVING condition
    pub fn having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.having_conditions
            .push(WhereCondition::new(column, operator, value, WhereConnector::And));
        self
    }

    /// Set the LIMIT; zero removes it
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_value = limit;
        self
    }

    /// Set the OFFSET; zero removes it
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_value = offset;
        self
    }

    /// Page-based LIMIT/OFFSET. `page < 1` means the first page and
    /// `per_page < 1` means the default page size.
    pub fn paginate(self, page: i64, per_page: i64) -> Self {
        self.paginate_or(page, per_page, DEFAULT_PAGE_SIZE)
    }

    pub(crate) fn paginate_or(mut self, page: i64, per_page: i64, fallback: u64) -> Self {
        let page = if page < 1 { 1 } else { page as u64 };
        let per_page = if per_page < 1 { fallback } else { per_page as u64 };

        self.limit_value = per_page;
        self.offset_value = (page - 1).saturating_mul(per_page);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[String] {
        &self.selected_columns
    }

    pub fn conditions(&self) -> &[WhereCondition] {
        &self.where_conditions
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.join_clauses
    }

    pub fn ordering(&self) -> &[OrderByClause] {
        &self.order_by_clauses
    }

    pub fn grouping(&self) -> &[String] {
        &self.group_by_columns
    }

    pub fn having_conditions(&self) -> &[WhereCondition] {
        &self.having_conditions
    }

    pub fn limit_value(&self) -> u64 {
        self.limit_value
    }

    pub fn offset_value(&self) -> u64 {
        self.offset_value
    }

    pub(crate) fn require_table(&self, statement: &str) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(Error::invalid_query(format!(
                "{} requires a table; call .table() first",
                statement
            )));
        }
        Ok(())
    }
}

pub(crate) fn bound_integer(value: u64) -> Value {
    Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
}
