//! SELECT statement composition

use std::fmt;

use super::clause::serialize_conditions;
use super::spec::{bound_integer, QuerySpec};
use super::statement::Statement;
use crate::Result;

/// Aggregate functions with a single-row, single-column result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    /// Alias of the result column
    pub fn alias(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFunction::Count => write!(f, "COUNT"),
            AggregateFunction::Sum => write!(f, "SUM"),
            AggregateFunction::Avg => write!(f, "AVG"),
            AggregateFunction::Min => write!(f, "MIN"),
            AggregateFunction::Max => write!(f, "MAX"),
        }
    }
}

impl QuerySpec {
    /// Compose the SELECT statement.
    ///
    /// Clauses appear as JOIN, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT,
    /// OFFSET. Parameters follow the same order: WHERE values, HAVING
    /// values, then limit and offset.
    pub fn to_select(&self) -> Result<Statement> {
        self.compose_select(&self.selected_columns.join(", "))
    }

    /// `SELECT COUNT(*) AS count` over the same filters. The projection of
    /// `self` is left untouched.
    pub fn to_count(&self) -> Result<Statement> {
        self.compose_select("COUNT(*) AS count")
    }

    /// `SELECT FUNC(column) AS func` over the same filters
    pub fn to_aggregate(&self, function: AggregateFunction, column: &str) -> Result<Statement> {
        let projection = match function {
            AggregateFunction::Count if column == "*" || column.is_empty() => {
                return self.to_count();
            }
            _ => format!("{}({}) AS {}", function, column, function.alias()),
        };
        self.compose_select(&projection)
    }

    /// The SELECT statement restricted to a single row
    pub fn to_first(&self) -> Result<Statement> {
        self.clone().limit(1).to_select()
    }

    fn compose_select(&self, projection: &str) -> Result<Statement> {
        self.require_table("SELECT")?;

        let mut sql = String::new();
        let mut params = Vec::new();

        sql.push_str("SELECT ");
        if projection.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(projection);
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.table_name);

        for join in &self.join_clauses {
            sql.push(' ');
            sql.push_str(&join.join_type.to_string());
            sql.push_str(" JOIN ");
            sql.push_str(&join.table);
            sql.push_str(" ON ");
            sql.push_str(join.on.as_str());
        }

        if !self.where_conditions.is_empty() {
            let (clause, args) = serialize_conditions(&self.where_conditions)?;
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params.extend(args);
        }

        if !self.group_by_columns.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by_columns.join(", "));
        }

        if !self.having_conditions.is_empty() {
            let (clause, args) = serialize_conditions(&self.having_conditions)?;
            sql.push_str(" HAVING ");
            sql.push_str(&clause);
            params.extend(args);
        }

        if !self.order_by_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            let order_parts: Vec<String> = self
                .order_by_clauses
                .iter()
                .map(|clause| format!("{} {}", clause.column, clause.direction))
                .collect();
            sql.push_str(&order_parts.join(", "));
        }

        if self.limit_value > 0 {
            sql.push_str(" LIMIT ?");
            params.push(bound_integer(self.limit_value));
        }

        if self.offset_value > 0 {
            sql.push_str(" OFFSET ?");
            params.push(bound_integer(self.offset_value));
        }

        Ok(Statement::new(sql, params))
    }
}
