//! Common types and traits shared across all statement kinds

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;

use crate::{IntoOperator, Operator, Value};

/// Column values for one written row, in the order they are rendered
pub type Record = IndexMap<String, Value>;

/// Trait for conditions that can be used in WHERE and HAVING clauses
pub trait IntoCondition {
    fn into_condition(self) -> (String, Operator, Value);
}

// Implementation for shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0.to_string(), Operator::EQ, self.1.into())
    }
}

// Implementation for explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0.to_string(), self.1.into_operator(), self.2.into())
    }
}

/// How a condition joins the clause built before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereConnector {
    And,
    Or,
}

impl fmt::Display for WhereConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereConnector::And => write!(f, "AND"),
            WhereConnector::Or => write!(f, "OR"),
        }
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Nothing to bind (`IS NULL`, `IS NOT NULL`)
    None,
    /// One value bound to one `?`
    Value(Value),
    /// One value per placeholder embedded in a membership operator
    List(Vec<Value>),
}

/// A WHERE or HAVING predicate
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub operator: Operator,
    pub operand: Operand,
    pub connector: WhereConnector,
}

impl WhereCondition {
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: Value,
        connector: WhereConnector,
    ) -> Self {
        let operand = if operator.is_null_check() {
            Operand::None
        } else {
            Operand::Value(value)
        };
        Self {
            column: column.into(),
            operator,
            operand,
            connector,
        }
    }

    /// `column IN (?,...)`, or `NOT IN` when `negated`
    pub fn membership(
        column: impl Into<String>,
        values: Vec<Value>,
        negated: bool,
        connector: WhereConnector,
    ) -> Self {
        let operator = if negated {
            Operator::not_in_list(values.len())
        } else {
            Operator::in_list(values.len())
        };
        Self {
            column: column.into(),
            operator,
            operand: Operand::List(values),
            connector,
        }
    }

    pub fn null_check(column: impl Into<String>, not_null: bool, connector: WhereConnector) -> Self {
        let operator = if not_null {
            Operator::IS_NOT_NULL
        } else {
            Operator::IS_NULL
        };
        Self {
            column: column.into(),
            operator,
            operand: Operand::None,
            connector,
        }
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
        }
    }
}

/// A raw SQL fragment written into the statement exactly as given.
///
/// Nothing inside it is parameterized or escaped. Only build one from text
/// the application controls, never from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncheckedSql(String);

impl UncheckedSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UncheckedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A JOIN clause; the ON condition is caller-trusted raw SQL
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub on: UncheckedSql,
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse; anything other than `desc` sorts ascending
    pub fn parse_lenient(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl From<&str> for SortDirection {
    fn from(direction: &str) -> Self {
        Self::parse_lenient(direction)
    }
}

impl From<String> for SortDirection {
    fn from(direction: String) -> Self {
        Self::parse_lenient(&direction)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// An ORDER BY term
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub column: String,
    pub direction: SortDirection,
}

/// Trait to convert various types into columns
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

// For tuples
impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
        ]
    }
}

/// Trait for types that can be written as one row.
///
/// Unordered maps are rendered with their keys sorted so the same data always
/// produces the same statement.
pub trait IntoRecord {
    fn into_record(self) -> Record;
}

impl IntoRecord for Record {
    fn into_record(self) -> Record {
        self
    }
}

impl IntoRecord for BTreeMap<String, Value> {
    fn into_record(self) -> Record {
        self.into_iter().collect()
    }
}

impl IntoRecord for HashMap<String, Value> {
    fn into_record(self) -> Record {
        let mut entries: Vec<(String, Value)> = self.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().collect()
    }
}

impl<V> IntoRecord for Vec<(&str, V)>
where
    V: Into<Value>,
{
    fn into_record(self) -> Record {
        self.into_iter()
            .map(|(column, value)| (column.to_string(), value.into()))
            .collect()
    }
}

impl<V, const N: usize> IntoRecord for [(&str, V); N]
where
    V: Into<Value>,
{
    fn into_record(self) -> Record {
        self.into_iter()
            .map(|(column, value)| (column.to_string(), value.into()))
            .collect()
    }
}
