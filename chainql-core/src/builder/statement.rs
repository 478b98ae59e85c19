//! Composed statements

use std::fmt;

use crate::debug::render_debug_sql;
use crate::Value;

/// SQL text plus the parameters for its `?` placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    parameters: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, parameters: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    /// Generated SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.parameters)
    }

    /// SQL with parameters inlined, for logging only
    pub fn to_debug_sql(&self) -> String {
        render_debug_sql(&self.sql, &self.parameters)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
