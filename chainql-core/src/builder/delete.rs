//! DELETE statement composition

use super::clause::serialize_conditions;
use super::spec::QuerySpec;
use super::statement::Statement;
use crate::Result;

impl QuerySpec {
    /// `DELETE FROM t [WHERE ...]`. Without predicates every row is deleted.
    pub fn to_delete(&self) -> Result<Statement> {
        self.require_table("DELETE")?;

        let mut sql = format!("DELETE FROM {}", self.table_name);
        let mut params = Vec::new();

        if !self.where_conditions.is_empty() {
            let (clause, args) = serialize_conditions(&self.where_conditions)?;
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params = args;
        }

        Ok(Statement::new(sql, params))
    }
}
