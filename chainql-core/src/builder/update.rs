//! UPDATE statement composition

use indexmap::IndexSet;

use super::clause::serialize_conditions;
use super::common::Record;
use super::spec::QuerySpec;
use super::statement::Statement;
use crate::operator::Operator;
use crate::{Error, Result, Value};

impl QuerySpec {
    /// `UPDATE t SET a = ?, b = ? [WHERE ...]`.
    ///
    /// Without predicates every row of the table is updated.
    pub fn to_update(&self, record: &Record) -> Result<Statement> {
        self.require_table("UPDATE")?;

        if record.is_empty() {
            return Err(Error::invalid_query("UPDATE requires SET clauses"));
        }

        let mut sql = String::new();
        let mut params: Vec<Value> = record.values().cloned().collect();

        sql.push_str("UPDATE ");
        sql.push_str(&self.table_name);

        sql.push_str(" SET ");
        let set_parts: Vec<String> = record
            .keys()
            .map(|column| format!("{} = ?", column))
            .collect();
        sql.push_str(&set_parts.join(", "));

        if !self.where_conditions.is_empty() {
            let (clause, args) = serialize_conditions(&self.where_conditions)?;
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params.extend(args);
        }

        Ok(Statement::new(sql, params))
    }

    /// One UPDATE writing different values to many rows identified by
    /// `key_column`:
    ///
    /// ```text
    /// UPDATE t SET a = CASE id WHEN ? THEN ? ... ELSE a END, ... WHERE id IN (?,?)
    /// ```
    ///
    /// Rows that do not set a column keep their value through the `ELSE`
    /// branch. Key values are bound after all SET values, in row order.
    /// Predicates configured on this `QuerySpec` are not applied. An empty slice
    /// yields `None`.
    pub fn to_bulk_update(&self, rows: &[Record], key_column: &str) -> Result<Option<Statement>> {
        if rows.is_empty() {
            return Ok(None);
        }

        self.require_table("UPDATE")?;

        let keys = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                row.get(key_column)
                    .cloned()
                    .ok_or_else(|| Error::missing_column(&self.table_name, key_column, index))
            })
            .collect::<Result<Vec<Value>>>()?;

        let columns: IndexSet<&str> = rows
            .iter()
            .flat_map(|row| row.keys())
            .map(String::as_str)
            .filter(|column| *column != key_column)
            .collect();

        if columns.is_empty() {
            return Err(Error::invalid_query(format!(
                "bulk UPDATE of '{}' has no columns to set besides '{}'",
                self.table_name, key_column
            )));
        }

        let mut params = Vec::new();
        let mut set_parts = Vec::with_capacity(columns.len());

        for column in &columns {
            let mut part = format!("{} = CASE {}", column, key_column);
            for (row, key) in rows.iter().zip(&keys) {
                if let Some(value) = row.get(*column) {
                    part.push_str(" WHEN ? THEN ?");
                    params.push(key.clone());
                    params.push(value.clone());
                }
            }
            part.push_str(&format!(" ELSE {} END", column));
            set_parts.push(part);
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {} {}",
            self.table_name,
            set_parts.join(", "),
            key_column,
            Operator::in_list(keys.len())
        );
        params.extend(keys);

        Ok(Some(Statement::new(sql, params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::common::IntoRecord;
    use crate::operator::op;
    use pretty_assertions::assert_eq;

    fn employees() -> QuerySpec {
        QuerySpec::new("employees")
    }

    #[test]
    fn test_update_with_where() {
        let record = [("name", Value::from("Jane")), ("age", Value::from(25))].into_record();
        let statement = employees()
            .where_(("id", 7))
            .or_where(("email", op::LIKE, "%@old.io"))
            .to_update(&record)
            .unwrap();
        assert_eq!(
            statement.sql(),
            "UPDATE employees SET name = ?, age = ? WHERE id = ? OR email LIKE ?"
        );
        assert_eq!(
            statement.parameters(),
            &[
                Value::from("Jane"),
                Value::Int(25),
                Value::Int(7),
                Value::from("%@old.io"),
            ]
        );
    }

    #[test]
    fn test_update_whole_table() {
        let record = [("active", false)].into_record();
        let statement = employees().to_update(&record).unwrap();
        assert_eq!(statement.sql(), "UPDATE employees SET active = ?");
    }

    #[test]
    fn test_update_requires_set_clauses() {
        let err = employees().to_update(&Record::new()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid query: UPDATE requires SET clauses");
    }

    #[test]
    fn test_bulk_update_single_column() {
        let rows = vec![
            [("id", 1), ("salary", 100)].into_record(),
            [("id", 2), ("salary", 200)].into_record(),
        ];
        let statement = employees().to_bulk_update(&rows, "id").unwrap().unwrap();
        assert_eq!(
            statement.sql(),
            "UPDATE employees SET salary = CASE id WHEN ? THEN ? WHEN ? THEN ? ELSE salary END \
             WHERE id IN (?,?)"
        );
        let expected: Vec<Value> = [1, 100, 2, 200, 1, 2].into_iter().map(Value::from).collect();
        assert_eq!(statement.parameters(), expected.as_slice());
    }

    #[test]
    fn test_bulk_update_sparse_columns() {
        let rows = vec![
            [("id", Value::from(1)), ("salary", Value::from(100))].into_record(),
            [("id", Value::from(2)), ("title", Value::from("lead"))].into_record(),
            [
                ("id", Value::from(3)),
                ("salary", Value::from(300)),
                ("title", Value::from("cto")),
            ]
            .into_record(),
        ];
        let statement = employees().to_bulk_update(&rows, "id").unwrap().unwrap();
        assert_eq!(
            statement.sql(),
            "UPDATE employees SET \
             salary = CASE id WHEN ? THEN ? WHEN ? THEN ? ELSE salary END, \
             title = CASE id WHEN ? THEN ? WHEN ? THEN ? ELSE title END \
             WHERE id IN (?,?,?)"
        );
        assert_eq!(
            statement.parameters(),
            &[
                Value::Int(1),
                Value::Int(100),
                Value::Int(3),
                Value::Int(300),
                Value::Int(2),
                Value::from("lead"),
                Value::Int(3),
                Value::from("cto"),
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
            ]
        );
        assert_eq!(
            statement.sql().matches('?').count(),
            statement.parameters().len()
        );
    }

    #[test]
    fn test_bulk_update_ignores_where_filters() {
        let rows = vec![[("id", 1), ("salary", 100)].into_record()];
        let statement = employees()
            .where_(("dept", 4))
            .to_bulk_update(&rows, "id")
            .unwrap()
            .unwrap();
        assert!(statement.sql().ends_with("WHERE id IN (?)"));
        assert_eq!(statement.parameters().len(), 3);
    }

    #[test]
    fn test_bulk_update_missing_key() {
        let rows = vec![
            [("id", 1), ("salary", 100)].into_record(),
            [("salary", 200)].into_record(),
        ];
        let err = employees().to_bulk_update(&rows, "id").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { row: 1, .. }));
    }

    #[test]
    fn test_bulk_update_without_columns() {
        let rows = vec![[("id", 1)].into_record()];
        let err = employees().to_bulk_update(&rows, "id").unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_bulk_update_empty_is_none() {
        assert!(employees().to_bulk_update(&[], "id").unwrap().is_none());
    }
}
