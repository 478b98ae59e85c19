//! INSERT statement composition

use super::common::Record;
use super::spec::QuerySpec;
use super::statement::Statement;
use crate::dialect::UpsertStrategy;
use crate::{Error, Result};

impl QuerySpec {
    /// `INSERT INTO t (a, b) VALUES (?, ?)` with the record's values in
    /// column order
    pub fn to_insert(&self, record: &Record) -> Result<Statement> {
        self.require_table("INSERT")?;

        if record.is_empty() {
            return Err(Error::invalid_query("INSERT requires columns and values"));
        }

        let columns: Vec<&str> = record.keys().map(String::as_str).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table_name,
            columns.join(", "),
            row_placeholders(columns.len())
        );

        Ok(Statement::new(sql, record.values().cloned().collect()))
    }

    /// One multi-row INSERT.
    ///
    /// Columns come from the first row. Every later row must provide each of
    /// them; keys only present in later rows are not written. An empty slice
    /// yields `None` so no statement is ever issued for it.
    pub fn to_bulk_insert(&self, rows: &[Record]) -> Result<Option<Statement>> {
        let Some(first) = rows.first() else {
            return Ok(None);
        };

        self.require_table("INSERT")?;

        if first.is_empty() {
            return Err(Error::invalid_query("INSERT requires columns and values"));
        }

        let columns: Vec<&String> = first.keys().collect();
        let placeholders = row_placeholders(columns.len());
        let mut tuples = Vec::with_capacity(rows.len());
        let mut params = Vec::with_capacity(rows.len() * columns.len());

        for (index, row) in rows.iter().enumerate() {
            for column in &columns {
                let value = row
                    .get(column.as_str())
                    .ok_or_else(|| Error::missing_column(&self.table_name, column.as_str(), index))?;
                params.push(value.clone());
            }
            tuples.push(placeholders.as_str());
        }

        let column_list: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table_name,
            column_list.join(", "),
            tuples.join(", ")
        );

        Ok(Some(Statement::new(sql, params)))
    }

    /// INSERT that updates the existing row when `conflict_columns` collide.
    ///
    /// Every non-conflict column of the record is overwritten with the
    /// incoming value. The conflict clause itself comes from `strategy`.
    pub fn to_upsert(
        &self,
        record: &Record,
        conflict_columns: &[String],
        strategy: &dyn UpsertStrategy,
    ) -> Result<Statement> {
        let insert = self.to_insert(record)?;

        let update_columns: Vec<String> = record
            .keys()
            .filter(|column| !conflict_columns.contains(column))
            .cloned()
            .collect();

        let clause = strategy.conflict_clause(conflict_columns, &update_columns)?;
        let (sql, params) = insert.into_parts();

        Ok(Statement::new(format!("{} {}", sql, clause), params))
    }
}

fn row_placeholders(count: usize) -> String {
    format!("({})", vec!["?"; count].join(", "))
}
