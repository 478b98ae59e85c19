//! Query builder module

pub mod common;
pub mod clause;
pub mod spec;
pub mod statement;
pub mod select;
pub mod insert;
pub mod update;
pub mod delete;
pub mod query;

// Re-export types from submodules
pub use clause::serialize_conditions;
pub use common::{
    IntoColumns, IntoCondition, IntoRecord, JoinClause, JoinType, Operand, OrderByClause, Record,
    SortDirection, UncheckedSql, WhereCondition, WhereConnector,
};
pub use query::QueryBuilder;
pub use select::AggregateFunction;
pub use spec::QuerySpec;
pub use statement::Statement;
