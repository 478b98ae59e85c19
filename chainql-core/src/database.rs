//! Entry point owning a pool and the builder configuration

use crate::config::QueryConfig;
use crate::executor::TransactionalPool;
use crate::QueryBuilder;

/// A connection pool plus the settings every builder starts from.
///
/// Builders borrow the pool, so one `Database` can hand out any number of
/// independent builders.
#[derive(Debug, Clone)]
pub struct Database<C> {
    pool: C,
    config: QueryConfig,
}

impl<C: TransactionalPool> Database<C> {
    pub fn new(pool: C) -> Self {
        Self::with_config(pool, QueryConfig::default())
    }

    pub fn with_config(pool: C, config: QueryConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &C {
        &self.pool
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// A fresh builder with no table selected
    pub fn query(&self) -> QueryBuilder<'_, C> {
        QueryBuilder::with_config(&self.pool, &self.config)
    }

    /// A fresh builder targeting `name`
    pub fn table(&self, name: &str) -> QueryBuilder<'_, C> {
        self.query().table(name)
    }
}
