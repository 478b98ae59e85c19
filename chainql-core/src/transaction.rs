//! Transaction scope for a query builder
//!
//! A builder is either idle, running statements on the pool, or active,
//! running every statement inside one transaction. `begin_transaction`
//! moves it from idle to active; `commit_transaction` and
//! `rollback_transaction` move it back to idle whatever the outcome.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::builder::query::finished_transaction;
use crate::executor::{Transaction, TransactionalPool};
use crate::{Error, QueryBuilder, Result};

impl<'c, C: TransactionalPool> QueryBuilder<'c, C> {
    /// Open a transaction; statements run inside it until it is committed or
    /// rolled back
    pub async fn begin_transaction(&mut self) -> Result<()> {
        if let Some(slot) = &self.transaction {
            if slot.lock().await.is_some() {
                return Err(Error::transaction_state("transaction already active"));
            }
        }

        let tx = self.pool().begin_transaction().await?;
        debug!(table = %self.spec().table_name(), "transaction started");
        self.transaction = Some(Arc::new(Mutex::new(Some(tx))));
        Ok(())
    }

    /// Commit the active transaction. The builder is idle afterwards even if
    /// the commit fails.
    pub async fn commit_transaction(&mut self) -> Result<()> {
        let tx = self.take_transaction().await?;
        tx.commit().await?;
        debug!("transaction committed");
        Ok(())
    }

    /// Roll back the active transaction. The builder is idle afterwards even
    /// if the rollback fails.
    pub async fn rollback_transaction(&mut self) -> Result<()> {
        let tx = self.take_transaction().await?;
        tx.rollback().await?;
        debug!("transaction rolled back");
        Ok(())
    }

    /// Run `f` inside a new transaction.
    ///
    /// `f` receives a clone of this builder bound to the transaction. The
    /// transaction is committed when `f` succeeds and rolled back when it
    /// fails; the error from `f` is returned either way. If the rollback
    /// fails too, both errors are returned as [`Error::RollbackFailed`].
    ///
    /// # Examples
    /// ```ignore
    /// let mut accounts = db.table("accounts");
    /// accounts
    ///     .with_transaction(|q| async move {
    ///         q.clone().where_(("id", 1)).update([("balance", 90)]).await?;
    ///         q.where_(("id", 2)).update([("balance", 110)]).await?;
    ///         Ok(())
    ///     })
    ///     .await?;
    /// ```
    pub async fn with_transaction<T, F, Fut>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(QueryBuilder<'c, C>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.begin_transaction().await?;

        match f(self.clone()).await {
            Ok(value) => {
                self.commit_transaction().await?;
                Ok(value)
            }
            Err(cause) => match self.rollback_transaction().await {
                Ok(()) => Err(cause),
                Err(rollback) => {
                    warn!(error = %cause, rollback_error = %rollback, "rollback after failed transaction also failed");
                    Err(Error::RollbackFailed {
                        cause: Box::new(cause),
                        rollback: Box::new(rollback),
                    })
                }
            },
        }
    }

    async fn take_transaction(&mut self) -> Result<C::Transaction> {
        let slot = self
            .transaction
            .take()
            .ok_or_else(|| Error::transaction_state("no active transaction"))?;
        let tx = slot.lock().await.take();
        tx.ok_or_else(finished_transaction)
    }
}
