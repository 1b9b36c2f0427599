//! Storage session and Unit of Work.
//!
//! A [`Session`] owns a handle on the connection pool and runs units of work
//! inside a transaction: begin, run, then commit on success or roll back on
//! error. The transaction handle is dropped on every exit path, which returns
//! its connection to the pool.
//!
//! [`Persistence`] wires the repositories on top of one session so that the
//! service repository can hand its transaction to instance operations.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::repositories::{
    InstanceRepository, InstanceStore, ServiceRepository, ServiceStore, TxInstanceRepository,
    TxServiceRepository,
};
use crate::errors::{AppError, AppResult};

/// Future returned by a unit of work, borrowing the transaction for `'a`.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Repository access for the application.
pub trait UnitOfWork: Send + Sync {
    /// Get service repository
    fn services(&self) -> Arc<dyn ServiceRepository>;

    /// Get instance repository
    fn instances(&self) -> Arc<dyn InstanceRepository>;
}

/// Transactional scope over the shared connection pool.
#[derive(Clone)]
pub struct Session {
    db: DatabaseConnection,
}

impl Session {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pool handle for single-statement reads.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure succeeds and rolled back
    /// when it fails; the closure's error is returned unchanged. Begin and
    /// commit failures surface as [`AppError::Begin`] and [`AppError::Commit`].
    /// Runs at the backend's default isolation level.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| {
                tracing::warn!("Could not start the transaction: {}", e);
                AppError::Begin(e)
            })?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(|e| {
                    tracing::warn!("Could not commit the transaction: {}", e);
                    AppError::Commit(e)
                })?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part of the
/// same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Service rows, inside this transaction
    pub fn services(&self) -> TxServiceRepository<'a> {
        TxServiceRepository::new(self.txn)
    }

    /// Instance rows, inside this transaction
    pub fn instances(&self) -> TxInstanceRepository<'a> {
        TxInstanceRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    service_repo: Arc<ServiceStore>,
    instance_repo: Arc<InstanceStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let session = Session::new(db);
        let instance_repo = Arc::new(InstanceStore::new(session.clone()));
        let service_repo = Arc::new(ServiceStore::new(session, instance_repo.clone()));
        Self {
            service_repo,
            instance_repo,
        }
    }
}

impl UnitOfWork for Persistence {
    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.service_repo.clone()
    }

    fn instances(&self) -> Arc<dyn InstanceRepository> {
        self.instance_repo.clone()
    }
}

/// Run `$body` inside a transaction of `$session`, binding the context to `$ctx`.
///
/// The body is moved into the unit of work, so it may only capture owned data.
#[macro_export]
macro_rules! with_transaction {
    ($session:expr, |$ctx:ident| $body:expr) => {
        $session
            .transaction(|$ctx| Box::pin(async move { $body }))
            .await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Database;

    async fn database() -> Database {
        Database::memory()
            .await
            .expect("in-memory database should open")
    }

    #[tokio::test]
    async fn test_failed_unit_of_work_is_rolled_back() {
        let db = database().await;
        let session = Session::new(db.get_connection());

        let result: AppResult<i32> = crate::with_transaction!(session, |ctx| {
            ctx.services().insert("billing").await?;
            Err::<i32, _>(AppError::internal("stopped after the first statement"))
        });

        assert!(matches!(
            result,
            Err(AppError::Internal(ref msg)) if msg == "stopped after the first statement"
        ));
        let services = Persistence::new(db.get_connection()).services();
        assert!(services.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_unit_of_work_is_committed() {
        let db = database().await;
        let session = Session::new(db.get_connection());

        let service_id = crate::with_transaction!(session, |ctx| {
            ctx.services().insert("billing").await
        })
        .unwrap();

        let services = Persistence::new(db.get_connection()).services();
        let found = services.find_by_id(service_id).await.unwrap().unwrap();
        assert_eq!(found.name, "billing");
    }
}
