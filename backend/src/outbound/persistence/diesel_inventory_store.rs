//! PostgreSQL-backed [`InventoryStore`].

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use tracing::debug;

use crate::domain::ports::{InventoryStore, TenantTransaction, TransactionWork};
use crate::domain::{Error, TenantId};

use super::diesel_error_mapping::{map_store_diesel_error, map_store_pool_error};
use super::diesel_tenant_transaction::DieselTenantTransaction;
use super::pool::DbPool;

/// Why a transaction closure gave up. Domain errors pass through unchanged.
enum TransactionFailure {
    Database(diesel::result::Error),
    Domain(Error),
}

impl From<diesel::result::Error> for TransactionFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<TransactionFailure> for Error {
    fn from(failure: TransactionFailure) -> Self {
        match failure {
            TransactionFailure::Database(error) => map_store_diesel_error(error).into(),
            TransactionFailure::Domain(error) => error,
        }
    }
}

/// Inventory store running every unit of work in its own database
/// transaction.
#[derive(Clone)]
pub struct DieselInventoryStore {
    pool: DbPool,
}

impl DieselInventoryStore {
    /// Create a store drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for DieselInventoryStore {
    async fn in_tenant_transaction<T, F>(&self, tenant_id: TenantId, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn TenantTransaction) -> TransactionWork<'t, T> + Send + 'static,
    {
        let mut pooled = self.pool.get().await.map_err(map_store_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let outcome = conn
            .transaction::<T, TransactionFailure, _>(|conn| {
                async move {
                    let mut scoped = DieselTenantTransaction::new(conn, tenant_id);
                    work(&mut scoped).await.map_err(TransactionFailure::Domain)
                }
                .scope_boxed()
            })
            .await;

        if outcome.is_err() {
            debug!(tenant_id = %tenant_id, "tenant transaction rolled back");
        }
        outcome.map_err(Error::from)
    }
}
