//! Unit of work over the tenant-scoped repositories.
//!
//! Services never hold a repository outside a transaction. They hand a
//! closure to [`InventoryStore::in_tenant_transaction`], which binds a
//! [`TenantTransaction`] to one tenant, runs the closure, and commits only if
//! it returns `Ok`. Any error rolls back every write made by the closure.

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::domain::{
    Alert, Asset, Category, Consumable, Department, Error, Location, StockTransaction, TenantId,
};

use super::{AssetIdentifierLookup, ScopedRepository};

/// All scoped repositories of one tenant inside one transaction.
pub trait TenantTransaction:
    ScopedRepository<Category>
    + ScopedRepository<Location>
    + ScopedRepository<Department>
    + ScopedRepository<Asset>
    + ScopedRepository<Consumable>
    + ScopedRepository<StockTransaction>
    + ScopedRepository<Alert>
    + AssetIdentifierLookup
    + Send
{
    /// Tenant every read and write is restricted to.
    fn tenant_id(&self) -> TenantId;
}

/// Future returned by a unit of work.
pub type TransactionWork<'t, T> = BoxFuture<'t, Result<T, Error>>;

/// Transactional entry point of the inventory store.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Run `work` atomically against the repositories of `tenant_id`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let category = store
    ///     .in_tenant_transaction(tenant_id, move |tx| {
    ///         async move { ScopedRepository::<Category>::create(tx, category).await.map_err(Into::into) }
    ///             .boxed()
    ///     })
    ///     .await?;
    /// ```
    async fn in_tenant_transaction<T, F>(&self, tenant_id: TenantId, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn TenantTransaction) -> TransactionWork<'t, T> + Send + 'static;
}
