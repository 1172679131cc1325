//! PostgreSQL-backed [`TenantRegistry`].

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TenantRegistry, TenantRegistryError};
use crate::domain::{Tenant, TenantId};

use super::diesel_error_mapping::{map_registry_diesel_error, map_registry_pool_error};
use super::models::TenantRow;
use super::pool::DbPool;
use super::schema::tenants;

/// Tenant registry over the `tenants` table.
#[derive(Clone)]
pub struct DieselTenantRegistry {
    pool: DbPool,
}

impl DieselTenantRegistry {
    /// Create a registry drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRegistry for DieselTenantRegistry {
    async fn register(&self, tenant: &Tenant) -> Result<(), TenantRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_registry_pool_error)?;
        let row = TenantRow::from(tenant);
        diesel::insert_into(tenants::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_registry_diesel_error(err, &tenant.name))?;
        Ok(())
    }

    async fn find(&self, tenant_id: TenantId) -> Result<Option<Tenant>, TenantRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_registry_pool_error)?;
        let row = tenants::table
            .filter(tenants::id.eq(Uuid::from(tenant_id)))
            .select(TenantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_registry_diesel_error(err, ""))?;
        Ok(row.map(Tenant::from))
    }
}
