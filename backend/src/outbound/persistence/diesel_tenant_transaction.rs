//! Tenant-scoped repositories over one open PostgreSQL transaction.
//!
//! This is the only module that touches the tenant-bearing tables. Every
//! statement it builds starts from `tenant_id = <bound tenant>`, so callers
//! cannot reach another tenant's rows or rows without a tenant.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::ports::{
    AssetIdentifierLookup, ScopedRepository, StoreError, TenantTransaction, claim_for_tenant,
    not_found,
};
use crate::domain::sequence::{IdentifierKind, IdentifierPrefix};
use crate::domain::tenancy::TenantOwned;
use crate::domain::{
    Alert, AlertFilter, Asset, AssetFilter, Category, CategoryFilter, Consumable,
    ConsumableFilter, Department, DepartmentFilter, Location, LocationFilter, PageRequest,
    StockTransaction, StockTransactionFilter, TenantId,
};

use super::diesel_error_mapping::map_store_diesel_error;
use super::models::{
    AlertRow, AssetRow, CategoryRow, ConsumableRow, DepartmentRow, LocationRow,
    StockTransactionRow,
};
use super::schema::{
    alerts, assets, categories, consumables, departments, locations, stock_transactions,
};

const GREATEST_TAG_SQL: &str = "\
    SELECT tag AS value FROM assets \
    WHERE tenant_id = $1 AND tag_prefix = $2 \
    ORDER BY char_length(tag) DESC, tag COLLATE \"C\" DESC \
    LIMIT 1";

const GREATEST_NAME_SQL: &str = "\
    SELECT name AS value FROM assets \
    WHERE tenant_id = $1 AND name_prefix = $2 \
    ORDER BY char_length(name) DESC, name COLLATE \"C\" DESC \
    LIMIT 1";

#[derive(QueryableByName)]
struct IdentifierValue {
    #[diesel(sql_type = Text)]
    value: String,
}

/// Advisory lock key for one identifier sequence of one tenant.
pub(crate) fn advisory_lock_key(tenant_id: TenantId, prefix: &IdentifierPrefix) -> i64 {
    let digest = Sha256::digest(format!(
        "{tenant_id}:{}:{}",
        prefix.kind().as_str(),
        prefix.as_str()
    ));
    let mut key = [0_u8; 8];
    key.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(key)
}

/// Repositories of one tenant bound to an open transaction.
pub(crate) struct DieselTenantTransaction<'c> {
    conn: &'c mut AsyncPgConnection,
    tenant_id: TenantId,
}

impl<'c> DieselTenantTransaction<'c> {
    pub(crate) fn new(conn: &'c mut AsyncPgConnection, tenant_id: TenantId) -> Self {
        Self { conn, tenant_id }
    }

    fn tenant(&self) -> Uuid {
        self.tenant_id.into()
    }
}

fn page_bounds(page: PageRequest) -> Result<(i64, i64), StoreError> {
    let offset = i64::try_from(page.offset())
        .map_err(|_| StoreError::query("page offset exceeds the supported range"))?;
    let limit = i64::try_from(page.limit())
        .map_err(|_| StoreError::query("page size exceeds the supported range"))?;
    Ok((offset, limit))
}

fn category_query<'a>(tenant: Uuid, filter: &'a CategoryFilter) -> categories::BoxedQuery<'a, Pg> {
    let mut query = categories::table
        .filter(categories::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(categories::name.eq(name));
    }
    query
}

fn location_query<'a>(tenant: Uuid, filter: &'a LocationFilter) -> locations::BoxedQuery<'a, Pg> {
    let mut query = locations::table
        .filter(locations::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(locations::name.eq(name));
    }
    query
}

fn department_query<'a>(
    tenant: Uuid,
    filter: &'a DepartmentFilter,
) -> departments::BoxedQuery<'a, Pg> {
    let mut query = departments::table
        .filter(departments::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(departments::name.eq(name));
    }
    query
}

fn asset_query<'a>(tenant: Uuid, filter: &'a AssetFilter) -> assets::BoxedQuery<'a, Pg> {
    let mut query = assets::table
        .filter(assets::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(id) = filter.category_id {
        query = query.filter(assets::category_id.eq(Uuid::from(id)));
    }
    if let Some(id) = filter.location_id {
        query = query.filter(assets::location_id.eq(Uuid::from(id)));
    }
    if let Some(id) = filter.department_id {
        query = query.filter(assets::department_id.eq(Uuid::from(id)));
    }
    if let Some(user) = filter.assigned_to {
        query = query.filter(assets::assigned_to.eq(Uuid::from(user)));
    }
    query
}

fn consumable_query<'a>(
    tenant: Uuid,
    filter: &'a ConsumableFilter,
) -> consumables::BoxedQuery<'a, Pg> {
    let mut query = consumables::table
        .filter(consumables::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(consumables::name.eq(name));
    }
    if filter.low_stock_only {
        query = query.filter(consumables::quantity.lt(consumables::reorder_level));
    }
    query
}

fn stock_transaction_query<'a>(
    tenant: Uuid,
    filter: &'a StockTransactionFilter,
) -> stock_transactions::BoxedQuery<'a, Pg> {
    let mut query = stock_transactions::table
        .filter(stock_transactions::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(id) = filter.consumable_id {
        query = query.filter(stock_transactions::consumable_id.eq(Uuid::from(id)));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(stock_transactions::transaction_type.eq(kind.as_str()));
    }
    if let Some(id) = filter.department_id {
        query = query.filter(stock_transactions::department_id.eq(Uuid::from(id)));
    }
    query
}

fn alert_query<'a>(tenant: Uuid, filter: &'a AlertFilter) -> alerts::BoxedQuery<'a, Pg> {
    let mut query = alerts::table
        .filter(alerts::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(id) = filter.consumable_id {
        query = query.filter(alerts::consumable_id.eq(Uuid::from(id)));
    }
    if let Some(status) = filter.status {
        query = query.filter(alerts::status.eq(status.as_str()));
    }
    query
}

/// Implement [`ScopedRepository`] for one table.
///
/// Reads select through the filter builder, which already carries the tenant
/// predicate. Writes re-check ownership with the same predicate.
macro_rules! scoped_table {
    ($entity:ty, $table:ident, $row:ty, $filtered:ident) => {
        #[async_trait]
        impl<'c> ScopedRepository<$entity> for DieselTenantTransaction<'c> {
            async fn get(
                &mut self,
                id: <$entity as TenantOwned>::Id,
            ) -> Result<Option<$entity>, StoreError> {
                let tenant = self.tenant();
                $table::table
                    .filter($table::tenant_id.eq(tenant))
                    .filter($table::id.eq(Uuid::from(id)))
                    .select(<$row>::as_select())
                    .first(&mut *self.conn)
                    .await
                    .optional()
                    .map_err(map_store_diesel_error)?
                    .map(<$entity>::try_from)
                    .transpose()
            }

            async fn get_for_update(
                &mut self,
                id: <$entity as TenantOwned>::Id,
            ) -> Result<Option<$entity>, StoreError> {
                let tenant = self.tenant();
                $table::table
                    .filter($table::tenant_id.eq(tenant))
                    .filter($table::id.eq(Uuid::from(id)))
                    .select(<$row>::as_select())
                    .for_update()
                    .first(&mut *self.conn)
                    .await
                    .optional()
                    .map_err(map_store_diesel_error)?
                    .map(<$entity>::try_from)
                    .transpose()
            }

            async fn list(
                &mut self,
                filter: &<$entity as TenantOwned>::Filter,
                page: PageRequest,
            ) -> Result<Vec<$entity>, StoreError> {
                let (offset, limit) = page_bounds(page)?;
                let rows: Vec<$row> = $filtered(self.tenant(), filter)
                    .select(<$row>::as_select())
                    .order(($table::created_at.asc(), $table::id.asc()))
                    .offset(offset)
                    .limit(limit)
                    .load(&mut *self.conn)
                    .await
                    .map_err(map_store_diesel_error)?;
                rows.into_iter().map(<$entity>::try_from).collect()
            }

            async fn count(
                &mut self,
                filter: &<$entity as TenantOwned>::Filter,
            ) -> Result<u64, StoreError> {
                let total: i64 = $filtered(self.tenant(), filter)
                    .count()
                    .get_result(&mut *self.conn)
                    .await
                    .map_err(map_store_diesel_error)?;
                u64::try_from(total).map_err(|_| StoreError::query("negative row count"))
            }

            async fn create(&mut self, row: $entity) -> Result<$entity, StoreError> {
                let row = claim_for_tenant(self.tenant_id, row)?;
                let record = <$row>::try_from(&row)?;
                diesel::insert_into($table::table)
                    .values(&record)
                    .execute(&mut *self.conn)
                    .await
                    .map_err(map_store_diesel_error)?;
                Ok(row)
            }

            async fn update(&mut self, row: $entity) -> Result<$entity, StoreError> {
                let row = claim_for_tenant(self.tenant_id, row)?;
                let record = <$row>::try_from(&row)?;
                let tenant = self.tenant();
                let updated = diesel::update(
                    $table::table
                        .filter($table::tenant_id.eq(tenant))
                        .filter($table::id.eq(record.id)),
                )
                .set(&record)
                .execute(&mut *self.conn)
                .await
                .map_err(map_store_diesel_error)?;
                if updated == 0 {
                    return Err(not_found::<$entity>(row.id()));
                }
                Ok(row)
            }

            async fn delete(
                &mut self,
                id: <$entity as TenantOwned>::Id,
            ) -> Result<$entity, StoreError> {
                let existing = ScopedRepository::<$entity>::get_for_update(self, id)
                    .await?
                    .ok_or_else(|| not_found::<$entity>(id))?;
                let tenant = self.tenant();
                diesel::delete(
                    $table::table
                        .filter($table::tenant_id.eq(tenant))
                        .filter($table::id.eq(Uuid::from(id))),
                )
                .execute(&mut *self.conn)
                .await
                .map_err(map_store_diesel_error)?;
                Ok(existing)
            }
        }
    };
}

scoped_table!(Category, categories, CategoryRow, category_query);
scoped_table!(Location, locations, LocationRow, location_query);
scoped_table!(Department, departments, DepartmentRow, department_query);
scoped_table!(Asset, assets, AssetRow, asset_query);
scoped_table!(Consumable, consumables, ConsumableRow, consumable_query);
scoped_table!(
    StockTransaction,
    stock_transactions,
    StockTransactionRow,
    stock_transaction_query
);
scoped_table!(Alert, alerts, AlertRow, alert_query);

#[async_trait]
impl<'c> AssetIdentifierLookup for DieselTenantTransaction<'c> {
    async fn lock_identifier_prefix(&mut self, prefix: &IdentifierPrefix) -> Result<(), StoreError> {
        let key = advisory_lock_key(self.tenant_id, prefix);
        sql_query("SELECT pg_advisory_xact_lock($1)")
            .bind::<BigInt, _>(key)
            .execute(&mut *self.conn)
            .await
            .map_err(map_store_diesel_error)?;
        Ok(())
    }

    async fn greatest_identifier(
        &mut self,
        prefix: &IdentifierPrefix,
    ) -> Result<Option<String>, StoreError> {
        let statement = match prefix.kind() {
            IdentifierKind::Tag => GREATEST_TAG_SQL,
            IdentifierKind::Name => GREATEST_NAME_SQL,
        };
        let greatest = sql_query(statement)
            .bind::<diesel::sql_types::Uuid, _>(self.tenant())
            .bind::<Text, _>(prefix.as_str())
            .get_result::<IdentifierValue>(&mut *self.conn)
            .await
            .optional()
            .map_err(map_store_diesel_error)?;
        Ok(greatest.map(|row| row.value))
    }
}

impl<'c> TenantTransaction for DieselTenantTransaction<'c> {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::sequence::{name_prefix, tag_prefix};

    #[rstest]
    fn lock_keys_are_stable_per_tenant_and_prefix() {
        let tenant = TenantId::random();
        let prefix = tag_prefix("Computers:Desktop").expect("valid category");
        assert_eq!(
            advisory_lock_key(tenant, &prefix),
            advisory_lock_key(tenant, &prefix)
        );
    }

    #[rstest]
    fn lock_keys_differ_across_tenants_and_sequences() {
        let tenant = TenantId::random();
        let tag = tag_prefix("Computers:Desktop").expect("valid category");
        let name = name_prefix("Plant", "ICT", "Computers:Desktop").expect("valid placement");
        assert_ne!(
            advisory_lock_key(tenant, &tag),
            advisory_lock_key(TenantId::random(), &tag)
        );
        assert_ne!(advisory_lock_key(tenant, &tag), advisory_lock_key(tenant, &name));
    }

    #[rstest]
    fn page_bounds_follow_the_request() {
        let page = PageRequest::new(3, 20).expect("valid page");
        assert_eq!(page_bounds(page).expect("in range"), (40, 20));
    }
}
