//! In-process implementation of the inventory store ports.
//!
//! Transactions are serialised by a single async mutex and work on a copy of
//! the tables that replaces the committed state only when the unit of work
//! succeeds. Uniqueness rules mirror the PostgreSQL constraints so that
//! services observe the same `Conflict` errors in tests and in production.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::sequence::{IdentifierKind, IdentifierPrefix, compare_identifiers};
use crate::domain::tenancy::TenantOwned;
use crate::domain::{
    Alert, AlertFilter, AlertId, AlertStatus, Asset, AssetFilter, AssetId, Category,
    CategoryFilter, CategoryId, Consumable, ConsumableFilter, ConsumableId, Department,
    DepartmentFilter, DepartmentId, Error, Location, LocationFilter, LocationId, PageRequest,
    StockTransaction, StockTransactionFilter, StockTransactionId, TenantId,
};

use super::{
    AssetIdentifierLookup, InventoryStore, ScopedRepository, StoreError, TenantTransaction,
    TransactionWork, claim_for_tenant, not_found,
};

#[derive(Debug, Clone, Default)]
struct InventoryTables {
    categories: BTreeMap<CategoryId, Category>,
    locations: BTreeMap<LocationId, Location>,
    departments: BTreeMap<DepartmentId, Department>,
    assets: BTreeMap<AssetId, Asset>,
    consumables: BTreeMap<ConsumableId, Consumable>,
    stock_transactions: BTreeMap<StockTransactionId, StockTransaction>,
    alerts: BTreeMap<AlertId, Alert>,
}

/// Inventory store held in process memory.
///
/// # Examples
/// ```
/// use futures_util::FutureExt;
/// use stockroom::domain::ports::{InMemoryInventoryStore, InventoryStore, ScopedRepository};
/// use stockroom::domain::{Department, DepartmentId, TenantId};
///
/// # async fn example() -> Result<(), stockroom::domain::Error> {
/// let store = InMemoryInventoryStore::new();
/// let tenant = TenantId::random();
/// let department = Department {
///     id: DepartmentId::random(),
///     tenant_id: None,
///     name: "ICT".to_owned(),
///     created_at: chrono::Utc::now(),
/// };
/// let stored = store
///     .in_tenant_transaction(tenant, move |tx| {
///         async move { Ok(ScopedRepository::<Department>::create(tx, department).await?) }.boxed()
///     })
///     .await?;
/// assert_eq!(stored.tenant_id, Some(tenant));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    tables: Mutex<InventoryTables>,
}

impl InMemoryInventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn in_tenant_transaction<T, F>(&self, tenant_id: TenantId, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn TenantTransaction) -> TransactionWork<'t, T> + Send + 'static,
    {
        let mut committed = self.tables.lock().await;
        let mut transaction = MemoryTransaction {
            tenant_id,
            tables: committed.clone(),
        };
        let outcome = work(&mut transaction).await;
        if outcome.is_ok() {
            *committed = transaction.tables;
        }
        outcome
    }
}

struct MemoryTransaction {
    tenant_id: TenantId,
    tables: InventoryTables,
}

impl MemoryTransaction {
    fn owns<E: TenantOwned>(&self, row: &E) -> bool {
        row.tenant_id() == Some(self.tenant_id)
    }

    fn scoped_row<E: MemoryRow>(&self, id: E::Id) -> Option<&E> {
        E::table(&self.tables)
            .get(&id)
            .filter(|row| self.owns(*row))
    }

    fn matching<E: MemoryRow>(&self, filter: &E::Filter) -> Vec<E> {
        let mut rows: Vec<E> = E::table(&self.tables)
            .values()
            .filter(|row| self.owns(*row) && row.matches(filter))
            .cloned()
            .collect();
        rows.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });
        rows
    }

    fn check_unique<E: MemoryRow>(&self, row: &E) -> Result<(), StoreError> {
        let collision = E::table(&self.tables)
            .values()
            .filter(|existing| existing.id() != row.id())
            .find_map(|existing| row.collides_with(existing));
        match collision {
            Some(constraint) => Err(StoreError::conflict(constraint)),
            None => Ok(()),
        }
    }
}

/// Table access and filtering for rows kept in memory.
trait MemoryRow: TenantOwned {
    fn table(tables: &InventoryTables) -> &BTreeMap<Self::Id, Self>;
    fn table_mut(tables: &mut InventoryTables) -> &mut BTreeMap<Self::Id, Self>;
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Unique constraint `self` would violate next to `other`.
    fn collides_with(&self, _other: &Self) -> Option<&'static str> {
        None
    }
}

fn same_tenant<E: TenantOwned>(left: &E, right: &E) -> bool {
    left.tenant_id() == right.tenant_id()
}

fn matches_opt<T: PartialEq>(wanted: Option<&T>, actual: &T) -> bool {
    wanted.is_none_or(|value| value == actual)
}

macro_rules! memory_table {
    ($entity:ty, $field:ident) => {
        fn table(tables: &InventoryTables) -> &BTreeMap<<$entity as TenantOwned>::Id, $entity> {
            &tables.$field
        }

        fn table_mut(
            tables: &mut InventoryTables,
        ) -> &mut BTreeMap<<$entity as TenantOwned>::Id, $entity> {
            &mut tables.$field
        }
    };
}

impl MemoryRow for Category {
    memory_table!(Category, categories);

    fn matches(&self, filter: &CategoryFilter) -> bool {
        matches_opt(filter.name.as_ref(), &self.name)
    }

    fn collides_with(&self, other: &Self) -> Option<&'static str> {
        (same_tenant(self, other) && self.name == other.name).then_some("categories_tenant_name_key")
    }
}

impl MemoryRow for Location {
    memory_table!(Location, locations);

    fn matches(&self, filter: &LocationFilter) -> bool {
        matches_opt(filter.name.as_ref(), &self.name)
    }

    fn collides_with(&self, other: &Self) -> Option<&'static str> {
        (same_tenant(self, other) && self.name == other.name).then_some("locations_tenant_name_key")
    }
}

impl MemoryRow for Department {
    memory_table!(Department, departments);

    fn matches(&self, filter: &DepartmentFilter) -> bool {
        matches_opt(filter.name.as_ref(), &self.name)
    }

    fn collides_with(&self, other: &Self) -> Option<&'static str> {
        (same_tenant(self, other) && self.name == other.name)
            .then_some("departments_tenant_name_key")
    }
}

impl MemoryRow for Asset {
    memory_table!(Asset, assets);

    fn matches(&self, filter: &AssetFilter) -> bool {
        matches_opt(filter.category_id.as_ref(), &self.category_id)
            && matches_opt(filter.location_id.as_ref(), &self.location_id)
            && matches_opt(filter.department_id.as_ref(), &self.department_id)
            && filter
                .assigned_to
                .is_none_or(|user| self.assigned_to == Some(user))
    }

    fn collides_with(&self, other: &Self) -> Option<&'static str> {
        if !same_tenant(self, other) {
            return None;
        }
        if self.tag == other.tag {
            return Some("assets_tenant_tag_key");
        }
        (self.name == other.name).then_some("assets_tenant_name_key")
    }
}

impl MemoryRow for Consumable {
    memory_table!(Consumable, consumables);

    fn matches(&self, filter: &ConsumableFilter) -> bool {
        matches_opt(filter.name.as_ref(), &self.name)
            && (!filter.low_stock_only || self.stock_level().is_low())
    }

    fn collides_with(&self, other: &Self) -> Option<&'static str> {
        (same_tenant(self, other) && self.name == other.name)
            .then_some("consumables_tenant_name_key")
    }
}

impl MemoryRow for StockTransaction {
    memory_table!(StockTransaction, stock_transactions);

    fn matches(&self, filter: &StockTransactionFilter) -> bool {
        matches_opt(filter.consumable_id.as_ref(), &self.consumable_id)
            && matches_opt(filter.kind.as_ref(), &self.kind)
            && matches_opt(filter.department_id.as_ref(), &self.department_id)
    }
}

impl MemoryRow for Alert {
    memory_table!(Alert, alerts);

    fn matches(&self, filter: &AlertFilter) -> bool {
        matches_opt(filter.consumable_id.as_ref(), &self.consumable_id)
            && matches_opt(filter.status.as_ref(), &self.status)
    }

    fn collides_with(&self, other: &Self) -> Option<&'static str> {
        (self.status == AlertStatus::Pending
            && other.status == AlertStatus::Pending
            && self.consumable_id == other.consumable_id)
            .then_some("alerts_one_pending_per_consumable")
    }
}

#[async_trait]
impl<E: MemoryRow> ScopedRepository<E> for MemoryTransaction {
    async fn get(&mut self, id: E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.scoped_row::<E>(id).cloned())
    }

    async fn get_for_update(&mut self, id: E::Id) -> Result<Option<E>, StoreError> {
        // The store mutex already serialises transactions.
        Ok(self.scoped_row::<E>(id).cloned())
    }

    async fn list(&mut self, filter: &E::Filter, page: PageRequest) -> Result<Vec<E>, StoreError> {
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(self
            .matching::<E>(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&mut self, filter: &E::Filter) -> Result<u64, StoreError> {
        let total = self.matching::<E>(filter).len();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn create(&mut self, row: E) -> Result<E, StoreError> {
        let row = claim_for_tenant(self.tenant_id, row)?;
        if E::table(&self.tables).contains_key(&row.id()) {
            return Err(StoreError::conflict(format!("{} primary key", E::ENTITY)));
        }
        self.check_unique(&row)?;
        E::table_mut(&mut self.tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn update(&mut self, row: E) -> Result<E, StoreError> {
        let row = claim_for_tenant(self.tenant_id, row)?;
        if self.scoped_row::<E>(row.id()).is_none() {
            return Err(not_found::<E>(row.id()));
        }
        self.check_unique(&row)?;
        E::table_mut(&mut self.tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn delete(&mut self, id: E::Id) -> Result<E, StoreError> {
        if self.scoped_row::<E>(id).is_none() {
            return Err(not_found::<E>(id));
        }
        E::table_mut(&mut self.tables)
            .remove(&id)
            .ok_or_else(|| not_found::<E>(id))
    }
}

#[async_trait]
impl AssetIdentifierLookup for MemoryTransaction {
    async fn lock_identifier_prefix(&mut self, _prefix: &IdentifierPrefix) -> Result<(), StoreError> {
        Ok(())
    }

    async fn greatest_identifier(
        &mut self,
        prefix: &IdentifierPrefix,
    ) -> Result<Option<String>, StoreError> {
        let greatest = self
            .tables
            .assets
            .values()
            .filter(|asset| self.owns(*asset))
            .filter_map(|asset| {
                let (sequence, value) = match prefix.kind() {
                    IdentifierKind::Tag => (&asset.tag_prefix, &asset.tag),
                    IdentifierKind::Name => (&asset.name_prefix, &asset.name),
                };
                (sequence == prefix.as_str()).then_some(value)
            })
            .max_by(|left, right| compare_identifiers(left, right));
        Ok(greatest.cloned())
    }
}

impl TenantTransaction for MemoryTransaction {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests;
