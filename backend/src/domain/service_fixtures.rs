//! Shared fixtures for the domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use futures_util::FutureExt;
use mockable::Clock;

use crate::domain::ports::{InMemoryInventoryStore, InventoryStore, ScopedRepository};
use crate::domain::{
    Alert, AlertFilter, Asset, AssetFilter, Category, CategoryId, Consumable, ConsumableId,
    Department, DepartmentId, Location, LocationId, PageRequest, StockTransaction,
    StockTransactionFilter, TenantContext, TenantId, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 8, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn ctx_for(tenant_id: TenantId) -> TenantContext {
    TenantContext::authenticated(tenant_id, UserId::random())
}

/// Reference rows for one tenant: `Computers:Desktop`, `Plant`, `ICT`.
pub(crate) struct Site {
    pub tenant_id: TenantId,
    pub category: Category,
    pub location: Location,
    pub department: Department,
}

pub(crate) async fn seed_site(store: &InMemoryInventoryStore, tenant_id: TenantId) -> Site {
    let category = seed_category(store, tenant_id, "Computers:Desktop").await;
    let location = seed_location(store, tenant_id, "Plant").await;
    let department = seed_department(store, tenant_id, "ICT").await;
    Site {
        tenant_id,
        category,
        location,
        department,
    }
}

pub(crate) async fn seed_category(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    name: &str,
) -> Category {
    let row = Category {
        id: CategoryId::random(),
        tenant_id: None,
        name: name.to_owned(),
        description: None,
        created_at: fixture_timestamp(),
    };
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move { Ok(ScopedRepository::<Category>::create(tx, row).await?) }.boxed()
        })
        .await
        .expect("seed category")
}

pub(crate) async fn seed_location(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    name: &str,
) -> Location {
    let row = Location {
        id: LocationId::random(),
        tenant_id: None,
        name: name.to_owned(),
        address: None,
        created_at: fixture_timestamp(),
    };
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move { Ok(ScopedRepository::<Location>::create(tx, row).await?) }.boxed()
        })
        .await
        .expect("seed location")
}

pub(crate) async fn seed_department(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    name: &str,
) -> Department {
    let row = Department {
        id: DepartmentId::random(),
        tenant_id: None,
        name: name.to_owned(),
        created_at: fixture_timestamp(),
    };
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move { Ok(ScopedRepository::<Department>::create(tx, row).await?) }.boxed()
        })
        .await
        .expect("seed department")
}

/// Sequence of a fixture identifier: everything before its trailing digits.
fn sequence_of(identifier: &str) -> String {
    identifier
        .trim_end_matches(|ch: char| ch.is_ascii_digit())
        .to_owned()
}

/// Insert an asset with fixed identifiers, bypassing the registry.
pub(crate) async fn seed_asset(
    store: &InMemoryInventoryStore,
    site: &Site,
    tag: &str,
    name: &str,
) -> Asset {
    let row = Asset {
        id: crate::domain::AssetId::random(),
        tenant_id: None,
        tag: tag.to_owned(),
        tag_prefix: sequence_of(tag),
        name: name.to_owned(),
        name_prefix: sequence_of(name),
        category_id: site.category.id,
        location_id: site.location.id,
        department_id: site.department.id,
        assigned_to: None,
        status_id: None,
        serial_number: None,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    };
    store
        .in_tenant_transaction(site.tenant_id, move |tx| {
            async move { Ok(ScopedRepository::<Asset>::create(tx, row).await?) }.boxed()
        })
        .await
        .expect("seed asset")
}

/// Insert a consumable with a given balance, bypassing the ledger.
pub(crate) async fn seed_consumable(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    name: &str,
    quantity: u32,
    reorder_level: u32,
) -> Consumable {
    let row = Consumable {
        id: ConsumableId::random(),
        tenant_id: None,
        name: name.to_owned(),
        category: None,
        brand: None,
        model: None,
        unit_of_measure: None,
        quantity,
        reorder_level,
        created_at: fixture_timestamp(),
    };
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move { Ok(ScopedRepository::<Consumable>::create(tx, row).await?) }.boxed()
        })
        .await
        .expect("seed consumable")
}

pub(crate) async fn assets_of(store: &InMemoryInventoryStore, tenant_id: TenantId) -> Vec<Asset> {
    store
        .in_tenant_transaction(tenant_id, |tx| {
            async move {
                Ok(
                    ScopedRepository::<Asset>::list(tx, &AssetFilter::default(), PageRequest::widest())
                        .await?,
                )
            }
            .boxed()
        })
        .await
        .expect("list assets")
}

pub(crate) async fn consumable_of(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    consumable_id: ConsumableId,
) -> Option<Consumable> {
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move { Ok(ScopedRepository::<Consumable>::get(tx, consumable_id).await?) }.boxed()
        })
        .await
        .expect("read consumable")
}

pub(crate) async fn alerts_for(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    consumable_id: ConsumableId,
) -> Vec<Alert> {
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move {
                let filter = AlertFilter {
                    consumable_id: Some(consumable_id),
                    status: None,
                };
                Ok(ScopedRepository::<Alert>::list(tx, &filter, PageRequest::widest()).await?)
            }
            .boxed()
        })
        .await
        .expect("list alerts")
}

pub(crate) async fn transactions_for(
    store: &InMemoryInventoryStore,
    tenant_id: TenantId,
    consumable_id: ConsumableId,
) -> Vec<StockTransaction> {
    store
        .in_tenant_transaction(tenant_id, move |tx| {
            async move {
                let filter = StockTransactionFilter {
                    consumable_id: Some(consumable_id),
                    ..StockTransactionFilter::default()
                };
                Ok(
                    ScopedRepository::<StockTransaction>::list(tx, &filter, PageRequest::widest())
                        .await?,
                )
            }
            .boxed()
        })
        .await
        .expect("list transactions")
}
