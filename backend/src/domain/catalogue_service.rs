//! Reference data and consumable registration.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CatalogueCommand, ConsumableState, InventoryNotifier, InventoryStore,
    RegisterCategoryRequest, RegisterConsumableRequest, RegisterDepartmentRequest,
    RegisterLocationRequest, ScopedRepository, not_found,
};
use crate::domain::sequence::split_category_name;
use crate::domain::stock_ledger::MAX_QUANTITY;
use crate::domain::stock_ledger_service::{alert_event, reconcile_consumable_alert};
use crate::domain::{
    Category, CategoryId, Consumable, ConsumableId, DEFAULT_REORDER_LEVEL, Department,
    DepartmentId, Error, Location, LocationId, TenantContext,
};

fn required_name(field: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request(format!("{field} name must not be empty")));
    }
    Ok(trimmed.to_owned())
}

fn checked_reorder_level(level: u32) -> Result<u32, Error> {
    if level > MAX_QUANTITY {
        return Err(Error::invalid_request(format!(
            "reorder level must not exceed {MAX_QUANTITY}"
        )));
    }
    Ok(level)
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Catalogue service implementing [`CatalogueCommand`].
#[derive(Clone)]
pub struct CatalogueService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<S, N> CatalogueService<S, N> {
    /// Create a catalogue over `store`.
    pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }
}

#[async_trait]
impl<S, N> CatalogueCommand for CatalogueService<S, N>
where
    S: InventoryStore,
    N: InventoryNotifier,
{
    async fn register_category(
        &self,
        ctx: &TenantContext,
        request: RegisterCategoryRequest,
    ) -> Result<Category, Error> {
        let tenant_id = ctx.require_tenant()?;
        let name = required_name("category", &request.name)?;
        split_category_name(&name)?;
        let row = Category {
            id: CategoryId::random(),
            tenant_id: None,
            name,
            description: optional_text(request.description),
            created_at: self.clock.utc(),
        };

        let category = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move { Ok(ScopedRepository::<Category>::create(tx, row).await?) }.boxed()
            })
            .await?;
        info!(tenant_id = %tenant_id, category_id = %category.id, name = %category.name, "category registered");
        Ok(category)
    }

    async fn register_location(
        &self,
        ctx: &TenantContext,
        request: RegisterLocationRequest,
    ) -> Result<Location, Error> {
        let tenant_id = ctx.require_tenant()?;
        let row = Location {
            id: LocationId::random(),
            tenant_id: None,
            name: required_name("location", &request.name)?,
            address: optional_text(request.address),
            created_at: self.clock.utc(),
        };

        let location = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move { Ok(ScopedRepository::<Location>::create(tx, row).await?) }.boxed()
            })
            .await?;
        info!(tenant_id = %tenant_id, location_id = %location.id, name = %location.name, "location registered");
        Ok(location)
    }

    async fn register_department(
        &self,
        ctx: &TenantContext,
        request: RegisterDepartmentRequest,
    ) -> Result<Department, Error> {
        let tenant_id = ctx.require_tenant()?;
        let row = Department {
            id: DepartmentId::random(),
            tenant_id: None,
            name: required_name("department", &request.name)?,
            created_at: self.clock.utc(),
        };

        let department = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move { Ok(ScopedRepository::<Department>::create(tx, row).await?) }.boxed()
            })
            .await?;
        info!(tenant_id = %tenant_id, department_id = %department.id, name = %department.name, "department registered");
        Ok(department)
    }

    async fn register_consumable(
        &self,
        ctx: &TenantContext,
        request: RegisterConsumableRequest,
    ) -> Result<ConsumableState, Error> {
        let tenant_id = ctx.require_tenant()?;
        let now = self.clock.utc();
        let row = Consumable {
            id: ConsumableId::random(),
            tenant_id: None,
            name: required_name("consumable", &request.name)?,
            category: optional_text(request.category),
            brand: optional_text(request.brand),
            model: optional_text(request.model),
            unit_of_measure: optional_text(request.unit_of_measure),
            quantity: 0,
            reorder_level: checked_reorder_level(
                request.reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL),
            )?,
            created_at: now,
        };

        let state = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move {
                    let consumable = ScopedRepository::<Consumable>::create(tx, row).await?;
                    let alert = reconcile_consumable_alert(tx, &consumable, now).await?;
                    Ok(ConsumableState { consumable, alert })
                }
                .boxed()
            })
            .await?;

        info!(
            tenant_id = %tenant_id,
            consumable_id = %state.consumable.id,
            name = %state.consumable.name,
            reorder_level = state.consumable.reorder_level,
            "consumable registered"
        );
        if let Some(event) = alert_event(tenant_id, &state.consumable, &state.alert) {
            self.notifier.notify(event);
        }
        Ok(state)
    }

    async fn update_reorder_level(
        &self,
        ctx: &TenantContext,
        consumable_id: ConsumableId,
        reorder_level: u32,
    ) -> Result<ConsumableState, Error> {
        let tenant_id = ctx.require_tenant()?;
        let reorder_level = checked_reorder_level(reorder_level)?;
        let now = self.clock.utc();

        let state = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move {
                    let mut consumable =
                        ScopedRepository::<Consumable>::get_for_update(tx, consumable_id)
                            .await?
                            .ok_or_else(|| not_found::<Consumable>(consumable_id))?;
                    consumable.reorder_level = reorder_level;
                    let consumable = ScopedRepository::<Consumable>::update(tx, consumable).await?;
                    let alert = reconcile_consumable_alert(tx, &consumable, now).await?;
                    Ok(ConsumableState { consumable, alert })
                }
                .boxed()
            })
            .await?;

        info!(
            tenant_id = %tenant_id,
            consumable_id = %consumable_id,
            reorder_level,
            "reorder level updated"
        );
        if let Some(event) = alert_event(tenant_id, &state.consumable, &state.alert) {
            self.notifier.notify(event);
        }
        Ok(state)
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
