//! Asset registration with derived tags and names.
//!
//! Tags and names are computed inside the transaction that writes the asset:
//! the prefix is locked, the greatest existing identifier is read, and the
//! next one is inserted before the lock is released. A uniqueness conflict
//! that still slips through is retried in a fresh transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AssetRegistryCommand, InventoryNotifier, InventoryStore, RegisterAssetRequest,
    ScopedRepository, TenantTransaction, TransactionWork, UpdateAssetRequest, fetch_required,
    not_found,
};
use crate::domain::sequence::{IdentifierPrefix, name_prefix, next_identifier, tag_prefix};
use crate::domain::{
    Asset, AssetId, Category, CategoryId, Department, DepartmentId, Error, InventoryEvent,
    Location, LocationId, TenantContext, TenantId,
};

/// How many transactions a registration may use before a conflict is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRetryPolicy {
    max_attempts: u32,
}

impl SequenceRetryPolicy {
    /// Attempts used when nothing is configured.
    pub const DEFAULT_ATTEMPTS: u32 = 3;

    /// Allow up to `max_attempts` transactions; zero is treated as one.
    pub const fn new(max_attempts: u32) -> Self {
        let max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        Self { max_attempts }
    }

    /// Upper bound on transactions per registration.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for SequenceRetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS)
    }
}

/// Asset registry implementing [`AssetRegistryCommand`].
#[derive(Clone)]
pub struct AssetRegistryService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    retry: SequenceRetryPolicy,
}

impl<S, N> AssetRegistryService<S, N> {
    /// Create a registry over `store`, publishing to `notifier`.
    pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            notifier,
            clock,
            retry: SequenceRetryPolicy::default(),
        }
    }

    /// Replace the conflict retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: SequenceRetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<S, N> AssetRegistryService<S, N>
where
    S: InventoryStore,
    N: InventoryNotifier,
{
    async fn run_with_sequence_retry<R, T>(
        &self,
        tenant_id: TenantId,
        input: R,
        work: for<'t> fn(&'t mut dyn TenantTransaction, R) -> TransactionWork<'t, T>,
    ) -> Result<T, Error>
    where
        R: Clone + Send + 'static,
        T: Send + 'static,
    {
        let mut attempt = 1;
        loop {
            let attempt_input = input.clone();
            let outcome = self
                .store
                .in_tenant_transaction(tenant_id, move |tx| work(tx, attempt_input))
                .await;
            match outcome {
                Err(err) if err.is_conflict() && attempt < self.retry.max_attempts() => {
                    warn!(
                        tenant_id = %tenant_id,
                        attempt,
                        error = %err,
                        "asset identifier conflict; retrying in a new transaction"
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl<S, N> AssetRegistryCommand for AssetRegistryService<S, N>
where
    S: InventoryStore,
    N: InventoryNotifier,
{
    async fn register_asset(
        &self,
        ctx: &TenantContext,
        request: RegisterAssetRequest,
    ) -> Result<Asset, Error> {
        let tenant_id = ctx.require_tenant()?;
        let now = self.clock.utc();
        let asset = self
            .run_with_sequence_retry(tenant_id, (request, now), register_work)
            .await?;

        info!(
            tenant_id = %tenant_id,
            asset_id = %asset.id,
            tag = %asset.tag,
            name = %asset.name,
            "asset registered"
        );
        self.notifier.notify(InventoryEvent::AssetProvisioned {
            tenant_id,
            asset_id: asset.id,
            tag: asset.tag.clone(),
            name: asset.name.clone(),
        });
        Ok(asset)
    }

    async fn update_asset(
        &self,
        ctx: &TenantContext,
        asset_id: AssetId,
        request: UpdateAssetRequest,
    ) -> Result<Asset, Error> {
        let tenant_id = ctx.require_tenant()?;
        let now = self.clock.utc();
        let asset = self
            .run_with_sequence_retry(tenant_id, (asset_id, request, now), update_work)
            .await?;

        info!(
            tenant_id = %tenant_id,
            asset_id = %asset.id,
            tag = %asset.tag,
            name = %asset.name,
            "asset updated"
        );
        Ok(asset)
    }
}

/// Reference rows an asset's identifiers are derived from.
struct Placement {
    category: Category,
    location: Location,
    department: Department,
}

impl Placement {
    async fn load(
        tx: &mut dyn TenantTransaction,
        category_id: CategoryId,
        location_id: LocationId,
        department_id: DepartmentId,
    ) -> Result<Self, Error> {
        let category = fetch_required::<Category, _>(tx, category_id).await?;
        let location = fetch_required::<Location, _>(tx, location_id).await?;
        let department = fetch_required::<Department, _>(tx, department_id).await?;
        Ok(Self {
            category,
            location,
            department,
        })
    }

    fn tag_prefix(&self) -> Result<IdentifierPrefix, Error> {
        Ok(tag_prefix(&self.category.name)?)
    }

    fn name_prefix(&self) -> Result<IdentifierPrefix, Error> {
        Ok(name_prefix(
            &self.location.name,
            &self.department.name,
            &self.category.name,
        )?)
    }
}

async fn next_in_sequence(
    tx: &mut dyn TenantTransaction,
    prefix: &IdentifierPrefix,
) -> Result<String, Error> {
    tx.lock_identifier_prefix(prefix).await?;
    let greatest = tx.greatest_identifier(prefix).await?;
    Ok(next_identifier(prefix, greatest.as_deref())?)
}

fn register_work(
    tx: &mut dyn TenantTransaction,
    (request, now): (RegisterAssetRequest, DateTime<Utc>),
) -> TransactionWork<'_, Asset> {
    async move {
        let placement = Placement::load(
            tx,
            request.category_id,
            request.location_id,
            request.department_id,
        )
        .await?;
        // Both prefixes are validated before either lock is taken; tag locks
        // always precede name locks.
        let tag_prefix = placement.tag_prefix()?;
        let name_prefix = placement.name_prefix()?;
        let tag = next_in_sequence(tx, &tag_prefix).await?;
        let name = next_in_sequence(tx, &name_prefix).await?;

        let asset = Asset {
            id: AssetId::random(),
            tenant_id: request.tenant_id,
            tag,
            tag_prefix: tag_prefix.as_str().to_owned(),
            name,
            name_prefix: name_prefix.as_str().to_owned(),
            category_id: request.category_id,
            location_id: request.location_id,
            department_id: request.department_id,
            assigned_to: request.assigned_to,
            status_id: request.status_id,
            serial_number: request.serial_number,
            created_at: now,
            updated_at: now,
        };
        Ok(ScopedRepository::<Asset>::create(tx, asset).await?)
    }
    .boxed()
}

fn update_work(
    tx: &mut dyn TenantTransaction,
    (asset_id, request, now): (AssetId, UpdateAssetRequest, DateTime<Utc>),
) -> TransactionWork<'_, Asset> {
    async move {
        let mut asset = ScopedRepository::<Asset>::get_for_update(tx, asset_id)
            .await?
            .ok_or_else(|| not_found::<Asset>(asset_id))?;

        let category_changed = request
            .category_id
            .is_some_and(|id| id != asset.category_id);
        let site_changed = request
            .location_id
            .is_some_and(|id| id != asset.location_id)
            || request
                .department_id
                .is_some_and(|id| id != asset.department_id);

        let UpdateAssetRequest {
            category_id,
            location_id,
            department_id,
            assigned_to,
            status_id,
            serial_number,
        } = request;
        asset.category_id = category_id.unwrap_or(asset.category_id);
        asset.location_id = location_id.unwrap_or(asset.location_id);
        asset.department_id = department_id.unwrap_or(asset.department_id);
        asset.assigned_to = assigned_to.or(asset.assigned_to);
        asset.status_id = status_id.or(asset.status_id);
        asset.serial_number = serial_number.or(asset.serial_number);

        if category_changed || site_changed {
            let placement = Placement::load(
                tx,
                asset.category_id,
                asset.location_id,
                asset.department_id,
            )
            .await?;
            let tag_prefix = placement.tag_prefix()?;
            let name_prefix = placement.name_prefix()?;
            if category_changed {
                asset.tag = next_in_sequence(tx, &tag_prefix).await?;
                asset.tag_prefix = tag_prefix.as_str().to_owned();
            }
            asset.name = next_in_sequence(tx, &name_prefix).await?;
            asset.name_prefix = name_prefix.as_str().to_owned();
        }

        asset.updated_at = now;
        Ok(ScopedRepository::<Asset>::update(tx, asset).await?)
    }
    .boxed()
}

#[cfg(test)]
#[path = "asset_registry_service_tests.rs"]
mod tests;
