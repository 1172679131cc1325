//! Stock movements with derived quantity and alert state.
//!
//! Every movement locks its consumable, applies the ledger rules, writes the
//! new balance and the ledger row, and reconciles the pending alert in one
//! transaction. Notifications go out only after that transaction commits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AlertChange, InventoryNotifier, InventoryStore, RecordStockMovementRequest, ScopedRepository,
    StockLedgerCommand, StockLedgerQuery, StockMovementOutcome, StockReversalOutcome,
    TenantTransaction, fetch_required, not_found,
};
use crate::domain::{
    Alert, AlertAction, AlertFilter, AlertId, AlertStatus, Consumable, ConsumableId, Department,
    Error, InventoryEvent, PageRequest, StockTransaction, StockTransactionId, TenantContext,
    TenantId, reconcile_alert,
};

/// Bring the pending alert of `consumable` in line with its stock level.
pub(crate) async fn reconcile_consumable_alert(
    tx: &mut dyn TenantTransaction,
    consumable: &Consumable,
    now: DateTime<Utc>,
) -> Result<AlertChange, Error> {
    let pending = ScopedRepository::<Alert>::list(
        tx,
        &AlertFilter::pending_for(consumable.id),
        PageRequest::single(),
    )
    .await?
    .into_iter()
    .next();

    match (reconcile_alert(consumable.stock_level(), pending.is_some()), pending) {
        (AlertAction::Open, _) => {
            let alert = Alert {
                id: AlertId::random(),
                tenant_id: None,
                consumable_id: consumable.id,
                message: consumable.low_stock_message(),
                status: AlertStatus::Pending,
                created_at: now,
                updated_at: now,
            };
            Ok(AlertChange::Opened(
                ScopedRepository::<Alert>::create(tx, alert).await?,
            ))
        }
        (AlertAction::Resolve, Some(mut alert)) => {
            alert.status = AlertStatus::Resolved;
            alert.updated_at = now;
            Ok(AlertChange::Resolved(
                ScopedRepository::<Alert>::update(tx, alert).await?,
            ))
        }
        _ => Ok(AlertChange::Unchanged),
    }
}

/// Event announcing an alert transition, if there was one.
pub(crate) fn alert_event(
    tenant_id: TenantId,
    consumable: &Consumable,
    change: &AlertChange,
) -> Option<InventoryEvent> {
    match change {
        AlertChange::Opened(alert) => Some(InventoryEvent::AlertRaised {
            tenant_id,
            alert_id: alert.id,
            consumable_id: consumable.id,
            message: alert.message.clone(),
            quantity: consumable.quantity,
            reorder_level: consumable.reorder_level,
        }),
        AlertChange::Resolved(alert) => Some(InventoryEvent::AlertResolved {
            tenant_id,
            alert_id: alert.id,
            consumable_id: consumable.id,
            quantity: consumable.quantity,
        }),
        AlertChange::Unchanged => None,
    }
}

async fn lock_consumable(
    tx: &mut dyn TenantTransaction,
    consumable_id: ConsumableId,
) -> Result<Consumable, Error> {
    Ok(ScopedRepository::<Consumable>::get_for_update(tx, consumable_id)
        .await?
        .ok_or_else(|| not_found::<Consumable>(consumable_id))?)
}

/// Stock ledger implementing [`StockLedgerCommand`] and [`StockLedgerQuery`].
#[derive(Clone)]
pub struct StockLedgerService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<S, N> StockLedgerService<S, N> {
    /// Create a ledger over `store`, publishing alert changes to `notifier`.
    pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }
}

impl<S, N> StockLedgerService<S, N>
where
    N: InventoryNotifier,
{
    fn publish(&self, tenant_id: TenantId, consumable: &Consumable, change: &AlertChange) {
        if let Some(event) = alert_event(tenant_id, consumable, change) {
            self.notifier.notify(event);
        }
    }
}

#[async_trait]
impl<S, N> StockLedgerCommand for StockLedgerService<S, N>
where
    S: InventoryStore,
    N: InventoryNotifier,
{
    async fn record_transaction(
        &self,
        ctx: &TenantContext,
        request: RecordStockMovementRequest,
    ) -> Result<StockMovementOutcome, Error> {
        let tenant_id = ctx.require_tenant()?;
        let user_id = ctx.require_actor()?;
        let now = self.clock.utc();
        let RecordStockMovementRequest {
            consumable_id,
            department_id,
            kind,
            quantity,
        } = request;

        let outcome = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move {
                    let mut consumable = lock_consumable(tx, consumable_id).await?;
                    fetch_required::<Department, _>(tx, department_id).await?;

                    let level = consumable.stock_level().apply(kind, quantity)?;
                    consumable.quantity = level.quantity();
                    let consumable = ScopedRepository::<Consumable>::update(tx, consumable).await?;

                    let transaction = ScopedRepository::<StockTransaction>::create(
                        tx,
                        StockTransaction {
                            id: StockTransactionId::random(),
                            tenant_id: None,
                            consumable_id,
                            kind,
                            quantity,
                            department_id,
                            user_id,
                            created_at: now,
                        },
                    )
                    .await?;
                    let alert = reconcile_consumable_alert(tx, &consumable, now).await?;
                    Ok(StockMovementOutcome {
                        transaction,
                        consumable,
                        alert,
                    })
                }
                .boxed()
            })
            .await
            .inspect_err(|err| {
                warn!(
                    tenant_id = %tenant_id,
                    consumable_id = %consumable_id,
                    movement = kind.as_str(),
                    quantity,
                    error = %err,
                    "stock movement rejected"
                );
            })?;

        info!(
            tenant_id = %tenant_id,
            consumable_id = %consumable_id,
            movement = kind.as_str(),
            quantity,
            balance = outcome.consumable.quantity,
            "stock movement recorded"
        );
        self.publish(tenant_id, &outcome.consumable, &outcome.alert);
        Ok(outcome)
    }

    async fn delete_transaction(
        &self,
        ctx: &TenantContext,
        transaction_id: StockTransactionId,
    ) -> Result<StockReversalOutcome, Error> {
        let tenant_id = ctx.require_tenant()?;
        let now = self.clock.utc();

        let outcome = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move {
                    let entry =
                        fetch_required::<StockTransaction, _>(tx, transaction_id).await?;
                    let mut consumable = lock_consumable(tx, entry.consumable_id).await?;

                    let level = consumable
                        .stock_level()
                        .reverse(entry.kind, entry.quantity)?;
                    consumable.quantity = level.quantity();
                    let consumable = ScopedRepository::<Consumable>::update(tx, consumable).await?;

                    let reversed =
                        ScopedRepository::<StockTransaction>::delete(tx, transaction_id).await?;
                    let alert = reconcile_consumable_alert(tx, &consumable, now).await?;
                    Ok(StockReversalOutcome {
                        reversed,
                        consumable,
                        alert,
                    })
                }
                .boxed()
            })
            .await
            .inspect_err(|err| {
                warn!(
                    tenant_id = %tenant_id,
                    transaction_id = %transaction_id,
                    error = %err,
                    "stock reversal rejected"
                );
            })?;

        info!(
            tenant_id = %tenant_id,
            transaction_id = %transaction_id,
            consumable_id = %outcome.consumable.id,
            balance = outcome.consumable.quantity,
            "stock movement reversed"
        );
        self.publish(tenant_id, &outcome.consumable, &outcome.alert);
        Ok(outcome)
    }

    async fn resync_alert(
        &self,
        ctx: &TenantContext,
        consumable_id: ConsumableId,
    ) -> Result<AlertChange, Error> {
        let tenant_id = ctx.require_tenant()?;
        let now = self.clock.utc();

        let (consumable, change) = self
            .store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move {
                    let consumable = lock_consumable(tx, consumable_id).await?;
                    let change = reconcile_consumable_alert(tx, &consumable, now).await?;
                    Ok((consumable, change))
                }
                .boxed()
            })
            .await?;

        self.publish(tenant_id, &consumable, &change);
        Ok(change)
    }
}

#[async_trait]
impl<S, N> StockLedgerQuery for StockLedgerService<S, N>
where
    S: InventoryStore,
    N: InventoryNotifier,
{
    async fn pending_alerts(
        &self,
        ctx: &TenantContext,
        page: PageRequest,
    ) -> Result<Vec<Alert>, Error> {
        let tenant_id = ctx.require_tenant()?;
        self.store
            .in_tenant_transaction(tenant_id, move |tx| {
                async move {
                    Ok(ScopedRepository::<Alert>::list(tx, &AlertFilter::pending(), page).await?)
                }
                .boxed()
            })
            .await
    }
}

#[cfg(test)]
#[path = "stock_ledger_service_tests.rs"]
mod tests;
