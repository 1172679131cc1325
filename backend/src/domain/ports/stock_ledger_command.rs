//! Driving port for stock movements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Alert, Consumable, ConsumableId, DepartmentId, Error, MovementKind, StockTransaction,
    StockTransactionId, TenantContext,
};

/// Payload for recording a stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStockMovementRequest {
    pub consumable_id: ConsumableId,
    pub department_id: DepartmentId,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: u32,
}

/// What a mutation did to the consumable's pending alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertChange {
    /// A pending alert was raised.
    Opened(Alert),
    /// The pending alert was resolved.
    Resolved(Alert),
    /// Alert state already matched the quantity.
    Unchanged,
}

/// Result of recording a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovementOutcome {
    /// Ledger entry written.
    pub transaction: StockTransaction,
    /// Consumable after the movement.
    pub consumable: Consumable,
    /// Alert transition caused by the movement.
    pub alert: AlertChange,
}

/// Result of deleting a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReversalOutcome {
    /// Ledger entry removed.
    pub reversed: StockTransaction,
    /// Consumable after the reversal.
    pub consumable: Consumable,
    /// Alert transition caused by the reversal.
    pub alert: AlertChange,
}

/// Driving port for the stock ledger.
#[async_trait]
pub trait StockLedgerCommand: Send + Sync {
    /// Record an `IN` or `OUT` movement and re-derive the alert.
    async fn record_transaction(
        &self,
        ctx: &TenantContext,
        request: RecordStockMovementRequest,
    ) -> Result<StockMovementOutcome, Error>;

    /// Delete a movement, reversing its quantity effect and re-deriving the alert.
    async fn delete_transaction(
        &self,
        ctx: &TenantContext,
        transaction_id: StockTransactionId,
    ) -> Result<StockReversalOutcome, Error>;

    /// Re-derive the alert of a consumable from its current quantity.
    async fn resync_alert(
        &self,
        ctx: &TenantContext,
        consumable_id: ConsumableId,
    ) -> Result<AlertChange, Error>;
}
