//! Notifier writing each event to the tracing pipeline.

use tracing::{info, warn};

use crate::domain::InventoryEvent;
use crate::domain::ports::InventoryNotifier;

/// Logs every event. Low-stock alerts are logged at `WARN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Create a notifier.
    pub const fn new() -> Self {
        Self
    }
}

impl InventoryNotifier for TracingNotifier {
    fn notify(&self, event: InventoryEvent) {
        match &event {
            InventoryEvent::AlertRaised {
                tenant_id,
                alert_id,
                consumable_id,
                message,
                quantity,
                reorder_level,
            } => warn!(
                event = event.kind(),
                tenant_id = %tenant_id,
                alert_id = %alert_id,
                consumable_id = %consumable_id,
                quantity,
                reorder_level,
                "{message}"
            ),
            InventoryEvent::AlertResolved {
                tenant_id,
                alert_id,
                consumable_id,
                quantity,
            } => info!(
                event = event.kind(),
                tenant_id = %tenant_id,
                alert_id = %alert_id,
                consumable_id = %consumable_id,
                quantity,
                "low stock alert resolved"
            ),
            InventoryEvent::AssetProvisioned {
                tenant_id,
                asset_id,
                tag,
                name,
            } => info!(
                event = event.kind(),
                tenant_id = %tenant_id,
                asset_id = %asset_id,
                tag = %tag,
                name = %name,
                "asset provisioned"
            ),
        }
    }
}
