//! Events published after inventory changes commit.
//!
//! Events stay transport agnostic; notifier adapters decide whether they
//! become log lines, channel messages, or emails.

use serde::Serialize;

use super::ids::{AlertId, AssetId, ConsumableId, TenantId};

/// A committed change other systems may want to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InventoryEvent {
    /// A consumable dropped below its reorder level.
    #[serde(rename_all = "camelCase")]
    AlertRaised {
        /// Owning tenant.
        tenant_id: TenantId,
        /// New pending alert.
        alert_id: AlertId,
        /// Consumable running low.
        consumable_id: ConsumableId,
        /// Alert message.
        message: String,
        /// Quantity at the time the alert opened.
        quantity: u32,
        /// Threshold that was crossed.
        reorder_level: u32,
    },
    /// A consumable was replenished to its reorder level.
    #[serde(rename_all = "camelCase")]
    AlertResolved {
        /// Owning tenant.
        tenant_id: TenantId,
        /// Alert that was resolved.
        alert_id: AlertId,
        /// Consumable replenished.
        consumable_id: ConsumableId,
        /// Quantity at the time the alert resolved.
        quantity: u32,
    },
    /// An asset was registered.
    #[serde(rename_all = "camelCase")]
    AssetProvisioned {
        /// Owning tenant.
        tenant_id: TenantId,
        /// New asset.
        asset_id: AssetId,
        /// Assigned tag.
        tag: String,
        /// Assigned name.
        name: String,
    },
}

impl InventoryEvent {
    /// Tenant the event belongs to.
    pub const fn tenant_id(&self) -> TenantId {
        match self {
            Self::AlertRaised { tenant_id, .. }
            | Self::AlertResolved { tenant_id, .. }
            | Self::AssetProvisioned { tenant_id, .. } => *tenant_id,
        }
    }

    /// Short event name for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AlertRaised { .. } => "alert_raised",
            Self::AlertResolved { .. } => "alert_resolved",
            Self::AssetProvisioned { .. } => "asset_provisioned",
        }
    }
}
