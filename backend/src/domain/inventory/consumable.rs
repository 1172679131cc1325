//! Consumables, their stock ledger entries, and reorder alerts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{AlertId, ConsumableId, DepartmentId, StockTransactionId, TenantId, UserId};
use crate::domain::stock_ledger::{MovementKind, StockLevel};
use crate::domain::tenancy::impl_tenant_owned;

/// Reorder level applied when registration does not specify one.
pub const DEFAULT_REORDER_LEVEL: u32 = 10;

/// Error returned when parsing a stored enum label fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    /// Enum being parsed.
    pub kind: &'static str,
    /// Offending label.
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// A stocked item whose quantity is maintained by the stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    /// Consumable identifier.
    pub id: ConsumableId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Display name, used in alert messages.
    pub name: String,
    /// Free-form category label.
    pub category: Option<String>,
    /// Brand.
    pub brand: Option<String>,
    /// Model.
    pub model: Option<String>,
    /// Unit the quantity is counted in.
    pub unit_of_measure: Option<String>,
    /// Current balance. Only the stock ledger writes it.
    pub quantity: u32,
    /// Threshold below which the consumable is low on stock.
    pub reorder_level: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Consumable {
    /// Current balance against the reorder threshold.
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::new(self.quantity, self.reorder_level)
    }

    /// Message carried by alerts raised for this consumable.
    pub fn low_stock_message(&self) -> String {
        format!("Stock for {} is below reorder level.", self.name)
    }
}

/// Filter for consumable listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumableFilter {
    /// Exact name match.
    pub name: Option<String>,
    /// Only consumables whose quantity is below their reorder level.
    pub low_stock_only: bool,
}

/// Immutable stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    /// Ledger entry identifier.
    pub id: StockTransactionId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Consumable moved.
    pub consumable_id: ConsumableId,
    /// Direction of the movement.
    pub kind: MovementKind,
    /// Positive amount moved.
    pub quantity: u32,
    /// Department receiving or returning stock.
    pub department_id: DepartmentId,
    /// User who recorded the movement.
    pub user_id: UserId,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}

/// Filter for ledger listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockTransactionFilter {
    /// Restrict to one consumable.
    pub consumable_id: Option<ConsumableId>,
    /// Restrict to one direction.
    pub kind: Option<MovementKind>,
    /// Restrict to one department.
    pub department_id: Option<DepartmentId>,
}

/// Lifecycle of a reorder alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    /// Stock is below the reorder level.
    Pending,
    /// Stock has been replenished.
    Resolved,
}

impl AlertStatus {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "RESOLVED" => Ok(Self::Resolved),
            other => Err(UnknownVariant::new("alert status", other)),
        }
    }
}

/// Reorder alert for a consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert identifier.
    pub id: AlertId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Consumable that ran low.
    pub consumable_id: ConsumableId,
    /// Human-readable message.
    pub message: String,
    /// Current status.
    pub status: AlertStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

/// Filter for alert listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    /// Restrict to one consumable.
    pub consumable_id: Option<ConsumableId>,
    /// Restrict to one status.
    pub status: Option<AlertStatus>,
}

impl AlertFilter {
    /// Pending alerts across the tenant.
    pub fn pending() -> Self {
        Self {
            consumable_id: None,
            status: Some(AlertStatus::Pending),
        }
    }

    /// The pending alert of one consumable.
    pub fn pending_for(consumable_id: ConsumableId) -> Self {
        Self {
            consumable_id: Some(consumable_id),
            status: Some(AlertStatus::Pending),
        }
    }
}

impl_tenant_owned!(Consumable, ConsumableId, ConsumableFilter, "consumable");
impl_tenant_owned!(
    StockTransaction,
    StockTransactionId,
    StockTransactionFilter,
    "stock transaction"
);
impl_tenant_owned!(Alert, AlertId, AlertFilter, "alert");

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PENDING", AlertStatus::Pending)]
    #[case("RESOLVED", AlertStatus::Resolved)]
    fn alert_status_labels_parse(#[case] label: &str, #[case] status: AlertStatus) {
        assert_eq!(label.parse::<AlertStatus>(), Ok(status));
        assert_eq!(status.as_str(), label);
    }

    #[rstest]
    fn unknown_alert_status_is_rejected() {
        let err = "OPEN".parse::<AlertStatus>().expect_err("unknown label");
        assert_eq!(err.to_string(), "unknown alert status `OPEN`");
    }
}
