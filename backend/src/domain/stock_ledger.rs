//! Stock bookkeeping rules.
//!
//! A consumable is either `OK` (quantity at or above its reorder level) or
//! `LOW` (below it). Alert state is a pure function of that comparison:
//! [`reconcile_alert`] says what has to happen to the pending alert after any
//! quantity change, so re-running it on an unchanged level is a no-op.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Error;
use super::inventory::UnknownVariant;

/// Upper bound on a stored quantity (PostgreSQL `INTEGER`).
pub const MAX_QUANTITY: u32 = 2_147_483_647;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Stock received.
    In,
    /// Stock issued.
    Out,
}

impl MovementKind {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    const fn inverse(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            other => Err(UnknownVariant::new("movement kind", other)),
        }
    }
}

/// Ways a movement can break the ledger invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Issuing more than is on hand.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Amount requested.
        requested: u32,
        /// Amount on hand.
        available: u32,
    },
    /// Receiving past the storable maximum.
    #[error("stock quantity would exceed {MAX_QUANTITY}")]
    QuantityOverflow,
    /// Movements must move something.
    #[error("movement quantity must be positive")]
    ZeroQuantity,
}

impl From<LedgerError> for Error {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::InsufficientStock {
                requested,
                available,
            } => Error::invalid_state(value.to_string()).with_details(serde_json::json!({
                "requested": requested,
                "available": available,
            })),
            LedgerError::QuantityOverflow => Error::invalid_state(value.to_string()),
            LedgerError::ZeroQuantity => Error::invalid_request(value.to_string()),
        }
    }
}

/// Quantity on hand against the reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    quantity: u32,
    reorder_level: u32,
}

impl StockLevel {
    /// Pair a quantity with its reorder level.
    pub const fn new(quantity: u32, reorder_level: u32) -> Self {
        Self {
            quantity,
            reorder_level,
        }
    }

    /// Quantity on hand.
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Reorder threshold.
    pub const fn reorder_level(&self) -> u32 {
        self.reorder_level
    }

    /// True when the quantity is below the reorder level.
    pub const fn is_low(&self) -> bool {
        self.quantity < self.reorder_level
    }

    /// Level after recording a movement.
    ///
    /// # Examples
    /// ```
    /// use stockroom::domain::{MovementKind, StockLevel};
    ///
    /// let level = StockLevel::new(12, 10).apply(MovementKind::Out, 3).expect("enough stock");
    /// assert_eq!(level.quantity(), 9);
    /// assert!(level.is_low());
    /// assert!(StockLevel::new(9, 10).apply(MovementKind::Out, 50).is_err());
    /// ```
    pub fn apply(self, kind: MovementKind, amount: u32) -> Result<Self, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroQuantity);
        }
        let quantity = match kind {
            MovementKind::In => self
                .quantity
                .checked_add(amount)
                .filter(|total| *total <= MAX_QUANTITY)
                .ok_or(LedgerError::QuantityOverflow)?,
            MovementKind::Out => {
                self.quantity
                    .checked_sub(amount)
                    .ok_or(LedgerError::InsufficientStock {
                        requested: amount,
                        available: self.quantity,
                    })?
            }
        };
        Ok(Self { quantity, ..self })
    }

    /// Level after undoing a previously recorded movement.
    ///
    /// Undoing a receipt whose stock has since been issued fails with
    /// [`LedgerError::InsufficientStock`] rather than going negative.
    pub fn reverse(self, kind: MovementKind, amount: u32) -> Result<Self, LedgerError> {
        self.apply(kind.inverse(), amount)
    }
}

/// What to do with a consumable's pending alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Stock is low and nothing is pending: raise an alert.
    Open,
    /// Stock recovered while an alert is pending: resolve it.
    Resolve,
    /// Alert state already matches the level.
    Keep,
}

/// Derive the alert transition for `level` given whether an alert is pending.
///
/// # Examples
/// ```
/// use stockroom::domain::{AlertAction, StockLevel, reconcile_alert};
///
/// assert_eq!(reconcile_alert(StockLevel::new(9, 10), false), AlertAction::Open);
/// assert_eq!(reconcile_alert(StockLevel::new(9, 10), true), AlertAction::Keep);
/// assert_eq!(reconcile_alert(StockLevel::new(14, 10), true), AlertAction::Resolve);
/// ```
pub const fn reconcile_alert(level: StockLevel, has_pending: bool) -> AlertAction {
    match (level.is_low(), has_pending) {
        (true, false) => AlertAction::Open,
        (false, true) => AlertAction::Resolve,
        _ => AlertAction::Keep,
    }
}
