//! Inventory entities owned by a tenant.
//!
//! Entities are plain records. Identifier derivation lives in
//! [`crate::domain::sequence`] and stock bookkeeping in
//! [`crate::domain::stock_ledger`]; services combine them with the scoped
//! repositories.

mod asset;
mod catalogue;
mod consumable;

pub use asset::{Asset, AssetFilter};
pub use catalogue::{
    Category, CategoryFilter, Department, DepartmentFilter, Location, LocationFilter,
};
pub use consumable::{
    Alert, AlertFilter, AlertStatus, Consumable, ConsumableFilter, DEFAULT_REORDER_LEVEL,
    StockTransaction, StockTransactionFilter, UnknownVariant,
};
