//! Domain primitives, rules and services of the inventory ledger.
//!
//! Purpose: keep tenant isolation, identifier sequencing and stock
//! bookkeeping free of persistence concerns. Services reach storage only
//! through the ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - TenantContext: the acting tenant and user of one operation.
//! - Entities (Asset, Consumable, ...) and their filters.
//! - `sequence` and `stock_ledger`: pure identifier and stock rules.
//! - Services implementing the driving ports.

pub mod error;
pub mod ids;
pub mod inventory;
pub mod inventory_events;
pub mod pagination;
pub mod ports;
pub mod sequence;
pub mod stock_ledger;
pub mod tenancy;

mod asset_registry_service;
mod catalogue_service;
mod stock_ledger_service;

#[cfg(test)]
mod service_fixtures;

pub use self::asset_registry_service::{AssetRegistryService, SequenceRetryPolicy};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    AlertId, AssetId, CategoryId, ConsumableId, DepartmentId, LocationId, StatusId,
    StockTransactionId, TenantId, UserId,
};
pub use self::inventory::{
    Alert, AlertFilter, AlertStatus, Asset, AssetFilter, Category, CategoryFilter, Consumable,
    ConsumableFilter, DEFAULT_REORDER_LEVEL, Department, DepartmentFilter, Location,
    LocationFilter, StockTransaction, StockTransactionFilter, UnknownVariant,
};
pub use self::inventory_events::InventoryEvent;
pub use self::pagination::PageRequest;
pub use self::stock_ledger::{AlertAction, LedgerError, MovementKind, StockLevel, reconcile_alert};
pub use self::stock_ledger_service::StockLedgerService;
pub use self::tenancy::{Tenant, TenantContext, TenantOwned};
