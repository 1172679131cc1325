//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`InventoryStore`, `TenantRegistry`, `InventoryNotifier`) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod asset_registry_command;
mod catalogue_command;
mod in_memory_inventory_store;
mod inventory_notifier;
mod inventory_store;
mod scoped_repository;
mod stock_ledger_command;
mod stock_ledger_query;
mod tenant_registry;

pub use asset_registry_command::{AssetRegistryCommand, RegisterAssetRequest, UpdateAssetRequest};
pub use catalogue_command::{
    CatalogueCommand, ConsumableState, RegisterCategoryRequest, RegisterConsumableRequest,
    RegisterDepartmentRequest, RegisterLocationRequest,
};
pub use in_memory_inventory_store::InMemoryInventoryStore;
#[cfg(test)]
pub use inventory_notifier::MockInventoryNotifier;
pub use inventory_notifier::{InventoryNotifier, NoOpNotifier};
pub use inventory_store::{InventoryStore, TenantTransaction, TransactionWork};
pub use scoped_repository::{
    AssetIdentifierLookup, ScopedRepository, StoreError, claim_for_tenant, fetch_required,
    not_found,
};
pub use stock_ledger_command::{
    AlertChange, RecordStockMovementRequest, StockLedgerCommand, StockMovementOutcome,
    StockReversalOutcome,
};
pub use stock_ledger_query::StockLedgerQuery;
pub use tenant_registry::{InMemoryTenantRegistry, TenantRegistry, TenantRegistryError};
