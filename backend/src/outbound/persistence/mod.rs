//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Connections come from a `bb8` pool of `diesel-async` connections. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private to
//! this module; only the store, the registry, and the pool are exported.
//!
//! # Example
//!
//! ```ignore
//! use stockroom::outbound::persistence::{DbPool, DieselInventoryStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/stockroom")).await?;
//! let store = DieselInventoryStore::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_inventory_store;
mod diesel_tenant_registry;
mod diesel_tenant_transaction;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_inventory_store::DieselInventoryStore;
pub use diesel_tenant_registry::DieselTenantRegistry;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
