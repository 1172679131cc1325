//! Tenant-scoped inventory ledger.
//!
//! - [`domain`]: entities, identifier sequencing, stock rules and services.
//! - [`outbound`]: PostgreSQL persistence and notification adapters.
//! - [`config`]: runtime settings.

pub mod config;
pub mod domain;
pub mod outbound;
