//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL inventory store and tenant registry using
//!   Diesel ORM
//! - **notification**: sinks for committed inventory events
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod notification;
pub mod persistence;
