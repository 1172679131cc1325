//! Shared helpers for the stockroom integration tests.
//!
//! Integration tests compile as separate crates, so helpers live here and
//! each suite pulls them in with `mod support;`.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use postgres::{Client, NoTls};
use stockroom::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tokio::runtime::Runtime;

pub mod pg_embed;

/// Render a `postgres` error with its SQLSTATE and message.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!("postgres error {:?}: {}", db_error.code(), db_error.message());
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is set, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Drop and recreate `name` through the `postgres` maintenance database.
pub fn reset_database(admin_url: &str, name: &str) -> Result<(), String> {
    let mut client = Client::connect(admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Migrate `database_url` and open a small pool on it.
pub fn migrated_pool(runtime: &Runtime, database_url: &str) -> Result<DbPool, String> {
    runtime
        .block_on(run_pending_migrations(database_url))
        .map_err(|err| err.to_string())?;
    let config = PoolConfig::new(database_url)
        .with_max_size(4)
        .with_min_idle(Some(1));
    runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())
}
