//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `STOCKROOM_*` environment variables, and
//! configuration files, in that order of precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::SequenceRetryPolicy;
use crate::outbound::persistence::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, PoolConfig,
};

/// Settings shared by the stockroom binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOCKROOM")]
pub struct StockroomSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum open database connections.
    pub pool_max_size: Option<u32>,
    /// Idle database connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Attempts per identifier allocation before a conflict is returned.
    #[ortho_config(default = 3)]
    pub sequence_attempts: u32,
}

impl StockroomSettings {
    /// Maximum open connections, falling back to the pool default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_MAX_SIZE)
    }

    /// Idle connections, falling back to the pool default.
    pub fn pool_min_idle(&self) -> u32 {
        self.pool_min_idle.unwrap_or(DEFAULT_MIN_IDLE)
    }

    /// Checkout timeout, falling back to the pool default.
    pub fn pool_timeout(&self) -> Duration {
        self.pool_timeout_secs
            .map_or(DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs)
    }

    /// Pool settings for the configured database, if one is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size())
                .with_min_idle(Some(self.pool_min_idle()))
                .with_connection_timeout(self.pool_timeout()),
        )
    }

    /// Identifier allocation retry policy.
    pub fn retry_policy(&self) -> SequenceRetryPolicy {
        SequenceRetryPolicy::new(self.sequence_attempts)
    }
}
