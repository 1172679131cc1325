//! Driving port for reading derived ledger state.

use async_trait::async_trait;

use crate::domain::{Alert, Error, PageRequest, TenantContext};

/// Read side of the stock ledger.
#[async_trait]
pub trait StockLedgerQuery: Send + Sync {
    /// Pending alerts of the caller's tenant, oldest first.
    async fn pending_alerts(
        &self,
        ctx: &TenantContext,
        page: PageRequest,
    ) -> Result<Vec<Alert>, Error>;
}
