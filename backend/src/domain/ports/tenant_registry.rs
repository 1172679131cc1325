//! Port for the tenant table itself.
//!
//! Tenants are the isolation boundary, so this is the one repository that is
//! not tenant scoped.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Tenant, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tenant registry adapters.
    pub enum TenantRegistryError {
        /// The store could not be reached.
        Connection { message: String } => ServiceUnavailable: "tenant registry connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "tenant registry query failed: {message}",
        /// Another tenant already uses the name.
        DuplicateName { name: String } => Conflict: "tenant name `{name}` is already registered",
    }
}

/// Port for creating and resolving tenants.
#[async_trait]
pub trait TenantRegistry: Send + Sync {
    /// Persist a new tenant.
    async fn register(&self, tenant: &Tenant) -> Result<(), TenantRegistryError>;

    /// Find a tenant by id.
    async fn find(&self, tenant_id: TenantId) -> Result<Option<Tenant>, TenantRegistryError>;
}

/// Tenant registry held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTenantRegistry {
    tenants: RwLock<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantRegistry for InMemoryTenantRegistry {
    async fn register(&self, tenant: &Tenant) -> Result<(), TenantRegistryError> {
        let mut tenants = self.tenants.write().await;
        if tenants
            .values()
            .any(|existing| existing.id != tenant.id && existing.name == tenant.name)
        {
            return Err(TenantRegistryError::duplicate_name(tenant.name.clone()));
        }
        tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    async fn find(&self, tenant_id: TenantId) -> Result<Option<Tenant>, TenantRegistryError> {
        Ok(self.tenants.read().await.get(&tenant_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{Error, ErrorCode};

    fn tenant(name: &str) -> Tenant {
        Tenant {
            id: TenantId::random(),
            name: name.to_owned(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn registered_tenants_can_be_found() {
        let registry = InMemoryTenantRegistry::new();
        let acme = tenant("acme");
        registry.register(&acme).await.expect("register");
        assert_eq!(registry.find(acme.id).await.expect("find"), Some(acme));
        assert_eq!(registry.find(TenantId::random()).await.expect("find"), None);
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let registry = InMemoryTenantRegistry::new();
        registry.register(&tenant("acme")).await.expect("first");
        let err = registry
            .register(&tenant("acme"))
            .await
            .expect_err("second tenant with the same name");
        assert_eq!(err, TenantRegistryError::duplicate_name("acme"));
    }

    #[rstest]
    #[case(TenantRegistryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(TenantRegistryError::query("syntax"), ErrorCode::InternalError)]
    #[case(TenantRegistryError::duplicate_name("acme"), ErrorCode::Conflict)]
    fn registry_errors_map_to_domain_codes(
        #[case] error: TenantRegistryError,
        #[case] code: ErrorCode,
    ) {
        assert_eq!(Error::from(error).code(), code);
    }
}
