//! Tenant-scoped data access.
//!
//! One generic repository contract covers every tenant-bearing entity. An
//! implementation is bound to exactly one tenant when it is constructed (see
//! [`super::InventoryStore`]) and must append that tenant to every predicate:
//! rows owned by another tenant, or by no tenant, behave as if they did not
//! exist.

use async_trait::async_trait;

use crate::domain::sequence::IdentifierPrefix;
use crate::domain::tenancy::TenantOwned;
use crate::domain::{PageRequest, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by scoped repository adapters.
    pub enum StoreError {
        /// The store could not be reached.
        Connection { message: String } => ServiceUnavailable: "inventory store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "inventory store query failed: {message}",
        /// The row does not exist within the active tenant.
        NotFound { entity: String, id: String } => NotFound: "{entity} {id} not found",
        /// A uniqueness constraint rejected the write.
        Conflict { constraint: String } => Conflict: "inventory store uniqueness conflict on {constraint}",
        /// The row names a tenant other than the active one.
        TenantMismatch { entity: String } => Unauthorized: "{entity} belongs to a different tenant",
    }
}

/// Stamp `row` with the active tenant, or reject a forged assignment.
///
/// Unset tenants are filled in; a matching tenant is accepted; any other
/// tenant fails with [`StoreError::TenantMismatch`].
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use stockroom::domain::ports::claim_for_tenant;
/// use stockroom::domain::{Department, DepartmentId, TenantId};
///
/// let tenant = TenantId::random();
/// let department = Department {
///     id: DepartmentId::random(),
///     tenant_id: None,
///     name: "ICT".to_owned(),
///     created_at: Utc::now(),
/// };
/// let stamped = claim_for_tenant(tenant, department).expect("unset tenant is stamped");
/// assert_eq!(stamped.tenant_id, Some(tenant));
///
/// let forged = Department { tenant_id: Some(TenantId::random()), ..stamped };
/// assert!(claim_for_tenant(tenant, forged).is_err());
/// ```
pub fn claim_for_tenant<E: TenantOwned>(tenant_id: TenantId, mut row: E) -> Result<E, StoreError> {
    match row.tenant_id() {
        None => {
            row.assign_tenant(tenant_id);
            Ok(row)
        }
        Some(owner) if owner == tenant_id => Ok(row),
        Some(_) => Err(StoreError::tenant_mismatch(E::ENTITY)),
    }
}

/// Not-found error for an entity key.
pub fn not_found<E: TenantOwned>(id: E::Id) -> StoreError {
    StoreError::not_found(E::ENTITY, id.to_string())
}

/// Fetch a row owned by the tenant, failing with `NotFound` when it is absent.
///
/// Call it with an explicit entity type, since one transaction implements
/// the repository for every entity: `fetch_required::<Category, _>(tx, id)`.
pub async fn fetch_required<E, R>(repo: &mut R, id: E::Id) -> Result<E, StoreError>
where
    E: TenantOwned,
    R: ScopedRepository<E> + ?Sized,
{
    repo.get(id).await?.ok_or_else(|| not_found::<E>(id))
}

/// Data access for one entity type, restricted to the bound tenant.
#[async_trait]
pub trait ScopedRepository<E: TenantOwned>: Send {
    /// Fetch a row owned by the tenant.
    async fn get(&mut self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// Fetch a row owned by the tenant and lock it until the transaction ends.
    async fn get_for_update(&mut self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// List rows matching `filter`, oldest first.
    async fn list(&mut self, filter: &E::Filter, page: PageRequest) -> Result<Vec<E>, StoreError>;

    /// Count rows matching `filter`.
    async fn count(&mut self, filter: &E::Filter) -> Result<u64, StoreError>;

    /// Insert a row, stamping it with the tenant.
    async fn create(&mut self, row: E) -> Result<E, StoreError>;

    /// Replace a row after re-fetching it through the scoped lookup.
    async fn update(&mut self, row: E) -> Result<E, StoreError>;

    /// Delete a row after re-fetching it through the scoped lookup, returning it.
    async fn delete(&mut self, id: E::Id) -> Result<E, StoreError>;
}

/// Prefix lookups backing the asset identifier sequences.
#[async_trait]
pub trait AssetIdentifierLookup: Send {
    /// Serialise writers of `prefix` within the tenant until the transaction ends.
    async fn lock_identifier_prefix(&mut self, prefix: &IdentifierPrefix) -> Result<(), StoreError>;

    /// Greatest existing identifier of the sequence, in sequence order.
    async fn greatest_identifier(
        &mut self,
        prefix: &IdentifierPrefix,
    ) -> Result<Option<String>, StoreError>;
}
