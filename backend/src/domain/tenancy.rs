//! Tenant context and the ownership contract shared by tenant-bearing rows.
//!
//! A [`TenantContext`] is established once per inbound operation from the
//! authenticated caller's affiliation and handed to every service call by
//! value or reference. It is never read from request payloads and never
//! stored in ambient state.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Error;
use super::ids::{TenantId, UserId};

/// The acting tenant and user for a single operation.
///
/// # Examples
/// ```
/// use stockroom::domain::{TenantContext, TenantId, UserId};
///
/// let tenant = TenantId::random();
/// let ctx = TenantContext::authenticated(tenant, UserId::random());
/// assert_eq!(ctx.current_tenant_id(), Some(tenant));
///
/// let anonymous = TenantContext::anonymous();
/// assert!(anonymous.require_tenant().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<TenantId>,
    actor: Option<UserId>,
}

impl TenantContext {
    /// Context for an authenticated user affiliated with `tenant_id`.
    pub const fn authenticated(tenant_id: TenantId, actor: UserId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            actor: Some(actor),
        }
    }

    /// Context built from a user record whose tenant affiliation may be unset.
    pub const fn from_affiliation(actor: UserId, tenant_id: Option<TenantId>) -> Self {
        Self {
            tenant_id,
            actor: Some(actor),
        }
    }

    /// Context with no authenticated caller. Every scoped operation rejects it.
    pub const fn anonymous() -> Self {
        Self {
            tenant_id: None,
            actor: None,
        }
    }

    /// The active tenant, if any.
    pub const fn current_tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// The acting user, if any.
    pub const fn actor(&self) -> Option<UserId> {
        self.actor
    }

    /// Return the active tenant or fail closed with an authorisation error.
    pub fn require_tenant(&self) -> Result<TenantId, Error> {
        self.tenant_id
            .ok_or_else(|| Error::unauthorized("no tenant is active for this operation"))
    }

    /// Return the acting user or fail with an authorisation error.
    pub fn require_actor(&self) -> Result<UserId, Error> {
        self.actor
            .ok_or_else(|| Error::unauthorized("an authenticated user is required"))
    }
}

/// An isolation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier.
    pub id: TenantId,
    /// Unique display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Contract implemented by every tenant-bearing entity.
///
/// The scoped repository relies on it to read and stamp the owning tenant
/// uniformly, with no per-entity opt-out.
pub trait TenantOwned: Clone + fmt::Debug + Send + Sync + 'static {
    /// Primary key type.
    type Id: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// Filter accepted by `list` and `count`.
    type Filter: Default + fmt::Debug + Send + Sync;

    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    /// Primary key.
    fn id(&self) -> Self::Id;
    /// Owning tenant, if the row has been stamped.
    fn tenant_id(&self) -> Option<TenantId>;
    /// Stamp the owning tenant.
    fn assign_tenant(&mut self, tenant_id: TenantId);
    /// Creation timestamp, the default listing order.
    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_tenant_owned {
    ($entity:ty, $id:ty, $filter:ty, $name:literal) => {
        impl $crate::domain::tenancy::TenantOwned for $entity {
            type Id = $id;
            type Filter = $filter;

            const ENTITY: &'static str = $name;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn tenant_id(&self) -> Option<$crate::domain::TenantId> {
                self.tenant_id
            }

            fn assign_tenant(&mut self, tenant_id: $crate::domain::TenantId) {
                self.tenant_id = Some(tenant_id);
            }

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }
        }
    };
}

pub(crate) use impl_tenant_owned;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn affiliation_without_tenant_fails_closed() {
        let ctx = TenantContext::from_affiliation(UserId::random(), None);
        let err = ctx.require_tenant().expect_err("tenant should be required");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(ctx.require_actor().is_ok());
    }

    #[rstest]
    fn anonymous_has_no_actor() {
        let err = TenantContext::anonymous()
            .require_actor()
            .expect_err("actor should be required");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
