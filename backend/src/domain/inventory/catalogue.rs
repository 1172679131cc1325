//! Reference data that assets and stock movements point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{CategoryId, DepartmentId, LocationId, TenantId};
use crate::domain::tenancy::impl_tenant_owned;

/// Asset category named `"<Group>:<Subgroup>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Colon-delimited name driving tag and name prefixes.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Filter for category listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Exact name match.
    pub name: Option<String>,
}

/// Physical site an asset lives at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location identifier.
    pub id: LocationId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Display name; its first four alphanumerics lead asset names.
    pub name: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Filter for location listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFilter {
    /// Exact name match.
    pub name: Option<String>,
}

/// Organisational unit assets and stock are issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department identifier.
    pub id: DepartmentId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Filter for department listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentFilter {
    /// Exact name match.
    pub name: Option<String>,
}

impl_tenant_owned!(Category, CategoryId, CategoryFilter, "category");
impl_tenant_owned!(Location, LocationId, LocationFilter, "location");
impl_tenant_owned!(Department, DepartmentId, DepartmentFilter, "department");
