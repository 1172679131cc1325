//! Tagged assets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{AssetId, CategoryId, DepartmentId, LocationId, StatusId, TenantId, UserId};
use crate::domain::tenancy::impl_tenant_owned;

/// A registered asset.
///
/// `tag` and `name` are derived by the sequence generator and unique per
/// tenant. `tag_prefix` and `name_prefix` record the sequence each one was
/// drawn from; sequence lookups match them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier.
    pub id: AssetId,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Sequential tag, e.g. `CompDes001`.
    pub tag: String,
    /// Sequence the tag belongs to, e.g. `CompDes`.
    pub tag_prefix: String,
    /// Sequential name, e.g. `PLAN-ICT-DES01`.
    pub name: String,
    /// Sequence the name belongs to, e.g. `PLAN-ICT-DES`.
    pub name_prefix: String,
    /// Category the tag prefix is derived from.
    pub category_id: CategoryId,
    /// Location the name prefix is derived from.
    pub location_id: LocationId,
    /// Department the name prefix is derived from.
    pub department_id: DepartmentId,
    /// User currently holding the asset.
    pub assigned_to: Option<UserId>,
    /// Lifecycle status.
    pub status_id: Option<StatusId>,
    /// Manufacturer serial number.
    pub serial_number: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Filter for asset listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Restrict to one location.
    pub location_id: Option<LocationId>,
    /// Restrict to one department.
    pub department_id: Option<DepartmentId>,
    /// Restrict to assets held by one user.
    pub assigned_to: Option<UserId>,
}

impl_tenant_owned!(Asset, AssetId, AssetFilter, "asset");
