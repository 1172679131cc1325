//! Driving port for asset registration.
//!
//! Tags and names are never supplied by the caller; the registry derives
//! them from the category, location and department inside the same
//! transaction that inserts the asset.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Asset, AssetId, CategoryId, DepartmentId, Error, LocationId, StatusId, TenantContext,
    TenantId, UserId,
};

/// Payload for registering an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetRequest {
    pub category_id: CategoryId,
    pub location_id: LocationId,
    pub department_id: DepartmentId,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    #[serde(default)]
    pub status_id: Option<StatusId>,
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Tenant named in the payload. Only checked against the caller's
    /// tenant; it never selects one.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
}

impl RegisterAssetRequest {
    /// Minimal registration for a placement.
    pub const fn new(
        category_id: CategoryId,
        location_id: LocationId,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            category_id,
            location_id,
            department_id,
            assigned_to: None,
            status_id: None,
            serial_number: None,
            tenant_id: None,
        }
    }
}

/// Payload for updating an asset. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAssetRequest {
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub department_id: Option<DepartmentId>,
    pub assigned_to: Option<UserId>,
    pub status_id: Option<StatusId>,
    pub serial_number: Option<String>,
}

/// Driving port for asset registration and re-placement.
#[async_trait]
pub trait AssetRegistryCommand: Send + Sync {
    /// Register an asset, deriving its tag and name.
    async fn register_asset(
        &self,
        ctx: &TenantContext,
        request: RegisterAssetRequest,
    ) -> Result<Asset, Error>;

    /// Update an asset. The tag is re-derived when the category changes and
    /// the name when the category, location or department changes.
    async fn update_asset(
        &self,
        ctx: &TenantContext,
        asset_id: AssetId,
        request: UpdateAssetRequest,
    ) -> Result<Asset, Error>;
}
