//! Driving port for reference data and consumable registration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, Consumable, ConsumableId, Department, Error, Location, TenantContext,
};

use super::AlertChange;

/// Payload for registering a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCategoryRequest {
    /// `"<Group>:<Subgroup>"`.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for registering a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLocationRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Payload for registering a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDepartmentRequest {
    pub name: String,
}

/// Payload for registering a consumable. Quantity always starts at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterConsumableRequest {
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub unit_of_measure: Option<String>,
    /// Defaults to [`crate::domain::DEFAULT_REORDER_LEVEL`].
    pub reorder_level: Option<u32>,
}

/// A consumable together with the alert transition its last change caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumableState {
    pub consumable: Consumable,
    pub alert: AlertChange,
}

/// Driving port for catalogue registration.
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Register a category after validating its `Group:Subgroup` shape.
    async fn register_category(
        &self,
        ctx: &TenantContext,
        request: RegisterCategoryRequest,
    ) -> Result<Category, Error>;

    /// Register a location.
    async fn register_location(
        &self,
        ctx: &TenantContext,
        request: RegisterLocationRequest,
    ) -> Result<Location, Error>;

    /// Register a department.
    async fn register_department(
        &self,
        ctx: &TenantContext,
        request: RegisterDepartmentRequest,
    ) -> Result<Department, Error>;

    /// Register a consumable and derive its initial alert state.
    async fn register_consumable(
        &self,
        ctx: &TenantContext,
        request: RegisterConsumableRequest,
    ) -> Result<ConsumableState, Error>;

    /// Change a consumable's reorder level and re-derive its alert.
    async fn update_reorder_level(
        &self,
        ctx: &TenantContext,
        consumable_id: ConsumableId,
        reorder_level: u32,
    ) -> Result<ConsumableState, Error>;
}
