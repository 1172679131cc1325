//! Internal Diesel row structs for the inventory tables.
//!
//! These types never leave the persistence adapter. Each row converts to and
//! from its domain entity; counts are stored as `INTEGER`, so conversions
//! fail instead of wrapping when a value is out of range.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{
    Alert, AlertStatus, Asset, Category, Consumable, Department, Location, MovementKind,
    StockTransaction, Tenant, TenantId,
};

use super::schema::{
    alerts, assets, categories, consumables, departments, locations, stock_transactions, tenants,
};

fn stored_count(field: &'static str, value: u32) -> Result<i32, StoreError> {
    i32::try_from(value)
        .map_err(|_| StoreError::query(format!("{field} {value} exceeds the stored range")))
}

fn loaded_count(field: &'static str, value: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::query(format!("stored {field} {value} is negative")))
}

fn tenant_column(tenant_id: Option<TenantId>) -> Option<Uuid> {
    tenant_id.map(Into::into)
}

fn tenant_field(tenant_id: Option<Uuid>) -> Option<TenantId> {
    tenant_id.map(TenantId::from_uuid)
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TenantRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Tenant> for TenantRow {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id.into(),
            name: tenant.name.clone(),
            description: tenant.description.clone(),
            created_at: tenant.created_at,
        }
    }
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: TenantId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Category> for CategoryRow {
    type Error = StoreError;

    fn try_from(category: &Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.into(),
            tenant_id: tenant_column(category.tenant_id),
            name: category.name.clone(),
            description: category.description.clone(),
            created_at: category.created_at,
        })
    }
}

impl TryFrom<CategoryRow> for Category {
    type Error = StoreError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LocationRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Location> for LocationRow {
    type Error = StoreError;

    fn try_from(location: &Location) -> Result<Self, Self::Error> {
        Ok(Self {
            id: location.id.into(),
            tenant_id: tenant_column(location.tenant_id),
            name: location.name.clone(),
            address: location.address.clone(),
            created_at: location.created_at,
        })
    }
}

impl TryFrom<LocationRow> for Location {
    type Error = StoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            name: row.name,
            address: row.address,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Department> for DepartmentRow {
    type Error = StoreError;

    fn try_from(department: &Department) -> Result<Self, Self::Error> {
        Ok(Self {
            id: department.id.into(),
            tenant_id: tenant_column(department.tenant_id),
            name: department.name.clone(),
            created_at: department.created_at,
        })
    }
}

impl TryFrom<DepartmentRow> for Department {
    type Error = StoreError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            name: row.name,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = assets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AssetRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub tag: String,
    pub tag_prefix: String,
    pub name: String,
    pub name_prefix: String,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub department_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub status_id: Option<Uuid>,
    pub serial_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Asset> for AssetRow {
    type Error = StoreError;

    fn try_from(asset: &Asset) -> Result<Self, Self::Error> {
        Ok(Self {
            id: asset.id.into(),
            tenant_id: tenant_column(asset.tenant_id),
            tag: asset.tag.clone(),
            tag_prefix: asset.tag_prefix.clone(),
            name: asset.name.clone(),
            name_prefix: asset.name_prefix.clone(),
            category_id: asset.category_id.into(),
            location_id: asset.location_id.into(),
            department_id: asset.department_id.into(),
            assigned_to: asset.assigned_to.map(Into::into),
            status_id: asset.status_id.map(Into::into),
            serial_number: asset.serial_number.clone(),
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        })
    }
}

impl TryFrom<AssetRow> for Asset {
    type Error = StoreError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            tag: row.tag,
            tag_prefix: row.tag_prefix,
            name: row.name,
            name_prefix: row.name_prefix,
            category_id: row.category_id.into(),
            location_id: row.location_id.into(),
            department_id: row.department_id.into(),
            assigned_to: row.assigned_to.map(Into::into),
            status_id: row.status_id.map(Into::into),
            serial_number: row.serial_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = consumables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ConsumableRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub unit_of_measure: Option<String>,
    pub quantity: i32,
    pub reorder_level: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Consumable> for ConsumableRow {
    type Error = StoreError;

    fn try_from(consumable: &Consumable) -> Result<Self, Self::Error> {
        Ok(Self {
            id: consumable.id.into(),
            tenant_id: tenant_column(consumable.tenant_id),
            name: consumable.name.clone(),
            category: consumable.category.clone(),
            brand: consumable.brand.clone(),
            model: consumable.model.clone(),
            unit_of_measure: consumable.unit_of_measure.clone(),
            quantity: stored_count("quantity", consumable.quantity)?,
            reorder_level: stored_count("reorder level", consumable.reorder_level)?,
            created_at: consumable.created_at,
        })
    }
}

impl TryFrom<ConsumableRow> for Consumable {
    type Error = StoreError;

    fn try_from(row: ConsumableRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            name: row.name,
            category: row.category,
            brand: row.brand,
            model: row.model,
            unit_of_measure: row.unit_of_measure,
            quantity: loaded_count("quantity", row.quantity)?,
            reorder_level: loaded_count("reorder level", row.reorder_level)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = stock_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct StockTransactionRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub consumable_id: Uuid,
    pub transaction_type: String,
    pub quantity: i32,
    pub department_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&StockTransaction> for StockTransactionRow {
    type Error = StoreError;

    fn try_from(entry: &StockTransaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entry.id.into(),
            tenant_id: tenant_column(entry.tenant_id),
            consumable_id: entry.consumable_id.into(),
            transaction_type: entry.kind.as_str().to_owned(),
            quantity: stored_count("quantity", entry.quantity)?,
            department_id: entry.department_id.into(),
            user_id: entry.user_id.into(),
            created_at: entry.created_at,
        })
    }
}

impl TryFrom<StockTransactionRow> for StockTransaction {
    type Error = StoreError;

    fn try_from(row: StockTransactionRow) -> Result<Self, Self::Error> {
        let kind = row
            .transaction_type
            .parse::<MovementKind>()
            .map_err(|err| StoreError::query(err.to_string()))?;
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            consumable_id: row.consumable_id.into(),
            kind,
            quantity: loaded_count("quantity", row.quantity)?,
            department_id: row.department_id.into(),
            user_id: row.user_id.into(),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = alerts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AlertRow {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub consumable_id: Uuid,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Alert> for AlertRow {
    type Error = StoreError;

    fn try_from(alert: &Alert) -> Result<Self, Self::Error> {
        Ok(Self {
            id: alert.id.into(),
            tenant_id: tenant_column(alert.tenant_id),
            consumable_id: alert.consumable_id.into(),
            message: alert.message.clone(),
            status: alert.status.as_str().to_owned(),
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        })
    }
}

impl TryFrom<AlertRow> for Alert {
    type Error = StoreError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<AlertStatus>()
            .map_err(|err| StoreError::query(err.to_string()))?;
        Ok(Self {
            id: row.id.into(),
            tenant_id: tenant_field(row.tenant_id),
            consumable_id: row.consumable_id.into(),
            message: row.message,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
