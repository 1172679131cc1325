//! Diesel table definitions for the inventory schema.
//!
//! These definitions must match `backend/migrations` exactly. Tenant-bearing
//! tables are only queried from `diesel_tenant_transaction`, which appends the
//! tenant predicate to every statement.

diesel::table! {
    /// Isolation boundaries. Not tenant scoped.
    tenants (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Asset categories named `<Group>:<Subgroup>`.
    categories (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        name -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sites assets are kept at.
    locations (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        name -> Varchar,
        address -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    departments (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked equipment. `tag` and `name` are unique per tenant.
    assets (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        tag -> Varchar,
        tag_prefix -> Varchar,
        name -> Varchar,
        name_prefix -> Varchar,
        category_id -> Uuid,
        location_id -> Uuid,
        department_id -> Uuid,
        assigned_to -> Nullable<Uuid>,
        status_id -> Nullable<Uuid>,
        serial_number -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stock items with a derived on-hand quantity.
    consumables (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        name -> Varchar,
        category -> Nullable<Varchar>,
        brand -> Nullable<Varchar>,
        model -> Nullable<Varchar>,
        unit_of_measure -> Nullable<Varchar>,
        quantity -> Int4,
        reorder_level -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ledger rows; `transaction_type` is `IN` or `OUT`.
    stock_transactions (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        consumable_id -> Uuid,
        transaction_type -> Varchar,
        quantity -> Int4,
        department_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Low-stock alerts; at most one `PENDING` row per consumable.
    alerts (id) {
        id -> Uuid,
        tenant_id -> Nullable<Uuid>,
        consumable_id -> Uuid,
        message -> Text,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(assets -> categories (category_id));
diesel::joinable!(assets -> locations (location_id));
diesel::joinable!(assets -> departments (department_id));
diesel::joinable!(stock_transactions -> consumables (consumable_id));
diesel::joinable!(stock_transactions -> departments (department_id));
diesel::joinable!(alerts -> consumables (consumable_id));

diesel::allow_tables_to_appear_in_same_query!(
    tenants,
    categories,
    locations,
    departments,
    assets,
    consumables,
    stock_transactions,
    alerts,
);
