//! Translation of pool and Diesel failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{StoreError, TenantRegistryError};

use super::pool::PoolError;

fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = info.constraint_name(),
            "diesel operation failed"
        ),
        _ => debug!(error = %error, "diesel operation failed"),
    }
}

/// Map pool checkout failures to store connection errors.
pub(crate) fn map_store_pool_error(error: PoolError) -> StoreError {
    StoreError::connection(pool_error_message(error))
}

/// Map Diesel errors raised inside a tenant transaction.
///
/// Unique violations become [`StoreError::Conflict`] carrying the constraint
/// name so services can retry sequence collisions.
pub(crate) fn map_store_diesel_error(error: DieselError) -> StoreError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::conflict(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreError::query(format!(
                "foreign key violation on {}",
                info.constraint_name().unwrap_or("unknown constraint")
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            StoreError::query(format!(
                "check constraint violated: {}",
                info.constraint_name().unwrap_or("unknown constraint")
            ))
        }
        DieselError::DatabaseError(_, info) => StoreError::query(info.message().to_owned()),
        other => StoreError::query(other.to_string()),
    }
}

/// Map pool checkout failures to tenant registry connection errors.
pub(crate) fn map_registry_pool_error(error: PoolError) -> TenantRegistryError {
    TenantRegistryError::connection(pool_error_message(error))
}

/// Map Diesel errors raised by the tenant registry.
pub(crate) fn map_registry_diesel_error(error: DieselError, name: &str) -> TenantRegistryError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TenantRegistryError::duplicate_name(name)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TenantRegistryError::connection("database connection closed")
        }
        DieselError::DatabaseError(_, info) => TenantRegistryError::query(info.message().to_owned()),
        other => TenantRegistryError::query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    use super::*;

    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(Info {
                message: "duplicate key value violates unique constraint",
                constraint,
            }),
        )
    }

    #[rstest]
    #[case(Some("assets_tenant_tag_key"), "assets_tenant_tag_key")]
    #[case(None, "unique constraint")]
    fn unique_violations_become_conflicts(
        #[case] constraint: Option<&'static str>,
        #[case] expected: &str,
    ) {
        let error = database_error(DatabaseErrorKind::UniqueViolation, constraint);
        assert_eq!(map_store_diesel_error(error), StoreError::conflict(expected));
    }

    #[rstest]
    fn closed_connections_are_connection_errors() {
        let error = database_error(DatabaseErrorKind::ClosedConnection, None);
        assert!(matches!(
            map_store_diesel_error(error),
            StoreError::Connection { .. }
        ));
    }

    #[rstest]
    fn foreign_key_violations_are_query_errors() {
        let error = database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            Some("assets_category_id_fkey"),
        );
        assert_eq!(
            map_store_diesel_error(error),
            StoreError::query("foreign key violation on assets_category_id_fkey")
        );
    }

    #[rstest]
    fn duplicate_tenant_names_are_reported_by_name() {
        let error = database_error(DatabaseErrorKind::UniqueViolation, Some("tenants_name_key"));
        assert_eq!(
            map_registry_diesel_error(error, "acme"),
            TenantRegistryError::duplicate_name("acme")
        );
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        assert_eq!(
            map_store_pool_error(PoolError::checkout("timed out")),
            StoreError::connection("timed out")
        );
        assert_eq!(
            map_registry_pool_error(PoolError::build("bad url")),
            TenantRegistryError::connection("bad url")
        );
    }
}
