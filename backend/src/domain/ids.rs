//! Strongly typed identifiers.
//!
//! Every entity key is a UUID wrapped in its own newtype so that an
//! `AssetId` can never be passed where a `ConsumableId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Isolation boundary identifier.
    TenantId
);
define_id!(
    /// Authenticated user acting on behalf of a tenant.
    UserId
);
define_id!(
    /// Asset lifecycle status reference.
    StatusId
);
define_id!(
    /// Category identifier.
    CategoryId
);
define_id!(
    /// Location identifier.
    LocationId
);
define_id!(
    /// Department identifier.
    DepartmentId
);
define_id!(
    /// Asset identifier.
    AssetId
);
define_id!(
    /// Consumable identifier.
    ConsumableId
);
define_id!(
    /// Stock ledger entry identifier.
    StockTransactionId
);
define_id!(
    /// Reorder alert identifier.
    AlertId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn serialises_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = TenantId::from_uuid(uuid);
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::Value::String(uuid.to_string()));
    }

    #[rstest]
    fn display_matches_uuid() {
        let id = AssetId::random();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }
}
