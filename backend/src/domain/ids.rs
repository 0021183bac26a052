//! UUID-backed record identifiers.
//!
//! Every entity gets its own newtype so an `EmployeeId` can never be handed
//! to a sale lookup by accident. Parsing is strict: no surrounding
//! whitespace, no empty strings, only canonical UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier supplied by a client.
            ///
            /// Empty input yields `"<Entity> id is required"`; anything else
            /// that is not a UUID yields `"<Entity> id must be a valid UUID"`.
            pub fn parse(raw: &str) -> Result<Self, Error> {
                if raw.trim().is_empty() {
                    return Err(Error::invalid_request(concat!($label, " id is required")));
                }
                if raw.trim() != raw {
                    return Err(Error::invalid_request(concat!($label, " id must be a valid UUID")));
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| Error::invalid_request(concat!($label, " id must be a valid UUID")))
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
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
                write!(f, "{}", self.0)
            }
        }
    };
}

define_record_id!(
    /// Identifier of an [`Admin`](super::Admin).
    AdminId,
    "Admin"
);
define_record_id!(
    /// Identifier of a [`Customer`](super::Customer).
    CustomerId,
    "Customer"
);
define_record_id!(
    /// Identifier of a [`CartItem`](super::CartItem).
    CartId,
    "Cart"
);
define_record_id!(
    /// Identifier of an [`Employee`](super::Employee).
    EmployeeId,
    "Employee"
);
define_record_id!(
    /// Identifier of an [`Attendance`](super::Attendance) record.
    AttendanceId,
    "Attendance"
);
define_record_id!(
    /// Identifier of a [`Product`](super::Product).
    ProductId,
    "Product"
);
define_record_id!(
    /// Identifier of a [`Sale`](super::Sale).
    SaleId,
    "Sale"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", "Sale id is required")]
    #[case("   ", "Sale id is required")]
    #[case("not-a-uuid", "Sale id must be a valid UUID")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", "Sale id must be a valid UUID")]
    fn parse_rejects_bad_input(#[case] raw: &str, #[case] message: &str) {
        let err = SaleId::parse(raw).expect_err("invalid id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn parse_accepts_canonical_uuid() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id = EmployeeId::parse(raw).expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = ProductId::random();
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }
}
