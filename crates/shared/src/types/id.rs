//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ProductId` where a
//! `CustomerId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(BrandId, "Unique identifier for a brand.");
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(SupplierId, "Unique identifier for a supplier.");
typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(LoanTypeId, "Unique identifier for a loan type.");
typed_id!(LoanId, "Unique identifier for a loan.");
typed_id!(InstallmentId, "Unique identifier for a loan installment.");
typed_id!(InvoiceId, "Unique identifier for a sales invoice.");
typed_id!(PurchaseId, "Unique identifier for a purchase.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_creation() {
        let id = ProductId::new();
        assert!(!id.to_string().is_empty());
    }

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_display() {
        let uuid = Uuid::new_v4();
        let id = CustomerId::from_uuid(uuid);
        assert_eq!(format!("{id}"), uuid.to_string());
    }

    #[test]
    fn test_typed_id_from_str() {
        let uuid = Uuid::new_v4();
        let id = InvoiceId::from_str(&uuid.to_string()).unwrap();
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_from_str_error() {
        assert!(SupplierId::from_str("invalid").is_err());
    }
}
