//! Document error types for validation, stock, and state errors.

use comercio_shared::error::AppError;
use comercio_shared::types::ProductId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    // ========== Validation Errors ==========
    /// Document must have at least one line.
    #[error("Document must have at least one line")]
    EmptyLines,

    /// Line quantity must be positive.
    #[error("Quantity for product {product_id} must be positive")]
    NonPositiveQuantity {
        /// The product on the offending line.
        product_id: ProductId,
    },

    /// Line unit price cannot be negative.
    #[error("Unit price for product {product_id} cannot be negative")]
    NegativeUnitPrice {
        /// The product on the offending line.
        product_id: ProductId,
    },

    // ========== Product Errors ==========
    /// Referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Referenced product is inactive.
    #[error("Product {0} is inactive")]
    ProductInactive(ProductId),

    /// A stock mutation would drive inventory below zero.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// The overdrawn product.
        product_id: ProductId,
        /// Quantity the operation tried to remove.
        requested: Decimal,
        /// Stock available before the operation.
        available: Decimal,
    },

    // ========== State Errors ==========
    /// Document is already void.
    #[error("Document is already void")]
    AlreadyVoided,
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyLines => "EMPTY_LINES",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativeUnitPrice { .. } => "NEGATIVE_UNIT_PRICE",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::ProductInactive(_) => "PRODUCT_INACTIVE",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::AlreadyVoided => "ALREADY_VOIDED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyLines
            | Self::NonPositiveQuantity { .. }
            | Self::NegativeUnitPrice { .. }
            | Self::ProductInactive(_) => 400,
            Self::ProductNotFound(_) => 404,
            Self::AlreadyVoided => 409,
            Self::InsufficientStock { .. } => 422,
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        let message = err.to_string();
        match err {
            DocumentError::EmptyLines
            | DocumentError::NonPositiveQuantity { .. }
            | DocumentError::NegativeUnitPrice { .. }
            | DocumentError::ProductInactive(_) => Self::Validation(message),
            DocumentError::ProductNotFound(_) => Self::NotFound(message),
            DocumentError::InsufficientStock { .. } => Self::InsufficientStock(message),
            DocumentError::AlreadyVoided => Self::Conflict(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(DocumentError::EmptyLines.error_code(), "EMPTY_LINES");
        assert_eq!(
            DocumentError::InsufficientStock {
                product_id: ProductId::new(),
                requested: dec!(5),
                available: dec!(2),
            }
            .error_code(),
            "INSUFFICIENT_STOCK"
        );
        assert_eq!(DocumentError::AlreadyVoided.error_code(), "ALREADY_VOIDED");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(DocumentError::EmptyLines.http_status_code(), 400);
        assert_eq!(
            DocumentError::ProductNotFound(ProductId::new()).http_status_code(),
            404
        );
        assert_eq!(DocumentError::AlreadyVoided.http_status_code(), 409);
        assert_eq!(
            DocumentError::InsufficientStock {
                product_id: ProductId::new(),
                requested: dec!(5),
                available: dec!(2),
            }
            .http_status_code(),
            422
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = DocumentError::EmptyLines.into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = DocumentError::ProductNotFound(ProductId::new()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = DocumentError::InsufficientStock {
            product_id: ProductId::new(),
            requested: dec!(5),
            available: dec!(2),
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock(_)));

        let err: AppError = DocumentError::AlreadyVoided.into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_insufficient_stock_display() {
        let id = ProductId::new();
        let err = DocumentError::InsufficientStock {
            product_id: id,
            requested: dec!(5),
            available: dec!(2),
        };
        assert_eq!(
            err.to_string(),
            format!("Insufficient stock for product {id}: requested 5, available 2")
        );
    }
}
