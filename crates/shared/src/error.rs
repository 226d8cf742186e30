//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// This is the taxonomy surfaced at the operation boundary: every
/// repository failure maps into one of these kinds, each with a
/// human-readable message. Presentation is the caller's responsibility.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error (malformed or missing input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stock mutation would drive inventory below zero.
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InsufficientStock(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(
            AppError::InsufficientStock(String::new()).status_code(),
            422
        );
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::InsufficientStock(String::new()).error_code(),
            "INSUFFICIENT_STOCK"
        );
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
        assert_eq!(
            AppError::InsufficientStock("msg".into()).to_string(),
            "Insufficient stock: msg"
        );
    }
}
