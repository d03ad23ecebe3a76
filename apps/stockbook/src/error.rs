//! # API Error Type
//!
//! Unified error type for app commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function  → Result<T, ApiError>                                │
//! │                                                                         │
//! │  DbError::QueryFailed("...")          ──┐                               │
//! │  CoreError::InsufficientStock { .. }  ──┼──► ApiError { code, message } │
//! │  ValidationError::Rows { rows: 2 }    ──┘                               │
//! │                                                                         │
//! │  Screen reads `code` to decide what to show:                            │
//! │    VALIDATION_ERROR    → re-read the form, warnings are on its rows     │
//! │    INSUFFICIENT_STOCK  → lower the quantity                             │
//! │    NOT_FOUND           → product was removed meanwhile                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockbook_core::{CoreError, ListEditError, ValidationError};
use stockbook_db::DbError;
use thiserror::Error;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: KAOS-01"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A row index did not match the form
    InvalidRow,

    /// Order asks for more than is in stock
    InsufficientStock,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::Validation(e) => e.into(),
            DbError::InsufficientStock {
                product_code,
                available,
                requested,
            } => CoreError::InsufficientStock {
                product_code,
                available,
                requested,
            }
            .into(),
            DbError::ConstraintViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::validation("Invalid line item")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(code) => ApiError::not_found("Product", &code),
            CoreError::InsufficientStock {
                product_code,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product_code, available, requested
                ),
            ),
            CoreError::Validation(e) => e.into(),
            CoreError::ListEdit(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ListEditError> for ApiError {
    fn from(err: ListEditError) -> Self {
        ApiError::new(ErrorCode::InvalidRow, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Product", "KAOS-01");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "code": "NOT_FOUND", "message": "Product not found: KAOS-01" })
        );
    }

    #[test]
    fn test_core_error_codes() {
        let stock: ApiError = CoreError::InsufficientStock {
            product_code: "A1".to_string(),
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(stock.code, ErrorCode::InsufficientStock);

        let row: ApiError = CoreError::from(ListEditError::IndexOutOfRange { index: 3, len: 1 }).into();
        assert_eq!(row.code, ErrorCode::InvalidRow);

        let raced: ApiError = DbError::InsufficientStock {
            product_code: "B2".to_string(),
            available: 0,
            requested: 3,
        }
        .into();
        assert_eq!(raced.code, ErrorCode::InsufficientStock);

        let rows: ApiError = DbError::Validation(ValidationError::Rows { rows: 2 }).into();
        assert_eq!(rows, ApiError::validation("2 row(s) need attention"));
    }
}
