//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ListEditError    - Indexed list contract violations               │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the screen layer sees (serialized)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Screen       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product code, index, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by its code.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity is more than the product has in stock.
    ///
    /// ## When This Occurs
    /// - An order row asks for more units than the picker offers
    #[error("Insufficient stock for {product_code}: available {available}, requested {requested}")]
    InsufficientStock {
        product_code: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Line-item list operation failed (wraps ListEditError).
    #[error(transparent)]
    ListEdit(#[from] ListEditError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything is persisted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below its minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: i64 },

    /// Numeric value is above its maximum.
    #[error("{field} must be at most {max}")]
    AboveMaximum { field: String, max: i64 },

    /// Invalid format (e.g., invalid UUID, non-numeric text).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same product code on two order rows).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// A form has row-level warnings; the count says how many rows.
    #[error("{rows} row(s) need attention")]
    Rows { rows: usize },
}

// =============================================================================
// List Edit Error
// =============================================================================

/// Errors raised by the indexed list editor.
///
/// These are programming-contract violations (a stale or bad index), not
/// environmental failures, so they are raised immediately and never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ListEditError {
    /// The index is outside `[0, len)`.
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_code: "KAOS-01".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for KAOS-01: available 3, requested 5"
        );
    }

    #[test]
    fn test_list_edit_error_message() {
        let err = ListEditError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Index 4 out of range for list of length 2");

        let core_err: CoreError = err.into();
        assert_eq!(core_err.to_string(), "Index 4 out of range for list of length 2");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "productCode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
