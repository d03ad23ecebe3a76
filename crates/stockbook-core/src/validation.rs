//! # Validation Module
//!
//! Input validation utilities for Stockbook forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Keystroke filter                                             │
//! │  └── is_numeric_input: rejects text that can never become a number     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit (THIS MODULE, called by form.rs)                      │
//! │  ├── product code present                                              │
//! │  ├── 1 <= quantity <= 1.000.000                                        │
//! │  └── 1 <= price <= 1.000.000.000                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE product_code                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product code accepted.
pub const MAX_PRODUCT_CODE_LEN: usize = 50;

/// Largest quantity on one line.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest unit price in rupiah. `MAX_QUANTITY * MAX_PRICE` fits in `i64`.
pub const MAX_PRICE: i64 = 1_000_000_000;

// =============================================================================
// Warning Messages
// =============================================================================
// Text shown under the offending input.

pub const PRODUCT_CODE_EMPTY: &str = "Product code may not be empty";
pub const QUANTITY_TOO_SMALL: &str = "Minimum purchase qty is 1";
pub const PRICE_TOO_SMALL: &str = "Minimum price is IDR 1";
pub const QUANTITY_TOO_LARGE: &str = "Maximum purchase qty is 1.000.000";
pub const PRICE_TOO_LARGE: &str = "Maximum price is IDR 1.000.000.000";
pub const DUPLICATE_PRODUCT_CODE: &str = "Duplicate product code";

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_product_code;
///
/// assert!(validate_product_code("KAOS-01").is_ok());
/// assert!(validate_product_code("   ").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "productCode".to_string(),
        });
    }

    if code.chars().count() > MAX_PRODUCT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "productCode".to_string(),
            max: MAX_PRODUCT_CODE_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity (`1..=MAX_QUANTITY`).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    check_range("quantity", qty, 1, MAX_QUANTITY)
}

/// Validates a unit price in rupiah (`1..=MAX_PRICE`).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    check_range("price", price, 1, MAX_PRICE)
}

fn check_range(field: &str, value: i64, min: i64, max: i64) -> ValidationResult<()> {
    if value < min {
        return Err(ValidationError::BelowMinimum {
            field: field.to_string(),
            min,
        });
    }

    if value > max {
        return Err(ValidationError::AboveMaximum {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Keystroke filter for numeric text inputs.
///
/// Accepts an optional leading `-` followed by digits, where a `0` may not be
/// followed by another digit. Partial input (`""`, `"-"`) is accepted so the
/// user can keep typing.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::is_numeric_input;
///
/// assert!(is_numeric_input("15000"));
/// assert!(is_numeric_input("0"));
/// assert!(!is_numeric_input("05"));
/// assert!(!is_numeric_input("1.5"));
/// ```
pub fn is_numeric_input(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    !(digits.len() > 1 && digits.starts_with('0'))
}

/// Converts accepted numeric input into a number; blank or a lone `-`
/// counts as zero.
///
/// Digits that do not fit in `i64` give `AboveMaximum`, or `BelowMinimum`
/// when negative.
pub fn parse_numeric_input(text: &str) -> ValidationResult<i64> {
    if !is_numeric_input(text) {
        return Err(ValidationError::InvalidFormat {
            field: "number".to_string(),
            reason: format!("'{text}' is not a whole number"),
        });
    }

    match text {
        "" | "-" => Ok(0),
        _ => text.parse().map_err(|_| {
            if text.starts_with('-') {
                ValidationError::BelowMinimum {
                    field: "number".to_string(),
                    min: i64::MIN,
                }
            } else {
                ValidationError::AboveMaximum {
                    field: "number".to_string(),
                    max: i64::MAX,
                }
            }
        }),
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("KAOS-01").is_ok());
        assert!(validate_product_code("celana panjang").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::AboveMaximum {
                field: "quantity".to_string(),
                max: MAX_QUANTITY
            })
        );
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(1).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(MAX_PRICE).is_ok());
        assert!(validate_price(i64::MAX).is_err());
    }

    #[test]
    fn test_largest_line_fits() {
        assert!(MAX_QUANTITY.checked_mul(MAX_PRICE).is_some());
    }

    #[test]
    fn test_is_numeric_input() {
        for ok in ["", "-", "0", "-0", "7", "15000", "-42"] {
            assert!(is_numeric_input(ok), "{ok:?} should be accepted");
        }
        for bad in ["05", "-01", "1.5", "1e3", "abc", "--1", " 1"] {
            assert!(!is_numeric_input(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_numeric_input() {
        assert_eq!(parse_numeric_input("").unwrap(), 0);
        assert_eq!(parse_numeric_input("-").unwrap(), 0);
        assert_eq!(parse_numeric_input("15000").unwrap(), 15_000);
        assert_eq!(parse_numeric_input("-2").unwrap(), -2);
        assert!(parse_numeric_input("05").is_err());
        assert!(matches!(
            parse_numeric_input("99999999999999999999"),
            Err(ValidationError::AboveMaximum { .. })
        ));
        assert!(matches!(
            parse_numeric_input("-99999999999999999999"),
            Err(ValidationError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
