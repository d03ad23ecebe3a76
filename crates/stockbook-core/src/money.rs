//! # Money Module
//!
//! Provides the `Money` type for rupiah amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rupiah has no minor unit in day-to-day trade.                          │
//! │                                                                         │
//! │  Prices are entered as whole numbers ("15000"), stored as integers,    │
//! │  multiplied by integer quantities and shown with id-ID grouping:       │
//! │                                                                         │
//! │    15000 × 2  →  30000  →  "30.000"                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::money::Money;
//!
//! let price = Money::from_rupiah(15_000);
//! let subtotal = price.multiply_quantity(2);
//! assert_eq!(subtotal.to_grouped(), "30.000");
//! assert_eq!(subtotal.to_string(), "Rp 30.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// A rupiah amount.
///
/// ## Design Decisions
/// - **i64 (signed)**: stock corrections may carry negative values
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(2_500);
    /// assert_eq!(unit_price.multiply_quantity(3).rupiah(), 7_500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the amount with id-ID digit grouping (`.` every three digits).
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupiah(1_234_567).to_grouped(), "1.234.567");
    /// assert_eq!(Money::from_rupiah(-5_000).to_grouped(), "-5.000");
    /// assert_eq!(Money::from_rupiah(999).to_grouped(), "999");
    /// ```
    pub fn to_grouped(&self) -> String {
        group_digits(self.0)
    }
}

/// Groups the digits of an integer id-ID style: `1234567` → `1.234.567`.
pub fn group_digits(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}

// =============================================================================
// Trait Implementations
// =============================================================================
// Arithmetic saturates at the `i64` bounds.

/// Display shows the amount with the currency prefix, e.g. `Rp 15.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rp {}", self.to_grouped())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(12), "12");
        assert_eq!(group_digits(1_000), "1.000");
        assert_eq!(group_digits(15_000), "15.000");
        assert_eq!(group_digits(100_000), "100.000");
        assert_eq!(group_digits(1_234_567), "1.234.567");
        assert_eq!(group_digits(-1_234), "-1.234");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_rupiah(15_000)), "Rp 15.000");
        assert_eq!(format!("{}", Money::zero()), "Rp 0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(10_000);
        let b = Money::from_rupiah(2_500);

        assert_eq!((a + b).rupiah(), 12_500);
        assert_eq!((a - b).rupiah(), 7_500);
        assert_eq!((b * 4).rupiah(), 10_000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_rupiah(i64::MAX);

        assert_eq!(huge.multiply_quantity(2).rupiah(), i64::MAX);
        assert_eq!(huge.multiply_quantity(-2).rupiah(), i64::MIN);
        assert_eq!((huge + Money::from_rupiah(1)).rupiah(), i64::MAX);

        let total: Money = [huge, huge].into_iter().sum();
        assert_eq!(total.rupiah(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1_000, 2_000, 3_500]
            .into_iter()
            .map(Money::from_rupiah)
            .sum();
        assert_eq!(total.to_grouped(), "6.500");
    }
}
