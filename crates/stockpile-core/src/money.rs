//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Adjustment totals summed as floats drift:                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Each line is rounded to a whole cent once, then summed exactly.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockpile_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price.checked_multiply_quantity(-3.0).unwrap_or_default();
//! assert_eq!(line.abs().cents(), 3297);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for recovered amounts and refunds
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Product.purchase_price_cents ──► StockLineItem.unit_price_cents
///                                        │
///                                        ▼
///                       |quantity| × unit_price (rounded per line)
///                                        │
///                                        ▼
///                    StockAdjustment.total_amount_cents
///                    StockTransfer.total_amount_cents (+ shipping)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use stockpile_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// The product is rounded half away from zero to a whole cent, so
    /// `2.5 × $0.01 = $0.03`. Returns `None` when the quantity is not finite
    /// or the result does not fit in an `i64` of cents.
    ///
    /// ```rust
    /// use stockpile_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3.0), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_multiply_quantity(0.5), Some(Money::from_cents(150)));
    /// assert_eq!(unit_price.checked_multiply_quantity(1e300), None);
    /// ```
    pub fn checked_multiply_quantity(&self, qty: f64) -> Option<Self> {
        let product = (self.0 as f64 * qty).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if product.is_finite() && product >= i64::MIN as f64 && product < i64::MAX as f64 {
            Some(Money(product as i64))
        } else {
            None
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering. The UI formats currency itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}
