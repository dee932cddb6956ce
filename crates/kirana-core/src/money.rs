//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    ₹10.00 / 3 = ₹3.33 (×3 = ₹9.99)  → Lost ₹0.01!                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    1000 paise / 3 = 333 paise (×3 = 999 paise)                          │
//! │    We KNOW we lost 1 paisa, and handle it explicitly                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(5_000); // ₹50.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // ₹100.00
//! let total = price + Money::from_paise(3_000); // ₹80.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(50.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate subtractions may dip below zero before
///   the caller floors them
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for persisted receipt payloads
///
/// ## Where Money Flows
/// ```text
/// Item.price_paise ──► BillLine.unit_price ──► BillLine.line_total
///                                                   │
/// Bill subtotal ──► discount ──► GST ──► Receipt total ──► Ledger total sales
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_paise(5_099); // Represents ₹50.99
    /// assert_eq!(price.paise(), 5_099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from major and minor units (rupees and paise).
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_major_minor(50, 99); // ₹50.99
    /// assert_eq!(price.paise(), 5_099);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paise) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(3_000); // ₹30.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.paise(), 6_000); // ₹60.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates the tax amount for this value at the given rate.
    ///
    /// ## Implementation
    /// Integer math over i128: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds the half-paisa case up instead of truncating.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    /// use kirana_core::types::Percent;
    ///
    /// let amount = Money::from_paise(9_000);   // ₹90.00
    /// let gst = Percent::from_bps(500);        // 5%
    /// assert_eq!(amount.calculate_tax(gst).paise(), 450); // ₹4.50
    /// ```
    pub fn calculate_tax(&self, rate: Percent) -> Money {
        // i128 intermediates prevent overflow on large amounts
        let tax_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(tax_paise as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    /// use kirana_core::types::Percent;
    ///
    /// let subtotal = Money::from_paise(10_000); // ₹100.00
    /// let discounted = subtotal.apply_discount(Percent::from_bps(1000)); // 10% off
    /// assert_eq!(discounted.paise(), 9_000); // ₹90.00
    /// ```
    pub fn apply_discount(&self, rate: Percent) -> Money {
        let discount_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(self.0 - discount_paise as i64)
    }

    /// Adds tax at the given rate and returns the grossed-up amount.
    ///
    /// Checkout composes the two rate operations in order:
    /// `subtotal.apply_discount(d).add_tax(t)`.
    pub fn add_tax(&self, rate: Percent) -> Money {
        *self + self.calculate_tax(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// Used directly for receipt and stock rendering on the register.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(5_099);
        assert_eq!(money.paise(), 5_099);
        assert_eq!(money.rupees(), 50);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(50, 99);
        assert_eq!(money.paise(), 5_099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.paise(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(5_099)), "₹50.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1_000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1_500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3_000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(2_500);
        assert_eq!(unit_price.multiply_quantity(4).paise(), 10_000);
    }

    #[test]
    fn test_discount_then_tax_formula_is_exact() {
        // Subtotal ₹100.00, discount 10%, GST 5%:
        // discounted = ₹90.00, final = ₹94.50 exactly.
        let subtotal = Money::from_paise(10_000);
        let total = subtotal
            .apply_discount(Percent::from_bps(1_000))
            .add_tax(Percent::from_bps(500));
        assert_eq!(total.paise(), 9_450);
    }

    #[test]
    fn test_tax_rounding() {
        // ₹10.00 at 8.25% = ₹0.825 → rounds to ₹0.83
        let amount = Money::from_paise(1_000);
        let tax = amount.calculate_tax(Percent::from_bps(825));
        assert_eq!(tax.paise(), 83);
    }

    #[test]
    fn test_zero_rates_are_identity() {
        let amount = Money::from_paise(21_000);
        assert_eq!(amount.apply_discount(Percent::zero()), amount);
        assert_eq!(amount.add_tax(Percent::zero()), amount);
    }

    /// Documents the intentional precision loss when splitting amounts.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten_rupees = Money::from_paise(1_000);
        let one_third = Money::from_paise(1_000 / 3); // 333 paise
        let reconstructed = one_third * 3; // 999 paise

        assert_eq!(reconstructed.paise(), 999);
        assert_eq!((ten_rupees - reconstructed).paise(), 1);
    }
}
