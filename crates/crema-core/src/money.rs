//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Latte $4.00 + large $0.75 + oat $0.75 + vanilla $0.50                  │
//! │    in floating point, summed over a day of orders, drifts by cents     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    400 + 75 + 75 + 50 = 600 cents, exactly, every time                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use crema_core::money::Money;
//!
//! let latte = Money::from_cents(400); // $4.00
//! let large = latte + Money::from_cents(75);
//! assert_eq!(large.cents(), 475);
//! assert_eq!((large * 2i64).cents(), 950);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds carry negative amounts, inventory usage
///   carries negative costs
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.base_price ──► LineItem.unit_price ──► LineItem.line_total    │
/// │                                                                         │
/// │  Order.subtotal ──► tax ──► Order.total ──► purchase transaction amount │
/// │                                                  │                      │
/// │                                                  ▼                      │
/// │                                        points earned = round(amount)    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use crema_core::money::Money;
    ///
    /// let price = Money::from_cents(1250); // Represents $12.50
    /// assert_eq!(price.cents(), 1250);
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

    /// Returns the major unit (dollars) portion, truncated toward zero.
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Calculates tax on this amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds half-up at the cent.
    ///
    /// ## Example
    /// ```rust
    /// use crema_core::money::Money;
    /// use crema_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(1200); // $12.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax.cents(), 96);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large subtotals from overflowing before the division
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Rounds to the nearest whole major unit, half away from zero.
    ///
    /// This is how loyalty points are derived from a purchase amount.
    ///
    /// ## Example
    /// ```rust
    /// use crema_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1250).round_to_major(), 13);
    /// assert_eq!(Money::from_cents(1249).round_to_major(), 12);
    /// assert_eq!(Money::from_cents(-1250).round_to_major(), -13);
    /// ```
    pub const fn round_to_major(&self) -> i64 {
        let whole = self.0 / 100;
        let rest = self.0 % 100;
        if rest >= 50 {
            whole + 1
        } else if rest <= -50 {
            whole - 1
        } else {
            whole
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$12.96`. UI layers do their own localization.
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

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1296);
        assert_eq!(money.cents(), 1296);
        assert_eq!(money.dollars(), 12);
        assert_eq!(money.cents_part(), 96);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1296)), "$12.96");
        assert_eq!(format!("{}", Money::from_cents(50)), "$0.50");
        assert_eq!(format!("{}", Money::from_cents(-1250)), "-$12.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(600);
        let b = Money::from_cents(75);

        assert_eq!((a + b).cents(), 675);
        assert_eq!((a - b).cents(), 525);
        assert_eq!((a * 2i64).cents(), 1200);
        assert_eq!((-a).cents(), -600);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 1000);
    }

    #[test]
    fn test_tax_eight_percent() {
        let tax = Money::from_cents(1200).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 96);
    }

    #[test]
    fn test_tax_ten_percent() {
        let tax = Money::from_cents(1200).calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 120);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // $4.75 at 8% = $0.38
        let tax = Money::from_cents(475).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 38);
        // $0.05 at 10% = 0.5 cents → 1 cent
        let tax = Money::from_cents(5).calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 1);
    }

    #[test]
    fn test_round_to_major() {
        assert_eq!(Money::from_cents(1250).round_to_major(), 13);
        assert_eq!(Money::from_cents(1249).round_to_major(), 12);
        assert_eq!(Money::from_cents(1296).round_to_major(), 13);
        assert_eq!(Money::from_cents(49).round_to_major(), 0);
        assert_eq!(Money::from_cents(-150).round_to_major(), -2);
        assert_eq!(Money::from_cents(-149).round_to_major(), -1);
        assert_eq!(Money::from_cents(i64::MIN).round_to_major(), i64::MIN / 100);
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_cents(-25).floor_zero(), Money::zero());
        assert_eq!(Money::from_cents(25).floor_zero().cents(), 25);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
    }
}
