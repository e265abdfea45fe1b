//! # Money
//!
//! Integer-cent currency type shared by the catalog, the checkout engine,
//! and the order tables.
//!
//! Prices never touch floating point. A `Money` is an `i64` count of the
//! smallest currency unit, so line totals (unit price times quantity) and
//! order totals (sums of line totals) are exact. The number that lands in
//! `orders.total_cents` is byte-for-byte the number the buyer was quoted.
//!
//! ```rust
//! use storefront_core::money::Money;
//!
//! let unit_price = Money::from_cents(4_500_000);    // $45,000.00
//! let line_total = unit_price.multiply_quantity(3);
//!
//! assert_eq!(line_total.cents(), 13_500_000);
//! assert_eq!(line_total.to_string(), "$135000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// An amount of money in cents.
///
/// A newtype over `i64`: `Copy`, ordered, hashable, and serialized as a bare
/// number. Signed so that a future refund flow can carry negative amounts,
/// though nothing in checkout produces one today.
///
/// Stored amounts live in `*_cents` integer columns; this type exists so the
/// arithmetic between reading and writing those columns cannot accidentally
/// pick up fractional cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Wraps a raw cent count.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(28_500_000); // $285,000.00
    /// assert_eq!(price.cents(), 28_500_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// The raw cent count, for storage and arithmetic at the edges.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole-dollar portion, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Sub-dollar portion, always in `0..=99`.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The zero amount. Starting point for accumulating a total.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// True for exactly zero cents.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Line-total arithmetic: this unit price times an ordered quantity.
    ///
    /// Checkout snapshots `products.price_cents` into the line item and
    /// multiplies here; the order total is the sum of these products.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let snapshot = Money::from_cents(8_500_000); // $85,000.00
    /// assert_eq!(snapshot.multiply_quantity(2).cents(), 17_000_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Logging/debugging format, e.g. `$45000.00` or `-$5.50`.
///
/// A UI layer would add grouping and locale handling; the storefront core
/// deliberately does not.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
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

/// `total += line_total`, the checkout accumulation step.
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

/// Quantity scaling via the `*` operator, equivalent to `multiply_quantity`.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of line totals into an order total.
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
    fn test_cents_round_trip() {
        let price = Money::from_cents(28_500_000);
        assert_eq!(price.cents(), 28_500_000);
        assert_eq!(price.dollars(), 285_000);
        assert_eq!(price.cents_part(), 0);

        let odd = Money::from_cents(1099);
        assert_eq!(odd.dollars(), 10);
        assert_eq!(odd.cents_part(), 99);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Money::from_cents(4_500_000).to_string(), "$45000.00");
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_add_sub_and_accumulate() {
        let a = Money::from_cents(1_000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1_250);
        assert_eq!((a - b).cents(), 750);

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total.cents(), 1_250);
    }

    #[test]
    fn test_zero_and_default() {
        assert!(Money::zero().is_zero());
        assert_eq!(Money::default(), Money::zero());
        assert!(!Money::from_cents(1).is_zero());
    }

    /// An order total is the exact sum of its line totals; the checkout
    /// transaction depends on there being no rounding anywhere in this path.
    #[test]
    fn test_order_total_is_exact_sum_of_lines() {
        let lines = [
            Money::from_cents(28_500_000).multiply_quantity(2), // 2 × $285,000.00
            Money::from_cents(4_500_000).multiply_quantity(1),  // 1 × $45,000.00
            Money::from_cents(8_500_000).multiply_quantity(3),  // 3 × $85,000.00
        ];

        let total: Money = lines.into_iter().sum();
        assert_eq!(total.cents(), 87_000_000);
        assert_eq!(total.to_string(), "$870000.00");
    }

    #[test]
    fn test_operator_mul_matches_multiply_quantity() {
        let unit = Money::from_cents(299);
        assert_eq!((unit * 3).cents(), unit.multiply_quantity(3).cents());
    }

    /// The largest catalog price at the per-line quantity cap stays far
    /// inside i64, so plain multiplication is safe.
    #[test]
    fn test_no_overflow_at_catalog_scale() {
        let unit_price = Money::from_cents(32_000_000); // $320,000.00
        let line_total = unit_price.multiply_quantity(999);
        assert_eq!(line_total.cents(), 31_968_000_000);
    }
}
