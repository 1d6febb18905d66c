//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a year of marketplace payouts in floating point:               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The annual P&L then drifts by a few sen from the per-sale figures.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Sen                                              │
//! │    RM 12.50 is stored as 1250 sen                                       │
//! │    Every fold in `metrics` is exact and order independent               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cloudstock_core::money::Money;
//!
//! let price = Money::from_sen(15_000); // RM 150.00
//! let fee = Money::from_sen(1_500);    // RM 15.00
//! assert_eq!((price - fee).sen(), 13_500);
//!
//! // Form input is parsed from text, never from floats
//! let parsed: Money = "12.5".parse().unwrap();
//! assert_eq!(parsed.sen(), 1_250);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in sen (1/100 of a ringgit).
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds without restock carry a negative margin
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as ringgit**: JSON carries `80` or `173.42`, the same
///   numbers the web app has always stored; sen exist only in memory
/// - **Bounded**: form text stops at [`Money::MAX_INPUT_SEN`], JSON at
///   [`Money::MAX_SEN`], and the operators saturate instead of overflowing
///
/// ## Where Money is Used
/// ```text
/// InventoryItem.unit_price + shipping_charge ──► total_unit_cost
///
/// Sale.selling_price ─┬─► Totals.total_revenue ─► gross / net profit
///                     └─► PlatformTotal.total
///
/// Expense.amount (Operating) ──► AnnualReport.expense_breakdown
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from JSON: RM 10 trillion.
    pub const MAX_SEN: i64 = 1_000_000_000_000_000;

    /// Largest magnitude accepted from form text. Derived fields combine up
    /// to three inputs (`selling_price - platform_fee - cogs`) and must still
    /// load back under [`Money::MAX_SEN`].
    pub const MAX_INPUT_SEN: i64 = Money::MAX_SEN / 10;

    /// Creates a Money value from sen (the smallest currency unit).
    ///
    /// ```rust
    /// use cloudstock_core::money::Money;
    ///
    /// let price = Money::from_sen(1099); // RM 10.99
    /// assert_eq!(price.sen(), 1099);
    /// ```
    #[inline]
    pub const fn from_sen(sen: i64) -> Self {
        Money(sen)
    }

    /// Returns the value in sen.
    #[inline]
    pub const fn sen(&self) -> i64 {
        self.0
    }

    /// Returns the whole-ringgit portion (truncated toward zero).
    #[inline]
    pub const fn ringgit(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the sen portion (always 0-99).
    #[inline]
    pub const fn sen_part(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text typed into a form.
///
/// ## Accepted Input
/// ```text
/// "12"        → 1200 sen
/// "12.5"      → 1250 sen
/// "-3.05"     → -305 sen
/// "1,234.50"  → 123450 sen   (thousands separators are ignored)
/// "0.125"     → 13 sen       (third digit rounds half away from zero)
/// "abc" / ""  → ValidationError::InvalidFormat
/// ```
///
/// Callers that must never fail (form coercion) go through
/// [`crate::validation::coerce_money`].
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned.as_str())),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a number"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("is too large"))?
        };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let sen = whole_value
            .checked_mul(100)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .filter(|v| *v <= Money::MAX_INPUT_SEN)
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Money(if negative { -sen } else { sen }))
    }
}

// =============================================================================
// JSON Representation
// =============================================================================

/// Writes whole amounts as integers (`80`) and the rest as decimals
/// (`173.42`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            // Reads back to the same sen for every value within MAX_SEN.
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

/// Reads a ringgit amount.
///
/// ```text
/// 80        → 8000 sen
/// 173.42    → 17342 sen
/// 0.125     → 13 sen      (rounded half away from zero, like FromStr)
/// "12.50"   → 1250 sen    (numeric text from older form saves)
/// 1e300     → error       (beyond MAX_SEN)
/// ```
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl MoneyVisitor {
    fn bounded<E: de::Error>(sen: Option<i64>) -> Result<Money, E> {
        sen.filter(|v| v.checked_abs().is_some_and(|abs| abs <= Money::MAX_SEN))
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }
}

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in ringgit")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Self::bounded(v.checked_mul(100))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Self::bounded(i64::try_from(v).ok().and_then(|v| v.checked_mul(100)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        let sen = (v * 100.0).round();
        if !sen.is_finite() || sen.abs() > Money::MAX_SEN as f64 {
            return Err(E::custom("amount out of range"));
        }
        Ok(Money(sen as i64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with two decimals and no currency symbol.
///
/// The symbol ("RM") is a display concern owned by the app configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.ringgit().abs(), self.sen_part())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Lets the metric folds write `sales.iter().map(|s| s.cogs).sum()`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
