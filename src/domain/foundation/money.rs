//! Money value object, stored as whole cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Percentage, ValidationError};

/// A non-negative monetary amount in cents.
///
/// Two-decimal prices are exact in this representation, so pricing
/// arithmetic never goes through floating point. A single amount is at most
/// `Money::MAX`; only `Money::total` may go above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    /// Largest single amount: 99,999,999.99.
    pub const MAX: Self = Self(9_999_999_999);

    /// Creates an amount from cents, rejecting negatives and anything
    /// above `MAX`.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::invalid_format(
                "amount",
                "amount cannot be negative",
            ));
        }
        if cents > Self::MAX.0 {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("amount cannot exceed {}", Self::MAX.to_decimal_string()),
            ));
        }
        Ok(Self(cents))
    }

    /// Sum of several amounts. Not bounded by `MAX`; saturates at the
    /// representable limit.
    pub fn total(amounts: impl IntoIterator<Item = Money>) -> Money {
        Money(amounts.into_iter().fold(0i64, |acc, m| acc.saturating_add(m.0)))
    }

    /// Rebuilds a total read back from storage. Only negatives are rejected.
    pub fn total_from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::invalid_format(
                "amount",
                "amount cannot be negative",
            ));
        }
        Ok(Self(cents))
    }

    /// Mean of `count` amounts summing to `total`, rounded half-to-even.
    /// `None` when `count` is zero.
    pub fn average(total: Money, count: u64) -> Option<Money> {
        if count == 0 {
            return None;
        }
        let mean = div_round_half_even(i128::from(total.0), i128::from(count));
        i64::try_from(mean).ok().map(Money)
    }

    /// Creates an amount from whole currency units.
    pub const fn from_units(units: u32) -> Self {
        Self(units as i64 * 100)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns this amount reduced by `percent_off`, rounded half-to-even
    /// to the cent.
    pub fn discounted_by(&self, percent_off: Percentage) -> Money {
        let keep = 100 - i128::from(percent_off.value());
        let cents = div_round_half_even(i128::from(self.0) * keep, 100);
        // Never above the starting amount, so it fits.
        Money(i64::try_from(cents).unwrap_or(self.0))
    }

    /// Formats as a plain decimal string such as `1999.00`.
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.to_decimal_string())
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    /// Parses `"1999"`, `"1999.5"` or `"1999.00"`. At most two fraction
    /// digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::invalid_format("amount", format!("'{}' is not a valid amount", s));
        let s = s.trim();
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(invalid)?;
        Money::from_cents(cents)
    }
}

/// Integer division with round-half-to-even. `denominator` must be positive.
pub(crate) fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    let twice = remainder * 2;
    if twice > denominator || (twice == denominator && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}
