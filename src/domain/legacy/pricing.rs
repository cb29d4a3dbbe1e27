//! Pricing rules for legacy licenses.
//!
//! All arithmetic is exact integer cents with round-half-to-even, so
//! `2999.00 -> 1999.00` is 33.34% off and reports as 33.

use crate::domain::foundation::{div_round_half_even, Money, Percentage};

/// Default list price of a new license.
pub const DEFAULT_ORIGINAL_PRICE: Money = Money::from_units(2999);

/// Default selling price of a new license.
pub const DEFAULT_CURRENT_PRICE: Money = Money::from_units(1999);

/// Discount fields derived from the two prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedDiscount {
    pub is_discounted: bool,
    pub discount_percentage: Percentage,
}

/// Computes the derived discount for a price pair.
///
/// A zero list price or a selling price at or above list yields no
/// discount. A free license against a non-zero list price is 100% off.
pub fn derive_discount(original: Money, current: Money) -> DerivedDiscount {
    if original.is_zero() || current >= original {
        return DerivedDiscount {
            is_discounted: false,
            discount_percentage: Percentage::ZERO,
        };
    }

    let saved = i128::from(original.cents() - current.cents());
    let whole_percent = div_round_half_even(saved * 100, i128::from(original.cents()));

    DerivedDiscount {
        is_discounted: true,
        discount_percentage: Percentage::new(u8::try_from(whole_percent).unwrap_or(100)),
    }
}

/// Selling price after taking `percent_off` from the list price.
///
/// Always computed from the list price, so re-applying the same
/// percentage is idempotent.
pub fn reprice(original: Money, percent_off: Percentage) -> Money {
    original.discounted_by(percent_off)
}

/// Customer-facing price, with the list price in brackets when discounted.
pub fn price_display(original: Money, current: Money, is_discounted: bool) -> String {
    if is_discounted {
        format!("{} ({})", current, original)
    } else {
        current.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dollars(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    #[test]
    fn launch_pricing_is_thirty_three_percent_off() {
        let derived = derive_discount(dollars(299_900), dollars(199_900));
        assert!(derived.is_discounted);
        assert_eq!(derived.discount_percentage.value(), 33);
    }

    #[test]
    fn equal_prices_are_not_discounted() {
        let derived = derive_discount(dollars(100_000), dollars(100_000));
        assert!(!derived.is_discounted);
        assert_eq!(derived.discount_percentage, Percentage::ZERO);
    }

    #[test]
    fn price_above_list_reports_no_discount() {
        let derived = derive_discount(dollars(100_000), dollars(120_000));
        assert!(!derived.is_discounted);
        assert_eq!(derived.discount_percentage, Percentage::ZERO);
    }

    #[test]
    fn zero_list_price_reports_no_discount() {
        let derived = derive_discount(Money::ZERO, Money::ZERO);
        assert!(!derived.is_discounted);
    }

    #[test]
    fn free_license_is_fully_discounted() {
        let derived = derive_discount(dollars(299_900), Money::ZERO);
        assert!(derived.is_discounted);
        assert_eq!(derived.discount_percentage, Percentage::HUNDRED);
    }

    #[test]
    fn exact_half_percent_rounds_to_even() {
        // 12.5% rounds down to 12, 13.5% rounds up to 14
        assert_eq!(derive_discount(dollars(100_000), dollars(87_500)).discount_percentage.value(), 12);
        assert_eq!(derive_discount(dollars(100_000), dollars(86_500)).discount_percentage.value(), 14);
    }

    #[test]
    fn largest_list_price_derives_without_overflow() {
        let derived = derive_discount(Money::MAX, Money::ZERO);
        assert_eq!(derived.discount_percentage, Percentage::HUNDRED);

        let half = reprice(Money::MAX, Percentage::new(50));
        assert_eq!(derive_discount(Money::MAX, half).discount_percentage.value(), 50);
    }

    #[test]
    fn half_off_one_thousand() {
        assert_eq!(reprice(dollars(100_000), Percentage::new(50)), dollars(50_000));
    }

    #[test]
    fn defaults_match_launch_prices() {
        assert_eq!(DEFAULT_ORIGINAL_PRICE.cents(), 299_900);
        assert_eq!(DEFAULT_CURRENT_PRICE.cents(), 199_900);
    }

    #[test]
    fn display_shows_list_price_only_when_discounted() {
        assert_eq!(
            price_display(dollars(299_900), dollars(199_900), true),
            "$1999.00 ($2999.00)"
        );
        assert_eq!(price_display(dollars(299_900), dollars(299_900), false), "$2999.00");
    }

    proptest! {
        #[test]
        fn reprice_is_idempotent(original in 0i64..100_000_000, pct in 0u8..=100) {
            let original = dollars(original);
            let pct = Percentage::new(pct);
            prop_assert_eq!(reprice(original, pct), reprice(original, pct));
        }

        #[test]
        fn derived_flag_matches_price_comparison(original in 1i64..100_000_000, current in 0i64..100_000_000) {
            let derived = derive_discount(dollars(original), dollars(current));
            prop_assert_eq!(derived.is_discounted, current < original);
            prop_assert!(derived.discount_percentage.value() <= 100);
        }

        #[test]
        fn repriced_discount_is_close_to_requested(original in 100i64..100_000_000, pct in 0u8..=100) {
            let original = dollars(original);
            let current = reprice(original, Percentage::new(pct));
            let derived = derive_discount(original, current);
            let diff = i16::from(derived.discount_percentage.value()) - i16::from(pct);
            prop_assert!(diff.abs() <= 1, "requested {} got {}", pct, derived.discount_percentage);
        }
    }
}
