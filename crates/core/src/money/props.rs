//! Property-based tests for money arithmetic.
//!
//! `rust_decimal` serves as the exact-arithmetic oracle.

use std::str::FromStr;

use proptest::prelude::*;
use rust_decimal::RoundingStrategy;

use super::amount::Amount;
use super::convert::{ExchangeRate, convert};
use super::currency::Currency;
use super::decimal::{Decimal, MAX_SUBUNITS};
use super::error::MoneyError;
use super::rates::{RATE_PRECISION, RateTable};

/// Strategy to generate any in-range decimal with up to 10 fractional digits.
fn any_decimal() -> impl Strategy<Value = Decimal> {
    (-(MAX_SUBUNITS - 1)..MAX_SUBUNITS, 0u8..=10).prop_map(|(s, p)| Decimal::new(s, p))
}

/// Strategy to generate positive amounts in cents (0.01 to 1,000,000.00).
fn positive_cents() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy to generate positive rates with 4 digits (0.0001 to 1000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 4).canonical())
}

/// Strategy to generate valid currency codes.
fn currency_code() -> impl Strategy<Value = String> {
    "[A-Za-z]{3}"
}

fn oracle(value: Decimal) -> rust_decimal::Decimal {
    rust_decimal::Decimal::new(value.subunits(), u32::from(value.precision()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Formatting then parsing yields the canonical form.
    #[test]
    fn prop_format_parse_round_trip(value in any_decimal()) {
        let parsed = Decimal::parse(&value.to_string()).unwrap();
        prop_assert_eq!(parsed, value.canonical());
    }

    /// Canonicalization is idempotent.
    #[test]
    fn prop_canonical_idempotent(value in any_decimal()) {
        let once = value.canonical();
        prop_assert!(once.is_canonical());
        prop_assert_eq!(once.canonical(), once);
    }

    /// Canonicalization never changes the numeric value.
    #[test]
    fn prop_canonical_preserves_value(value in any_decimal()) {
        prop_assert_eq!(oracle(value.canonical()), oracle(value));
    }

    /// The raw product carries the sum of both precisions.
    #[test]
    fn prop_product_precision_is_sum(a in any_decimal(), b in any_decimal()) {
        let product = a.product(b);
        prop_assert_eq!(
            product.precision,
            u16::from(a.precision()) + u16::from(b.precision())
        );
    }

    /// Multiplication matches the oracle whenever it fits.
    #[test]
    fn prop_multiply_matches_oracle(cents in 1i64..100_000, rate in positive_rate()) {
        let amount = Decimal::new(cents, 2);
        let product = amount.multiply(rate).unwrap();
        prop_assert!(product.is_canonical());
        prop_assert_eq!(oracle(product), oracle(amount) * oracle(rate));
    }

    /// A currency converted into itself has a rate of exactly one.
    #[test]
    fn prop_self_rate_identity(code in currency_code()) {
        let currency = Currency::parse(&code).unwrap();
        let rates = RateTable::from_pairs(Vec::<(String, Decimal)>::new());
        prop_assert_eq!(rates.rate_between(&currency, &currency).unwrap(), ExchangeRate::ONE);
    }

    /// Construction fails with TooPrecise iff the quantity is too precise.
    #[test]
    fn prop_amount_precision_guard(
        subunits in 0i64..1_000_000,
        precision in 0u8..=5,
        code in prop_oneof![Just("IRR"), Just("VND"), Just("EUR"), Just("BHD")],
    ) {
        let currency = Currency::parse(code).unwrap();
        let result = Amount::new(Decimal::new(subunits, precision), currency.clone());

        if precision > currency.precision() {
            prop_assert!(
                matches!(result, Err(MoneyError::TooPrecise { .. })),
                "expected TooPrecise, got {:?}",
                result
            );
        } else {
            let amount = result.unwrap();
            prop_assert_eq!(amount.quantity().precision(), currency.precision());
        }
    }

    /// Conversion equals the exact product truncated toward zero.
    #[test]
    fn prop_convert_truncates_exact_product(
        cents in positive_cents(),
        rate in positive_rate(),
        target in prop_oneof![Just("IRR"), Just("VND"), Just("USD"), Just("KWD")],
    ) {
        let amount = Amount::new(Decimal::new(cents, 2), Currency::parse("EUR").unwrap()).unwrap();
        let target = Currency::parse(target).unwrap();
        let rates = RateTable::from_pairs([(target.iso_code().to_string(), rate)]);

        let converted = convert(&amount, &target, &rates).unwrap();

        let expected = (oracle(amount.quantity()) * oracle(rate))
            .round_dp_with_strategy(u32::from(target.precision()), RoundingStrategy::ToZero);
        prop_assert_eq!(oracle(converted.quantity()), expected);
        prop_assert_eq!(converted.quantity().precision(), target.precision());
    }

    /// Cross rates are the exact quotient rounded to 10 digits.
    #[test]
    fn prop_cross_rate_matches_oracle(source_rate in positive_rate(), target_rate in positive_rate()) {
        // Ten fractional digits only fit below a ratio of 100.
        prop_assume!(oracle(target_rate) < oracle(source_rate) * rust_decimal::Decimal::from(99));

        let rates = RateTable::from_pairs([("AAA", source_rate), ("BBB", target_rate)]);
        let derived = rates
            .rate_between(&Currency::parse("AAA").unwrap(), &Currency::parse("BBB").unwrap())
            .unwrap();

        let expected = (oracle(target_rate) / oracle(source_rate)).round_dp_with_strategy(
            u32::from(RATE_PRECISION),
            RoundingStrategy::MidpointAwayFromZero,
        );
        prop_assert_eq!(oracle(derived.as_decimal()), expected);
    }

    /// Arbitrary text never panics the parser.
    #[test]
    fn prop_parse_never_panics(text in "\\PC{0,20}") {
        let _ = Decimal::from_str(&text);
    }
}
