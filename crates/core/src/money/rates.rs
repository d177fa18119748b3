//! Rate table anchored to a base currency, and cross-rate derivation.

use std::collections::HashMap;

use tracing::debug;

use super::convert::{ExchangeRate, RateSource};
use super::currency::Currency;
use super::decimal::Decimal;
use super::error::{MoneyError, MoneyResult};

/// Code of the currency every table rate is expressed against.
pub const BASE_CURRENCY_CODE: &str = "EUR";

/// Fractional digits kept when deriving a cross rate.
///
/// Most published rates carry at most 5 or 6 digits, so 10 leaves room for
/// the division without losing significance.
pub const RATE_PRECISION: u8 = 10;

/// Rates of each currency against the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    /// Builds a table from `(code, rate to base)` pairs.
    ///
    /// Later pairs overwrite earlier ones with the same code. The base
    /// currency is always present with a rate of exactly 1.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut rates: HashMap<String, Decimal> = pairs
            .into_iter()
            .map(|(code, rate)| (code.into(), rate))
            .collect();

        rates.insert(BASE_CURRENCY_CODE.to_string(), Decimal::ONE);

        Self { rates }
    }

    /// Builds a table from `(code, rate as decimal text)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the parse error of the first rate that is not a valid decimal.
    pub fn from_text_pairs<I, S, T>(pairs: I) -> MoneyResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(code, rate)| Ok((code.into(), Decimal::parse(rate.as_ref())?)))
            .collect::<MoneyResult<Vec<(String, Decimal)>>>()?;

        Ok(Self::from_pairs(pairs))
    }

    /// Returns every known rate by currency code, base currency included.
    #[must_use]
    pub const fn rates_by_code(&self) -> &HashMap<String, Decimal> {
        &self.rates
    }

    /// Derives the rate to convert `source` into `target`.
    ///
    /// The rate is `table[target] / table[source]`, computed exactly to
    /// [`RATE_PRECISION`] fractional digits (last digit rounded half away from
    /// zero) and canonicalized. When that many digits would not fit the
    /// decimal ceiling, fewer fractional digits are kept.
    ///
    /// A currency converted into itself always has a rate of exactly 1, even
    /// when it is missing from the table.
    ///
    /// # Errors
    ///
    /// - [`MoneyError::ChangeRateNotFound`] if either currency is missing or
    ///   the source rate is zero
    /// - [`MoneyError::TooLarge`] if even the integer part does not fit
    pub fn rate_between(&self, source: &Currency, target: &Currency) -> MoneyResult<ExchangeRate> {
        if source.iso_code() == target.iso_code() {
            return Ok(ExchangeRate::ONE);
        }

        let source_rate = self.lookup(source, "source")?;
        let target_rate = self.lookup(target, "target")?;

        if source_rate.is_zero() {
            return Err(MoneyError::ChangeRateNotFound(format!(
                "source currency {source} has a zero rate"
            )));
        }

        let rate = divide_to_fit(target_rate, source_rate)?;

        debug!(
            source = %source,
            target = %target,
            rate = %rate,
            "Derived cross rate"
        );

        Ok(ExchangeRate::new(rate))
    }

    fn lookup(&self, currency: &Currency, side: &str) -> MoneyResult<Decimal> {
        self.rates.get(currency.iso_code()).copied().ok_or_else(|| {
            MoneyError::ChangeRateNotFound(format!(
                "failed to find the {side} currency {currency}"
            ))
        })
    }
}

impl RateSource for RateTable {
    type Error = MoneyError;

    fn fetch_rate(&self, source: &Currency, target: &Currency) -> MoneyResult<ExchangeRate> {
        self.rate_between(source, target)
    }
}

/// Divides with as many fractional digits as fit, up to [`RATE_PRECISION`].
fn divide_to_fit(numerator: Decimal, denominator: Decimal) -> MoneyResult<Decimal> {
    for precision in (0..=RATE_PRECISION).rev() {
        match numerator.divide(denominator, precision) {
            Err(MoneyError::TooLarge) => {}
            result => return result,
        }
    }

    Err(MoneyError::TooLarge)
}
