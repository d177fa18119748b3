//! Currency conversion.
//!
//! CRITICAL: Rounding strategy for conversion:
//! - The product of amount and rate is computed exactly on 128 bits
//! - It is then TRUNCATED toward zero to the target currency's precision
//! - There is no rounding step: 0.019 EUR becomes 0.01 EUR, never 0.02

use std::fmt;

use tracing::debug;

use super::amount::Amount;
use super::currency::Currency;
use super::decimal::Decimal;
use super::error::{MoneyError, MoneyResult};

/// Units of target currency per unit of source currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// The rate between a currency and itself.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Wraps a decimal as an exchange rate.
    #[must_use]
    pub const fn new(rate: Decimal) -> Self {
        Self(rate)
    }

    /// Returns the rate as a decimal.
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for ExchangeRate {
    fn from(rate: Decimal) -> Self {
        Self(rate)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Anything that can tell the exchange rate between two currencies.
///
/// Implementations own their transport, caching, retries and timeouts; the
/// conversion treats a call as a single synchronous attempt.
pub trait RateSource {
    /// Error returned when no rate can be provided.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the rate to convert `source` into `target`.
    fn fetch_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> Result<ExchangeRate, Self::Error>;
}

impl<S: RateSource + ?Sized> RateSource for &S {
    type Error = S::Error;

    fn fetch_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> Result<ExchangeRate, Self::Error> {
        (**self).fetch_rate(source, target)
    }
}

/// Converts an amount into the target currency.
///
/// The rate comes from `rates`; the product is truncated (not rounded) to
/// the target currency's precision and validated as a new [`Amount`].
///
/// # Errors
///
/// - [`MoneyError::RateUnavailable`] wrapping the rate source's error
/// - [`MoneyError::TooLarge`] if the converted quantity reaches 10^12 subunits
/// - [`MoneyError::TooPrecise`] if the result violates the target precision
pub fn convert<R: RateSource>(
    amount: &Amount,
    target: &Currency,
    rates: &R,
) -> MoneyResult<Amount> {
    let rate = rates
        .fetch_rate(amount.currency(), target)
        .map_err(|err| MoneyError::RateUnavailable(Box::new(err)))?;

    let converted = apply_exchange_rate(amount.quantity(), rate, target)?;

    debug!(
        from = %amount,
        to = %converted,
        rate = %rate,
        "Converted amount"
    );

    Ok(converted)
}

/// Multiplies a quantity by a rate and truncates it to the target precision.
fn apply_exchange_rate(
    quantity: Decimal,
    rate: ExchangeRate,
    target: &Currency,
) -> MoneyResult<Amount> {
    let product = quantity.product(rate.as_decimal()).canonical();
    let rescaled = product.rescale(target.precision())?;

    let converted = Amount::new(rescaled, target.clone())?;
    converted.validate()?;

    Ok(converted)
}
