//! A quantity of money in a given currency.

use std::fmt;

use super::currency::Currency;
use super::decimal::{Decimal, MAX_SUBUNITS};
use super::error::{MoneyError, MoneyResult};

/// A quantity of money in a given currency.
///
/// The quantity is always stored with exactly the currency's precision, so
/// two amounts of the same value and currency compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    quantity: Decimal,
    currency: Currency,
}

impl Amount {
    /// Creates an amount, padding the quantity to the currency's precision.
    ///
    /// # Errors
    ///
    /// - [`MoneyError::TooPrecise`] if the quantity has more fractional digits
    ///   than the currency supports (fractions of a cent are never truncated)
    /// - [`MoneyError::TooLarge`] if the padded quantity reaches 10^12 subunits
    pub fn new(quantity: Decimal, currency: Currency) -> MoneyResult<Self> {
        check_precision(quantity, &currency)?;

        let amount = Self {
            quantity: quantity.rescale(currency.precision())?,
            currency,
        };
        amount.validate()?;

        Ok(amount)
    }

    /// Parses a quantity and a currency code into an amount.
    ///
    /// # Errors
    ///
    /// Any error of [`Decimal::parse`], [`Currency::parse`] or [`Amount::new`].
    pub fn parse(quantity: &str, code: &str) -> MoneyResult<Self> {
        let quantity = Decimal::parse(quantity)?;
        let currency = Currency::parse(code)?;
        Self::new(quantity, currency)
    }

    /// Re-checks the precision and magnitude invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::TooPrecise`] or [`MoneyError::TooLarge`].
    pub fn validate(&self) -> MoneyResult<()> {
        check_precision(self.quantity, &self.currency)?;

        if self.quantity.subunits().unsigned_abs() >= MAX_SUBUNITS.unsigned_abs() {
            return Err(MoneyError::TooLarge);
        }

        Ok(())
    }

    /// Returns the quantity, at the currency's precision.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(&self) -> &Currency {
        &self.currency
    }
}

fn check_precision(quantity: Decimal, currency: &Currency) -> MoneyResult<()> {
    if quantity.precision() > currency.precision() {
        return Err(MoneyError::TooPrecise {
            precision: quantity.precision(),
            max: currency.precision(),
        });
    }

    Ok(())
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.currency)
    }
}
