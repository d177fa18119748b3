//! Money error types.
//!
//! Every failure of parsing, amount construction, rate derivation and
//! conversion is a distinct variant so callers can match on the kind and
//! render a precise message.

use thiserror::Error;

use moneyconv_shared::AppError;

/// Result type alias using `MoneyError`.
pub type MoneyResult<T> = Result<T, MoneyError>;

/// Errors that can occur while handling money values.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// Text is not of the form `[digits](.[digits])?`.
    #[error("unable to convert the decimal: {0}")]
    InvalidDecimal(String),

    /// Magnitude reaches or exceeds 10^12 subunits.
    #[error("quantity over 10^12 is too large")]
    TooLarge,

    /// Code is not exactly 3 ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    /// Quantity carries more fractional digits than its currency allows.
    #[error("quantity is too precise: {precision} digits, currency allows {max}")]
    TooPrecise {
        /// Fractional digits of the quantity.
        precision: u8,
        /// Fractional digits allowed by the currency.
        max: u8,
    },

    /// Source or target currency is absent from the rate table.
    #[error("couldn't find the exchange rate: {0}")]
    ChangeRateNotFound(String),

    /// The rate source failed.
    #[error("exchange rate unavailable: {0}")]
    RateUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl MoneyError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDecimal(_) => "INVALID_DECIMAL",
            Self::TooLarge => "TOO_LARGE",
            Self::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
            Self::TooPrecise { .. } => "TOO_PRECISE",
            Self::ChangeRateNotFound(_) => "CHANGE_RATE_NOT_FOUND",
            Self::RateUnavailable(_) => "RATE_UNAVAILABLE",
        }
    }
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::InvalidDecimal(_) | MoneyError::InvalidCurrencyCode(_) => {
                Self::InvalidInput(err.to_string())
            }
            MoneyError::TooLarge
            | MoneyError::TooPrecise { .. }
            | MoneyError::ChangeRateNotFound(_) => Self::Conversion(err.to_string()),
            MoneyError::RateUnavailable(_) => Self::ExternalService(err.to_string()),
        }
    }
}
