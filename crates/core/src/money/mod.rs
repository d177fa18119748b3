//! Fixed-point money arithmetic and currency conversion.

pub mod amount;
pub mod convert;
pub mod currency;
pub mod decimal;
pub mod error;
pub mod rates;

#[cfg(test)]
mod props;

pub use amount::Amount;
pub use convert::{ExchangeRate, RateSource, convert};
pub use currency::Currency;
pub use decimal::{Decimal, MAX_SUBUNITS};
pub use error::{MoneyError, MoneyResult};
pub use rates::{BASE_CURRENCY_CODE, RATE_PRECISION, RateTable};
