//! Currency codes and their decimal precision.

use std::fmt;
use std::str::FromStr;

use super::error::{MoneyError, MoneyResult};

/// A 3-letter currency code and the number of fractional digits it uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency {
    code: String,
    precision: u8,
}

impl Currency {
    /// Parses a currency code, case-insensitively.
    ///
    /// The precision comes from a fixed table: `IRR` has no minor unit,
    /// `CNY` and `VND` use tenths, `BHD`, `IQD`, `KWD`, `LYD`, `OMR` and
    /// `TND` use thousandths, every other code uses hundredths.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidCurrencyCode`] unless the uppercased code
    /// is exactly 3 ASCII letters.
    pub fn parse(code: &str) -> MoneyResult<Self> {
        let code = code.to_ascii_uppercase();

        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(MoneyError::InvalidCurrencyCode(code));
        }

        let precision = match code.as_str() {
            "IRR" => 0,
            "CNY" | "VND" => 1,
            "BHD" | "IQD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
            _ => 2,
        };

        Ok(Self { code, precision })
    }

    /// Returns the ISO 4217 code, e.g. `"EUR"`.
    #[must_use]
    pub fn iso_code(&self) -> &str {
        &self.code
    }

    /// Returns the code as shown to users.
    #[must_use]
    pub fn display_string(&self) -> &str {
        &self.code
    }

    /// Returns the number of fractional digits of this currency.
    #[must_use]
    pub const fn precision(&self) -> u8 {
        self.precision
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_string())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
