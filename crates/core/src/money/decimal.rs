//! Exact fixed-point decimal numbers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! A `Decimal` is an integer number of subunits scaled by a power of ten,
//! e.g. `1.52` is stored as `{ subunits: 152, precision: 2 }`.
//!
//! Magnitudes are bounded by [`MAX_SUBUNITS`] so that the product of two
//! decimals always fits the 128-bit intermediate used during conversion.

use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use super::error::{MoneyError, MoneyResult};

/// Exclusive ceiling on the magnitude of `subunits`: a thousand billion (10^12).
pub const MAX_SUBUNITS: i64 = 1_000_000_000_000;

/// A fixed-point decimal number.
///
/// Equality compares the raw representation, so values produced by parsing
/// or arithmetic are always canonical (see [`Decimal::canonical`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Decimal {
    /// Number of subunits; divide by 10^precision to get the value.
    subunits: i64,
    /// Number of digits after the decimal separator.
    precision: u8,
}

impl Decimal {
    /// Zero.
    pub const ZERO: Self = Self::new(0, 0);

    /// One.
    pub const ONE: Self = Self::new(1, 0);

    /// Creates a decimal from its raw parts without any normalization.
    #[must_use]
    pub const fn new(subunits: i64, precision: u8) -> Self {
        Self {
            subunits,
            precision,
        }
    }

    /// Returns the number of subunits.
    #[must_use]
    pub const fn subunits(self) -> i64 {
        self.subunits
    }

    /// Returns the number of fractional digits.
    #[must_use]
    pub const fn precision(self) -> u8 {
        self.precision
    }

    /// Returns true if the value is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.subunits == 0
    }

    /// Parses text of the form `[digits](.[digits])?`.
    ///
    /// The precision is the number of fractional digits as written, and the
    /// result is canonicalized: `"8.200"` parses to `{ 82, 1 }`.
    ///
    /// # Errors
    ///
    /// - [`MoneyError::InvalidDecimal`] if the text is not numeric
    /// - [`MoneyError::TooLarge`] if the digits, read as an integer, reach 10^12
    pub fn parse(value: &str) -> MoneyResult<Self> {
        let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));

        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MoneyError::InvalidDecimal(format!(
                "{value:?}: fractional part is not numeric"
            )));
        }

        let parsed = format!("{integer}{fraction}")
            .parse::<i64>()
            .map_err(|err| match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => MoneyError::TooLarge,
                _ => MoneyError::InvalidDecimal(format!("{value:?}: {err}")),
            })?;

        if !within_bounds(i128::from(parsed)) {
            return Err(MoneyError::TooLarge);
        }

        let precision = u8::try_from(fraction.len()).map_err(|_| {
            MoneyError::InvalidDecimal(format!("{value:?}: too many fractional digits"))
        })?;

        Ok(Self::new(parsed, precision).canonical())
    }

    /// Removes trailing zero subunits, decreasing precision until the last
    /// digit is non-zero or precision reaches 0.
    #[must_use]
    pub const fn canonical(self) -> Self {
        let mut subunits = self.subunits;
        let mut precision = self.precision;

        while subunits % 10 == 0 && precision > 0 {
            subunits /= 10;
            precision -= 1;
        }

        Self::new(subunits, precision)
    }

    /// Returns true if [`Decimal::canonical`] would leave the value unchanged.
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        self.precision == 0 || self.subunits % 10 != 0
    }

    /// Multiplies two decimals.
    ///
    /// The product is computed on a 128-bit intermediate with precision
    /// `self.precision + rhs.precision`, then canonicalized.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::TooLarge`] if the canonical product does not fit.
    pub fn multiply(self, rhs: Self) -> MoneyResult<Self> {
        self.product(rhs).canonical().narrow()
    }

    /// Changes the precision to exactly `precision` digits.
    ///
    /// Excess digits are TRUNCATED toward zero, not rounded: `1.239` rescaled
    /// to 2 digits is `1.23`, and `-1.239` is `-1.23`. Missing digits are
    /// padded with zeros. The result is not canonicalized.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::TooLarge`] if the rescaled value does not fit.
    pub fn rescale(self, precision: u8) -> MoneyResult<Self> {
        WideDecimal::from(self).rescale(precision)
    }

    /// Returns the full-width product of two decimals, before canonicalization.
    pub(crate) fn product(self, rhs: Self) -> WideDecimal {
        WideDecimal {
            subunits: i128::from(self.subunits) * i128::from(rhs.subunits),
            precision: u16::from(self.precision) + u16::from(rhs.precision),
        }
    }

    /// Divides `self` by `rhs`, keeping exactly `precision` fractional digits
    /// before canonicalization. The last digit is rounded half away from zero.
    ///
    /// # Errors
    ///
    /// - [`MoneyError::InvalidDecimal`] if `rhs` is zero
    /// - [`MoneyError::TooLarge`] if the quotient does not fit
    pub(crate) fn divide(self, rhs: Self, precision: u8) -> MoneyResult<Self> {
        if rhs.is_zero() {
            return Err(MoneyError::InvalidDecimal("division by zero".to_string()));
        }

        // self / rhs * 10^precision
        //   = self.subunits * 10^(rhs.precision + precision)
        //     / (rhs.subunits * 10^self.precision)
        let up = u32::from(rhs.precision) + u32::from(precision);
        let down = u32::from(self.precision);

        let (numerator, denominator) = if up >= down {
            let factor = pow10(up - down).ok_or(MoneyError::TooLarge)?;
            (
                i128::from(self.subunits)
                    .checked_mul(factor)
                    .ok_or(MoneyError::TooLarge)?,
                i128::from(rhs.subunits),
            )
        } else {
            let factor = pow10(down - up).ok_or(MoneyError::TooLarge)?;
            (
                i128::from(self.subunits),
                i128::from(rhs.subunits)
                    .checked_mul(factor)
                    .ok_or(MoneyError::TooLarge)?,
            )
        };

        let mut quotient = numerator / denominator;
        let remainder = numerator % denominator;
        if remainder.unsigned_abs() * 2 >= denominator.unsigned_abs() {
            quotient += numerator.signum() * denominator.signum();
        }

        WideDecimal {
            subunits: quotient,
            precision: u16::from(precision),
        }
        .canonical()
        .narrow()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.subunits < 0 { "-" } else { "" };
        let abs = self.subunits.unsigned_abs();

        if self.precision == 0 {
            return write!(f, "{sign}{abs}");
        }

        let fraction_len = usize::from(self.precision);
        let digits = format!("{abs:0>width$}", width = fraction_len + 1);
        let (integer, fraction) = digits.split_at(digits.len() - fraction_len);

        write!(f, "{sign}{integer}.{fraction}")
    }
}

impl FromStr for Decimal {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Raises 10 to the given power.
///
/// Constant for the common small powers, checked for the rest.
pub(crate) const fn pow10(power: u32) -> Option<i128> {
    match power {
        0 => Some(1),
        1 => Some(10),
        2 => Some(100),
        3 => Some(1000),
        _ => 10_i128.checked_pow(power),
    }
}

fn within_bounds(subunits: i128) -> bool {
    subunits.unsigned_abs() < u128::from(MAX_SUBUNITS.unsigned_abs())
}

/// A decimal with a 128-bit mantissa, used for intermediate results that
/// may exceed the [`MAX_SUBUNITS`] ceiling before being rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WideDecimal {
    pub(crate) subunits: i128,
    pub(crate) precision: u16,
}

impl WideDecimal {
    /// Removes trailing zero subunits.
    pub(crate) const fn canonical(self) -> Self {
        let mut subunits = self.subunits;
        let mut precision = self.precision;

        while subunits % 10 == 0 && precision > 0 {
            subunits /= 10;
            precision -= 1;
        }

        Self {
            subunits,
            precision,
        }
    }

    /// Truncates or pads to exactly `precision` digits and checks the range.
    pub(crate) fn rescale(self, precision: u8) -> MoneyResult<Decimal> {
        let target = u16::from(precision);

        let subunits = match self.precision.cmp(&target) {
            Ordering::Greater => match pow10(u32::from(self.precision - target)) {
                Some(factor) => self.subunits / factor,
                // Dividing by more than 10^38 leaves nothing.
                None => 0,
            },
            Ordering::Less => pow10(u32::from(target - self.precision))
                .and_then(|factor| self.subunits.checked_mul(factor))
                .ok_or(MoneyError::TooLarge)?,
            Ordering::Equal => self.subunits,
        };

        Self {
            subunits,
            precision: target,
        }
        .narrow()
    }

    /// Converts back to a `Decimal`, checking the magnitude ceiling.
    pub(crate) fn narrow(self) -> MoneyResult<Decimal> {
        if !within_bounds(self.subunits) {
            return Err(MoneyError::TooLarge);
        }

        let subunits = i64::try_from(self.subunits).map_err(|_| MoneyError::TooLarge)?;
        let precision = u8::try_from(self.precision).map_err(|_| {
            MoneyError::InvalidDecimal("more than 255 fractional digits".to_string())
        })?;

        Ok(Decimal::new(subunits, precision))
    }
}

impl From<Decimal> for WideDecimal {
    fn from(value: Decimal) -> Self {
        Self {
            subunits: i128::from(value.subunits),
            precision: u16::from(value.precision),
        }
    }
}
