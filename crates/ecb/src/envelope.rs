//! The ECB daily reference rate document.
//!
//! ```xml
//! <gesmes:Envelope ...>
//!   <Cube>
//!     <Cube time='2025-04-08'>
//!       <Cube currency='USD' rate='1.0930'/>
//!       ...
//!     </Cube>
//!   </Cube>
//! </gesmes:Envelope>
//! ```
//!
//! Rates stay as text until [`RateTable::from_text_pairs`] parses them, so no
//! binary floating point is involved.

use chrono::NaiveDate;
use moneyconv_core::{Currency, ExchangeRate, RateTable};
use serde::Deserialize;

use crate::error::EcbError;

/// Root of the daily rate document.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Cube")]
    cube: OuterCube,
}

#[derive(Debug, Clone, Deserialize)]
struct OuterCube {
    #[serde(rename = "Cube")]
    daily: DailyCube,
}

#[derive(Debug, Clone, Deserialize)]
struct DailyCube {
    #[serde(rename = "@time", default)]
    time: Option<String>,
    #[serde(rename = "Cube", default)]
    rates: Vec<CurrencyRate>,
}

#[derive(Debug, Clone, Deserialize)]
struct CurrencyRate {
    #[serde(rename = "@currency")]
    currency: String,
    #[serde(rename = "@rate")]
    rate: String,
}

impl Envelope {
    /// Decodes a raw document.
    ///
    /// # Errors
    ///
    /// Returns [`EcbError::UnexpectedFormat`] if the body is not a rate document.
    pub fn parse(body: &[u8]) -> Result<Self, EcbError> {
        quick_xml::de::from_reader(body).map_err(|e| EcbError::UnexpectedFormat(e.to_string()))
    }

    /// Returns the publication date, when present and well-formed.
    #[must_use]
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.cube
            .daily
            .time
            .as_deref()
            .and_then(|time| NaiveDate::parse_from_str(time, "%Y-%m-%d").ok())
    }

    /// Returns the listed `(currency, rate)` pairs, in document order.
    pub fn rates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cube
            .daily
            .rates
            .iter()
            .map(|r| (r.currency.as_str(), r.rate.as_str()))
    }

    /// Builds the rate table against the euro.
    ///
    /// # Errors
    ///
    /// Returns [`EcbError::UnexpectedFormat`] if a rate is not a valid decimal.
    pub fn rate_table(&self) -> Result<RateTable, EcbError> {
        RateTable::from_text_pairs(self.rates())
            .map_err(|e| EcbError::UnexpectedFormat(e.to_string()))
    }

    /// Derives the rate to convert `source` into `target`.
    ///
    /// # Errors
    ///
    /// - [`EcbError::UnexpectedFormat`] if a listed rate is malformed
    /// - [`EcbError::ChangeRateNotFound`] if the pair cannot be derived
    pub fn exchange_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> Result<ExchangeRate, EcbError> {
        self.rate_table()?
            .rate_between(source, target)
            .map_err(EcbError::ChangeRateNotFound)
    }
}

/// Decodes `body` and derives the rate to convert `source` into `target`.
pub(crate) fn read_rate_from_response(
    source: &Currency,
    target: &Currency,
    body: &[u8],
) -> Result<ExchangeRate, EcbError> {
    Envelope::parse(body)?.exchange_rate(source, target)
}

#[cfg(test)]
pub(crate) const SAMPLE_DOCUMENT: &str = r"<?xml version='1.0' encoding='UTF-8'?>
<gesmes:Envelope xmlns:gesmes='http://www.gesmes.org/xml/2002-08-01' xmlns='http://www.ecb.int/vocabulary/2002-08-01/eurofxref'>
	<gesmes:subject>Reference rates</gesmes:subject>
	<gesmes:Sender>
		<gesmes:name>European Central Bank</gesmes:name>
	</gesmes:Sender>
	<Cube>
		<Cube time='2025-04-08'>
			<Cube currency='USD' rate='2.0000'/>
			<Cube currency='RON' rate='6.0000'/>
			<Cube currency='SEK' rate='10.9775'/>
			<Cube currency='CHF' rate='0.9349'/>
		</Cube>
	</Cube>
</gesmes:Envelope>";
