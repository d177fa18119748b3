//! Core money logic for moneyconv.
//!
//! This crate contains pure arithmetic and conversion logic with ZERO
//! network or file system dependencies. Rates reach it through the
//! [`money::RateSource`] trait.
//!
//! # Modules
//!
//! - `money` - Fixed-point decimals, currencies, amounts, rate tables and conversion

pub mod money;

pub use money::{
    Amount, Currency, Decimal, ExchangeRate, MoneyError, MoneyResult, RateSource, RateTable,
    convert,
};
