//! European Central Bank rate source for moneyconv.
//!
//! Fetches the daily reference rates, keeps the raw table for the day it was
//! fetched, and derives cross rates through [`moneyconv_core::RateTable`].
//!
//! # Architecture
//!
//! ```text
//! EcbClient ──► RateCache (file / memory / none) ── hit ──► Envelope ──► RateTable
//!     │                                                         ▲
//!     └──── miss ──► RateFeed (HTTP) ──────────────────────────┘
//! ```

pub mod cache;
pub mod client;
pub mod envelope;
pub mod error;
pub mod feed;

pub use cache::{CacheError, FileCache, MemoryCache, NoCache, RateCache};
pub use client::{DynRateCache, EcbClient};
pub use envelope::Envelope;
pub use error::EcbError;
pub use feed::{HttpFeed, RateFeed, check_status_code};
