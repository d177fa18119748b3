//! Rate source backed by the ECB daily reference rates.

use chrono::{Local, NaiveDate};
use moneyconv_core::{Currency, ExchangeRate, RateSource};
use moneyconv_shared::AppConfig;
use tracing::{debug, info, warn};

use crate::cache::{FileCache, NoCache, RateCache};
use crate::envelope::Envelope;
use crate::error::EcbError;
use crate::feed::{HttpFeed, RateFeed};

/// Cache selected at runtime from configuration.
pub type DynRateCache = Box<dyn RateCache + Send + Sync>;

/// Fetches the daily rate document at most once per day and derives rates from it.
///
/// Each lookup is a single attempt: there are no retries, and a failed
/// download is never cached.
#[derive(Debug)]
pub struct EcbClient<F = HttpFeed, C = FileCache> {
    feed: F,
    cache: C,
}

impl EcbClient<HttpFeed, DynRateCache> {
    /// Builds an HTTP client with the file cache, or no cache when disabled.
    pub fn from_config(config: &AppConfig) -> Result<Self, EcbError> {
        let feed = HttpFeed::from_config(&config.ecb)?;
        let cache: DynRateCache = if config.cache.enabled {
            Box::new(FileCache::new(config.cache.dir.clone()))
        } else {
            Box::new(NoCache)
        };

        Ok(Self::new(feed, cache))
    }
}

impl<F: RateFeed, C: RateCache> EcbClient<F, C> {
    /// Creates a client from a feed and a cache.
    pub const fn new(feed: F, cache: C) -> Self {
        Self { feed, cache }
    }

    /// Returns the rate to convert `source` into `target` using today's table.
    pub fn fetch_exchange_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> Result<ExchangeRate, EcbError> {
        self.fetch_exchange_rate_on(Local::now().date_naive(), source, target)
    }

    /// Returns the rate to convert `source` into `target` using the table cached for `day`.
    ///
    /// On a cache miss the document is downloaded and, once it parses,
    /// stored under `day`.
    pub fn fetch_exchange_rate_on(
        &self,
        day: NaiveDate,
        source: &Currency,
        target: &Currency,
    ) -> Result<ExchangeRate, EcbError> {
        self.daily_rates(day)?.exchange_rate(source, target)
    }

    /// Removes every cached document.
    pub fn clear_cache(&self) -> Result<(), EcbError> {
        self.cache.clear()?;
        Ok(())
    }

    fn daily_rates(&self, day: NaiveDate) -> Result<Envelope, EcbError> {
        if let Some(envelope) = self.cached_rates(day) {
            return Ok(envelope);
        }

        let body = self.feed.fetch()?;
        let envelope = Envelope::parse(&body)?;

        if let Err(e) = self.cache.put(day, &body) {
            warn!(error = %e, %day, "Failed to cache daily rates");
        }

        Ok(envelope)
    }

    fn cached_rates(&self, day: NaiveDate) -> Option<Envelope> {
        let body = match self.cache.get(day) {
            Ok(Some(body)) => body,
            Ok(None) => {
                debug!(%day, "No cached daily rates");
                return None;
            }
            Err(e) => {
                warn!(error = %e, %day, "Failed to read cached daily rates");
                return None;
            }
        };

        match Envelope::parse(&body) {
            Ok(envelope) => {
                info!(%day, published_on = ?envelope.published_on(), "Using cached daily rates");
                Some(envelope)
            }
            Err(e) => {
                warn!(error = %e, %day, "Ignoring unreadable cached daily rates");
                None
            }
        }
    }
}

impl<F: RateFeed, C: RateCache> RateSource for EcbClient<F, C> {
    type Error = EcbError;

    fn fetch_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> Result<ExchangeRate, Self::Error> {
        self.fetch_exchange_rate(source, target)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use moneyconv_core::{Amount, Decimal, MoneyError, convert};
    use moneyconv_shared::CacheConfig;

    use super::*;
    use crate::cache::{CacheError, MemoryCache};
    use crate::envelope::SAMPLE_DOCUMENT;

    /// Serves a fixed body (or a fixed status failure) and counts downloads.
    struct StubFeed {
        body: &'static str,
        status: Option<u16>,
        calls: Cell<usize>,
    }

    impl StubFeed {
        fn serving(body: &'static str) -> Self {
            Self {
                body,
                status: None,
                calls: Cell::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                body: "",
                status: Some(status),
                calls: Cell::new(0),
            }
        }
    }

    impl RateFeed for StubFeed {
        fn fetch(&self) -> Result<Vec<u8>, EcbError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status) = self.status {
                crate::feed::check_status_code(status)?;
            }
            Ok(self.body.as_bytes().to_vec())
        }
    }

    /// A cache whose writes always fail.
    struct ReadOnlyCache;

    impl RateCache for ReadOnlyCache {
        fn get(&self, _day: NaiveDate) -> Result<Option<Vec<u8>>, CacheError> {
            Ok(None)
        }

        fn put(&self, _day: NaiveDate, _data: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::Write {
                path: PathBuf::from("/read-only"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn clear(&self) -> Result<(), CacheError> {
            Ok(())
        }
    }

    fn currency(code: &str) -> Currency {
        Currency::parse(code).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 8).unwrap()
    }

    fn rate(value: &str) -> ExchangeRate {
        ExchangeRate::new(Decimal::parse(value).unwrap())
    }

    #[test]
    fn test_fetches_then_uses_cache() {
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), MemoryCache::new());

        let first = client
            .fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"))
            .unwrap();
        let second = client
            .fetch_exchange_rate_on(day(), &currency("SEK"), &currency("CHF"))
            .unwrap();

        assert_eq!(first, rate("3"));
        assert_eq!(second, rate("0.0851651105"));
        assert_eq!(client.feed.calls.get(), 1);
    }

    #[test]
    fn test_new_day_fetches_again() {
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), MemoryCache::new());
        let next_day = day().succ_opt().unwrap();

        client
            .fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"))
            .unwrap();
        client
            .fetch_exchange_rate_on(next_day, &currency("USD"), &currency("RON"))
            .unwrap();

        assert_eq!(client.feed.calls.get(), 2);
    }

    #[test]
    fn test_unreadable_cache_entry_is_refetched() {
        let cache = MemoryCache::new();
        cache.put(day(), b"not xml at all").unwrap();
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), cache);

        let got = client
            .fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"))
            .unwrap();

        assert_eq!(got, rate("3"));
        assert_eq!(client.feed.calls.get(), 1);
    }

    #[test]
    fn test_bad_document_is_not_cached() {
        let client = EcbClient::new(StubFeed::serving("\n"), MemoryCache::new());

        let result = client.fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"));

        assert!(matches!(result, Err(EcbError::UnexpectedFormat(_))));
        assert!(client.cache.get(day()).unwrap().is_none());
    }

    #[test]
    fn test_feed_error_propagates() {
        let client = EcbClient::new(StubFeed::failing(503), MemoryCache::new());
        let result = client.fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"));
        assert!(matches!(result, Err(EcbError::ServerSide(503))));
    }

    #[test]
    fn test_unknown_currency() {
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), NoCache);
        let result = client.fetch_exchange_rate_on(day(), &currency("USD"), &currency("XYZ"));
        assert!(matches!(result, Err(EcbError::ChangeRateNotFound(_))));
    }

    #[test]
    fn test_cache_write_failure_is_not_fatal() {
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), ReadOnlyCache);
        let got = client
            .fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"))
            .unwrap();
        assert_eq!(got, rate("3"));
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = std::env::temp_dir().join(format!("moneyconv-client-{}", uuid::Uuid::new_v4()));
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), FileCache::new(&dir));

        client
            .fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"))
            .unwrap();
        assert!(dir.join("mc_data_20250408.txt").exists());

        client
            .fetch_exchange_rate_on(day(), &currency("USD"), &currency("RON"))
            .unwrap();
        assert_eq!(client.feed.calls.get(), 1);

        client.clear_cache().unwrap();
        assert!(!dir.join("mc_data_20250408.txt").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_convert_with_ecb_rates() {
        let client = EcbClient::new(StubFeed::serving(SAMPLE_DOCUMENT), MemoryCache::new());
        let amount = Amount::parse("34.98", "USD").unwrap();

        let got = convert(&amount, &currency("EUR"), &client).unwrap();

        assert_eq!(got, Amount::parse("17.49", "EUR").unwrap());
    }

    #[test]
    fn test_convert_wraps_ecb_error() {
        let client = EcbClient::new(StubFeed::failing(404), NoCache);
        let amount = Amount::parse("1", "USD").unwrap();

        match convert(&amount, &currency("EUR"), &client) {
            Err(MoneyError::RateUnavailable(source)) => assert!(matches!(
                source.downcast_ref::<EcbError>(),
                Some(EcbError::ClientSide(404))
            )),
            other => panic!("expected RateUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_from_config_without_cache() {
        let config = AppConfig {
            cache: CacheConfig {
                enabled: false,
                ..CacheConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(EcbClient::from_config(&config).is_ok());
    }
}
