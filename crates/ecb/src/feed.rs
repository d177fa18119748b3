//! Transport for the daily reference rate document.

use std::time::Duration;

use moneyconv_shared::EcbConfig;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::EcbError;

/// Anything that can download the raw daily rate document.
pub trait RateFeed {
    /// Performs a single download attempt.
    fn fetch(&self) -> Result<Vec<u8>, EcbError>;
}

/// Downloads the document over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: Client,
    url: String,
}

impl HttpFeed {
    /// Creates a feed for `url`, failing requests that take longer than `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EcbError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EcbError::CallingServer(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Creates a feed from the `ecb` configuration section.
    pub fn from_config(config: &EcbConfig) -> Result<Self, EcbError> {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// Returns the URL the document is downloaded from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RateFeed for HttpFeed {
    fn fetch(&self) -> Result<Vec<u8>, EcbError> {
        info!(url = %self.url, "Fetching daily reference rates");

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        check_status_code(status)?;

        let body = response.bytes().map_err(transport_error)?;
        debug!(status, bytes = body.len(), "Received daily reference rates");

        Ok(body.to_vec())
    }
}

fn transport_error(err: reqwest::Error) -> EcbError {
    if err.is_timeout() {
        EcbError::Timeout(err.to_string())
    } else {
        EcbError::CallingServer(err.to_string())
    }
}

/// Classifies an HTTP status code.
///
/// Only 200 is a success. Every 4xx is [`EcbError::ClientSide`], every 5xx
/// is [`EcbError::ServerSide`], anything else is
/// [`EcbError::UnknownStatusCode`].
pub fn check_status_code(status: u16) -> Result<(), EcbError> {
    match status {
        200 => Ok(()),
        400..=499 => Err(EcbError::ClientSide(status)),
        500..=599 => Err(EcbError::ServerSide(status)),
        _ => Err(EcbError::UnknownStatusCode(status)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serves a single canned HTTP response on a local port.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}/stats/eurofxref/eurofxref-daily.xml")
    }

    fn feed(url: String) -> HttpFeed {
        HttpFeed::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_check_status_code() {
        assert!(check_status_code(200).is_ok());
        assert!(matches!(check_status_code(404), Err(EcbError::ClientSide(404))));
        assert!(matches!(check_status_code(400), Err(EcbError::ClientSide(400))));
        assert!(matches!(check_status_code(500), Err(EcbError::ServerSide(500))));
        assert!(matches!(check_status_code(503), Err(EcbError::ServerSide(503))));
        assert!(matches!(
            check_status_code(303),
            Err(EcbError::UnknownStatusCode(303))
        ));
        assert!(matches!(
            check_status_code(204),
            Err(EcbError::UnknownStatusCode(204))
        ));
    }

    #[test]
    fn test_fetch_ok() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: 5\r\nConnection: close\r\n\r\nrates",
        );
        assert_eq!(feed(url).fetch().unwrap(), b"rates".to_vec());
    }

    #[test]
    fn test_fetch_client_error() {
        let url =
            serve_once("HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        assert!(matches!(feed(url).fetch(), Err(EcbError::ClientSide(400))));
    }

    #[test]
    fn test_fetch_server_error() {
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        assert!(matches!(feed(url).fetch(), Err(EcbError::ServerSide(500))));
    }

    #[test]
    fn test_fetch_unknown_status() {
        let url =
            serve_once("HTTP/1.1 303 See Other\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        assert!(matches!(
            feed(url).fetch(),
            Err(EcbError::UnknownStatusCode(303))
        ));
    }

    #[test]
    fn test_fetch_invalid_url() {
        let result = feed("does not exist".to_string()).fetch();
        assert!(matches!(result, Err(EcbError::CallingServer(_))));
    }

    #[test]
    fn test_fetch_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(2));
                drop(stream);
            }
        });

        let slow = HttpFeed::new(format!("http://{addr}/"), Duration::from_millis(200)).unwrap();
        assert!(matches!(slow.fetch(), Err(EcbError::Timeout(_))));
    }

    #[test]
    fn test_from_config() {
        let config = EcbConfig::default();
        let feed = HttpFeed::from_config(&config).unwrap();
        assert_eq!(feed.url(), config.url);
    }
}
