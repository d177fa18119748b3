//! Rate source error types.

use moneyconv_core::MoneyError;
use moneyconv_shared::AppError;
use thiserror::Error;

use crate::cache::CacheError;

/// Errors that can occur while obtaining a rate from the ECB.
#[derive(Debug, Error)]
pub enum EcbError {
    /// The request could not be sent or the response could not be read.
    #[error("error calling server: {0}")]
    CallingServer(String),

    /// The server did not answer within the configured timeout.
    #[error("timed out when waiting for response: {0}")]
    Timeout(String),

    /// The body is not a rate table.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// No rate could be derived for the requested pair.
    #[error(transparent)]
    ChangeRateNotFound(MoneyError),

    /// The server answered with a 4xx status.
    #[error("client side error when contacting ECB: {0}")]
    ClientSide(u16),

    /// The server answered with a 5xx status.
    #[error("server side error when contacting ECB: {0}")]
    ServerSide(u16),

    /// The server answered with a status that is neither 200, 4xx nor 5xx.
    #[error("unknown status code contacting ECB: {0}")]
    UnknownStatusCode(u16),

    /// The cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl EcbError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CallingServer(_) => "CALLING_SERVER",
            Self::Timeout(_) => "TIMEOUT",
            Self::UnexpectedFormat(_) => "UNEXPECTED_FORMAT",
            Self::ChangeRateNotFound(_) => "CHANGE_RATE_NOT_FOUND",
            Self::ClientSide(_) => "CLIENT_SIDE",
            Self::ServerSide(_) => "SERVER_SIDE",
            Self::UnknownStatusCode(_) => "UNKNOWN_STATUS_CODE",
            Self::Cache(_) => "CACHE_ERROR",
        }
    }
}

impl From<EcbError> for AppError {
    fn from(err: EcbError) -> Self {
        match err {
            EcbError::ChangeRateNotFound(_) => Self::Conversion(err.to_string()),
            EcbError::Cache(_) => Self::Internal(err.to_string()),
            _ => Self::ExternalService(err.to_string()),
        }
    }
}
