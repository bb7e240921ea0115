use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structured error returned by the service alongside a non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// Wire shape of an error body: `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResult {
    pub(crate) error: ApiError,
}

#[derive(Debug, Error)]
pub enum Error {
    /// The request URL could not be assembled.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    /// Request construction or transport failure, as reported by reqwest.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service understood the request and rejected it.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Non-200 status without a decodable error body.
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// A 200 response whose body does not match the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("unknown OSM type '{0}', expected one of N, W, R")]
    InvalidOsmType(String),
}

impl Error {
    /// The structured service error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True when the call ended because its context was cancelled or expired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }
}
