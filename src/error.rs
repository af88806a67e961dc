//! Request construction and serialization errors.

use thiserror::Error;

/// Errors raised while building a request or producing its wire form.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The cookie offers no form the client encoder can write.
    #[error("Cookie '{name}' is not a client-encodable cookie")]
    UnsupportedCookieKind { name: String },

    /// The strict encoder rejected the cookie's name or value.
    #[error("Cookie '{name}' cannot be encoded: {reason}")]
    InvalidCookie { name: String, reason: &'static str },

    /// The request is not in the shape the operation requires.
    #[error("Invalid request state: {0}")]
    InvalidState(&'static str),

    /// The URI could not be parsed.
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: &'static str },

    /// The method name is not a valid HTTP token.
    #[error("Invalid HTTP method name '{0}'")]
    InvalidMethod(String),

    /// A header name or value could not be parsed.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Conversion into an `http::Request` failed.
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),
}

/// Result type for request operations.
pub type RequestResult<T> = Result<T, RequestError>;

impl From<http::header::InvalidHeaderName> for RequestError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        RequestError::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for RequestError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        RequestError::InvalidHeader(err.to_string())
    }
}
