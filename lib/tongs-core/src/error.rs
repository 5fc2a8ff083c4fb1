//! Error types for tongs.
//!
//! Transport failures and decode failures are separate families: a transport
//! error is never reported as a [`DecodeError`] and vice versa.

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::{DecodeError, DecodeErrorKind};

/// Main error type for tongs operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The peer answered, but not with HTTP.
    #[display("not an HTTP response from {url}: {message}")]
    #[from(skip)]
    NotHttpResponse {
        /// Requested URL.
        url: String,
        /// What the transport reported.
        message: String,
    },

    /// The response status is not `200 OK`.
    #[display("invalid status code {status}")]
    #[from(skip)]
    InvalidStatusCode {
        /// HTTP status code.
        status: u16,
        /// Response body.
        #[error(not(source))]
        body: Bytes,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// The body could not be decoded.
    #[display("decode error: {_0}")]
    #[from]
    Decode(DecodeError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a not-HTTP error.
    #[must_use]
    pub fn not_http_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotHttpResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid status error.
    #[must_use]
    pub const fn invalid_status(status: u16, body: Bytes) -> Self {
        Self::InvalidStatusCode { status, body }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the transport layer failed, whatever the reason.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NotHttpResponse { .. }
                | Self::InvalidStatusCode { .. }
                | Self::Connection(_)
                | Self::Tls(_)
                | Self::Timeout
        )
    }

    /// Returns `true` if the body was fetched but could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns the HTTP status code if the status was rejected.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidStatusCode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response body if the status was rejected.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::InvalidStatusCode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the decode error, if decoding failed.
    #[must_use]
    pub const fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the decode failure kind, if decoding failed.
    #[must_use]
    pub fn decode_kind(&self) -> Option<DecodeErrorKind> {
        self.as_decode().map(DecodeError::kind)
    }
}
