//! Core types and traits for tongs.
//!
//! This crate provides the transport-independent half of tongs:
//! - [`RequestSpec`], [`Request`] and [`RequestBuilder`] - Request building
//! - [`QueryParams`] and [`QueryValue`] - Query parameters
//! - [`Endpoint`] - Capability trait describing a path and its query
//! - [`JsonDecoder`], [`DecodeError`] and [`DecodeErrorKind`] - Classified JSON decoding
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Core client trait for HTTP execution
//! - [`Method`] - HTTP method enum

mod client;
mod decode;
mod endpoint;
mod error;
mod method;
pub mod prelude;
mod query;
mod request;
mod response;

pub use client::HttpClient;
pub use decode::{DecodeError, DecodeErrorKind, JsonDecoder, UnknownKeys, Verbosity, decode};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use method::Method;
pub use query::{QueryParams, QueryValue, ToQueryItems};
pub use request::{Request, RequestBuilder, RequestSpec};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
