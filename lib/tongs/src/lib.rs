//! Build HTTP requests and decode their JSON responses into typed values.
//!
//! A request is described by an authority, a path and query parameters
//! ([`RequestSpec`], or any [`Endpoint`]). [`FetchExt`] runs it through one
//! network call, accepts only `200 OK`, and decodes the body with a
//! [`JsonDecoder`]. Failures come in two families that never mix: transport
//! errors ([`Error::InvalidStatusCode`], [`Error::NotHttpResponse`], ...) and
//! [`Error::Decode`] with a classified [`DecodeError`].
//!
//! # Example
//!
//! ```ignore
//! use tongs::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Joke {
//!     id: String,
//!     joke: String,
//!     status: u16,
//! }
//!
//! let client = HyperClient::new();
//! let request = RequestSpec::new("https://icanhazdadjoke.com", "/j/R7UfaahVfFd")
//!     .header("Accept", "application/json")
//!     .build()
//!     .expect("valid request");
//!
//! let joke: Joke = client.fetch_and_decode(request).await?;
//! ```

mod api_client;
mod client;
mod config;
mod fetch;
pub mod middleware;
pub mod prelude;

pub use api_client::{ACCEPT_JSON, ApiClient};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use fetch::FetchExt;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use tongs_core::{
    DecodeError, DecodeErrorKind, Endpoint, Error, HttpClient, JsonDecoder, Method, QueryParams,
    QueryValue, Request, RequestBuilder, RequestSpec, Response, Result, ToQueryItems, UnknownKeys,
    Verbosity, decode,
};

// Re-export http types for status codes and headers
pub use tongs_core::{StatusCode, header};

pub use url;
