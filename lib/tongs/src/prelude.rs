//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for easy glob importing:
//!
//! ```ignore
//! use tongs::prelude::*;
//! ```

pub use crate::{
    ApiClient, ClientConfig, DecodeError, DecodeErrorKind, Endpoint, Error, FetchExt, HttpClient,
    HyperClient, JsonDecoder, Method, QueryParams, Request, RequestSpec, Response, Result,
    StatusCode, UnknownKeys, Verbosity,
};
pub use serde::{Deserialize, Serialize};
