//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tongs_core::prelude::*;
//! ```

pub use crate::{
    DecodeError, DecodeErrorKind, Endpoint, Error, HttpClient, JsonDecoder, Method, QueryParams,
    Request, RequestSpec, Response, Result, ToQueryItems, UnknownKeys, Verbosity,
};
