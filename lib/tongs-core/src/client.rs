//! HTTP client trait.
//!
//! [`HttpClient`] is the seam between request building and the network: the
//! fetch pipeline works with any implementation, including test doubles.

use std::future::Future;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations perform exactly one network round-trip per call: no
/// retry, no cache. Any HTTP status is returned as a [`Response`]; status
/// validation belongs to the caller.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - An answer that is not HTTP
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}
