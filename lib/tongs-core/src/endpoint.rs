//! Endpoint capability trait.

use std::time::Duration;

use crate::{QueryParams, Request, RequestSpec};

/// A resource reachable under some authority.
///
/// Implementors only describe their path and query; building the request is
/// provided.
///
/// # Example
///
/// ```
/// use tongs_core::{Endpoint, QueryParams};
///
/// struct SearchJokes {
///     term: String,
///     page: u32,
/// }
///
/// impl Endpoint for SearchJokes {
///     fn path(&self) -> String {
///         "/search".to_string()
///     }
///
///     fn query_items(&self) -> QueryParams {
///         QueryParams::new().with("term", &self.term).with("page", self.page)
///     }
/// }
///
/// let search = SearchJokes { term: "cat".to_string(), page: 1 };
/// let request = search
///     .url_request("https://icanhazdadjoke.com", [("Accept", "application/json")], None, None)
///     .expect("valid request");
/// assert_eq!(request.url().as_str(), "https://icanhazdadjoke.com/search?term=cat&page=1");
/// ```
pub trait Endpoint {
    /// Path of the resource, starting with `/`.
    fn path(&self) -> String;

    /// Query parameters sent with the request.
    fn query_items(&self) -> QueryParams {
        QueryParams::new()
    }

    /// A [`RequestSpec`] for this endpoint under `authority`.
    fn request_spec(&self, authority: &str) -> RequestSpec {
        RequestSpec::new(authority, self.path()).queries(self.query_items())
    }

    /// Builds the request for this endpoint.
    ///
    /// `method` is a wire token (`"GET"`, `"POST"`, ...) and defaults to `GET`.
    /// Returns `None` when the parts cannot form a valid request.
    fn url_request<K, V>(
        &self,
        authority: &str,
        headers: impl IntoIterator<Item = (K, V)>,
        method: Option<&str>,
        timeout: Option<Duration>,
    ) -> Option<Request>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut spec = self.request_spec(authority).headers(headers);
        if let Some(method) = method {
            spec = spec.method_str(method);
        }
        if let Some(timeout) = timeout {
            spec = spec.timeout(timeout);
        }
        spec.build()
    }
}
