//! HTTP request building.
//!
//! [`RequestSpec`] assembles a URL from an authority, a path and query
//! parameters, and yields a [`Request`] only when the parts form a valid URL.
//!
//! # Example
//!
//! ```
//! use tongs_core::{QueryParams, RequestSpec};
//!
//! let request = RequestSpec::new("https://icanhazdadjoke.com", "/search")
//!     .queries(QueryParams::new().with("term", "cat").with("limit", 5))
//!     .header("Accept", "application/json")
//!     .build()
//!     .expect("valid request");
//!
//! assert_eq!(
//!     request.url().as_str(),
//!     "https://icanhazdadjoke.com/search?term=cat&limit=5"
//! );
//! ```

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::{Method, QueryParams, ToQueryItems, query::QueryValue};

/// An HTTP request ready to be executed.
///
/// Header names are stored lowercase, so `Accept` and `accept` are one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Timeout overriding the client default, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Consume into (method, url, headers, timeout).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<Duration>) {
        (self.method, self.url, self.headers, self.timeout)
    }
}

/// Builder for [`Request`] from an already parsed URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(name), value.into());
        self
    }

    /// Replaces the whole header set.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(name, value)| (header_key(name), value))
            .collect();
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Appends query items to the URL.
    ///
    /// An empty iterator leaves the URL untouched (no trailing `?`).
    #[must_use]
    pub fn query_items(mut self, items: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut items = items.into_iter().peekable();
        if items.peek().is_some() {
            self.url.query_pairs_mut().extend_pairs(items);
        }
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            timeout: self.timeout,
        }
    }
}

/// Everything needed to build one request: authority, path, query,
/// headers, method and timeout.
///
/// Setters never fail; [`RequestSpec::build`] returns `None` when the
/// parts cannot form a valid request.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    authority: String,
    path: String,
    query: QueryParams,
    headers: HashMap<String, String>,
    method: Option<String>,
    timeout: Option<Duration>,
}

impl RequestSpec {
    /// Creates a spec for `authority` (scheme and host, like
    /// `https://api.example.com`) and `path`.
    #[must_use]
    pub fn new(authority: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push(name, value);
        self
    }

    /// Adds all parameters of `params`.
    #[must_use]
    pub fn queries(mut self, params: QueryParams) -> Self {
        self.query.extend(params);
        self
    }

    /// Sets a header, replacing any value under the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(name), value.into());
        self
    }

    /// Adds headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (header_key(k), v.into())));
        self
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method.to_string());
        self
    }

    /// Sets the method from its wire token (e.g. `"POST"`).
    ///
    /// Any valid token is accepted, extension methods included. An invalid
    /// token makes [`RequestSpec::build`] return `None`.
    #[must_use]
    pub fn method_str(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets a timeout that overrides the client default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The query parameters of this spec.
    #[must_use]
    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    /// Builds the full URL, or `None` when the parts cannot form one.
    ///
    /// The authority must be an absolute URL with a host and nothing past it
    /// (a lone `/` is accepted). The path must be empty or start with `/`,
    /// and cannot smuggle a query or fragment. Dot segments (`.`, `..`, in
    /// plain or percent-encoded form) are rejected rather than resolved.
    #[must_use]
    pub fn url(&self) -> Option<Url> {
        let mut url = Url::parse(&self.authority).ok()?;
        if !is_bare_authority(&url) || !is_valid_path(&self.path) {
            return None;
        }

        url.set_path(&self.path);
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.to_query_items());
        }
        Some(url)
    }

    /// Builds the [`Request`], or `None` when the URL, method or a header is invalid.
    #[must_use]
    pub fn build(&self) -> Option<Request> {
        let url = self.url()?;
        let method = match &self.method {
            Some(token) => token.parse().ok()?,
            None => Method::Get,
        };
        if !self.headers.iter().all(|(name, value)| is_valid_header(name, value)) {
            return None;
        }

        let mut builder = Request::builder(method, url).headers(self.headers.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Some(builder.build())
    }
}

fn is_bare_authority(url: &Url) -> bool {
    url.has_host()
        && !url.cannot_be_a_base()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none()
}

fn is_valid_path(path: &str) -> bool {
    (path.is_empty() || path.starts_with('/'))
        && !path.contains(['?', '#'])
        && !path.split('/').any(is_dot_segment)
}

fn is_dot_segment(segment: &str) -> bool {
    let segment = segment.to_ascii_lowercase().replace("%2e", ".");
    segment == "." || segment == ".."
}

fn header_key(name: impl Into<String>) -> String {
    let mut name = name.into();
    name.make_ascii_lowercase();
    name
}

fn is_valid_header(name: &str, value: &str) -> bool {
    http::HeaderName::from_bytes(name.as_bytes()).is_ok()
        && http::HeaderValue::from_str(value).is_ok()
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    const AUTHORITY: &str = "https://api.example.com";

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = url.query_pairs().into_owned().collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn builder_basic() {
        let url = Url::parse("https://api.example.com/users").expect("valid URL");
        let request = Request::builder(Method::Get, url)
            .header("Accept", "application/json")
            .build();

        check!(*request.method() == Method::Get);
        check!(request.url().as_str() == "https://api.example.com/users");
        check!(request.header("Accept") == Some("application/json"));
        check!(request.timeout().is_none());
    }

    #[test]
    fn builder_headers_replace_existing_ones() {
        let url = Url::parse(AUTHORITY).expect("valid URL");
        let request = Request::builder(Method::Get, url)
            .header("X-Old", "1")
            .headers([("Accept".to_string(), "application/json".to_string())])
            .build();

        check!(request.header("X-Old").is_none());
        check!(request.header("accept") == Some("application/json"));
        check!(request.headers().len() == 1);
    }

    #[test]
    fn builder_empty_query_items_keep_url_clean() {
        let url = Url::parse("https://api.example.com/users").expect("valid URL");
        let request = Request::builder(Method::Get, url)
            .query_items(Vec::new())
            .build();

        check!(request.url().query().is_none());
        check!(request.url().as_str() == "https://api.example.com/users");
    }

    #[test]
    fn spec_builds_url_with_query() {
        let request = RequestSpec::new(AUTHORITY, "/search")
            .query("term", "cat")
            .query("page", 2)
            .query("limit", 20)
            .build();

        let_assert!(Some(request) = request);
        insta::assert_snapshot!(
            request.url().as_str(),
            @"https://api.example.com/search?term=cat&page=2&limit=20"
        );
    }

    #[test]
    fn spec_without_query_has_no_query_component() {
        let_assert!(Some(url) = RequestSpec::new(AUTHORITY, "/j/R7UfaahVfFd").url());
        check!(url.query().is_none());
        check!(!url.as_str().contains('?'));
    }

    #[test]
    fn spec_encodes_each_pair_exactly_once() {
        let params = QueryParams::new()
            .with("term", "dad & mom")
            .with("page", 1)
            .with("sort", "a=b");
        let_assert!(Some(url) = RequestSpec::new(AUTHORITY, "/search").queries(params.clone()).url());

        let query = url.query().unwrap_or_default();
        check!(query.contains("term=dad+%26+mom"));
        check!(query.contains("sort=a%3Db"));
        check!(query.matches("page=1").count() == 1);

        let mut expected = params.to_query_items();
        expected.sort();
        check!(query_pairs(&url) == expected);
    }

    #[test]
    fn spec_round_trips_query_params() {
        let params = QueryParams::new()
            .with("term", "ünïcödé / spaces")
            .with("page", 3)
            .with("tag", "a")
            .with("tag", "b");
        let_assert!(Some(url) = RequestSpec::new(AUTHORITY, "/search").queries(params.clone()).url());

        let decoded: QueryParams = url.query_pairs().into_owned().collect();
        let mut decoded_items = decoded.to_query_items();
        decoded_items.sort();
        let mut expected = params.to_query_items();
        expected.sort();
        check!(decoded_items == expected);
    }

    #[test]
    fn spec_encodes_path() {
        let_assert!(Some(url) = RequestSpec::new(AUTHORITY, "/jokes/a b").url());
        check!(url.path() == "/jokes/a%20b");
    }

    #[test]
    fn spec_accepts_authority_with_port_and_trailing_slash() {
        let_assert!(Some(url) = RequestSpec::new("http://127.0.0.1:8080/", "/j/1").url());
        check!(url.as_str() == "http://127.0.0.1:8080/j/1");
    }

    #[test]
    fn spec_rejects_invalid_authority() {
        check!(RequestSpec::new("api.example.com", "/users").build().is_none());
        check!(RequestSpec::new("", "/users").build().is_none());
        check!(RequestSpec::new("mailto:someone@example.com", "/users").build().is_none());
        check!(RequestSpec::new("https://api.example.com/v1", "/users").build().is_none());
        check!(RequestSpec::new("https://api.example.com?x=1", "/users").build().is_none());
    }

    #[test]
    fn spec_rejects_invalid_path() {
        check!(RequestSpec::new(AUTHORITY, "users").build().is_none());
        check!(RequestSpec::new(AUTHORITY, "/users?page=1").build().is_none());
        check!(RequestSpec::new(AUTHORITY, "/users#top").build().is_none());
    }

    #[test]
    fn spec_method_defaults_to_get() {
        let_assert!(Some(request) = RequestSpec::new(AUTHORITY, "/users").build());
        check!(*request.method() == Method::Get);
    }

    #[test]
    fn spec_method_from_token() {
        let_assert!(Some(request) = RequestSpec::new(AUTHORITY, "/users").method_str("DELETE").build());
        check!(*request.method() == Method::Delete);

        for token in ["TRACE", "CONNECT", "PROPFIND", "PURGE"] {
            let_assert!(Some(request) = RequestSpec::new(AUTHORITY, "/users").method_str(token).build());
            check!(request.method().to_string() == token);
        }

        check!(RequestSpec::new(AUTHORITY, "/users").method_str("GE T").build().is_none());
        check!(RequestSpec::new(AUTHORITY, "/users").method_str("").build().is_none());
    }

    #[test]
    fn spec_headers_are_the_complete_set() {
        let_assert!(
            Some(request) = RequestSpec::new(AUTHORITY, "/users")
                .headers([("Accept", "application/json"), ("User-Agent", "tongs")])
                .build()
        );
        check!(request.headers().len() == 2);
        check!(request.header("Accept") == Some("application/json"));
    }

    #[test]
    fn spec_header_names_ignore_case() {
        let_assert!(
            Some(request) = RequestSpec::new(AUTHORITY, "/users")
                .header("Accept", "application/json")
                .headers([("accept", "text/plain")])
                .build()
        );
        check!(request.headers().len() == 1);
        check!(request.header("ACCEPT") == Some("text/plain"));
        check!(request.headers().get("accept").map(String::as_str) == Some("text/plain"));
    }

    #[test]
    fn spec_rejects_dot_segments() {
        for path in ["/j/../admin", "/j/./1", "/..", "/j/%2e%2e/admin", "/j/%2E/1", "/j/.%2e"] {
            check!(RequestSpec::new(AUTHORITY, path).build().is_none(), "{path}");
        }
        let_assert!(Some(url) = RequestSpec::new(AUTHORITY, "/files/.well-known/a..b").url());
        check!(url.path() == "/files/.well-known/a..b");
    }

    #[test]
    fn spec_rejects_invalid_headers() {
        check!(RequestSpec::new(AUTHORITY, "/users").header("Bad Name", "x").build().is_none());
        check!(RequestSpec::new(AUTHORITY, "/users").header("X-Ok", "line\nbreak").build().is_none());
    }

    #[test]
    fn spec_timeout_is_carried() {
        let_assert!(
            Some(request) = RequestSpec::new(AUTHORITY, "/users")
                .timeout(Duration::from_secs(3))
                .build()
        );
        check!(request.timeout() == Some(Duration::from_secs(3)));
    }
}
