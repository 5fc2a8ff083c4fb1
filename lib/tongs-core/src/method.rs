//! HTTP method types.

use std::str::FromStr;

use derive_more::Display;

/// HTTP request method.
///
/// Requests are `GET` unless the caller asks for something else. Any other
/// valid token (`PROPFIND`, `PURGE`, ...) is carried as [`Method::Extension`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[default]
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// HEAD method - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// OPTIONS method - retrieve allowed methods.
    #[display("OPTIONS")]
    Options,
    /// TRACE method - echo the request back.
    #[display("TRACE")]
    Trace,
    /// CONNECT method - open a tunnel.
    #[display("CONNECT")]
    Connect,
    /// Any other method token.
    #[display("{_0}")]
    Extension(http::Method),
}

impl Method {
    /// Returns `true` if the method is safe (does not modify resources).
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options | Self::Trace)
    }
}

/// Parses the method token as it appears on the wire.
///
/// Tokens are case-sensitive: `"get"` is an extension method, not [`Method::Get`].
impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            other => http::Method::from_bytes(other.as_bytes())
                .map(Self::Extension)
                .map_err(|_| crate::Error::invalid_request(format!("invalid HTTP method: {other:?}"))),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
            Method::Trace => Self::TRACE,
            Method::Connect => Self::CONNECT,
            Method::Extension(method) => method,
        }
    }
}
