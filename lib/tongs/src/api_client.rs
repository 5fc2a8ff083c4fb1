//! Generic API client wrapper.
//!
//! [`ApiClient`] binds any [`HttpClient`] to an authority and a set of
//! default headers, so endpoints can be fetched and decoded in one call.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    Endpoint, Error, FetchExt, HttpClient, JsonDecoder, Request, RequestSpec, Result, Verbosity,
};

/// Default `Accept` header of an [`ApiClient`].
pub const ACCEPT_JSON: (&str, &str) = ("Accept", "application/json");

/// An HTTP client bound to an authority.
///
/// # Example
///
/// ```ignore
/// use tongs::{ApiClient, HyperClient};
///
/// let http = HyperClient::builder().with_logging().build();
/// let jokes = ApiClient::new(http, "https://icanhazdadjoke.com")?;
/// let joke: Joke = jokes.get(&JokeById::new("R7UfaahVfFd")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    client: C,
    authority: String,
    headers: HashMap<String, String>,
    decoder: JsonDecoder,
    verbosity: Verbosity,
}

impl<C> ApiClient<C> {
    /// Create a new API client for `authority` (scheme and host).
    ///
    /// # Errors
    ///
    /// Returns an error if the authority is not an absolute URL with a host.
    pub fn new(client: C, authority: impl Into<String>) -> Result<Self> {
        let authority = authority.into();
        let url = Url::parse(&authority)?;
        if !url.has_host() {
            return Err(Error::invalid_request(format!(
                "authority without host: {authority}"
            )));
        }

        Ok(Self {
            client,
            authority,
            headers: HashMap::from([(
                ACCEPT_JSON.0.to_ascii_lowercase(),
                ACCEPT_JSON.1.to_string(),
            )]),
            decoder: JsonDecoder::default(),
            verbosity: Verbosity::default(),
        })
    }

    /// Sets a default header, sent with every request.
    ///
    /// Names ignore case: `with_header("accept", ..)` replaces the default `Accept`.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the decoder used for responses.
    #[must_use]
    pub const fn with_decoder(mut self, decoder: JsonDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Sets the verbosity of decode errors.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// The authority requests are sent to.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }

    /// A [`RequestSpec`] for `endpoint`, with the default headers.
    pub fn request_spec<E: Endpoint + ?Sized>(&self, endpoint: &E) -> RequestSpec {
        endpoint
            .request_spec(&self.authority)
            .headers(self.headers.clone())
    }

    /// The `GET` request for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the endpoint cannot form a valid URL.
    pub fn request<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<Request> {
        let spec = self.request_spec(endpoint);
        spec.build().ok_or_else(|| {
            Error::invalid_request(format!(
                "cannot build a request for {}{}",
                self.authority,
                endpoint.path()
            ))
        })
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Fetch `endpoint` and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the request cannot be built, then
    /// any error of [`FetchExt::fetch_and_decode_with`].
    pub async fn get<T, E>(&self, endpoint: &E) -> Result<T>
    where
        T: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        let request = self.request(endpoint)?;
        self.client
            .fetch_and_decode_with(request, Some(&self.decoder), self.verbosity)
            .await
    }
}
