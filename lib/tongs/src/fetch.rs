//! The fetch-and-decode pipeline.
//!
//! [`FetchExt`] is implemented for every [`HttpClient`]:
//! - [`FetchExt::fetch`] performs one round-trip and keeps the body of a `200 OK`
//! - [`FetchExt::fetch_and_decode`] also decodes that body, with verbose errors
//! - [`FetchExt::fetch_and_decode_with`] chooses the decoder and the verbosity
//!
//! Transport errors are returned as they are: a failed fetch is never turned
//! into a decode error.

use std::future::Future;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{Error, HttpClient, JsonDecoder, Request, Result, Verbosity, decode};

/// Extension trait for [`HttpClient`] running the fetch-and-decode pipeline.
pub trait FetchExt: HttpClient {
    /// Execute `request` and return the body of a `200 OK` response, verbatim.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStatusCode`] for any other status, redirects included
    /// - [`Error::NotHttpResponse`] when the peer does not answer with HTTP
    /// - any other transport error of the client
    fn fetch(&self, request: Request) -> impl Future<Output = Result<Bytes>> + Send {
        async move {
            let url = request.url().to_string();
            let response = self.execute(request).await?;
            let status = response.status();

            match response.into_ok_body() {
                Ok(body) => {
                    debug!(%url, bytes = body.len(), "fetched");
                    Ok(body)
                }
                Err(err) => {
                    warn!(%url, status, "rejected response status");
                    Err(err)
                }
            }
        }
    }

    /// Fetch then decode with the default [`JsonDecoder`] and verbose errors.
    ///
    /// # Errors
    ///
    /// Any error of [`FetchExt::fetch`], or [`Error::Decode`].
    fn fetch_and_decode<T>(&self, request: Request) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned,
    {
        self.fetch_and_decode_with(request, None, Verbosity::Verbose)
    }

    /// Fetch then decode with `decoder` (default when `None`) and `verbosity`.
    ///
    /// # Errors
    ///
    /// Any error of [`FetchExt::fetch`], or [`Error::Decode`].
    fn fetch_and_decode_with<T>(
        &self,
        request: Request,
        decoder: Option<&JsonDecoder>,
        verbosity: Verbosity,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned,
    {
        let decoder = decoder.copied();
        async move {
            let body = self.fetch(request).await?;
            decode(&body, decoder.as_ref(), verbosity).map_err(|err| {
                debug!(kind = %err.kind(), "decode failed");
                Error::Decode(err)
            })
        }
    }
}

impl<C: HttpClient> FetchExt for C {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert2::{check, let_assert};
    use serde::Deserialize;

    use super::*;
    use crate::{DecodeError, DecodeErrorKind, RequestSpec, Response, UnknownKeys};

    /// Answers every request with a canned response and records the URLs.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for Canned {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(request.url().to_string());
            Ok(Response::new(self.status, HashMap::new(), self.body))
        }
    }

    /// Fails every request at the transport level.
    struct Unreachable;

    impl HttpClient for Unreachable {
        async fn execute(&self, _request: Request) -> Result<Response> {
            Err(Error::Timeout)
        }
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Joke {
        id: String,
        text: String,
    }

    fn request() -> Request {
        RequestSpec::new("https://icanhazdadjoke.com", "/j/R7UfaahVfFd")
            .header("Accept", "application/json")
            .build()
            .expect("valid request")
    }

    #[tokio::test]
    async fn fetch_returns_body_verbatim() {
        let client = Canned::new(200, "  {\"id\":\"1\"}  ");
        let body = client.fetch(request()).await.expect("body");
        check!(body.as_ref() == b"  {\"id\":\"1\"}  ");

        let seen = client.seen.lock().expect("lock").clone();
        check!(seen == vec!["https://icanhazdadjoke.com/j/R7UfaahVfFd".to_string()]);
    }

    #[tokio::test]
    async fn fetch_rejects_every_status_but_200() {
        for status in [201, 204, 301, 302, 404, 500] {
            let client = Canned::new(status, "{}");
            let_assert!(Err(err) = client.fetch(request()).await);
            check!(err.status() == Some(status));
        }
    }

    #[tokio::test]
    async fn fetch_and_decode_matching_payload() {
        let client = Canned::new(200, r#"{"id":"R7UfaahVfFd","text":"I'm reading a book about anti-gravity."}"#);
        let joke: Joke = client.fetch_and_decode(request()).await.expect("joke");
        check!(
            joke == Joke {
                id: "R7UfaahVfFd".to_string(),
                text: "I'm reading a book about anti-gravity.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn fetch_and_decode_keeps_transport_errors() {
        let client = Canned::new(404, r#"{"id":"1","text":"t"}"#);
        for verbosity in [Verbosity::Terse, Verbosity::Verbose] {
            let_assert!(
                Err(Error::InvalidStatusCode { status: 404, .. }) =
                    client.fetch_and_decode_with::<Joke>(request(), None, verbosity).await
            );
        }

        let_assert!(Err(err) = Unreachable.fetch_and_decode::<Joke>(request()).await);
        check!(err.is_timeout());
        check!(err.decode_kind().is_none());
    }

    #[tokio::test]
    async fn fetch_and_decode_terse_error() {
        let client = Canned::new(200, r#"{"id":"1"}"#);
        let_assert!(
            Err(Error::Decode(err)) = client
                .fetch_and_decode_with::<Joke>(request(), None, Verbosity::Terse)
                .await
        );
        check!(err == DecodeError::terse(DecodeErrorKind::KeyNotFound));
    }

    #[tokio::test]
    async fn fetch_and_decode_uses_given_decoder() {
        let client = Canned::new(200, r#"{"id":"1","text":"t","status":200}"#);

        let_assert!(Err(err) = client.fetch_and_decode::<Joke>(request()).await);
        check!(err.decode_kind() == Some(DecodeErrorKind::KeyNotFound));

        let lenient = JsonDecoder::default().with_unknown_keys(UnknownKeys::Ignore);
        let joke: Joke = client
            .fetch_and_decode_with(request(), Some(&lenient), Verbosity::Verbose)
            .await
            .expect("lenient decode");
        check!(joke.text == "t");
    }
}
