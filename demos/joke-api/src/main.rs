//! Dad Joke API Example
//!
//! Demonstrates endpoints, query parameters and classified decode errors
//! against <https://icanhazdadjoke.com>.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use tongs::prelude::*;
use tracing_subscriber::EnvFilter;

const AUTHORITY: &str = "https://icanhazdadjoke.com";

// ============================================================================
// Data Types
// ============================================================================

/// A dad joke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: String,
    #[serde(rename = "joke")]
    pub text: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub current_page: u32,
    pub limit: u32,
    pub total_jokes: u32,
    pub total_pages: u32,
    pub search_term: String,
    pub results: Vec<Joke>,
}

// ============================================================================
// Endpoints
// ============================================================================

/// `GET /j/{id}`
#[derive(Debug, Clone)]
pub struct JokeById {
    id: String,
}

impl JokeById {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Endpoint for JokeById {
    fn path(&self) -> String {
        format!("/j/{}", self.id)
    }
}

/// `GET /search?term=..&page=..&limit=..`
#[derive(Debug, Clone)]
pub struct SearchJokes {
    term: String,
    page: Option<u32>,
    limit: Option<u32>,
}

impl SearchJokes {
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            page: None,
            limit: None,
        }
    }

    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Endpoint for SearchJokes {
    fn path(&self) -> String {
        "/search".to_string()
    }

    fn query_items(&self) -> QueryParams {
        let mut query = QueryParams::new().with("term", self.term.as_str());
        if let Some(page) = self.page {
            query.push("page", page);
        }
        if let Some(limit) = self.limit {
            query.push("limit", limit);
        }
        query
    }
}

// ============================================================================
// Client
// ============================================================================

/// Dad joke client.
///
/// The API adds a `status` field to every payload, so unknown keys are ignored.
///
/// # Errors
///
/// Fails if `authority` is not an absolute URL with a host.
pub fn joke_client(authority: impl Into<String>) -> tongs::Result<ApiClient<HyperClient>> {
    let http = HyperClient::builder().with_logging().build();
    let api = ApiClient::new(http, authority)?
        .with_header("User-Agent", "tongs-joke-example/0.1.0")
        .with_decoder(JsonDecoder::lenient());
    Ok(api)
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> tongs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let jokes = joke_client(AUTHORITY)?;
    tracing::info!(authority = jokes.authority(), "joke client ready");

    let joke: Joke = jokes.get(&JokeById::new("R7UfaahVfFd")).await?;
    println!("{}: {}", joke.id, joke.text);

    let page: SearchPage = jokes
        .get(&SearchJokes::new("cat").page(1).limit(5))
        .await?;
    println!(
        "\n=== '{}' page {}/{} ({} jokes) ===",
        page.search_term, page.current_page, page.total_pages, page.total_jokes
    );
    for joke in page.results {
        println!("- {}", joke.text);
    }

    match jokes.get::<Joke, _>(&JokeById::new("not-a-joke")).await {
        Err(Error::InvalidStatusCode { status, .. }) => println!("\nNo such joke ({status})"),
        Err(err) => println!("\nFailed: {err}"),
        Ok(joke) => println!("\nUnexpected joke: {}", joke.text),
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
