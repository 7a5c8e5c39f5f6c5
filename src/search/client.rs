//! Custom Search API client.
//!
//! [`SearchClient`] issues one GET per page and classifies the response as
//! [`PageOutcome::Items`], [`PageOutcome::EndOfResults`], or a
//! [`SearchError`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use super::error::SearchError;
use super::payload::SearchRequest;
use super::Item;
use crate::http::{ClientBuildError, HttpTimeouts, build_client};

/// Public endpoint of the Custom Search JSON API.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Successful outcome of one page request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page's items, in API order.
    Items(Vec<Item>),
    /// The API answered but has no more results for this offset.
    EndOfResults,
}

/// Fetches a single page of search results.
///
/// The aggregator is written against this trait so any source of pages can
/// drive it.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] for transport failures, non-200 statuses and
    /// malformed bodies.
    async fn fetch_page(&self, request: &SearchRequest) -> Result<PageOutcome, SearchError>;
}

/// reqwest-backed [`PageFetcher`] for the Custom Search JSON API.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    /// Creates a client for the public endpoint with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_timeouts(HttpTimeouts::search())
    }

    /// Creates a client for the public endpoint with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the HTTP client cannot be built.
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: build_client(timeouts)?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Points the client at another endpoint (test servers, proxies).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEndpoint`] when `endpoint` is not a URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, SearchError> {
        Url::parse(endpoint).map_err(|_| SearchError::invalid_endpoint(endpoint))?;
        self.endpoint = endpoint.to_string();
        Ok(self)
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_url(&self, request: &SearchRequest) -> Result<Url, SearchError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|_| SearchError::invalid_endpoint(&self.endpoint))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                query.append_pair(&key, &value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl PageFetcher for SearchClient {
    #[instrument(skip(self, request), fields(start = request.start_offset, num = request.page_size))]
    async fn fetch_page(&self, request: &SearchRequest) -> Result<PageOutcome, SearchError> {
        let start = request.start_offset;
        debug!(endpoint = %self.endpoint, "requesting search page");

        let response = self
            .client
            .get(self.request_url(request)?)
            .send()
            .await
            .map_err(|e| SearchError::network(start, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::network(start, e))?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), body = %body, "search API returned an error response");
            return Err(SearchError::http_status(start, status.as_u16(), body));
        }

        trace!(body = %body, "search response body");
        parse_page(start, &body)
    }
}

/// Classifies a 200 response body.
pub(crate) fn parse_page(start: usize, body: &str) -> Result<PageOutcome, SearchError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| SearchError::invalid_response(start, format!("JSON parse error: {e}")))?;

    let Some(items) = json.get("items") else {
        debug!(start, "response has no items; no more results");
        return Ok(PageOutcome::EndOfResults);
    };

    let Value::Array(entries) = items else {
        return Err(SearchError::invalid_response(start, "`items` is not an array"));
    };

    let mut page = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        match entry {
            Value::Object(map) => page.push(map.clone()),
            other => warn!(start, position, kind = json_kind(other), "skipping non-object item"),
        }
    }

    debug!(start, items = page.len(), "page fetched");
    Ok(PageOutcome::Items(page))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
