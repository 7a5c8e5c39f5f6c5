//! Request payload assembly for the Custom Search API.
//!
//! A [`SearchQuery`] holds the parameters shared by every page of one run.
//! [`SearchQuery::page_request`] turns it into a per-page [`SearchRequest`]
//! using an [`OffsetPolicy`] to compute the API `start` parameter.

use std::fmt;
use std::str::FromStr;

use super::pagination::PAGE_CAPACITY;

/// How a 0-based page index maps to the API's `start` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetPolicy {
    /// `start = (page_index + 1) * 10`.
    ///
    /// Page 0 requests offset 10, so the first ten results are never fetched.
    /// Kept as the default so existing result files keep their meaning.
    #[default]
    Legacy,
    /// `start = page_index * 10 + 1`, the API's own 1-based convention.
    OneBased,
}

impl OffsetPolicy {
    /// Returns the `start` parameter for the 0-based `page_index`.
    ///
    /// Saturates at `usize::MAX` instead of overflowing.
    #[must_use]
    pub fn start_offset(self, page_index: usize) -> usize {
        match self {
            Self::Legacy => page_index.saturating_add(1).saturating_mul(PAGE_CAPACITY),
            Self::OneBased => page_index.saturating_mul(PAGE_CAPACITY).saturating_add(1),
        }
    }

    /// Returns the policy's command-line label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::OneBased => "one-based",
        }
    }
}

impl fmt::Display for OffsetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffsetPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "one-based" | "one_based" | "onebased" => Ok(Self::OneBased),
            other => Err(format!(
                "unknown offset policy '{other}' (expected 'legacy' or 'one-based')"
            )),
        }
    }
}

/// Parameters shared by every page request of one search run.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query.
    pub query: String,
    /// API key sent as `key`.
    pub api_key: String,
    /// Programmable search engine id sent as `cx`.
    pub search_engine_id: String,
    /// Caller-supplied parameters appended after the base ones.
    pub extra_params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Creates a query without extra parameters.
    pub fn new(
        query: impl Into<String>,
        api_key: impl Into<String>,
        search_engine_id: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            api_key: api_key.into(),
            search_engine_id: search_engine_id.into(),
            extra_params: Vec::new(),
        }
    }

    /// Adds an extra query parameter (e.g. `searchType=image`).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    /// Builds the request for one page.
    #[must_use]
    pub fn page_request(
        &self,
        page_index: usize,
        page_size: usize,
        policy: OffsetPolicy,
    ) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            api_key: self.api_key.clone(),
            search_engine_id: self.search_engine_id.clone(),
            start_offset: policy.start_offset(page_index),
            page_size: page_size.clamp(1, PAGE_CAPACITY),
            extra_params: self.extra_params.clone(),
        }
    }
}

impl fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("query", &self.query)
            .field("api_key", &"[REDACTED]")
            .field("search_engine_id", &self.search_engine_id)
            .field("extra_params", &self.extra_params)
            .finish()
    }
}

/// A single page request. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub api_key: String,
    pub search_engine_id: String,
    /// 1-based API offset sent as `start`.
    pub start_offset: usize,
    /// Item count sent as `num` (1..=10).
    pub page_size: usize,
    pub extra_params: Vec<(String, String)>,
}

impl SearchRequest {
    /// Returns the query parameters in send order.
    ///
    /// Extra parameters replace a base parameter of the same name in place;
    /// new names are appended.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("key".to_string(), self.api_key.clone()),
            ("q".to_string(), self.query.clone()),
            ("cx".to_string(), self.search_engine_id.clone()),
            ("start".to_string(), self.start_offset.to_string()),
            ("num".to_string(), self.page_size.to_string()),
        ];
        for (key, value) in &self.extra_params {
            match pairs.iter_mut().find(|(existing, _)| existing == key) {
                Some(slot) => slot.1.clone_from(value),
                None => pairs.push((key.clone(), value.clone())),
            }
        }
        pairs
    }
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("query", &self.query)
            .field("api_key", &"[REDACTED]")
            .field("search_engine_id", &self.search_engine_id)
            .field("start_offset", &self.start_offset)
            .field("page_size", &self.page_size)
            .field("extra_params", &self.extra_params)
            .finish()
    }
}
