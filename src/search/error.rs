//! Error types for search page requests.

use thiserror::Error;

/// Errors that can occur while fetching one page of search results.
///
/// The aggregator treats every variant as the end of pagination; none of
/// them reach the caller of [`run_search`](super::run_search).
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting page at offset {start}: {source}")]
    Network {
        /// The `start` parameter of the failed request.
        start: usize,
        /// The underlying network error, stripped of its URL.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting page at offset {start}")]
    Timeout {
        /// The `start` parameter of the failed request.
        start: usize,
    },

    /// The API answered with a non-200 status.
    #[error("HTTP {status} requesting page at offset {start}: {body}")]
    HttpStatus {
        /// The `start` parameter of the failed request.
        start: usize,
        /// The HTTP status code.
        status: u16,
        /// Response body, normally the API's JSON error object.
        body: String,
    },

    /// The API answered 200 but the body was not the expected shape.
    #[error("invalid response for page at offset {start}: {reason}")]
    InvalidResponse {
        /// The `start` parameter of the failed request.
        start: usize,
        /// What was wrong with the body.
        reason: String,
    },

    /// The configured endpoint is not a valid URL.
    #[error("invalid search endpoint: {endpoint}")]
    InvalidEndpoint {
        /// The rejected endpoint string.
        endpoint: String,
    },
}

impl SearchError {
    /// Creates a network error, or a timeout error when the source timed out.
    ///
    /// The request URL is removed from the source because it carries the API key.
    pub fn network(start: usize, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { start };
        }
        Self::Network {
            start,
            source: source.without_url(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(start: usize, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            start,
            status,
            body: body.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(start: usize, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            start,
            reason: reason.into(),
        }
    }

    /// Creates an invalid-endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
        }
    }
}
