//! Error types for image downloads.

use std::path::PathBuf;

use thiserror::Error;

/// Why one CSV row did not produce an `image_{row}.jpg`.
///
/// Every variant becomes an [`Event::ImageFailed`](crate::report::Event::ImageFailed)
/// for that row and the downloader moves on to the next one.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image host could not be reached or the body stream broke off.
    #[error("could not fetch image {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The image host stopped answering within the image read timeout.
    #[error("image request timed out: {url}")]
    Timeout { url: String },

    /// The image host answered with something other than 2xx.
    #[error("image host answered HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The image file could not be created or written.
    #[error("cannot write image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The row's cell is blank, unparsable, or not an http(s) URL.
    #[error("row has no usable image URL: {url:?}")]
    InvalidUrl { url: String },
}

impl ImageError {
    /// Creates a network error, or a timeout error when the source timed out.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
