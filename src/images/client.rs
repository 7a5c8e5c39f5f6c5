//! HTTP client for fetching image bytes to a fixed path.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::error::ImageError;
use crate::http::{ClientBuildError, HttpTimeouts, build_client};

/// Image fetcher that streams response bodies to disk.
///
/// Created once and reused for every row so connections are pooled.
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    /// Creates a client with the default image timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_timeouts(HttpTimeouts::image())
    }

    /// Creates a client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the HTTP client cannot be built.
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: build_client(timeouts)?,
        })
    }

    /// Downloads `url` and writes the body verbatim to `path`, returning bytes written.
    ///
    /// A partially written file is removed when the transfer fails.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the URL is invalid, the request fails, the
    /// server returns a non-2xx status, or writing to disk fails.
    #[instrument(skip_all, fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(&self, url: &str, path: &Path) -> Result<u64, ImageError> {
        let parsed = Url::parse(url.trim()).map_err(|_| ImageError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ImageError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::http_status(url, status.as_u16()));
        }

        let mut file = File::create(path)
            .await
            .map_err(|e| ImageError::io(path, e))?;

        let result = stream_to_file(&mut file, response, url, path).await;
        if result.is_err() {
            debug!("cleaning up partial file after error");
            drop(file);
            let _ = tokio::fs::remove_file(path).await;
        }
        result
    }
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, ImageError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ImageError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ImageError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| ImageError::io(path, e))?;
    debug!(bytes = bytes_written, "image written");
    Ok(bytes_written)
}
