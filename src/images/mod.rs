//! Sequential image download from a results CSV.
//!
//! [`ImageDownloader::download_all`] reads the URL column of a previously
//! saved results file and fetches each URL, one row at a time, to
//! `image_{row}.jpg`. A failed row is reported and skipped; the loop always
//! reaches the last row.
//!
//! # Example
//!
//! ```no_run
//! use imgsearch_core::images::ImageDownloader;
//! use imgsearch_core::report::{TallyReporter, TracingReporter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = ImageDownloader::new()?;
//! let tally = TallyReporter::new(TracingReporter);
//! downloader
//!     .download_all(
//!         Path::new("./out/cats_start_0_results_20.csv"),
//!         "link",
//!         Path::new("./out/images"),
//!         &tally,
//!     )
//!     .await?;
//! println!("saved {}, failed {}", tally.saved(), tally.failed());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::ImageClient;
pub use error::ImageError;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::http::ClientBuildError;
use crate::output::{PersistError, read_column};
use crate::report::{Event, Reporter};

/// Column holding the image URL in Custom Search result files.
pub const DEFAULT_URL_COLUMN: &str = "link";

/// Returns the file name used for the 0-based data row `row`.
#[must_use]
pub fn image_filename(row: usize) -> String {
    format!("image_{row}.jpg")
}

/// Downloads every URL of a results file, in row order.
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: ImageClient,
}

impl ImageDownloader {
    /// Creates a downloader with a default [`ImageClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Ok(Self::with_client(ImageClient::new()?))
    }

    /// Creates a downloader around an existing client.
    #[must_use]
    pub fn with_client(client: ImageClient) -> Self {
        Self { client }
    }

    /// Reads `url_column` from `csv_path` and downloads each row into `output_dir`.
    ///
    /// Per-row outcomes are reported as [`Event::ImageSaved`] or
    /// [`Event::ImageFailed`]; a failed row never stops the loop.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] only when the CSV cannot be read, lacks the
    /// column, or the output directory cannot be created.
    #[instrument(skip(self, reporter), fields(csv = %csv_path.display(), column = url_column))]
    pub async fn download_all<R>(
        &self,
        csv_path: &Path,
        url_column: &str,
        output_dir: &Path,
        reporter: &R,
    ) -> Result<(), PersistError>
    where
        R: Reporter + ?Sized,
    {
        let urls = read_column(csv_path, url_column).await?;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| PersistError::io(output_dir, e))?;

        info!(rows = urls.len(), output_dir = %output_dir.display(), "starting image downloads");
        self.download_urls(&urls, output_dir, reporter).await;
        Ok(())
    }

    /// Downloads `urls` in order; entry `i` is saved as [`image_filename`]`(i)`.
    ///
    /// A failed row never leaves a file behind, including one left by an
    /// earlier run into the same directory.
    pub async fn download_urls<R>(&self, urls: &[String], output_dir: &Path, reporter: &R)
    where
        R: Reporter + ?Sized,
    {
        for (row, url) in urls.iter().enumerate() {
            let path: PathBuf = output_dir.join(image_filename(row));
            match self.client.download_to_path(url, &path).await {
                Ok(_) => reporter.report(&Event::ImageSaved { row, path }),
                Err(error) => {
                    remove_stale_image(&path).await;
                    reporter.report(&Event::ImageFailed {
                        row,
                        url: url.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }
    }
}

async fn remove_stale_image(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed image from a previous run"),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => warn!(path = %path.display(), error = %error, "cannot remove stale image"),
    }
}
