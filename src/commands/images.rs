//! Images command handler: download every URL of a results CSV.

use anyhow::{Context, Result};
use imgsearch_core::{ImageDownloader, TallyReporter, TracingReporter};
use tracing::info;

use crate::cli::ImagesArgs;

pub async fn run_images_command(args: &ImagesArgs) -> Result<()> {
    let downloader = ImageDownloader::new().context("failed to build image HTTP client")?;
    let tally = TallyReporter::new(TracingReporter);

    downloader
        .download_all(&args.csv, &args.column, &args.output_dir, &tally)
        .await
        .with_context(|| format!("cannot download images listed in {}", args.csv.display()))?;

    info!(
        saved = tally.saved(),
        failed = tally.failed(),
        total = tally.total(),
        "image download complete"
    );
    println!(
        "{} saved, {} failed, {} total",
        tally.saved(),
        tally.failed(),
        tally.total()
    );
    Ok(())
}
