//! Search command handler: fetch result pages and write the CSV.

use anyhow::{Context, Result};
use imgsearch_core::{SearchClient, SearchQuery, StopReason, TracingReporter, run_search};
use tracing::{debug, info, warn};

use crate::cli::SearchArgs;

pub async fn run_search_command(args: &SearchArgs) -> Result<()> {
    let mut query = SearchQuery::new(&args.query, &args.api_key, &args.search_engine_id);
    for (key, value) in &args.params {
        query = query.with_param(key, value);
    }
    debug!(?query, offset_policy = %args.offset_policy, "search configured");

    let client = SearchClient::new()
        .context("failed to build search HTTP client")?
        .with_endpoint(&args.endpoint)?;

    let outcome = run_search(
        &client,
        &query,
        args.total_results,
        args.start_page_index,
        args.offset_policy,
        &args.outpath,
        &TracingReporter,
    )
    .await
    .with_context(|| format!("failed to save results under {}", args.outpath.display()))?;

    match &outcome.stop {
        StopReason::Exhausted => info!(
            rows = outcome.rows,
            path = %outcome.path.display(),
            "search complete"
        ),
        StopReason::EndOfResults { .. } | StopReason::FetchFailed { .. } => warn!(
            rows = outcome.rows,
            requested = args.total_results,
            path = %outcome.path.display(),
            "search ended early; saved partial results"
        ),
    }
    println!("{}", outcome.path.display());
    Ok(())
}
