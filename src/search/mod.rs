//! Paginated search against the Custom Search JSON API.
//!
//! # Architecture
//!
//! - [`PagePlan`] - splits a requested total into pages of at most ten items
//! - [`SearchQuery`] / [`SearchRequest`] - per-run and per-page parameters
//! - [`OffsetPolicy`] - maps a page index to the API `start` parameter
//! - [`PageFetcher`] - async trait for fetching one page; [`SearchClient`] implements it
//! - [`aggregate`] - fetches pages in order, stopping at the first failure
//! - [`run_search`] - plan, aggregate and persist in one call
//!
//! # Example
//!
//! ```no_run
//! use imgsearch_core::report::TracingReporter;
//! use imgsearch_core::search::{OffsetPolicy, SearchClient, SearchQuery, run_search};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SearchClient::new()?;
//! let query = SearchQuery::new("ryan gosling", "api-key", "engine-id")
//!     .with_param("searchType", "image");
//! let outcome = run_search(
//!     &client,
//!     &query,
//!     35,
//!     0,
//!     OffsetPolicy::Legacy,
//!     Path::new("./out"),
//!     &TracingReporter,
//! )
//! .await?;
//! println!("saved {} results to {}", outcome.effective_total, outcome.path.display());
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod client;
mod error;
mod pagination;
mod payload;

pub use aggregator::{AggregatedResults, StopReason, aggregate};
pub use client::{DEFAULT_ENDPOINT, PageFetcher, PageOutcome, SearchClient};
pub use error::SearchError;
pub use pagination::{PAGE_CAPACITY, PagePlan};
pub use payload::{OffsetPolicy, SearchQuery, SearchRequest};

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::output::{PersistError, save_results};
use crate::report::{Event, Reporter};

/// One search result, shaped by the API.
pub type Item = Map<String, Value>;

/// What a completed search run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// CSV file the results were written to.
    pub path: PathBuf,
    /// Number of rows written.
    pub rows: usize,
    /// Result count recorded in the filename.
    pub effective_total: usize,
    /// Why pagination ended.
    pub stop: StopReason,
}

/// Plans pages for `result_total`, fetches them from `start_page`, and writes the CSV.
///
/// Page failures end pagination early without failing the run; the
/// filename then records how many results were actually collected.
///
/// # Errors
///
/// Returns [`PersistError`] when the results file cannot be written.
#[instrument(skip_all, fields(query = %query.query, result_total = result_total, start_page = start_page))]
pub async fn run_search<F, R>(
    fetcher: &F,
    query: &SearchQuery,
    result_total: usize,
    start_page: usize,
    policy: OffsetPolicy,
    output_dir: &Path,
    reporter: &R,
) -> Result<SearchOutcome, PersistError>
where
    F: PageFetcher + ?Sized,
    R: Reporter + ?Sized,
{
    let plan = PagePlan::new(result_total);
    reporter.report(&Event::SearchPlanned {
        query: query.query.clone(),
        requested_total: plan.result_total(),
        page_count: plan.page_count(),
        start_page,
    });
    if policy == OffsetPolicy::Legacy && start_page < plan.page_count() {
        warn!(
            first_start = policy.start_offset(start_page),
            "legacy offset policy requests each page ten results late; the first ten results are never fetched"
        );
    }

    let results = aggregate(fetcher, query, plan, start_page, policy, reporter).await;
    let effective_total = results.effective_total();
    let stop = results.stop_reason().clone();
    let items = results.into_items();

    let path = save_results(&items, &query.query, output_dir, start_page, effective_total).await?;
    reporter.report(&Event::ResultsSaved {
        path: path.clone(),
        rows: items.len(),
    });

    Ok(SearchOutcome {
        path,
        rows: items.len(),
        effective_total,
        stop,
    })
}
